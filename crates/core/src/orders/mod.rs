//! Orders

pub mod details;
pub mod intake;
pub mod machine;
pub mod model;
pub mod status;

pub use details::{DetailChange, DetailError, DetailPlan};
pub use intake::{IntakeError, IntakeSummary, NewOrder, NewOrderDetail};
pub use machine::{OrderAction, OrderStateMachine, TransitionError};
pub use model::{
    Attribution, Order, OrderDetail, OrderDetailUuid, OrderUpdate, OrderUuid, PickedOrder,
    PickedOrderUuid, Product,
};
pub use status::{EventStatus, ProcessingStatus};
