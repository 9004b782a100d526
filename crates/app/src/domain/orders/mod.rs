//! Orders

mod errors;
mod records;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
