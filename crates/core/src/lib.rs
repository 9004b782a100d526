//! Pickflow
//!
//! Storage-free domain logic for warehouse order fulfilment: the order state
//! machine, the role-hierarchy authorization model, and tracking-flow
//! snapshots. Persistence is layered on top by `pickflow-app`.

pub mod auth;
pub mod errors;
pub mod flows;
pub mod orders;
pub mod roles;
pub mod uuids;
