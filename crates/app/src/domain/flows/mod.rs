//! Flows

mod errors;
mod records;
mod repository;
pub mod service;

pub use errors::FlowsServiceError;
pub use service::*;
