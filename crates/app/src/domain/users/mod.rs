//! Users

pub mod data;
mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::UsersServiceError;
pub use service::*;
