//! Postgres-backed order fulfilment, user management and flow tracking.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;
