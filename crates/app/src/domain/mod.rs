//! Pickflow Domain Concerns

pub mod flows;
pub mod orders;
pub mod users;
