//! User Repositories

mod roles;
mod users;

pub(crate) use roles::PgRolesRepository;
pub(crate) use users::PgUsersRepository;
