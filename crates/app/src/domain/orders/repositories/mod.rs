//! Order Repositories

mod details;
mod orders;
mod picked_orders;
mod products;

pub(crate) use details::PgOrderDetailsRepository;
pub(crate) use orders::PgOrdersRepository;
pub(crate) use picked_orders::PgPickedOrdersRepository;
pub(crate) use products::PgProductsRepository;

/// Convert an in-memory count into an `INTEGER` column value.
pub(super) fn try_into_i32<T>(value: T, col: &str) -> Result<i32, sqlx::Error>
where
    i32: TryFrom<T, Error = std::num::TryFromIntError>,
{
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
