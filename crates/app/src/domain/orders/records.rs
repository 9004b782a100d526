//! Order Records
//!
//! Row shapes read from the order tables, converted into core order types.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::{
    auth::UserUuid,
    orders::{
        Attribution, EventStatus, Order, OrderDetail, OrderDetailUuid, OrderUuid, PickedOrder,
        PickedOrderUuid, ProcessingStatus, Product,
    },
};
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

/// Order header row, without its lines.
#[derive(Debug, Clone)]
pub(crate) struct OrderRecord(Order);

impl OrderRecord {
    pub(crate) fn uuid(&self) -> OrderUuid {
        self.0.uuid
    }

    pub(crate) fn into_order(self, details: Vec<OrderDetail>) -> Order {
        Order { details, ..self.0 }
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Order {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            external_id: row.try_get("external_id")?,
            tracking: row.try_get("tracking")?,
            processing_status: ProcessingStatus::from(
                row.try_get::<String, _>("processing_status")?,
            ),
            event_status: row
                .try_get::<Option<String>, _>("event_status")?
                .map(EventStatus::from),
            channel: row.try_get("channel")?,
            store: row.try_get("store")?,
            buyer: row.try_get("buyer")?,
            address: row.try_get("address")?,
            courier: row.try_get("courier")?,
            sent_before: try_get_timestamp(row, "sent_before")?,
            assigned: try_get_attribution(row, "assigned")?,
            picked_by: try_get_user(row, "picked_by")?,
            picked_at: try_get_timestamp(row, "picked_at")?,
            pending: try_get_attribution(row, "pending")?,
            changed: try_get_attribution(row, "changed")?,
            cancelled: try_get_attribution(row, "cancelled")?,
            complained: row.try_get("complained")?,
            details: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        }))
    }
}

/// Order line row.
#[derive(Debug, Clone)]
pub(crate) struct OrderDetailRecord {
    pub(crate) order_uuid: OrderUuid,
    pub(crate) detail: OrderDetail,
}

impl<'r> FromRow<'r, PgRow> for OrderDetailRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            detail: OrderDetail {
                uuid: OrderDetailUuid::from_uuid(row.try_get("uuid")?),
                sku: row.try_get("sku")?,
                product_name: row.try_get("product_name")?,
                variant: row.try_get("variant")?,
                quantity,
                price: try_get_amount(row, "price")?,
                product: None,
            },
        })
    }
}

/// Picking receipt row.
#[derive(Debug, Clone)]
pub(crate) struct PickedOrderRecord(pub(crate) PickedOrder);

impl<'r> FromRow<'r, PgRow> for PickedOrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(PickedOrder {
            uuid: PickedOrderUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            picked_by: UserUuid::from_uuid(row.try_get("picked_by")?),
            picked_at: row.try_get::<SqlxTimestamp, _>("picked_at")?.to_jiff(),
        }))
    }
}

/// Catalogue row used to enrich order lines.
#[derive(Debug, Clone)]
pub(crate) struct ProductRecord(pub(crate) Product);

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Product {
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            image: row.try_get("image")?,
            variant: row.try_get("variant")?,
            location: row.try_get("location")?,
            barcode: row.try_get("barcode")?,
        }))
    }
}

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn try_get_timestamp(row: &PgRow, col: &str) -> sqlx::Result<Option<jiff::Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(col)?
        .map(SqlxTimestamp::to_jiff))
}

fn try_get_user(row: &PgRow, col: &str) -> sqlx::Result<Option<UserUuid>> {
    Ok(row
        .try_get::<Option<Uuid>, _>(col)?
        .map(UserUuid::from_uuid))
}

/// Reads the `<prefix>_by` / `<prefix>_at` column pair.
fn try_get_attribution(row: &PgRow, prefix: &str) -> sqlx::Result<Option<Attribution>> {
    let by = try_get_user(row, &format!("{prefix}_by"))?;
    let at = try_get_timestamp(row, &format!("{prefix}_at"))?;

    Ok(Attribution::from_parts(by, at))
}
