//! Flow Records

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::{
    auth::UserUuid,
    flows::{OperatorInfo, OrderStage, OutboundStage, QcStage},
    orders::{OrderUuid, ProcessingStatus},
};
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(crate) struct QcRecord(pub(crate) QcStage);

impl<'r> FromRow<'r, PgRow> for QcRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(QcStage {
            operator: try_get_operator(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OutboundRecord(pub(crate) OutboundStage);

impl<'r> FromRow<'r, PgRow> for OutboundRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(OutboundStage {
            operator: try_get_operator(row)?,
            expedition: row.try_get("expedition")?,
            expedition_color: row.try_get("expedition_color")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OrderStageRecord(pub(crate) OrderStage);

impl<'r> FromRow<'r, PgRow> for OrderStageRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(OrderStage {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            external_id: row.try_get("external_id")?,
            processing_status: ProcessingStatus::from(
                row.try_get::<String, _>("processing_status")?,
            ),
            complained: row.try_get("complained")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        }))
    }
}

/// Operator columns come from a left join; absent when the user row is gone.
fn try_get_operator(row: &PgRow) -> sqlx::Result<Option<OperatorInfo>> {
    let Some(uuid) = row.try_get::<Option<Uuid>, _>("operator_uuid")? else {
        return Ok(None);
    };

    Ok(Some(OperatorInfo {
        uuid: UserUuid::from_uuid(uuid),
        username: row.try_get("operator_username")?,
        full_name: row.try_get("operator_full_name")?,
    }))
}
