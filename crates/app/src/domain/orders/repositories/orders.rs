//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::{
    auth::UserUuid,
    orders::{EventStatus, Order, OrderUuid, ProcessingStatus},
};
use sqlx::{
    Postgres, Transaction, postgres::PgArguments, query, query::Query, query_as, query_scalar,
};

use crate::domain::orders::records::OrderRecord;

const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_PICKING_ORDERS_SQL: &str = include_str!("../sql/list_picking_orders.sql");
const EXTERNAL_ID_EXISTS_SQL: &str = include_str!("../sql/external_id_exists.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const UPDATE_ORDER_SQL: &str = include_str!("../sql/update_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_picking_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        picker: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_PICKING_ORDERS_SQL)
            .bind(ProcessingStatus::PickingProcess.as_str())
            .bind(picker.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn external_id_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(EXTERNAL_ID_EXISTS_SQL)
            .bind(external_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), sqlx::Error> {
        bind_header(query(CREATE_ORDER_SQL).bind(order.uuid.into_uuid()), order)
            .bind(SqlxTimestamp::from(order.created_at))
            .bind(SqlxTimestamp::from(order.updated_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Overwrite every mutable header column. Returns rows affected.
    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<u64, sqlx::Error> {
        let result = bind_header(query(UPDATE_ORDER_SQL).bind(order.uuid.into_uuid()), order)
            .bind(SqlxTimestamp::from(order.updated_at))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Binds `$2` to `$22`, from `external_id` through `complained`.
fn bind_header<'q>(
    statement: Query<'q, Postgres, PgArguments>,
    order: &'q Order,
) -> Query<'q, Postgres, PgArguments> {
    statement
        .bind(order.external_id.as_str())
        .bind(order.tracking.as_str())
        .bind(order.processing_status.as_str())
        .bind(order.event_status.as_ref().map(EventStatus::as_str))
        .bind(order.channel.as_str())
        .bind(order.store.as_str())
        .bind(order.buyer.as_str())
        .bind(order.address.as_str())
        .bind(order.courier.as_str())
        .bind(order.sent_before.map(SqlxTimestamp::from))
        .bind(order.assigned.map(|a| a.by.into_uuid()))
        .bind(order.assigned.map(|a| SqlxTimestamp::from(a.at)))
        .bind(order.picked_by.map(UserUuid::into_uuid))
        .bind(order.picked_at.map(SqlxTimestamp::from))
        .bind(order.pending.map(|a| a.by.into_uuid()))
        .bind(order.pending.map(|a| SqlxTimestamp::from(a.at)))
        .bind(order.changed.map(|a| a.by.into_uuid()))
        .bind(order.changed.map(|a| SqlxTimestamp::from(a.at)))
        .bind(order.cancelled.map(|a| a.by.into_uuid()))
        .bind(order.cancelled.map(|a| SqlxTimestamp::from(a.at)))
        .bind(order.complained)
}
