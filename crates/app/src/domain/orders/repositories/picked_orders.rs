//! Picked Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::orders::{OrderUuid, PickedOrder};
use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::orders::records::PickedOrderRecord;

const CREATE_PICKED_ORDER_SQL: &str = include_str!("../sql/create_picked_order.sql");
const LIST_PICKED_ORDERS_SQL: &str = include_str!("../sql/list_picked_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPickedOrdersRepository;

impl PgPickedOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_picked_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        picked: &PickedOrder,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PICKED_ORDER_SQL)
            .bind(picked.uuid.into_uuid())
            .bind(picked.order_uuid.into_uuid())
            .bind(picked.picked_by.into_uuid())
            .bind(SqlxTimestamp::from(picked.picked_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_picked_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<PickedOrder>, sqlx::Error> {
        let records = query_as::<Postgres, PickedOrderRecord>(LIST_PICKED_ORDERS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }
}
