//! Order Details Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::orders::{OrderDetail, OrderDetailUuid, OrderUuid};
use sqlx::{Postgres, Transaction, query, query_as};
use uuid::Uuid;

use crate::domain::orders::{records::OrderDetailRecord, repositories::try_into_i32};

const LIST_ORDER_DETAILS_SQL: &str = include_str!("../sql/list_order_details.sql");
const CREATE_ORDER_DETAIL_SQL: &str = include_str!("../sql/create_order_detail.sql");
const UPDATE_ORDER_DETAIL_SQL: &str = include_str!("../sql/update_order_detail.sql");
const DELETE_ORDER_DETAIL_SQL: &str = include_str!("../sql/delete_order_detail.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderDetailsRepository;

impl PgOrderDetailsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lines of every listed order, grouped by order and in stored position.
    pub(crate) async fn list_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderDetailRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        query_as::<Postgres, OrderDetailRecord>(LIST_ORDER_DETAILS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        detail: &OrderDetail,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        let price = i64::try_from(detail.price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        query(CREATE_ORDER_DETAIL_SQL)
            .bind(detail.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(try_into_i32(position, "position")?)
            .bind(detail.sku.as_str())
            .bind(detail.product_name.as_str())
            .bind(detail.variant.as_str())
            .bind(try_into_i32(detail.quantity, "quantity")?)
            .bind(price)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Rewrite a kept line. Its price is left as stored. Returns rows affected.
    pub(crate) async fn update_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        detail: &OrderDetail,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = query(UPDATE_ORDER_DETAIL_SQL)
            .bind(detail.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(try_into_i32(position, "position")?)
            .bind(detail.sku.as_str())
            .bind(detail.product_name.as_str())
            .bind(detail.variant.as_str())
            .bind(try_into_i32(detail.quantity, "quantity")?)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn delete_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        detail: OrderDetailUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_ORDER_DETAIL_SQL)
            .bind(detail.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
