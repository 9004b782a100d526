//! Flows Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::flows::{FlowKind, OrderStage, OutboundStage, Page, QcStage};
use sqlx::{Postgres, Transaction, query_as, query_scalar};

use crate::domain::flows::records::{OrderStageRecord, OutboundRecord, QcRecord};

const GET_QC_RIBBON_SQL: &str = include_str!("sql/get_qc_ribbon.sql");
const GET_QC_ONLINE_SQL: &str = include_str!("sql/get_qc_online.sql");
const LIST_RIBBON_TRACKINGS_SQL: &str = include_str!("sql/list_ribbon_trackings.sql");
const LIST_ONLINE_TRACKINGS_SQL: &str = include_str!("sql/list_online_trackings.sql");
const COUNT_RIBBON_TRACKINGS_SQL: &str = include_str!("sql/count_ribbon_trackings.sql");
const COUNT_ONLINE_TRACKINGS_SQL: &str = include_str!("sql/count_online_trackings.sql");
const GET_OUTBOUND_SQL: &str = include_str!("sql/get_outbound.sql");
const GET_ORDER_STAGE_SQL: &str = include_str!("sql/get_order_stage.sql");

/// Anchor filters, already resolved to query parameters.
#[derive(Debug, Clone, Default)]
pub(crate) struct AnchorFilter {
    pub(crate) from: Option<Timestamp>,
    pub(crate) until: Option<Timestamp>,
    pub(crate) pattern: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFlowsRepository;

impl PgFlowsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_qc(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: FlowKind,
        tracking: &str,
    ) -> Result<Option<QcStage>, sqlx::Error> {
        let sql = match kind {
            FlowKind::Ribbon => GET_QC_RIBBON_SQL,
            FlowKind::Online => GET_QC_ONLINE_SQL,
        };

        let record = query_as::<Postgres, QcRecord>(sql)
            .bind(tracking)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(record.map(|record| record.0))
    }

    pub(crate) async fn find_outbound(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tracking: &str,
    ) -> Result<Option<OutboundStage>, sqlx::Error> {
        let record = query_as::<Postgres, OutboundRecord>(GET_OUTBOUND_SQL)
            .bind(tracking)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(record.map(|record| record.0))
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tracking: &str,
    ) -> Result<Option<OrderStage>, sqlx::Error> {
        let record = query_as::<Postgres, OrderStageRecord>(GET_ORDER_STAGE_SQL)
            .bind(tracking)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(record.map(|record| record.0))
    }

    /// Distinct anchor tracking numbers, ascending, one page at a time.
    pub(crate) async fn list_trackings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: FlowKind,
        filter: &AnchorFilter,
        page: Page,
    ) -> Result<Vec<String>, sqlx::Error> {
        let sql = match kind {
            FlowKind::Ribbon => LIST_RIBBON_TRACKINGS_SQL,
            FlowKind::Online => LIST_ONLINE_TRACKINGS_SQL,
        };

        query_scalar::<Postgres, String>(sql)
            .bind(filter.from.map(SqlxTimestamp::from))
            .bind(filter.until.map(SqlxTimestamp::from))
            .bind(filter.pattern.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_trackings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: FlowKind,
        filter: &AnchorFilter,
    ) -> Result<u64, sqlx::Error> {
        let sql = match kind {
            FlowKind::Ribbon => COUNT_RIBBON_TRACKINGS_SQL,
            FlowKind::Online => COUNT_ONLINE_TRACKINGS_SQL,
        };

        let total: i64 = query_scalar::<Postgres, i64>(sql)
            .bind(filter.from.map(SqlxTimestamp::from))
            .bind(filter.until.map(SqlxTimestamp::from))
            .bind(filter.pattern.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }
}
