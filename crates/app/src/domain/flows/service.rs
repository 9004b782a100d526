//! Flows service.

use async_trait::async_trait;
use mockall::automock;
use pickflow::flows::{FlowFilter, FlowKind, FlowPage, FlowSnapshot, Page};
use sqlx::{Postgres, Transaction};
use tracing::Span;

use crate::{
    database::Db,
    domain::flows::{
        errors::FlowsServiceError,
        repository::{AnchorFilter, PgFlowsRepository},
    },
};

/// Postgres-backed [`FlowsService`].
#[derive(Debug, Clone)]
pub struct PgFlowsService {
    db: Db,
    repository: PgFlowsRepository,
}

impl PgFlowsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgFlowsRepository::new(),
        }
    }

    /// Snapshot for one tracking number; `None` without a QC anchor.
    async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: FlowKind,
        tracking: &str,
    ) -> Result<Option<FlowSnapshot>, sqlx::Error> {
        let Some(qc) = self.repository.find_qc(tx, kind, tracking).await? else {
            return Ok(None);
        };

        let outbound = self.repository.find_outbound(tx, tracking).await?;
        let order = self.repository.find_order(tx, tracking).await?;

        Ok(Some(FlowSnapshot::new(tracking, qc, outbound, order)))
    }
}

#[async_trait]
impl FlowsService for PgFlowsService {
    #[tracing::instrument(
        name = "flows.service.reconstruct_flow",
        skip(self),
        fields(kind = %kind, tracking = %tracking),
        err
    )]
    async fn reconstruct_flow(
        &self,
        kind: FlowKind,
        tracking: &str,
    ) -> Result<FlowSnapshot, FlowsServiceError> {
        let mut tx = self.db.begin().await?;

        let snapshot = self
            .snapshot(&mut tx, kind, tracking)
            .await?
            .ok_or_else(|| FlowsServiceError::NotFound(tracking.to_string()))?;

        tx.commit().await?;

        Ok(snapshot)
    }

    #[tracing::instrument(
        name = "flows.service.list_flows",
        skip(self, filter),
        fields(
            kind = %kind,
            page = page.number,
            page_size = page.size,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn list_flows(
        &self,
        kind: FlowKind,
        filter: FlowFilter,
        page: Page,
    ) -> Result<FlowPage, FlowsServiceError> {
        let page = Page::new(page.number, page.size)?;
        let (from, until) = filter.dates.bounds()?;

        let anchor = AnchorFilter {
            from,
            until,
            pattern: filter.search_pattern(),
        };

        let mut tx = self.db.begin().await?;

        let total = self
            .repository
            .count_trackings(&mut tx, kind, &anchor)
            .await?;

        Span::current().record("total", total);

        let trackings = self
            .repository
            .list_trackings(&mut tx, kind, &anchor, page)
            .await?;

        let mut flows = Vec::with_capacity(trackings.len());

        for tracking in &trackings {
            if let Some(snapshot) = self.snapshot(&mut tx, kind, tracking).await? {
                flows.push(snapshot);
            }
        }

        tx.commit().await?;

        Ok(FlowPage { flows, total, page })
    }
}

#[automock]
#[async_trait]
pub trait FlowsService: Send + Sync {
    /// Merges the QC, outbound and order records sharing a tracking number.
    ///
    /// Fails with `NotFound` when the QC family has no record for it.
    async fn reconstruct_flow(
        &self,
        kind: FlowKind,
        tracking: &str,
    ) -> Result<FlowSnapshot, FlowsServiceError>;

    /// Lists flows of one family, filtered and paged on the QC anchor.
    async fn list_flows(
        &self,
        kind: FlowKind,
        filter: FlowFilter,
        page: Page,
    ) -> Result<FlowPage, FlowsServiceError>;
}
