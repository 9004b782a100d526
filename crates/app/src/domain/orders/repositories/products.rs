//! Products Repository

use pickflow::orders::Product;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction, query_as};

use crate::domain::orders::records::ProductRecord;

const LIST_PRODUCTS_BY_SKU_SQL: &str = include_str!("../sql/list_products_by_sku.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live catalogue entries for the given SKUs, keyed by SKU.
    pub(crate) async fn products_by_sku(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        skus: &[String],
    ) -> Result<FxHashMap<String, Product>, sqlx::Error> {
        if skus.is_empty() {
            return Ok(FxHashMap::default());
        }

        let records = query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_BY_SKU_SQL)
            .bind(skus)
            .fetch_all(&mut **tx)
            .await?;

        Ok(records
            .into_iter()
            .map(|record| (record.0.sku.clone(), record.0))
            .collect())
    }
}
