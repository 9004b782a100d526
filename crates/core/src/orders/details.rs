//! Detail Reconciliation
//!
//! An update carries the complete desired list of lines. Lines without an id
//! are inserted, lines with a known id are updated, and existing lines missing
//! from the list are deleted.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    errors::FailureKind,
    orders::model::{OrderDetail, OrderDetailUuid},
};

/// One line of the desired detail list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailChange {
    /// Existing line to update, or `None` to insert a new line.
    #[serde(default)]
    pub uuid: Option<OrderDetailUuid>,
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub product_name: String,
    /// Variant label.
    #[serde(default)]
    pub variant: String,
    /// Units; must be at least one.
    pub quantity: u32,
}

/// Writes needed to turn the current lines into the desired lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPlan {
    /// New lines, ids already allocated.
    pub inserts: Vec<OrderDetail>,
    /// Existing lines with their new contents.
    pub updates: Vec<OrderDetail>,
    /// Existing lines to remove.
    pub deletes: Vec<OrderDetailUuid>,
}

impl DetailPlan {
    /// Resulting line list, in request order.
    pub fn resulting(&self, desired: &[DetailChange]) -> Vec<OrderDetail> {
        let mut inserts = self.inserts.iter();

        desired
            .iter()
            .filter_map(|change| match change.uuid {
                Some(uuid) => self.updates.iter().find(|detail| detail.uuid == uuid),
                None => inserts.next(),
            })
            .cloned()
            .collect()
    }
}

/// Reasons a detail list is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    /// The list references a line the order does not have.
    #[error("order detail {0} not found on this order")]
    UnknownDetail(OrderDetailUuid),

    /// The same line id appears twice.
    #[error("order detail {0} appears more than once")]
    DuplicateDetail(OrderDetailUuid),

    /// A line has quantity zero.
    #[error("quantity for sku '{sku}' must be at least 1")]
    InvalidQuantity {
        /// Offending SKU.
        sku: String,
    },

    /// A line has no SKU.
    #[error("sku cannot be empty")]
    EmptySku,

    /// The order would be left without lines.
    #[error("an order must keep at least one detail")]
    EmptyDetails,
}

impl DetailError {
    /// Failure classification.
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownDetail(_) => FailureKind::NotFound,
            Self::DuplicateDetail(_)
            | Self::InvalidQuantity { .. }
            | Self::EmptySku
            | Self::EmptyDetails => FailureKind::ValidationFailed,
        }
    }
}

/// Compute the writes turning `current` into `desired`.
///
/// Price is kept on updated lines and starts at zero on inserted lines.
///
/// # Errors
///
/// Returns a [`DetailError`] if the desired list is empty, references an
/// unknown or repeated line, or contains an invalid line.
pub fn reconcile(
    current: &[OrderDetail],
    desired: &[DetailChange],
) -> Result<DetailPlan, DetailError> {
    if desired.is_empty() {
        return Err(DetailError::EmptyDetails);
    }

    let mut plan = DetailPlan::default();
    let mut kept = FxHashSet::default();

    for change in desired {
        if change.sku.trim().is_empty() {
            return Err(DetailError::EmptySku);
        }

        if change.quantity == 0 {
            return Err(DetailError::InvalidQuantity {
                sku: change.sku.clone(),
            });
        }

        match change.uuid {
            None => plan.inserts.push(OrderDetail {
                uuid: OrderDetailUuid::new(),
                sku: change.sku.clone(),
                product_name: change.product_name.clone(),
                variant: change.variant.clone(),
                quantity: change.quantity,
                price: 0,
                product: None,
            }),
            Some(uuid) => {
                let existing = current
                    .iter()
                    .find(|detail| detail.uuid == uuid)
                    .ok_or(DetailError::UnknownDetail(uuid))?;

                if !kept.insert(uuid) {
                    return Err(DetailError::DuplicateDetail(uuid));
                }

                plan.updates.push(OrderDetail {
                    sku: change.sku.clone(),
                    product_name: change.product_name.clone(),
                    variant: change.variant.clone(),
                    quantity: change.quantity,
                    product: None,
                    ..existing.clone()
                });
            }
        }
    }

    plan.deletes = current
        .iter()
        .map(|detail| detail.uuid)
        .filter(|uuid| !kept.contains(uuid))
        .collect();

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line(sku: &str, quantity: u32) -> OrderDetail {
        OrderDetail {
            uuid: OrderDetailUuid::new(),
            sku: sku.to_string(),
            product_name: format!("{sku} name"),
            variant: String::new(),
            quantity,
            price: 1_500,
            product: None,
        }
    }

    fn keep(detail: &OrderDetail, quantity: u32) -> DetailChange {
        DetailChange {
            uuid: Some(detail.uuid),
            sku: detail.sku.clone(),
            product_name: detail.product_name.clone(),
            variant: detail.variant.clone(),
            quantity,
        }
    }

    fn insert(sku: &str) -> DetailChange {
        DetailChange {
            uuid: None,
            sku: sku.to_string(),
            product_name: "New".to_string(),
            variant: "Red".to_string(),
            quantity: 1,
        }
    }

    #[test]
    fn inserts_updates_and_deletes() -> TestResult {
        let a = line("A", 1);
        let b = line("B", 2);

        let plan = reconcile(&[a.clone(), b.clone()], &[keep(&a, 5), insert("C")])?;

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates.first().map(|d| d.quantity), Some(5));
        assert_eq!(
            plan.updates.first().map(|d| d.price),
            Some(1_500),
            "price survives an update"
        );
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts.first().map(|d| d.sku.as_str()), Some("C"));
        assert_eq!(plan.deletes, vec![b.uuid]);

        Ok(())
    }

    #[test]
    fn resulting_follows_request_order() -> TestResult {
        let a = line("A", 1);
        let desired = [insert("C"), keep(&a, 3)];

        let plan = reconcile(std::slice::from_ref(&a), &desired)?;
        let skus: Vec<String> = plan
            .resulting(&desired)
            .into_iter()
            .map(|d| d.sku)
            .collect();

        assert_eq!(skus, vec!["C".to_string(), "A".to_string()]);

        Ok(())
    }

    #[test]
    fn empty_list_is_rejected() {
        let result = reconcile(&[line("A", 1)], &[]);

        assert_eq!(result, Err(DetailError::EmptyDetails));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let stranger = OrderDetailUuid::new();
        let mut change = insert("A");
        change.uuid = Some(stranger);

        let result = reconcile(&[line("A", 1)], &[change]);

        assert_eq!(result, Err(DetailError::UnknownDetail(stranger)));
        assert_eq!(
            DetailError::UnknownDetail(stranger).kind(),
            FailureKind::NotFound
        );
    }

    #[test]
    fn repeated_id_is_rejected() {
        let a = line("A", 1);

        let result = reconcile(std::slice::from_ref(&a), &[keep(&a, 1), keep(&a, 2)]);

        assert_eq!(result, Err(DetailError::DuplicateDetail(a.uuid)));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let a = line("A", 1);

        let result = reconcile(std::slice::from_ref(&a), &[keep(&a, 0)]);

        assert!(
            matches!(result, Err(DetailError::InvalidQuantity { .. })),
            "expected InvalidQuantity, got {result:?}"
        );
    }
}
