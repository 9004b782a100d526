//! Bulk Intake
//!
//! Validation of incoming orders and the per-batch outcome report.

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    errors::FailureKind,
    orders::{
        model::{Order, OrderDetail, OrderDetailUuid, OrderUuid},
        status::ProcessingStatus,
    },
};

/// Accepted `sent_before` layouts, tried in order. Interpreted as UTC.
const SENT_BEFORE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// A line of an incoming order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderDetail {
    /// Stock keeping unit.
    pub sku: String,
    /// Product name.
    pub product_name: String,
    /// Variant label.
    #[serde(default)]
    pub variant: String,
    /// Units; must be at least one.
    pub quantity: u32,
    /// Unit price in minor units.
    #[serde(default)]
    pub price: u64,
}

/// An order as received from the marketplace feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Marketplace reference.
    #[serde(alias = "order_ginee_id")]
    pub external_id: String,
    /// Sales channel.
    #[serde(default)]
    pub channel: String,
    /// Store within the channel.
    #[serde(default)]
    pub store: String,
    /// Buyer name.
    #[serde(default)]
    pub buyer: String,
    /// Delivery address.
    #[serde(default)]
    pub address: String,
    /// Carrier.
    #[serde(default)]
    pub courier: String,
    /// Tracking number.
    pub tracking: String,
    /// Dispatch deadline, `YYYY-MM-DD HH:MM[:SS]`.
    #[serde(default)]
    pub sent_before: Option<String>,
    /// Line items.
    #[serde(alias = "order_details")]
    pub details: Vec<NewOrderDetail>,
}

impl NewOrder {
    /// Validate and build the stored order, starting in `ready to pick`.
    ///
    /// # Errors
    ///
    /// Returns an [`IntakeError`] describing the first invalid field.
    pub fn into_order(self, now: Timestamp) -> Result<Order, IntakeError> {
        if self.external_id.trim().is_empty() {
            return Err(IntakeError::EmptyExternalId);
        }

        if self.tracking.trim().is_empty() {
            return Err(IntakeError::EmptyTracking);
        }

        if self.details.is_empty() {
            return Err(IntakeError::NoDetails);
        }

        let sent_before = match self.sent_before.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_sent_before(raw)?),
        };

        let details = self
            .details
            .into_iter()
            .map(|detail| {
                if detail.sku.trim().is_empty() {
                    return Err(IntakeError::EmptySku);
                }

                if detail.quantity == 0 {
                    return Err(IntakeError::InvalidQuantity { sku: detail.sku });
                }

                Ok(OrderDetail {
                    uuid: OrderDetailUuid::new(),
                    sku: detail.sku,
                    product_name: detail.product_name,
                    variant: detail.variant,
                    quantity: detail.quantity,
                    price: detail.price,
                    product: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order {
            uuid: OrderUuid::new(),
            external_id: self.external_id,
            tracking: self.tracking,
            processing_status: ProcessingStatus::ReadyToPick,
            event_status: None,
            channel: self.channel,
            store: self.store,
            buyer: self.buyer,
            address: self.address,
            courier: self.courier,
            sent_before,
            assigned: None,
            picked_by: None,
            picked_at: None,
            pending: None,
            changed: None,
            cancelled: None,
            complained: false,
            details,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Parse a dispatch deadline in one of the accepted layouts.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidSentBefore`] if no layout matches.
pub fn parse_sent_before(raw: &str) -> Result<Timestamp, IntakeError> {
    SENT_BEFORE_FORMATS
        .iter()
        .find_map(|format| DateTime::strptime(format, raw).ok())
        .and_then(|datetime| datetime.to_zoned(TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp())
        .ok_or_else(|| IntakeError::InvalidSentBefore(raw.to_string()))
}

/// Reasons an incoming order is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    /// No marketplace reference.
    #[error("order_ginee_id cannot be empty")]
    EmptyExternalId,

    /// No tracking number.
    #[error("tracking cannot be empty")]
    EmptyTracking,

    /// No line items.
    #[error("an order must have at least one detail")]
    NoDetails,

    /// A line has no SKU.
    #[error("sku cannot be empty")]
    EmptySku,

    /// A line has quantity zero.
    #[error("quantity for sku '{sku}' must be at least 1")]
    InvalidQuantity {
        /// Offending SKU.
        sku: String,
    },

    /// The deadline matches no accepted layout.
    #[error("invalid sent_before '{0}', expected YYYY-MM-DD HH:MM[:SS]")]
    InvalidSentBefore(String),
}

impl IntakeError {
    /// Failure classification.
    pub const fn kind(&self) -> FailureKind {
        FailureKind::ValidationFailed
    }
}

/// An order left untouched because its reference already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedOrder {
    /// Position in the batch.
    pub index: usize,
    /// Marketplace reference.
    pub external_id: String,
    /// Why it was skipped.
    pub reason: String,
}

/// An order that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedOrder {
    /// Position in the batch.
    pub index: usize,
    /// Marketplace reference.
    pub external_id: String,
    /// Failure message.
    pub error: String,
}

/// Outcome of a bulk intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSummary {
    /// Number of orders submitted.
    pub total: usize,
    /// Stored orders.
    pub created: Vec<Order>,
    /// Orders whose reference already existed.
    pub skipped: Vec<SkippedOrder>,
    /// Orders rejected by validation or storage.
    pub failed: Vec<FailedOrder>,
}
