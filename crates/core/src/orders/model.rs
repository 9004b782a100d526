//! Order Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserUuid,
    orders::{
        details::DetailChange,
        status::{EventStatus, ProcessingStatus},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Detail UUID
pub type OrderDetailUuid = TypedUuid<OrderDetail>;

/// Picked Order UUID
pub type PickedOrderUuid = TypedUuid<PickedOrder>;

/// Who performed a transition, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Acting user.
    pub by: UserUuid,

    /// Instant of the transition.
    pub at: Timestamp,
}

impl Attribution {
    /// Attribute a transition to `by` at `at`.
    pub const fn new(by: UserUuid, at: Timestamp) -> Self {
        Self { by, at }
    }

    /// Rebuild from separately stored columns; both halves must be present.
    pub fn from_parts(by: Option<UserUuid>, at: Option<Timestamp>) -> Option<Self> {
        Some(Self::new(by?, at?))
    }
}

/// Catalogue entry looked up by SKU when reading order lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stock keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Image URL.
    pub image: String,
    /// Variant label.
    pub variant: String,
    /// Shelf location.
    pub location: String,
    /// Barcode.
    pub barcode: String,
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Line id.
    pub uuid: OrderDetailUuid,

    /// Stock keeping unit.
    pub sku: String,

    /// Product name as ordered.
    pub product_name: String,

    /// Variant label as ordered.
    pub variant: String,

    /// Units ordered; always at least one.
    pub quantity: u32,

    /// Unit price in minor units.
    pub price: u64,

    /// Catalogue entry, filled at read time when one matches the SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// The unit of fulfilment work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Internal id.
    pub uuid: OrderUuid,

    /// Unique marketplace reference (`order_ginee_id`).
    pub external_id: String,

    /// Unique shipping tracking number.
    pub tracking: String,

    /// Fulfilment stage.
    pub processing_status: ProcessingStatus,

    /// Audit annotation.
    pub event_status: Option<EventStatus>,

    /// Sales channel.
    pub channel: String,

    /// Store within the channel.
    pub store: String,

    /// Buyer name.
    pub buyer: String,

    /// Delivery address.
    pub address: String,

    /// Carrier.
    pub courier: String,

    /// Dispatch deadline.
    pub sent_before: Option<Timestamp>,

    /// Set by picker assignment; cleared by set pending.
    pub assigned: Option<Attribution>,

    /// Current picker; set by assignment or self-service pick.
    pub picked_by: Option<UserUuid>,

    /// When picking started (self-service) or completed.
    pub picked_at: Option<Timestamp>,

    /// Set by set pending.
    pub pending: Option<Attribution>,

    /// Set by update and on duplicated copies.
    pub changed: Option<Attribution>,

    /// Set by cancel.
    pub cancelled: Option<Attribution>,

    /// Customer complaint flag, independent of the state machine.
    pub complained: bool,

    /// Line items; never empty after creation.
    pub details: Vec<OrderDetail>,

    /// Creation instant.
    pub created_at: Timestamp,

    /// Last modification instant.
    pub updated_at: Timestamp,
}

impl Order {
    /// Whether the order carries the terminal `cancelled` annotation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.event_status, Some(EventStatus::Cancelled))
    }
}

/// Completion receipt, created once per successful pick completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedOrder {
    /// Receipt id.
    pub uuid: PickedOrderUuid,

    /// Completed order.
    pub order_uuid: OrderUuid,

    /// Picker who completed it.
    pub picked_by: UserUuid,

    /// Completion instant.
    pub picked_at: Timestamp,
}

/// Replacement header fields and the desired detail list for an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// Sales channel.
    pub channel: String,
    /// Store within the channel.
    pub store: String,
    /// Buyer name.
    pub buyer: String,
    /// Delivery address.
    pub address: String,
    /// Carrier.
    pub courier: String,
    /// Tracking number.
    pub tracking: String,
    /// Dispatch deadline.
    pub sent_before: Option<Timestamp>,
    /// Desired line items after the update.
    pub details: Vec<DetailChange>,
}
