//! Order State Machine
//!
//! Guards and effects of every order transition, applied to an in-memory
//! [`Order`]. Callers load the order (under a row lock), run the transition,
//! and persist the result; a rejected transition leaves the order untouched.
//!
//! Guards run in a fixed order: rank gate, cancellation, then status.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    auth::{ActingUser, AuthorizationError, AuthorizationGuard, UserUuid},
    errors::FailureKind,
    orders::{
        details::{DetailError, DetailPlan, reconcile},
        model::{
            Attribution, Order, OrderDetailUuid, OrderUpdate, OrderUuid, PickedOrder,
            PickedOrderUuid,
        },
        status::{EventStatus, ProcessingStatus},
    },
    roles::names,
};

/// Roles allowed to cancel or duplicate orders.
pub const ORDER_ADMIN_ROLES: &[&str] = &[names::SUPERADMIN, names::ADMIN];

/// Suffix appended to the source order's reference when it is duplicated.
pub const DUPLICATE_ID_SUFFIX: &str = "-X2";

/// Prefix prepended to the source order's tracking when it is duplicated.
pub const DUPLICATE_TRACKING_PREFIX: &str = "X-";

/// Transitions, used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// Assign a picker.
    AssignPicker,
    /// Self-service pick.
    Pick,
    /// Complete picking.
    CompletePicking,
    /// Return to the pool.
    SetPending,
    /// Edit header and details.
    Update,
    /// Cancel.
    Cancel,
    /// Duplicate.
    Duplicate,
}

impl OrderAction {
    /// Stable snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssignPicker => "assign_picker",
            Self::Pick => "pick",
            Self::CompletePicking => "complete_picking",
            Self::SetPending => "set_pending",
            Self::Update => "update",
            Self::Cancel => "cancel",
            Self::Duplicate => "duplicate",
        }
    }
}

/// Rejections raised by transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The current processing status forbids the transition.
    #[error("cannot {} order while processing status is '{status}'", .action.as_str())]
    InvalidState {
        /// Attempted transition.
        action: OrderAction,
        /// Offending status.
        status: ProcessingStatus,
    },

    /// The order is cancelled; only reads and complaints are allowed.
    #[error("cannot {} order: order has been cancelled", .action.as_str())]
    Cancelled {
        /// Attempted transition.
        action: OrderAction,
    },

    /// Only the assigned picker may complete picking.
    #[error("order is not assigned to the acting picker")]
    NotAssignedPicker,

    /// The acting user lacks the rank for the transition.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// The requested detail list is invalid.
    #[error(transparent)]
    Details(#[from] DetailError),

    /// The tracking number of an update is empty.
    #[error("tracking cannot be empty")]
    EmptyTracking,
}

impl TransitionError {
    /// Failure classification.
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidState { .. } | Self::Cancelled { .. } => FailureKind::InvalidState,
            Self::NotAssignedPicker | Self::Unauthorized(_) => FailureKind::Forbidden,
            Self::Details(error) => error.kind(),
            Self::EmptyTracking => FailureKind::ValidationFailed,
        }
    }
}

/// Applies order transitions, consulting an [`AuthorizationGuard`] for
/// rank-gated ones.
#[derive(Debug, Clone)]
pub struct OrderStateMachine<'h> {
    guard: AuthorizationGuard<'h>,
}

impl<'h> OrderStateMachine<'h> {
    /// Create a state machine over an authorization guard.
    pub const fn new(guard: AuthorizationGuard<'h>) -> Self {
        Self { guard }
    }

    /// Assign `picker` to the order. Requires coordinator rank.
    ///
    /// # Errors
    ///
    /// Forbidden below coordinator rank; invalid state when cancelled or in
    /// `picking process`, `qc process` or `completed`.
    pub fn assign_picker(
        &self,
        order: &mut Order,
        picker: UserUuid,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        const ACTION: OrderAction = OrderAction::AssignPicker;

        self.guard
            .require_rank(acting, names::COORDINATOR, ACTION.as_str())?;

        ensure_not_cancelled(order, ACTION)?;

        if matches!(
            order.processing_status,
            ProcessingStatus::PickingProcess | ProcessingStatus::QcProcess | ProcessingStatus::Completed
        ) {
            return Err(invalid_state(order, ACTION));
        }

        order.assigned = Some(Attribution::new(acting.uuid, now));
        order.picked_by = Some(picker);
        order.processing_status = ProcessingStatus::PickingProcess;
        order.updated_at = now;

        Ok(())
    }

    /// The acting user starts picking an available order.
    ///
    /// # Errors
    ///
    /// Invalid state unless the order is `ready to pick` or `pending picking`
    /// and not cancelled.
    pub fn pick(
        &self,
        order: &mut Order,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        const ACTION: OrderAction = OrderAction::Pick;

        ensure_not_cancelled(order, ACTION)?;

        if !matches!(
            order.processing_status,
            ProcessingStatus::ReadyToPick | ProcessingStatus::PendingPicking
        ) {
            return Err(invalid_state(order, ACTION));
        }

        order.picked_by = Some(acting.uuid);
        order.picked_at = Some(now);
        order.processing_status = ProcessingStatus::PickingProcess;
        order.updated_at = now;

        Ok(())
    }

    /// The assigned picker finishes picking; returns the receipt to store.
    ///
    /// # Errors
    ///
    /// Invalid state unless `picking process` and not cancelled; forbidden
    /// when the acting user is not the current picker.
    pub fn complete_picking(
        &self,
        order: &mut Order,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<PickedOrder, TransitionError> {
        const ACTION: OrderAction = OrderAction::CompletePicking;

        ensure_not_cancelled(order, ACTION)?;

        if order.processing_status != ProcessingStatus::PickingProcess {
            return Err(invalid_state(order, ACTION));
        }

        if order.picked_by != Some(acting.uuid) {
            return Err(TransitionError::NotAssignedPicker);
        }

        order.processing_status = ProcessingStatus::PickingComplete;
        order.picked_at = order.picked_at.or(Some(now));
        order.updated_at = now;

        Ok(PickedOrder {
            uuid: PickedOrderUuid::new(),
            order_uuid: order.uuid,
            picked_by: acting.uuid,
            picked_at: now,
        })
    }

    /// Return an order being picked to the unassigned pool. Requires
    /// coordinator rank.
    ///
    /// # Errors
    ///
    /// Forbidden below coordinator rank; invalid state unless
    /// `picking process` and not cancelled.
    pub fn set_pending(
        &self,
        order: &mut Order,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        const ACTION: OrderAction = OrderAction::SetPending;

        self.guard
            .require_rank(acting, names::COORDINATOR, ACTION.as_str())?;

        ensure_not_cancelled(order, ACTION)?;

        if order.processing_status != ProcessingStatus::PickingProcess {
            return Err(invalid_state(order, ACTION));
        }

        order.processing_status = ProcessingStatus::PendingPicking;
        order.pending = Some(Attribution::new(acting.uuid, now));
        order.picked_by = None;
        order.assigned = None;
        order.updated_at = now;

        Ok(())
    }

    /// Replace header fields and reconcile details; returns the detail writes.
    ///
    /// # Errors
    ///
    /// Invalid state when cancelled or work is in flight; validation or
    /// not-found errors from detail reconciliation.
    pub fn update(
        &self,
        order: &mut Order,
        update: &OrderUpdate,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<DetailPlan, TransitionError> {
        const ACTION: OrderAction = OrderAction::Update;

        ensure_not_cancelled(order, ACTION)?;
        ensure_not_in_flight(order, ACTION)?;

        if update.tracking.trim().is_empty() {
            return Err(TransitionError::EmptyTracking);
        }

        let plan = reconcile(&order.details, &update.details)?;

        order.channel.clone_from(&update.channel);
        order.store.clone_from(&update.store);
        order.buyer.clone_from(&update.buyer);
        order.address.clone_from(&update.address);
        order.courier.clone_from(&update.courier);
        order.tracking.clone_from(&update.tracking);
        order.sent_before = update.sent_before;
        order.details = plan.resulting(&update.details);
        order.event_status = Some(EventStatus::Changed);
        order.changed = Some(Attribution::new(acting.uuid, now));
        order.updated_at = now;

        Ok(plan)
    }

    /// Cancel the order. Reserved to superadmins and admins.
    ///
    /// # Errors
    ///
    /// Forbidden unless the caller holds a role in [`ORDER_ADMIN_ROLES`];
    /// invalid state when already cancelled or
    /// work is in flight.
    pub fn cancel(
        &self,
        order: &mut Order,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        const ACTION: OrderAction = OrderAction::Cancel;

        self.guard
            .require_any_role(acting, ORDER_ADMIN_ROLES, ACTION.as_str())?;

        ensure_not_cancelled(order, ACTION)?;
        ensure_not_in_flight(order, ACTION)?;

        order.event_status = Some(EventStatus::Cancelled);
        order.cancelled = Some(Attribution::new(acting.uuid, now));
        order.updated_at = now;

        Ok(())
    }

    /// Free the order's identifiers and return a fresh copy holding them.
    /// Reserved to superadmins and admins.
    ///
    /// The source keeps its status and details but its reference gains
    /// [`DUPLICATE_ID_SUFFIX`] and its tracking gains
    /// [`DUPLICATE_TRACKING_PREFIX`].
    ///
    /// # Errors
    ///
    /// Same as [`OrderStateMachine::cancel`].
    pub fn duplicate(
        &self,
        order: &mut Order,
        acting: &ActingUser,
        now: Timestamp,
    ) -> Result<Order, TransitionError> {
        const ACTION: OrderAction = OrderAction::Duplicate;

        self.guard
            .require_any_role(acting, ORDER_ADMIN_ROLES, ACTION.as_str())?;

        ensure_not_cancelled(order, ACTION)?;
        ensure_not_in_flight(order, ACTION)?;

        let external_id = order.external_id.clone();
        let tracking = order.tracking.clone();

        order.external_id.push_str(DUPLICATE_ID_SUFFIX);
        order.tracking.insert_str(0, DUPLICATE_TRACKING_PREFIX);
        order.updated_at = now;

        let details = order
            .details
            .iter()
            .map(|detail| {
                let mut copy = detail.clone();
                copy.uuid = OrderDetailUuid::new();
                copy
            })
            .collect();

        Ok(Order {
            uuid: OrderUuid::new(),
            external_id,
            tracking,
            processing_status: order.processing_status.clone(),
            event_status: Some(EventStatus::Duplicated),
            channel: order.channel.clone(),
            store: order.store.clone(),
            buyer: order.buyer.clone(),
            address: order.address.clone(),
            courier: order.courier.clone(),
            sent_before: order.sent_before,
            assigned: None,
            picked_by: None,
            picked_at: None,
            pending: None,
            changed: Some(Attribution::new(acting.uuid, now)),
            cancelled: None,
            complained: false,
            details,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set or clear the complaint flag. Allowed in every state.
    pub fn mark_complained(&self, order: &mut Order, complained: bool, now: Timestamp) {
        order.complained = complained;
        order.updated_at = now;
    }
}

fn ensure_not_cancelled(order: &Order, action: OrderAction) -> Result<(), TransitionError> {
    if order.is_cancelled() {
        Err(TransitionError::Cancelled { action })
    } else {
        Ok(())
    }
}

fn ensure_not_in_flight(order: &Order, action: OrderAction) -> Result<(), TransitionError> {
    if order.processing_status.is_in_flight() {
        Err(invalid_state(order, action))
    } else {
        Ok(())
    }
}

fn invalid_state(order: &Order, action: OrderAction) -> TransitionError {
    TransitionError::InvalidState {
        action,
        status: order.processing_status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        orders::{
            details::DetailChange,
            intake::{NewOrder, NewOrderDetail},
        },
        roles::RoleHierarchy,
    };

    use super::*;

    fn order() -> Result<Order, crate::orders::intake::IntakeError> {
        NewOrder {
            external_id: "E".to_string(),
            channel: "Shopee".to_string(),
            store: "Ribbon".to_string(),
            buyer: "Buyer".to_string(),
            address: "Street 1".to_string(),
            courier: "JNE".to_string(),
            tracking: "T".to_string(),
            sent_before: None,
            details: vec![NewOrderDetail {
                sku: "SKU-1".to_string(),
                product_name: "Satin Ribbon".to_string(),
                variant: "Red".to_string(),
                quantity: 3,
                price: 1_000,
            }],
        }
        .into_order(Timestamp::UNIX_EPOCH)
    }

    fn user(role: &str) -> ActingUser {
        ActingUser::new(UserUuid::new(), [role])
    }

    #[test]
    fn assign_picker_moves_to_picking_process() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let coordinator = user(names::COORDINATOR);
        let picker = UserUuid::new();
        let now = Timestamp::now();
        let mut order = order()?;

        machine.assign_picker(&mut order, picker, &coordinator, now)?;

        assert_eq!(order.processing_status, ProcessingStatus::PickingProcess);
        assert_eq!(order.picked_by, Some(picker));
        assert_eq!(order.assigned, Some(Attribution::new(coordinator.uuid, now)));
        assert_eq!(order.picked_at, None, "assignment does not start the clock");

        Ok(())
    }

    #[test]
    fn assign_picker_rejects_orders_being_picked() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let coordinator = user(names::COORDINATOR);
        let mut order = order()?;
        order.processing_status = ProcessingStatus::PickingProcess;

        let result = machine.assign_picker(&mut order, UserUuid::new(), &coordinator, Timestamp::now());

        assert_eq!(
            result,
            Err(TransitionError::InvalidState {
                action: OrderAction::AssignPicker,
                status: ProcessingStatus::PickingProcess,
            })
        );
        assert_eq!(order.picked_by, None, "rejected transitions change nothing");

        Ok(())
    }

    #[test]
    fn assign_picker_tolerates_foreign_statuses() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;
        order.processing_status = ProcessingStatus::from("waiting for courier");

        machine.assign_picker(&mut order, UserUuid::new(), &user(names::SUPERADMIN), Timestamp::now())?;

        assert_eq!(order.processing_status, ProcessingStatus::PickingProcess);

        Ok(())
    }

    #[test]
    fn assign_picker_requires_coordinator_rank() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;

        let result = machine.assign_picker(&mut order, UserUuid::new(), &user(names::ADMIN), Timestamp::now());

        assert!(
            matches!(result, Err(TransitionError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );
        assert_eq!(result.map_err(|e| e.kind()), Err(FailureKind::Forbidden));

        Ok(())
    }

    #[test]
    fn pick_then_complete_creates_one_receipt() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let picker = user(names::PICKER);
        let started = Timestamp::UNIX_EPOCH;
        let finished = Timestamp::now();
        let mut order = order()?;

        machine.pick(&mut order, &picker, started)?;
        let receipt = machine.complete_picking(&mut order, &picker, finished)?;

        assert_eq!(order.processing_status, ProcessingStatus::PickingComplete);
        assert_eq!(order.picked_at, Some(started), "existing pick time is kept");
        assert_eq!(receipt.order_uuid, order.uuid);
        assert_eq!(receipt.picked_by, picker.uuid);

        let again = machine.complete_picking(&mut order, &picker, finished);

        assert!(
            matches!(again, Err(TransitionError::InvalidState { .. })),
            "second completion must fail, got {again:?}"
        );

        Ok(())
    }

    #[test]
    fn complete_picking_by_another_picker_is_forbidden() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;

        machine.pick(&mut order, &user(names::PICKER), Timestamp::now())?;
        let result = machine.complete_picking(&mut order, &user(names::PICKER), Timestamp::now());

        assert_eq!(result, Err(TransitionError::NotAssignedPicker));

        Ok(())
    }

    #[test]
    fn set_pending_returns_order_to_pool() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let coordinator = user(names::COORDINATOR);
        let now = Timestamp::now();
        let mut order = order()?;

        machine.assign_picker(&mut order, UserUuid::new(), &coordinator, now)?;
        machine.set_pending(&mut order, &coordinator, now)?;

        assert_eq!(order.processing_status, ProcessingStatus::PendingPicking);
        assert_eq!(order.picked_by, None);
        assert_eq!(order.assigned, None);
        assert_eq!(order.pending, Some(Attribution::new(coordinator.uuid, now)));

        machine.pick(&mut order, &user(names::PICKER), now)?;

        assert_eq!(order.processing_status, ProcessingStatus::PickingProcess);

        Ok(())
    }

    #[test]
    fn update_reconciles_details_and_marks_changed() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let admin = user(names::ADMIN);
        let mut order = order()?;
        let existing = order.details.first().map(|d| d.uuid);

        let update = OrderUpdate {
            channel: "Tokopedia".to_string(),
            store: order.store.clone(),
            buyer: order.buyer.clone(),
            address: order.address.clone(),
            courier: "SiCepat".to_string(),
            tracking: "T2".to_string(),
            sent_before: None,
            details: vec![DetailChange {
                uuid: None,
                sku: "SKU-2".to_string(),
                product_name: "Organza".to_string(),
                variant: String::new(),
                quantity: 1,
            }],
        };

        let plan = machine.update(&mut order, &update, &admin, Timestamp::now())?;

        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.deletes, existing.into_iter().collect::<Vec<_>>());
        assert_eq!(order.details.len(), 1);
        assert_eq!(order.tracking, "T2");
        assert_eq!(order.event_status, Some(EventStatus::Changed));
        assert_eq!(order.changed.map(|c| c.by), Some(admin.uuid));

        Ok(())
    }

    #[test]
    fn update_cannot_empty_the_order() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;
        let before = order.clone();

        let update = OrderUpdate {
            channel: String::new(),
            store: String::new(),
            buyer: String::new(),
            address: String::new(),
            courier: String::new(),
            tracking: "T".to_string(),
            sent_before: None,
            details: Vec::new(),
        };

        let result = machine.update(&mut order, &update, &user(names::ADMIN), Timestamp::now());

        assert_eq!(result, Err(TransitionError::Details(DetailError::EmptyDetails)));
        assert_eq!(order, before, "rejected update changes nothing");

        Ok(())
    }

    #[test]
    fn cancelled_orders_reject_every_transition() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let superadmin = user(names::SUPERADMIN);
        let now = Timestamp::now();
        let mut order = order()?;

        machine.cancel(&mut order, &superadmin, now)?;

        assert!(order.is_cancelled());
        assert_eq!(order.cancelled, Some(Attribution::new(superadmin.uuid, now)));

        let update = OrderUpdate {
            channel: String::new(),
            store: String::new(),
            buyer: String::new(),
            address: String::new(),
            courier: String::new(),
            tracking: "T".to_string(),
            sent_before: None,
            details: Vec::new(),
        };

        let results = [
            machine.assign_picker(&mut order, UserUuid::new(), &superadmin, now).err(),
            machine.pick(&mut order, &superadmin, now).err(),
            machine.complete_picking(&mut order, &superadmin, now).err(),
            machine.set_pending(&mut order, &superadmin, now).err(),
            machine.update(&mut order, &update, &superadmin, now).err(),
            machine.cancel(&mut order, &superadmin, now).err(),
            machine.duplicate(&mut order, &superadmin, now).err(),
        ];

        for result in results {
            assert!(
                matches!(result, Some(TransitionError::Cancelled { .. })),
                "expected Cancelled, got {result:?}"
            );
        }

        machine.mark_complained(&mut order, true, now);

        assert!(order.complained, "complaints are allowed on cancelled orders");

        Ok(())
    }

    #[test]
    fn cancel_requires_admin_rank() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;

        let result = machine.cancel(&mut order, &user(names::PICKER), Timestamp::now());

        assert!(
            matches!(result, Err(TransitionError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn cancel_and_duplicate_are_reserved_to_admin_roles() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let now = Timestamp::now();

        for role in [names::FINANCE, names::ADMIN_RETUR, names::COORDINATOR] {
            let mut order = order()?;
            let acting = user(role);

            let cancel = machine.cancel(&mut order, &acting, now);
            let duplicate = machine.duplicate(&mut order, &acting, now);

            assert!(
                matches!(
                    cancel,
                    Err(TransitionError::Unauthorized(AuthorizationError::RoleRequired { .. }))
                ),
                "{role} cancel: {cancel:?}"
            );
            assert!(
                matches!(
                    duplicate,
                    Err(TransitionError::Unauthorized(AuthorizationError::RoleRequired { .. }))
                ),
                "{role} duplicate: {duplicate:?}"
            );
            assert!(!order.is_cancelled(), "{role} left the order untouched");
            assert_eq!(order.external_id, "E", "{role} left the reference untouched");
        }

        for role in [names::ADMIN, names::SUPERADMIN] {
            let mut order = order()?;

            machine.duplicate(&mut order, &user(role), now)?;
            machine.cancel(&mut order, &user(role), now)?;

            assert!(order.is_cancelled(), "{role} may cancel");
        }

        Ok(())
    }

    #[test]
    fn duplicate_frees_identifiers_and_copies_details() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let admin = user(names::ADMIN);
        let mut order = order()?;
        order.complained = true;

        let copy = machine.duplicate(&mut order, &admin, Timestamp::now())?;

        assert_eq!(order.external_id, "E-X2");
        assert_eq!(order.tracking, "X-T");
        assert_eq!(copy.external_id, "E");
        assert_eq!(copy.tracking, "T");
        assert_eq!(copy.event_status, Some(EventStatus::Duplicated));
        assert_eq!(copy.processing_status, order.processing_status);
        assert!(!copy.complained, "copies start uncomplained");
        assert_ne!(copy.uuid, order.uuid);

        let contents = |o: &Order| {
            o.details
                .iter()
                .map(|d| (d.sku.clone(), d.product_name.clone(), d.variant.clone(), d.quantity))
                .collect::<Vec<_>>()
        };

        assert_eq!(contents(&copy), contents(&order));

        Ok(())
    }

    #[test]
    fn duplicate_rejects_in_flight_orders() -> TestResult {
        let hierarchy = RoleHierarchy::default();
        let machine = OrderStateMachine::new(AuthorizationGuard::new(&hierarchy));
        let mut order = order()?;
        order.processing_status = ProcessingStatus::QcProcess;

        let result = machine.duplicate(&mut order, &user(names::ADMIN), Timestamp::now());

        assert!(
            matches!(result, Err(TransitionError::InvalidState { .. })),
            "expected InvalidState, got {result:?}"
        );
        assert_eq!(order.external_id, "E");

        Ok(())
    }
}
