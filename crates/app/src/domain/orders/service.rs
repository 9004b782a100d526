//! Orders service.
//!
//! Every transition runs in one transaction: the order row is locked with
//! `FOR UPDATE`, the state machine is applied to the locked copy, and the
//! result is written back before commit. Concurrent transitions on the same
//! order therefore serialise, and the loser observes the winner's state.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pickflow::{
    auth::{ActingUser, AuthorizationGuard, UserUuid},
    orders::{
        DetailPlan, IntakeSummary, NewOrder, Order, OrderDetail, OrderStateMachine, OrderUpdate,
        OrderUuid, PickedOrder,
        intake::{FailedOrder, SkippedOrder},
    },
    roles::RoleHierarchy,
};
use rustc_hash::{FxHashMap, FxHashSet};
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::OrderRecord,
            repositories::{
                PgOrderDetailsRepository, PgOrdersRepository, PgPickedOrdersRepository,
                PgProductsRepository,
            },
        },
        users::repositories::PgUsersRepository,
    },
};

/// Result of assigning a picker to one order of a bulk request.
#[derive(Debug)]
pub struct BulkAssignOutcome {
    /// Order the assignment was requested for.
    pub order: OrderUuid,
    /// The assigned order, or why this order was refused.
    pub result: Result<Order, OrdersServiceError>,
}

/// Both halves of a duplication.
#[derive(Debug, Clone)]
pub struct DuplicatedOrder {
    /// The source, now carrying the suffixed reference and prefixed tracking.
    pub original: Order,
    /// The new order, carrying the original identifiers.
    pub copy: Order,
}

/// Postgres-backed [`OrdersService`].
#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    hierarchy: Arc<RoleHierarchy>,
    orders: PgOrdersRepository,
    details: PgOrderDetailsRepository,
    picked: PgPickedOrdersRepository,
    products: PgProductsRepository,
    users: PgUsersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, hierarchy: Arc<RoleHierarchy>) -> Self {
        Self {
            db,
            hierarchy,
            orders: PgOrdersRepository::new(),
            details: PgOrderDetailsRepository::new(),
            picked: PgPickedOrdersRepository::new(),
            products: PgProductsRepository::new(),
            users: PgUsersRepository::new(),
        }
    }

    fn machine(&self) -> OrderStateMachine<'_> {
        OrderStateMachine::new(AuthorizationGuard::new(&self.hierarchy))
    }

    /// Attach lines, in stored order, and catalogue entries to order headers.
    async fn with_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        records: Vec<OrderRecord>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let uuids: Vec<OrderUuid> = records.iter().map(OrderRecord::uuid).collect();

        let mut lines: FxHashMap<OrderUuid, Vec<OrderDetail>> = FxHashMap::default();

        for record in self.details.list_details(tx, &uuids).await? {
            lines
                .entry(record.order_uuid)
                .or_default()
                .push(record.detail);
        }

        let skus: Vec<String> = lines
            .values()
            .flatten()
            .map(|detail| detail.sku.clone())
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();

        let products = self.products.products_by_sku(tx, &skus).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let mut details = lines.remove(&record.uuid()).unwrap_or_default();

                for detail in &mut details {
                    detail.product = products.get(&detail.sku).cloned();
                }

                record.into_order(details)
            })
            .collect())
    }

    async fn lock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let record = self.orders.lock_order(tx, order).await?;

        self.with_details(tx, vec![record])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }

    async fn save(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), OrdersServiceError> {
        let rows_affected = self.orders.update_order(tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(())
    }

    async fn create_with_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), sqlx::Error> {
        self.orders.create_order(tx, order).await?;

        for (position, detail) in order.details.iter().enumerate() {
            self.details
                .create_detail(tx, order.uuid, position, detail, order.created_at)
                .await?;
        }

        Ok(())
    }

    /// Write the reconciled lines: deletions first, then every remaining line
    /// at its new position.
    async fn apply_detail_plan(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
        plan: &DetailPlan,
    ) -> Result<(), OrdersServiceError> {
        for detail in &plan.deletes {
            self.details.delete_detail(tx, order.uuid, *detail).await?;
        }

        let inserted: FxHashSet<_> = plan.inserts.iter().map(|detail| detail.uuid).collect();

        for (position, detail) in order.details.iter().enumerate() {
            if inserted.contains(&detail.uuid) {
                self.details
                    .create_detail(tx, order.uuid, position, detail, order.updated_at)
                    .await?;
            } else {
                let rows_affected = self
                    .details
                    .update_detail(tx, order.uuid, position, detail, order.updated_at)
                    .await?;

                if rows_affected == 0 {
                    return Err(OrdersServiceError::NotFound);
                }
            }
        }

        Ok(())
    }

    /// Store one incoming order in its own transaction.
    async fn intake_one(
        &self,
        incoming: NewOrder,
        now: Timestamp,
    ) -> Result<Intake, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        if self
            .orders
            .external_id_exists(&mut tx, &incoming.external_id)
            .await?
        {
            return Ok(Intake::Skipped);
        }

        let order = incoming.into_order(now)?;

        self.create_with_details(&mut tx, &order).await?;

        tx.commit().await?;

        Ok(Intake::Created(Box::new(order)))
    }
}

enum Intake {
    Created(Box<Order>),
    Skipped,
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_orders",
        skip(self, orders),
        fields(
            total = orders.len(),
            created = tracing::field::Empty,
            skipped = tracing::field::Empty,
            failed = tracing::field::Empty
        ),
        err
    )]
    async fn create_orders(
        &self,
        orders: Vec<NewOrder>,
    ) -> Result<IntakeSummary, OrdersServiceError> {
        let now = Timestamp::now();

        let mut summary = IntakeSummary {
            total: orders.len(),
            ..IntakeSummary::default()
        };

        for (index, incoming) in orders.into_iter().enumerate() {
            let external_id = incoming.external_id.clone();

            match self.intake_one(incoming, now).await {
                Ok(Intake::Created(order)) => summary.created.push(*order),
                Ok(Intake::Skipped) => {
                    warn!(index, external_id = %external_id, "order already exists, skipping");

                    summary.skipped.push(SkippedOrder {
                        index,
                        external_id,
                        reason: "order already exists".to_string(),
                    });
                }
                Err(error) => {
                    warn!(
                        index,
                        external_id = %external_id,
                        error = %error,
                        "failed to store order"
                    );

                    summary.failed.push(FailedOrder {
                        index,
                        external_id,
                        error: error.to_string(),
                    });
                }
            }
        }

        let span = Span::current();

        span.record("created", summary.created.len());
        span.record("skipped", summary.skipped.len());
        span.record("failed", summary.failed.len());

        info!(
            total = summary.total,
            created = summary.created.len(),
            "processed order intake"
        );

        Ok(summary)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        let order = self
            .with_details(&mut tx, vec![record])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_picking_orders(
        &self,
        acting: &ActingUser,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .orders
            .list_picking_orders(&mut tx, acting.uuid)
            .await?;

        let orders = self.with_details(&mut tx, records).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_picked_orders(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<PickedOrder>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders.get_order(&mut tx, order).await?;

        let picked = self.picked.list_picked_orders(&mut tx, order).await?;

        tx.commit().await?;

        Ok(picked)
    }

    #[tracing::instrument(
        name = "orders.service.assign_picker",
        skip(self, acting),
        fields(order_uuid = %order, picker_uuid = %picker, acting_uuid = %acting.uuid),
        err
    )]
    async fn assign_picker(
        &self,
        order: OrderUuid,
        picker: UserUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        if !self.users.user_exists(&mut tx, picker).await? {
            return Err(OrdersServiceError::PickerNotFound);
        }

        self.machine()
            .assign_picker(&mut locked, picker, acting, Timestamp::now())?;

        self.save(&mut tx, &locked).await?;

        tx.commit().await?;

        info!(order_uuid = %order, picker_uuid = %picker, "assigned picker");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.bulk_assign_picker",
        skip(self, orders, acting),
        fields(
            picker_uuid = %picker,
            requested = orders.len(),
            assigned = tracing::field::Empty
        ),
        err
    )]
    async fn bulk_assign_picker(
        &self,
        orders: Vec<OrderUuid>,
        picker: UserUuid,
        acting: &ActingUser,
    ) -> Result<Vec<BulkAssignOutcome>, OrdersServiceError> {
        let mut outcomes = Vec::with_capacity(orders.len());

        for order in orders {
            let result = self.assign_picker(order, picker, acting).await;

            outcomes.push(BulkAssignOutcome { order, result });
        }

        let assigned = outcomes.iter().filter(|outcome| outcome.result.is_ok()).count();

        Span::current().record("assigned", assigned);

        Ok(outcomes)
    }

    #[tracing::instrument(
        name = "orders.service.pick",
        skip(self, acting),
        fields(order_uuid = %order, acting_uuid = %acting.uuid),
        err
    )]
    async fn pick(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        self.machine().pick(&mut locked, acting, Timestamp::now())?;

        self.save(&mut tx, &locked).await?;

        tx.commit().await?;

        info!(order_uuid = %order, "picked order");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.complete_picking",
        skip(self, acting),
        fields(
            order_uuid = %order,
            acting_uuid = %acting.uuid,
            picked_order_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn complete_picking(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        let receipt = self
            .machine()
            .complete_picking(&mut locked, acting, Timestamp::now())?;

        Span::current().record("picked_order_uuid", tracing::field::display(receipt.uuid));

        self.save(&mut tx, &locked).await?;
        self.picked.create_picked_order(&mut tx, &receipt).await?;

        tx.commit().await?;

        info!(order_uuid = %order, picked_order_uuid = %receipt.uuid, "completed picking");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.set_pending",
        skip(self, acting),
        fields(order_uuid = %order, acting_uuid = %acting.uuid),
        err
    )]
    async fn set_pending(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        self.machine()
            .set_pending(&mut locked, acting, Timestamp::now())?;

        self.save(&mut tx, &locked).await?;

        tx.commit().await?;

        info!(order_uuid = %order, "returned order to pending");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, update, acting),
        fields(
            order_uuid = %order,
            acting_uuid = %acting.uuid,
            inserted = tracing::field::Empty,
            updated = tracing::field::Empty,
            deleted = tracing::field::Empty
        ),
        err
    )]
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        let plan = self
            .machine()
            .update(&mut locked, &update, acting, Timestamp::now())?;

        let span = Span::current();

        span.record("inserted", plan.inserts.len());
        span.record("updated", plan.updates.len());
        span.record("deleted", plan.deletes.len());

        self.save(&mut tx, &locked).await?;
        self.apply_detail_plan(&mut tx, &locked, &plan).await?;

        tx.commit().await?;

        info!(order_uuid = %order, "updated order");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, acting),
        fields(order_uuid = %order, acting_uuid = %acting.uuid),
        err
    )]
    async fn cancel_order(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        self.machine().cancel(&mut locked, acting, Timestamp::now())?;

        self.save(&mut tx, &locked).await?;

        tx.commit().await?;

        info!(order_uuid = %order, "cancelled order");

        Ok(locked)
    }

    #[tracing::instrument(
        name = "orders.service.duplicate_order",
        skip(self, acting),
        fields(
            order_uuid = %order,
            acting_uuid = %acting.uuid,
            copy_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn duplicate_order(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<DuplicatedOrder, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        let copy = self
            .machine()
            .duplicate(&mut locked, acting, Timestamp::now())?;

        Span::current().record("copy_uuid", tracing::field::display(copy.uuid));

        // The source gives up its identifiers before the copy claims them.
        self.save(&mut tx, &locked).await?;
        self.create_with_details(&mut tx, &copy).await?;

        tx.commit().await?;

        info!(order_uuid = %order, copy_uuid = %copy.uuid, "duplicated order");

        Ok(DuplicatedOrder {
            original: locked,
            copy,
        })
    }

    #[tracing::instrument(
        name = "orders.service.mark_complained",
        skip(self, acting),
        fields(order_uuid = %order, acting_uuid = %acting.uuid),
        err
    )]
    async fn mark_complained(
        &self,
        order: OrderUuid,
        complained: bool,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut locked = self.lock(&mut tx, order).await?;

        self.machine()
            .mark_complained(&mut locked, complained, Timestamp::now());

        self.save(&mut tx, &locked).await?;

        tx.commit().await?;

        info!(order_uuid = %order, complained, "updated complaint flag");

        Ok(locked)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Stores a batch of incoming orders, each in its own transaction.
    ///
    /// Orders whose reference already exists are skipped; invalid or
    /// conflicting orders are reported as failures without affecting the rest.
    async fn create_orders(
        &self,
        orders: Vec<NewOrder>,
    ) -> Result<IntakeSummary, OrdersServiceError>;

    /// Retrieve a single order with its lines.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Orders currently being picked by the acting user.
    async fn list_picking_orders(
        &self,
        acting: &ActingUser,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Picking receipts recorded for an order.
    async fn list_picked_orders(
        &self,
        order: OrderUuid,
    ) -> Result<Vec<PickedOrder>, OrdersServiceError>;

    /// Assigns a picker to an order.
    async fn assign_picker(
        &self,
        order: OrderUuid,
        picker: UserUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// Assigns a picker to several orders independently.
    async fn bulk_assign_picker(
        &self,
        orders: Vec<OrderUuid>,
        picker: UserUuid,
        acting: &ActingUser,
    ) -> Result<Vec<BulkAssignOutcome>, OrdersServiceError>;

    /// The acting user picks an order for themselves.
    async fn pick(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// The assigned picker finishes picking.
    async fn complete_picking(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// Returns an order being picked to the pool.
    async fn set_pending(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// Replaces the header and reconciles the lines.
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// Cancels an order.
    async fn cancel_order(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;

    /// Duplicates an order, handing its identifiers to the copy.
    async fn duplicate_order(
        &self,
        order: OrderUuid,
        acting: &ActingUser,
    ) -> Result<DuplicatedOrder, OrdersServiceError>;

    /// Sets or clears the complaint flag.
    async fn mark_complained(
        &self,
        order: OrderUuid,
        complained: bool,
        acting: &ActingUser,
    ) -> Result<Order, OrdersServiceError>;
}
