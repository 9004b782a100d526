//! Test Helpers

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::{
    auth::UserUuid,
    flows::FlowKind,
    orders::{NewOrder, NewOrderDetail, Order},
};
use sqlx::query;
use uuid::Uuid;

use crate::{
    domain::{
        orders::{OrdersService, OrdersServiceError},
        users::data::NewUser,
    },
    test::TestContext,
};

pub(crate) fn new_user(username: &str, role: Option<&str>) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@pickflow.test"),
        password_hash: "$2y$10$fixture".to_string(),
        full_name: username.to_string(),
        is_active: true,
        initial_role: role.map(str::to_string),
    }
}

pub(crate) fn new_order(external_id: &str, tracking: &str) -> NewOrder {
    NewOrder {
        external_id: external_id.to_string(),
        channel: "Shopee".to_string(),
        store: "SP deParcelRibbon".to_string(),
        buyer: "Buyer".to_string(),
        address: "Jl. Merdeka 1".to_string(),
        courier: "JNE".to_string(),
        tracking: tracking.to_string(),
        sent_before: Some("2025-09-11 14:30".to_string()),
        details: vec![
            NewOrderDetail {
                sku: "RIB-01".to_string(),
                product_name: "Satin Ribbon".to_string(),
                variant: "Red".to_string(),
                quantity: 2,
                price: 5_000,
            },
            NewOrderDetail {
                sku: "RIB-02".to_string(),
                product_name: "Organza Ribbon".to_string(),
                variant: "White".to_string(),
                quantity: 1,
                price: 7_500,
            },
        ],
    }
}

/// Store a single order through intake and return it.
pub(crate) async fn create_order(
    ctx: &TestContext,
    external_id: &str,
    tracking: &str,
) -> Result<Order, OrdersServiceError> {
    let summary = ctx
        .orders
        .create_orders(vec![new_order(external_id, tracking)])
        .await?;

    summary
        .created
        .into_iter()
        .next()
        .ok_or(OrdersServiceError::NotFound)
}

pub(crate) async fn insert_qc(
    ctx: &TestContext,
    kind: FlowKind,
    tracking: &str,
    qc_by: Option<UserUuid>,
    created_at: Timestamp,
) -> Result<(), sqlx::Error> {
    let sql = match kind {
        FlowKind::Ribbon => {
            "INSERT INTO qc_ribbons (uuid, tracking, qc_by, created_at) VALUES ($1, $2, $3, $4)"
        }
        FlowKind::Online => {
            "INSERT INTO qc_onlines (uuid, tracking, qc_by, created_at) VALUES ($1, $2, $3, $4)"
        }
    };

    query(sql)
        .bind(Uuid::now_v7())
        .bind(tracking)
        .bind(qc_by.map(UserUuid::into_uuid))
        .bind(SqlxTimestamp::from(created_at))
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}

pub(crate) async fn insert_outbound(
    ctx: &TestContext,
    tracking: &str,
    outbound_by: Option<UserUuid>,
    expedition: &str,
    color: &str,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO outbounds (uuid, tracking, outbound_by, expedition, expedition_color) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::now_v7())
    .bind(tracking)
    .bind(outbound_by.map(UserUuid::into_uuid))
    .bind(expedition)
    .bind(color)
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}

pub(crate) async fn insert_product(
    ctx: &TestContext,
    sku: &str,
    name: &str,
    location: &str,
) -> Result<(), sqlx::Error> {
    query("INSERT INTO products (uuid, sku, name, location) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::now_v7())
        .bind(sku)
        .bind(name)
        .bind(location)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
