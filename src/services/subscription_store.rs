//! Subscription record store. Pure row access; never touches balances.

use crate::{
    error::Result,
    models::{
        balances::LedgerKey,
        common::non_blank,
        subscriptions::{
            CreateSubscriptionRequest, SubscriptionMetadataPatch, OPEN_ENDED_EXPIRATION,
        },
    },
};
use entity::subscriptions;
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait, PaginatorTrait};
use tracing::instrument;
use uuid::Uuid;

/// Ledger key and amount a stored row consumed, if it consumed any
pub fn ledger_charge(row: &subscriptions::Model) -> Option<(LedgerKey, i32)> {
    match (&row.vendor_id, &row.vendor_service_name) {
        (Some(vendor_id), Some(service)) if row.credits_used > 0 => {
            Some((LedgerKey::new(vendor_id, service), row.credits_used))
        }
        _ => None,
    }
}

/// Persist a new row with a fresh id, applying defaults for omitted fields
#[instrument(skip(conn, request), fields(customer_id = %request.customer_id))]
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    request: &CreateSubscriptionRequest,
    bundle_id: Option<&str>,
) -> Result<subscriptions::Model> {
    let now = time::OffsetDateTime::now_utc();
    let vendor_id = non_blank(request.vendor_id.as_deref());
    let vendor_service_name = vendor_id
        .as_ref()
        .and_then(|_| non_blank(request.vendor_service_name.as_deref()));
    let credits_used = if vendor_id.is_some() {
        request.credits_used
    } else {
        0
    };

    let row = subscriptions::ActiveModel {
        id: Set(Uuid::now_v7().to_string()),
        customer_id: Set(request.customer_id.trim().to_string()),
        service_name: Set(request.service_name.trim().to_string()),
        start_date: Set(request.start_date.unwrap_or_else(|| now.date())),
        expiration_date: Set(request.expiration_date.unwrap_or(OPEN_ENDED_EXPIRATION)),
        amount_paid: Set(request.amount_paid),
        credits_used: Set(credits_used),
        vendor_id: Set(vendor_id),
        vendor_service_name: Set(vendor_service_name),
        bundle_id: Set(bundle_id
            .map(str::to_string)
            .or_else(|| non_blank(request.bundle_id.as_deref()))),
        order_status: Set(request
            .order_status
            .clone()
            .unwrap_or_else(|| "pending".to_string())),
        payment_type: Set(request.payment_type.clone().unwrap_or_default()),
        payment_status: Set(request
            .payment_status
            .clone()
            .unwrap_or_else(|| "unpaid".to_string())),
        transaction_ref: Set(non_blank(request.transaction_ref.as_deref())),
        status: Set(request
            .status
            .clone()
            .unwrap_or_else(|| "active".to_string())),
        classification: Set(request.classification.clone().unwrap_or_default()),
        discount_amount: Set(request.discount_amount.unwrap_or(0.0)),
        mac_address: Set(request.mac_address.clone().unwrap_or_default()),
        notes: Set(request.notes.clone().unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = row.insert(conn).await?;
    Ok(model)
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> Result<Option<subscriptions::Model>> {
    let row = subscriptions::Entity::find_by_id(id.to_string())
        .one(conn)
        .await?;
    Ok(row)
}

/// Newest-created first
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    customer_id: Option<&str>,
) -> Result<Vec<subscriptions::Model>> {
    let mut query = subscriptions::Entity::find();
    if let Some(customer_id) = customer_id {
        query = query.filter(subscriptions::Column::CustomerId.eq(customer_id));
    }

    let rows = query
        .order_by_desc(subscriptions::Column::CreatedAt)
        .order_by_desc(subscriptions::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Bundle members in creation order
pub async fn list_by_bundle<C: ConnectionTrait>(
    conn: &C,
    bundle_id: &str,
) -> Result<Vec<subscriptions::Model>> {
    let rows = subscriptions::Entity::find()
        .filter(subscriptions::Column::BundleId.eq(bundle_id))
        .order_by_asc(subscriptions::Column::CreatedAt)
        .order_by_asc(subscriptions::Column::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

pub async fn count_for_customer<C: ConnectionTrait>(conn: &C, customer_id: &str) -> Result<u64> {
    let count = subscriptions::Entity::find()
        .filter(subscriptions::Column::CustomerId.eq(customer_id))
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn count_for_vendor<C: ConnectionTrait>(conn: &C, vendor_id: &str) -> Result<u64> {
    let count = subscriptions::Entity::find()
        .filter(subscriptions::Column::VendorId.eq(vendor_id))
        .count(conn)
        .await?;
    Ok(count)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<u64> {
    let result = subscriptions::Entity::delete_many()
        .filter(subscriptions::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_by_bundle<C: ConnectionTrait>(conn: &C, bundle_id: &str) -> Result<u64> {
    let result = subscriptions::Entity::delete_many()
        .filter(subscriptions::Column::BundleId.eq(bundle_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Apply a metadata patch to one subscription. Returns rows affected.
pub async fn update_metadata<C: ConnectionTrait>(
    conn: &C,
    id: &str,
    patch: &SubscriptionMetadataPatch,
) -> Result<u64> {
    let update = metadata_update(patch).filter(subscriptions::Column::Id.eq(id));
    Ok(update.exec(conn).await?.rows_affected)
}

/// Apply a metadata patch to every member of a bundle. Returns rows affected.
pub async fn update_bundle_metadata<C: ConnectionTrait>(
    conn: &C,
    bundle_id: &str,
    patch: &SubscriptionMetadataPatch,
) -> Result<u64> {
    let update = metadata_update(patch).filter(subscriptions::Column::BundleId.eq(bundle_id));
    Ok(update.exec(conn).await?.rows_affected)
}

fn metadata_update(patch: &SubscriptionMetadataPatch) -> UpdateMany<subscriptions::Entity> {
    let mut update = subscriptions::Entity::update_many().col_expr(
        subscriptions::Column::UpdatedAt,
        Expr::value(time::OffsetDateTime::now_utc()),
    );

    let fields = [
        (subscriptions::Column::OrderStatus, &patch.order_status),
        (subscriptions::Column::PaymentType, &patch.payment_type),
        (subscriptions::Column::PaymentStatus, &patch.payment_status),
        (subscriptions::Column::Notes, &patch.notes),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            update = update.col_expr(column, Expr::value(value.clone()));
        }
    }

    // Nullable column: a blank reference clears it
    if let Some(reference) = &patch.transaction_ref {
        update = update.col_expr(
            subscriptions::Column::TransactionRef,
            Expr::value(non_blank(Some(reference))),
        );
    }

    update
}
