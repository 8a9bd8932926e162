//! Balance ledger store: point adjustments of `credit_balances` rows.
//!
//! Every function takes the connection it runs on, so callers can pass an open
//! `DatabaseTransaction` and have the adjustment commit or roll back together
//! with the row that caused it. Adjustments are single arithmetic `UPDATE`
//! statements, so concurrent writers never overwrite each other's deltas.
//!
//! Invariant kept by every adjustment:
//! `total_purchased - total_used == remaining_credits`.

use crate::{
    error::{ApiError, Result},
    models::balances::LedgerKey,
};
use anyhow::anyhow;
use entity::credit_balances;
use sea_orm::{
    entity::*, query::*, sea_query::Expr, sea_query::OnConflict, ActiveValue::NotSet,
    ConnectionTrait,
};
use tracing::{debug, info, instrument};

/// The four ways a balance row can move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Credits bought from the vendor
    Purchase,
    /// Credits handed back to the vendor, or a deleted purchase
    PurchaseReversal,
    /// Credits consumed by a new subscription
    Consume,
    /// Credits given back by a deleted subscription
    Restore,
}

impl Adjustment {
    /// (remaining, total_purchased, total_used) deltas for `amount` credits
    pub fn deltas(self, amount: i32) -> (i32, i32, i32) {
        match self {
            Adjustment::Purchase => (amount, amount, 0),
            Adjustment::PurchaseReversal => (-amount, -amount, 0),
            Adjustment::Consume => (-amount, 0, amount),
            Adjustment::Restore => (amount, 0, -amount),
        }
    }
}

/// Create a zeroed balance row for `key` unless one already exists.
///
/// Returns true when a row was created.
#[instrument(skip(conn))]
pub async fn ensure_balance<C: ConnectionTrait>(conn: &C, key: &LedgerKey) -> Result<bool> {
    let now = time::OffsetDateTime::now_utc();

    let row = credit_balances::ActiveModel {
        id: NotSet,
        vendor_id: Set(key.vendor_id.clone()),
        service_name: Set(key.service_name.clone()),
        remaining_credits: Set(0),
        total_purchased: Set(0),
        total_used: Set(0),
        last_updated: Set(now),
        created_at: Set(now),
    };

    let inserted = credit_balances::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                credit_balances::Column::VendorId,
                credit_balances::Column::ServiceName,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    if inserted > 0 {
        info!(ledger_key = %key, "Created credit balance row");
    }

    Ok(inserted > 0)
}

/// Apply `adjustment` of `amount` credits to the row for `key`, creating the
/// row first if needed. Returns the row as it stands afterwards.
#[instrument(skip(conn))]
pub async fn adjust<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
    adjustment: Adjustment,
    amount: i32,
) -> Result<credit_balances::Model> {
    if amount < 0 {
        return Err(ApiError::BadRequest(format!(
            "Credit adjustment must not be negative (got {})",
            amount
        )));
    }

    ensure_balance(conn, key).await?;

    let (remaining, purchased, used) = adjustment.deltas(amount);
    let now = time::OffsetDateTime::now_utc();

    let result = credit_balances::Entity::update_many()
        .col_expr(
            credit_balances::Column::RemainingCredits,
            Expr::col(credit_balances::Column::RemainingCredits).add(remaining),
        )
        .col_expr(
            credit_balances::Column::TotalPurchased,
            Expr::col(credit_balances::Column::TotalPurchased).add(purchased),
        )
        .col_expr(
            credit_balances::Column::TotalUsed,
            Expr::col(credit_balances::Column::TotalUsed).add(used),
        )
        .col_expr(credit_balances::Column::LastUpdated, Expr::value(now))
        .filter(credit_balances::Column::VendorId.eq(key.vendor_id.as_str()))
        .filter(credit_balances::Column::ServiceName.eq(key.service_name.as_str()))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        return Err(ApiError::Internal(anyhow!(
            "Expected one balance row for {}, updated {}",
            key,
            result.rows_affected
        )));
    }

    let balance = get_balance(conn, key).await?.ok_or_else(|| {
        ApiError::Internal(anyhow!("Balance row for {} vanished after update", key))
    })?;

    debug!(
        ledger_key = %key,
        ?adjustment,
        amount,
        remaining = balance.remaining_credits,
        purchased = balance.total_purchased,
        used = balance.total_used,
        "Adjusted credit balance"
    );

    Ok(balance)
}

/// Purchase path: remaining += amount, total_purchased += amount
pub async fn add_purchased<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
    amount: i32,
) -> Result<credit_balances::Model> {
    adjust(conn, key, Adjustment::Purchase, amount).await
}

/// Vendor return path: remaining -= amount, total_purchased -= amount
pub async fn remove_purchased<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
    amount: i32,
) -> Result<credit_balances::Model> {
    adjust(conn, key, Adjustment::PurchaseReversal, amount).await
}

/// Subscription creation: remaining -= amount, total_used += amount.
/// Remaining may go negative.
pub async fn consume<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
    amount: i32,
) -> Result<credit_balances::Model> {
    adjust(conn, key, Adjustment::Consume, amount).await
}

/// Subscription deletion: remaining += amount, total_used -= amount
pub async fn restore<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
    amount: i32,
) -> Result<credit_balances::Model> {
    adjust(conn, key, Adjustment::Restore, amount).await
}

/// Exact-match lookup by ledger key
pub async fn get_balance<C: ConnectionTrait>(
    conn: &C,
    key: &LedgerKey,
) -> Result<Option<credit_balances::Model>> {
    let balance = credit_balances::Entity::find()
        .filter(credit_balances::Column::VendorId.eq(key.vendor_id.as_str()))
        .filter(credit_balances::Column::ServiceName.eq(key.service_name.as_str()))
        .one(conn)
        .await?;

    Ok(balance)
}

/// All balances, optionally for one vendor, ordered by vendor then service
pub async fn list_balances<C: ConnectionTrait>(
    conn: &C,
    vendor_id: Option<&str>,
) -> Result<Vec<credit_balances::Model>> {
    let mut query = credit_balances::Entity::find();
    if let Some(vendor_id) = vendor_id {
        query = query.filter(credit_balances::Column::VendorId.eq(vendor_id));
    }

    let balances = query
        .order_by_asc(credit_balances::Column::VendorId)
        .order_by_asc(credit_balances::Column::ServiceName)
        .all(conn)
        .await?;

    Ok(balances)
}
