use crate::{
    error::{ApiError, Result},
    models::{
        balances::{CreditTransactionRequest, LedgerKey},
        common::non_blank,
        subscriptions::{
            CreateBundleRequest, CreateSubscriptionRequest, DeletionSummary,
            SubscriptionMetadataPatch,
        },
    },
    services::{balance_ledger, subscription_store},
};
use entity::{
    credit_balances, customers, sea_orm_active_enums::VendorTransactionKind, subscriptions,
    vendor_transactions, vendors,
};
use sea_orm::{
    entity::*, query::*, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    PaginatorTrait, TransactionTrait,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// The only place a subscription or vendor credit transaction is written
/// together with its credit balance. Each public mutation runs in a single
/// database transaction: either every row change lands or none does.
pub struct LedgerCoordinator {
    db: DatabaseConnection,
}

impl LedgerCoordinator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Insert a subscription and consume its credits from the vendor balance
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create_subscription(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<subscriptions::Model> {
        request.validate()?;

        let txn = self.db.begin().await?;
        let subscription = self.insert_charged(request, None, &txn).await?;
        txn.commit().await?;

        info!(
            subscription_id = %subscription.id,
            credits_used = subscription.credits_used,
            "Created subscription"
        );

        Ok(subscription)
    }

    /// Insert every member under one new bundle id, all or nothing
    #[instrument(skip(self, request), fields(members = request.members.len()))]
    pub async fn create_bundle(
        &self,
        request: &CreateBundleRequest,
    ) -> Result<(String, Vec<subscriptions::Model>)> {
        request.validate()?;

        let bundle_id = Uuid::now_v7().to_string();
        let txn = self.db.begin().await?;

        let mut members = Vec::with_capacity(request.members.len());
        for member in &request.members {
            let subscription = self.insert_charged(member, Some(&bundle_id), &txn).await?;
            members.push(subscription);
        }

        txn.commit().await?;

        info!(
            bundle_id = %bundle_id,
            members = members.len(),
            "Created subscription bundle"
        );

        Ok((bundle_id, members))
    }

    #[instrument(skip(self))]
    pub async fn get_subscription(&self, id: &str) -> Result<subscriptions::Model> {
        subscription_store::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Subscription {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<subscriptions::Model>> {
        subscription_store::list(&self.db, customer_id).await
    }

    /// Members of a bundle; empty when the bundle has none (or was deleted)
    #[instrument(skip(self))]
    pub async fn list_bundle(&self, bundle_id: &str) -> Result<Vec<subscriptions::Model>> {
        subscription_store::list_by_bundle(&self.db, bundle_id).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_subscription_metadata(
        &self,
        id: &str,
        patch: &SubscriptionMetadataPatch,
    ) -> Result<subscriptions::Model> {
        validate_patch(patch)?;

        let txn = self.db.begin().await?;
        let updated = subscription_store::update_metadata(&txn, id, patch).await?;
        if updated == 0 {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Subscription {} not found", id)));
        }

        let subscription = subscription_store::find_by_id(&txn, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Subscription {} not found", id)))?;
        txn.commit().await?;

        Ok(subscription)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_bundle_metadata(
        &self,
        bundle_id: &str,
        patch: &SubscriptionMetadataPatch,
    ) -> Result<u64> {
        validate_patch(patch)?;

        let updated = subscription_store::update_bundle_metadata(&self.db, bundle_id, patch).await?;
        if updated == 0 {
            return Err(ApiError::NotFound(format!("Bundle {} not found", bundle_id)));
        }

        info!(bundle_id, updated, "Updated bundle metadata");
        Ok(updated)
    }

    /// Delete one subscription, giving its stored credits back to the balance
    #[instrument(skip(self))]
    pub async fn delete_subscription(&self, id: &str) -> Result<DeletionSummary> {
        let txn = self.db.begin().await?;

        let Some(row) = subscription_store::find_by_id(&txn, id).await? else {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Subscription {} not found", id)));
        };

        let credits_restored = reverse_charges(&txn, std::slice::from_ref(&row)).await?;
        let removed = subscription_store::delete_by_id(&txn, id).await?;
        txn.commit().await?;

        info!(subscription_id = id, credits_restored, "Deleted subscription");

        Ok(DeletionSummary {
            removed: removed as usize,
            credits_restored,
        })
    }

    /// Delete every member of a bundle, reversing each member's charge first
    #[instrument(skip(self))]
    pub async fn delete_bundle(&self, bundle_id: &str) -> Result<DeletionSummary> {
        let txn = self.db.begin().await?;

        let members = subscription_store::list_by_bundle(&txn, bundle_id).await?;
        if members.is_empty() {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Bundle {} not found", bundle_id)));
        }

        let credits_restored = reverse_charges(&txn, &members).await?;
        let removed = subscription_store::delete_by_bundle(&txn, bundle_id).await?;

        if removed as usize != members.len() {
            // Membership changed between read and delete; nothing is applied
            txn.rollback().await?;
            return Err(ApiError::Conflict(format!(
                "Bundle {} changed while being deleted",
                bundle_id
            )));
        }

        txn.commit().await?;

        info!(bundle_id, removed, credits_restored, "Deleted bundle");

        Ok(DeletionSummary {
            removed: removed as usize,
            credits_restored,
        })
    }

    // ------------------------------------------------------------------------
    // Vendor credit purchases and returns
    // ------------------------------------------------------------------------

    #[instrument(skip(self, request), fields(vendor_id = %request.vendor_id, credits = request.credits))]
    pub async fn record_credit_purchase(
        &self,
        request: &CreditTransactionRequest,
    ) -> Result<(vendor_transactions::Model, credit_balances::Model)> {
        self.record_vendor_transaction(request, VendorTransactionKind::Purchase)
            .await
    }

    #[instrument(skip(self, request), fields(vendor_id = %request.vendor_id, credits = request.credits))]
    pub async fn record_credit_return(
        &self,
        request: &CreditTransactionRequest,
    ) -> Result<(vendor_transactions::Model, credit_balances::Model)> {
        self.record_vendor_transaction(request, VendorTransactionKind::Return)
            .await
    }

    /// Vendor transactions newest first
    #[instrument(skip(self))]
    pub async fn list_vendor_transactions(
        &self,
        vendor_id: Option<&str>,
    ) -> Result<Vec<vendor_transactions::Model>> {
        let mut query = vendor_transactions::Entity::find();
        if let Some(vendor_id) = vendor_id {
            query = query.filter(vendor_transactions::Column::VendorId.eq(vendor_id));
        }

        let rows = query
            .order_by_desc(vendor_transactions::Column::OccurredOn)
            .order_by_desc(vendor_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Delete a purchase/return and undo its effect on the balance
    #[instrument(skip(self))]
    pub async fn delete_vendor_transaction(&self, id: &str) -> Result<credit_balances::Model> {
        let txn = self.db.begin().await?;

        let Some(row) = vendor_transactions::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!(
                "Vendor transaction {} not found",
                id
            )));
        };

        let key = LedgerKey::new(&row.vendor_id, &row.service_name);
        let balance = match row.kind {
            VendorTransactionKind::Purchase => {
                balance_ledger::remove_purchased(&txn, &key, row.credits).await?
            }
            VendorTransactionKind::Return => {
                balance_ledger::add_purchased(&txn, &key, row.credits).await?
            }
        };

        vendor_transactions::Entity::delete_by_id(row.id.clone())
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(
            transaction_id = id,
            kind = ?row.kind,
            credits = row.credits,
            "Deleted vendor transaction"
        );

        Ok(balance)
    }

    // ------------------------------------------------------------------------
    // Balances
    // ------------------------------------------------------------------------

    /// Explicitly create a zeroed balance row for a key
    #[instrument(skip(self))]
    pub async fn ensure_balance(&self, key: &LedgerKey) -> Result<credit_balances::Model> {
        let txn = self.db.begin().await?;
        ensure_vendor(&txn, &key.vendor_id).await?;
        balance_ledger::ensure_balance(&txn, key).await?;
        let balance = balance_ledger::get_balance(&txn, key)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Balance {} not found", key)))?;
        txn.commit().await?;
        Ok(balance)
    }

    #[instrument(skip(self))]
    pub async fn get_balance(&self, key: &LedgerKey) -> Result<credit_balances::Model> {
        balance_ledger::get_balance(&self.db, key)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Balance {} not found", key)))
    }

    #[instrument(skip(self))]
    pub async fn list_balances(
        &self,
        vendor_id: Option<&str>,
    ) -> Result<Vec<credit_balances::Model>> {
        balance_ledger::list_balances(&self.db, vendor_id).await
    }

    // ------------------------------------------------------------------------
    // Helpers (always run inside the caller's transaction)
    // ------------------------------------------------------------------------

    async fn insert_charged(
        &self,
        request: &CreateSubscriptionRequest,
        bundle_id: Option<&str>,
        txn: &DatabaseTransaction,
    ) -> Result<subscriptions::Model> {
        ensure_customer(txn, request.customer_id.trim()).await?;
        if let Some(vendor_id) = non_blank(request.vendor_id.as_deref()) {
            ensure_vendor(txn, &vendor_id).await?;
        }

        let subscription = subscription_store::insert(txn, request, bundle_id).await?;

        if let Some((key, credits)) = subscription_store::ledger_charge(&subscription) {
            let balance = balance_ledger::consume(txn, &key, credits).await?;

            if balance.remaining_credits < 0 {
                warn!(
                    ledger_key = %key,
                    remaining = balance.remaining_credits,
                    "Credit balance is over-allocated"
                );
            }
        }

        Ok(subscription)
    }

    async fn record_vendor_transaction(
        &self,
        request: &CreditTransactionRequest,
        kind: VendorTransactionKind,
    ) -> Result<(vendor_transactions::Model, credit_balances::Model)> {
        request.validate()?;

        let key = request.key();
        let now = time::OffsetDateTime::now_utc();

        let txn = self.db.begin().await?;
        ensure_vendor(&txn, &key.vendor_id).await?;

        let row = vendor_transactions::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            vendor_id: Set(key.vendor_id.clone()),
            service_name: Set(key.service_name.clone()),
            kind: Set(kind),
            credits: Set(request.credits),
            amount: Set(request.amount),
            occurred_on: Set(request.occurred_on.unwrap_or_else(|| now.date())),
            notes: Set(request.notes.clone().unwrap_or_default()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let balance = match kind {
            VendorTransactionKind::Purchase => {
                balance_ledger::add_purchased(&txn, &key, request.credits).await?
            }
            VendorTransactionKind::Return => {
                balance_ledger::remove_purchased(&txn, &key, request.credits).await?
            }
        };

        txn.commit().await?;

        info!(
            ledger_key = %key,
            kind = ?kind,
            credits = request.credits,
            remaining = balance.remaining_credits,
            "Recorded vendor credit transaction"
        );

        Ok((row, balance))
    }
}

/// Give back every stored charge. Amounts come from the rows, never the caller.
async fn reverse_charges<C: ConnectionTrait>(
    conn: &C,
    rows: &[subscriptions::Model],
) -> Result<i64> {
    // Members may sit on different keys, so the total can exceed any one balance
    let mut restored: i64 = 0;
    for row in rows {
        if let Some((key, credits)) = subscription_store::ledger_charge(row) {
            balance_ledger::restore(conn, &key, credits).await?;
            restored += i64::from(credits);
        }
    }
    Ok(restored)
}

fn validate_patch(patch: &SubscriptionMetadataPatch) -> Result<()> {
    patch.validate()?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one metadata field must be provided".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_customer<C: ConnectionTrait>(conn: &C, customer_id: &str) -> Result<()> {
    let exists = customers::Entity::find_by_id(customer_id.to_string())
        .count(conn)
        .await?
        > 0;
    if !exists {
        return Err(ApiError::NotFound(format!("Customer {} not found", customer_id)));
    }
    Ok(())
}

async fn ensure_vendor<C: ConnectionTrait>(conn: &C, vendor_id: &str) -> Result<()> {
    let exists = vendors::Entity::find_by_id(vendor_id.to_string())
        .count(conn)
        .await?
        > 0;
    if !exists {
        return Err(ApiError::NotFound(format!("Vendor {} not found", vendor_id)));
    }
    Ok(())
}
