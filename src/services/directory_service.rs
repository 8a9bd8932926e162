use crate::{
    error::{ApiError, Result},
    models::{
        common::non_blank,
        directory::{CustomerRequest, VendorRequest},
    },
    services::subscription_store,
};
use entity::{credit_balances, customers, vendor_transactions, vendors};
use sea_orm::{entity::*, query::*, DatabaseConnection, PaginatorTrait, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Customers and vendors
pub struct DirectoryService {
    db: DatabaseConnection,
}

impl DirectoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request))]
    pub async fn create_customer(&self, request: &CustomerRequest) -> Result<customers::Model> {
        request.validate()?;

        let now = time::OffsetDateTime::now_utc();
        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            name: Set(request.name.trim().to_string()),
            phone: Set(non_blank(request.phone.as_deref()).unwrap_or_default()),
            email: Set(non_blank(request.email.as_deref()).unwrap_or_default()),
            notes: Set(request.notes.clone().unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(customer_id = %customer.id, "Created customer");
        Ok(customer)
    }

    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: &str,
        request: &CustomerRequest,
    ) -> Result<customers::Model> {
        request.validate()?;

        let customer = self.get_customer(id).await?;
        let mut active: customers::ActiveModel = customer.into();
        active.name = Set(request.name.trim().to_string());
        active.phone = Set(non_blank(request.phone.as_deref()).unwrap_or_default());
        active.email = Set(non_blank(request.email.as_deref()).unwrap_or_default());
        active.notes = Set(request.notes.clone().unwrap_or_default());
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        Ok(active.update(&self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: &str) -> Result<customers::Model> {
        customers::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Customer {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<customers::Model>> {
        let rows = customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Refuses while any subscription still references the customer
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: &str) -> Result<()> {
        let txn = self.db.begin().await?;

        let in_use = subscription_store::count_for_customer(&txn, id).await?;
        if in_use > 0 {
            txn.rollback().await?;
            return Err(ApiError::Conflict(format!(
                "Customer {} still has {} subscription(s)",
                id, in_use
            )));
        }

        let result = customers::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Customer {} not found", id)));
        }

        txn.commit().await?;
        info!(customer_id = id, "Deleted customer");
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn create_vendor(&self, request: &VendorRequest) -> Result<vendors::Model> {
        request.validate()?;

        let now = time::OffsetDateTime::now_utc();
        let vendor = vendors::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            name: Set(request.name.trim().to_string()),
            contact: Set(non_blank(request.contact.as_deref()).unwrap_or_default()),
            notes: Set(request.notes.clone().unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(vendor_id = %vendor.id, "Created vendor");
        Ok(vendor)
    }

    #[instrument(skip(self, request))]
    pub async fn update_vendor(&self, id: &str, request: &VendorRequest) -> Result<vendors::Model> {
        request.validate()?;

        let vendor = self.get_vendor(id).await?;
        let mut active: vendors::ActiveModel = vendor.into();
        active.name = Set(request.name.trim().to_string());
        active.contact = Set(non_blank(request.contact.as_deref()).unwrap_or_default());
        active.notes = Set(request.notes.clone().unwrap_or_default());
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        Ok(active.update(&self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, id: &str) -> Result<vendors::Model> {
        vendors::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Vendor {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(&self) -> Result<Vec<vendors::Model>> {
        let rows = vendors::Entity::find()
            .order_by_asc(vendors::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Balance rows are never deleted, so a vendor with ledger history stays
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, id: &str) -> Result<()> {
        let txn = self.db.begin().await?;

        let subscriptions = subscription_store::count_for_vendor(&txn, id).await?;
        let balances = credit_balances::Entity::find()
            .filter(credit_balances::Column::VendorId.eq(id))
            .count(&txn)
            .await?;
        let transactions = vendor_transactions::Entity::find()
            .filter(vendor_transactions::Column::VendorId.eq(id))
            .count(&txn)
            .await?;

        if subscriptions + balances + transactions > 0 {
            txn.rollback().await?;
            return Err(ApiError::Conflict(format!(
                "Vendor {} is referenced by {} subscription(s), {} balance(s) and {} transaction(s)",
                id, subscriptions, balances, transactions
            )));
        }

        let result = vendors::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(ApiError::NotFound(format!("Vendor {} not found", id)));
        }

        txn.commit().await?;
        info!(vendor_id = id, "Deleted vendor");
        Ok(())
    }
}
