use crate::{
    error::{ApiError, Result},
    models::cash::{BusinessTransactionRequest, DateRangeQuery, ProfitLossReport},
};
use entity::{
    business_transactions,
    sea_orm_active_enums::{BusinessTransactionKind, VendorTransactionKind},
    subscriptions, vendor_transactions,
};
use sea_orm::{entity::*, query::*, DatabaseConnection};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Business income/expense book and the profit/loss summary
pub struct CashBookService {
    db: DatabaseConnection,
}

impl CashBookService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(kind = ?request.kind, amount = request.amount))]
    pub async fn record_transaction(
        &self,
        request: &BusinessTransactionRequest,
    ) -> Result<business_transactions::Model> {
        request.validate()?;

        let now = time::OffsetDateTime::now_utc();
        let row = business_transactions::ActiveModel {
            id: Set(Uuid::now_v7().to_string()),
            kind: Set(request.kind),
            category: Set(request.category.clone().unwrap_or_default()),
            amount: Set(request.amount),
            description: Set(request.description.clone().unwrap_or_default()),
            occurred_on: Set(request.occurred_on.unwrap_or_else(|| now.date())),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(transaction_id = %row.id, "Recorded business transaction");
        Ok(row)
    }

    /// Newest first within the window
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        range: DateRangeQuery,
    ) -> Result<Vec<business_transactions::Model>> {
        let mut query = business_transactions::Entity::find();
        if let Some(from) = range.from {
            query = query.filter(business_transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(business_transactions::Column::OccurredOn.lte(to));
        }

        let rows = query
            .order_by_desc(business_transactions::Column::OccurredOn)
            .order_by_desc(business_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        let result = business_transactions::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// Subscription revenue and other income, less vendor credit costs and
    /// expenses. Subscriptions count by start date, everything else by
    /// occurrence date.
    #[instrument(skip(self))]
    pub async fn profit_loss(&self, range: DateRangeQuery) -> Result<ProfitLossReport> {
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if to < from {
                return Err(ApiError::BadRequest(
                    "`to` must not be before `from`".to_string(),
                ));
            }
        }

        let mut subscriptions_query = subscriptions::Entity::find();
        let mut vendor_query = vendor_transactions::Entity::find();
        if let Some(from) = range.from {
            subscriptions_query =
                subscriptions_query.filter(subscriptions::Column::StartDate.gte(from));
            vendor_query = vendor_query.filter(vendor_transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = range.to {
            subscriptions_query =
                subscriptions_query.filter(subscriptions::Column::StartDate.lte(to));
            vendor_query = vendor_query.filter(vendor_transactions::Column::OccurredOn.lte(to));
        }

        let subscription_revenue: f64 = subscriptions_query
            .all(&self.db)
            .await?
            .iter()
            .map(|s| s.amount_paid)
            .sum();

        let credit_costs: f64 = vendor_query
            .all(&self.db)
            .await?
            .iter()
            .map(|t| match t.kind {
                VendorTransactionKind::Purchase => t.amount,
                VendorTransactionKind::Return => -t.amount,
            })
            .sum();

        let book = self.list_transactions(range).await?;
        let other_income: f64 = book
            .iter()
            .filter(|t| t.kind == BusinessTransactionKind::Income)
            .map(|t| t.amount)
            .sum();
        let expenses: f64 = book
            .iter()
            .filter(|t| t.kind == BusinessTransactionKind::Expense)
            .map(|t| t.amount)
            .sum();

        Ok(ProfitLossReport {
            from: range.from,
            to: range.to,
            subscription_revenue,
            other_income,
            credit_costs,
            expenses,
            net_profit: subscription_revenue + other_income - credit_costs - expenses,
        })
    }
}
