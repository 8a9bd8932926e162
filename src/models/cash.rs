use entity::sea_orm_active_enums::BusinessTransactionKind;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use validator::Validate;

/// Request body for recording business income or an expense
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessTransactionRequest {
    pub kind: BusinessTransactionKind,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    pub description: Option<String>,
    pub occurred_on: Option<Date>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessTransactionRecord {
    pub id: String,
    pub kind: BusinessTransactionKind,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub occurred_on: Date,
    pub created_at: OffsetDateTime,
}

impl From<entity::business_transactions::Model> for BusinessTransactionRecord {
    fn from(m: entity::business_transactions::Model) -> Self {
        Self {
            id: m.id,
            kind: m.kind,
            category: m.category,
            amount: m.amount,
            description: m.description,
            occurred_on: m.occurred_on,
            created_at: m.created_at,
        }
    }
}

/// Inclusive date window; either bound may be open
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRangeQuery {
    pub fn contains(&self, day: Date) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// Profit/loss over a date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossReport {
    pub from: Option<Date>,
    pub to: Option<Date>,
    /// Sum of `amountPaid` for subscriptions starting in the window
    pub subscription_revenue: f64,
    pub other_income: f64,
    /// Vendor credit purchases minus vendor refunds
    pub credit_costs: f64,
    pub expenses: f64,
    pub net_profit: f64,
}
