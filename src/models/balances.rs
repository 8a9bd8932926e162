use entity::sea_orm_active_enums::VendorTransactionKind;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use validator::Validate;

/// Identifies one credit balance row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerKey {
    pub vendor_id: String,
    pub service_name: String,
}

impl LedgerKey {
    pub fn new(vendor_id: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            service_name: service_name.into(),
        }
    }
}

impl std::fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.vendor_id, self.service_name)
    }
}

/// Credit balance as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalanceRecord {
    pub vendor_id: String,
    pub service_name: String,
    pub remaining_credits: i32,
    pub total_purchased: i32,
    pub total_used: i32,
    pub last_updated: OffsetDateTime,
}

impl From<entity::credit_balances::Model> for CreditBalanceRecord {
    fn from(m: entity::credit_balances::Model) -> Self {
        Self {
            vendor_id: m.vendor_id,
            service_name: m.service_name,
            remaining_credits: m.remaining_credits,
            total_purchased: m.total_purchased,
            total_used: m.total_used,
            last_updated: m.last_updated,
        }
    }
}

/// Query string for listing balances
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBalancesQuery {
    pub vendor_id: Option<String>,
}

/// Request body for buying credits from, or returning credits to, a vendor
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransactionRequest {
    #[validate(length(min = 1, max = 64))]
    pub vendor_id: String,

    #[validate(length(min = 1, max = 255))]
    pub service_name: String,

    #[validate(range(min = 1, max = 1_000_000))]
    pub credits: i32,

    /// Money paid (purchase) or refunded (return)
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub amount: f64,

    pub occurred_on: Option<Date>,

    pub notes: Option<String>,
}

impl CreditTransactionRequest {
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.vendor_id.trim(), self.service_name.trim())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVendorTransactionsQuery {
    pub vendor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorTransactionRecord {
    pub id: String,
    pub vendor_id: String,
    pub service_name: String,
    pub kind: VendorTransactionKind,
    pub credits: i32,
    pub amount: f64,
    pub occurred_on: Date,
    pub notes: String,
    pub created_at: OffsetDateTime,
}

impl From<entity::vendor_transactions::Model> for VendorTransactionRecord {
    fn from(m: entity::vendor_transactions::Model) -> Self {
        Self {
            id: m.id,
            vendor_id: m.vendor_id,
            service_name: m.service_name,
            kind: m.kind,
            credits: m.credits,
            amount: m.amount,
            occurred_on: m.occurred_on,
            notes: m.notes,
            created_at: m.created_at,
        }
    }
}

/// Response for a recorded purchase/return: the transaction and the balance after it
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransactionData {
    pub transaction: VendorTransactionRecord,
    pub balance: CreditBalanceRecord,
}
