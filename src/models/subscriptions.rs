use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use validator::{Validate, ValidationError};

use super::common::non_blank;

/// Expiration stored for subscriptions created without one
pub const OPEN_ENDED_EXPIRATION: Date = time::macros::date!(9999 - 12 - 31);

// ============================================================================
// Request Models
// ============================================================================

/// Request body for creating a subscription (also used for bundle members)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_ledger_fields"))]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 1, max = 64))]
    pub customer_id: String,

    #[validate(length(min = 1, max = 255))]
    pub service_name: String,

    pub start_date: Option<Date>,

    pub expiration_date: Option<Date>,

    #[validate(range(exclusive_min = 0.0))]
    pub amount_paid: f64,

    #[validate(range(min = 0, max = 1_000_000))]
    #[serde(default)]
    pub credits_used: i32,

    pub vendor_id: Option<String>,

    #[validate(length(max = 255))]
    pub vendor_service_name: Option<String>,

    pub bundle_id: Option<String>,

    pub order_status: Option<String>,
    pub payment_type: Option<String>,
    pub payment_status: Option<String>,
    pub transaction_ref: Option<String>,
    pub status: Option<String>,
    pub classification: Option<String>,

    #[validate(range(min = 0.0))]
    pub discount_amount: Option<f64>,

    #[validate(length(max = 64))]
    pub mac_address: Option<String>,

    pub notes: Option<String>,
}

fn validate_ledger_fields(request: &CreateSubscriptionRequest) -> Result<(), ValidationError> {
    if request.start_date.is_none() {
        return Err(ValidationError::new("start_date_required")
            .with_message("startDate is required".into()));
    }

    let vendor = non_blank(request.vendor_id.as_deref());
    let vendor_service = non_blank(request.vendor_service_name.as_deref());

    if vendor.is_some() && vendor_service.is_none() {
        return Err(ValidationError::new("vendor_service_required")
            .with_message("vendorServiceName is required when vendorId is set".into()));
    }

    if vendor.is_none() && request.credits_used > 0 {
        return Err(ValidationError::new("vendor_required")
            .with_message("creditsUsed requires vendorId".into()));
    }

    if let (Some(start), Some(end)) = (request.start_date, request.expiration_date) {
        if end < start {
            return Err(ValidationError::new("expiration_before_start")
                .with_message("expirationDate is before startDate".into()));
        }
    }

    Ok(())
}

/// Request body for creating several subscriptions under one bundle id
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBundleRequest {
    #[validate(length(min = 1, max = 100), nested)]
    pub members: Vec<CreateSubscriptionRequest>,
}

/// Metadata-only changes; never touches credits or the vendor reference
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionMetadataPatch {
    #[validate(length(max = 64))]
    pub order_status: Option<String>,
    #[validate(length(max = 64))]
    pub payment_type: Option<String>,
    #[validate(length(max = 64))]
    pub payment_status: Option<String>,
    #[validate(length(max = 255))]
    pub transaction_ref: Option<String>,
    pub notes: Option<String>,
}

impl SubscriptionMetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.order_status.is_none()
            && self.payment_type.is_none()
            && self.payment_status.is_none()
            && self.transaction_ref.is_none()
            && self.notes.is_none()
    }
}

/// Query string for listing subscriptions
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubscriptionsQuery {
    pub customer_id: Option<String>,
}

// ============================================================================
// Response Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: String,
    pub customer_id: String,
    pub service_name: String,
    pub start_date: Date,
    pub expiration_date: Date,
    pub amount_paid: f64,
    pub credits_used: i32,
    pub vendor_id: Option<String>,
    pub vendor_service_name: Option<String>,
    pub bundle_id: Option<String>,
    pub order_status: String,
    pub payment_type: String,
    pub payment_status: String,
    pub transaction_ref: Option<String>,
    pub status: String,
    pub classification: String,
    pub discount_amount: f64,
    pub mac_address: String,
    pub notes: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<entity::subscriptions::Model> for SubscriptionRecord {
    fn from(m: entity::subscriptions::Model) -> Self {
        Self {
            id: m.id,
            customer_id: m.customer_id,
            service_name: m.service_name,
            start_date: m.start_date,
            expiration_date: m.expiration_date,
            amount_paid: m.amount_paid,
            credits_used: m.credits_used,
            vendor_id: m.vendor_id,
            vendor_service_name: m.vendor_service_name,
            bundle_id: m.bundle_id,
            order_status: m.order_status,
            payment_type: m.payment_type,
            payment_status: m.payment_status,
            transaction_ref: m.transaction_ref,
            status: m.status,
            classification: m.classification,
            discount_amount: m.discount_amount,
            mac_address: m.mac_address,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Result of creating a bundle
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleCreatedData {
    pub bundle_id: String,
    pub subscription_ids: Vec<String>,
}

/// Result of deleting a subscription or a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub removed: usize,
    pub credits_restored: i64,
}
