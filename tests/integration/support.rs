// Test setup helpers

use bizledger::{
    models::{
        balances::{CreditTransactionRequest, LedgerKey},
        directory::{CustomerRequest, VendorRequest},
        subscriptions::CreateSubscriptionRequest,
    },
    services::{DirectoryService, LedgerCoordinator},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time::macros::date;

/// Fresh in-memory database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_customer(db: &DatabaseConnection, name: &str) -> String {
    DirectoryService::new(db.clone())
        .create_customer(&CustomerRequest {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create customer")
        .id
}

pub async fn create_vendor(db: &DatabaseConnection, name: &str) -> String {
    DirectoryService::new(db.clone())
        .create_vendor(&VendorRequest {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create vendor")
        .id
}

pub fn purchase(key: &LedgerKey, credits: i32, amount: f64) -> CreditTransactionRequest {
    CreditTransactionRequest {
        vendor_id: key.vendor_id.clone(),
        service_name: key.service_name.clone(),
        credits,
        amount,
        occurred_on: Some(date!(2025 - 03 - 10)),
        notes: None,
    }
}

/// Subscription without any vendor tie
pub fn plain_subscription(customer_id: &str, amount_paid: f64) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        customer_id: customer_id.to_string(),
        service_name: "IPTV 12 months".to_string(),
        start_date: Some(date!(2025 - 03 - 15)),
        amount_paid,
        ..Default::default()
    }
}

/// Subscription consuming `credits` from the balance at `key`
pub fn charged_subscription(
    customer_id: &str,
    key: &LedgerKey,
    credits: i32,
    amount_paid: f64,
) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        vendor_id: Some(key.vendor_id.clone()),
        vendor_service_name: Some(key.service_name.clone()),
        credits_used: credits,
        ..plain_subscription(customer_id, amount_paid)
    }
}

/// (remaining, used, purchased) for a key, zeros when the row is absent
pub async fn balance_of(ledger: &LedgerCoordinator, key: &LedgerKey) -> (i32, i32, i32) {
    match ledger.get_balance(key).await {
        Ok(b) => (b.remaining_credits, b.total_used, b.total_purchased),
        Err(_) => (0, 0, 0),
    }
}

/// Bring a key to remaining=100, used=50, purchased=150
pub async fn seed_balance(
    db: &DatabaseConnection,
    ledger: &LedgerCoordinator,
    key: &LedgerKey,
) {
    ledger
        .record_credit_purchase(&purchase(key, 150, 300.0))
        .await
        .expect("Failed to seed purchase");

    let filler = create_customer(db, "Seed customer").await;
    ledger
        .create_subscription(&charged_subscription(&filler, key, 50, 250.0))
        .await
        .expect("Failed to seed usage");
}
