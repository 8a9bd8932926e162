use crate::support::{balance_of, create_vendor, purchase, setup_test_db};
use bizledger::{
    models::balances::LedgerKey,
    services::{balance_ledger, LedgerCoordinator},
    ApiError,
};
use entity::sea_orm_active_enums::VendorTransactionKind;
use sea_orm::TransactionTrait;

#[tokio::test]
async fn test_ensure_balance_is_idempotent() {
    let db = setup_test_db().await;
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    assert!(balance_ledger::ensure_balance(&db, &key).await.unwrap());
    assert!(!balance_ledger::ensure_balance(&db, &key).await.unwrap());

    let balances = balance_ledger::list_balances(&db, Some(&vendor)).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].remaining_credits, 0);
}

#[tokio::test]
async fn test_restore_and_purchase_move_different_totals() {
    let db = setup_test_db().await;
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    let b = balance_ledger::add_purchased(&db, &key, 10).await.unwrap();
    assert_eq!((b.remaining_credits, b.total_purchased, b.total_used), (10, 10, 0));

    let b = balance_ledger::consume(&db, &key, 4).await.unwrap();
    assert_eq!((b.remaining_credits, b.total_purchased, b.total_used), (6, 10, 4));

    let b = balance_ledger::restore(&db, &key, 4).await.unwrap();
    assert_eq!((b.remaining_credits, b.total_purchased, b.total_used), (10, 10, 0));

    let b = balance_ledger::remove_purchased(&db, &key, 3).await.unwrap();
    assert_eq!((b.remaining_credits, b.total_purchased, b.total_used), (7, 7, 0));
}

#[tokio::test]
async fn test_negative_adjustment_rejected() {
    let db = setup_test_db().await;
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    assert!(matches!(
        balance_ledger::consume(&db, &key, -1).await,
        Err(ApiError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_lookup_is_exact_match() {
    let db = setup_test_db().await;
    let vendor = create_vendor(&db, "Vendor").await;

    balance_ledger::add_purchased(&db, &LedgerKey::new(&vendor, "svc"), 5)
        .await
        .unwrap();

    let other = balance_ledger::get_balance(&db, &LedgerKey::new(&vendor, "SVC"))
        .await
        .unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn test_adjustments_inside_rolled_back_transaction_vanish() {
    let db = setup_test_db().await;
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    let txn = db.begin().await.unwrap();
    balance_ledger::add_purchased(&txn, &key, 50).await.unwrap();
    txn.rollback().await.unwrap();

    assert!(balance_ledger::get_balance(&db, &key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_purchase_return_and_reversal_flow() {
    let db = setup_test_db().await;
    let ledger = LedgerCoordinator::new(db.clone());
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    let (bought, balance) = ledger
        .record_credit_purchase(&purchase(&key, 30, 90.0))
        .await
        .unwrap();
    assert_eq!(bought.kind, VendorTransactionKind::Purchase);
    assert_eq!(balance.remaining_credits, 30);

    let (returned, balance) = ledger
        .record_credit_return(&purchase(&key, 8, 24.0))
        .await
        .unwrap();
    assert_eq!(returned.kind, VendorTransactionKind::Return);
    assert_eq!(
        (balance.remaining_credits, balance.total_purchased, balance.total_used),
        (22, 22, 0)
    );

    assert_eq!(ledger.list_vendor_transactions(Some(&vendor)).await.unwrap().len(), 2);

    // Undoing the return puts the credits back on the purchased side
    let balance = ledger.delete_vendor_transaction(&returned.id).await.unwrap();
    assert_eq!(balance.total_purchased, 30);

    let balance = ledger.delete_vendor_transaction(&bought.id).await.unwrap();
    assert_eq!(
        (balance.remaining_credits, balance.total_purchased, balance.total_used),
        (0, 0, 0)
    );
    assert!(ledger.list_vendor_transactions(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_purchase_validation_and_unknown_vendor() {
    let db = setup_test_db().await;
    let ledger = LedgerCoordinator::new(db.clone());
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    assert!(matches!(
        ledger.record_credit_purchase(&purchase(&key, 0, 10.0)).await,
        Err(ApiError::BadRequest(_))
    ));

    let unknown = LedgerKey::new("ghost", "svc");
    assert!(matches!(
        ledger.record_credit_purchase(&purchase(&unknown, 5, 10.0)).await,
        Err(ApiError::NotFound(_))
    ));

    assert_eq!(balance_of(&ledger, &key).await, (0, 0, 0));
    assert!(ledger.list_balances(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_explicit_ensure_through_coordinator() {
    let db = setup_test_db().await;
    let ledger = LedgerCoordinator::new(db.clone());
    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");

    let balance = ledger.ensure_balance(&key).await.unwrap();
    assert_eq!(balance.remaining_credits, 0);
    assert_eq!(balance.service_name, "svc");

    assert!(matches!(
        ledger.ensure_balance(&LedgerKey::new("ghost", "svc")).await,
        Err(ApiError::NotFound(_))
    ));
}
