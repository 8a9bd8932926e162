use crate::support::{
    charged_subscription, create_customer, create_vendor, plain_subscription, purchase,
    setup_test_db,
};
use bizledger::{
    models::{
        balances::LedgerKey,
        cash::{BusinessTransactionRequest, DateRangeQuery},
    },
    services::{CashBookService, LedgerCoordinator},
    ApiError,
};
use entity::sea_orm_active_enums::BusinessTransactionKind;
use time::macros::date;

fn entry(kind: BusinessTransactionKind, amount: f64, day: time::Date) -> BusinessTransactionRequest {
    BusinessTransactionRequest {
        kind,
        category: Some("general".to_string()),
        amount,
        description: None,
        occurred_on: Some(day),
    }
}

#[tokio::test]
async fn test_profit_loss_combines_every_source() {
    let db = setup_test_db().await;
    let ledger = LedgerCoordinator::new(db.clone());
    let cash_book = CashBookService::new(db.clone());

    let vendor = create_vendor(&db, "Vendor").await;
    let key = LedgerKey::new(&vendor, "svc");
    let customer = create_customer(&db, "Nina").await;

    // Dated 2025-03-10
    ledger
        .record_credit_purchase(&purchase(&key, 20, 100.0))
        .await
        .unwrap();
    ledger
        .record_credit_return(&purchase(&key, 4, 20.0))
        .await
        .unwrap();

    // Starting 2025-03-15
    ledger
        .create_subscription(&charged_subscription(&customer, &key, 2, 60.0))
        .await
        .unwrap();
    ledger
        .create_subscription(&plain_subscription(&customer, 40.0))
        .await
        .unwrap();

    cash_book
        .record_transaction(&entry(
            BusinessTransactionKind::Income,
            25.0,
            date!(2025 - 03 - 20),
        ))
        .await
        .unwrap();
    cash_book
        .record_transaction(&entry(
            BusinessTransactionKind::Expense,
            15.0,
            date!(2025 - 03 - 21),
        ))
        .await
        .unwrap();
    // Outside the window below
    cash_book
        .record_transaction(&entry(
            BusinessTransactionKind::Expense,
            999.0,
            date!(2025 - 04 - 02),
        ))
        .await
        .unwrap();

    let report = cash_book
        .profit_loss(DateRangeQuery {
            from: Some(date!(2025 - 03 - 01)),
            to: Some(date!(2025 - 03 - 31)),
        })
        .await
        .unwrap();

    assert_eq!(report.subscription_revenue, 100.0);
    assert_eq!(report.other_income, 25.0);
    assert_eq!(report.credit_costs, 80.0);
    assert_eq!(report.expenses, 15.0);
    assert_eq!(report.net_profit, 30.0);

    let all_time = cash_book.profit_loss(DateRangeQuery::default()).await.unwrap();
    assert_eq!(all_time.expenses, 1014.0);
}

#[tokio::test]
async fn test_inverted_range_rejected() {
    let db = setup_test_db().await;
    let cash_book = CashBookService::new(db.clone());

    let result = cash_book
        .profit_loss(DateRangeQuery {
            from: Some(date!(2025 - 04 - 01)),
            to: Some(date!(2025 - 03 - 01)),
        })
        .await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
async fn test_transaction_book_crud() {
    let db = setup_test_db().await;
    let cash_book = CashBookService::new(db.clone());

    let first = cash_book
        .record_transaction(&entry(
            BusinessTransactionKind::Expense,
            10.0,
            date!(2025 - 01 - 05),
        ))
        .await
        .unwrap();
    let second = cash_book
        .record_transaction(&entry(
            BusinessTransactionKind::Income,
            30.0,
            date!(2025 - 02 - 05),
        ))
        .await
        .unwrap();

    let listed: Vec<String> = cash_book
        .list_transactions(DateRangeQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(listed, vec![second.id.clone(), first.id.clone()]);

    let january = cash_book
        .list_transactions(DateRangeQuery {
            from: Some(date!(2025 - 01 - 01)),
            to: Some(date!(2025 - 01 - 31)),
        })
        .await
        .unwrap();
    assert_eq!(january.len(), 1);

    assert!(matches!(
        cash_book
            .record_transaction(&entry(
                BusinessTransactionKind::Income,
                0.0,
                date!(2025 - 01 - 05)
            ))
            .await,
        Err(ApiError::BadRequest(_))
    ));

    cash_book.delete_transaction(&first.id).await.unwrap();
    assert!(matches!(
        cash_book.delete_transaction(&first.id).await,
        Err(ApiError::NotFound(_))
    ));
}
