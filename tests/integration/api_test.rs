use crate::support::setup_test_db;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bizledger::{
    config::{Config, DatabaseConfig, ServerConfig},
    routes::create_router,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = setup_test_db().await;
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: Vec::new(),
            request_timeout_ms: 5_000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
    };
    create_router(AppState::from_parts(db, config))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> String {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", value);
    value["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_subscription_round_trip_over_http() {
    let app = test_app().await;

    let customer = create(&app, "/api/v1/customers", json!({ "name": "Walid" })).await;
    let vendor = create(&app, "/api/v1/vendors", json!({ "name": "Vendor" })).await;

    let (status, purchase) = send(
        &app,
        Method::POST,
        "/api/v1/credits/purchase",
        Some(json!({
            "vendorId": vendor,
            "serviceName": "svc",
            "credits": 20,
            "amount": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(purchase["data"]["balance"]["remainingCredits"], 20);

    let subscription = create(
        &app,
        "/api/v1/subscriptions",
        json!({
            "customerId": customer,
            "serviceName": "IPTV",
            "startDate": "2025-03-15",
            "amountPaid": 45.0,
            "creditsUsed": 12,
            "vendorId": vendor,
            "vendorServiceName": "svc"
        }),
    )
    .await;

    let balance_uri = format!("/api/v1/balances/{}/svc", vendor);
    let (_, balance) = send(&app, Method::GET, &balance_uri, None).await;
    assert_eq!(balance["data"]["remainingCredits"], 8);
    assert_eq!(balance["data"]["totalUsed"], 12);

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/v1/subscriptions/{}", subscription),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["expirationDate"], "9999-12-31");
    assert_eq!(fetched["data"]["orderStatus"], "pending");

    let uri = format!("/api/v1/subscriptions/{}", subscription);
    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["creditsRestored"], 12);

    let (_, balance) = send(&app, Method::GET, &balance_uri, None).await;
    assert_eq!(balance["data"]["remainingCredits"], 20);
    assert_eq!(balance["data"]["totalUsed"], 0);

    let (status, error) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["success"], false);
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_bundle_endpoints() {
    let app = test_app().await;

    let customer = create(&app, "/api/v1/customers", json!({ "name": "Lina" })).await;
    let member = |service: &str| {
        json!({
            "customerId": customer,
            "serviceName": service,
            "startDate": "2025-03-15",
            "amountPaid": 10.0
        })
    };

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/bundles",
        Some(json!({ "members": [member("TV"), member("Radio")] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bundle_id = created["data"]["bundleId"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["subscriptionIds"].as_array().unwrap().len(), 2);

    let uri = format!("/api/v1/bundles/{}", bundle_id);
    let (status, patched) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "paymentStatus": "paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["data"]["updated"], 2);

    let (_, members) = send(&app, Method::GET, &uri, None).await;
    let members = members["data"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m["paymentStatus"] == "paid"));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_envelopes() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(json!({
            "customerId": "ghost",
            "serviceName": "IPTV",
            "startDate": "2025-03-15",
            "amountPaid": 0.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/subscriptions",
        Some(json!({
            "customerId": "ghost",
            "serviceName": "IPTV",
            "startDate": "2025-03-15",
            "amountPaid": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let customer = create(&app, "/api/v1/customers", json!({ "name": "Omar" })).await;
    create(
        &app,
        "/api/v1/subscriptions",
        json!({
            "customerId": customer,
            "serviceName": "IPTV",
            "startDate": "2025-03-15",
            "amountPaid": 5.0
        }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/customers/{}", customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_profit_loss_report_endpoint() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(json!({ "kind": "income", "amount": 40.0, "occurredOn": "2025-03-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, report) = send(
        &app,
        Method::GET,
        "/api/v1/reports/profit-loss?from=2025-03-01&to=2025-03-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["otherIncome"], 40.0);
    assert_eq!(report["data"]["netProfit"], 40.0);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/reports/profit-loss?from=2025-04-01&to=2025-03-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
