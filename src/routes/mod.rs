// Route modules
pub mod balances;
pub mod bundles;
pub mod cash;
pub mod customers;
pub mod health;
pub mod subscriptions;
pub mod vendors;

use crate::{app_state::AppState, middleware::logging_middleware};
use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_millis(state.config.server.request_timeout_ms);
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    let subscription_routes = Router::new()
        .route(
            "/subscriptions",
            get(subscriptions::list_subscriptions).post(subscriptions::create_subscription),
        )
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get_subscription)
                .patch(subscriptions::update_subscription_metadata)
                .delete(subscriptions::delete_subscription),
        )
        .route("/bundles", post(bundles::create_bundle))
        .route(
            "/bundles/{bundle_id}",
            get(bundles::list_bundle_members)
                .patch(bundles::update_bundle_metadata)
                .delete(bundles::delete_bundle),
        );

    let ledger_routes = Router::new()
        .route(
            "/balances",
            get(balances::list_balances).post(balances::ensure_balance),
        )
        .route(
            "/balances/{vendor_id}/{service_name}",
            get(balances::get_balance),
        )
        .route("/credits/purchase", post(balances::record_credit_purchase))
        .route("/credits/return", post(balances::record_credit_return))
        .route(
            "/credits/transactions",
            get(balances::list_vendor_transactions),
        )
        .route(
            "/credits/transactions/{id}",
            delete(balances::delete_vendor_transaction),
        );

    let directory_routes = Router::new()
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/vendors",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/vendors/{id}",
            get(vendors::get_vendor)
                .put(vendors::update_vendor)
                .delete(vendors::delete_vendor),
        );

    let cash_routes = Router::new()
        .route(
            "/transactions",
            get(cash::list_transactions).post(cash::record_transaction),
        )
        .route("/transactions/{id}", delete(cash::delete_transaction))
        .route("/reports/profit-loss", get(cash::profit_loss));

    Router::new()
        .merge(subscription_routes)
        .merge(ledger_routes)
        .merge(directory_routes)
        .merge(cash_routes)
}

/// Any origin when none are configured (local desktop shell), otherwise the list
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
