use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    error::Result,
    models::{
        balances::{
            CreditBalanceRecord, CreditTransactionData, CreditTransactionRequest, LedgerKey,
            ListBalancesQuery, ListVendorTransactionsQuery, VendorTransactionRecord,
        },
        common::SuccessResponse,
    },
};

/// GET /api/v1/balances
#[instrument(skip(state))]
pub async fn list_balances(
    State(state): State<AppState>,
    Query(query): Query<ListBalancesQuery>,
) -> Result<Json<SuccessResponse<Vec<CreditBalanceRecord>>>> {
    let balances = state
        .ledger
        .list_balances(query.vendor_id.as_deref())
        .await?;

    Ok(Json(SuccessResponse::new(
        balances.into_iter().map(CreditBalanceRecord::from).collect(),
    )))
}

/// POST /api/v1/balances
#[instrument(skip(state))]
pub async fn ensure_balance(
    State(state): State<AppState>,
    Json(key): Json<LedgerKey>,
) -> Result<Json<SuccessResponse<CreditBalanceRecord>>> {
    let balance = state.ledger.ensure_balance(&key).await?;
    Ok(Json(SuccessResponse::new(balance.into())))
}

/// GET /api/v1/balances/{vendor_id}/{service_name}
#[instrument(skip(state))]
pub async fn get_balance(
    State(state): State<AppState>,
    Path((vendor_id, service_name)): Path<(String, String)>,
) -> Result<Json<SuccessResponse<CreditBalanceRecord>>> {
    let balance = state
        .ledger
        .get_balance(&LedgerKey::new(vendor_id, service_name))
        .await?;
    Ok(Json(SuccessResponse::new(balance.into())))
}

/// POST /api/v1/credits/purchase
#[instrument(skip(state, request))]
pub async fn record_credit_purchase(
    State(state): State<AppState>,
    Json(request): Json<CreditTransactionRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<CreditTransactionData>>)> {
    let (transaction, balance) = state.ledger.record_credit_purchase(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(CreditTransactionData {
            transaction: transaction.into(),
            balance: balance.into(),
        })),
    ))
}

/// POST /api/v1/credits/return
#[instrument(skip(state, request))]
pub async fn record_credit_return(
    State(state): State<AppState>,
    Json(request): Json<CreditTransactionRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<CreditTransactionData>>)> {
    let (transaction, balance) = state.ledger.record_credit_return(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(CreditTransactionData {
            transaction: transaction.into(),
            balance: balance.into(),
        })),
    ))
}

/// GET /api/v1/credits/transactions
#[instrument(skip(state))]
pub async fn list_vendor_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListVendorTransactionsQuery>,
) -> Result<Json<SuccessResponse<Vec<VendorTransactionRecord>>>> {
    let rows = state
        .ledger
        .list_vendor_transactions(query.vendor_id.as_deref())
        .await?;

    Ok(Json(SuccessResponse::new(
        rows.into_iter().map(VendorTransactionRecord::from).collect(),
    )))
}

/// DELETE /api/v1/credits/transactions/{id}
#[instrument(skip(state))]
pub async fn delete_vendor_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<CreditBalanceRecord>>> {
    let balance = state.ledger.delete_vendor_transaction(&id).await?;
    Ok(Json(SuccessResponse::new(balance.into())))
}
