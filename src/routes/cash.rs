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
        cash::{
            BusinessTransactionRecord, BusinessTransactionRequest, DateRangeQuery,
            ProfitLossReport,
        },
        common::SuccessResponse,
    },
};

/// POST /api/v1/transactions
#[instrument(skip(state, request))]
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(request): Json<BusinessTransactionRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<BusinessTransactionRecord>>)> {
    let row = state.cash_book.record_transaction(&request).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(row.into()))))
}

/// GET /api/v1/transactions
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<SuccessResponse<Vec<BusinessTransactionRecord>>>> {
    let rows = state.cash_book.list_transactions(range).await?;
    Ok(Json(SuccessResponse::new(
        rows.into_iter().map(BusinessTransactionRecord::from).collect(),
    )))
}

/// DELETE /api/v1/transactions/{id}
#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.cash_book.delete_transaction(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reports/profit-loss
#[instrument(skip(state))]
pub async fn profit_loss(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<SuccessResponse<ProfitLossReport>>> {
    let report = state.cash_book.profit_loss(range).await?;
    Ok(Json(SuccessResponse::new(report)))
}
