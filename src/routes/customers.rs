use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    error::Result,
    models::{
        common::SuccessResponse,
        directory::{CustomerRecord, CustomerRequest},
    },
};

/// POST /api/v1/customers
#[instrument(skip(state, request))]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<CustomerRecord>>)> {
    let customer = state.directory.create_customer(&request).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(customer.into()))))
}

/// GET /api/v1/customers
#[instrument(skip(state))]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<CustomerRecord>>>> {
    let customers = state.directory.list_customers().await?;
    Ok(Json(SuccessResponse::new(
        customers.into_iter().map(CustomerRecord::from).collect(),
    )))
}

/// GET /api/v1/customers/{id}
#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<CustomerRecord>>> {
    let customer = state.directory.get_customer(&id).await?;
    Ok(Json(SuccessResponse::new(customer.into())))
}

/// PUT /api/v1/customers/{id}
#[instrument(skip(state, request))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<SuccessResponse<CustomerRecord>>> {
    let customer = state.directory.update_customer(&id, &request).await?;
    Ok(Json(SuccessResponse::new(customer.into())))
}

/// DELETE /api/v1/customers/{id}
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.directory.delete_customer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
