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
        directory::{VendorRecord, VendorRequest},
    },
};

/// POST /api/v1/vendors
#[instrument(skip(state, request))]
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(request): Json<VendorRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<VendorRecord>>)> {
    let vendor = state.directory.create_vendor(&request).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(vendor.into()))))
}

/// GET /api/v1/vendors
#[instrument(skip(state))]
pub async fn list_vendors(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<Vec<VendorRecord>>>> {
    let vendors = state.directory.list_vendors().await?;
    Ok(Json(SuccessResponse::new(
        vendors.into_iter().map(VendorRecord::from).collect(),
    )))
}

/// GET /api/v1/vendors/{id}
#[instrument(skip(state))]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<VendorRecord>>> {
    let vendor = state.directory.get_vendor(&id).await?;
    Ok(Json(SuccessResponse::new(vendor.into())))
}

/// PUT /api/v1/vendors/{id}
#[instrument(skip(state, request))]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VendorRequest>,
) -> Result<Json<SuccessResponse<VendorRecord>>> {
    let vendor = state.directory.update_vendor(&id, &request).await?;
    Ok(Json(SuccessResponse::new(vendor.into())))
}

/// DELETE /api/v1/vendors/{id}
#[instrument(skip(state))]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.directory.delete_vendor(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
