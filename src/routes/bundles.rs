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
        common::{SuccessResponse, UpdatedData},
        subscriptions::{
            BundleCreatedData, CreateBundleRequest, DeletionSummary, SubscriptionMetadataPatch,
            SubscriptionRecord,
        },
    },
};

/// POST /api/v1/bundles
#[instrument(skip(state, request))]
pub async fn create_bundle(
    State(state): State<AppState>,
    Json(request): Json<CreateBundleRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<BundleCreatedData>>)> {
    let (bundle_id, members) = state.ledger.create_bundle(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(BundleCreatedData {
            bundle_id,
            subscription_ids: members.into_iter().map(|m| m.id).collect(),
        })),
    ))
}

/// GET /api/v1/bundles/{bundle_id}
#[instrument(skip(state))]
pub async fn list_bundle_members(
    State(state): State<AppState>,
    Path(bundle_id): Path<String>,
) -> Result<Json<SuccessResponse<Vec<SubscriptionRecord>>>> {
    let members = state.ledger.list_bundle(&bundle_id).await?;

    Ok(Json(SuccessResponse::new(
        members.into_iter().map(SubscriptionRecord::from).collect(),
    )))
}

/// PATCH /api/v1/bundles/{bundle_id}
#[instrument(skip(state, patch))]
pub async fn update_bundle_metadata(
    State(state): State<AppState>,
    Path(bundle_id): Path<String>,
    Json(patch): Json<SubscriptionMetadataPatch>,
) -> Result<Json<SuccessResponse<UpdatedData>>> {
    let updated = state
        .ledger
        .update_bundle_metadata(&bundle_id, &patch)
        .await?;
    Ok(Json(SuccessResponse::new(UpdatedData { updated })))
}

/// DELETE /api/v1/bundles/{bundle_id}
#[instrument(skip(state))]
pub async fn delete_bundle(
    State(state): State<AppState>,
    Path(bundle_id): Path<String>,
) -> Result<Json<SuccessResponse<DeletionSummary>>> {
    let summary = state.ledger.delete_bundle(&bundle_id).await?;
    Ok(Json(SuccessResponse::new(summary)))
}
