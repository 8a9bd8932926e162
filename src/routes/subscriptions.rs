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
        common::{CreatedData, SuccessResponse},
        subscriptions::{
            CreateSubscriptionRequest, DeletionSummary, ListSubscriptionsQuery,
            SubscriptionMetadataPatch, SubscriptionRecord,
        },
    },
};

/// POST /api/v1/subscriptions
#[instrument(skip(state, request))]
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SuccessResponse<CreatedData>>)> {
    let subscription = state.ledger.create_subscription(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(CreatedData {
            id: subscription.id,
        })),
    ))
}

/// GET /api/v1/subscriptions
#[instrument(skip(state))]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> Result<Json<SuccessResponse<Vec<SubscriptionRecord>>>> {
    let rows = state
        .ledger
        .list_subscriptions(query.customer_id.as_deref())
        .await?;

    Ok(Json(SuccessResponse::new(
        rows.into_iter().map(SubscriptionRecord::from).collect(),
    )))
}

/// GET /api/v1/subscriptions/{id}
#[instrument(skip(state))]
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<SubscriptionRecord>>> {
    let subscription = state.ledger.get_subscription(&id).await?;
    Ok(Json(SuccessResponse::new(subscription.into())))
}

/// PATCH /api/v1/subscriptions/{id}
#[instrument(skip(state, patch))]
pub async fn update_subscription_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SubscriptionMetadataPatch>,
) -> Result<Json<SuccessResponse<SubscriptionRecord>>> {
    let subscription = state
        .ledger
        .update_subscription_metadata(&id, &patch)
        .await?;
    Ok(Json(SuccessResponse::new(subscription.into())))
}

/// DELETE /api/v1/subscriptions/{id}
#[instrument(skip(state))]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse<DeletionSummary>>> {
    let summary = state.ledger.delete_subscription(&id).await?;
    Ok(Json(SuccessResponse::new(summary)))
}
