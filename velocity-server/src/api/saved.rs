use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use velocity_types::{SuccessResponse, TrendWithRelations};

use super::{ApiError, ApiResult};
use crate::access::require_profile;
use crate::db::repositories::{SavedTrendRepository, TrendRepository};
use crate::state::AppState;

/// GET /saved - Bookmarked trends, most recent first
pub async fn list_saved(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<TrendWithRelations>>> {
    let (profile, _) = require_profile(&state, &headers)?;
    let features = profile.subscription_tier.features();

    let trends = TrendRepository::new(state.db.pool.clone()).list_saved(&profile.id)?;
    Ok(Json(trends.into_iter().map(|t| t.mask_for(&features)).collect()))
}

/// POST /saved/:slug
pub async fn save_trend(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let (profile, _) = require_profile(&state, &headers)?;
    let pool = state.db.pool.clone();

    let trend_id = TrendRepository::new(pool.clone())
        .get_id_by_slug(&slug)?
        .ok_or_else(|| ApiError::NotFound("Trend not found".to_string()))?;
    SavedTrendRepository::new(pool).save(&profile.id, trend_id)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /saved/:slug
pub async fn unsave_trend(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    let (profile, _) = require_profile(&state, &headers)?;
    let pool = state.db.pool.clone();

    let trend_id = TrendRepository::new(pool.clone())
        .get_id_by_slug(&slug)?
        .ok_or_else(|| ApiError::NotFound("Trend not found".to_string()))?;
    SavedTrendRepository::new(pool).unsave(&profile.id, trend_id)?;

    Ok(Json(SuccessResponse { success: true }))
}
