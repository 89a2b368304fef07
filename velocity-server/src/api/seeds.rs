use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use velocity_types::{
    AdminSeedsResponse, CreateSeedRequest, DeleteSeedRequest, HunterResponse, Seed,
    SuccessResponse, UpdateSeedRequest, MAX_USER_SEEDS,
};

use super::{ApiError, ApiResult};
use crate::access::{current_viewer, require_profile};
use crate::db::is_unique_violation;
use crate::db::repositories::{CategoryRepository, SeedRepository};
use crate::state::AppState;

const INVALID_TERM: &str = "Invalid term";
const INVALID_REQUEST: &str = "Invalid request";
const SEED_LIMIT_REACHED: &str = "Maximum 3 seeds allowed. Delete one to add another.";
const DUPLICATE_SEED: &str = "This seed already exists";

/// POST /api/seeds - Add a discovery seed
///
/// Admin seeds have no owner; everyone else is capped at three.
pub async fn create_seed(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateSeedRequest>, JsonRejection>,
) -> ApiResult<Json<Seed>> {
    let viewer = current_viewer(&state, &headers)?;
    let Some(user_id) = viewer.user_id() else {
        return Err(ApiError::unauthorized());
    };
    if !viewer.can_manage_seeds() {
        return Err(ApiError::forbidden());
    }

    let Json(request) = payload.map_err(|_| ApiError::BadRequest(INVALID_TERM.to_string()))?;
    let term = request
        .term
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest(INVALID_TERM.to_string()))?;

    let repo = SeedRepository::new(state.db.pool.clone());
    if !viewer.is_admin && repo.count_by_user(&user_id)? >= MAX_USER_SEEDS {
        return Err(ApiError::BadRequest(SEED_LIMIT_REACHED.to_string()));
    }

    let owner = if viewer.is_admin { None } else { Some(user_id) };
    let category_id = request.category_id.filter(|id| *id > 0);

    match repo.create(term, category_id, owner) {
        Ok(seed) => {
            tracing::info!("Seed '{}' added by {}", seed.term, user_id);
            Ok(Json(seed))
        }
        Err(e) if is_unique_violation(&e) => Err(ApiError::BadRequest(DUPLICATE_SEED.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// PATCH /api/seeds - Pause or resume a seed (admin only)
pub async fn update_seed(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateSeedRequest>, JsonRejection>,
) -> ApiResult<Json<Seed>> {
    let viewer = current_viewer(&state, &headers)?;
    if !viewer.is_admin {
        return Err(ApiError::forbidden());
    }

    let invalid = || ApiError::BadRequest(INVALID_REQUEST.to_string());
    let Json(request) = payload.map_err(|_| invalid())?;
    let (Some(id), Some(is_active)) = (request.id.filter(|id| *id != 0), request.is_active) else {
        return Err(invalid());
    };

    let seed = SeedRepository::new(state.db.pool.clone())
        .set_active(id, is_active)?
        .ok_or_else(|| ApiError::NotFound("Seed not found".to_string()))?;

    Ok(Json(seed))
}

/// DELETE /api/seeds - Remove a seed. Non-admins may only remove their own.
pub async fn delete_seed(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DeleteSeedRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    let Some(user_id) = viewer.user_id() else {
        return Err(ApiError::unauthorized());
    };
    if !viewer.can_manage_seeds() {
        return Err(ApiError::forbidden());
    }

    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest(INVALID_REQUEST.to_string()))?;
    let id = request
        .id
        .filter(|id| *id != 0)
        .ok_or_else(|| ApiError::BadRequest(INVALID_REQUEST.to_string()))?;

    let repo = SeedRepository::new(state.db.pool.clone());
    if !viewer.is_admin {
        let owned = repo
            .get(id)?
            .map(|seed| seed.added_by_user_id == Some(user_id))
            .unwrap_or(false);
        if !owned {
            return Err(ApiError::forbidden());
        }
    }

    repo.delete(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /hunter - The signed-in user's tracked niches
pub async fn hunter(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<HunterResponse>> {
    let (profile, _) = require_profile(&state, &headers)?;
    let pool = state.db.pool.clone();

    let seeds = SeedRepository::new(pool.clone()).list_with_counts(Some(&profile.id))?;
    let categories = CategoryRepository::new(pool).list()?;

    Ok(Json(HunterResponse {
        can_track_niches: profile.subscription_tier.features().niche_tracking,
        slots_used: seeds.len() as i64,
        slot_limit: MAX_USER_SEEDS,
        seeds,
        categories,
    }))
}

/// GET /admin/seeds - Every seed with its trend yield (admin only)
pub async fn admin_seeds(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<AdminSeedsResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    if !viewer.is_admin {
        return Err(ApiError::forbidden());
    }

    let pool = state.db.pool.clone();
    let seeds = SeedRepository::new(pool.clone()).list_with_counts(None)?;
    let categories = CategoryRepository::new(pool).list()?;

    Ok(Json(AdminSeedsResponse { seeds, categories }))
}
