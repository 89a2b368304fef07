use axum::{extract::State, http::HeaderMap, Json};

use velocity_types::SettingsResponse;

use super::ApiResult;
use crate::access::require_profile;
use crate::db::repositories::ProfileRepository;
use crate::state::AppState;

/// GET /settings - Account, plan and API key status
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SettingsResponse>> {
    let (profile, _) = require_profile(&state, &headers)?;
    let has_api_key = ProfileRepository::new(state.db.pool.clone()).has_api_key(&profile.id)?;
    let tier = profile.subscription_tier;

    Ok(Json(SettingsResponse {
        profile,
        plan: tier.details(),
        features: tier.features(),
        has_api_key,
    }))
}
