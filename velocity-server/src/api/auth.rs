use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use velocity_types::{AccountResponse, LoginRequest, LoginResponse, SuccessResponse};

use super::{ApiError, ApiResult};
use crate::access::{require_profile, session_token};
use crate::db::repositories::ProfileRepository;
use crate::state::AppState;

/// POST /auth/login - Sign in by email, creating a free profile on first sight
///
/// Only served when `auth.email_login` is enabled.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    if !state.settings.auth.email_login {
        tracing::warn!("Rejected email login: EMAIL_LOGIN is disabled");
        return Err(ApiError::Forbidden("Email login is disabled".to_string()));
    }

    let email = payload
        .ok()
        .map(|Json(req)| req.email.trim().to_string())
        .filter(|email| !email.is_empty() && email.contains('@'))
        .ok_or_else(|| ApiError::BadRequest("Invalid email".to_string()))?;

    let repo = ProfileRepository::new(state.db.pool.clone());
    let profile = repo.get_or_create(&email)?;

    let session_token = state.session_manager.create_session(profile.id)?;
    let is_admin = state.settings.is_admin_email(&profile.email);

    Ok(Json(LoginResponse {
        profile,
        session_token,
        is_admin,
    }))
}

/// POST /auth/logout - End the session in `X-Session-Token`
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SuccessResponse>> {
    let token = session_token(&headers).ok_or_else(ApiError::unauthorized)?;
    state.session_manager.delete_session(token)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /auth/me - Current profile with its plan
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<AccountResponse>> {
    let (profile, is_admin) = require_profile(&state, &headers)?;
    let tier = profile.subscription_tier;

    Ok(Json(AccountResponse {
        profile,
        is_admin,
        features: tier.features(),
        plan: tier.details(),
    }))
}
