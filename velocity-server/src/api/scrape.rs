use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use velocity_types::{ErrorResponse, TriggerScrapeResponse};

use super::ApiError;
use crate::access::current_viewer;
use crate::state::AppState;

const TRIGGERED_MESSAGE: &str = "Scraper triggered successfully! The workflow will begin shortly.";

/// POST /api/trigger-scrape - Start the scraper workflow (admin only)
pub async fn trigger_scrape(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match current_viewer(&state, &headers) {
        Ok(viewer) if viewer.is_admin => {}
        Ok(_) => return ApiError::forbidden().into_response(),
        Err(e) => return e.into_response(),
    }

    match state.dispatcher.dispatch().await {
        Ok(()) => Json(TriggerScrapeResponse {
            success: true,
            message: Some(TRIGGERED_MESSAGE.to_string()),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Error triggering scrape: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to trigger scrape".to_string(),
                    details: None,
                }),
            )
                .into_response()
        }
    }
}

/// POST /functions/v1/trigger-scrape - Serverless-style relay
///
/// Any caller with an `Authorization` header may fire the workflow; when a
/// relay key is configured the header must carry it. Every failure is a 400
/// with the reason in `error`.
pub async fn relay_trigger_scrape(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match relay(&state, &headers).await {
        Ok(()) => Json(TriggerScrapeResponse {
            success: true,
            message: Some(TRIGGERED_MESSAGE.to_string()),
            error: None,
        })
        .into_response(),
        Err(message) => {
            tracing::error!("Error triggering scraper: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(TriggerScrapeResponse {
                    success: false,
                    message: None,
                    error: Some(message),
                }),
            )
                .into_response()
        }
    }
}

async fn relay(state: &AppState, headers: &HeaderMap) -> Result<(), String> {
    let auth = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    if let Some(key) = state.settings.github.relay_key.as_deref() {
        if auth.trim() != format!("Bearer {}", key) {
            return Err("Invalid Authorization header".to_string());
        }
    }

    state.dispatcher.dispatch().await.map_err(|e| e.to_string())
}
