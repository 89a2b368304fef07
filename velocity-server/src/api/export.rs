use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};

use velocity_types::{ApiKeyResponse, DashboardResponse, TrendWithRelations};

use super::trends::{load_dashboard, DashboardParams};
use super::{ApiError, ApiResult};
use crate::access::{bearer_token, require_profile};
use crate::db::repositories::{ProfileRepository, TrendRepository};
use crate::state::AppState;

const API_KEY_PREFIX: &str = "vl_sk_live_";

const CSV_HEADER: &str = "name,slug,category,status,current_volume,growth_percentage,velocity_score,forecast_status,prediction_confidence,is_breakout,added_at";

/// Quote a CSV field when it contains a delimiter, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(trend: &TrendWithRelations) -> String {
    let t = &trend.trend;
    let fields = [
        t.name.clone(),
        t.slug.clone(),
        trend
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        t.status.as_str().to_string(),
        t.current_volume.to_string(),
        t.growth_percentage.to_string(),
        t.velocity_score.map(|v| v.to_string()).unwrap_or_default(),
        t.forecast_status
            .map(|f| f.as_str().to_string())
            .unwrap_or_default(),
        t.prediction_confidence
            .map(|c| c.to_string())
            .unwrap_or_default(),
        t.is_breakout.to_string(),
        t.added_at.to_rfc3339(),
    ];
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn trends_to_csv(trends: &[TrendWithRelations]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push_str("\r\n");
    for trend in trends {
        out.push_str(&csv_row(trend));
        out.push_str("\r\n");
    }
    out
}

/// GET /export/trends.csv - Business plan export
pub async fn export_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let (profile, _) = require_profile(&state, &headers)?;
    if !profile.subscription_tier.features().export_enabled {
        return Err(ApiError::Forbidden(
            "CSV Export is a Business Feature".to_string(),
        ));
    }

    let trends = TrendRepository::new(state.db.pool.clone()).list_for_export()?;
    tracing::info!("Exporting {} trends for {}", trends.len(), profile.id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"velocity-trends.csv\"",
            ),
        ],
        trends_to_csv(&trends),
    ))
}

pub fn generate_api_key() -> String {
    format!("{}{}", API_KEY_PREFIX, uuid::Uuid::new_v4().simple())
}

/// POST /settings/api-key - Issue a new key, replacing any previous one
pub async fn rotate_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiKeyResponse>> {
    let (profile, _) = require_profile(&state, &headers)?;
    if !profile.subscription_tier.features().api_access {
        return Err(ApiError::Forbidden(
            "API access is a Business Feature".to_string(),
        ));
    }

    let api_key = generate_api_key();
    ProfileRepository::new(state.db.pool.clone()).set_api_key(&profile.id, &api_key)?;
    tracing::info!("Rotated API key for {}", profile.id);

    Ok(Json(ApiKeyResponse { api_key }))
}

/// GET /v1/trends - Dashboard listing for API key holders, unmasked
pub async fn api_trends(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let key = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
    let profile = ProfileRepository::new(state.db.pool.clone())
        .get_by_api_key(key)?
        .ok_or_else(ApiError::unauthorized)?;

    let features = profile.subscription_tier.features();
    if !features.api_access {
        return Err(ApiError::forbidden());
    }

    let (trends, is_my_niches_view) = load_dashboard(&state, Some(&profile), features, &params)?;

    Ok(Json(DashboardResponse {
        trends,
        tier: profile.subscription_tier,
        is_my_niches_view,
        is_limited_by_plan: false,
    }))
}
