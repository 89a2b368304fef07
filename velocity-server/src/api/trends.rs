use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use velocity_types::{
    Category, CategoryPageResponse, DashboardResponse, DashboardStats, GrowthFilter, Plan,
    PlanFeatures, PredictionsResponse, Profile, SortFilter, StatusFilter, SubscriptionTier,
    TrendDetailResponse, TrendStatus, TrendWithRelations, UNLIMITED_TRENDS_CAP,
};

use super::{ApiError, ApiResult};
use crate::access::current_viewer;
use crate::db::repositories::{CategoryRepository, DashboardQuery, SeedRepository, TrendRepository};
use crate::state::AppState;

const RELATED_LIMIT: i64 = 3;
const CATEGORY_PAGE_LIMIT: i64 = 50;
const TOP_PREDICTIONS_LIMIT: i64 = 6;
const EARLY_SIGNALS_LIMIT: i64 = 4;
const EARLY_SIGNAL_MIN_GROWTH: f64 = 50.0;

/// Dashboard query string. Unknown values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub growth: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl DashboardParams {
    fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string)
    }

    fn wants_my_niches(&self) -> bool {
        self.view.as_deref() == Some("my-niches")
    }
}

/// Dashboard listing shared by the session and API-key endpoints.
///
/// `features` decides the row limit, search access and field masking.
/// Query failures degrade to an empty list.
pub(crate) fn load_dashboard(
    state: &AppState,
    profile: Option<&Profile>,
    features: PlanFeatures,
    params: &DashboardParams,
) -> ApiResult<(Vec<TrendWithRelations>, bool)> {
    let search = params.search();
    if search.is_some() && !features.search_enabled {
        return Err(ApiError::Forbidden(
            "Search is available on the Pro plan".to_string(),
        ));
    }

    let pool = state.db.pool.clone();
    let my_niches_owner = profile.filter(|_| params.wants_my_niches());
    let seed_ids = match my_niches_owner {
        Some(owner) => Some(
            SeedRepository::new(pool.clone())
                .ids_by_user(&owner.id)
                .unwrap_or_else(|e| {
                    tracing::error!("Failed to load seeds for {}: {:#}", owner.id, e);
                    Vec::new()
                }),
        ),
        None => None,
    };
    let is_my_niches_view = seed_ids.is_some();

    let query = DashboardQuery {
        status: params
            .status
            .as_deref()
            .and_then(StatusFilter::parse)
            .unwrap_or_default(),
        growth: params
            .growth
            .as_deref()
            .and_then(GrowthFilter::parse)
            .unwrap_or_default(),
        sort: params
            .sort
            .as_deref()
            .and_then(SortFilter::parse)
            .unwrap_or_default(),
        search,
        seed_ids,
        limit: if is_my_niches_view {
            UNLIMITED_TRENDS_CAP
        } else {
            features.dashboard_limit()
        },
    };

    let trends = TrendRepository::new(pool)
        .list_dashboard(&query)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to load dashboard trends: {:#}", e);
            Vec::new()
        });

    Ok((
        trends.into_iter().map(|t| t.mask_for(&features)).collect(),
        is_my_niches_view,
    ))
}

/// GET /trends - Tier-limited dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DashboardParams>,
) -> ApiResult<Json<DashboardResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    let features = viewer.features();
    let (trends, is_my_niches_view) =
        load_dashboard(&state, viewer.profile.as_ref(), features, &params)?;

    let is_limited_by_plan = features
        .max_trends
        .map(|max| trends.len() as i64 >= max)
        .unwrap_or(false);

    Ok(Json(DashboardResponse {
        trends,
        tier: viewer.tier(),
        is_my_niches_view,
        is_limited_by_plan,
    }))
}

/// GET /trends/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let stats = TrendRepository::new(state.db.pool.clone()).stats()?;
    Ok(Json(stats))
}

/// GET /trends/:slug - Trend detail with related trends from its category
pub async fn trend_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<TrendDetailResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    let features = viewer.features();
    let repo = TrendRepository::new(state.db.pool.clone());

    let trend = repo
        .get_by_slug(&slug)?
        .ok_or_else(|| ApiError::NotFound("Trend not found".to_string()))?;
    let related = repo.related(&trend.trend, RELATED_LIMIT)?;

    Ok(Json(TrendDetailResponse {
        trend: trend.mask_for(&features),
        related: related.into_iter().map(|t| t.mask_for(&features)).collect(),
        forecast_locked: !features.forecast_visible,
    }))
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.db.pool.clone()).list()?;
    Ok(Json(categories))
}

/// GET /categories/:slug - Fastest growing trends in a category
pub async fn category_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<CategoryPageResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    let features = viewer.features();
    let pool = state.db.pool.clone();

    let category = CategoryRepository::new(pool.clone())
        .get_by_slug(&slug)?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
    let trends = TrendRepository::new(pool).list_by_category(category.id, CATEGORY_PAGE_LIMIT)?;

    Ok(Json(CategoryPageResponse {
        category,
        trends: trends.into_iter().map(|t| t.mask_for(&features)).collect(),
    }))
}

/// GET /predictions - Forecast board, Pro and above
pub async fn predictions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<PredictionsResponse>> {
    let viewer = current_viewer(&state, &headers)?;
    if !viewer.features().forecast_visible {
        return Err(ApiError::Forbidden(
            "Predictions are available on the Pro plan".to_string(),
        ));
    }

    let repo = TrendRepository::new(state.db.pool.clone());
    let top_predictions =
        repo.list_by_status_growth(TrendStatus::Exploding, None, TOP_PREDICTIONS_LIMIT)?;
    let early_signals = repo.list_by_status_growth(
        TrendStatus::Regular,
        Some(EARLY_SIGNAL_MIN_GROWTH),
        EARLY_SIGNALS_LIMIT,
    )?;

    Ok(Json(PredictionsResponse {
        top_predictions,
        early_signals,
    }))
}

/// GET /plans
pub async fn plans() -> Json<Vec<Plan>> {
    Json(SubscriptionTier::ALL.iter().map(|tier| tier.plan()).collect())
}
