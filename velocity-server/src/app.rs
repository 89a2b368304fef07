use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::rate_limit::{self, RateLimiter};
use crate::state::AppState;

/// Build the full HTTP router for `state`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let rate_limiter = RateLimiter::new(
        state.settings.rate_limit.max_requests,
        state.settings.rate_limit.window_seconds,
    );

    Router::new()
        .route("/health", get(api::site::health_check))
        .route("/sitemap.xml", get(api::site::sitemap))
        // Authentication routes
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Trend pages
        .route("/trends", get(api::trends::dashboard))
        .route("/trends/stats", get(api::trends::stats))
        .route("/trends/:slug", get(api::trends::trend_detail))
        .route("/categories", get(api::trends::list_categories))
        .route("/categories/:slug", get(api::trends::category_page))
        .route("/predictions", get(api::trends::predictions))
        .route("/plans", get(api::trends::plans))
        // Saved trends
        .route("/saved", get(api::saved::list_saved))
        .route(
            "/saved/:slug",
            post(api::saved::save_trend).delete(api::saved::unsave_trend),
        )
        // Niche hunter and admin
        .route("/hunter", get(api::seeds::hunter))
        .route("/admin/seeds", get(api::seeds::admin_seeds))
        .route(
            "/api/seeds",
            post(api::seeds::create_seed)
                .patch(api::seeds::update_seed)
                .delete(api::seeds::delete_seed),
        )
        // Scraper trigger
        .route("/api/trigger-scrape", post(api::scrape::trigger_scrape))
        .route(
            "/functions/v1/trigger-scrape",
            post(api::scrape::relay_trigger_scrape),
        )
        // Business features
        .route("/export/trends.csv", get(api::export::export_csv))
        .route("/settings", get(api::settings::get_settings))
        .route("/settings/api-key", post(api::export::rotate_api_key))
        .route("/v1/trends", get(api::export::api_trends))
        .with_state(state)
        .layer(middleware::from_fn(rate_limit::rate_limit_middleware))
        .layer(axum::Extension(rate_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
