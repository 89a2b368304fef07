mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{
    login, send, send_raw, test_app, test_app_with, test_settings, TestRequest, ADMIN,
    BUSINESS_USER, FREE_USER, PRO_USER,
};
use velocity_types::SuccessResponse;

fn slugs(trends: &Value) -> Vec<String> {
    trends
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_anonymous_dashboard_is_free_tier() {
    let app = test_app();
    let (status, body) = send(&app, TestRequest::new("GET", "/trends")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "free");
    assert_eq!(body["is_my_niches_view"], false);
    assert_eq!(body["is_limited_by_plan"], true);

    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 10);
    for trend in trends {
        assert!(trend["velocity_score"].is_null());
        assert!(trend["forecast_status"].is_null());
        assert!(trend["prediction_confidence"].is_null());
        assert_ne!(trend["status"], "discovered");
        assert!(trend["category"].is_object());
        assert_eq!(trend["metrics"].as_array().unwrap().len(), 12);
    }
}

#[tokio::test]
async fn test_pro_dashboard_is_unlimited_and_unmasked() {
    let app = test_app();
    let token = login(&app, PRO_USER).await;
    let (status, body) = send(&app, TestRequest::new("GET", "/trends").token(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tier"], "pro");
    assert_eq!(body["is_limited_by_plan"], false);
    let trends = body["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 21);
    assert!(!slugs(&body["trends"]).contains(&"nootropic-gummies".to_string()));
    assert!(trends.iter().any(|t| t["velocity_score"].is_number()));
}

#[tokio::test]
async fn test_dashboard_filters_and_sorting() {
    let app = test_app();
    let token = login(&app, PRO_USER).await;

    let (_, body) = send(
        &app,
        TestRequest::new("GET", "/trends?status=exploding&sort=growth&growth=500").token(&token),
    )
    .await;
    let found = slugs(&body["trends"]);
    assert_eq!(found[0], "rag-systems");
    for trend in body["trends"].as_array().unwrap() {
        assert_eq!(trend["status"], "exploding");
        assert!(trend["growth_percentage"].as_f64().unwrap() >= 500.0);
    }

    let (_, body) = send(
        &app,
        TestRequest::new("GET", "/trends?sort=velocity").token(&token),
    )
    .await;
    assert_eq!(body["trends"][0]["velocity_score"], 98);

    // Unknown values fall back to the defaults
    let (status, body) = send(
        &app,
        TestRequest::new("GET", "/trends?status=bogus&sort=sideways").token(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trends"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn test_search_is_gated() {
    let app = test_app();

    let (status, _) = send(&app, TestRequest::new("GET", "/trends?q=coffee")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let free = login(&app, FREE_USER).await;
    let (status, _) = send(&app, TestRequest::new("GET", "/trends?q=coffee").token(&free)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let pro = login(&app, PRO_USER).await;
    let (status, body) = send(&app, TestRequest::new("GET", "/trends?q=Coffee").token(&pro)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body["trends"]), vec!["mushroom-coffee"]);
}

#[tokio::test]
async fn test_my_niches_view() {
    let app = test_app();

    let pro = login(&app, PRO_USER).await;
    let (_, body) = send(
        &app,
        TestRequest::new("GET", "/trends?view=my-niches").token(&pro),
    )
    .await;
    assert_eq!(body["is_my_niches_view"], true);
    assert_eq!(slugs(&body["trends"]), vec!["low-profile-switches"]);

    // A user without seeds sees nothing
    let business = login(&app, BUSINESS_USER).await;
    let (_, body) = send(
        &app,
        TestRequest::new("GET", "/trends?view=my-niches").token(&business),
    )
    .await;
    assert_eq!(body["is_my_niches_view"], true);
    assert!(body["trends"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, TestRequest::new("GET", "/trends?view=my-niches")).await;
    assert_eq!(body["is_my_niches_view"], false);
    assert_eq!(body["trends"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_stats() {
    let app = test_app();
    let (status, body) = send(&app, TestRequest::new("GET", "/trends/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "exploding_count": 14, "total_trends": 21, "category_count": 6 })
    );
}

#[tokio::test]
async fn test_trend_detail() {
    let app = test_app();

    let (status, body) = send(&app, TestRequest::new("GET", "/trends/ai-agents")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast_locked"], true);
    assert!(body["trend"]["forecast_status"].is_null());
    assert_eq!(body["trend"]["top_regions"], json!(["USA", "CHN", "GBR"]));
    let related = body["related"].as_array().unwrap();
    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|t| t["category_id"] == 5 && t["slug"] != "ai-agents"));

    let pro = login(&app, PRO_USER).await;
    let (_, body) = send(&app, TestRequest::new("GET", "/trends/ai-agents").token(&pro)).await;
    assert_eq!(body["forecast_locked"], false);
    assert_eq!(body["trend"]["forecast_status"], "bullish");

    let (status, body) = send(&app, TestRequest::new("GET", "/trends/unknown-trend")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Trend not found" }));
}

#[tokio::test]
async fn test_categories() {
    let app = test_app();

    let (status, body) = send(&app, TestRequest::new("GET", "/categories")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"AI & Tech"));
    assert_eq!(names.len(), 6);

    let (status, body) = send(&app, TestRequest::new("GET", "/categories/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["slug"], "health");
    let growth: Vec<f64> = body["trends"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["growth_percentage"].as_f64().unwrap())
        .collect();
    assert!(growth.windows(2).all(|w| w[0] >= w[1]));
    assert!(!slugs(&body["trends"]).contains(&"nootropic-gummies".to_string()));

    let (status, _) = send(&app, TestRequest::new("GET", "/categories/gardening")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predictions_require_forecasts() {
    let app = test_app();

    let free = login(&app, FREE_USER).await;
    let (status, _) = send(&app, TestRequest::new("GET", "/predictions").token(&free)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let pro = login(&app, PRO_USER).await;
    let (status, body) = send(&app, TestRequest::new("GET", "/predictions").token(&pro)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top_predictions"].as_array().unwrap().len(), 6);
    assert_eq!(body["top_predictions"][0]["slug"], "rag-systems");
    for signal in body["early_signals"].as_array().unwrap() {
        assert_eq!(signal["status"], "regular");
        assert!(signal["growth_percentage"].as_f64().unwrap() > 50.0);
    }
}

#[tokio::test]
async fn test_plans() {
    let app = test_app();
    let (status, body) = send(&app, TestRequest::new("GET", "/plans")).await;
    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[1]["tier"], "pro");
    assert_eq!(plans[1]["details"]["highlighted"], true);
    assert_eq!(plans[0]["features"]["max_trends"], 10);
    assert!(plans[2]["features"]["max_trends"].is_null());
}

#[tokio::test]
async fn test_sitemap() {
    let app = test_app();
    let (status, xml) = send_raw(&app, TestRequest::new("GET", "/sitemap.xml")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<loc>https://yourdomain.com</loc>"));
    assert!(xml.contains("<loc>https://yourdomain.com/pricing</loc>"));
    assert!(xml.contains("<loc>https://yourdomain.com/trend/ai-agents</loc>"));
    assert!(xml.contains("<loc>https://yourdomain.com/category/crypto</loc>"));
    assert!(!xml.contains("nootropic-gummies"));
}

#[tokio::test]
async fn test_saved_trends() {
    let app = test_app();

    let (status, _) = send(&app, TestRequest::new("GET", "/saved")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, FREE_USER).await;
    for slug in ["ai-agents", "peptides", "ai-agents"] {
        let (status, _) = send(
            &app,
            TestRequest::new("POST", &format!("/saved/{}", slug)).token(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, TestRequest::new("GET", "/saved").token(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert!(body[0]["velocity_score"].is_null());

    let (status, _) = send(&app, TestRequest::new("DELETE", "/saved/peptides").token(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, TestRequest::new("GET", "/saved").token(&token)).await;
    assert_eq!(slugs(&body), vec!["ai-agents"]);

    let (status, _) = send(&app, TestRequest::new("POST", "/saved/missing").token(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_me_and_logout() {
    let app = test_app();

    let (status, body) = send(
        &app,
        TestRequest::new("POST", "/auth/login").json(json!({ "email": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid email" }));

    let (status, body) = send(
        &app,
        TestRequest::new("POST", "/auth/login").json(json!({ "email": "newcomer@velocity.app" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["subscription_tier"], "free");
    assert_eq!(body["is_admin"], false);
    let token = body["session_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, TestRequest::new("GET", "/auth/me").token(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["name"], "Explorer");
    assert_eq!(body["features"]["search_enabled"], false);

    let admin = login(&app, "Admin@Velocity.com").await;
    let (_, body) = send(&app, TestRequest::new("GET", "/auth/me").token(&admin)).await;
    assert_eq!(body["is_admin"], true);

    let (status, body) =
        send_raw(&app, TestRequest::new("POST", "/auth/logout").token(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let logout: SuccessResponse = serde_json::from_str(&body).unwrap();
    assert!(logout.success);

    let (status, _) = send(&app, TestRequest::new("GET", "/auth/me").token(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_email_login_disabled_by_default() {
    let mut settings = test_settings();
    settings.auth.email_login = false;
    let app = test_app_with(settings);

    let (status, body) = send(
        &app,
        TestRequest::new("POST", "/auth/login").json(json!({ "email": "ADMIN@velocity.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Email login is disabled" }));

    // Without a session the admin mutations stay closed
    let (status, _) = send(
        &app,
        TestRequest::new("PATCH", "/api/seeds").json(json!({ "id": 1, "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_export_requires_business() {
    let app = test_app();

    let (status, _) = send(&app, TestRequest::new("GET", "/export/trends.csv")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let pro = login(&app, PRO_USER).await;
    let (status, _) = send(&app, TestRequest::new("GET", "/export/trends.csv").token(&pro)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let business = login(&app, BUSINESS_USER).await;
    let (status, csv) =
        send_raw(&app, TestRequest::new("GET", "/export/trends.csv").token(&business)).await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<&str> = csv.lines().collect();
    assert!(lines[0].starts_with("name,slug,category,status"));
    assert_eq!(lines.len(), 22);
    assert!(csv.contains("AI Agents,ai-agents,AI & Tech,exploding,45200,892,95,bullish,0.92,true,"));
}

#[tokio::test]
async fn test_api_key_access() {
    let app = test_app();

    let pro = login(&app, PRO_USER).await;
    let (status, _) = send(&app, TestRequest::new("POST", "/settings/api-key").token(&pro)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let business = login(&app, BUSINESS_USER).await;
    let (_, settings) = send(&app, TestRequest::new("GET", "/settings").token(&business)).await;
    assert_eq!(settings["has_api_key"], false);
    assert_eq!(settings["plan"]["name"], "Empire");

    let (status, body) =
        send(&app, TestRequest::new("POST", "/settings/api-key").token(&business)).await;
    assert_eq!(status, StatusCode::OK);
    let key = body["api_key"].as_str().unwrap().to_string();
    assert!(key.starts_with("vl_sk_live_"));

    let (_, settings) = send(&app, TestRequest::new("GET", "/settings").token(&business)).await;
    assert_eq!(settings["has_api_key"], true);

    let bearer = format!("Bearer {}", key);
    let (status, body) = send(
        &app,
        TestRequest::new("GET", "/v1/trends?sort=velocity").authorization(&bearer),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trends"].as_array().unwrap().len(), 21);
    assert_eq!(body["trends"][0]["velocity_score"], 98);

    let (status, _) = send(
        &app,
        TestRequest::new("GET", "/v1/trends").authorization("Bearer vl_sk_live_wrong"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_settings_requires_session() {
    let app = test_app();
    let (status, body) = send(&app, TestRequest::new("GET", "/settings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let admin = login(&app, ADMIN).await;
    let (status, _) = send(&app, TestRequest::new("GET", "/settings").token(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}
