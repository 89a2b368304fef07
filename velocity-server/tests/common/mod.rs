#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use velocity_server::config::Settings;
use velocity_server::db::Database;
use velocity_server::{build_router, AppState};

pub const ADMIN: &str = "admin@velocity.com";
pub const FREE_USER: &str = "demo@velocity.app";
pub const PRO_USER: &str = "hunter@velocity.app";
pub const BUSINESS_USER: &str = "empire@velocity.app";

/// Router over a fresh in-memory database loaded with the demo catalogue
pub fn test_app_with(settings: Settings) -> Router {
    let db = Database::in_memory().expect("Failed to create test database");
    db.initialize().expect("Failed to initialize schema");
    db.seed_demo_data().expect("Failed to seed demo data");
    build_router(AppState::new(db, settings))
}

/// Default settings with email login switched on
pub fn test_settings() -> Settings {
    let mut settings = Settings::defaults().expect("default settings");
    settings.auth.email_login = true;
    settings
}

pub fn test_app() -> Router {
    test_app_with(test_settings())
}

pub struct TestRequest<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub token: Option<&'a str>,
    pub authorization: Option<&'a str>,
    pub body: Option<Value>,
}

impl<'a> TestRequest<'a> {
    pub fn new(method: &'a str, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            token: None,
            authorization: None,
            body: None,
        }
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn authorization(mut self, value: &'a str) -> Self {
        self.authorization = Some(value);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.token {
            builder = builder.header("X-Session-Token", token);
        }
        if let Some(value) = self.authorization {
            builder = builder.header("Authorization", value);
        }
        match self.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

/// Send a request and return the status with the raw body text
pub async fn send_raw(app: &Router, request: TestRequest<'_>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request.build()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send a request and parse the JSON body (`Null` when empty)
pub async fn send(app: &Router, request: TestRequest<'_>) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, request).await;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, body)
}

/// Log in and return the session token
pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        TestRequest::new("POST", "/auth/login").json(serde_json::json!({ "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["session_token"].as_str().unwrap().to_string()
}
