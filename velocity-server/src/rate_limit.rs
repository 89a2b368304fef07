use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::access::{bearer_token, session_token};
use crate::api::ApiError;

/// In-memory fixed-window rate limiter keyed by session token or API key
#[derive(Clone)]
pub struct RateLimiter {
    // key -> (request_count, window_start)
    state: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
        }
    }

    /// Count a request against `key`, failing once the window is used up
    pub fn check_rate_limit(&self, key: &str) -> Result<(), String> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();

        if state.len() > 10000 {
            state.retain(|_, (_, start)| now.duration_since(*start) < self.window_duration * 2);
        }

        match state.get_mut(key) {
            Some((count, window_start)) => {
                if now.duration_since(*window_start) < self.window_duration {
                    if *count >= self.max_requests {
                        let remaining = self.window_duration - now.duration_since(*window_start);
                        return Err(format!(
                            "Rate limit exceeded. Try again in {} seconds.",
                            remaining.as_secs()
                        ));
                    }
                    *count += 1;
                } else {
                    *window_start = now;
                    *count = 1;
                }
            }
            None => {
                state.insert(key.to_string(), (1, now));
            }
        }

        Ok(())
    }
}

/// Applies the limiter to requests carrying a session token or API key
pub async fn rate_limit_middleware(
    axum::Extension(limiter): axum::Extension<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = session_token(request.headers())
        .or_else(|| bearer_token(request.headers()))
        .map(str::to_string);

    if let Some(key) = key {
        if let Err(msg) = limiter.check_rate_limit(&key) {
            return ApiError::TooManyRequests(msg).into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = RateLimiter::new(2, 60);
        assert!(limiter.check_rate_limit("a").is_ok());
        assert!(limiter.check_rate_limit("a").is_ok());
        assert!(limiter.check_rate_limit("a").is_err());
        assert!(limiter.check_rate_limit("b").is_ok());
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, 0);
        assert!(limiter.check_rate_limit("a").is_ok());
        assert!(limiter.check_rate_limit("a").is_ok());
    }
}
