use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use velocity_types::*;

/// Dashboard query controls as sent to `GET /trends`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilters {
    pub status: StatusFilter,
    pub sort: SortFilter,
    pub growth: GrowthFilter,
    pub my_niches: bool,
    pub search: Option<String>,
}

impl DashboardFilters {
    /// Query string for the current filters, without the leading `?`.
    /// Defaults are omitted so the server applies its own.
    pub fn to_query(&self) -> String {
        let mut params = vec![];

        if self.status != StatusFilter::All {
            params.push(format!("status={}", self.status.as_str()));
        }
        if self.sort != SortFilter::Newest {
            params.push(format!("sort={}", self.sort.as_str()));
        }
        if self.growth != GrowthFilter::All {
            params.push(format!("growth={}", self.growth.as_str()));
        }
        if self.my_niches {
            params.push("view=my-niches".to_string());
        }
        if let Some(q) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            params.push(format!("q={}", urlencoding::encode(q)));
        }

        params.join("&")
    }
}

/// API client for communicating with the Velocity server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.session_token {
            req.header("X-Session-Token", token)
        } else {
            req
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(status.as_u16(), &error_text);

        match status.as_u16() {
            400 => Err(ApiError::BadRequest(message)),
            401 => Err(ApiError::Unauthorized(message)),
            403 => Err(ApiError::Forbidden(message)),
            404 => Err(ApiError::NotFound(message)),
            _ => Err(ApiError::Api(message)),
        }
    }

    // Authentication endpoints

    /// Log in by email and keep the returned session token
    pub async fn login(&mut self, email: &str) -> ApiResult<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);
        let request = LoginRequest {
            email: email.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;
        let login_response: LoginResponse = self.handle_response(response).await?;

        self.session_token = Some(login_response.session_token.clone());
        Ok(login_response)
    }

    pub async fn logout(&mut self) -> ApiResult<SuccessResponse> {
        let url = format!("{}/auth/logout", self.base_url);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        let result = self.handle_response(response).await;
        self.session_token = None;
        result
    }

    pub async fn me(&self) -> ApiResult<AccountResponse> {
        let url = format!("{}/auth/me", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    // Trend endpoints

    pub async fn get_dashboard(&self, filters: &DashboardFilters) -> ApiResult<DashboardResponse> {
        let mut url = format!("{}/trends", self.base_url);
        let query = filters.to_query();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn get_stats(&self) -> ApiResult<DashboardStats> {
        let url = format!("{}/trends/stats", self.base_url);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    pub async fn get_trend(&self, slug: &str) -> ApiResult<TrendDetailResponse> {
        let url = format!("{}/trends/{}", self.base_url, urlencoding::encode(slug));
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Ask the server to dispatch the scraper workflow (admin only)
    pub async fn trigger_scrape(&self) -> ApiResult<TriggerScrapeResponse> {
        let url = format!("{}/api/trigger-scrape", self.base_url);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    // Seed endpoints

    /// The signed-in user's Niche Hunter slots
    pub async fn get_hunter(&self) -> ApiResult<HunterResponse> {
        let url = format!("{}/hunter", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Every seed with its trend yield (admin only)
    pub async fn get_admin_seeds(&self) -> ApiResult<AdminSeedsResponse> {
        let url = format!("{}/admin/seeds", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn create_seed(&self, term: &str, category_id: Option<i64>) -> ApiResult<Seed> {
        let url = format!("{}/api/seeds", self.base_url);
        let request = CreateSeedRequest {
            term: Some(term.to_string()),
            category_id,
        };
        let req = self.add_auth_header(self.client.post(&url)).json(&request);
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Pause or resume a seed (admin only)
    pub async fn update_seed(&self, id: i64, is_active: bool) -> ApiResult<Seed> {
        let url = format!("{}/api/seeds", self.base_url);
        let request = UpdateSeedRequest {
            id: Some(id),
            is_active: Some(is_active),
        };
        let req = self.add_auth_header(self.client.patch(&url)).json(&request);
        let response = req.send().await?;
        self.handle_response(response).await
    }

    pub async fn delete_seed(&self, id: i64) -> ApiResult<SuccessResponse> {
        let url = format!("{}/api/seeds", self.base_url);
        let request = DeleteSeedRequest { id: Some(id) };
        let req = self.add_auth_header(self.client.delete(&url)).json(&request);
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text
fn error_message(status: u16, body: &str) -> String {
    if body.contains("<html>") || body.contains("<!DOCTYPE") {
        return format!("Server returned {} error. Please check the server URL.", status);
    }

    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => err.error,
        Err(_) if body.trim().is_empty() => format!("Request failed with status {}", status),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_produce_empty_query() {
        assert_eq!(DashboardFilters::default().to_query(), "");
    }

    #[test]
    fn test_filters_query_string() {
        let filters = DashboardFilters {
            status: StatusFilter::Exploding,
            sort: SortFilter::Velocity,
            growth: GrowthFilter::Over500,
            my_niches: true,
            search: Some("cold plunge".to_string()),
        };
        assert_eq!(
            filters.to_query(),
            "status=exploding&sort=velocity&growth=500&view=my-niches&q=cold%20plunge"
        );
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let filters = DashboardFilters {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.to_query(), "");
    }

    #[test]
    fn test_error_message_reads_json_error_field() {
        assert_eq!(
            error_message(403, r#"{"error":"Search is available on the Pro plan"}"#),
            "Search is available on the Pro plan"
        );
    }

    #[test]
    fn test_error_message_hides_html_pages() {
        let msg = error_message(502, "<html><body>Bad Gateway</body></html>");
        assert_eq!(msg, "Server returned 502 error. Please check the server URL.");
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message(500, "boom"), "boom");
        assert_eq!(error_message(500, ""), "Request failed with status 500");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client.session_token().is_none());
    }
}
