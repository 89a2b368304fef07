mod handlers;
mod state;


pub use state::*;

use std::time::Instant;

use velocity_types::{AccountResponse, LoginResponse};

use crate::api::{ApiClient, ApiError};
use crate::log_api_call;
use crate::logging::LogConfig;

pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub api_client: ApiClient,
    pub log_config: LogConfig,
    pub account: Account,
    pub dashboard: DashboardState,
    pub detail: Option<DetailState>,
    pub seeds: SeedsState,
    pub toast: Option<Toast>,
    pub show_help: bool,
    pub pending_action: Option<PendingAction>,
}

impl App {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Navigation,
            api_client: ApiClient::new(server_url),
            log_config: LogConfig::default(),
            account: Account::anonymous(),
            dashboard: DashboardState::new(),
            detail: None,
            seeds: SeedsState::new(SeedsView::Hunter),
            toast: None,
            show_help: false,
            pending_action: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }

    /// Drop the toast once it has been visible long enough
    pub fn clear_expired_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    pub fn apply_login(&mut self, response: LoginResponse) {
        self.account = Account {
            email: response.profile.email,
            tier: response.profile.subscription_tier,
            is_admin: response.is_admin,
            features: response.profile.subscription_tier.features(),
        };
    }

    pub fn apply_account(&mut self, response: AccountResponse) {
        self.account = Account {
            email: response.profile.email,
            tier: response.profile.subscription_tier,
            is_admin: response.is_admin,
            features: response.features,
        };
    }

    /// Queue a dashboard reload with the current filters
    pub fn request_reload(&mut self) {
        self.dashboard.loading = true;
        self.pending_action = Some(PendingAction::ReloadDashboard);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.screen = Screen::Dashboard;
    }

    /// Switch to a seed list and queue its first load
    pub fn open_seeds(&mut self, view: SeedsView) {
        self.seeds = SeedsState::new(view);
        self.seeds.loading = true;
        self.screen = Screen::Seeds;
        self.pending_action = Some(PendingAction::LoadSeeds);
    }

    /// Back to the grid; a My Niches view may have changed with the seeds
    pub fn close_seeds(&mut self) {
        self.screen = Screen::Dashboard;
        if self.dashboard.filters.my_niches {
            self.request_reload();
        }
    }

    fn report_error(&mut self, context: &str, err: &ApiError) {
        log::error!("{}: {}", context, err);
        self.show_toast(err.user_message(), ToastKind::Error);
    }

    // Network actions

    /// Sign in by email, then pull the plan features for the account
    pub async fn login(&mut self, email: &str) -> Result<(), ApiError> {
        log_api_call!(self.log_config, "POST /auth/login email={}", email);
        let response = self.api_client.login(email).await?;
        log::info!(
            "Logged in as {} ({})",
            response.profile.email,
            response.profile.subscription_tier.as_str()
        );
        self.apply_login(response);

        match self.api_client.me().await {
            Ok(account) => self.apply_account(account),
            Err(e) => log::warn!("Failed to load account details: {}", e),
        }
        Ok(())
    }

    pub async fn logout(&mut self) {
        if self.api_client.session_token().is_none() {
            return;
        }
        if let Err(e) = self.api_client.logout().await {
            log::warn!("Logout failed: {}", e);
        }
        self.account = Account::anonymous();
    }

    pub async fn load_dashboard(&mut self) {
        self.dashboard.loading = true;
        log_api_call!(
            self.log_config,
            "GET /trends?{}",
            self.dashboard.filters.to_query()
        );

        match self.api_client.get_dashboard(&self.dashboard.filters).await {
            Ok(response) => {
                log::debug!("Loaded {} trends", response.trends.len());
                self.dashboard.apply_response(response);
            }
            Err(e) => {
                self.dashboard.loading = false;
                self.report_error("Failed to load dashboard", &e);
            }
        }
    }

    pub async fn load_stats(&mut self) {
        log_api_call!(self.log_config, "GET /trends/stats");
        match self.api_client.get_stats().await {
            Ok(stats) => self.dashboard.stats = Some(stats),
            Err(e) => log::warn!("Failed to load stats: {}", e),
        }
    }

    pub async fn open_detail(&mut self, slug: &str) {
        log_api_call!(self.log_config, "GET /trends/{}", slug);
        match self.api_client.get_trend(slug).await {
            Ok(response) => {
                self.detail = Some(DetailState::new(response));
                self.screen = Screen::Detail;
            }
            Err(e) => self.report_error("Failed to load trend", &e),
        }
    }

    pub async fn trigger_scrape(&mut self) {
        log_api_call!(self.log_config, "POST /api/trigger-scrape");
        match self.api_client.trigger_scrape().await {
            Ok(response) if response.success => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Scraper triggered".to_string());
                self.show_toast(message, ToastKind::Success);
            }
            Ok(response) => {
                let message = response
                    .error
                    .unwrap_or_else(|| "Failed to trigger scrape".to_string());
                self.show_toast(message, ToastKind::Error);
            }
            Err(e) => self.report_error("Failed to trigger scrape", &e),
        }
    }

    pub async fn load_seeds(&mut self) {
        self.seeds.loading = true;
        let result = match self.seeds.view {
            SeedsView::Hunter => {
                log_api_call!(self.log_config, "GET /hunter");
                self.api_client
                    .get_hunter()
                    .await
                    .map(|response| self.seeds.apply_hunter(response))
            }
            SeedsView::Manager => {
                log_api_call!(self.log_config, "GET /admin/seeds");
                self.api_client
                    .get_admin_seeds()
                    .await
                    .map(|response| self.seeds.apply_admin(response))
            }
        };

        if let Err(e) = result {
            self.seeds.loading = false;
            self.report_error("Failed to load seeds", &e);
        }
    }

    pub async fn create_seed(&mut self, term: &str, category_id: Option<i64>) {
        log_api_call!(self.log_config, "POST /api/seeds term={}", term);
        match self.api_client.create_seed(term, category_id).await {
            Ok(seed) => {
                log::info!("Added seed {} '{}'", seed.id, seed.term);
                self.show_toast(format!("Tracking \"{}\"", seed.term), ToastKind::Success);
                self.load_seeds().await;
            }
            Err(e) => self.report_error("Failed to add seed", &e),
        }
    }

    pub async fn toggle_seed(&mut self, id: i64, is_active: bool) {
        log_api_call!(self.log_config, "PATCH /api/seeds id={} is_active={}", id, is_active);
        match self.api_client.update_seed(id, is_active).await {
            Ok(seed) => {
                let state = if seed.is_active { "resumed" } else { "paused" };
                self.show_toast(format!("\"{}\" {}", seed.term, state), ToastKind::Success);
                self.load_seeds().await;
            }
            Err(e) => self.report_error("Failed to update seed", &e),
        }
    }

    pub async fn delete_seed(&mut self, id: i64) {
        log_api_call!(self.log_config, "DELETE /api/seeds id={}", id);
        match self.api_client.delete_seed(id).await {
            Ok(_) => {
                self.show_toast("Seed deleted", ToastKind::Success);
                self.load_seeds().await;
            }
            Err(e) => self.report_error("Failed to delete seed", &e),
        }
    }

    /// Run whatever the last key press queued
    pub async fn run_pending_action(&mut self) {
        let Some(action) = self.pending_action.take() else {
            return;
        };

        match action {
            PendingAction::ReloadDashboard => {
                self.load_dashboard().await;
                self.load_stats().await;
            }
            PendingAction::OpenDetail(slug) => self.open_detail(&slug).await,
            PendingAction::TriggerScrape => self.trigger_scrape().await,
            PendingAction::LoadSeeds => self.load_seeds().await,
            PendingAction::CreateSeed { term, category_id } => {
                self.create_seed(&term, category_id).await
            }
            PendingAction::ToggleSeed { id, is_active } => self.toggle_seed(id, is_active).await,
            PendingAction::DeleteSeed(id) => self.delete_seed(id).await,
        }
    }
}
