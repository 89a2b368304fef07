use std::time::{Duration, Instant};

use velocity_types::{
    AdminSeedsResponse, Category, DashboardResponse, DashboardStats, GrowthFilter,
    HunterResponse, PlanFeatures, SeedWithTrendCount, SortFilter, StatusFilter,
    SubscriptionTier, TrendDetailResponse, TrendWithRelations,
};

use crate::api::DashboardFilters;

/// Trends revealed per "Load More" step
pub const PAGE_SIZE: usize = 12;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

pub const UPGRADE_TITLE: &str = "Unlock 1,000+ More Trends";
pub const UPGRADE_MESSAGE: &str =
    "Upgrade to Pro for unlimited access to all trends, advanced search, and velocity scores.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Dashboard,
    Detail,
    Seeds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation, // shortcuts active
    Typing,     // search box has focus
    SeedTerm,   // new seed box has focus
}

/// Work a key press asked for that needs the network.
/// Key handling stays synchronous; the event loop runs these.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    ReloadDashboard,
    OpenDetail(String),
    TriggerScrape,
    LoadSeeds,
    CreateSeed { term: String, category_id: Option<i64> },
    ToggleSeed { id: i64, is_active: bool },
    DeleteSeed(i64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Who is signed in and what their plan unlocks
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub tier: SubscriptionTier,
    pub is_admin: bool,
    pub features: PlanFeatures,
}

impl Account {
    pub fn anonymous() -> Self {
        Self {
            email: String::new(),
            tier: SubscriptionTier::Free,
            is_admin: false,
            features: SubscriptionTier::Free.features(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        !self.email.is_empty()
    }
}

/// Trend grid with client-side paging over the rows the server returned
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub filters: DashboardFilters,
    pub trends: Vec<TrendWithRelations>,
    pub visible_count: usize,
    pub selected: usize,
    pub tier: SubscriptionTier,
    pub is_my_niches_view: bool,
    pub is_limited_by_plan: bool,
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub search_input: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            filters: DashboardFilters::default(),
            trends: Vec::new(),
            visible_count: PAGE_SIZE,
            selected: 0,
            tier: SubscriptionTier::Free,
            is_my_niches_view: false,
            is_limited_by_plan: false,
            stats: None,
            loading: false,
            search_input: String::new(),
        }
    }

    /// Replace the grid with a fresh server response and reset paging
    pub fn apply_response(&mut self, response: DashboardResponse) {
        self.trends = response.trends;
        self.tier = response.tier;
        self.is_my_niches_view = response.is_my_niches_view;
        self.is_limited_by_plan = response.is_limited_by_plan;
        self.visible_count = PAGE_SIZE;
        self.selected = 0;
        self.loading = false;
    }

    pub fn visible_trends(&self) -> &[TrendWithRelations] {
        let end = self.visible_count.min(self.trends.len());
        &self.trends[..end]
    }

    /// Load More is offered only while rows are hidden and the plan is not the limit
    pub fn has_more(&self) -> bool {
        !self.is_limited_by_plan && self.visible_count < self.trends.len()
    }

    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.visible_count += PAGE_SIZE;
        true
    }

    pub fn selected_trend(&self) -> Option<&TrendWithRelations> {
        self.visible_trends().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.visible_trends().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_trends().len().saturating_sub(1);
    }

    pub fn cycle_status(&mut self) {
        self.filters.status = next_in(&StatusFilter::ALL, self.filters.status);
    }

    pub fn cycle_sort(&mut self) {
        self.filters.sort = next_in(&SortFilter::ALL, self.filters.sort);
    }

    pub fn cycle_growth(&mut self) {
        self.filters.growth = next_in(&GrowthFilter::ALL, self.filters.growth);
    }

    pub fn toggle_my_niches(&mut self) {
        self.filters.my_niches = !self.filters.my_niches;
    }

    /// The upgrade banner, shown when the plan capped the result set
    pub fn upgrade_prompt(&self) -> Option<(&'static str, &'static str)> {
        self.is_limited_by_plan.then_some((UPGRADE_TITLE, UPGRADE_MESSAGE))
    }
}

/// The value after `current` in `options`, wrapping around
fn next_in<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    options[(index + 1) % options.len()]
}

#[derive(Debug, Clone)]
pub struct DetailState {
    pub response: TrendDetailResponse,
    pub selected_related: usize,
}

impl DetailState {
    pub fn new(response: TrendDetailResponse) -> Self {
        Self {
            response,
            selected_related: 0,
        }
    }

    pub fn trend(&self) -> &TrendWithRelations {
        &self.response.trend
    }

    /// Monthly search volumes, oldest first, for the sparkline
    pub fn volume_series(&self) -> Vec<u64> {
        self.response
            .trend
            .metrics
            .iter()
            .map(|m| m.search_volume.max(0) as u64)
            .collect()
    }

    pub fn select_next_related(&mut self) {
        if self.selected_related + 1 < self.response.related.len() {
            self.selected_related += 1;
        }
    }

    pub fn select_previous_related(&mut self) {
        self.selected_related = self.selected_related.saturating_sub(1);
    }

    pub fn selected_related_slug(&self) -> Option<&str> {
        self.response
            .related
            .get(self.selected_related)
            .map(|t| t.trend.slug.as_str())
    }
}

/// Which seed list the seeds screen shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedsView {
    /// The signed-in user's own seeds, capped by the slot limit
    Hunter,
    /// Every seed, admin only
    Manager,
}

#[derive(Debug, Clone)]
pub struct SeedsState {
    pub view: SeedsView,
    pub seeds: Vec<SeedWithTrendCount>,
    pub categories: Vec<Category>,
    pub selected: usize,
    pub can_track_niches: bool,
    pub slots_used: i64,
    /// `None` in the manager, which has no cap
    pub slot_limit: Option<i64>,
    pub term_input: String,
    /// Index into `categories` for the next seed
    pub category: Option<usize>,
    /// Seed awaiting a second `d` press
    pub confirm_delete: Option<i64>,
    pub loading: bool,
}

impl SeedsState {
    pub fn new(view: SeedsView) -> Self {
        Self {
            view,
            seeds: Vec::new(),
            categories: Vec::new(),
            selected: 0,
            can_track_niches: view == SeedsView::Manager,
            slots_used: 0,
            slot_limit: None,
            term_input: String::new(),
            category: None,
            confirm_delete: None,
            loading: false,
        }
    }

    pub fn apply_hunter(&mut self, response: HunterResponse) {
        self.can_track_niches = response.can_track_niches;
        self.slots_used = response.slots_used;
        self.slot_limit = Some(response.slot_limit);
        self.replace(response.seeds, response.categories);
    }

    pub fn apply_admin(&mut self, response: AdminSeedsResponse) {
        self.can_track_niches = true;
        self.slots_used = response.seeds.len() as i64;
        self.slot_limit = None;
        self.replace(response.seeds, response.categories);
    }

    fn replace(&mut self, seeds: Vec<SeedWithTrendCount>, categories: Vec<Category>) {
        self.seeds = seeds;
        if self.category.is_some_and(|i| i >= categories.len()) {
            self.category = None;
        }
        self.categories = categories;
        self.selected = self.selected.min(self.seeds.len().saturating_sub(1));
        self.confirm_delete = None;
        self.loading = false;
    }

    pub fn selected_seed(&self) -> Option<&SeedWithTrendCount> {
        self.seeds.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.seeds.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn slots_full(&self) -> bool {
        self.slot_limit.is_some_and(|limit| self.slots_used >= limit)
    }

    /// No category, then each category in order, then back to none
    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            None if !self.categories.is_empty() => Some(0),
            Some(i) if i + 1 < self.categories.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.category.and_then(|i| self.categories.get(i))
    }

    /// Take the typed term and chosen category, leaving the input empty.
    /// `None` when the term is blank.
    pub fn take_new_seed(&mut self) -> Option<(String, Option<i64>)> {
        let term = self.term_input.trim().to_string();
        if term.is_empty() {
            return None;
        }
        self.term_input.clear();
        Some((term, self.selected_category().map(|c| c.id)))
    }
}
