use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{App, InputMode, PendingAction, Screen, SeedsView, ToastKind};
use crate::log_key_event;

pub const SEARCH_LOCKED_MESSAGE: &str = "Search is available on the Pro plan";
pub const TRIGGER_FORBIDDEN_MESSAGE: &str = "Only admins can trigger the scraper";
pub const TRIGGER_STARTED_MESSAGE: &str = "Triggering scraper...";
pub const MY_NICHES_SIGN_IN_MESSAGE: &str = "Sign in with --email to see your niches";
pub const HUNTER_SIGN_IN_MESSAGE: &str = "Sign in with --email to use the Niche Hunter";
pub const HUNTER_LOCKED_MESSAGE: &str = "Niche Hunter is available on the Pro plan";
pub const SEED_MANAGER_FORBIDDEN_MESSAGE: &str = "Only admins can manage all seeds";
pub const SEED_LIMIT_MESSAGE: &str = "Maximum 3 seeds allowed. Delete one to add another.";
pub const PAUSE_FORBIDDEN_MESSAGE: &str = "Only admins can pause seeds";
pub const EMPTY_TERM_MESSAGE: &str = "Type a keyword to track";

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        log_key_event!(self.log_config, "key={:?} screen={:?}", key.code, self.screen);

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return Ok(());
        }

        // Priority 1: help overlay
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.toggle_help();
            }
            return Ok(());
        }

        // Priority 2: text boxes
        match self.input_mode {
            InputMode::Typing => {
                self.handle_search_keys(key);
                return Ok(());
            }
            InputMode::SeedTerm => {
                self.handle_seed_term_keys(key);
                return Ok(());
            }
            InputMode::Navigation => {}
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_keys(key),
            Screen::Detail => self.handle_detail_keys(key),
            Screen::Seeds => self.handle_seeds_keys(key),
        }
        Ok(())
    }

    fn handle_dashboard_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Down | KeyCode::Char('j') => self.dashboard.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.dashboard.select_previous(),
            KeyCode::Home => self.dashboard.select_first(),
            KeyCode::End => self.dashboard.select_last(),
            KeyCode::Enter => {
                if let Some(selected) = self.dashboard.selected_trend() {
                    let slug = selected.trend.slug.clone();
                    self.pending_action = Some(PendingAction::OpenDetail(slug));
                }
            }
            KeyCode::Char('n') | KeyCode::Char(' ') => {
                if !self.dashboard.load_more() && self.dashboard.is_limited_by_plan {
                    self.show_toast(super::UPGRADE_MESSAGE, ToastKind::Info);
                }
            }
            KeyCode::Char('s') => {
                self.dashboard.cycle_status();
                self.request_reload();
            }
            KeyCode::Char('o') => {
                self.dashboard.cycle_sort();
                self.request_reload();
            }
            KeyCode::Char('g') => {
                self.dashboard.cycle_growth();
                self.request_reload();
            }
            KeyCode::Char('m') => {
                if self.account.is_signed_in() {
                    self.dashboard.toggle_my_niches();
                    self.request_reload();
                } else {
                    self.show_toast(MY_NICHES_SIGN_IN_MESSAGE, ToastKind::Info);
                }
            }
            KeyCode::Char('/') => self.enter_search_mode(),
            KeyCode::Char('c') => {
                if self.dashboard.filters.search.take().is_some() {
                    self.dashboard.search_input.clear();
                    self.request_reload();
                }
            }
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char('t') => self.request_trigger(),
            KeyCode::Char('h') => {
                if self.account.is_signed_in() {
                    self.open_seeds(SeedsView::Hunter);
                } else {
                    self.show_toast(HUNTER_SIGN_IN_MESSAGE, ToastKind::Info);
                }
            }
            KeyCode::Char('a') => {
                if self.account.is_admin {
                    self.open_seeds(SeedsView::Manager);
                } else {
                    self.show_toast(SEED_MANAGER_FORBIDDEN_MESSAGE, ToastKind::Error);
                }
            }
            _ => {}
        }
    }

    fn handle_seeds_keys(&mut self, key: KeyEvent) {
        // A pending delete only survives an immediate second `d`
        let confirm_delete = self.seeds.confirm_delete.take();

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.close_seeds(),
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Down | KeyCode::Char('j') => self.seeds.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.seeds.select_previous(),
            KeyCode::Char('a') | KeyCode::Char('i') => self.start_new_seed(),
            KeyCode::Char('d') => {
                let Some(seed) = self.seeds.selected_seed().map(|s| s.seed.clone()) else {
                    return;
                };
                if confirm_delete == Some(seed.id) {
                    self.pending_action = Some(PendingAction::DeleteSeed(seed.id));
                } else {
                    self.seeds.confirm_delete = Some(seed.id);
                    self.show_toast(
                        format!("Press d again to delete \"{}\"", seed.term),
                        ToastKind::Info,
                    );
                }
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                if self.seeds.view != SeedsView::Manager {
                    self.show_toast(PAUSE_FORBIDDEN_MESSAGE, ToastKind::Error);
                    return;
                }
                if let Some(seed) = self.seeds.selected_seed() {
                    self.pending_action = Some(PendingAction::ToggleSeed {
                        id: seed.seed.id,
                        is_active: !seed.seed.is_active,
                    });
                }
            }
            KeyCode::Char('r') => {
                self.seeds.loading = true;
                self.pending_action = Some(PendingAction::LoadSeeds);
            }
            KeyCode::Char('t') => self.request_trigger(),
            _ => {}
        }
    }

    fn start_new_seed(&mut self) {
        if !self.seeds.can_track_niches {
            self.show_toast(HUNTER_LOCKED_MESSAGE, ToastKind::Info);
            return;
        }
        if self.seeds.slots_full() {
            self.show_toast(SEED_LIMIT_MESSAGE, ToastKind::Info);
            return;
        }
        self.input_mode = InputMode::SeedTerm;
    }

    fn handle_seed_term_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.seeds.term_input.clear();
                self.input_mode = InputMode::Navigation;
            }
            KeyCode::Enter => match self.seeds.take_new_seed() {
                Some((term, category_id)) => {
                    self.input_mode = InputMode::Navigation;
                    self.pending_action = Some(PendingAction::CreateSeed { term, category_id });
                }
                None => self.show_toast(EMPTY_TERM_MESSAGE, ToastKind::Info),
            },
            KeyCode::Tab => self.seeds.cycle_category(),
            KeyCode::Backspace => {
                self.seeds.term_input.pop();
            }
            KeyCode::Char(c) => self.seeds.term_input.push(c),
            _ => {}
        }
    }

    fn handle_detail_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => self.close_detail(),
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('?') => self.toggle_help(),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.select_next_related();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.select_previous_related();
                }
            }
            KeyCode::Enter => {
                if let Some(slug) = self.detail.as_ref().and_then(|d| d.selected_related_slug()) {
                    self.pending_action = Some(PendingAction::OpenDetail(slug.to_string()));
                }
            }
            KeyCode::Char('t') => self.request_trigger(),
            _ => {}
        }
    }

    fn handle_search_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.dashboard.search_input = self.dashboard.filters.search.clone().unwrap_or_default();
                self.input_mode = InputMode::Navigation;
            }
            KeyCode::Enter => {
                let query = self.dashboard.search_input.trim().to_string();
                self.dashboard.filters.search = (!query.is_empty()).then_some(query);
                self.input_mode = InputMode::Navigation;
                self.request_reload();
            }
            KeyCode::Backspace => {
                self.dashboard.search_input.pop();
            }
            KeyCode::Char(c) => self.dashboard.search_input.push(c),
            _ => {}
        }
    }

    fn enter_search_mode(&mut self) {
        if !self.account.features.search_enabled {
            self.show_toast(SEARCH_LOCKED_MESSAGE, ToastKind::Info);
            return;
        }
        self.input_mode = InputMode::Typing;
    }

    /// Queue the scraper trigger for admins; everyone else gets a toast
    fn request_trigger(&mut self) {
        if !self.account.is_admin {
            self.show_toast(TRIGGER_FORBIDDEN_MESSAGE, ToastKind::Error);
            return;
        }
        self.show_toast(TRIGGER_STARTED_MESSAGE, ToastKind::Info);
        self.pending_action = Some(PendingAction::TriggerScrape);
    }
}
