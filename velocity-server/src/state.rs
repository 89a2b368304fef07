use std::sync::Arc;

use crate::config::Settings;
use crate::db::Database;
use crate::github::WorkflowDispatcher;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_manager: SessionManager,
    pub settings: Arc<Settings>,
    pub dispatcher: WorkflowDispatcher,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let session_manager = SessionManager::new(db.clone(), settings.auth.session_ttl_days);
        let dispatcher = WorkflowDispatcher::new(settings.github.clone());
        Self {
            db,
            session_manager,
            settings: Arc::new(settings),
            dispatcher,
        }
    }

    /// Get authenticated user ID from session token
    pub fn get_authenticated_user_id_from_token(&self, token: &str) -> Option<uuid::Uuid> {
        self.session_manager.validate_session(token).ok()
    }
}
