// Library exports for velocity-server
// The binary, the admin CLI and the integration tests all build on these modules

pub mod access;
pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod github;
pub mod rate_limit;
pub mod session;
pub mod state;

pub use app::build_router;
pub use state::AppState;
