use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Default admin account, matched case-insensitively against profile emails
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@velocity.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
    /// Load the demo catalogue of categories, trends and metrics on startup
    pub demo_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    pub admin_email: String,
    pub session_ttl_days: i64,
    /// Password-less `POST /auth/login`. Off unless a development setup opts in.
    pub email_login: bool,
}

/// GitHub Actions workflow that runs the external scraper
#[derive(Debug, Clone, Deserialize)]
pub struct GitHub {
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub workflow: String,
    pub git_ref: String,
    pub api_base: String,
    /// Shared key the serverless relay expects as `Authorization: Bearer <key>`
    pub relay_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub github: GitHub,
    pub site: Site,
    pub rate_limit: RateLimit,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Optional settings.toml
        let config_file_name = "settings.toml";

        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Workspace-root development layout
        let dev_path = PathBuf::from("velocity-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = Self::with_defaults(builder)?;

        // 2. Environment variables (highest priority)
        let overrides = [
            ("DATABASE_PATH", "database.path"),
            ("VELOCITY_DEMO_DATA", "database.demo_data"),
            ("PORT", "server.port"),
            ("HOST", "server.host"),
            ("ADMIN_EMAIL", "auth.admin_email"),
            ("EMAIL_LOGIN", "auth.email_login"),
            ("SITE_URL", "site.url"),
            ("GITHUB_ACCESS_TOKEN", "github.token"),
            ("GITHUB_OWNER", "github.owner"),
            ("GITHUB_REPO", "github.repo"),
            ("GITHUB_API_BASE", "github.api_base"),
            ("RELAY_KEY", "github.relay_key"),
            ("RATE_LIMIT_MAX", "rate_limit.max_requests"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Defaults only, with no file or environment sources
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        // 0.0.0.0 so deployments accept external connections; HOST overrides locally
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "velocity.db")?
            .set_default("database.demo_data", false)?
            .set_default("auth.admin_email", DEFAULT_ADMIN_EMAIL)?
            .set_default("auth.session_ttl_days", 30)?
            .set_default("auth.email_login", false)?
            .set_default("github.owner", "YOUR_GITHUB_USERNAME")?
            .set_default("github.repo", "YOUR_REPO_NAME")?
            .set_default("github.workflow", "monitor.yml")?
            .set_default("github.git_ref", "main")?
            .set_default("github.api_base", "https://api.github.com")?
            .set_default("site.url", "https://yourdomain.com")?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.window_seconds", 60)
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(self.auth.admin_email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_monitor_workflow() {
        let settings = Settings::defaults().expect("defaults should deserialize");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.github.workflow, "monitor.yml");
        assert_eq!(settings.github.git_ref, "main");
        assert_eq!(settings.github.api_base, "https://api.github.com");
        assert!(settings.github.token.is_none());
        assert_eq!(settings.rate_limit.max_requests, 100);
        assert!(!settings.auth.email_login);
    }

    #[test]
    fn test_admin_email_comparison_ignores_case() {
        let settings = Settings::defaults().unwrap();
        assert!(settings.is_admin_email("Admin@Velocity.com"));
        assert!(!settings.is_admin_email("someone@velocity.com"));
    }
}
