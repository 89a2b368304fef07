use serde::Serialize;
use thiserror::Error;

use crate::config::GitHub;

const USER_AGENT: &str = "Velocity-Scraper-Trigger";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("GITHUB_ACCESS_TOKEN not configured")]
    MissingToken,

    #[error("Failed to reach GitHub: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API Error: {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

/// Starts the scraper workflow through GitHub's `workflow_dispatch` API
#[derive(Clone)]
pub struct WorkflowDispatcher {
    client: reqwest::Client,
    config: GitHub,
}

impl WorkflowDispatcher {
    pub fn new(config: GitHub) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            self.config.workflow
        )
    }

    /// Fire the workflow. GitHub answers 204 with an empty body on success.
    pub async fn dispatch(&self) -> Result<(), DispatchError> {
        let token = self
            .config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(DispatchError::MissingToken)?;

        let url = self.dispatch_url();
        tracing::info!("Dispatching workflow {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", token))
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .json(&DispatchBody {
                git_ref: &self.config.git_ref,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn github_config() -> GitHub {
        Settings::defaults().expect("defaults").github
    }

    #[test]
    fn test_dispatch_url_targets_monitor_workflow() {
        let mut config = github_config();
        config.owner = "acme".to_string();
        config.repo = "scraper".to_string();
        config.api_base = "https://api.github.com/".to_string();

        let dispatcher = WorkflowDispatcher::new(config);
        assert_eq!(
            dispatcher.dispatch_url(),
            "https://api.github.com/repos/acme/scraper/actions/workflows/monitor.yml/dispatches"
        );
    }

    #[test]
    fn test_dispatch_body_uses_ref_key() {
        let body = serde_json::to_value(DispatchBody { git_ref: "main" }).unwrap();
        assert_eq!(body, serde_json::json!({ "ref": "main" }));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let mut config = github_config();
        config.token = Some("   ".to_string());
        let err = WorkflowDispatcher::new(config).dispatch().await.unwrap_err();
        assert!(matches!(err, DispatchError::MissingToken));
        assert_eq!(err.to_string(), "GITHUB_ACCESS_TOKEN not configured");
    }

    #[test]
    fn test_rejected_message_includes_status_and_body() {
        let err = DispatchError::Rejected {
            status: 404,
            body: "{\"message\":\"Not Found\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub API Error: 404 - {\"message\":\"Not Found\"}"
        );
    }
}
