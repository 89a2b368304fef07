use axum::http::HeaderMap;
use uuid::Uuid;

use velocity_types::{PlanFeatures, Profile, SubscriptionTier};

use crate::api::{ApiError, ApiResult};
use crate::db::repositories::ProfileRepository;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "X-Session-Token";

/// Who is making a request. Anonymous viewers get the free plan.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub profile: Option<Profile>,
    pub is_admin: bool,
}

impl Viewer {
    pub fn tier(&self) -> SubscriptionTier {
        self.profile
            .as_ref()
            .map(|p| p.subscription_tier)
            .unwrap_or_default()
    }

    pub fn features(&self) -> PlanFeatures {
        self.tier().features()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.profile.as_ref().map(|p| p.id)
    }

    /// Admins and tiers with niche tracking may manage seeds
    pub fn can_manage_seeds(&self) -> bool {
        self.is_admin || self.features().niche_tracking
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// `Authorization: Bearer <value>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the viewer. Missing or stale sessions yield an anonymous viewer.
pub fn current_viewer(state: &AppState, headers: &HeaderMap) -> ApiResult<Viewer> {
    let Some(user_id) = session_token(headers)
        .and_then(|token| state.get_authenticated_user_id_from_token(token))
    else {
        return Ok(Viewer::default());
    };

    let profile = ProfileRepository::new(state.db.pool.clone()).get_by_id(&user_id)?;
    let is_admin = profile
        .as_ref()
        .map(|p| state.settings.is_admin_email(&p.email))
        .unwrap_or(false);

    Ok(Viewer { profile, is_admin })
}

/// Like [`current_viewer`] but a signed-in profile is mandatory (401 otherwise)
pub fn require_profile(state: &AppState, headers: &HeaderMap) -> ApiResult<(Profile, bool)> {
    let viewer = current_viewer(state, headers)?;
    match viewer.profile {
        Some(profile) => Ok((profile, viewer.is_admin)),
        None => Err(ApiError::unauthorized()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn profile(tier: SubscriptionTier) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            email: "viewer@velocity.app".to_string(),
            subscription_tier: tier,
            billing_customer_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_anonymous_viewer_is_free() {
        let viewer = Viewer::default();
        assert_eq!(viewer.tier(), SubscriptionTier::Free);
        assert!(viewer.user_id().is_none());
        assert!(!viewer.can_manage_seeds());
    }

    #[test]
    fn test_seed_management_rights() {
        let pro = Viewer {
            profile: Some(profile(SubscriptionTier::Pro)),
            is_admin: false,
        };
        let free_admin = Viewer {
            profile: Some(profile(SubscriptionTier::Free)),
            is_admin: true,
        };
        let free = Viewer {
            profile: Some(profile(SubscriptionTier::Free)),
            is_admin: false,
        };
        assert!(pro.can_manage_seeds());
        assert!(free_admin.can_manage_seeds());
        assert!(!free.can_manage_seeds());
    }

    #[test]
    fn test_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        headers.insert(SESSION_HEADER, HeaderValue::from_static(" abc "));
        headers.insert("authorization", HeaderValue::from_static("Bearer vl_sk_live_1"));
        assert_eq!(session_token(&headers), Some("abc"));
        assert_eq!(bearer_token(&headers), Some("vl_sk_live_1"));

        headers.insert("authorization", HeaderValue::from_static("Basic xyz"));
        assert!(bearer_token(&headers).is_none());
    }
}
