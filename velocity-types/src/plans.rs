use serde::{Deserialize, Serialize};

use crate::enums::SubscriptionTier;

/// Number of custom niches a non-admin account may track at once
pub const MAX_USER_SEEDS: i64 = 3;

/// Row cap applied to dashboard queries even for unlimited plans
pub const UNLIMITED_TRENDS_CAP: i64 = 100;

/// Feature switches attached to a subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFeatures {
    /// `None` means unlimited
    pub max_trends: Option<i64>,
    pub search_enabled: bool,
    pub velocity_score_visible: bool,
    pub forecast_visible: bool,
    pub export_enabled: bool,
    pub api_access: bool,
    pub email_alerts: bool,
    pub white_label: bool,
    pub niche_tracking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Search,
    VelocityScore,
    Forecast,
    Export,
    ApiAccess,
    EmailAlerts,
    WhiteLabel,
    NicheTracking,
}

const FREE: PlanFeatures = PlanFeatures {
    max_trends: Some(10),
    search_enabled: false,
    velocity_score_visible: false,
    forecast_visible: false,
    export_enabled: false,
    api_access: false,
    email_alerts: false,
    white_label: false,
    niche_tracking: false,
};

const PRO: PlanFeatures = PlanFeatures {
    max_trends: None,
    search_enabled: true,
    velocity_score_visible: true,
    forecast_visible: true,
    export_enabled: false,
    api_access: false,
    email_alerts: true,
    white_label: false,
    niche_tracking: true,
};

const BUSINESS: PlanFeatures = PlanFeatures {
    max_trends: None,
    search_enabled: true,
    velocity_score_visible: true,
    forecast_visible: true,
    export_enabled: true,
    api_access: true,
    email_alerts: true,
    white_label: true,
    niche_tracking: true,
};

impl PlanFeatures {
    pub fn allows(&self, feature: Feature) -> bool {
        match feature {
            Feature::Search => self.search_enabled,
            Feature::VelocityScore => self.velocity_score_visible,
            Feature::Forecast => self.forecast_visible,
            Feature::Export => self.export_enabled,
            Feature::ApiAccess => self.api_access,
            Feature::EmailAlerts => self.email_alerts,
            Feature::WhiteLabel => self.white_label,
            Feature::NicheTracking => self.niche_tracking,
        }
    }

    /// Row limit for the main dashboard query
    pub fn dashboard_limit(&self) -> i64 {
        self.max_trends.unwrap_or(UNLIMITED_TRENDS_CAP)
    }
}

/// Marketing copy shown on the pricing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDetails {
    pub name: String,
    pub price: String,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub tier: SubscriptionTier,
    pub details: PlanDetails,
    pub features: PlanFeatures,
}

impl SubscriptionTier {
    pub fn features(&self) -> PlanFeatures {
        match self {
            SubscriptionTier::Free => FREE,
            SubscriptionTier::Pro => PRO,
            SubscriptionTier::Business => BUSINESS,
        }
    }

    pub fn can_access(&self, feature: Feature) -> bool {
        self.features().allows(feature)
    }

    pub fn details(&self) -> PlanDetails {
        let (name, price, description, features, highlighted): (&str, &str, &str, &[&str], bool) =
            match self {
                SubscriptionTier::Free => (
                    "Explorer",
                    "Free",
                    "Perfect for getting started",
                    &[
                        "Daily Top 10 Trends",
                        "Basic Charts",
                        "Community Support",
                        "Weekly Email Digest",
                    ],
                    false,
                ),
                SubscriptionTier::Pro => (
                    "Trend Hunter",
                    "$29",
                    "For serious trend spotters",
                    &[
                        "Unlimited Trends Access",
                        "Advanced Search",
                        "Velocity Scores",
                        "Growth Forecasts",
                        "Email Alerts",
                        "Priority Support",
                        "Historical Data (12 months)",
                    ],
                    true,
                ),
                SubscriptionTier::Business => (
                    "Empire",
                    "$99",
                    "For teams and power users",
                    &[
                        "All Pro Features",
                        "CSV Export",
                        "API Access",
                        "White Label Reports",
                        "Team Collaboration",
                        "Dedicated Account Manager",
                        "Custom Integrations",
                    ],
                    false,
                ),
            };

        PlanDetails {
            name: name.to_string(),
            price: price.to_string(),
            description: description.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            highlighted,
        }
    }

    pub fn plan(&self) -> Plan {
        Plan {
            tier: *self,
            details: self.details(),
            features: self.features(),
        }
    }
}

/// Whether `tier` unlocks `feature`
pub fn can_access_feature(tier: SubscriptionTier, feature: Feature) -> bool {
    tier.can_access(feature)
}
