use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{ForecastStatus, SubscriptionTier, TrendSource, TrendStatus};
use crate::plans::{PlanDetails, PlanFeatures};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

mod optional_datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// One row per authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub subscription_tier: SubscriptionTier,
    #[serde(default)]
    pub billing_customer_id: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A discovery keyword consumed by the external scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub id: i64,
    pub term: String,
    pub category_id: Option<i64>,
    pub is_active: bool,
    #[serde(default, with = "optional_datetime_format")]
    pub last_scraped_at: Option<DateTime<Utc>>,
    /// `None` for seeds added by the admin
    pub added_by_user_id: Option<Uuid>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedWithTrendCount {
    #[serde(flatten)]
    pub seed: Seed,
    pub category: Option<Category>,
    pub trend_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub status: TrendStatus,
    pub current_volume: i64,
    pub growth_percentage: f64,
    pub source: TrendSource,
    #[serde(default, with = "optional_datetime_format")]
    pub last_fetched_at: Option<DateTime<Utc>>,
    #[serde(with = "datetime_format")]
    pub added_at: DateTime<Utc>,
    pub velocity_score: Option<i64>,
    pub forecast_status: Option<ForecastStatus>,
    pub prediction_confidence: Option<f64>,
    pub seed_id: Option<i64>,
    #[serde(default)]
    pub top_regions: Vec<String>,
    pub is_breakout: bool,
}

/// One point of a trend's search volume history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMetric {
    pub id: i64,
    pub trend_id: i64,
    pub date: NaiveDate,
    pub search_volume: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendWithRelations {
    #[serde(flatten)]
    pub trend: Trend,
    pub category: Option<Category>,
    #[serde(default)]
    pub metrics: Vec<TrendMetric>,
}

impl TrendWithRelations {
    /// Null out the insight fields `features` does not unlock
    pub fn mask_for(mut self, features: &PlanFeatures) -> Self {
        if !features.velocity_score_visible {
            self.trend.velocity_score = None;
        }
        if !features.forecast_visible {
            self.trend.forecast_status = None;
            self.trend.prediction_confidence = None;
        }
        self
    }
}

// Request/Response types for API
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub profile: Profile,
    pub session_token: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub profile: Profile,
    pub is_admin: bool,
    pub features: PlanFeatures,
    pub plan: PlanDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub profile: Profile,
    pub plan: PlanDetails,
    pub features: PlanFeatures,
    pub has_api_key: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

/// Body for `POST /api/seeds`. Fields are optional so that validation
/// happens after authorization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSeedRequest {
    pub term: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSeedRequest {
    pub id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteSeedRequest {
    pub id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerScrapeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub trends: Vec<TrendWithRelations>,
    pub tier: SubscriptionTier,
    pub is_my_niches_view: bool,
    pub is_limited_by_plan: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub exploding_count: i64,
    pub total_trends: i64,
    pub category_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDetailResponse {
    pub trend: TrendWithRelations,
    pub related: Vec<TrendWithRelations>,
    pub forecast_locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageResponse {
    pub category: Category,
    pub trends: Vec<TrendWithRelations>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionsResponse {
    pub top_predictions: Vec<TrendWithRelations>,
    pub early_signals: Vec<TrendWithRelations>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterResponse {
    pub can_track_niches: bool,
    pub seeds: Vec<SeedWithTrendCount>,
    pub categories: Vec<Category>,
    pub slots_used: i64,
    pub slot_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeedsResponse {
    pub seeds: Vec<SeedWithTrendCount>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
