use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 3] = [
        SubscriptionTier::Free,
        SubscriptionTier::Pro,
        SubscriptionTier::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Business => "business",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "free" => Some(SubscriptionTier::Free),
            "pro" => Some(SubscriptionTier::Pro),
            "business" => Some(SubscriptionTier::Business),
            _ => None,
        }
    }
}

/// Lifecycle status assigned to a trend by the scraping pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Discovered,
    Regular,
    Exploding,
    Peaked,
}

impl TrendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStatus::Discovered => "discovered",
            TrendStatus::Regular => "regular",
            TrendStatus::Exploding => "exploding",
            TrendStatus::Peaked => "peaked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "discovered" => Some(TrendStatus::Discovered),
            "regular" => Some(TrendStatus::Regular),
            "exploding" => Some(TrendStatus::Exploding),
            "peaked" => Some(TrendStatus::Peaked),
            _ => None,
        }
    }

    /// Title-cased label used by cards and badges
    pub fn label(&self) -> &'static str {
        match self {
            TrendStatus::Discovered => "Discovered",
            TrendStatus::Regular => "Regular",
            TrendStatus::Exploding => "Exploding",
            TrendStatus::Peaked => "Peaked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    Manual,
    SeedExpansion,
    UserRequest,
}

impl TrendSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendSource::Manual => "manual",
            TrendSource::SeedExpansion => "seed_expansion",
            TrendSource::UserRequest => "user_request",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(TrendSource::Manual),
            "seed_expansion" => Some(TrendSource::SeedExpansion),
            "user_request" => Some(TrendSource::UserRequest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastStatus {
    Bullish,
    Bearish,
    Neutral,
}

impl ForecastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastStatus::Bullish => "bullish",
            ForecastStatus::Bearish => "bearish",
            ForecastStatus::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bullish" => Some(ForecastStatus::Bullish),
            "bearish" => Some(ForecastStatus::Bearish),
            "neutral" => Some(ForecastStatus::Neutral),
            _ => None,
        }
    }
}

/// Dashboard status filter. `All` still excludes discovered trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Exploding,
    Regular,
    Peaked,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Exploding,
        StatusFilter::Regular,
        StatusFilter::Peaked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Exploding => "exploding",
            StatusFilter::Regular => "regular",
            StatusFilter::Peaked => "peaked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            "exploding" => Some(StatusFilter::Exploding),
            "regular" => Some(StatusFilter::Regular),
            "peaked" => Some(StatusFilter::Peaked),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<TrendStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Exploding => Some(TrendStatus::Exploding),
            StatusFilter::Regular => Some(TrendStatus::Regular),
            StatusFilter::Peaked => Some(TrendStatus::Peaked),
        }
    }
}

/// Minimum growth percentage filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowthFilter {
    #[default]
    All,
    Over100,
    Over500,
}

impl GrowthFilter {
    pub const ALL: [GrowthFilter; 3] = [GrowthFilter::All, GrowthFilter::Over100, GrowthFilter::Over500];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthFilter::All => "all",
            GrowthFilter::Over100 => "100",
            GrowthFilter::Over500 => "500",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(GrowthFilter::All),
            "100" => Some(GrowthFilter::Over100),
            "500" => Some(GrowthFilter::Over500),
            _ => None,
        }
    }

    pub fn min_growth(&self) -> Option<f64> {
        match self {
            GrowthFilter::All => None,
            GrowthFilter::Over100 => Some(100.0),
            GrowthFilter::Over500 => Some(500.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortFilter {
    #[default]
    Newest,
    Growth,
    Volume,
    Velocity,
}

impl SortFilter {
    pub const ALL: [SortFilter; 4] = [
        SortFilter::Newest,
        SortFilter::Growth,
        SortFilter::Volume,
        SortFilter::Velocity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortFilter::Newest => "newest",
            SortFilter::Growth => "growth",
            SortFilter::Volume => "volume",
            SortFilter::Velocity => "velocity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortFilter::Newest),
            "growth" => Some(SortFilter::Growth),
            "volume" => Some(SortFilter::Volume),
            "velocity" => Some(SortFilter::Velocity),
            _ => None,
        }
    }
}
