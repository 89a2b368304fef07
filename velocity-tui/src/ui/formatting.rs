use ratatui::style::Color;
use velocity_types::{ForecastStatus, TrendStatus};

use super::theme::ThemeColors;

/// Compact search volume: `1.2M`, `45.0k`, or the plain number
pub fn format_volume(volume: i64) -> String {
    if volume >= 1_000_000 {
        format!("{:.1}M", volume as f64 / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.1}k", volume as f64 / 1_000.0)
    } else {
        volume.to_string()
    }
}

/// Signed growth percentage: `+156%`, `-12.5%`
pub fn format_growth(growth: f64) -> String {
    if growth >= 0.0 {
        format!("+{}%", growth)
    } else {
        format!("{}%", growth)
    }
}

/// Ring colour for a velocity score: dim up to 50, indigo up to 75, emerald above
pub fn velocity_color(score: i64, theme: &ThemeColors) -> Color {
    if score <= 50 {
        theme.velocity_low
    } else if score <= 75 {
        theme.velocity_mid
    } else {
        theme.velocity_high
    }
}

pub fn status_color(status: TrendStatus, theme: &ThemeColors) -> Color {
    match status {
        TrendStatus::Exploding => theme.success,
        TrendStatus::Peaked => theme.warning,
        TrendStatus::Regular | TrendStatus::Discovered => theme.text_dim,
    }
}

pub fn growth_color(growth: f64, theme: &ThemeColors) -> Color {
    if growth > 0.0 {
        theme.success
    } else if growth < 0.0 {
        theme.error
    } else {
        theme.text_dim
    }
}

pub fn format_forecast(status: ForecastStatus, confidence: Option<f64>) -> String {
    let label = match status {
        ForecastStatus::Bullish => "Bullish",
        ForecastStatus::Bearish => "Bearish",
        ForecastStatus::Neutral => "Neutral",
    };
    match confidence {
        Some(c) => format!("{} {:.0}%", label, c),
        None => label.to_string(),
    }
}

/// Format timestamp for display
pub fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// Wrap free text to `width` columns
pub fn wrap_text(content: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    for line in content.lines() {
        for wrapped in textwrap::wrap(line, width.max(1)) {
            lines.push(wrapped.to_string());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::theme;
    use proptest::prelude::*;

    #[test]
    fn test_format_volume_thresholds() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1.0k");
        assert_eq!(format_volume(12_345), "12.3k");
        assert_eq!(format_volume(1_000_000), "1.0M");
        assert_eq!(format_volume(2_450_000), "2.5M");
    }

    #[test]
    fn test_format_growth_sign() {
        assert_eq!(format_growth(156.0), "+156%");
        assert_eq!(format_growth(12.5), "+12.5%");
        assert_eq!(format_growth(0.0), "+0%");
        assert_eq!(format_growth(-8.0), "-8%");
    }

    #[test]
    fn test_velocity_color_bands() {
        let theme = theme();
        assert_eq!(velocity_color(0, &theme), theme.velocity_low);
        assert_eq!(velocity_color(50, &theme), theme.velocity_low);
        assert_eq!(velocity_color(51, &theme), theme.velocity_mid);
        assert_eq!(velocity_color(75, &theme), theme.velocity_mid);
        assert_eq!(velocity_color(76, &theme), theme.velocity_high);
        assert_eq!(velocity_color(100, &theme), theme.velocity_high);
    }

    #[test]
    fn test_format_forecast() {
        assert_eq!(format_forecast(ForecastStatus::Bullish, Some(87.4)), "Bullish 87%");
        assert_eq!(format_forecast(ForecastStatus::Neutral, None), "Neutral");
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("compact mechanical keyboards with low profile switches", 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    proptest! {
        #[test]
        fn prop_small_volumes_print_verbatim(volume in 0i64..1_000) {
            prop_assert_eq!(format_volume(volume), volume.to_string());
        }

        #[test]
        fn prop_thousands_use_k_suffix(volume in 1_000i64..999_000) {
            let formatted = format_volume(volume);
            prop_assert!(formatted.ends_with('k'));
            let value: f64 = formatted.trim_end_matches('k').parse().unwrap();
            prop_assert!((value - volume as f64 / 1_000.0).abs() <= 0.051);
        }

        #[test]
        fn prop_millions_use_m_suffix(volume in 1_000_000i64..10_000_000_000) {
            let formatted = format_volume(volume);
            prop_assert!(formatted.ends_with('M'));
            prop_assert!(formatted.trim_end_matches('M').parse::<f64>().is_ok());
        }

        #[test]
        fn prop_growth_sign_matches_value(growth in -1_000.0f64..10_000.0) {
            let formatted = format_growth(growth);
            prop_assert!(formatted.ends_with('%'));
            prop_assert_eq!(formatted.starts_with('+'), growth >= 0.0);
        }
    }
}
