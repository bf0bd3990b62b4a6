//! Engine configuration
//!
//! All heuristic constants live here so they can be tuned per deployment
//! without touching scoring code. The wet-month threshold and the one-sigma
//! extreme-year rule are heuristic defaults.
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use crate::utils::Month;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for the advisor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub analyzer: AnalyzerConfig,
    pub calendar: CalendarConfig,
    pub cache: CacheConfig,
    /// Number of top-ranked crops that get variety rankings and calendars in `advise`
    pub top_n: usize,
    /// Years of daily history requested from the weather source
    pub history_years: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            calendar: CalendarConfig::default(),
            cache: CacheConfig::default(),
            top_n: 3,
            history_years: 5,
        }
    }
}

/// Historical climate analysis thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Mean daily rainfall (mm/day) above which a month counts as wet
    pub wet_month_threshold_mm_per_day: f64,
    /// Standard deviations from the mean that mark a drought/flood year
    pub extreme_year_sigma: f64,
    /// Second-half/first-half ratio above which the trend is increasing
    pub trend_increase_ratio: f64,
    /// Second-half/first-half ratio below which the trend is decreasing
    pub trend_decrease_ratio: f64,
    /// Minimum years before a trend is reported
    pub min_trend_years: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            wet_month_threshold_mm_per_day: 3.0,
            extreme_year_sigma: 1.0,
            trend_increase_ratio: 1.1,
            trend_decrease_ratio: 0.9,
            min_trend_years: 3,
        }
    }
}

/// Planting calendar preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Canonical best planting months (+10 on the calendar, +10 for variety timing)
    pub preferred_months: Vec<Month>,
    /// Acceptable shoulder months (+5 on the calendar)
    pub secondary_months: Vec<Month>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            preferred_months: vec![Month::November, Month::December],
            secondary_months: vec![Month::October, Month::January],
        }
    }
}

/// Climate profile cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_capacity: 1_000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config: {:?}", path))?;

        let config: EngineConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse engine config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would break scoring invariants
    pub fn validate(&self) -> Result<()> {
        let a = &self.analyzer;
        if !(a.wet_month_threshold_mm_per_day.is_finite() && a.wet_month_threshold_mm_per_day >= 0.0) {
            anyhow::bail!("wet_month_threshold_mm_per_day must be a non-negative number");
        }
        if !(a.extreme_year_sigma.is_finite() && a.extreme_year_sigma > 0.0) {
            anyhow::bail!("extreme_year_sigma must be positive");
        }
        if a.trend_decrease_ratio > a.trend_increase_ratio {
            anyhow::bail!(
                "trend_decrease_ratio ({}) exceeds trend_increase_ratio ({})",
                a.trend_decrease_ratio,
                a.trend_increase_ratio
            );
        }
        if self.top_n == 0 {
            anyhow::bail!("top_n must be at least 1");
        }
        if !(1..=10).contains(&self.history_years) {
            anyhow::bail!("history_years must be within 1..=10, got {}", self.history_years);
        }
        Ok(())
    }
}
