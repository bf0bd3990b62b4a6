//! Weather-variety matcher
//!
//! Ranks a crop's varieties against a location's rainfall history. Without a
//! usable history every variety gets the neutral 50 and the ranking is marked
//! unmatched, so callers can tell "no preference" from "equally good".

use super::components::{
    climate_trend_alignment, drought_tolerance, rainfall_compatibility, seasonal_timing,
    variability_resilience, VarietyComponentScores, NEUTRAL,
};
use crate::climate::ClimateProfile;
use crate::config::CalendarConfig;
use crate::data::Variety;
use crate::error::ComputationDegraded;
use crate::utils::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarietyTier {
    Poor,
    Fair,
    Moderate,
    Good,
    VeryGood,
    Excellent,
}

impl VarietyTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            VarietyTier::Excellent
        } else if score >= 70.0 {
            VarietyTier::VeryGood
        } else if score >= 60.0 {
            VarietyTier::Good
        } else if score >= 50.0 {
            VarietyTier::Moderate
        } else if score >= 40.0 {
            VarietyTier::Fair
        } else {
            VarietyTier::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VarietyTier::Excellent => "excellent",
            VarietyTier::VeryGood => "very_good",
            VarietyTier::Good => "good",
            VarietyTier::Moderate => "moderate",
            VarietyTier::Fair => "fair",
            VarietyTier::Poor => "poor",
        }
    }
}

impl fmt::Display for VarietyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarietyWeatherScore {
    pub variety_id: String,
    pub name: String,
    pub component_scores: VarietyComponentScores,
    pub total_score: f64,
    pub tier: VarietyTier,
    /// False when scored without a usable climate profile
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

/// Varieties sorted best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarietyRanking {
    pub status: MatchStatus,
    pub scores: Vec<VarietyWeatherScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<ComputationDegraded>,
}

impl VarietyRanking {
    pub fn best(&self) -> Option<&VarietyWeatherScore> {
        self.scores.first()
    }
}

#[derive(Debug, Clone)]
pub struct WeatherVarietyMatcher {
    preferred_months: Vec<Month>,
}

impl Default for WeatherVarietyMatcher {
    fn default() -> Self {
        Self::new(&CalendarConfig::default())
    }
}

impl WeatherVarietyMatcher {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            preferred_months: config.preferred_months.clone(),
        }
    }

    /// Score and sort varieties; ties keep input order
    pub fn rank(&self, varieties: &[Variety], climate: Option<&ClimateProfile>) -> VarietyRanking {
        let Some(climate) = climate.filter(|c| !c.is_empty()) else {
            tracing::debug!(varieties = varieties.len(), "no climate profile, varieties left unmatched");
            return VarietyRanking {
                status: MatchStatus::Unmatched,
                scores: varieties.iter().map(unmatched_score).collect(),
                degraded: Some(ComputationDegraded::new(
                    "variety_matcher",
                    "no rainfall history for this location",
                    NEUTRAL,
                )),
            };
        };

        let mut scores: Vec<VarietyWeatherScore> = varieties
            .iter()
            .map(|variety| self.score_variety(variety, climate))
            .collect();
        scores.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        VarietyRanking {
            status: MatchStatus::Matched,
            scores,
            degraded: None,
        }
    }

    pub fn score_variety(&self, variety: &Variety, climate: &ClimateProfile) -> VarietyWeatherScore {
        let caps = &variety.capabilities;
        let component_scores = VarietyComponentScores {
            rainfall_compatibility: rainfall_compatibility(caps, climate),
            seasonal_timing: seasonal_timing(variety.planting_hint, climate, &self.preferred_months),
            drought_tolerance: drought_tolerance(caps, climate),
            climate_trend_alignment: climate_trend_alignment(caps, climate.trend),
            variability_resilience: variability_resilience(caps, climate.variability_pct),
        };
        let total_score = component_scores.weighted_total();

        VarietyWeatherScore {
            variety_id: variety.variety_id.clone(),
            name: variety.name.clone(),
            component_scores,
            total_score,
            tier: VarietyTier::from_score(total_score),
            matched: true,
        }
    }
}

fn unmatched_score(variety: &Variety) -> VarietyWeatherScore {
    VarietyWeatherScore {
        variety_id: variety.variety_id.clone(),
        name: variety.name.clone(),
        component_scores: VarietyComponentScores::neutral(),
        total_score: NEUTRAL,
        tier: VarietyTier::from_score(NEUTRAL),
        matched: false,
    }
}
