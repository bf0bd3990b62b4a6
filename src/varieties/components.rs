//! Variety/climate compatibility components
//!
//! Every component starts at 50 (neutral) and moves with the variety's
//! capability flags against the location's rainfall history. All results are
//! clamped to 0-100.

use crate::climate::{ClimateProfile, ClimateTrend};
use crate::data::{PlantingHint, VarietyCapabilities};
use crate::utils::stats::clamp_score;
use crate::utils::Month;
use serde::{Deserialize, Serialize};

pub const NEUTRAL: f64 = 50.0;

/// Variability (CV %) at which variability pressure saturates
const VARIABILITY_SATURATION_PCT: f64 = 40.0;
/// Drought ratio at which drought pressure saturates
const DROUGHT_SATURATION_RATIO: f64 = 0.5;

/// Component weights: rainfall, timing, drought, trend, variability
pub const WEIGHTS: [f64; 5] = [0.30, 0.25, 0.20, 0.15, 0.10];

/// The five component scores (0-100 each)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarietyComponentScores {
    pub rainfall_compatibility: f64,
    pub seasonal_timing: f64,
    pub drought_tolerance: f64,
    pub climate_trend_alignment: f64,
    pub variability_resilience: f64,
}

impl VarietyComponentScores {
    pub fn neutral() -> Self {
        Self {
            rainfall_compatibility: NEUTRAL,
            seasonal_timing: NEUTRAL,
            drought_tolerance: NEUTRAL,
            climate_trend_alignment: NEUTRAL,
            variability_resilience: NEUTRAL,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.rainfall_compatibility,
            self.seasonal_timing,
            self.drought_tolerance,
            self.climate_trend_alignment,
            self.variability_resilience,
        ]
    }

    pub fn weighted_total(&self) -> f64 {
        self.as_array()
            .iter()
            .zip(WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum()
    }
}

pub fn rainfall_compatibility(caps: &VarietyCapabilities, climate: &ClimateProfile) -> f64 {
    let mut score = NEUTRAL;
    let drought_ratio = climate.drought_ratio();

    if drought_ratio > 0.3 {
        if caps.drought_tolerant {
            score += 30.0;
        }
        if caps.high_water_requirement {
            score -= 20.0;
        }
    } else if drought_ratio > 0.1 {
        if caps.drought_tolerant {
            score += 15.0;
        }
        if caps.high_water_requirement {
            score -= 10.0;
        }
    }

    if climate.wet_season_share() > 0.7 && caps.high_water_requirement {
        score += 20.0;
    }

    clamp_score(score, 0.0, 100.0)
}

/// Hint months are anchored on the local wet-season onset
pub fn seasonal_timing(hint: PlantingHint, climate: &ClimateProfile, preferred_months: &[Month]) -> f64 {
    let Some(onset) = climate.wet_season_onset() else {
        return NEUTRAL;
    };
    let months = hint.months_from_onset(onset);
    if months.is_empty() {
        return NEUTRAL;
    }

    let overlap = months.iter().filter(|m| climate.wet_months.contains(m)).count();
    let mut score = NEUTRAL;
    if overlap > 0 {
        score += (15.0 * overlap as f64).min(30.0);
    } else {
        score -= 20.0;
    }
    if months.iter().any(|m| preferred_months.contains(m)) {
        score += 10.0;
    }

    clamp_score(score, 0.0, 100.0)
}

/// Combined drought pressure (0-1) from drought frequency and variability
pub fn drought_pressure(climate: &ClimateProfile) -> f64 {
    let frequency = (climate.drought_ratio() / DROUGHT_SATURATION_RATIO).min(1.0);
    let variability = (climate.variability_pct / VARIABILITY_SATURATION_PCT).min(1.0);
    0.7 * frequency + 0.3 * variability
}

pub fn drought_tolerance(caps: &VarietyCapabilities, climate: &ClimateProfile) -> f64 {
    let pressure = drought_pressure(climate);
    let score = if caps.drought_tolerant {
        NEUTRAL + 50.0 * pressure
    } else {
        NEUTRAL - 50.0 * pressure
    };
    clamp_score(score, 0.0, 100.0)
}

pub fn climate_trend_alignment(caps: &VarietyCapabilities, trend: ClimateTrend) -> f64 {
    let wet_adapted = caps.high_water_requirement || caps.flood_tolerant;
    let mut score = NEUTRAL;

    match trend {
        ClimateTrend::Decreasing => {
            if caps.drought_tolerant {
                score += 30.0;
            }
            if caps.high_water_requirement {
                score -= 20.0;
            }
        }
        ClimateTrend::Increasing => {
            if wet_adapted {
                score += 25.0;
            } else if caps.drought_tolerant {
                score -= 10.0;
            }
        }
        ClimateTrend::Stable => {
            if caps.resilient {
                score += 10.0;
            }
        }
        ClimateTrend::InsufficientData | ClimateTrend::NoData => {}
    }

    clamp_score(score, 0.0, 100.0)
}

pub fn variability_resilience(caps: &VarietyCapabilities, variability_pct: f64) -> f64 {
    let factor = (variability_pct / VARIABILITY_SATURATION_PCT).clamp(0.0, 1.0);
    let mut score = NEUTRAL;
    if caps.resilient {
        score += 40.0 * factor;
    }
    if caps.early_maturing {
        score += 20.0 * factor;
    }
    if !caps.resilient && !caps.early_maturing {
        score -= 20.0 * factor;
    }
    clamp_score(score, 0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history(years: usize, drought_years: usize, variability_pct: f64) -> ClimateProfile {
        let mut climate = ClimateProfile::empty();
        climate.years_analyzed = years;
        climate.drought_years = (0..drought_years as i32).map(|i| 2000 + i).collect();
        climate.variability_pct = variability_pct;
        climate.monthly_totals.insert(Month::January, 200.0);
        climate
    }

    fn tolerant() -> VarietyCapabilities {
        VarietyCapabilities {
            drought_tolerant: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_relative_eq!(WEIGHTS.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(VarietyComponentScores::neutral().weighted_total(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_drought_tolerance_rises_with_drought_risk() {
        // ratio 0.5 (5 of 10) vs 0.05 (1 of 20)
        let risky = history(10, 5, 20.0);
        let calm = history(20, 1, 20.0);
        assert!(drought_tolerance(&tolerant(), &risky) > drought_tolerance(&tolerant(), &calm));
        assert!(drought_tolerance(&VarietyCapabilities::default(), &risky) < NEUTRAL);
    }

    #[test]
    fn test_rainfall_compatibility_bands() {
        let high_water = VarietyCapabilities {
            high_water_requirement: true,
            ..Default::default()
        };
        let severe = history(10, 4, 0.0);
        let mild = history(10, 2, 0.0);
        assert_eq!(rainfall_compatibility(&tolerant(), &severe), 80.0);
        assert_eq!(rainfall_compatibility(&tolerant(), &mild), 65.0);
        // all rain in the single wet month: -20 for drought, +20 for wet share
        let mut severe_wet = severe.clone();
        severe_wet.wet_months.insert(Month::January);
        assert_eq!(rainfall_compatibility(&high_water, &severe_wet), 50.0);
    }

    #[test]
    fn test_seasonal_timing_anchored_on_onset() {
        let mut climate = ClimateProfile::empty();
        climate.years_analyzed = 3;
        for month in [Month::November, Month::December, Month::January, Month::February] {
            climate.monthly_totals.insert(month, 150.0);
            climate.wet_months.insert(month);
        }
        let preferred = [Month::November, Month::December];

        // mid: Nov + Dec, both wet, both preferred
        assert_eq!(seasonal_timing(PlantingHint::MidSeason, &climate, &preferred), 90.0);
        // early: Oct (dry) + Nov (wet)
        assert_eq!(seasonal_timing(PlantingHint::EarlySeason, &climate, &preferred), 75.0);
        assert_eq!(seasonal_timing(PlantingHint::Unspecified, &climate, &preferred), NEUTRAL);
        assert_eq!(seasonal_timing(PlantingHint::MidSeason, &ClimateProfile::empty(), &preferred), NEUTRAL);
    }

    #[test]
    fn test_trend_alignment() {
        let flood = VarietyCapabilities {
            flood_tolerant: true,
            ..Default::default()
        };
        assert_eq!(climate_trend_alignment(&tolerant(), ClimateTrend::Decreasing), 80.0);
        assert_eq!(climate_trend_alignment(&tolerant(), ClimateTrend::Increasing), 40.0);
        assert_eq!(climate_trend_alignment(&flood, ClimateTrend::Increasing), 75.0);
        assert_eq!(climate_trend_alignment(&flood, ClimateTrend::InsufficientData), NEUTRAL);
    }

    #[test]
    fn test_variability_resilience() {
        let resilient = VarietyCapabilities {
            resilient: true,
            early_maturing: true,
            ..Default::default()
        };
        assert_eq!(variability_resilience(&resilient, 80.0), 100.0);
        assert_eq!(variability_resilience(&VarietyCapabilities::default(), 20.0), 40.0);
        assert_eq!(variability_resilience(&resilient, 0.0), NEUTRAL);
    }
}
