//! Confidence scorer
//!
//! How far a recommendation can be trusted, from the shape of its inputs
//! rather than the crop's suitability. Five sub-scores in [0, 1]:
//!
//! | sub-score        | weight | source                                       |
//! |------------------|--------|----------------------------------------------|
//! | completeness     | 0.25   | evaluated factor coverage, non-zero share    |
//! | freshness        | 0.20   | age of the weather observation               |
//! | weather quality  | 0.20   | field coverage × plausibility                |
//! | rainfall quality | 0.20   | field coverage × historical/forecast ratio   |
//! | strength         | 0.15   | normalised total blended with tier           |
//!
//! Factors that fell back to a neutral value (listed in `degraded`) count as
//! missing for completeness.
//!
//! `assess` never fails. Inputs it cannot make sense of (NaN scores, negative
//! ages) produce the neutral assessment with a single explanatory suggestion.

use crate::data::{CurrentWeather, RainfallSummary};
use crate::error::{AdvisorError, AdvisorResult, ComputationDegraded};
use crate::suitability::{ProfileKind, ScoreComponents, ScoringProfile, SuitabilityTier};
use crate::utils::stats::clamp_score;
use serde::{Deserialize, Serialize};

const WEIGHTS: [f64; 5] = [0.25, 0.20, 0.20, 0.20, 0.15];

pub const FALLBACK_SUGGESTION: &str = "unable to calculate confidence accurately";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            ConfidenceTier::High
        } else if score >= 0.6 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

/// Everything the scorer looks at; any field may be missing
#[derive(Debug, Clone, Default)]
pub struct ConfidenceInputs {
    pub score_components: Option<ScoreComponents>,
    pub total_score: Option<f64>,
    pub tier: Option<SuitabilityTier>,
    /// Profile the components were scored under (base when unknown)
    pub profile: Option<ProfileKind>,
    pub weather: Option<CurrentWeather>,
    pub rainfall: Option<RainfallSummary>,
    pub data_age_hours: Option<f64>,
    /// Factor fallbacks reported by the scorer
    pub degraded: Vec<ComputationDegraded>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub completeness: f64,
    pub freshness: f64,
    pub weather_quality: f64,
    pub rainfall_quality: f64,
    pub strength: f64,
}

impl ConfidenceBreakdown {
    fn overall(&self) -> f64 {
        let parts = [
            self.completeness,
            self.freshness,
            self.weather_quality,
            self.rainfall_quality,
            self.strength,
        ];
        parts.iter().zip(WEIGHTS.iter()).map(|(p, w)| p * w).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub score: f64,
    pub tier: ConfidenceTier,
    pub data_quality: f64,
    pub suggestions: Vec<String>,
    /// Absent on the fallback assessment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ConfidenceBreakdown>,
}

impl ConfidenceAssessment {
    /// Neutral assessment used when inputs cannot be evaluated
    pub fn fallback() -> Self {
        Self {
            score: 0.5,
            tier: ConfidenceTier::Medium,
            data_quality: 0.5,
            suggestions: vec![FALLBACK_SUGGESTION.to_string()],
            breakdown: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, inputs: &ConfidenceInputs) -> ConfidenceAssessment {
        match self.try_assess(inputs) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::warn!("confidence fell back to neutral: {}", e);
                ConfidenceAssessment::fallback()
            }
        }
    }

    fn try_assess(&self, inputs: &ConfidenceInputs) -> AdvisorResult<ConfidenceAssessment> {
        check_inputs(inputs)?;
        let profile = ScoringProfile::for_kind(inputs.profile.unwrap_or_default());

        let breakdown = ConfidenceBreakdown {
            completeness: completeness(inputs.score_components.as_ref(), &inputs.degraded, &profile),
            freshness: freshness(inputs.data_age_hours),
            weather_quality: weather_quality(inputs.weather.as_ref()),
            rainfall_quality: rainfall_quality(inputs.rainfall.as_ref()),
            strength: strength(inputs.total_score, inputs.tier, profile.max_score()),
        };

        let score = breakdown.overall();
        if !score.is_finite() {
            return Err(AdvisorError::Internal("confidence blend is not finite".to_string()));
        }
        let score = clamp_score(score, 0.0, 1.0);
        let data_quality =
            (breakdown.freshness + breakdown.weather_quality + breakdown.rainfall_quality) / 3.0;

        Ok(ConfidenceAssessment {
            score,
            tier: ConfidenceTier::from_score(score),
            data_quality: clamp_score(data_quality, 0.0, 1.0),
            suggestions: suggestions(&breakdown, inputs.degraded.len()),
            breakdown: Some(breakdown),
        })
    }
}

fn check_inputs(inputs: &ConfidenceInputs) -> AdvisorResult<()> {
    if let Some(age) = inputs.data_age_hours {
        if !age.is_finite() || age < 0.0 {
            return Err(AdvisorError::invalid(format!("data age {} is not a valid age", age)));
        }
    }
    if inputs.total_score.is_some_and(|t| !t.is_finite()) {
        return Err(AdvisorError::invalid("total score is not finite"));
    }
    if let Some(components) = &inputs.score_components {
        if components.iter().any(|c| !c.score.is_finite()) {
            return Err(AdvisorError::invalid("score component is not finite"));
        }
    }
    Ok(())
}

// ============================================================================
// Sub-scores
// ============================================================================

fn completeness(
    components: Option<&ScoreComponents>,
    degraded: &[ComputationDegraded],
    profile: &ScoringProfile,
) -> f64 {
    let Some(components) = components else {
        return 0.0;
    };
    let expected = profile.ceilings.len();
    if expected == 0 {
        return 0.0;
    }

    let present: Vec<f64> = profile
        .ceilings
        .iter()
        .filter(|(kind, _)| !degraded.iter().any(|d| d.source_name == kind.key()))
        .filter_map(|(kind, _)| components.get(*kind))
        .collect();
    let coverage = present.len() as f64 / expected as f64;
    let non_zero = if present.is_empty() {
        0.0
    } else {
        present.iter().filter(|s| **s > 0.0).count() as f64 / present.len() as f64
    };

    0.6 * coverage + 0.4 * non_zero
}

fn freshness(age_hours: Option<f64>) -> f64 {
    match age_hours {
        None => 0.5,
        Some(h) if h <= 1.0 => 1.0,
        Some(h) if h <= 6.0 => 0.9,
        Some(h) if h <= 12.0 => 0.8,
        Some(h) if h <= 24.0 => 0.6,
        Some(_) => 0.2,
    }
}

fn weather_quality(weather: Option<&CurrentWeather>) -> f64 {
    let Some(weather) = weather else {
        return 0.0;
    };
    let checks = [
        weather.temperature_c.map(|t| (0.0..=50.0).contains(&t)),
        weather.humidity_pct.map(|h| (0.0..=100.0).contains(&h)),
    ];
    coverage_times_share(&checks)
}

fn rainfall_quality(rainfall: Option<&RainfallSummary>) -> f64 {
    let Some(rainfall) = rainfall else {
        return 0.0;
    };
    let present = [rainfall.historical_mm, rainfall.forecast_mm]
        .iter()
        .filter(|v| v.is_some())
        .count();
    let coverage = present as f64 / 2.0;

    let consistency = match (rainfall.historical_mm, rainfall.forecast_mm) {
        (Some(historical), Some(forecast)) if historical > 0.0 => {
            let ratio = forecast / historical;
            if (0.1..=10.0).contains(&ratio) {
                1.0
            } else {
                0.5
            }
        }
        (Some(_), Some(forecast)) if forecast > 0.0 => 0.5,
        _ => 1.0,
    };

    coverage * consistency
}

fn strength(total: Option<f64>, tier: Option<SuitabilityTier>, max_score: f64) -> f64 {
    let normalised = match total {
        Some(t) if max_score > 0.0 => clamp_score(t / max_score, 0.0, 1.0),
        _ => 0.0,
    };
    let tier_confidence = match tier {
        Some(SuitabilityTier::Excellent) => 0.95,
        Some(SuitabilityTier::VeryGood) => 0.85,
        Some(SuitabilityTier::Good) => 0.7,
        Some(SuitabilityTier::Fair) => 0.5,
        Some(SuitabilityTier::Poor) | None => 0.3,
    };
    0.6 * normalised + 0.4 * tier_confidence
}

/// Share of fields present times share of present fields that pass
fn coverage_times_share(checks: &[Option<bool>]) -> f64 {
    let present: Vec<bool> = checks.iter().flatten().copied().collect();
    if present.is_empty() {
        return 0.0;
    }
    let coverage = present.len() as f64 / checks.len() as f64;
    let passing = present.iter().filter(|ok| **ok).count() as f64 / present.len() as f64;
    coverage * passing
}

fn suggestions(breakdown: &ConfidenceBreakdown, degraded_factors: usize) -> Vec<String> {
    let mut out = Vec::new();
    if breakdown.completeness < 0.7 || degraded_factors > 0 {
        out.push("provide more complete crop and location data".to_string());
    }
    if breakdown.freshness < 0.6 {
        out.push("update weather data more frequently".to_string());
    }
    if breakdown.weather_quality < 0.7 {
        out.push("verify current temperature and humidity readings".to_string());
    }
    if breakdown.rainfall_quality < 0.7 {
        out.push("add historical and forecast rainfall data".to_string());
    }
    if breakdown.strength < 0.5 {
        out.push("consider alternative crops with stronger suitability".to_string());
    }
    if out.is_empty() {
        out.push("data quality is good; recommendation is reliable".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateProfile;
    use crate::data::reference_crops::maize;
    use crate::suitability::{SiteConditions, SuitabilityScorer};
    use crate::utils::Month;
    use approx::assert_relative_eq;

    fn good_weather() -> CurrentWeather {
        CurrentWeather {
            temperature_c: Some(24.0),
            humidity_pct: Some(65.0),
            rainfall_7day_mm: Some(30.0),
            forecast_7day_mm: Some(25.0),
            observed_at: None,
        }
    }

    fn complete_inputs() -> ConfidenceInputs {
        let weather = good_weather();
        let site = SiteConditions::new(Month::November).with_weather(&weather);
        let score = SuitabilityScorer::new()
            .score(&maize(), &site, &ScoringProfile::base())
            .unwrap();

        ConfidenceInputs {
            score_components: Some(score.components.clone()),
            total_score: Some(score.total_score),
            tier: Some(score.tier),
            profile: Some(ProfileKind::Base),
            weather: Some(weather),
            rainfall: Some(RainfallSummary {
                historical_mm: Some(120.0),
                forecast_mm: Some(80.0),
            }),
            data_age_hours: Some(0.5),
            degraded: score.degraded,
        }
    }

    fn summer_climate() -> ClimateProfile {
        let mut climate = ClimateProfile::empty();
        climate.years_analyzed = 5;
        climate.mean_annual_mm = 820.0;
        for (month, total) in [
            (Month::November, 100.0),
            (Month::December, 150.0),
            (Month::January, 190.0),
            (Month::February, 170.0),
            (Month::March, 110.0),
        ] {
            climate.monthly_totals.insert(month, total);
            climate.wet_months.insert(month);
        }
        climate
    }

    fn inputs_for(site: &SiteConditions<'_>, profile: &ScoringProfile) -> ConfidenceInputs {
        let score = SuitabilityScorer::new().score(&maize(), site, profile).unwrap();
        ConfidenceInputs {
            score_components: Some(score.components.clone()),
            total_score: Some(score.total_score),
            tier: Some(score.tier),
            profile: Some(profile.kind),
            weather: site.weather.cloned(),
            rainfall: Some(RainfallSummary {
                historical_mm: Some(120.0),
                forecast_mm: Some(80.0),
            }),
            data_age_hours: Some(0.5),
            degraded: score.degraded,
        }
    }

    #[test]
    fn test_empty_inputs_never_fail() {
        let assessment = ConfidenceScorer::new().assess(&ConfidenceInputs::default());
        assert!((0.0..=1.0).contains(&assessment.score));
        assert!((0.0..=1.0).contains(&assessment.data_quality));
        assert_eq!(assessment.tier, ConfidenceTier::Low);
        assert!(!assessment.suggestions.is_empty());
        assert!(assessment.breakdown.is_some());
    }

    #[test]
    fn test_stale_data_suggests_refresh() {
        let mut inputs = complete_inputs();
        inputs.data_age_hours = Some(48.0);
        let assessment = ConfidenceScorer::new().assess(&inputs);
        assert!(assessment
            .suggestions
            .iter()
            .any(|s| s == "update weather data more frequently"));
    }

    #[test]
    fn test_complete_fresh_inputs_score_higher() {
        let scorer = ConfidenceScorer::new();
        let full = scorer.assess(&complete_inputs());
        let empty = scorer.assess(&ConfidenceInputs::default());
        assert!(full.score > empty.score);
        assert!(full.data_quality > empty.data_quality);
        assert!(!full.suggestions.is_empty());
    }

    #[test]
    fn test_bad_inputs_fall_back() {
        let scorer = ConfidenceScorer::new();
        for inputs in [
            ConfidenceInputs {
                data_age_hours: Some(-3.0),
                ..Default::default()
            },
            ConfidenceInputs {
                total_score: Some(f64::NAN),
                ..Default::default()
            },
        ] {
            let assessment = scorer.assess(&inputs);
            assert_eq!(assessment, ConfidenceAssessment::fallback());
            assert_eq!(assessment.suggestions, vec![FALLBACK_SUGGESTION.to_string()]);
        }
    }

    #[test]
    fn test_freshness_steps() {
        assert_eq!(freshness(Some(0.0)), 1.0);
        assert_eq!(freshness(Some(6.0)), 0.9);
        assert_eq!(freshness(Some(12.0)), 0.8);
        assert_eq!(freshness(Some(24.0)), 0.6);
        assert_eq!(freshness(Some(24.1)), 0.2);
        assert_eq!(freshness(None), 0.5);
    }

    #[test]
    fn test_rainfall_consistency() {
        let consistent = RainfallSummary {
            historical_mm: Some(100.0),
            forecast_mm: Some(50.0),
        };
        let wild = RainfallSummary {
            historical_mm: Some(100.0),
            forecast_mm: Some(2000.0),
        };
        let partial = RainfallSummary {
            historical_mm: Some(100.0),
            forecast_mm: None,
        };
        assert_relative_eq!(rainfall_quality(Some(&consistent)), 1.0);
        assert_relative_eq!(rainfall_quality(Some(&wild)), 0.5);
        assert_relative_eq!(rainfall_quality(Some(&partial)), 0.5);
    }

    #[test]
    fn test_implausible_weather_penalised() {
        let hot = CurrentWeather {
            temperature_c: Some(70.0),
            humidity_pct: Some(50.0),
            ..Default::default()
        };
        assert_relative_eq!(weather_quality(Some(&hot)), 0.5);
        assert_relative_eq!(weather_quality(Some(&good_weather())), 1.0);
    }

    #[test]
    fn test_neutral_fallbacks_count_as_missing() {
        // No history, no weather: rainfall, temperature and humidity fall back
        let site = SiteConditions::new(Month::November);
        let inputs = inputs_for(&site, &ScoringProfile::base());
        assert_eq!(inputs.degraded.len(), 3);

        let assessment = ConfidenceScorer::new().assess(&inputs);
        let breakdown = assessment.breakdown.unwrap();
        // coverage 2/5, both evaluated factors non-zero
        assert_relative_eq!(breakdown.completeness, 0.6 * 0.4 + 0.4, epsilon = 1e-9);
        assert!(assessment
            .suggestions
            .iter()
            .any(|s| s == "provide more complete crop and location data"));

        let undegraded = ConfidenceInputs {
            degraded: Vec::new(),
            ..inputs
        };
        let unflagged = ConfidenceScorer::new().assess(&undegraded);
        assert!(unflagged.breakdown.unwrap().completeness > breakdown.completeness);
    }

    #[test]
    fn test_single_missing_factor_flags_completeness() {
        // Enhanced profile with everything but soil data
        let climate = summer_climate();
        let weather = good_weather();
        let site = SiteConditions::new(Month::November)
            .with_climate(&climate)
            .with_weather(&weather);
        let inputs = inputs_for(&site, &ScoringProfile::enhanced());
        let sources: Vec<&str> = inputs.degraded.iter().map(|d| d.source_name.as_str()).collect();
        assert_eq!(sources, vec!["soil_suitability_score"]);

        let assessment = ConfidenceScorer::new().assess(&inputs);
        let completeness = assessment.breakdown.unwrap().completeness;
        assert!(completeness < 1.0);
        assert_relative_eq!(completeness, 0.6 * 8.0 / 9.0 + 0.4, epsilon = 1e-9);
        assert!(assessment
            .suggestions
            .iter()
            .any(|s| s == "provide more complete crop and location data"));
    }

    #[test]
    fn test_deterministic() {
        let scorer = ConfidenceScorer::new();
        assert_eq!(scorer.assess(&complete_inputs()), scorer.assess(&complete_inputs()));
    }
}
