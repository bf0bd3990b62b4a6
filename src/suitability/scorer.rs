//! Multi-factor suitability scorer
//!
//! Runs the factors of a `ScoringProfile` in table order against one crop and
//! sums the results. Stateless: one instance serves every request.

use super::factors::{FactorContext, FactorKind};
use super::profile::{ProfileKind, ScoringProfile};
use super::tier::SuitabilityTier;
use crate::climate::ClimateProfile;
use crate::data::{CropRequirement, CurrentWeather, SoilData};
use crate::error::{AdvisorResult, ComputationDegraded};
use crate::utils::stats::clamp_score;
use crate::utils::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Conditions at the site being scored
#[derive(Debug, Clone, Copy)]
pub struct SiteConditions<'a> {
    pub climate: Option<&'a ClimateProfile>,
    pub weather: Option<&'a CurrentWeather>,
    pub soil: Option<&'a SoilData>,
    pub current_month: Month,
}

impl<'a> SiteConditions<'a> {
    pub fn new(current_month: Month) -> Self {
        Self {
            climate: None,
            weather: None,
            soil: None,
            current_month,
        }
    }

    pub fn with_climate(mut self, climate: &'a ClimateProfile) -> Self {
        self.climate = Some(climate);
        self
    }

    pub fn with_weather(mut self, weather: &'a CurrentWeather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_soil(mut self, soil: &'a SoilData) -> Self {
        self.soil = Some(soil);
        self
    }
}

/// One factor's contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub factor: FactorKind,
    pub score: f64,
    pub ceiling: f64,
}

/// Factor scores in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents(Vec<ComponentScore>);

impl ScoreComponents {
    pub fn iter(&self) -> impl Iterator<Item = &ComponentScore> {
        self.0.iter()
    }

    pub fn get(&self, factor: FactorKind) -> Option<f64> {
        self.0.iter().find(|c| c.factor == factor).map(|c| c.score)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of component scores, in evaluation order
    pub fn total(&self) -> f64 {
        self.0.iter().map(|c| c.score).sum()
    }

    /// Scores keyed by component name (`rainfall_score`, ...)
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.0.iter().map(|c| (c.factor.key(), c.score)).collect()
    }

    fn push(&mut self, component: ComponentScore) {
        self.0.push(component);
    }
}

/// Result of scoring one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityScore {
    pub crop_id: String,
    pub profile: ProfileKind,
    pub components: ScoreComponents,
    pub total_score: f64,
    pub max_score: f64,
    pub tier: SuitabilityTier,
    /// One explanation per factor, in evaluation order
    pub reasons: Vec<String>,
    /// Factors that fell back to their neutral value
    pub degraded: Vec<ComputationDegraded>,
}

impl SuitabilityScore {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuitabilityScorer;

impl SuitabilityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a crop under a profile
    ///
    /// Fails only for malformed crop records. Missing site data never fails:
    /// the affected factors contribute half their ceiling and are listed in
    /// `degraded`.
    pub fn score(
        &self,
        crop: &CropRequirement,
        site: &SiteConditions<'_>,
        profile: &ScoringProfile,
    ) -> AdvisorResult<SuitabilityScore> {
        crop.validate()?;

        let ctx = FactorContext {
            crop,
            climate: site.climate,
            weather: site.weather,
            soil: site.soil,
            current_month: site.current_month,
        };

        let mut components = ScoreComponents::default();
        let mut reasons = Vec::with_capacity(profile.ceilings.len());
        let mut degraded = Vec::new();

        for &(factor, ceiling) in &profile.ceilings {
            let score = match factor.strategy().evaluate(&ctx, ceiling) {
                Ok(outcome) => {
                    reasons.push(outcome.reason);
                    outcome.score
                }
                Err(note) => {
                    tracing::debug!(crop = %crop.crop_id, factor = %factor, "{}", note);
                    reasons.push(format!("{} (neutral score applied)", capitalise(&note.detail)));
                    let substituted = note.substituted;
                    degraded.push(note);
                    substituted
                }
            };
            components.push(ComponentScore {
                factor,
                score: clamp_score(score, 0.0, ceiling),
                ceiling,
            });
        }

        let total_score = components.total();
        let tier = profile.classify(total_score);

        Ok(SuitabilityScore {
            crop_id: crop.crop_id.clone(),
            profile: profile.kind,
            components,
            total_score,
            max_score: profile.max_score(),
            tier,
            reasons,
            degraded,
        })
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
