//! Scoring profiles - ceiling tables plus tier thresholds
//!
//! | factor            | base | rainy | dry | enhanced |
//! |-------------------|------|-------|-----|----------|
//! | rainfall          | 40   | 35    | 30  | 40       |
//! | temperature       | 25   | 25    | 25  | 25       |
//! | timing            | 20   | 25    | 20  | 20       |
//! | humidity          | 10   | 10    | 10  | 10       |
//! | drought tolerance | 5    | 5     | 15  | 5        |
//! | soil              | -    | -     | -   | 10       |
//! | market demand     | -    | -     | -   | 5        |
//! | input availability| -    | -     | -   | 5        |
//! | climate trend     | -    | -     | -   | 5        |

use super::factors::FactorKind;
use super::tier::{SuitabilityTier, TierThresholds};
use crate::climate::ClimateProfile;
use crate::utils::Month;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    #[default]
    Base,
    Rainy,
    Dry,
    Enhanced,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Base => "base",
            ProfileKind::Rainy => "rainy",
            ProfileKind::Dry => "dry",
            ProfileKind::Enhanced => "enhanced",
        }
    }
}

/// Which factors run, their ceilings (in evaluation order), and the tier cut-points
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    pub kind: ProfileKind,
    pub ceilings: Vec<(FactorKind, f64)>,
    pub thresholds: TierThresholds,
}

impl ScoringProfile {
    pub fn base() -> Self {
        Self::hundred_point(ProfileKind::Base, [40.0, 25.0, 20.0, 10.0, 5.0])
    }

    /// Timing matters more while the rains are on
    pub fn rainy() -> Self {
        Self::hundred_point(ProfileKind::Rainy, [35.0, 25.0, 25.0, 10.0, 5.0])
    }

    /// Drought tolerance matters more in the dry season
    pub fn dry() -> Self {
        Self::hundred_point(ProfileKind::Dry, [30.0, 25.0, 20.0, 10.0, 15.0])
    }

    /// Base factors plus soil, market, inputs and climate trend (125 points)
    pub fn enhanced() -> Self {
        Self {
            kind: ProfileKind::Enhanced,
            ceilings: vec![
                (FactorKind::Rainfall, 40.0),
                (FactorKind::Temperature, 25.0),
                (FactorKind::Timing, 20.0),
                (FactorKind::Humidity, 10.0),
                (FactorKind::DroughtTolerance, 5.0),
                (FactorKind::SoilSuitability, 10.0),
                (FactorKind::MarketDemand, 5.0),
                (FactorKind::InputAvailability, 5.0),
                (FactorKind::ClimateTrend, 5.0),
            ],
            thresholds: TierThresholds::new(100.0, 85.0, 70.0, 40.0),
        }
    }

    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Base => Self::base(),
            ProfileKind::Rainy => Self::rainy(),
            ProfileKind::Dry => Self::dry(),
            ProfileKind::Enhanced => Self::enhanced(),
        }
    }

    /// Rainy profile in a wet month, dry profile in a dry month, base otherwise
    pub fn seasonal(current_month: Month, climate: Option<&ClimateProfile>) -> Self {
        match climate.filter(|c| !c.is_empty()) {
            Some(c) if c.wet_months.contains(&current_month) => Self::rainy(),
            Some(c) if c.dry_months.contains(&current_month) => Self::dry(),
            _ => Self::base(),
        }
    }

    fn hundred_point(kind: ProfileKind, ceilings: [f64; 5]) -> Self {
        let factors = [
            FactorKind::Rainfall,
            FactorKind::Temperature,
            FactorKind::Timing,
            FactorKind::Humidity,
            FactorKind::DroughtTolerance,
        ];
        Self {
            kind,
            ceilings: factors.into_iter().zip(ceilings).collect(),
            thresholds: TierThresholds::new(80.0, 68.0, 55.0, 40.0),
        }
    }

    pub fn ceiling(&self, factor: FactorKind) -> Option<f64> {
        self.ceilings
            .iter()
            .find(|(kind, _)| *kind == factor)
            .map(|(_, ceiling)| *ceiling)
    }

    /// Sum of all ceilings
    pub fn max_score(&self) -> f64 {
        self.ceilings.iter().map(|(_, c)| c).sum()
    }

    pub fn classify(&self, total: f64) -> SuitabilityTier {
        self.thresholds.classify(total)
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::base()
    }
}
