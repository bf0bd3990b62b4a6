//! Suitability factors
//!
//! Each factor is a small strategy with the same shape:
//! `(context, ceiling) -> Result<FactorOutcome, ComputationDegraded>`.
//! Profiles decide which factors run and with which ceiling; factors never
//! know which profile they belong to.
//!
//! A factor that cannot be evaluated (missing current weather, no climate
//! history, ...) returns `ComputationDegraded` carrying its neutral value
//! (half the ceiling). The scorer substitutes that value and keeps the note.

pub mod rainfall;
pub mod temperature;
pub mod timing;
pub mod humidity;
pub mod drought;
pub mod soil;
pub mod market;
pub mod climate_trend;

use crate::climate::ClimateProfile;
use crate::data::{CropRequirement, CurrentWeather, SoilData};
use crate::error::ComputationDegraded;
use crate::utils::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use rainfall::RainfallFactor;
pub use temperature::TemperatureFactor;
pub use timing::TimingFactor;
pub use humidity::HumidityFactor;
pub use drought::DroughtToleranceFactor;
pub use soil::SoilFactor;
pub use market::{InputAvailabilityFactor, MarketDemandFactor};
pub use climate_trend::ClimateTrendFactor;

/// Named scoring factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Rainfall,
    Temperature,
    Timing,
    Humidity,
    DroughtTolerance,
    SoilSuitability,
    MarketDemand,
    InputAvailability,
    ClimateTrend,
}

impl FactorKind {
    /// Component key as reported to callers
    pub fn key(&self) -> &'static str {
        match self {
            FactorKind::Rainfall => "rainfall_score",
            FactorKind::Temperature => "temperature_score",
            FactorKind::Timing => "timing_score",
            FactorKind::Humidity => "humidity_score",
            FactorKind::DroughtTolerance => "drought_tolerance_score",
            FactorKind::SoilSuitability => "soil_suitability_score",
            FactorKind::MarketDemand => "market_demand_score",
            FactorKind::InputAvailability => "input_availability_score",
            FactorKind::ClimateTrend => "climate_trend_score",
        }
    }

    /// Strategy implementing this factor
    pub fn strategy(&self) -> &'static dyn Factor {
        match self {
            FactorKind::Rainfall => &RainfallFactor,
            FactorKind::Temperature => &TemperatureFactor,
            FactorKind::Timing => &TimingFactor,
            FactorKind::Humidity => &HumidityFactor,
            FactorKind::DroughtTolerance => &DroughtToleranceFactor,
            FactorKind::SoilSuitability => &SoilFactor,
            FactorKind::MarketDemand => &MarketDemandFactor,
            FactorKind::InputAvailability => &InputAvailabilityFactor,
            FactorKind::ClimateTrend => &ClimateTrendFactor,
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Everything a factor may look at
#[derive(Debug, Clone, Copy)]
pub struct FactorContext<'a> {
    pub crop: &'a CropRequirement,
    pub climate: Option<&'a ClimateProfile>,
    pub weather: Option<&'a CurrentWeather>,
    pub soil: Option<&'a SoilData>,
    pub current_month: Month,
}

impl<'a> FactorContext<'a> {
    /// Climate profile only if it holds usable data
    pub fn usable_climate(&self) -> Option<&'a ClimateProfile> {
        self.climate.filter(|c| !c.is_empty())
    }
}

/// Score and explanation from one factor
#[derive(Debug, Clone, PartialEq)]
pub struct FactorOutcome {
    pub score: f64,
    pub reason: String,
}

impl FactorOutcome {
    pub fn new(score: f64, reason: impl Into<String>) -> Self {
        Self {
            score,
            reason: reason.into(),
        }
    }
}

pub type FactorResult = Result<FactorOutcome, ComputationDegraded>;

/// Scoring strategy
pub trait Factor: Send + Sync {
    fn kind(&self) -> FactorKind;

    /// Score in `[0, ceiling]`
    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult;
}

/// Neutral fallback for a factor that could not be evaluated
pub(crate) fn degraded(kind: FactorKind, ceiling: f64, detail: impl Into<String>) -> ComputationDegraded {
    ComputationDegraded::new(kind.key(), detail, ceiling * 0.5)
}
