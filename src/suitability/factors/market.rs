//! Market demand and input availability factors
//!
//! Static regional lookups. Crops missing from the tables are treated as
//! medium on both axes.

use super::{Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};
use serde::{Deserialize, Serialize};

/// Coarse three-level rating used by both lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn multiplier(self) -> f64 {
        match self {
            Level::High => 1.0,
            Level::Medium => 0.6,
            Level::Low => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

pub fn market_demand(crop_id: &str) -> Level {
    match crop_id {
        "maize" | "soybean" | "groundnut" => Level::High,
        "sorghum" | "rice" | "cassava" | "beans" | "sunflower" => Level::Medium,
        "millet" | "sweet_potato" => Level::Low,
        _ => Level::Medium,
    }
}

/// Availability of seed, fertiliser and other inputs
pub fn input_availability(crop_id: &str) -> Level {
    match crop_id {
        "maize" | "soybean" | "sorghum" | "groundnut" | "cassava" => Level::High,
        "rice" | "beans" | "sunflower" => Level::Medium,
        "millet" => Level::Low,
        _ => Level::Medium,
    }
}

pub struct MarketDemandFactor;

impl Factor for MarketDemandFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::MarketDemand
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let level = market_demand(&ctx.crop.crop_id);
        Ok(FactorOutcome::new(
            ceiling * level.multiplier(),
            format!("Market demand is {}", level.as_str()),
        ))
    }
}

pub struct InputAvailabilityFactor;

impl Factor for InputAvailabilityFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::InputAvailability
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let level = input_availability(&ctx.crop.crop_id);
        Ok(FactorOutcome::new(
            ceiling * level.multiplier(),
            format!("Input availability is {}", level.as_str()),
        ))
    }
}
