//! Suitability tiers

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityTier {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl SuitabilityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuitabilityTier::Excellent => "excellent",
            SuitabilityTier::VeryGood => "very_good",
            SuitabilityTier::Good => "good",
            SuitabilityTier::Fair => "fair",
            SuitabilityTier::Poor => "poor",
        }
    }
}

impl fmt::Display for SuitabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) for each tier above poor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
    pub fair: f64,
}

impl TierThresholds {
    pub const fn new(excellent: f64, very_good: f64, good: f64, fair: f64) -> Self {
        Self {
            excellent,
            very_good,
            good,
            fair,
        }
    }

    pub fn classify(&self, total: f64) -> SuitabilityTier {
        if total >= self.excellent {
            SuitabilityTier::Excellent
        } else if total >= self.very_good {
            SuitabilityTier::VeryGood
        } else if total >= self.good {
            SuitabilityTier::Good
        } else if total >= self.fair {
            SuitabilityTier::Fair
        } else {
            SuitabilityTier::Poor
        }
    }
}
