//! Rainfall factor
//!
//! Piecewise-linear response of the estimated rainy-season total against the
//! crop's water envelope:
//!
//! ```text
//! score
//!   C |          ___________
//!     |         /           \____
//! 0.8C|        /                 \____
//! 0.5C|       |                       ‾‾‾‾── 0.4C floor (2 × max)
//!     |       |
//!   0 |_______|___________________________
//!            min  optimal  mid   max
//! ```
//!
//! Full marks hold from optimal to halfway towards max, then fall gently. A
//! deficit drops straight to zero below min while an excess never falls below
//! 0.4 × ceiling: waterlogging can be managed with drainage, drought cannot.

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};
use crate::data::Range3;
use crate::utils::stats::{clamp_score, lerp};

pub struct RainfallFactor;

impl Factor for RainfallFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Rainfall
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let Some(climate) = ctx.usable_climate() else {
            return Err(degraded(self.kind(), ceiling, "no rainfall history for this location"));
        };

        let seasonal = climate.seasonal_rainfall_estimate();
        let water = &ctx.crop.water;
        let score = rainfall_points(seasonal, water, ceiling);

        let reason = if seasonal < water.min {
            format!(
                "Seasonal rainfall (~{:.0} mm) is below the {:.0} mm minimum",
                seasonal, water.min
            )
        } else if score >= ceiling * 0.9 {
            format!("Seasonal rainfall (~{:.0} mm) matches crop water needs", seasonal)
        } else if seasonal < water.optimal {
            format!(
                "Seasonal rainfall (~{:.0} mm) is adequate but short of the {:.0} mm optimum",
                seasonal, water.optimal
            )
        } else {
            format!(
                "Seasonal rainfall (~{:.0} mm) exceeds crop needs; ensure good drainage",
                seasonal
            )
        };

        Ok(FactorOutcome::new(score, reason))
    }
}

/// Points for a seasonal total against a water envelope
pub fn rainfall_points(seasonal: f64, water: &Range3, ceiling: f64) -> f64 {
    let half = ceiling * 0.5;
    let plateau_end = water.optimal + (water.max - water.optimal) * 0.5;

    let score = if seasonal < water.min {
        0.0
    } else if seasonal < water.optimal {
        let span = water.optimal - water.min;
        if span <= f64::EPSILON {
            ceiling
        } else {
            lerp(half, ceiling, (seasonal - water.min) / span)
        }
    } else if seasonal <= plateau_end {
        ceiling
    } else if seasonal <= water.max {
        let span = water.max - plateau_end;
        if span <= f64::EPSILON {
            ceiling
        } else {
            lerp(ceiling, ceiling * 0.8, (seasonal - plateau_end) / span)
        }
    } else {
        let span = water.max.max(1.0);
        lerp(ceiling * 0.8, ceiling * 0.4, (seasonal - water.max) / span)
    };

    clamp_score(score, 0.0, ceiling)
}
