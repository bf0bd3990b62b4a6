//! Climate trend factor - seasonal rainfall regime vs crop water habit

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};

const LOW_RAINFALL_MM: f64 = 300.0;
const HIGH_RAINFALL_MM: f64 = 800.0;

pub struct ClimateTrendFactor;

impl Factor for ClimateTrendFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::ClimateTrend
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let Some(climate) = ctx.usable_climate() else {
            return Err(degraded(self.kind(), ceiling, "no rainfall history for trend assessment"));
        };
        let seasonal = climate.seasonal_rainfall_estimate();
        let crop = ctx.crop;

        let outcome = if seasonal < LOW_RAINFALL_MM {
            if crop.has_drought_tolerant_variety() {
                FactorOutcome::new(ceiling, "Drought-tolerant crop suits the dry regime")
            } else {
                FactorOutcome::new(ceiling * 0.2, "Dry regime is a poor fit for this crop")
            }
        } else if seasonal > HIGH_RAINFALL_MM {
            if crop.is_water_loving() {
                FactorOutcome::new(ceiling, "Water-loving crop suits the wet regime")
            } else {
                FactorOutcome::new(ceiling * 0.2, "Wet regime is a poor fit for this crop")
            }
        } else {
            FactorOutcome::new(ceiling * 0.5, "Rainfall regime is moderate")
        };
        Ok(outcome)
    }
}
