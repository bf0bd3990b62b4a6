//! Humidity factor

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};

pub struct HumidityFactor;

impl Factor for HumidityFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Humidity
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let Some(humidity) = ctx.weather.and_then(|w| w.humidity_pct).filter(|h| h.is_finite()) else {
            return Err(degraded(self.kind(), ceiling, "current humidity unavailable"));
        };

        let outcome = if humidity >= 60.0 {
            FactorOutcome::new(ceiling, format!("Humidity {:.0}% supports germination", humidity))
        } else if humidity >= 40.0 {
            FactorOutcome::new(ceiling * 0.6, format!("Humidity {:.0}% is moderate", humidity))
        } else {
            FactorOutcome::new(ceiling * 0.3, format!("Humidity {:.0}% is low", humidity))
        };
        Ok(outcome)
    }
}
