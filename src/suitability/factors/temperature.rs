//! Temperature factor - current temperature against the crop envelope

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};

/// Distance from optimal (°C) still counted as ideal
const OPTIMAL_BAND_C: f64 = 3.0;

pub struct TemperatureFactor;

impl Factor for TemperatureFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Temperature
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let Some(temp) = ctx.weather.and_then(|w| w.temperature_c).filter(|t| t.is_finite()) else {
            return Err(degraded(self.kind(), ceiling, "current temperature unavailable"));
        };
        let envelope = &ctx.crop.temperature;

        let outcome = if !envelope.contains(temp) {
            FactorOutcome::new(
                ceiling * 0.2,
                format!(
                    "Temperature {:.1}°C is outside the {:.0}-{:.0}°C range",
                    temp, envelope.min, envelope.max
                ),
            )
        } else if (temp - envelope.optimal).abs() <= OPTIMAL_BAND_C {
            FactorOutcome::new(ceiling, format!("Temperature {:.1}°C is near optimal", temp))
        } else {
            FactorOutcome::new(
                ceiling * 0.6,
                format!("Temperature {:.1}°C is acceptable", temp),
            )
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CurrentWeather;
    use crate::suitability::factors::test_support::{bare_context, maize_crop};
    use approx::assert_relative_eq;

    fn score_at(temp: f64) -> f64 {
        let crop = maize_crop();
        let weather = CurrentWeather {
            temperature_c: Some(temp),
            ..Default::default()
        };
        let mut ctx = bare_context(&crop);
        ctx.weather = Some(&weather);
        TemperatureFactor.evaluate(&ctx, 25.0).unwrap().score
    }

    #[test]
    fn test_bands() {
        // maize: 15 / 25 / 35
        assert_relative_eq!(score_at(25.0), 25.0, epsilon = 1e-9);
        assert_relative_eq!(score_at(28.0), 25.0, epsilon = 1e-9);
        assert_relative_eq!(score_at(31.0), 15.0, epsilon = 1e-9);
        assert_relative_eq!(score_at(15.0), 15.0, epsilon = 1e-9);
        assert_relative_eq!(score_at(38.0), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_temperature() {
        let crop = maize_crop();
        let weather = CurrentWeather::default();
        let mut ctx = bare_context(&crop);
        ctx.weather = Some(&weather);
        assert_eq!(TemperatureFactor.evaluate(&ctx, 25.0).unwrap_err().substituted, 12.5);
    }
}
