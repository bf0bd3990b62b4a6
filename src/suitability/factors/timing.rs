//! Planting timing factor

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};

/// Months either side of a window that still earn half marks
const NEAR_WINDOW_MONTHS: u32 = 2;

pub struct TimingFactor;

impl Factor for TimingFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Timing
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let month = ctx.current_month;
        let Some(distance) = ctx.crop.months_to_planting_window(month) else {
            return Err(degraded(self.kind(), ceiling, "crop has no planting windows"));
        };

        let outcome = match distance {
            0 => FactorOutcome::new(ceiling, format!("{} is within the planting window", month)),
            d if d <= NEAR_WINDOW_MONTHS => FactorOutcome::new(
                ceiling * 0.5,
                format!("{} is {} month(s) from the planting window", month, d),
            ),
            _ => FactorOutcome::new(0.0, format!("{} is outside the planting season", month)),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suitability::factors::test_support::{bare_context, maize_crop};
    use crate::utils::Month;

    #[test]
    fn test_window_distance() {
        // maize window: November-December
        let crop = maize_crop();
        let mut ctx = bare_context(&crop);

        for (month, expected) in [
            (Month::November, 20.0),
            (Month::December, 20.0),
            (Month::February, 10.0),
            (Month::September, 10.0),
            (Month::June, 0.0),
        ] {
            ctx.current_month = month;
            assert_eq!(TimingFactor.evaluate(&ctx, 20.0).unwrap().score, expected, "{}", month);
        }
    }

    #[test]
    fn test_no_windows_degrades() {
        let mut crop = maize_crop();
        crop.planting_windows.clear();
        let ctx = bare_context(&crop);
        assert!(TimingFactor.evaluate(&ctx, 20.0).is_err());
    }
}
