//! Drought tolerance factor - best capability among the crop's varieties

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};

pub struct DroughtToleranceFactor;

impl Factor for DroughtToleranceFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::DroughtTolerance
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let varieties = &ctx.crop.varieties;
        if varieties.is_empty() {
            return Err(degraded(self.kind(), ceiling, "no variety data for this crop"));
        }

        let outcome = if ctx.crop.has_drought_tolerant_variety() {
            FactorOutcome::new(ceiling, "Drought-tolerant varieties available")
        } else if varieties
            .iter()
            .any(|v| v.capabilities.resilient || v.capabilities.early_maturing)
        {
            FactorOutcome::new(ceiling * 0.6, "Resilient or early-maturing varieties available")
        } else {
            FactorOutcome::new(ceiling * 0.3, "No drought-tolerant varieties")
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suitability::factors::test_support::{bare_context, maize_crop};
    use approx::assert_relative_eq;

    #[test]
    fn test_capability_levels() {
        let mut crop = maize_crop();
        {
            let ctx = bare_context(&crop);
            assert_eq!(DroughtToleranceFactor.evaluate(&ctx, 5.0).unwrap().score, 5.0);
        }

        for variety in &mut crop.varieties {
            variety.capabilities.drought_tolerant = false;
        }
        {
            let ctx = bare_context(&crop);
            // zmh606 is still resilient
            assert_relative_eq!(DroughtToleranceFactor.evaluate(&ctx, 5.0).unwrap().score, 3.0, epsilon = 1e-9);
        }

        for variety in &mut crop.varieties {
            variety.capabilities = Default::default();
        }
        let ctx = bare_context(&crop);
        assert_relative_eq!(DroughtToleranceFactor.evaluate(&ctx, 5.0).unwrap().score, 1.5, epsilon = 1e-9);
    }
}
