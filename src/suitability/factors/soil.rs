//! Soil suitability factor
//!
//! Shares of the ceiling: pH 0.4, fertility 0.3, drainage 0.3. Near misses
//! (pH within 0.5 of the range, one fertility/drainage class off) earn half
//! the share.

use super::{degraded, Factor, FactorContext, FactorKind, FactorOutcome, FactorResult};
use crate::data::{SoilData, SoilPreference};

const PH_SHARE: f64 = 0.4;
const FERTILITY_SHARE: f64 = 0.3;
const DRAINAGE_SHARE: f64 = 0.3;
const PH_TOLERANCE: f64 = 0.5;

pub struct SoilFactor;

impl Factor for SoilFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::SoilSuitability
    }

    fn evaluate(&self, ctx: &FactorContext<'_>, ceiling: f64) -> FactorResult {
        let Some(soil) = ctx.soil.filter(|s| s.ph.is_finite()) else {
            return Err(degraded(self.kind(), ceiling, "soil data unavailable"));
        };
        let fraction = soil_fraction(soil, &ctx.crop.soil);

        let reason = if fraction >= 0.9 {
            format!("Soil (pH {:.1}) suits this crop", soil.ph)
        } else if fraction >= 0.5 {
            format!("Soil (pH {:.1}) is workable with amendments", soil.ph)
        } else {
            format!("Soil (pH {:.1}) is a poor match", soil.ph)
        };
        Ok(FactorOutcome::new(ceiling * fraction, reason))
    }
}

/// Fraction of the soil ceiling earned (0-1)
fn soil_fraction(soil: &SoilData, preference: &SoilPreference) -> f64 {
    let (ph_lo, ph_hi) = preference.ph_range;
    let ph = if soil.ph >= ph_lo && soil.ph <= ph_hi {
        PH_SHARE
    } else if soil.ph >= ph_lo - PH_TOLERANCE && soil.ph <= ph_hi + PH_TOLERANCE {
        PH_SHARE * 0.5
    } else {
        0.0
    };

    let fertility_gap = preference.fertility.rank() - soil.fertility.rank();
    let fertility = match fertility_gap {
        g if g <= 0 => FERTILITY_SHARE,
        1 => FERTILITY_SHARE * 0.5,
        _ => 0.0,
    };

    let drainage = match (preference.drainage.rank() - soil.drainage.rank()).abs() {
        0 => DRAINAGE_SHARE,
        1 => DRAINAGE_SHARE * 0.5,
        _ => 0.0,
    };

    ph + fertility + drainage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Drainage, Fertility};
    use crate::suitability::factors::test_support::{bare_context, maize_crop};
    use approx::assert_relative_eq;

    #[test]
    fn test_matching_soil_full_marks() {
        let crop = maize_crop();
        let soil = SoilData {
            ph: 6.2,
            fertility: Fertility::High,
            drainage: crop.soil.drainage,
        };
        let mut ctx = bare_context(&crop);
        ctx.soil = Some(&soil);
        assert_relative_eq!(SoilFactor.evaluate(&ctx, 10.0).unwrap().score, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_matches() {
        let preference = SoilPreference {
            ph_range: (5.5, 7.0),
            fertility: Fertility::Medium,
            drainage: Drainage::Good,
        };
        let soil = SoilData {
            ph: 5.2,
            fertility: Fertility::Low,
            drainage: Drainage::Poor,
        };
        // 0.2 + 0.15 + 0
        assert_relative_eq!(soil_fraction(&soil, &preference), 0.35, epsilon = 1e-9);
    }

    #[test]
    fn test_absent_soil_is_neutral() {
        let crop = maize_crop();
        let ctx = bare_context(&crop);
        assert_eq!(SoilFactor.evaluate(&ctx, 10.0).unwrap_err().substituted, 5.0);
    }
}
