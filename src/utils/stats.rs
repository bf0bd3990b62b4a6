//! Descriptive statistics over rainfall series
//!
//! Population standard deviation is used throughout: the series is the whole
//! observed record for a location, not a sample of a larger population.

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Coefficient of variation as a percentage (σ/μ × 100), 0 when μ = 0
pub fn coefficient_of_variation_pct(mean: f64, std: f64) -> f64 {
    if mean.abs() < f64::EPSILON {
        0.0
    } else {
        (std / mean * 100.0).abs()
    }
}

/// Clamp a score into `[lo, hi]`, mapping NaN to `lo`
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

/// Linear interpolation between `from` and `to` at fraction `t` (clamped to [0, 1])
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
