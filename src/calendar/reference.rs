//! Reference planting calendar for locations without rainfall history
//!
//! Generic single-season (November-March rains) pattern. Used only as a
//! fallback; results built from it are flagged as basic.

use crate::utils::Month;

pub const BASIC_NOTE: &str = "basic — no location-specific analysis";

/// Planting score per month, January first
const REFERENCE_SCORES: [f64; 12] = [
    60.0, // Jan
    45.0, // Feb
    35.0, // Mar
    25.0, // Apr
    20.0, // May
    20.0, // Jun
    20.0, // Jul
    20.0, // Aug
    30.0, // Sep
    65.0, // Oct
    85.0, // Nov
    80.0, // Dec
];

pub fn reference_score(month: Month) -> f64 {
    REFERENCE_SCORES[month.index()]
}
