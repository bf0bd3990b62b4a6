//! Multi-factor crop suitability
//!
//! - `factors/` - one strategy per factor (rainfall, temperature, timing, ...)
//! - `profile.rs` - base/rainy/dry/enhanced ceiling tables
//! - `tier.rs` - tier labels and cut-points
//! - `scorer.rs` - runs a profile against a crop

pub mod factors;
pub mod profile;
pub mod tier;
pub mod scorer;

pub use factors::{Factor, FactorContext, FactorKind, FactorOutcome};
pub use profile::{ProfileKind, ScoringProfile};
pub use tier::{SuitabilityTier, TierThresholds};
pub use scorer::{ComponentScore, ScoreComponents, SiteConditions, SuitabilityScore, SuitabilityScorer};
