//! Historical climate analysis
//!
//! - `profile.rs` - ClimateProfile and trend classification
//! - `analyzer.rs` - daily series → ClimateProfile (Polars aggregation)
//! - `cache.rs` - TTL cache for profiles keyed by (lat, lon, years)

pub mod profile;
pub mod analyzer;
pub mod cache;

pub use profile::{ClimateProfile, ClimateTrend};
pub use analyzer::HistoricalClimateAnalyzer;
pub use cache::{ClimateCache, MokaClimateCache, ProfileKey};
