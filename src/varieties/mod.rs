//! Variety ranking against local rainfall history
//!
//! - `components.rs` - the five 0-100 compatibility components and their weights
//! - `matcher.rs` - WeatherVarietyMatcher, tiers and ranking

pub mod components;
pub mod matcher;

pub use components::{VarietyComponentScores, WEIGHTS};
pub use matcher::{MatchStatus, VarietyRanking, VarietyTier, VarietyWeatherScore, WeatherVarietyMatcher};
