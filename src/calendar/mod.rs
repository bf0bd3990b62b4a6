//! Planting calendar with drought/flood risk
//!
//! - `builder.rs` - per-month planting scores and best/alternative/avoid windows
//! - `risk.rs` - risk tiers and mitigation catalogs
//! - `reference.rs` - fallback calendar for locations without history

pub mod builder;
pub mod risk;
pub mod reference;

pub use builder::{CalendarBasis, PlantingCalendar, PlantingRiskCalendarBuilder};
pub use risk::{RiskAssessment, RiskLevel, RiskTier};
