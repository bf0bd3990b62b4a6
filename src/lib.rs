//! Crop Advisor Rust Implementation
//!
//! Location-aware crop recommendation core: historical rainfall analysis,
//! multi-factor crop suitability, variety matching, recommendation confidence
//! and planting risk calendars.
//!
//! - `utils/`: Month arithmetic and descriptive statistics
//! - `data/`: Input types, crop catalog and collaborator traits
//! - `climate/`: Historical climate analysis (Polars) and profile cache
//! - `suitability/`: Factor strategies, scoring profiles and the scorer
//! - `varieties/`: Weather-variety matching
//! - `confidence`: Recommendation confidence
//! - `calendar/`: Planting calendar and risk assessment
//! - `advisor`: Coordinator wiring collaborators to the components

pub mod utils;
pub mod error;
pub mod config;
pub mod data;
pub mod climate;
pub mod suitability;
pub mod varieties;
pub mod confidence;
pub mod calendar;
pub mod advisor;

// Re-export commonly used types
pub use error::{AdvisorError, AdvisorResult, ComputationDegraded};
pub use config::EngineConfig;
pub use utils::Month;
pub use data::{CropRequirement, CurrentWeather, DailyRainfallSample, Location, SoilData};
pub use climate::{ClimateProfile, ClimateTrend, HistoricalClimateAnalyzer, MokaClimateCache};
pub use suitability::{ProfileKind, ScoringProfile, SiteConditions, SuitabilityScore, SuitabilityScorer, SuitabilityTier};
pub use varieties::{VarietyRanking, VarietyWeatherScore, WeatherVarietyMatcher};
pub use confidence::{ConfidenceAssessment, ConfidenceInputs, ConfidenceScorer, ConfidenceTier};
pub use calendar::{PlantingCalendar, PlantingRiskCalendarBuilder, RiskAssessment};
pub use advisor::{AdvisoryReport, CropAdvice, CropAdvisor, ProfileSelection, Recommendation, RecommendationRequest};
