//! Input data model and collaborator interfaces
//!
//! - `types.rs` - observations supplied by collaborators (samples, weather, soil)
//! - `crops.rs` - static crop requirements and variety capability flags
//! - `sources.rs` - collaborator traits plus in-memory/CSV implementations
//! - `reference_crops.rs` - hardcoded reference catalog

pub mod types;
pub mod crops;
pub mod sources;
pub mod reference_crops;

pub use types::{
    CurrentWeather, DailyRainfallSample, Drainage, Fertility, Location, RainfallSummary, SoilData,
};
pub use crops::{
    CropRequirement, PlantingHint, PlantingWindow, Range3, SoilPreference, Variety, VarietyCapabilities,
};
pub use sources::{
    CropCatalog, CsvRainfallHistory, FixedSoilSource, SoilSource, StaticCropCatalog, StaticWeatherSource,
    WeatherSource,
};
pub use reference_crops::reference_crops;
