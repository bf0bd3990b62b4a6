//! Collaborator interfaces and bundled implementations
//!
//! The core never performs I/O. The advisor calls these collaborators up
//! front and hands plain values to the pure components. Network clients live
//! outside this crate; the implementations here are in-memory or file-backed.

use super::crops::CropRequirement;
use super::types::{CurrentWeather, DailyRainfallSample, Location, SoilData};
use crate::error::{AdvisorError, AdvisorResult};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// Weather collaborator
pub trait WeatherSource: Send + Sync {
    /// Daily history covering roughly the last `years` years
    fn daily_history(&self, location: &Location, years: u32) -> AdvisorResult<Vec<DailyRainfallSample>>;

    /// Current conditions
    fn current(&self, location: &Location) -> AdvisorResult<CurrentWeather>;
}

/// Crop catalog collaborator
pub trait CropCatalog: Send + Sync {
    fn all_crops(&self) -> AdvisorResult<Vec<CropRequirement>>;

    fn crop(&self, crop_id: &str) -> Option<CropRequirement>;
}

/// Optional soil collaborator; `None` degrades to neutral soil scoring
pub trait SoilSource: Send + Sync {
    fn soil(&self, location: &Location) -> Option<SoilData>;
}

// ============================================================================
// Crop catalog
// ============================================================================

/// Crop catalog held in memory, indexed by crop id
#[derive(Debug, Clone, Default)]
pub struct StaticCropCatalog {
    crops: Vec<CropRequirement>,
    index: FxHashMap<String, usize>,
}

impl StaticCropCatalog {
    pub fn new(crops: Vec<CropRequirement>) -> Self {
        let index = crops
            .iter()
            .enumerate()
            .map(|(i, c)| (c.crop_id.clone(), i))
            .collect();
        Self { crops, index }
    }

    /// Load a JSON array of crop requirements
    pub fn from_json(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read crop catalog: {:?}", path))?;

        let crops: Vec<CropRequirement> = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse crop catalog JSON")?;

        Ok(Self::new(crops))
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

impl CropCatalog for StaticCropCatalog {
    fn all_crops(&self) -> AdvisorResult<Vec<CropRequirement>> {
        if self.crops.is_empty() {
            return Err(AdvisorError::unavailable("crop catalog is empty"));
        }
        Ok(self.crops.clone())
    }

    fn crop(&self, crop_id: &str) -> Option<CropRequirement> {
        self.index.get(crop_id).map(|&i| self.crops[i].clone())
    }
}

// ============================================================================
// Weather
// ============================================================================

/// Weather data held in memory (single station)
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherSource {
    pub history: Vec<DailyRainfallSample>,
    pub current: Option<CurrentWeather>,
}

impl StaticWeatherSource {
    pub fn new(history: Vec<DailyRainfallSample>, current: Option<CurrentWeather>) -> Self {
        Self { history, current }
    }
}

impl WeatherSource for StaticWeatherSource {
    fn daily_history(&self, _location: &Location, years: u32) -> AdvisorResult<Vec<DailyRainfallSample>> {
        if self.history.is_empty() {
            return Err(AdvisorError::unavailable("no daily history loaded"));
        }
        Ok(most_recent_years(&self.history, years))
    }

    fn current(&self, _location: &Location) -> AdvisorResult<CurrentWeather> {
        self.current
            .clone()
            .ok_or_else(|| AdvisorError::unavailable("no current weather loaded"))
    }
}

/// Daily history read from a station CSV (`date,rainfall_mm,temperature_c`)
///
/// Dates are `YYYY-MM-DD`. Empty cells become missing readings.
#[derive(Debug, Clone)]
pub struct CsvRainfallHistory {
    samples: Vec<DailyRainfallSample>,
    current: Option<CurrentWeather>,
}

impl CsvRainfallHistory {
    pub fn load(path: &str) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))
            .with_context(|| format!("Failed to create CSV reader: {}", path))?
            .finish()
            .with_context(|| format!("Failed to load rainfall CSV: {}", path))?;

        let samples = Self::samples_from_dataframe(&df)?;
        Ok(Self { samples, current: None })
    }

    /// Attach the current observation for this station
    pub fn with_current(mut self, current: CurrentWeather) -> Self {
        self.current = Some(current);
        self
    }

    pub fn samples(&self) -> &[DailyRainfallSample] {
        &self.samples
    }

    fn samples_from_dataframe(df: &DataFrame) -> Result<Vec<DailyRainfallSample>> {
        let dates = df
            .column("date")
            .with_context(|| "Column 'date' not found")?
            .str()
            .with_context(|| "Column 'date' is not string type")?;

        let rainfall = float_column(df, "rainfall_mm")?;
        let temperature = float_column(df, "temperature_c").ok();

        let mut samples = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let Some(raw_date) = dates.get(idx) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}' on row {}", raw_date, idx + 1))?;

            samples.push(DailyRainfallSample {
                date,
                rainfall_mm: rainfall.get(idx),
                temperature_c: temperature.as_ref().and_then(|t| t.get(idx)),
            });
        }

        Ok(samples)
    }
}

impl WeatherSource for CsvRainfallHistory {
    fn daily_history(&self, _location: &Location, years: u32) -> AdvisorResult<Vec<DailyRainfallSample>> {
        if self.samples.is_empty() {
            return Err(AdvisorError::unavailable("rainfall CSV contained no rows"));
        }
        Ok(most_recent_years(&self.samples, years))
    }

    fn current(&self, _location: &Location) -> AdvisorResult<CurrentWeather> {
        self.current
            .clone()
            .ok_or_else(|| AdvisorError::unavailable("station CSV has no current observation"))
    }
}

/// Float column with integer fallback (CSV inference picks i64 for whole numbers)
fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;

    let cast = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    Ok(cast.f64()?.clone())
}

/// Samples from the last `years` calendar years present
fn most_recent_years(samples: &[DailyRainfallSample], years: u32) -> Vec<DailyRainfallSample> {
    let Some(latest) = samples.iter().map(|s| s.date.year()).max() else {
        return Vec::new();
    };
    let earliest = latest - years.clamp(1, 10) as i32 + 1;
    samples
        .iter()
        .filter(|s| s.date.year() >= earliest)
        .cloned()
        .collect()
}

// ============================================================================
// Soil
// ============================================================================

/// Soil source returning the same reading for every location
#[derive(Debug, Clone)]
pub struct FixedSoilSource(pub SoilData);

impl SoilSource for FixedSoilSource {
    fn soil(&self, _location: &Location) -> Option<SoilData> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference_crops::reference_crops;

    #[test]
    fn test_catalog_lookup() {
        let catalog = StaticCropCatalog::new(reference_crops());
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.crop("sorghum").map(|c| c.name), Some("Sorghum".to_string()));
        assert!(catalog.crop("quinoa").is_none());
    }

    #[test]
    fn test_empty_catalog_is_unavailable() {
        let catalog = StaticCropCatalog::default();
        assert!(matches!(catalog.all_crops(), Err(AdvisorError::DataUnavailable(_))));
    }

    #[test]
    fn test_samples_from_dataframe() {
        let df = df! {
            "date" => &["2021-01-01", "2021-01-02", "2021-01-03"],
            "rainfall_mm" => &[Some(12.5), None, Some(0.0)],
            "temperature_c" => &[24.0, 23.5, 25.1]
        }
        .unwrap();

        let samples = CsvRainfallHistory::samples_from_dataframe(&df).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].rainfall_mm, Some(12.5));
        assert_eq!(samples[1].rainfall_mm, None);
        assert_eq!(samples[2].temperature_c, Some(25.1));
    }

    #[test]
    fn test_integer_rainfall_column_is_cast() {
        let df = df! {
            "date" => &["2021-03-01", "2021-03-02"],
            "rainfall_mm" => &[3i64, 0i64]
        }
        .unwrap();

        let samples = CsvRainfallHistory::samples_from_dataframe(&df).unwrap();
        assert_eq!(samples[0].rainfall_mm, Some(3.0));
        assert_eq!(samples[1].temperature_c, None);
    }

    #[test]
    fn test_most_recent_years_window() {
        let samples: Vec<DailyRainfallSample> = (2015..=2022)
            .map(|y| DailyRainfallSample::new(NaiveDate::from_ymd_opt(y, 6, 1).unwrap(), 1.0, 20.0))
            .collect();
        let recent = most_recent_years(&samples, 3);
        let years: Vec<i32> = recent.iter().map(|s| s.date.year()).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
    }
}
