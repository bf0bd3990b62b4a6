//! Observation types supplied by collaborators
//!
//! Everything here is a value object built by a collaborator before the core
//! runs. Optional fields model readings a station or API may not report.

use crate::error::{AdvisorError, AdvisorResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Geographic location (decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Validated location; rejects non-finite or out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> AdvisorResult<Self> {
        let location = Self { lat, lon };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> AdvisorResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AdvisorError::invalid(format!("latitude {} outside [-90, 90]", self.lat)));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(AdvisorError::invalid(format!("longitude {} outside [-180, 180]", self.lon)));
        }
        Ok(())
    }
}

/// One day of station/reanalysis data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRainfallSample {
    pub date: NaiveDate,
    /// Daily rainfall (mm); `None` when not reported
    pub rainfall_mm: Option<f64>,
    /// Daily mean temperature (°C)
    pub temperature_c: Option<f64>,
}

impl DailyRainfallSample {
    pub fn new(date: NaiveDate, rainfall_mm: f64, temperature_c: f64) -> Self {
        Self {
            date,
            rainfall_mm: Some(rainfall_mm),
            temperature_c: Some(temperature_c),
        }
    }

    /// Rainfall if present and physically plausible
    pub fn valid_rainfall(&self) -> Option<f64> {
        self.rainfall_mm.filter(|r| r.is_finite() && *r >= 0.0)
    }
}

/// Current conditions at a location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    /// Rainfall over the past 7 days (mm)
    pub rainfall_7day_mm: Option<f64>,
    /// Forecast rainfall over the next 7 days (mm)
    pub forecast_7day_mm: Option<f64>,
    /// When the observation was taken (used for freshness)
    pub observed_at: Option<DateTime<Utc>>,
}

impl CurrentWeather {
    /// Age of the observation relative to `as_of`, in hours
    pub fn age_hours(&self, as_of: DateTime<Utc>) -> Option<f64> {
        self.observed_at
            .map(|observed| (as_of - observed).num_seconds() as f64 / 3600.0)
    }
}

/// Rainfall context used to judge forecast consistency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RainfallSummary {
    /// Historical mean rainfall for the comparison window (mm)
    pub historical_mm: Option<f64>,
    /// Forecast rainfall for the same window (mm)
    pub forecast_mm: Option<f64>,
}

/// Soil fertility class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fertility {
    Low,
    Medium,
    High,
}

impl Fertility {
    pub fn rank(self) -> i32 {
        match self {
            Fertility::Low => 0,
            Fertility::Medium => 1,
            Fertility::High => 2,
        }
    }
}

/// Soil drainage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drainage {
    Poor,
    Moderate,
    Good,
}

impl Drainage {
    pub fn rank(self) -> i32 {
        match self {
            Drainage::Poor => 0,
            Drainage::Moderate => 1,
            Drainage::Good => 2,
        }
    }
}

/// Soil properties from the soil collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilData {
    pub ph: f64,
    pub fertility: Fertility,
    pub drainage: Drainage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_location_validation() {
        assert!(Location::new(-15.4, 28.3).is_ok());
        assert!(matches!(Location::new(91.0, 0.0), Err(AdvisorError::InvalidInput(_))));
        assert!(matches!(Location::new(0.0, -181.0), Err(AdvisorError::InvalidInput(_))));
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_valid_rainfall_filters_bad_readings() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut sample = DailyRainfallSample::new(date, 4.2, 24.0);
        assert_eq!(sample.valid_rainfall(), Some(4.2));

        sample.rainfall_mm = Some(-1.0);
        assert_eq!(sample.valid_rainfall(), None);

        sample.rainfall_mm = Some(f64::NAN);
        assert_eq!(sample.valid_rainfall(), None);

        sample.rainfall_mm = None;
        assert_eq!(sample.valid_rainfall(), None);
    }

    #[test]
    fn test_weather_age_hours() {
        let observed = Utc.with_ymd_and_hms(2024, 11, 1, 6, 0, 0).unwrap();
        let as_of = Utc.with_ymd_and_hms(2024, 11, 1, 9, 30, 0).unwrap();
        let weather = CurrentWeather {
            observed_at: Some(observed),
            ..CurrentWeather::default()
        };
        assert_eq!(weather.age_hours(as_of), Some(3.5));
        assert_eq!(CurrentWeather::default().age_hours(as_of), None);
    }
}
