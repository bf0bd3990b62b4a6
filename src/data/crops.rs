//! Crop catalog entries
//!
//! Static reference data: water/temperature envelopes, planting windows, soil
//! preferences and the varieties grown locally. Variety capabilities are
//! structured flags set at ingestion, so scoring never parses descriptions.

use super::types::{Drainage, Fertility};
use crate::error::{AdvisorError, AdvisorResult};
use crate::utils::{Month, MonthWindow};
use serde::{Deserialize, Serialize};

/// Three-point envelope (min / optimal / max)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range3 {
    pub min: f64,
    pub optimal: f64,
    pub max: f64,
}

impl Range3 {
    pub const fn new(min: f64, optimal: f64, max: f64) -> Self {
        Self { min, optimal, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, label: &str, crop_id: &str, allow_negative: bool) -> AdvisorResult<()> {
        let values = [self.min, self.optimal, self.max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AdvisorError::invalid(format!("{}: {} range has non-finite values", crop_id, label)));
        }
        if !allow_negative && self.min < 0.0 {
            return Err(AdvisorError::invalid(format!("{}: {} minimum is negative", crop_id, label)));
        }
        if !(self.min <= self.optimal && self.optimal <= self.max) {
            return Err(AdvisorError::invalid(format!(
                "{}: {} range must satisfy min <= optimal <= max (got {}/{}/{})",
                crop_id, label, self.min, self.optimal, self.max
            )));
        }
        Ok(())
    }
}

/// Planting window (inclusive, may wrap across the new year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingWindow {
    pub start_month: Month,
    pub end_month: Month,
    /// Rainfall needed at planting (mm)
    #[serde(default)]
    pub rainfall_needed: Option<f64>,
    #[serde(default)]
    pub irrigation_required: bool,
}

impl PlantingWindow {
    pub fn months(&self) -> MonthWindow {
        Month::span(self.start_month, self.end_month)
    }

    pub fn contains(&self, month: Month) -> bool {
        self.months().contains(&month)
    }

    /// Circular distance from `month` to the nearest month in the window
    pub fn distance_to(&self, month: Month) -> u32 {
        self.months()
            .iter()
            .map(|m| m.circular_distance(month))
            .min()
            .unwrap_or(12)
    }
}

/// Soil preferences of a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilPreference {
    /// Acceptable pH range (inclusive)
    pub ph_range: (f64, f64),
    /// Minimum fertility the crop does well on
    pub fertility: Fertility,
    /// Preferred drainage
    pub drainage: Drainage,
}

/// Structured capability flags of a variety
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarietyCapabilities {
    pub drought_tolerant: bool,
    pub high_water_requirement: bool,
    pub flood_tolerant: bool,
    pub resilient: bool,
    pub early_maturing: bool,
}

/// When in the rainy season a variety is best planted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingHint {
    EarlySeason,
    MidSeason,
    LateSeason,
    #[default]
    Unspecified,
}

impl PlantingHint {
    /// Months this hint covers, relative to the first wet month of the season
    pub fn months_from_onset(self, onset: Month) -> MonthWindow {
        match self {
            PlantingHint::EarlySeason => Month::span(onset.previous(), onset),
            PlantingHint::MidSeason => Month::span(onset, onset.next()),
            PlantingHint::LateSeason => Month::span(onset.next(), onset.offset(2)),
            PlantingHint::Unspecified => MonthWindow::new(),
        }
    }
}

/// A locally grown variety of a crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    pub variety_id: String,
    pub name: String,
    #[serde(default)]
    pub capabilities: VarietyCapabilities,
    #[serde(default)]
    pub planting_hint: PlantingHint,
    #[serde(default)]
    pub maturity_days: Option<u32>,
}

/// Static requirements for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRequirement {
    pub crop_id: String,
    pub name: String,
    /// Seasonal water requirement (mm)
    pub water: Range3,
    /// Temperature envelope (°C)
    pub temperature: Range3,
    pub planting_windows: Vec<PlantingWindow>,
    pub soil: SoilPreference,
    /// Days from planting to harvest
    pub maturity_days: u32,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

/// Longest growing period accepted for a single crop cycle
pub const MAX_MATURITY_DAYS: u32 = 730;

impl CropRequirement {
    /// Structural validation; malformed catalog entries are rejected, never scored
    pub fn validate(&self) -> AdvisorResult<()> {
        if self.crop_id.trim().is_empty() {
            return Err(AdvisorError::invalid("crop_id is empty"));
        }
        self.water.validate("water", &self.crop_id, false)?;
        self.temperature.validate("temperature", &self.crop_id, true)?;

        let (ph_lo, ph_hi) = self.soil.ph_range;
        if !(ph_lo.is_finite() && ph_hi.is_finite()) || ph_lo > ph_hi || ph_lo < 0.0 || ph_hi > 14.0 {
            return Err(AdvisorError::invalid(format!(
                "{}: soil pH range ({}, {}) is not a valid range within 0-14",
                self.crop_id, ph_lo, ph_hi
            )));
        }
        if self.maturity_days == 0 || self.maturity_days > MAX_MATURITY_DAYS {
            return Err(AdvisorError::invalid(format!(
                "{}: maturity_days {} outside 1..={}",
                self.crop_id, self.maturity_days, MAX_MATURITY_DAYS
            )));
        }
        for window in &self.planting_windows {
            if let Some(needed) = window.rainfall_needed {
                if !needed.is_finite() || needed < 0.0 {
                    return Err(AdvisorError::invalid(format!(
                        "{}: planting window rainfall_needed must be non-negative",
                        self.crop_id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn has_drought_tolerant_variety(&self) -> bool {
        self.varieties.iter().any(|v| v.capabilities.drought_tolerant)
    }

    pub fn has_high_water_variety(&self) -> bool {
        self.varieties.iter().any(|v| v.capabilities.high_water_requirement)
    }

    /// Crops whose optimal seasonal water need is at least 800 mm, or that
    /// carry a high-water variety
    pub fn is_water_loving(&self) -> bool {
        self.water.optimal >= 800.0 || self.has_high_water_variety()
    }

    pub fn in_planting_window(&self, month: Month) -> bool {
        self.planting_windows.iter().any(|w| w.contains(month))
    }

    /// Circular distance (months) to the nearest planting window, `None` without windows
    pub fn months_to_planting_window(&self, month: Month) -> Option<u32> {
        self.planting_windows.iter().map(|w| w.distance_to(month)).min()
    }
}
