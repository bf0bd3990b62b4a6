//! ClimateProfile - output of the historical analyzer
//!
//! A multi-year rainfall summary for one location. Every other component reads
//! it; none of them mutate it.

use crate::utils::Month;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Multi-year rainfall direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateTrend {
    Increasing,
    Decreasing,
    Stable,
    /// Fewer years than needed for a first-half/second-half comparison
    InsufficientData,
    /// No valid samples at all
    NoData,
}

impl ClimateTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateTrend::Increasing => "increasing",
            ClimateTrend::Decreasing => "decreasing",
            ClimateTrend::Stable => "stable",
            ClimateTrend::InsufficientData => "insufficient_data",
            ClimateTrend::NoData => "no_data",
        }
    }

    /// Whether the trend was actually computed
    pub fn is_known(&self) -> bool {
        matches!(self, ClimateTrend::Increasing | ClimateTrend::Decreasing | ClimateTrend::Stable)
    }
}

/// Multi-year rainfall summary for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProfile {
    /// Distinct calendar years with at least one valid sample
    pub years_analyzed: usize,
    /// Calendar year of each entry in `annual_totals` (chronological)
    pub years: Vec<i32>,
    /// Typical monthly total (mm): per-year monthly sum averaged over the years observed
    pub monthly_totals: BTreeMap<Month, f64>,
    /// Mean daily rainfall (mm/day) per month, used for wet/dry classification
    pub monthly_daily_rate: BTreeMap<Month, f64>,
    /// Per-year totals (mm), chronological
    pub annual_totals: Vec<f64>,
    pub wet_months: BTreeSet<Month>,
    pub dry_months: BTreeSet<Month>,
    pub drought_years: Vec<i32>,
    pub flood_years: Vec<i32>,
    pub mean_annual_mm: f64,
    pub std_annual_mm: f64,
    /// Coefficient of variation of annual totals (%)
    pub variability_pct: f64,
    pub trend: ClimateTrend,
}

impl ClimateProfile {
    /// Profile for a location with no usable samples
    pub fn empty() -> Self {
        Self {
            years_analyzed: 0,
            years: Vec::new(),
            monthly_totals: BTreeMap::new(),
            monthly_daily_rate: BTreeMap::new(),
            annual_totals: Vec::new(),
            wet_months: BTreeSet::new(),
            dry_months: BTreeSet::new(),
            drought_years: Vec::new(),
            flood_years: Vec::new(),
            mean_annual_mm: 0.0,
            std_annual_mm: 0.0,
            variability_pct: 0.0,
            trend: ClimateTrend::NoData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years_analyzed == 0 || self.monthly_totals.is_empty()
    }

    /// Typical rainfall for a month (mm), `None` if the month was never observed
    pub fn month_total(&self, month: Month) -> Option<f64> {
        self.monthly_totals.get(&month).copied()
    }

    /// Fraction of analysed years that were drought years
    pub fn drought_ratio(&self) -> f64 {
        ratio(self.drought_years.len(), self.years_analyzed)
    }

    /// Fraction of analysed years that were flood years
    pub fn flood_ratio(&self) -> f64 {
        ratio(self.flood_years.len(), self.years_analyzed)
    }

    /// Sum of the typical monthly totals (mm)
    pub fn typical_annual_mm(&self) -> f64 {
        self.monthly_totals.values().sum()
    }

    /// Share of typical annual rainfall falling in wet months (0-1)
    pub fn wet_season_share(&self) -> f64 {
        let total = self.typical_annual_mm();
        if total <= 0.0 {
            return 0.0;
        }
        let wet: f64 = self
            .wet_months
            .iter()
            .filter_map(|m| self.monthly_totals.get(m))
            .sum();
        wet / total
    }

    /// Estimated rainy-season rainfall (mm)
    ///
    /// Sum of wet-month typical totals; the mean annual total when no month
    /// qualifies as wet (all the rain the location gets).
    pub fn seasonal_rainfall_estimate(&self) -> f64 {
        if self.wet_months.is_empty() {
            return self.mean_annual_mm;
        }
        self.wet_months
            .iter()
            .filter_map(|m| self.monthly_totals.get(m))
            .sum()
    }

    /// First wet month of the rainy season on the circular calendar
    ///
    /// A wet month whose predecessor is dry. `None` without wet months; if
    /// every month is wet the season has no onset and January is returned.
    pub fn wet_season_onset(&self) -> Option<Month> {
        if self.wet_months.is_empty() {
            return None;
        }
        if self.wet_months.len() == 12 {
            return Some(Month::January);
        }

        // Start of the longest wet run
        let mut best: Option<(Month, usize)> = None;
        for &month in &self.wet_months {
            if self.wet_months.contains(&month.previous()) {
                continue;
            }
            let mut length = 1;
            let mut cursor = month.next();
            while self.wet_months.contains(&cursor) && length < 12 {
                length += 1;
                cursor = cursor.next();
            }
            if best.map_or(true, |(_, best_len)| length > best_len) {
                best = Some((month, length));
            }
        }
        best.map(|(month, _)| month)
    }

    /// Rainfall summed over `start` and the `following` months after it
    pub fn window_total(&self, start: Month, following: u32) -> f64 {
        start
            .window(following)
            .iter()
            .filter_map(|m| self.monthly_totals.get(m))
            .sum()
    }

    /// Like `window_total`, but `None` unless every month in the window was observed
    pub fn observed_window_total(&self, start: Month, following: u32) -> Option<f64> {
        start
            .window(following)
            .iter()
            .map(|m| self.monthly_totals.get(m))
            .sum()
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn summer_rain_profile() -> ClimateProfile {
        let mut profile = ClimateProfile::empty();
        profile.years_analyzed = 5;
        profile.years = vec![2019, 2020, 2021, 2022, 2023];
        profile.annual_totals = vec![800.0; 5];
        profile.mean_annual_mm = 800.0;
        for (month, total) in [
            (Month::November, 100.0),
            (Month::December, 180.0),
            (Month::January, 220.0),
            (Month::February, 170.0),
            (Month::March, 100.0),
            (Month::April, 30.0),
        ] {
            profile.monthly_totals.insert(month, total);
        }
        profile.wet_months = [Month::November, Month::December, Month::January, Month::February, Month::March]
            .into_iter()
            .collect();
        profile.dry_months = [Month::April].into_iter().collect();
        profile.drought_years = vec![2020];
        profile
    }

    #[test]
    fn test_ratios_and_shares() {
        let profile = summer_rain_profile();
        assert_relative_eq!(profile.drought_ratio(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(profile.flood_ratio(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(profile.seasonal_rainfall_estimate(), 770.0, epsilon = 1e-9);
        assert_relative_eq!(profile.wet_season_share(), 770.0 / 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_onset_wraps_year() {
        let profile = summer_rain_profile();
        assert_eq!(profile.wet_season_onset(), Some(Month::November));
        assert_eq!(ClimateProfile::empty().wet_season_onset(), None);
    }

    #[test]
    fn test_window_total_wraps() {
        let profile = summer_rain_profile();
        // Dec + Jan + Feb
        assert_relative_eq!(profile.window_total(Month::December, 2), 570.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_profile() {
        let profile = ClimateProfile::empty();
        assert!(profile.is_empty());
        assert_eq!(profile.trend, ClimateTrend::NoData);
        assert_eq!(profile.drought_ratio(), 0.0);
        assert_eq!(profile.seasonal_rainfall_estimate(), 0.0);
    }
}
