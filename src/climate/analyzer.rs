//! Historical Climate Analyzer
//!
//! Turns a multi-year daily rainfall series into a `ClimateProfile`:
//!
//! 1. Drop missing readings (no interpolation) and keep the most recent
//!    `years` calendar years (clamped to 1..=10).
//! 2. Aggregate with Polars: per (year, month) sums and per-month daily means.
//! 3. Typical month = mean of that month's sums over the years it was observed.
//! 4. Wet month = mean daily rate above the configured threshold (3 mm/day).
//! 5. Drought/flood years by the k-sigma rule on annual totals.
//! 6. Trend from first-half vs second-half mean of annual totals.

use super::profile::{ClimateProfile, ClimateTrend};
use crate::config::AnalyzerConfig;
use crate::data::DailyRainfallSample;
use crate::error::{AdvisorError, AdvisorResult};
use crate::utils::stats::{coefficient_of_variation_pct, mean, population_std};
use crate::utils::Month;
use chrono::Datelike;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Smallest and largest number of years an analysis may cover
pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 10;

/// Stateless analyzer; configuration is fixed at construction
#[derive(Debug, Clone, Default)]
pub struct HistoricalClimateAnalyzer {
    config: AnalyzerConfig,
}

/// Per-(year, month) sums and per-month daily rates from the aggregation step
struct Aggregates {
    year_month_totals: BTreeMap<(i32, Month), f64>,
    daily_rate: BTreeMap<Month, f64>,
}

impl HistoricalClimateAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a daily series; `years` is clamped to 1..=10
    ///
    /// Zero valid samples yields `ClimateProfile::empty()` (trend = no_data).
    pub fn analyze(&self, samples: &[DailyRainfallSample], years: u32) -> AdvisorResult<ClimateProfile> {
        let years = years.clamp(MIN_YEARS, MAX_YEARS);

        let valid: Vec<(i32, Month, f64)> = samples
            .iter()
            .filter_map(|s| {
                let rainfall = s.valid_rainfall()?;
                let month = Month::from_number(s.date.month())?;
                Some((s.date.year(), month, rainfall))
            })
            .collect();

        if valid.is_empty() {
            tracing::debug!("No valid rainfall samples ({} supplied)", samples.len());
            return Ok(ClimateProfile::empty());
        }

        // Keep the most recent `years` distinct calendar years
        let distinct_years: BTreeSet<i32> = valid.iter().map(|(y, _, _)| *y).collect();
        let kept_years: BTreeSet<i32> = distinct_years
            .iter()
            .rev()
            .take(years as usize)
            .copied()
            .collect();
        let valid: Vec<(i32, Month, f64)> = valid
            .into_iter()
            .filter(|(y, _, _)| kept_years.contains(y))
            .collect();

        let aggregates = aggregate(&valid)
            .map_err(|e| AdvisorError::Internal(format!("rainfall aggregation failed: {}", e)))?;

        let profile = self.build_profile(&kept_years, &aggregates);

        tracing::debug!(
            "Analyzed {} samples over {} years: mean {:.0} mm, variability {:.1}%, trend {}",
            valid.len(),
            profile.years_analyzed,
            profile.mean_annual_mm,
            profile.variability_pct,
            profile.trend.as_str()
        );

        Ok(profile)
    }

    fn build_profile(&self, kept_years: &BTreeSet<i32>, aggregates: &Aggregates) -> ClimateProfile {
        let years: Vec<i32> = kept_years.iter().copied().collect();

        // Annual totals (chronological)
        let annual_totals: Vec<f64> = years
            .iter()
            .map(|year| {
                aggregates
                    .year_month_totals
                    .iter()
                    .filter(|((y, _), _)| y == year)
                    .map(|(_, total)| total)
                    .sum()
            })
            .collect();

        // Typical month: mean over the years in which the month was observed
        let mut monthly_totals = BTreeMap::new();
        for month in Month::ALL {
            let totals: Vec<f64> = aggregates
                .year_month_totals
                .iter()
                .filter(|((_, m), _)| *m == month)
                .map(|(_, total)| *total)
                .collect();
            if let Some(avg) = mean(&totals) {
                monthly_totals.insert(month, avg);
            }
        }

        // Season classification (fixed threshold, not adaptive to the location)
        let threshold = self.config.wet_month_threshold_mm_per_day;
        let mut wet_months = BTreeSet::new();
        let mut dry_months = BTreeSet::new();
        for (&month, &rate) in &aggregates.daily_rate {
            if rate > threshold {
                wet_months.insert(month);
            } else {
                dry_months.insert(month);
            }
        }

        let mean_annual_mm = mean(&annual_totals).unwrap_or(0.0);
        let std_annual_mm = population_std(&annual_totals).unwrap_or(0.0);
        let (drought_years, flood_years) =
            self.extreme_years(&years, &annual_totals, mean_annual_mm, std_annual_mm);

        ClimateProfile {
            years_analyzed: years.len(),
            years,
            monthly_totals,
            monthly_daily_rate: aggregates.daily_rate.clone(),
            annual_totals: annual_totals.clone(),
            wet_months,
            dry_months,
            drought_years,
            flood_years,
            mean_annual_mm,
            std_annual_mm,
            variability_pct: coefficient_of_variation_pct(mean_annual_mm, std_annual_mm),
            trend: self.classify_trend(&annual_totals),
        }
    }

    /// Years below μ - kσ (drought) and above μ + kσ (flood)
    ///
    /// A single year or a flat series has no outliers.
    fn extreme_years(&self, years: &[i32], totals: &[f64], mu: f64, sigma: f64) -> (Vec<i32>, Vec<i32>) {
        if totals.len() < 2 || sigma <= f64::EPSILON {
            return (Vec::new(), Vec::new());
        }
        let k = self.config.extreme_year_sigma;
        let lower = mu - k * sigma;
        let upper = mu + k * sigma;

        let drought = years
            .iter()
            .zip(totals)
            .filter(|(_, total)| **total < lower)
            .map(|(year, _)| *year)
            .collect();
        let flood = years
            .iter()
            .zip(totals)
            .filter(|(_, total)| **total > upper)
            .map(|(year, _)| *year)
            .collect();
        (drought, flood)
    }

    /// First-half vs second-half comparison of chronological annual totals
    fn classify_trend(&self, totals: &[f64]) -> ClimateTrend {
        if totals.is_empty() {
            return ClimateTrend::NoData;
        }
        if totals.len() < self.config.min_trend_years.max(2) {
            return ClimateTrend::InsufficientData;
        }

        let split = totals.len() / 2;
        let first = mean(&totals[..split]).unwrap_or(0.0);
        let second = mean(&totals[split..]).unwrap_or(0.0);

        if second > first * self.config.trend_increase_ratio && second > first {
            ClimateTrend::Increasing
        } else if second < first * self.config.trend_decrease_ratio {
            ClimateTrend::Decreasing
        } else {
            ClimateTrend::Stable
        }
    }
}

/// Group valid samples with Polars
fn aggregate(valid: &[(i32, Month, f64)]) -> PolarsResult<Aggregates> {
    let year_col: Vec<i32> = valid.iter().map(|(y, _, _)| *y).collect();
    let month_col: Vec<i32> = valid.iter().map(|(_, m, _)| m.number() as i32).collect();
    let rain_col: Vec<f64> = valid.iter().map(|(_, _, r)| *r).collect();

    let df = df! {
        "year" => &year_col,
        "month" => &month_col,
        "rainfall_mm" => &rain_col
    }?;

    let per_year_month = df
        .clone()
        .lazy()
        .group_by([col("year"), col("month")])
        .agg([col("rainfall_mm").sum().alias("total_mm")])
        .collect()?;

    let per_month = df
        .lazy()
        .group_by([col("month")])
        .agg([col("rainfall_mm").mean().alias("daily_rate")])
        .collect()?;

    let mut year_month_totals = BTreeMap::new();
    {
        let years = per_year_month.column("year")?.i32()?;
        let months = per_year_month.column("month")?.i32()?;
        let totals = per_year_month.column("total_mm")?.f64()?;
        for idx in 0..per_year_month.height() {
            if let (Some(year), Some(month), Some(total)) = (years.get(idx), months.get(idx), totals.get(idx)) {
                if let Some(month) = Month::from_number(month as u32) {
                    year_month_totals.insert((year, month), total);
                }
            }
        }
    }

    let mut daily_rate = BTreeMap::new();
    {
        let months = per_month.column("month")?.i32()?;
        let rates = per_month.column("daily_rate")?.f64()?;
        for idx in 0..per_month.height() {
            if let (Some(month), Some(rate)) = (months.get(idx), rates.get(idx)) {
                if let Some(month) = Month::from_number(month as u32) {
                    daily_rate.insert(month, rate);
                }
            }
        }
    }

    Ok(Aggregates {
        year_month_totals,
        daily_rate,
    })
}
