//! Planting risk calendar builder
//!
//! Per candidate month, starting from 50:
//!
//! - planting-month rainfall: +20 in [50, 150] mm, +10 in [30, 200] mm,
//!   -15 below 30 mm, -10 above 200 mm
//! - growing season (planting month plus ⌈maturity/30⌉ following months):
//!   +15 above 400 mm, +10 above 300 mm, -20 below 200 mm
//! - -10 if drought years exceed 30 %, -5 if flood years do
//! - +10 for preferred months, +5 for secondary months
//!
//! Clamped to [0, 100]. A month with no observed history gets no
//! planting-month adjustment, and a growing season containing an unobserved
//! month gets no season adjustment.

use super::reference::{reference_score, BASIC_NOTE};
use super::risk::RiskAssessment;
use crate::climate::ClimateProfile;
use crate::config::CalendarConfig;
use crate::data::crops::MAX_MATURITY_DAYS;
use crate::error::{AdvisorError, AdvisorResult};
use crate::utils::stats::clamp_score;
use crate::utils::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ALTERNATIVE_MIN_SCORE: f64 = 60.0;
const AVOID_BELOW_SCORE: f64 = 40.0;
const MAX_ALTERNATIVES: usize = 2;

/// What the calendar was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarBasis {
    LocationHistory,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingCalendar {
    pub crop_id: String,
    pub basis: CalendarBasis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub month_scores: BTreeMap<Month, f64>,
    pub best_month: Month,
    pub alternative_months: Vec<Month>,
    pub avoid_months: Vec<Month>,
    pub risk_assessment: RiskAssessment,
}

#[derive(Debug, Clone)]
pub struct PlantingRiskCalendarBuilder {
    preferred_months: Vec<Month>,
    secondary_months: Vec<Month>,
}

impl Default for PlantingRiskCalendarBuilder {
    fn default() -> Self {
        Self::new(&CalendarConfig::default())
    }
}

impl PlantingRiskCalendarBuilder {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            preferred_months: config.preferred_months.clone(),
            secondary_months: config.secondary_months.clone(),
        }
    }

    /// Build a calendar over `candidate_months` (all twelve when empty)
    ///
    /// Falls back to the reference calendar when `climate` is missing or
    /// empty. Only an impossible maturity length is an error.
    pub fn build(
        &self,
        crop_id: &str,
        climate: Option<&ClimateProfile>,
        maturity_days: u32,
        candidate_months: &[Month],
    ) -> AdvisorResult<PlantingCalendar> {
        if maturity_days == 0 || maturity_days > MAX_MATURITY_DAYS {
            return Err(AdvisorError::invalid(format!(
                "maturity_days {} outside 1..={}",
                maturity_days, MAX_MATURITY_DAYS
            )));
        }
        let candidates = dedup_candidates(candidate_months);

        let Some(climate) = climate.filter(|c| !c.is_empty()) else {
            tracing::debug!(crop = crop_id, "no climate history, using reference calendar");
            let scored: Vec<(Month, f64)> = candidates.iter().map(|&m| (m, reference_score(m))).collect();
            return Ok(assemble(
                crop_id,
                CalendarBasis::Reference,
                Some(BASIC_NOTE.to_string()),
                &scored,
                RiskAssessment::unassessed(),
            ));
        };

        let following = maturity_days.div_ceil(30);
        let scored: Vec<(Month, f64)> = candidates
            .iter()
            .map(|&m| (m, self.month_score(climate, m, following)))
            .collect();

        Ok(assemble(
            crop_id,
            CalendarBasis::LocationHistory,
            None,
            &scored,
            RiskAssessment::from_climate(climate),
        ))
    }

    /// Planting score for one month; `following` is the growing season length in months after it
    pub fn month_score(&self, climate: &ClimateProfile, month: Month, following: u32) -> f64 {
        let mut score = 50.0;

        if let Some(rainfall) = climate.month_total(month) {
            score += if (50.0..=150.0).contains(&rainfall) {
                20.0
            } else if (30.0..=200.0).contains(&rainfall) {
                10.0
            } else if rainfall < 30.0 {
                -15.0
            } else {
                -10.0
            };
        }

        if let Some(season) = climate.observed_window_total(month, following) {
            if season > 400.0 {
                score += 15.0;
            } else if season > 300.0 {
                score += 10.0;
            } else if season < 200.0 {
                score -= 20.0;
            }
        }

        if climate.drought_ratio() > 0.3 {
            score -= 10.0;
        }
        if climate.flood_ratio() > 0.3 {
            score -= 5.0;
        }

        if self.preferred_months.contains(&month) {
            score += 10.0;
        } else if self.secondary_months.contains(&month) {
            score += 5.0;
        }

        clamp_score(score, 0.0, 100.0)
    }
}

fn dedup_candidates(candidate_months: &[Month]) -> Vec<Month> {
    if candidate_months.is_empty() {
        return Month::ALL.to_vec();
    }
    let mut out: Vec<Month> = Vec::with_capacity(candidate_months.len());
    for &month in candidate_months {
        if !out.contains(&month) {
            out.push(month);
        }
    }
    out
}

/// Pick best/alternative/avoid months from scores in candidate order
fn assemble(
    crop_id: &str,
    basis: CalendarBasis,
    note: Option<String>,
    scored: &[(Month, f64)],
    risk_assessment: RiskAssessment,
) -> PlantingCalendar {
    // Stable sort: equal scores keep candidate order, so the earliest wins ties
    let mut ranked: Vec<(Month, f64)> = scored.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Candidate list is never empty
    let best_month = ranked.first().map(|(m, _)| *m).unwrap_or(Month::January);
    let alternative_months = ranked
        .iter()
        .skip(1)
        .filter(|(_, s)| *s > ALTERNATIVE_MIN_SCORE)
        .take(MAX_ALTERNATIVES)
        .map(|(m, _)| *m)
        .collect();
    let avoid_months = scored
        .iter()
        .filter(|(_, s)| *s < AVOID_BELOW_SCORE)
        .map(|(m, _)| *m)
        .collect();

    PlantingCalendar {
        crop_id: crop_id.to_string(),
        basis,
        note,
        month_scores: scored.iter().copied().collect(),
        best_month,
        alternative_months,
        avoid_months,
        risk_assessment,
    }
}
