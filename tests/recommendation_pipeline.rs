//! Recommendation Pipeline Integration Tests
//!
//! Runs the full advisor over in-memory collaborators: climate analysis,
//! parallel ranking, variety matching, calendars and confidence.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use crop_advisor_rust::data::{
    reference_crops, Drainage, Fertility, FixedSoilSource, StaticCropCatalog, StaticWeatherSource,
};
use crop_advisor_rust::suitability::FactorKind;
use crop_advisor_rust::varieties::MatchStatus;
use crop_advisor_rust::{
    AdvisorError, ClimateTrend, CropAdvisor, CurrentWeather, DailyRainfallSample, EngineConfig,
    HistoricalClimateAnalyzer, Location, MokaClimateCache, Month, ProfileKind, RecommendationRequest,
    SoilData,
};
use std::sync::Arc;

const LUSAKA: Location = Location {
    lat: -15.4167,
    lon: 28.2833,
};

/// Five years of daily data: rains November-March, one dry season in 2022
fn summer_rain_history() -> Vec<DailyRainfallSample> {
    let mut samples = Vec::new();
    for year in 2019..=2023 {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        let mut date = start;
        while date <= end {
            let base = match date.format("%m").to_string().as_str() {
                "12" | "01" | "02" => 7.0,
                "11" | "03" => 4.0,
                "04" | "10" => 0.8,
                _ => 0.0,
            };
            let rainfall = if year == 2022 { base * 0.5 } else { base };
            samples.push(DailyRainfallSample::new(date, rainfall, 24.0));
            date += Duration::days(1);
        }
    }
    samples
}

fn observed_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 15, 6, 0, 0).unwrap()
}

fn current_weather() -> CurrentWeather {
    CurrentWeather {
        temperature_c: Some(25.0),
        humidity_pct: Some(68.0),
        rainfall_7day_mm: Some(30.0),
        forecast_7day_mm: Some(40.0),
        observed_at: Some(observed_at()),
    }
}

fn advisor(history: Vec<DailyRainfallSample>, current: Option<CurrentWeather>) -> CropAdvisor {
    let config = EngineConfig::default();
    CropAdvisor::new(
        config.clone(),
        Arc::new(StaticWeatherSource::new(history, current)),
        Arc::new(StaticCropCatalog::new(reference_crops())),
    )
    .unwrap()
    .with_soil(Arc::new(FixedSoilSource(SoilData {
        ph: 6.0,
        fertility: Fertility::Medium,
        drainage: Drainage::Good,
    })))
    .with_cache(Arc::new(MokaClimateCache::new(&config.cache)))
}

fn november_request() -> RecommendationRequest {
    RecommendationRequest::new(LUSAKA, Month::November).as_of(observed_at() + Duration::hours(1))
}

#[test]
fn test_climate_profile_from_daily_history() {
    let analyzer = HistoricalClimateAnalyzer::default();
    let profile = analyzer.analyze(&summer_rain_history(), 5).unwrap();

    assert_eq!(profile.years_analyzed, 5);
    assert_eq!(profile.annual_totals.len(), profile.years_analyzed);
    assert!(profile.wet_months.contains(&Month::January));
    assert!(profile.dry_months.contains(&Month::July));
    assert_eq!(profile.drought_years, vec![2022]);
    assert!(profile.flood_years.is_empty());
    assert!(profile.variability_pct >= 0.0);
}

#[test]
fn test_single_year_has_no_trend_or_extremes() {
    let one_year: Vec<DailyRainfallSample> = summer_rain_history()
        .into_iter()
        .filter(|s| s.date.format("%Y").to_string() == "2023")
        .collect();
    let profile = HistoricalClimateAnalyzer::default().analyze(&one_year, 1).unwrap();

    assert_eq!(profile.trend, ClimateTrend::InsufficientData);
    assert!(profile.drought_years.is_empty());
    assert!(profile.flood_years.is_empty());
}

#[test]
fn test_rank_crops_sorted_and_bounded() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let ranked = advisor.rank_crops(&november_request()).unwrap();

    assert_eq!(ranked.len(), reference_crops().len());
    for pair in ranked.windows(2) {
        assert!(
            pair[0].total_score > pair[1].total_score
                || (pair[0].total_score == pair[1].total_score && pair[0].crop_id < pair[1].crop_id)
        );
    }
    for rec in &ranked {
        assert!(rec.error.is_none());
        let sum: f64 = rec.score_components.iter().map(|c| c.score).sum();
        assert_eq!(rec.total_score, sum);
        assert!(rec.total_score <= rec.max_score);
        assert!((0.0..=1.0).contains(&rec.confidence.score));
        assert!(!rec.confidence.suggestions.is_empty());
        assert_eq!(rec.reasons.len(), rec.score_components.len());
    }
}

#[test]
fn test_november_uses_rainy_profile() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let ranked = advisor.rank_crops(&november_request()).unwrap();
    assert!(ranked.iter().all(|r| r.profile == ProfileKind::Rainy));

    let maize = ranked.iter().find(|r| r.crop_id == "maize").unwrap();
    assert_eq!(maize.score_components.get(FactorKind::Timing), Some(25.0));
}

#[test]
fn test_enhanced_profile_adds_factors() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let request = november_request().with_profile(ProfileKind::Enhanced);
    let ranked = advisor.rank_crops(&request).unwrap();

    for rec in &ranked {
        assert_eq!(rec.score_components.len(), 9);
        assert_relative_eq!(rec.max_score, 125.0);
        assert!(rec.score_components.get(FactorKind::SoilSuitability).is_some());
    }
}

#[test]
fn test_identical_requests_identical_results() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let first = advisor.advise(&november_request()).unwrap();
    let second = advisor.advise(&november_request()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_coordinates_rejected() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let request = RecommendationRequest::new(Location { lat: 123.0, lon: 28.0 }, Month::November);

    assert!(matches!(advisor.rank_crops(&request), Err(AdvisorError::InvalidInput(_))));
    assert!(matches!(
        advisor.build_calendar("maize", &Location { lat: 0.0, lon: f64::NAN }, &[]),
        Err(AdvisorError::InvalidInput(_))
    ));
}

#[test]
fn test_missing_weather_degrades_gracefully() {
    let advisor = advisor(Vec::new(), None);
    let report = advisor.advise(&november_request()).unwrap();

    assert_eq!(report.profile, ProfileKind::Base);
    assert!(report.climate.is_none());
    assert_eq!(report.rankings.len(), reference_crops().len());
    for rec in &report.rankings {
        assert!(rec.error.is_none());
        assert!(!rec.degraded.is_empty());
        assert!(rec.degraded.iter().any(|d| d.source_name == "current_weather"));
        assert_eq!(rec.score_components.get(FactorKind::Rainfall), Some(20.0));
        assert!(rec.confidence.breakdown.unwrap().completeness < 1.0);
        assert!(rec
            .confidence
            .suggestions
            .iter()
            .any(|s| s == "provide more complete crop and location data"));
    }
    for advice in &report.top_crops {
        assert_eq!(advice.varieties.status, MatchStatus::Unmatched);
        let calendar = advice.calendar.as_ref().unwrap();
        assert!(calendar.note.is_some());
    }
}

#[test]
fn test_advise_top_crops_have_varieties_and_calendars() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let report = advisor.advise(&november_request()).unwrap();

    assert_eq!(report.top_crops.len(), EngineConfig::default().top_n);
    for (advice, rec) in report.top_crops.iter().zip(&report.rankings) {
        assert_eq!(advice.recommendation.crop_id, rec.crop_id);
        assert_eq!(advice.varieties.status, MatchStatus::Matched);
        let calendar = advice.calendar.as_ref().unwrap();
        assert_eq!(calendar.month_scores.len(), 12);
        assert!(calendar.note.is_none());
        assert!(!calendar.risk_assessment.mitigations.is_empty());
    }
}

#[test]
fn test_rank_varieties_and_calendar_for_one_crop() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));

    let varieties = advisor.rank_varieties("sorghum", &LUSAKA).unwrap();
    assert_eq!(varieties.status, MatchStatus::Matched);
    assert_eq!(varieties.scores.len(), 2);
    assert!(varieties.scores[0].total_score >= varieties.scores[1].total_score);

    let calendar = advisor
        .build_calendar("maize", &LUSAKA, &[Month::October, Month::November, Month::December])
        .unwrap();
    assert_eq!(calendar.month_scores.len(), 3);
    assert!([Month::October, Month::November, Month::December].contains(&calendar.best_month));

    assert!(matches!(
        advisor.rank_varieties("quinoa", &LUSAKA),
        Err(AdvisorError::DataUnavailable(_))
    ));
}

#[test]
fn test_stale_weather_lowers_confidence() {
    let advisor = advisor(summer_rain_history(), Some(current_weather()));
    let fresh = advisor.rank_crops(&november_request()).unwrap();
    let stale_request =
        RecommendationRequest::new(LUSAKA, Month::November).as_of(observed_at() + Duration::hours(72));
    let stale = advisor.rank_crops(&stale_request).unwrap();

    let fresh_maize = fresh.iter().find(|r| r.crop_id == "maize").unwrap();
    let stale_maize = stale.iter().find(|r| r.crop_id == "maize").unwrap();
    assert!(stale_maize.confidence.score < fresh_maize.confidence.score);
    assert!(stale_maize
        .confidence
        .suggestions
        .iter()
        .any(|s| s.contains("update weather data")));
}
