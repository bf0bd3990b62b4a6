//! Crop advisor - coordinator for the recommendation pipeline
//!
//! Fetches everything a request needs from the collaborators once, then runs
//! the pure components:
//!
//! ```text
//! WeatherSource ─► HistoricalClimateAnalyzer ─► ClimateProfile (cached)
//!                                                    │
//! CropCatalog ──► SuitabilityScorer (rayon, per crop) ┤
//!                         │                          │
//!                  ConfidenceScorer          top N ──┼─► WeatherVarietyMatcher
//!                                                    └─► PlantingRiskCalendarBuilder
//! ```
//!
//! Only an invalid location or an empty catalog fails a request. Missing
//! history, weather or soil degrade the affected scores; a crop that cannot be
//! scored (including one whose evaluation panics) is returned with `error`
//! set and never aborts the batch.

use crate::calendar::{PlantingCalendar, PlantingRiskCalendarBuilder};
use crate::climate::{ClimateCache, ClimateProfile, HistoricalClimateAnalyzer, ProfileKey};
use crate::confidence::{ConfidenceAssessment, ConfidenceInputs, ConfidenceScorer};
use crate::config::EngineConfig;
use crate::data::{
    CropCatalog, CropRequirement, CurrentWeather, Location, RainfallSummary, SoilData, SoilSource,
    WeatherSource,
};
use crate::error::{AdvisorError, AdvisorResult, ComputationDegraded};
use crate::suitability::{
    ProfileKind, ScoreComponents, ScoringProfile, SiteConditions, SuitabilityScorer, SuitabilityTier,
};
use crate::utils::Month;
use crate::varieties::{VarietyRanking, WeatherVarietyMatcher};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// How the scoring profile is chosen for a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSelection {
    /// Rainy/dry/base from the current month and local wet season
    #[default]
    Seasonal,
    Fixed(ProfileKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub location: Location,
    pub current_month: Month,
    /// Reference time for data freshness; freshness is unknown without it
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile: ProfileSelection,
}

impl RecommendationRequest {
    pub fn new(location: Location, current_month: Month) -> Self {
        Self {
            location,
            current_month,
            as_of: None,
            profile: ProfileSelection::Seasonal,
        }
    }

    pub fn as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn with_profile(mut self, kind: ProfileKind) -> Self {
        self.profile = ProfileSelection::Fixed(kind);
        self
    }
}

/// One ranked crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub crop_id: String,
    pub crop_name: String,
    pub score_components: ScoreComponents,
    pub total_score: f64,
    pub max_score: f64,
    pub suitability_tier: SuitabilityTier,
    pub profile: ProfileKind,
    pub reasons: Vec<String>,
    pub confidence: ConfidenceAssessment,
    /// Inputs that were missing or substituted for this crop
    pub degraded: Vec<ComputationDegraded>,
    /// Set when the crop could not be scored at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Recommendation {
    fn failed(crop: &CropRequirement, profile: &ScoringProfile, error: &AdvisorError) -> Self {
        Self {
            crop_id: crop.crop_id.clone(),
            crop_name: crop.name.clone(),
            score_components: ScoreComponents::default(),
            total_score: 0.0,
            max_score: profile.max_score(),
            suitability_tier: SuitabilityTier::Poor,
            profile: profile.kind,
            reasons: vec![format!("Could not be scored: {}", error)],
            confidence: ConfidenceAssessment::fallback(),
            degraded: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Top crop with its variety ranking and planting calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAdvice {
    pub recommendation: Recommendation,
    pub varieties: VarietyRanking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<PlantingCalendar>,
}

/// Full response for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryReport {
    pub location: Location,
    pub current_month: Month,
    pub profile: ProfileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate: Option<ClimateProfile>,
    pub top_crops: Vec<CropAdvice>,
    /// Every crop in the catalog, ranked
    pub rankings: Vec<Recommendation>,
}

/// Collaborator data gathered once per request
#[derive(Debug, Clone, Default)]
struct SiteSnapshot {
    climate: Option<Arc<ClimateProfile>>,
    weather: Option<CurrentWeather>,
    soil: Option<SoilData>,
    notes: Vec<ComputationDegraded>,
}

pub struct CropAdvisor {
    weather: Arc<dyn WeatherSource>,
    catalog: Arc<dyn CropCatalog>,
    soil: Option<Arc<dyn SoilSource>>,
    cache: Option<Arc<dyn ClimateCache>>,
    analyzer: HistoricalClimateAnalyzer,
    scorer: SuitabilityScorer,
    matcher: WeatherVarietyMatcher,
    confidence: ConfidenceScorer,
    calendar: PlantingRiskCalendarBuilder,
    config: EngineConfig,
}

impl CropAdvisor {
    pub fn new(
        config: EngineConfig,
        weather: Arc<dyn WeatherSource>,
        catalog: Arc<dyn CropCatalog>,
    ) -> AdvisorResult<Self> {
        config
            .validate()
            .map_err(|e| AdvisorError::Config(e.to_string()))?;

        tracing::info!(
            history_years = config.history_years,
            top_n = config.top_n,
            "crop advisor initialised"
        );

        Ok(Self {
            weather,
            catalog,
            soil: None,
            cache: None,
            analyzer: HistoricalClimateAnalyzer::new(config.analyzer.clone()),
            scorer: SuitabilityScorer::new(),
            matcher: WeatherVarietyMatcher::new(&config.calendar),
            confidence: ConfidenceScorer::new(),
            calendar: PlantingRiskCalendarBuilder::new(&config.calendar),
            config,
        })
    }

    pub fn with_soil(mut self, soil: Arc<dyn SoilSource>) -> Self {
        self.soil = Some(soil);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ClimateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Climate profile for a location, served from the cache when possible
    pub fn climate_profile(&self, location: &Location) -> AdvisorResult<Arc<ClimateProfile>> {
        location.validate()?;
        let years = self.config.history_years;
        let key = ProfileKey::new(location, years);

        if let Some(cache) = &self.cache {
            if let Some(profile) = cache.get(&key) {
                tracing::debug!(lat = location.lat, lon = location.lon, "climate profile cache hit");
                return Ok(profile);
            }
        }

        let samples = self.weather.daily_history(location, years)?;
        let profile = Arc::new(self.analyzer.analyze(&samples, years)?);
        tracing::debug!(
            lat = location.lat,
            lon = location.lon,
            years = profile.years_analyzed,
            trend = profile.trend.as_str(),
            "climate profile computed"
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::clone(&profile));
        }
        Ok(profile)
    }

    /// All catalog crops ranked by suitability, best first (ties by crop_id)
    pub fn rank_crops(&self, request: &RecommendationRequest) -> AdvisorResult<Vec<Recommendation>> {
        let site = self.gather(&request.location)?;
        let crops = self.catalog.all_crops()?;
        let profile = self.resolve_profile(request, site.climate.as_deref());
        Ok(self.rank_with(request, &site, &crops, &profile))
    }

    /// Varieties of one crop ranked against local rainfall history
    pub fn rank_varieties(&self, crop_id: &str, location: &Location) -> AdvisorResult<VarietyRanking> {
        location.validate()?;
        let crop = self.lookup_crop(crop_id)?;
        let climate = self.optional_climate(location);
        Ok(self.matcher.rank(&crop.varieties, climate.as_deref()))
    }

    /// Planting calendar for one crop; empty `candidate_months` means all months
    pub fn build_calendar(
        &self,
        crop_id: &str,
        location: &Location,
        candidate_months: &[Month],
    ) -> AdvisorResult<PlantingCalendar> {
        location.validate()?;
        let crop = self.lookup_crop(crop_id)?;
        let climate = self.optional_climate(location);
        self.calendar
            .build(&crop.crop_id, climate.as_deref(), crop.maturity_days, candidate_months)
    }

    /// Ranking plus variety and calendar detail for the top crops
    pub fn advise(&self, request: &RecommendationRequest) -> AdvisorResult<AdvisoryReport> {
        let site = self.gather(&request.location)?;
        let crops = self.catalog.all_crops()?;
        let climate = site.climate.as_deref();
        let profile = self.resolve_profile(request, climate);
        let rankings = self.rank_with(request, &site, &crops, &profile);

        let top_crops = rankings
            .iter()
            .filter(|r| r.error.is_none())
            .take(self.config.top_n)
            .filter_map(|rec| {
                let crop = crops.iter().find(|c| c.crop_id == rec.crop_id)?;
                let varieties = self.matcher.rank(&crop.varieties, climate);
                let calendar = match self
                    .calendar
                    .build(&crop.crop_id, climate, crop.maturity_days, &[])
                {
                    Ok(calendar) => Some(calendar),
                    Err(e) => {
                        tracing::warn!(crop = %crop.crop_id, "calendar unavailable: {}", e);
                        None
                    }
                };
                Some(CropAdvice {
                    recommendation: rec.clone(),
                    varieties,
                    calendar,
                })
            })
            .collect();

        Ok(AdvisoryReport {
            location: request.location,
            current_month: request.current_month,
            profile: profile.kind,
            climate: climate.cloned(),
            top_crops,
            rankings,
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn rank_with(
        &self,
        request: &RecommendationRequest,
        site: &SiteSnapshot,
        crops: &[CropRequirement],
        profile: &ScoringProfile,
    ) -> Vec<Recommendation> {
        let conditions = SiteConditions {
            climate: site.climate.as_deref(),
            weather: site.weather.as_ref(),
            soil: site.soil.as_ref(),
            current_month: request.current_month,
        };
        let rainfall = rainfall_summary(site, request.current_month);
        let data_age_hours = match (&site.weather, request.as_of) {
            (Some(weather), Some(as_of)) => weather.age_hours(as_of),
            _ => None,
        };

        tracing::info!(
            crops = crops.len(),
            profile = profile.kind.as_str(),
            month = %request.current_month,
            "ranking crops"
        );

        let mut recommendations: Vec<Recommendation> = crops
            .par_iter()
            .map(|crop| {
                isolate_panics(crop, profile, || {
                    self.recommend(crop, &conditions, profile, site, &rainfall, data_age_hours)
                })
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.total_score
                .total_cmp(&a.total_score)
                .then_with(|| a.crop_id.cmp(&b.crop_id))
        });
        recommendations
    }

    fn recommend(
        &self,
        crop: &CropRequirement,
        conditions: &SiteConditions<'_>,
        profile: &ScoringProfile,
        site: &SiteSnapshot,
        rainfall: &RainfallSummary,
        data_age_hours: Option<f64>,
    ) -> Recommendation {
        let score = match self.scorer.score(crop, conditions, profile) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(crop = %crop.crop_id, "crop could not be scored: {}", e);
                return Recommendation::failed(crop, profile, &e);
            }
        };

        let confidence = self.confidence.assess(&ConfidenceInputs {
            score_components: Some(score.components.clone()),
            total_score: Some(score.total_score),
            tier: Some(score.tier),
            profile: Some(profile.kind),
            weather: site.weather.clone(),
            rainfall: Some(rainfall.clone()),
            data_age_hours,
            degraded: score.degraded.clone(),
        });
        let mut degraded = site.notes.clone();
        degraded.extend(score.degraded);

        Recommendation {
            crop_id: score.crop_id,
            crop_name: crop.name.clone(),
            score_components: score.components,
            total_score: score.total_score,
            max_score: score.max_score,
            suitability_tier: score.tier,
            profile: score.profile,
            reasons: score.reasons,
            confidence,
            degraded,
            error: None,
        }
    }

    /// Collaborator data for a location; only an invalid location is an error
    fn gather(&self, location: &Location) -> AdvisorResult<SiteSnapshot> {
        location.validate()?;
        let mut site = SiteSnapshot::default();

        match self.climate_profile(location) {
            Ok(profile) => site.climate = Some(profile),
            Err(e) => {
                tracing::warn!("climate history unavailable: {}", e);
                site.notes
                    .push(ComputationDegraded::new("climate_history", e.to_string(), 0.0));
            }
        }

        match self.weather.current(location) {
            Ok(weather) => site.weather = Some(weather),
            Err(e) => {
                tracing::warn!("current weather unavailable: {}", e);
                site.notes
                    .push(ComputationDegraded::new("current_weather", e.to_string(), 0.0));
            }
        }

        site.soil = self.soil.as_ref().and_then(|s| s.soil(location));
        Ok(site)
    }

    fn optional_climate(&self, location: &Location) -> Option<Arc<ClimateProfile>> {
        match self.climate_profile(location) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("climate history unavailable: {}", e);
                None
            }
        }
    }

    fn lookup_crop(&self, crop_id: &str) -> AdvisorResult<CropRequirement> {
        self.catalog
            .crop(crop_id)
            .ok_or_else(|| AdvisorError::unavailable(format!("crop '{}' not in catalog", crop_id)))
    }

    fn resolve_profile(&self, request: &RecommendationRequest, climate: Option<&ClimateProfile>) -> ScoringProfile {
        match request.profile {
            ProfileSelection::Seasonal => ScoringProfile::seasonal(request.current_month, climate),
            ProfileSelection::Fixed(kind) => ScoringProfile::for_kind(kind),
        }
    }
}

/// Typical rainfall for a week of the current month vs the 7-day forecast
fn rainfall_summary(site: &SiteSnapshot, month: Month) -> RainfallSummary {
    let historical_mm = site
        .climate
        .as_deref()
        .and_then(|c| c.month_total(month))
        .map(|total| total * 7.0 / month.days() as f64);
    let forecast_mm = site.weather.as_ref().and_then(|w| w.forecast_7day_mm);
    RainfallSummary {
        historical_mm,
        forecast_mm,
    }
}

/// Run one crop's evaluation; a panic becomes a failed recommendation
fn isolate_panics(
    crop: &CropRequirement,
    profile: &ScoringProfile,
    evaluate: impl FnOnce() -> Recommendation,
) -> Recommendation {
    match panic::catch_unwind(AssertUnwindSafe(evaluate)) {
        Ok(recommendation) => recommendation,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(crop = %crop.crop_id, "crop evaluation panicked: {}", message);
            let error = AdvisorError::Internal(format!("evaluation panicked: {}", message));
            Recommendation::failed(crop, profile, &error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::MokaClimateCache;
    use crate::data::{reference_crops, DailyRainfallSample, StaticCropCatalog, StaticWeatherSource};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts history fetches so cache behaviour can be observed
    struct CountingWeather {
        inner: StaticWeatherSource,
        fetches: AtomicUsize,
    }

    impl WeatherSource for CountingWeather {
        fn daily_history(&self, location: &Location, years: u32) -> AdvisorResult<Vec<DailyRainfallSample>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.daily_history(location, years)
        }

        fn current(&self, location: &Location) -> AdvisorResult<CurrentWeather> {
            self.inner.current(location)
        }
    }

    fn history() -> Vec<DailyRainfallSample> {
        let mut samples = Vec::new();
        for year in 2019..=2023 {
            for month in 1..=12u32 {
                let rain = match month {
                    12 | 1 | 2 => 7.0,
                    11 | 3 => 4.0,
                    _ => 0.2,
                };
                for day in [1, 10, 20] {
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        samples.push(DailyRainfallSample::new(date, rain, 24.0));
                    }
                }
            }
        }
        samples
    }

    fn advisor_with(weather: Arc<dyn WeatherSource>) -> CropAdvisor {
        CropAdvisor::new(
            EngineConfig::default(),
            weather,
            Arc::new(StaticCropCatalog::new(reference_crops())),
        )
        .unwrap()
    }

    #[test]
    fn test_cache_avoids_refetch() {
        let weather = Arc::new(CountingWeather {
            inner: StaticWeatherSource::new(history(), None),
            fetches: AtomicUsize::new(0),
        });
        let advisor = advisor_with(weather.clone())
            .with_cache(Arc::new(MokaClimateCache::new(&EngineConfig::default().cache)));
        let location = Location { lat: -15.4, lon: 28.3 };

        let first = advisor.climate_profile(&location).unwrap();
        let second = advisor.climate_profile(&location).unwrap();
        assert_eq!(first, second);
        assert_eq!(weather.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            top_n: 0,
            ..Default::default()
        };
        let result = CropAdvisor::new(
            config,
            Arc::new(StaticWeatherSource::default()),
            Arc::new(StaticCropCatalog::new(reference_crops())),
        );
        assert!(matches!(result, Err(AdvisorError::Config(_))));
    }

    #[test]
    fn test_malformed_crop_does_not_abort_ranking() {
        let mut crops = reference_crops();
        crops[0].water.min = -5.0;
        let broken_id = crops[0].crop_id.clone();
        let advisor = CropAdvisor::new(
            EngineConfig::default(),
            Arc::new(StaticWeatherSource::new(history(), None)),
            Arc::new(StaticCropCatalog::new(crops)),
        )
        .unwrap();

        let request = RecommendationRequest::new(Location { lat: -15.4, lon: 28.3 }, Month::November);
        let ranked = advisor.rank_crops(&request).unwrap();
        assert_eq!(ranked.len(), reference_crops().len());

        let broken = ranked.iter().find(|r| r.crop_id == broken_id).unwrap();
        assert!(broken.error.is_some());
        assert_eq!(broken.total_score, 0.0);
        assert!(ranked.iter().filter(|r| r.error.is_none()).count() == ranked.len() - 1);
    }

    #[test]
    fn test_panicking_crop_becomes_failed_entry() {
        let crop = reference_crops().remove(0);
        let profile = ScoringProfile::base();

        let rec = isolate_panics(&crop, &profile, || panic!("requirement table corrupted"));
        assert_eq!(rec.crop_id, crop.crop_id);
        assert_eq!(rec.total_score, 0.0);
        assert_eq!(rec.confidence, ConfidenceAssessment::fallback());
        assert!(rec.error.as_deref().unwrap().contains("requirement table corrupted"));
    }

    #[test]
    fn test_confidence_sees_neutral_fallbacks() {
        let advisor = advisor_with(Arc::new(StaticWeatherSource::default()));
        let request = RecommendationRequest::new(Location { lat: -15.4, lon: 28.3 }, Month::November);

        for rec in advisor.rank_crops(&request).unwrap() {
            let breakdown = rec.confidence.breakdown.unwrap();
            assert!(breakdown.completeness < 1.0, "{} completeness {}", rec.crop_id, breakdown.completeness);
            assert!(rec
                .confidence
                .suggestions
                .iter()
                .any(|s| s == "provide more complete crop and location data"));
        }
    }

    #[test]
    fn test_rainfall_summary_scales_month_to_week() {
        let mut climate = ClimateProfile::empty();
        climate.years_analyzed = 1;
        climate.monthly_totals.insert(Month::November, 300.0);
        let site = SiteSnapshot {
            climate: Some(Arc::new(climate)),
            weather: Some(CurrentWeather {
                forecast_7day_mm: Some(60.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let summary = rainfall_summary(&site, Month::November);
        assert_eq!(summary.historical_mm, Some(70.0));
        assert_eq!(summary.forecast_mm, Some(60.0));
    }
}
