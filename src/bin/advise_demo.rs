// Advisory demo binary
//
// Purpose: Run the full recommendation pipeline for one location and print the report
// Usage: cargo run --bin advise_demo
//
// Environment:
//   ADVISOR_CONFIG  JSON engine config (defaults built in)
//   RAINFALL_CSV    daily history CSV (date,rainfall_mm,temperature_c); synthetic if unset
//   LAT / LON       location (default Lusaka)
//   MONTH           current month number 1-12 (default 11)

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use crop_advisor_rust::data::{CsvRainfallHistory, Drainage, Fertility, FixedSoilSource, StaticCropCatalog, StaticWeatherSource};
use crop_advisor_rust::{
    data::reference_crops, CropAdvisor, CurrentWeather, DailyRainfallSample, EngineConfig, Location,
    MokaClimateCache, Month, RecommendationRequest, SoilData,
};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("ADVISOR_CONFIG") {
        Ok(path) => EngineConfig::load(Path::new(&path))?,
        Err(_) => EngineConfig::default(),
    };

    let lat: f64 = env_or("LAT", -15.4167);
    let lon: f64 = env_or("LON", 28.2833);
    let month_number: u32 = env_or("MONTH", 11);
    let location = Location::new(lat, lon)?;
    let month = Month::from_number(month_number)
        .with_context(|| format!("MONTH must be 1-12, got {}", month_number))?;

    let now = Utc::now();
    let current = CurrentWeather {
        temperature_c: Some(26.0),
        humidity_pct: Some(64.0),
        rainfall_7day_mm: Some(18.0),
        forecast_7day_mm: Some(35.0),
        observed_at: Some(now - Duration::hours(2)),
    };

    let weather: Arc<dyn crop_advisor_rust::data::WeatherSource> = match std::env::var("RAINFALL_CSV") {
        Ok(path) => {
            tracing::info!("Loading rainfall history: {}", path);
            Arc::new(CsvRainfallHistory::load(&path)?.with_current(current))
        }
        Err(_) => {
            tracing::info!("RAINFALL_CSV not set - using synthetic summer-rain history");
            Arc::new(StaticWeatherSource::new(synthetic_history(), Some(current)))
        }
    };

    let advisor = CropAdvisor::new(
        config.clone(),
        weather,
        Arc::new(StaticCropCatalog::new(reference_crops())),
    )?
    .with_soil(Arc::new(FixedSoilSource(SoilData {
        ph: 6.1,
        fertility: Fertility::Medium,
        drainage: Drainage::Good,
    })))
    .with_cache(Arc::new(MokaClimateCache::new(&config.cache)));

    let request = RecommendationRequest::new(location, month).as_of(now);
    let report = advisor.advise(&request)?;

    println!("\nCrop advice for ({:.4}, {:.4}) in {}", lat, lon, month);
    println!("Profile: {}", report.profile.as_str());
    println!("{}", "-".repeat(60));
    for rec in &report.rankings {
        println!(
            "  {:<10} {:>6.1} / {:<5} {:<10} confidence {:.2} ({})",
            rec.crop_id,
            rec.total_score,
            rec.max_score,
            rec.suitability_tier.as_str(),
            rec.confidence.score,
            rec.confidence.tier.as_str()
        );
    }
    for advice in &report.top_crops {
        let best_variety = advice
            .varieties
            .best()
            .map(|v| v.name.as_str())
            .unwrap_or("-");
        let best_month = advice
            .calendar
            .as_ref()
            .map(|c| c.best_month.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "\n{}: best variety {}, plant in {}",
            advice.recommendation.crop_name, best_variety, best_month
        );
        for reason in &advice.recommendation.reasons {
            println!("    - {}", reason);
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Five seasons of daily data with rains from November to March
fn synthetic_history() -> Vec<DailyRainfallSample> {
    let mut samples = Vec::new();
    let Some(start) = NaiveDate::from_ymd_opt(2019, 1, 1) else {
        return samples;
    };
    for offset in 0..(5 * 365) {
        let date = start + Duration::days(offset);
        let doy = offset % 365;
        let rainfall = match doy {
            0..=59 => 6.5,
            60..=89 => 3.8,
            90..=119 => 0.8,
            300..=329 => 3.5,
            330..=364 => 6.0,
            _ => 0.0,
        };
        // One drought season
        let rainfall = if offset / 365 == 3 { rainfall * 0.6 } else { rainfall };
        samples.push(DailyRainfallSample::new(date, rainfall, 24.0));
    }
    samples
}
