//! Reference crop catalog
//!
//! A small hardcoded catalog of staple crops for a tropical summer-rainfall
//! climate (rains November-April). Used by the demo binary, the bench and as
//! a fallback catalog when no external catalog is configured.

use super::crops::{
    CropRequirement, PlantingHint, PlantingWindow, Range3, SoilPreference, Variety, VarietyCapabilities,
};
use super::types::{Drainage, Fertility};
use crate::utils::Month;

fn window(start: Month, end: Month, rainfall_needed: f64) -> PlantingWindow {
    PlantingWindow {
        start_month: start,
        end_month: end,
        rainfall_needed: Some(rainfall_needed),
        irrigation_required: false,
    }
}

fn variety(id: &str, name: &str, caps: VarietyCapabilities, hint: PlantingHint, maturity: u32) -> Variety {
    Variety {
        variety_id: id.to_string(),
        name: name.to_string(),
        capabilities: caps,
        planting_hint: hint,
        maturity_days: Some(maturity),
    }
}

/// Maize - staple, moderate water need, sensitive to mid-season drought
pub fn maize() -> CropRequirement {
    CropRequirement {
        crop_id: "maize".to_string(),
        name: "Maize".to_string(),
        water: Range3::new(400.0, 700.0, 1200.0),
        temperature: Range3::new(15.0, 25.0, 35.0),
        planting_windows: vec![window(Month::November, Month::December, 25.0)],
        soil: SoilPreference {
            ph_range: (5.5, 7.5),
            fertility: Fertility::Medium,
            drainage: Drainage::Good,
        },
        maturity_days: 120,
        varieties: vec![
            variety(
                "sc403",
                "SC 403 (early)",
                VarietyCapabilities {
                    drought_tolerant: true,
                    early_maturing: true,
                    ..VarietyCapabilities::default()
                },
                PlantingHint::EarlySeason,
                105,
            ),
            variety(
                "zmh606",
                "ZMH 606 (medium)",
                VarietyCapabilities {
                    resilient: true,
                    ..VarietyCapabilities::default()
                },
                PlantingHint::MidSeason,
                130,
            ),
            variety(
                "pan53",
                "PAN 53 (late, high yield)",
                VarietyCapabilities {
                    high_water_requirement: true,
                    ..VarietyCapabilities::default()
                },
                PlantingHint::MidSeason,
                145,
            ),
        ],
    }
}

/// Sorghum - drought-hardy cereal
pub fn sorghum() -> CropRequirement {
    CropRequirement {
        crop_id: "sorghum".to_string(),
        name: "Sorghum".to_string(),
        water: Range3::new(300.0, 500.0, 900.0),
        temperature: Range3::new(18.0, 28.0, 38.0),
        planting_windows: vec![window(Month::November, Month::January, 20.0)],
        soil: SoilPreference {
            ph_range: (5.0, 8.0),
            fertility: Fertility::Low,
            drainage: Drainage::Moderate,
        },
        maturity_days: 110,
        varieties: vec![
            variety(
                "kuyuma",
                "Kuyuma",
                VarietyCapabilities {
                    drought_tolerant: true,
                    resilient: true,
                    ..VarietyCapabilities::default()
                },
                PlantingHint::MidSeason,
                110,
            ),
            variety(
                "sima",
                "Sima",
                VarietyCapabilities {
                    drought_tolerant: true,
                    early_maturing: true,
                    ..VarietyCapabilities::default()
                },
                PlantingHint::LateSeason,
                95,
            ),
        ],
    }
}

/// Groundnut - legume, needs good drainage
pub fn groundnut() -> CropRequirement {
    CropRequirement {
        crop_id: "groundnut".to_string(),
        name: "Groundnut".to_string(),
        water: Range3::new(450.0, 600.0, 1000.0),
        temperature: Range3::new(20.0, 27.0, 35.0),
        planting_windows: vec![window(Month::November, Month::December, 30.0)],
        soil: SoilPreference {
            ph_range: (5.5, 7.0),
            fertility: Fertility::Low,
            drainage: Drainage::Good,
        },
        maturity_days: 120,
        varieties: vec![variety(
            "mgv5",
            "MGV 5",
            VarietyCapabilities {
                early_maturing: true,
                ..VarietyCapabilities::default()
            },
            PlantingHint::EarlySeason,
            110,
        )],
    }
}

/// Soybean - cash legume
pub fn soybean() -> CropRequirement {
    CropRequirement {
        crop_id: "soybean".to_string(),
        name: "Soybean".to_string(),
        water: Range3::new(450.0, 650.0, 1100.0),
        temperature: Range3::new(18.0, 26.0, 34.0),
        planting_windows: vec![window(Month::November, Month::December, 30.0)],
        soil: SoilPreference {
            ph_range: (6.0, 7.0),
            fertility: Fertility::Medium,
            drainage: Drainage::Good,
        },
        maturity_days: 115,
        varieties: vec![variety(
            "lukanga",
            "Lukanga",
            VarietyCapabilities {
                resilient: true,
                ..VarietyCapabilities::default()
            },
            PlantingHint::MidSeason,
            115,
        )],
    }
}

/// Rice - water-loving, tolerates waterlogging
pub fn rice() -> CropRequirement {
    CropRequirement {
        crop_id: "rice".to_string(),
        name: "Rice".to_string(),
        water: Range3::new(900.0, 1200.0, 2000.0),
        temperature: Range3::new(20.0, 28.0, 36.0),
        planting_windows: vec![window(Month::December, Month::January, 60.0)],
        soil: SoilPreference {
            ph_range: (5.0, 7.0),
            fertility: Fertility::Medium,
            drainage: Drainage::Poor,
        },
        maturity_days: 140,
        varieties: vec![variety(
            "supa",
            "Supa",
            VarietyCapabilities {
                high_water_requirement: true,
                flood_tolerant: true,
                ..VarietyCapabilities::default()
            },
            PlantingHint::LateSeason,
            140,
        )],
    }
}

/// Cassava - long-season root crop, very drought-hardy
pub fn cassava() -> CropRequirement {
    CropRequirement {
        crop_id: "cassava".to_string(),
        name: "Cassava".to_string(),
        water: Range3::new(500.0, 1000.0, 1500.0),
        temperature: Range3::new(18.0, 27.0, 35.0),
        planting_windows: vec![window(Month::November, Month::February, 30.0)],
        soil: SoilPreference {
            ph_range: (4.5, 7.0),
            fertility: Fertility::Low,
            drainage: Drainage::Moderate,
        },
        maturity_days: 365,
        varieties: vec![variety(
            "bangweulu",
            "Bangweulu",
            VarietyCapabilities {
                drought_tolerant: true,
                resilient: true,
                ..VarietyCapabilities::default()
            },
            PlantingHint::EarlySeason,
            365,
        )],
    }
}

/// Full reference catalog
pub fn reference_crops() -> Vec<CropRequirement> {
    vec![maize(), sorghum(), groundnut(), soybean(), rice(), cassava()]
}
