//! Drought/flood risk tiers and mitigation catalogs

use crate::climate::ClimateProfile;
use serde::{Deserialize, Serialize};

const HIGH_RISK_RATIO: f64 = 0.3;
const MODERATE_RISK_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > HIGH_RISK_RATIO {
            RiskTier::High
        } else if ratio > MODERATE_RISK_RATIO {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevel {
    pub tier: RiskTier,
    /// Share of analysed years affected (%); `None` when no history was used
    pub probability_pct: Option<f64>,
}

impl RiskLevel {
    fn from_ratio(ratio: f64) -> Self {
        Self {
            tier: RiskTier::from_ratio(ratio),
            probability_pct: Some(ratio * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub drought: RiskLevel,
    pub flood: RiskLevel,
    pub mitigations: Vec<String>,
}

impl RiskAssessment {
    /// Risk from the drought/flood year ratios of a climate profile
    pub fn from_climate(climate: &ClimateProfile) -> Self {
        let drought = RiskLevel::from_ratio(climate.drought_ratio());
        let flood = RiskLevel::from_ratio(climate.flood_ratio());
        Self {
            drought,
            flood,
            mitigations: mitigations(drought.tier, flood.tier),
        }
    }

    /// Assessment without location history: moderate on both axes
    pub fn unassessed() -> Self {
        let unknown = RiskLevel {
            tier: RiskTier::Moderate,
            probability_pct: None,
        };
        Self {
            drought: unknown,
            flood: unknown,
            mitigations: mitigations(RiskTier::Moderate, RiskTier::Moderate),
        }
    }
}

pub fn drought_mitigations(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::High => &[
            "Plant drought-tolerant or early-maturing varieties",
            "Use conservation tillage and mulching to retain soil moisture",
            "Plan supplementary irrigation or water harvesting",
            "Stagger planting dates to spread drought risk",
        ],
        RiskTier::Moderate => &[
            "Prefer drought-tolerant varieties where available",
            "Mulch to conserve soil moisture",
        ],
        RiskTier::Low => &[],
    }
}

pub fn flood_mitigations(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::High => &[
            "Plant on ridges or raised beds",
            "Clear and maintain drainage channels before the rains",
            "Avoid low-lying fields prone to waterlogging",
        ],
        RiskTier::Moderate => &["Check field drainage before the peak of the rains"],
        RiskTier::Low => &[],
    }
}

const GENERAL_PRACTICE: &str = "Follow standard good agronomic practice and monitor forecasts";

/// Drought entries first, then flood; never empty
pub fn mitigations(drought: RiskTier, flood: RiskTier) -> Vec<String> {
    let mut out: Vec<String> = drought_mitigations(drought)
        .iter()
        .chain(flood_mitigations(flood))
        .map(|s| s.to_string())
        .collect();
    if out.is_empty() {
        out.push(GENERAL_PRACTICE.to_string());
    }
    out
}
