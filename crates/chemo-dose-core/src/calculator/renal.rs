//! Renal function classification from creatinine clearance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Renal impairment tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RenalLevel {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl RenalLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RenalLevel::Normal => "normal",
            RenalLevel::Mild => "mild",
            RenalLevel::Moderate => "moderate",
            RenalLevel::Severe => "severe",
        }
    }
}

impl fmt::Display for RenalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result with the dosing recommendation for the tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenalFunction {
    pub level: RenalLevel,
    /// Human-readable tier description
    pub description: String,
    /// Dose adjustment recommendation
    pub adjustment: String,
    /// Whether the regimen's dosages should be reviewed
    pub review_recommended: bool,
}

/// Ccr thresholds (mL/min): at or above `NORMAL` is normal, and so on down.
pub const RENAL_NORMAL_THRESHOLD: f64 = 90.0;
pub const RENAL_MILD_THRESHOLD: f64 = 60.0;
pub const RENAL_MODERATE_THRESHOLD: f64 = 30.0;

/// Four-tier step function on Ccr.
pub fn classify_renal_function(ccr: f64) -> RenalFunction {
    let (level, description, adjustment) = if ccr >= RENAL_NORMAL_THRESHOLD {
        (RenalLevel::Normal, "Normal renal function", "No dose adjustment needed")
    } else if ccr >= RENAL_MILD_THRESHOLD {
        (RenalLevel::Mild, "Mild renal impairment", "Some drugs require dose reduction")
    } else if ccr >= RENAL_MODERATE_THRESHOLD {
        (RenalLevel::Moderate, "Moderate renal impairment", "Dose adjustment required")
    } else {
        (
            RenalLevel::Severe,
            "Severe renal impairment",
            "Avoid nephrotoxic drugs",
        )
    };

    RenalFunction {
        level,
        description: description.to_string(),
        adjustment: adjustment.to_string(),
        review_recommended: level != RenalLevel::Normal,
    }
}
