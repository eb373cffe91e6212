//! Regimen catalog models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a drug's dose is derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dosage {
    /// Fixed rate scaled by body surface area (mg/m²)
    PerBodySurface { mg_per_m2: f64 },
    /// Target area under the curve, dosed with the Calvert formula
    TargetAuc { auc: f64 },
}

impl Dosage {
    /// Unit label shown next to the dosage value.
    pub fn unit_label(&self) -> &'static str {
        match self {
            Dosage::PerBodySurface { .. } => "mg/m²",
            Dosage::TargetAuc { .. } => "Calvert",
        }
    }

    /// The numeric dosage value (rate or AUC).
    pub fn value(&self) -> f64 {
        match self {
            Dosage::PerBodySurface { mg_per_m2 } => *mg_per_m2,
            Dosage::TargetAuc { auc } => *auc,
        }
    }

    pub fn uses_calvert(&self) -> bool {
        matches!(self, Dosage::TargetAuc { .. })
    }

    /// Display form, e.g. "85 mg/m²" or "AUC 5".
    pub fn describe(&self) -> String {
        match self {
            Dosage::PerBodySurface { mg_per_m2 } => format!("{} mg/m²", mg_per_m2),
            Dosage::TargetAuc { auc } => format!("AUC {}", auc),
        }
    }
}

/// Per-regimen dosing rule for one drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// Generic drug name
    pub name: String,
    /// Abbreviation (e.g., "OXA", "5-FU")
    pub abbreviation: String,
    pub dosage: Dosage,
    /// Route and infusion time
    pub administration: String,
    /// Dosing method description (e.g., "Single dose, day 1")
    pub method: String,
    /// Administration day(s) within the cycle
    pub day: String,
    /// Maximum single dose in mg, if capped
    pub max_dose_mg: Option<f64>,
    pub note: Option<String>,
}

impl Drug {
    /// Drug dosed per m² of body surface area.
    pub fn per_m2(name: &str, abbreviation: &str, mg_per_m2: f64) -> Self {
        Self::with_dosage(name, abbreviation, Dosage::PerBodySurface { mg_per_m2 })
    }

    /// Drug dosed to a target AUC (Calvert formula).
    pub fn target_auc(name: &str, abbreviation: &str, auc: f64) -> Self {
        Self::with_dosage(name, abbreviation, Dosage::TargetAuc { auc })
    }

    fn with_dosage(name: &str, abbreviation: &str, dosage: Dosage) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            dosage,
            administration: String::new(),
            method: String::new(),
            day: String::new(),
            max_dose_mg: None,
            note: None,
        }
    }

    pub fn given(mut self, administration: &str, method: &str, day: &str) -> Self {
        self.administration = administration.to_string();
        self.method = method.to_string();
        self.day = day.to_string();
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    pub fn with_max_dose(mut self, max_dose_mg: f64) -> Self {
        self.max_dose_mg = Some(max_dose_mg);
        self
    }
}

/// Severity of a regimen warning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Danger,
}

impl WarningSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningSeverity::Info => "info",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegimenWarning {
    pub severity: WarningSeverity,
    pub title: String,
    pub content: String,
}

impl RegimenWarning {
    pub fn new(severity: WarningSeverity, title: &str, content: &str) -> Self {
        Self {
            severity,
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

/// A named combination of drugs, doses and schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Regimen {
    /// Unique regimen ID (e.g., "mfolfox6_adjuvant")
    pub id: String,
    /// Display name (e.g., "mFOLFOX6")
    pub name: String,
    /// Cancer type ID
    pub cancer_type: String,
    /// Treatment scenario ID
    pub scenario: String,
    pub description: String,
    /// Cycle length in days
    pub cycle_days: u32,
    /// Cycle length in weeks
    pub cycle_weeks: u32,
    /// Recommended number of cycles, if the guideline gives one
    pub recommended_cycles: Option<u32>,
    /// Guideline source
    pub source: String,
    /// Evidence level (e.g., "1A")
    pub evidence_level: String,
    /// Ordered drug list (never empty)
    pub drugs: Vec<Drug>,
    pub warnings: Vec<RegimenWarning>,
    pub contraindications: Vec<String>,
    /// Preferred option for its cancer type and scenario
    pub recommended: bool,
}

/// A broken regimen invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegimenError {
    #[error("regimen {0} has no drugs")]
    NoDrugs(String),

    #[error("regimen {0} has a zero cycle length")]
    ZeroCycleLength(String),

    #[error("regimen {regimen}: drug {drug} has a non-positive dosage")]
    InvalidDosage { regimen: String, drug: String },
}

impl Regimen {
    /// Check the catalog invariants.
    pub fn validate(&self) -> Result<(), RegimenError> {
        if self.drugs.is_empty() {
            return Err(RegimenError::NoDrugs(self.id.clone()));
        }
        if self.cycle_days == 0 {
            return Err(RegimenError::ZeroCycleLength(self.id.clone()));
        }
        for drug in &self.drugs {
            let value = drug.dosage.value();
            if !(value.is_finite() && value > 0.0) {
                return Err(RegimenError::InvalidDosage {
                    regimen: self.id.clone(),
                    drug: drug.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether any drug in the regimen is dosed with the Calvert formula.
    pub fn uses_calvert(&self) -> bool {
        self.drugs.iter().any(|d| d.dosage.uses_calvert())
    }
}

/// Cancer type tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CancerType {
    pub id: String,
    pub name: String,
}

/// Treatment scenario tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentScenario {
    pub id: String,
    pub name: String,
    /// Display order within a cancer type
    pub order: u32,
}

/// Adverse reaction category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReactionCategory {
    Hematologic,
    NonHematologic,
    Special,
}

impl ReactionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionCategory::Hematologic => "hematologic",
            ReactionCategory::NonHematologic => "non_hematologic",
            ReactionCategory::Special => "special",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdverseReactionType {
    pub id: String,
    pub name: String,
    pub category: ReactionCategory,
    pub description: String,
}

/// CTCAE grade (0 = none, 5 = death).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionGrade {
    pub value: u8,
    pub label: String,
    pub description: Option<String>,
}

/// Home care guidance item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeCareItem {
    pub title: String,
    pub description: String,
}

/// Symptom that warrants immediate medical attention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedFlag {
    pub text: String,
    pub description: String,
}
