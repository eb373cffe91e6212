//! Calculation history models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Adverse reaction grades keyed by reaction type ID (CTCAE 0..=5).
pub type AdverseReactions = BTreeMap<String, u8>;

/// One calculated dose as recorded in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseEntry {
    pub drug_name: String,
    /// Calculated dose in mg
    pub calculated_dose: f64,
    pub dosage_unit: String,
}

/// A saved calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    /// Autogenerated row ID - `None` until inserted
    pub id: Option<i64>,
    /// Soft reference to a saved patient
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub regimen_id: String,
    pub regimen_name: String,
    pub cancer_type: String,
    /// Treatment cycle number (1-based)
    pub cycle: u32,
    /// Body surface area (m²)
    pub bsa: f64,
    /// Creatinine clearance (mL/min)
    pub ccr: f64,
    pub doses: Vec<DoseEntry>,
    pub reactions: AdverseReactions,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl HistoryRecord {
    /// Highest adverse reaction grade recorded, if any.
    pub fn worst_reaction_grade(&self) -> Option<u8> {
        self.reactions.values().copied().max()
    }
}
