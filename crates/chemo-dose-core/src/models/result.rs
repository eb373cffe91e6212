//! Computed dosing results.

use serde::{Deserialize, Serialize};

use super::regimen::Dosage;
use crate::calculator::RenalFunction;

/// Calculated dose for one drug of the active regimen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugDose {
    pub name: String,
    pub abbreviation: String,
    pub dosage: Dosage,
    /// Unit label of the dosage rule ("mg/m²" or "Calvert")
    pub dosage_unit: String,
    /// Calculated dose in mg
    pub calculated_dose: f64,
    /// Whether the drug's maximum dose limited the result
    pub capped: bool,
    pub administration: String,
    pub day: String,
}

/// Everything derived from the session inputs. Never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputedResult {
    /// Body surface area (m²)
    pub bsa: f64,
    /// Creatinine clearance (mL/min)
    pub ccr: f64,
    pub renal_function: RenalFunction,
    pub drugs: Vec<DrugDose>,
}
