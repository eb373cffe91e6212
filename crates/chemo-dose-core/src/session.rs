//! Calculation session.
//!
//! Holds the patient being worked on, the selected regimen, the cycle number
//! and the last computed result. BSA and Ccr are derived from the current
//! biometrics on every read, so they can never go stale.

use thiserror::Error;
use tracing::debug;

use crate::calculator::{
    classify_renal_function, compute_body_surface_area_with_limits, compute_carboplatin_dose,
    compute_creatinine_clearance_with_limits, compute_dose_by_bsa, BsaFormula, CalculatorLimits,
    CreatinineUnit, Measurement,
};
use crate::models::{
    AdverseReactions, ComputedResult, Dosage, DoseEntry, DrugDose, HistoryRecord, Patient,
    PatientBiometrics, Regimen,
};

/// Name recorded when neither the caller nor the biometrics give one.
pub const UNNAMED_PATIENT: &str = "Unnamed";

/// Missing session state for the requested operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Complete a calculation first")]
    NotCalculated,

    #[error("Patient name is required")]
    MissingName,

    #[error("Unknown regimen: {0}")]
    UnknownRegimen(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// In-progress calculation state for one interactive session.
#[derive(Debug, Clone)]
pub struct Session {
    patient: PatientBiometrics,
    regimen: Option<Regimen>,
    cycle: u32,
    reactions: AdverseReactions,
    formula: BsaFormula,
    default_unit: CreatinineUnit,
    limits: CalculatorLimits,
    result: Option<ComputedResult>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(BsaFormula::default(), CreatinineUnit::default())
    }
}

impl Session {
    pub fn new(formula: BsaFormula, default_unit: CreatinineUnit) -> Self {
        Self {
            patient: PatientBiometrics::default(),
            regimen: None,
            cycle: 1,
            reactions: AdverseReactions::new(),
            formula,
            default_unit,
            limits: CalculatorLimits::DEFAULT,
            result: None,
        }
    }

    pub fn with_limits(mut self, limits: CalculatorLimits) -> Self {
        self.limits = limits;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn patient(&self) -> &PatientBiometrics {
        &self.patient
    }

    pub fn regimen(&self) -> Option<&Regimen> {
        self.regimen.as_ref()
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn reactions(&self) -> &AdverseReactions {
        &self.reactions
    }

    pub fn formula(&self) -> BsaFormula {
        self.formula
    }

    pub fn default_unit(&self) -> CreatinineUnit {
        self.default_unit
    }

    pub fn limits(&self) -> &CalculatorLimits {
        &self.limits
    }

    /// The last computed result, if still valid for the current inputs.
    pub fn result(&self) -> Option<&ComputedResult> {
        self.result.as_ref()
    }

    /// Cancer type of the selected regimen.
    pub fn cancer_type(&self) -> Option<&str> {
        self.regimen.as_ref().map(|r| r.cancer_type.as_str())
    }

    pub fn has_patient(&self) -> bool {
        self.patient.is_complete()
    }

    /// Body surface area for the current biometrics, 0 if height, weight or
    /// sex is missing.
    pub fn bsa(&self) -> f64 {
        let p = &self.patient;
        match (p.height_cm, p.weight_kg, p.sex) {
            (Some(height), Some(weight), Some(sex)) => compute_body_surface_area_with_limits(
                height,
                weight,
                self.formula,
                sex,
                &self.limits.bsa,
            ),
            _ => 0.0,
        }
    }

    /// Creatinine clearance for the current biometrics, 0 if any input is
    /// missing.
    pub fn ccr(&self) -> f64 {
        let p = &self.patient;
        match (p.age, p.weight_kg, p.creatinine, p.sex) {
            (Some(age), Some(weight), Some(creatinine), Some(sex)) => {
                compute_creatinine_clearance_with_limits(
                    age,
                    weight,
                    creatinine,
                    p.creatinine_unit.unwrap_or(self.default_unit),
                    sex,
                    &self.limits.ccr,
                )
            }
            _ => 0.0,
        }
    }

    /// Entered measurements outside their plausibility range.
    pub fn biometric_warnings(&self) -> Vec<Measurement> {
        let mut patient = self.patient.clone();
        patient.creatinine_unit = Some(patient.creatinine_unit.unwrap_or(self.default_unit));
        patient.out_of_range()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the patient biometrics. Clears the computed result.
    pub fn set_patient(&mut self, patient: PatientBiometrics) {
        self.patient = patient;
        self.result = None;
    }

    /// Select a regimen. Clears the computed result.
    pub fn select_regimen(&mut self, regimen: Regimen) {
        debug!(regimen_id = %regimen.id, "Regimen selected");
        self.regimen = Some(regimen);
        self.result = None;
    }

    pub fn set_cycle(&mut self, cycle: u32) {
        self.cycle = cycle;
    }

    pub fn set_adverse_reactions(&mut self, reactions: AdverseReactions) {
        self.reactions = reactions;
    }

    /// Change the BSA estimator. Clears the computed result.
    pub fn set_formula(&mut self, formula: BsaFormula) {
        if self.formula != formula {
            self.formula = formula;
            self.result = None;
        }
    }

    /// Change the unit assumed for creatinine entered without one. Clears
    /// the computed result.
    pub fn set_default_unit(&mut self, unit: CreatinineUnit) {
        if self.default_unit != unit {
            self.default_unit = unit;
            self.result = None;
        }
    }

    /// Load a saved patient into the session and restore its last cycle.
    pub fn load_patient(&mut self, patient: &Patient) {
        self.set_patient(patient.biometrics());
        if let Some(cycle) = patient.last_cycle {
            self.cycle = cycle;
        }
    }

    /// Reset everything except formula, default unit and limits.
    pub fn clear(&mut self) {
        self.patient = PatientBiometrics::default();
        self.regimen = None;
        self.cycle = 1;
        self.reactions.clear();
        self.result = None;
    }

    // =========================================================================
    // Calculation
    // =========================================================================

    /// Compute doses for the selected regimen.
    ///
    /// Returns `None` when no regimen is selected or the BSA cannot be
    /// computed. Calling it again with unchanged inputs yields an identical
    /// result.
    pub fn calculate(&mut self) -> Option<&ComputedResult> {
        let regimen = self.regimen.as_ref()?;

        let bsa = self.bsa();
        if bsa == 0.0 {
            return None;
        }
        let ccr = self.ccr();

        let drugs = regimen
            .drugs
            .iter()
            .map(|drug| {
                let dose = match drug.dosage {
                    Dosage::PerBodySurface { mg_per_m2 } => compute_dose_by_bsa(bsa, mg_per_m2),
                    Dosage::TargetAuc { auc } => compute_carboplatin_dose(auc, ccr),
                };
                let (calculated_dose, capped) = match drug.max_dose_mg {
                    Some(max) if dose > max => (max, true),
                    _ => (dose, false),
                };

                DrugDose {
                    name: drug.name.clone(),
                    abbreviation: drug.abbreviation.clone(),
                    dosage: drug.dosage,
                    dosage_unit: drug.dosage.unit_label().to_string(),
                    calculated_dose,
                    capped,
                    administration: drug.administration.clone(),
                    day: drug.day.clone(),
                }
            })
            .collect();

        debug!(regimen_id = %regimen.id, bsa, ccr, "Doses calculated");

        self.result = Some(ComputedResult {
            bsa,
            ccr,
            renal_function: classify_renal_function(ccr),
            drugs,
        });
        self.result.as_ref()
    }

    // =========================================================================
    // Snapshots for persistence
    // =========================================================================

    /// Build a history record from the current result.
    pub fn history_record(&self, patient_name: Option<&str>) -> SessionResult<HistoryRecord> {
        let (regimen, result) = match (&self.regimen, &self.result) {
            (Some(regimen), Some(result)) => (regimen, result),
            _ => return Err(SessionError::NotCalculated),
        };

        let patient_name = patient_name
            .filter(|n| !n.is_empty())
            .or(self.patient.name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(UNNAMED_PATIENT)
            .to_string();

        Ok(HistoryRecord {
            id: None,
            patient_id: None,
            patient_name,
            regimen_id: regimen.id.clone(),
            regimen_name: regimen.name.clone(),
            cancer_type: regimen.cancer_type.clone(),
            cycle: self.cycle,
            bsa: result.bsa,
            ccr: result.ccr,
            doses: result
                .drugs
                .iter()
                .map(|d| DoseEntry {
                    drug_name: d.name.clone(),
                    calculated_dose: d.calculated_dose,
                    dosage_unit: d.dosage_unit.clone(),
                })
                .collect(),
            reactions: self.reactions.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Build an unsaved patient record from the session biometrics.
    pub fn patient_for_save(&self, name: Option<&str>) -> SessionResult<Patient> {
        let name = name
            .filter(|n| !n.is_empty())
            .or(self.patient.name.as_deref().filter(|n| !n.is_empty()))
            .ok_or(SessionError::MissingName)?;

        let p = &self.patient;
        let mut patient = Patient::new(
            name.to_string(),
            p.height_cm.unwrap_or(0.0),
            p.weight_kg.unwrap_or(0.0),
            p.age.unwrap_or(0.0),
            p.sex.unwrap_or_default(),
        );
        patient.creatinine = p.creatinine;
        patient.creatinine_unit = p.creatinine_unit.unwrap_or(self.default_unit);
        patient.bsa = Some(self.bsa());
        patient.ccr = Some(self.ccr());
        patient.last_cycle = Some(self.cycle);
        patient.last_regimen = self.regimen.as_ref().map(|r| r.id.clone());
        Ok(patient)
    }
}
