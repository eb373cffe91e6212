//! Chemo Dose Core Library
//!
//! Offline chemotherapy dose calculator: body surface area, creatinine
//! clearance, Calvert carboplatin dosing and a compiled regimen catalog, with
//! local persistence of patients, calculation history and settings.
//!
//! # Architecture
//!
//! ```text
//! Patient biometrics ──► Session ──► BSA / Ccr (derived on read)
//!                          │
//!                 Catalog ─┤ select regimen
//!                          │
//!                          ▼
//!                     calculate()
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!     Patient store    History store    Export (JSON / CSV)
//! ```
//!
//! # Core Principle
//!
//! **Calculated doses are advisory.** Every result is a suggestion for a
//! clinician to review; nothing here prescribes.
//!
//! # Modules
//!
//! - [`calculator`]: BSA, Ccr, dose formulas and renal classification
//! - [`catalog`]: Compiled regimens and reference data
//! - [`session`]: In-progress calculation state
//! - [`db`]: SQLite persistence for patients, history and settings
//! - [`settings`]: User preferences with a JSON mirror file
//! - [`export`]: History export
//! - [`format`]: Display helpers for numbers and dates

pub mod calculator;
pub mod catalog;
pub mod db;
pub mod export;
pub mod format;
pub mod models;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use calculator::{BsaFormula, CalculatorLimits, CreatinineUnit, RenalFunction, RenalLevel, Sex};
pub use catalog::Catalog;
pub use db::Database;
pub use models::{
    ComputedResult, Dosage, Drug, DrugDose, HistoryRecord, Patient, PatientBiometrics, Regimen,
};
pub use session::{Session, SessionError};
pub use settings::{AppSettings, SettingKey, SettingsStore, Theme};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

// =========================================================================
// Logging
// =========================================================================

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "chemo_dose_core=info";

/// Install the global tracing subscriber. Later calls are no-ops.
#[uniffi::export]
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Fails only when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ChemoDoseError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("{0}")]
    SessionError(String),

    #[error("Settings error: {0}")]
    SettingsError(String),
}

impl From<db::DbError> for ChemoDoseError {
    fn from(e: db::DbError) -> Self {
        ChemoDoseError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for ChemoDoseError {
    fn from(e: serde_json::Error) -> Self {
        ChemoDoseError::SerializationError(e.to_string())
    }
}

impl From<session::SessionError> for ChemoDoseError {
    fn from(e: session::SessionError) -> Self {
        match e {
            session::SessionError::UnknownRegimen(id) => {
                ChemoDoseError::NotFound(format!("regimen {}", id))
            }
            other => ChemoDoseError::SessionError(other.to_string()),
        }
    }
}

impl From<settings::SettingsError> for ChemoDoseError {
    fn from(e: settings::SettingsError) -> Self {
        match e {
            settings::SettingsError::Db(db) => db.into(),
            invalid @ (settings::SettingsError::UnknownKey(_)
            | settings::SettingsError::InvalidValue(_)
            | settings::SettingsError::Json(_)) => ChemoDoseError::InvalidInput(invalid.to_string()),
            other => ChemoDoseError::SettingsError(other.to_string()),
        }
    }
}

impl From<calculator::ParseEnumError> for ChemoDoseError {
    fn from(e: calculator::ParseEnumError) -> Self {
        ChemoDoseError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ChemoDoseError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ChemoDoseError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

/// Log a failed store operation before handing the error to the caller.
fn logged<T, E>(operation: &'static str, result: Result<T, E>) -> Result<T, ChemoDoseError>
where
    E: std::fmt::Display + Into<ChemoDoseError>,
{
    result.map_err(|e| {
        error!(operation, error = %e, "Store operation failed");
        e.into()
    })
}

// =========================================================================
// Calculator Functions (exported to FFI)
// =========================================================================

/// Body surface area in m². Returns 0 for non-positive height or weight.
#[uniffi::export]
pub fn calculate_bsa(
    height_cm: f64,
    weight_kg: f64,
    formula: String,
    sex: String,
) -> Result<f64, ChemoDoseError> {
    Ok(calculator::compute_body_surface_area(
        height_cm,
        weight_kg,
        formula.parse()?,
        sex.parse()?,
    ))
}

/// Cockcroft-Gault creatinine clearance in mL/min. Returns 0 for
/// non-positive inputs.
#[uniffi::export]
pub fn calculate_ccr(
    age: f64,
    weight_kg: f64,
    creatinine: f64,
    unit: String,
    sex: String,
) -> Result<f64, ChemoDoseError> {
    Ok(calculator::compute_creatinine_clearance(
        age,
        weight_kg,
        creatinine,
        unit.parse()?,
        sex.parse()?,
    ))
}

/// Dose in mg for a mg/m² rate.
#[uniffi::export]
pub fn calculate_dose_by_bsa(bsa: f64, mg_per_m2: f64) -> f64 {
    calculator::compute_dose_by_bsa(bsa, mg_per_m2)
}

/// Carboplatin dose in mg via the Calvert formula.
#[uniffi::export]
pub fn calculate_carboplatin_dose(target_auc: f64, ccr: f64) -> f64 {
    calculator::compute_carboplatin_dose(target_auc, ccr)
}

/// Renal function class for a creatinine clearance.
#[uniffi::export]
pub fn classify_renal(ccr: f64) -> FfiRenalFunction {
    calculator::classify_renal_function(ccr).into()
}

/// Whether a measurement value lies in its plausibility range.
#[uniffi::export]
pub fn is_measurement_plausible(measurement: String, value: f64) -> Result<bool, ChemoDoseError> {
    Ok(calculator::is_value_valid(measurement.parse()?, value))
}

/// Fixed-decimal number for display ("0" for NaN).
#[uniffi::export]
pub fn format_number(value: f64, decimals: u32) -> String {
    format::format_number(value, decimals as usize)
}

/// Relative date label for a stored timestamp.
#[uniffi::export]
pub fn format_relative_date(stamp: Option<String>) -> String {
    format::relative_date(stamp.as_deref(), chrono::Utc::now())
}

/// "YYYY-MM-DD HH:MM" for a stored timestamp.
#[uniffi::export]
pub fn format_date_time(stamp: String) -> String {
    format::date_time(&stamp)
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ChemoDoseCore>, ChemoDoseError> {
    let db = logged("open_database", Database::open(&path))?;
    Ok(Arc::new(ChemoDoseCore::new(db, SettingsStore::new())))
}

/// Open or create a database and mirror settings to a JSON file.
#[uniffi::export]
pub fn open_database_with_settings_mirror(
    path: String,
    mirror_path: String,
) -> Result<Arc<ChemoDoseCore>, ChemoDoseError> {
    let db = logged("open_database", Database::open(&path))?;
    Ok(Arc::new(ChemoDoseCore::new(
        db,
        SettingsStore::with_mirror(mirror_path),
    )))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ChemoDoseCore>, ChemoDoseError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ChemoDoseCore::new(db, SettingsStore::new())))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe calculator, store and session for FFI.
///
/// Locks are always taken in the order db, session, settings.
#[derive(uniffi::Object)]
pub struct ChemoDoseCore {
    db: Arc<Mutex<Database>>,
    session: Mutex<Session>,
    settings: Mutex<AppSettings>,
    settings_store: SettingsStore,
    catalog: Catalog,
}

impl ChemoDoseCore {
    fn new(db: Database, settings_store: SettingsStore) -> Self {
        let settings = settings_store.load(&db);
        let session = Session::new(settings.bsa_formula, settings.default_creatinine_unit);
        info!(formula = %settings.bsa_formula, "Core initialized");

        Self {
            db: Arc::new(Mutex::new(db)),
            session: Mutex::new(session),
            settings: Mutex::new(settings),
            settings_store,
            catalog: Catalog::builtin(),
        }
    }

    /// Persist `updated` and, on success, make it the live settings.
    fn commit_settings(
        &self,
        updated: AppSettings,
        key: Option<SettingKey>,
    ) -> Result<FfiSettings, ChemoDoseError> {
        let db = self.db.lock()?;
        let mut session = self.session.lock()?;
        let mut settings = self.settings.lock()?;

        let saved = match key {
            Some(key) => self.settings_store.save_one(&db, &updated, key),
            None => self.settings_store.save(&db, &updated),
        };
        logged("save_settings", saved)?;

        session.set_formula(updated.bsa_formula);
        session.set_default_unit(updated.default_creatinine_unit);
        *settings = updated;
        Ok(settings.clone().into())
    }
}

#[uniffi::export]
impl ChemoDoseCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// All cancer types.
    pub fn list_cancer_types(&self) -> Vec<FfiCancerType> {
        self.catalog
            .cancer_types()
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// Treatment scenarios with at least one regimen for a cancer type.
    pub fn list_scenarios(&self, cancer_type: String) -> Vec<FfiScenario> {
        self.catalog
            .scenarios_for_cancer(&cancer_type)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// Regimens, optionally filtered by cancer type and scenario.
    pub fn list_regimens(
        &self,
        cancer_type: Option<String>,
        scenario: Option<String>,
    ) -> Vec<FfiRegimen> {
        self.catalog
            .regimens()
            .iter()
            .filter(|r| cancer_type.as_deref().map_or(true, |c| r.cancer_type == c))
            .filter(|r| scenario.as_deref().map_or(true, |s| r.scenario == s))
            .map(FfiRegimen::from)
            .collect()
    }

    /// Get a regimen by ID.
    pub fn get_regimen(&self, id: String) -> Option<FfiRegimen> {
        self.catalog.regimen(&id).map(FfiRegimen::from)
    }

    pub fn list_adverse_reactions(&self) -> Vec<FfiAdverseReactionType> {
        self.catalog
            .adverse_reactions()
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    pub fn list_reaction_grades(&self) -> Vec<FfiReactionGrade> {
        self.catalog
            .reaction_grades()
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// Home care guidance for patients between cycles.
    pub fn home_care_guide(&self) -> Vec<FfiGuidanceItem> {
        self.catalog
            .home_care()
            .iter()
            .map(|item| FfiGuidanceItem {
                title: item.title.clone(),
                description: item.description.clone(),
            })
            .collect()
    }

    /// Symptoms that need immediate medical attention.
    pub fn red_flags(&self) -> Vec<FfiGuidanceItem> {
        self.catalog
            .red_flags()
            .iter()
            .map(|flag| FfiGuidanceItem {
                title: flag.text.clone(),
                description: flag.description.clone(),
            })
            .collect()
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Replace the session biometrics. Clears the current result.
    pub fn set_patient_input(&self, input: FfiPatientInput) -> Result<(), ChemoDoseError> {
        let biometrics = input.try_into()?;
        self.session.lock()?.set_patient(biometrics);
        Ok(())
    }

    pub fn get_patient_input(&self) -> Result<FfiPatientInput, ChemoDoseError> {
        Ok(self.session.lock()?.patient().clone().into())
    }

    /// Select a regimen by ID. Clears the current result.
    pub fn select_regimen(&self, regimen_id: String) -> Result<(), ChemoDoseError> {
        let regimen = self.catalog.regimen(&regimen_id).cloned().ok_or_else(|| {
            warn!(regimen_id = %regimen_id, "Unknown regimen selected");
            SessionError::UnknownRegimen(regimen_id.clone())
        })?;
        self.session.lock()?.select_regimen(regimen);
        Ok(())
    }

    pub fn selected_regimen(&self) -> Result<Option<FfiRegimen>, ChemoDoseError> {
        Ok(self.session.lock()?.regimen().map(FfiRegimen::from))
    }

    pub fn set_cycle(&self, cycle: u32) -> Result<(), ChemoDoseError> {
        self.session.lock()?.set_cycle(cycle);
        Ok(())
    }

    pub fn set_adverse_reactions(
        &self,
        reactions: HashMap<String, u8>,
    ) -> Result<(), ChemoDoseError> {
        self.session
            .lock()?
            .set_adverse_reactions(reactions.into_iter().collect());
        Ok(())
    }

    /// BSA for the session biometrics (0 when incomplete).
    pub fn session_bsa(&self) -> Result<f64, ChemoDoseError> {
        Ok(self.session.lock()?.bsa())
    }

    /// Ccr for the session biometrics (0 when incomplete).
    pub fn session_ccr(&self) -> Result<f64, ChemoDoseError> {
        Ok(self.session.lock()?.ccr())
    }

    /// Names of entered measurements outside their plausible range.
    pub fn biometric_warnings(&self) -> Result<Vec<String>, ChemoDoseError> {
        Ok(self
            .session
            .lock()?
            .biometric_warnings()
            .into_iter()
            .map(|m| m.as_str().to_string())
            .collect())
    }

    /// Calculate doses for the selected regimen. `None` when no regimen is
    /// selected or the BSA cannot be computed.
    pub fn calculate(&self) -> Result<Option<FfiComputedResult>, ChemoDoseError> {
        let mut session = self.session.lock()?;
        Ok(session.calculate().cloned().map(Into::into))
    }

    /// The last computed result, if still valid.
    pub fn current_result(&self) -> Result<Option<FfiComputedResult>, ChemoDoseError> {
        Ok(self.session.lock()?.result().cloned().map(Into::into))
    }

    /// Reset the session. Formula and default unit are kept.
    pub fn clear_session(&self) -> Result<(), ChemoDoseError> {
        self.session.lock()?.clear();
        Ok(())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Save the session biometrics as a new patient.
    pub fn save_patient_from_session(
        &self,
        name: Option<String>,
    ) -> Result<FfiPatient, ChemoDoseError> {
        let db = self.db.lock()?;
        let session = self.session.lock()?;
        let mut patient = session.patient_for_save(name.as_deref())?;
        logged("insert_patient", db.insert_patient(&mut patient))?;
        Ok(patient.into())
    }

    /// Update an existing patient. Returns whether a row changed.
    pub fn update_patient(&self, patient: FfiPatient) -> Result<bool, ChemoDoseError> {
        let mut patient: Patient = patient.try_into()?;
        let db = self.db.lock()?;
        logged("update_patient", db.update_patient(&mut patient))
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> Result<Option<FfiPatient>, ChemoDoseError> {
        let db = self.db.lock()?;
        let patient = logged("get_patient", db.get_patient(id))?;
        Ok(patient.map(Into::into))
    }

    /// All patients, newest first.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ChemoDoseError> {
        let db = self.db.lock()?;
        let patients = logged("list_patients", db.list_patients())?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Search patients by name prefix.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ChemoDoseError> {
        let db = self.db.lock()?;
        let patients = logged("search_patients", db.search_patients(&query, limit as usize))?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Delete a patient and its history.
    pub fn delete_patient(&self, id: i64) -> Result<bool, ChemoDoseError> {
        let db = self.db.lock()?;
        logged("delete_patient", db.delete_patient(id))
    }

    /// Load a saved patient into the session.
    pub fn load_patient_into_session(&self, id: i64) -> Result<FfiPatient, ChemoDoseError> {
        let db = self.db.lock()?;
        let patient = logged("get_patient", db.get_patient(id))?
            .ok_or_else(|| ChemoDoseError::NotFound(format!("patient {}", id)))?;
        self.session.lock()?.load_patient(&patient);
        Ok(patient.into())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    /// Record the current result in history.
    ///
    /// When `patient_id` names a saved patient, the patient's last cycle and
    /// regimen are updated as well.
    pub fn save_calculation(
        &self,
        patient_name: Option<String>,
        patient_id: Option<i64>,
    ) -> Result<FfiHistoryRecord, ChemoDoseError> {
        let db = self.db.lock()?;
        let session = self.session.lock()?;

        let mut record = session.history_record(patient_name.as_deref())?;
        record.patient_id = patient_id;
        logged("record_calculation", db.record_calculation(&mut record))?;
        Ok(record.into())
    }

    /// Most recent history records, newest first. `None` lists all.
    pub fn list_history(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<FfiHistoryRecord>, ChemoDoseError> {
        let db = self.db.lock()?;
        let records = logged(
            "list_history",
            db.list_history(limit.map(|l| l as usize)),
        )?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn history_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<FfiHistoryRecord>, ChemoDoseError> {
        let db = self.db.lock()?;
        let records = logged("history_for_patient", db.history_for_patient(patient_id))?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub fn get_history(&self, id: i64) -> Result<Option<FfiHistoryRecord>, ChemoDoseError> {
        let db = self.db.lock()?;
        let record = logged("get_history", db.get_history(id))?;
        Ok(record.map(Into::into))
    }

    pub fn delete_history(&self, id: i64) -> Result<bool, ChemoDoseError> {
        let db = self.db.lock()?;
        logged("delete_history", db.delete_history(id))
    }

    /// Delete all history. Returns the number of removed records.
    pub fn clear_history(&self) -> Result<u32, ChemoDoseError> {
        let db = self.db.lock()?;
        let removed = logged("clear_history", db.clear_history())?;
        Ok(removed as u32)
    }

    /// Distinct recent patient names from history.
    pub fn recent_patient_names(&self, limit: u32) -> Result<Vec<String>, ChemoDoseError> {
        let db = self.db.lock()?;
        logged("recent_patient_names", db.recent_patient_names(limit as usize))
    }

    // =========================================================================
    // Settings Operations
    // =========================================================================

    pub fn get_settings(&self) -> Result<FfiSettings, ChemoDoseError> {
        Ok(self.settings.lock()?.clone().into())
    }

    /// Replace all settings. On failure the live settings are unchanged.
    pub fn update_settings(&self, settings: FfiSettings) -> Result<FfiSettings, ChemoDoseError> {
        let updated: AppSettings = settings.try_into()?;
        self.commit_settings(updated, None)
    }

    /// Set one setting by key from its string value.
    pub fn set_setting(&self, key: String, value: String) -> Result<FfiSettings, ChemoDoseError> {
        let key: SettingKey = key.parse()?;
        let mut updated = self.settings.lock()?.clone();
        updated.apply_str(key, &value)?;
        self.commit_settings(updated, Some(key))
    }

    /// Flip light/dark theme and persist it.
    pub fn toggle_theme(&self) -> Result<FfiSettings, ChemoDoseError> {
        let mut updated = self.settings.lock()?.clone();
        updated.toggle_theme();
        self.commit_settings(updated, Some(SettingKey::Theme))
    }

    /// Clear stored settings and restore defaults.
    pub fn reset_settings(&self) -> Result<FfiSettings, ChemoDoseError> {
        let db = self.db.lock()?;
        let mut session = self.session.lock()?;
        let mut settings = self.settings.lock()?;

        let defaults = logged("reset_settings", self.settings_store.reset(&db))?;
        session.set_formula(defaults.bsa_formula);
        session.set_default_unit(defaults.default_creatinine_unit);
        *settings = defaults;
        Ok(settings.clone().into())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export recent history as JSON.
    pub fn export_history_json(&self, limit: Option<u32>) -> Result<String, ChemoDoseError> {
        let db = self.db.lock()?;
        let exporter = export::HistoryExporter::new(&db);
        let batch = logged("export_history", exporter.export_recent(limit.map(|l| l as usize)))?;
        Ok(batch.to_json()?)
    }

    /// Export recent history as CSV.
    pub fn export_history_csv(&self, limit: Option<u32>) -> Result<String, ChemoDoseError> {
        let db = self.db.lock()?;
        let exporter = export::HistoryExporter::new(&db);
        let batch = logged("export_history", exporter.export_recent(limit.map(|l| l as usize)))?;
        Ok(batch.to_csv())
    }

    /// Export one patient's history as JSON.
    pub fn export_patient_history_json(&self, patient_id: i64) -> Result<String, ChemoDoseError> {
        let db = self.db.lock()?;
        let exporter = export::HistoryExporter::new(&db);
        let batch = logged(
            "export_patient_history",
            exporter.export_for_patient(patient_id),
        )?;
        Ok(batch.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe cancer type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCancerType {
    pub id: String,
    pub name: String,
}

impl From<models::CancerType> for FfiCancerType {
    fn from(c: models::CancerType) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// FFI-safe treatment scenario.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScenario {
    pub id: String,
    pub name: String,
    pub order: u32,
}

impl From<models::TreatmentScenario> for FfiScenario {
    fn from(s: models::TreatmentScenario) -> Self {
        Self {
            id: s.id,
            name: s.name,
            order: s.order,
        }
    }
}

/// FFI-safe drug rule. `dosage_kind` is "per_body_surface" or "target_auc".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub name: String,
    pub abbreviation: String,
    pub dosage_kind: String,
    pub dosage_value: f64,
    pub dosage_unit: String,
    pub dosage_label: String,
    pub administration: String,
    pub method: String,
    pub day: String,
    pub max_dose_mg: Option<f64>,
    pub note: Option<String>,
}

impl From<&Drug> for FfiDrug {
    fn from(drug: &Drug) -> Self {
        Self {
            name: drug.name.clone(),
            abbreviation: drug.abbreviation.clone(),
            dosage_kind: dosage_kind(&drug.dosage).to_string(),
            dosage_value: drug.dosage.value(),
            dosage_unit: drug.dosage.unit_label().to_string(),
            dosage_label: drug.dosage.describe(),
            administration: drug.administration.clone(),
            method: drug.method.clone(),
            day: drug.day.clone(),
            max_dose_mg: drug.max_dose_mg,
            note: drug.note.clone(),
        }
    }
}

fn dosage_kind(dosage: &Dosage) -> &'static str {
    match dosage {
        Dosage::PerBodySurface { .. } => "per_body_surface",
        Dosage::TargetAuc { .. } => "target_auc",
    }
}

/// FFI-safe regimen warning.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRegimenWarning {
    pub severity: String,
    pub title: String,
    pub content: String,
}

/// FFI-safe regimen.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRegimen {
    pub id: String,
    pub name: String,
    pub cancer_type: String,
    pub scenario: String,
    pub description: String,
    pub cycle_days: u32,
    pub cycle_weeks: u32,
    pub recommended_cycles: Option<u32>,
    pub source: String,
    pub evidence_level: String,
    pub drugs: Vec<FfiDrug>,
    pub warnings: Vec<FfiRegimenWarning>,
    pub contraindications: Vec<String>,
    pub recommended: bool,
    pub uses_calvert: bool,
}

impl From<&Regimen> for FfiRegimen {
    fn from(r: &Regimen) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            cancer_type: r.cancer_type.clone(),
            scenario: r.scenario.clone(),
            description: r.description.clone(),
            cycle_days: r.cycle_days,
            cycle_weeks: r.cycle_weeks,
            recommended_cycles: r.recommended_cycles,
            source: r.source.clone(),
            evidence_level: r.evidence_level.clone(),
            drugs: r.drugs.iter().map(FfiDrug::from).collect(),
            warnings: r
                .warnings
                .iter()
                .map(|w| FfiRegimenWarning {
                    severity: w.severity.as_str().to_string(),
                    title: w.title.clone(),
                    content: w.content.clone(),
                })
                .collect(),
            contraindications: r.contraindications.clone(),
            recommended: r.recommended,
            uses_calvert: r.uses_calvert(),
        }
    }
}

/// FFI-safe adverse reaction type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdverseReactionType {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
}

impl From<models::AdverseReactionType> for FfiAdverseReactionType {
    fn from(r: models::AdverseReactionType) -> Self {
        Self {
            id: r.id,
            name: r.name,
            category: r.category.as_str().to_string(),
            description: r.description,
        }
    }
}

/// FFI-safe CTCAE grade.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReactionGrade {
    pub value: u8,
    pub label: String,
    pub description: Option<String>,
}

impl From<models::ReactionGrade> for FfiReactionGrade {
    fn from(g: models::ReactionGrade) -> Self {
        Self {
            value: g.value,
            label: g.label,
            description: g.description,
        }
    }
}

/// FFI-safe guidance entry (home care item or red flag).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGuidanceItem {
    pub title: String,
    pub description: String,
}

/// FFI-safe session biometrics. Empty fields are `None`.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientInput {
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub creatinine: Option<f64>,
    pub creatinine_unit: Option<String>,
}

impl TryFrom<FfiPatientInput> for PatientBiometrics {
    type Error = ChemoDoseError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        Ok(PatientBiometrics {
            name: input.name,
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            age: input.age,
            sex: input.sex.as_deref().map(str::parse::<Sex>).transpose()?,
            creatinine: input.creatinine,
            creatinine_unit: input
                .creatinine_unit
                .as_deref()
                .map(str::parse::<CreatinineUnit>)
                .transpose()?,
        })
    }
}

impl From<PatientBiometrics> for FfiPatientInput {
    fn from(p: PatientBiometrics) -> Self {
        Self {
            name: p.name,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            age: p.age,
            sex: p.sex.map(|s| s.as_str().to_string()),
            creatinine: p.creatinine,
            creatinine_unit: p.creatinine_unit.map(|u| u.as_str().to_string()),
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: Option<i64>,
    pub name: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: f64,
    pub sex: String,
    pub creatinine: Option<f64>,
    pub creatinine_unit: String,
    pub bsa: Option<f64>,
    pub ccr: Option<f64>,
    pub last_cycle: Option<u32>,
    pub last_regimen: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            name: p.name,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            age: p.age,
            sex: p.sex.as_str().to_string(),
            creatinine: p.creatinine,
            creatinine_unit: p.creatinine_unit.as_str().to_string(),
            bsa: p.bsa,
            ccr: p.ccr,
            last_cycle: p.last_cycle,
            last_regimen: p.last_regimen,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl TryFrom<FfiPatient> for Patient {
    type Error = ChemoDoseError;

    fn try_from(p: FfiPatient) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: p.id,
            name: p.name,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            age: p.age,
            sex: p.sex.parse()?,
            creatinine: p.creatinine,
            creatinine_unit: p.creatinine_unit.parse()?,
            bsa: p.bsa,
            ccr: p.ccr,
            last_cycle: p.last_cycle,
            last_regimen: p.last_regimen,
            notes: p.notes,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
    }
}

/// FFI-safe renal classification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRenalFunction {
    pub level: String,
    pub description: String,
    pub adjustment: String,
    pub review_recommended: bool,
}

impl From<RenalFunction> for FfiRenalFunction {
    fn from(r: RenalFunction) -> Self {
        Self {
            level: r.level.as_str().to_string(),
            description: r.description,
            adjustment: r.adjustment,
            review_recommended: r.review_recommended,
        }
    }
}

/// FFI-safe calculated dose.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugDose {
    pub name: String,
    pub abbreviation: String,
    pub dosage_label: String,
    pub dosage_unit: String,
    pub calculated_dose: f64,
    pub capped: bool,
    pub administration: String,
    pub day: String,
}

impl From<DrugDose> for FfiDrugDose {
    fn from(d: DrugDose) -> Self {
        Self {
            name: d.name,
            abbreviation: d.abbreviation,
            dosage_label: d.dosage.describe(),
            dosage_unit: d.dosage_unit,
            calculated_dose: d.calculated_dose,
            capped: d.capped,
            administration: d.administration,
            day: d.day,
        }
    }
}

/// FFI-safe calculation result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiComputedResult {
    pub bsa: f64,
    pub ccr: f64,
    pub renal_function: FfiRenalFunction,
    pub drugs: Vec<FfiDrugDose>,
}

impl From<ComputedResult> for FfiComputedResult {
    fn from(r: ComputedResult) -> Self {
        Self {
            bsa: r.bsa,
            ccr: r.ccr,
            renal_function: r.renal_function.into(),
            drugs: r.drugs.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe dose entry in a history record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseEntry {
    pub drug_name: String,
    pub calculated_dose: f64,
    pub dosage_unit: String,
}

/// FFI-safe history record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryRecord {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub regimen_id: String,
    pub regimen_name: String,
    pub cancer_type: String,
    pub cycle: u32,
    pub bsa: f64,
    pub ccr: f64,
    pub doses: Vec<FfiDoseEntry>,
    pub reactions: HashMap<String, u8>,
    pub worst_reaction_grade: Option<u8>,
    pub created_at: String,
}

impl From<HistoryRecord> for FfiHistoryRecord {
    fn from(r: HistoryRecord) -> Self {
        let worst_reaction_grade = r.worst_reaction_grade();
        Self {
            id: r.id,
            patient_id: r.patient_id,
            patient_name: r.patient_name,
            regimen_id: r.regimen_id,
            regimen_name: r.regimen_name,
            cancer_type: r.cancer_type,
            cycle: r.cycle,
            bsa: r.bsa,
            ccr: r.ccr,
            doses: r
                .doses
                .into_iter()
                .map(|d| FfiDoseEntry {
                    drug_name: d.drug_name,
                    calculated_dose: d.calculated_dose,
                    dosage_unit: d.dosage_unit,
                })
                .collect(),
            reactions: r.reactions.into_iter().collect(),
            worst_reaction_grade,
            created_at: r.created_at,
        }
    }
}

/// FFI-safe settings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSettings {
    pub bsa_formula: String,
    pub theme: String,
    pub language: String,
    pub default_creatinine_unit: String,
}

impl From<AppSettings> for FfiSettings {
    fn from(s: AppSettings) -> Self {
        Self {
            bsa_formula: s.bsa_formula.as_str().to_string(),
            theme: s.theme.as_str().to_string(),
            language: s.language,
            default_creatinine_unit: s.default_creatinine_unit.as_str().to_string(),
        }
    }
}

impl TryFrom<FfiSettings> for AppSettings {
    type Error = ChemoDoseError;

    fn try_from(s: FfiSettings) -> Result<Self, Self::Error> {
        Ok(AppSettings {
            bsa_formula: s.bsa_formula.parse()?,
            theme: s.theme.parse()?,
            language: s.language,
            default_creatinine_unit: s.default_creatinine_unit.parse()?,
        })
    }
}
