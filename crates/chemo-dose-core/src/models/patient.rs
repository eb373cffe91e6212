//! Patient models.

use serde::{Deserialize, Serialize};

use crate::calculator::{is_value_valid, CreatinineUnit, Measurement, Sex};

/// Biometrics entered for the current session. Fields stay `None` until the
/// user fills them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientBiometrics {
    pub name: Option<String>,
    /// Height in cm
    pub height_cm: Option<f64>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Age in years
    pub age: Option<f64>,
    pub sex: Option<Sex>,
    /// Serum creatinine, in `creatinine_unit`
    pub creatinine: Option<f64>,
    pub creatinine_unit: Option<CreatinineUnit>,
}

impl PatientBiometrics {
    /// True when height, weight, age and sex are all present and non-zero.
    pub fn is_complete(&self) -> bool {
        self.height_cm.is_some_and(|v| v != 0.0)
            && self.weight_kg.is_some_and(|v| v != 0.0)
            && self.age.is_some_and(|v| v != 0.0)
            && self.sex.is_some()
    }

    /// Measurements that are present but outside their plausibility range.
    pub fn out_of_range(&self) -> Vec<Measurement> {
        let values = [
            (Measurement::Height, self.height_cm),
            (Measurement::Weight, self.weight_kg),
            (Measurement::Age, self.age),
            (Measurement::Creatinine, self.creatinine_umol()),
        ];
        values
            .into_iter()
            .filter_map(|(m, v)| v.filter(|v| !is_value_valid(m, *v)).map(|_| m))
            .collect()
    }

    /// Creatinine expressed in µmol/L, the unit the plausibility range uses.
    fn creatinine_umol(&self) -> Option<f64> {
        let value = self.creatinine?;
        Some(match self.creatinine_unit.unwrap_or_default() {
            CreatinineUnit::Umol => value,
            CreatinineUnit::Mg => value * crate::calculator::CREATININE_UMOL_PER_MG_DL,
        })
    }
}

/// A persisted patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Autogenerated row ID - `None` until inserted
    pub id: Option<i64>,
    pub name: String,
    /// Height in cm
    pub height_cm: f64,
    /// Weight in kg
    pub weight_kg: f64,
    /// Age in years
    pub age: f64,
    pub sex: Sex,
    pub creatinine: Option<f64>,
    pub creatinine_unit: CreatinineUnit,
    /// BSA at save time (m²)
    pub bsa: Option<f64>,
    /// Ccr at save time (mL/min)
    pub ccr: Option<f64>,
    /// Last treatment cycle calculated for this patient
    pub last_cycle: Option<u32>,
    /// Last regimen ID used for this patient
    pub last_regimen: Option<String>,
    pub notes: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl Patient {
    /// Create a new, unsaved patient with required fields.
    pub fn new(name: String, height_cm: f64, weight_kg: f64, age: f64, sex: Sex) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            name,
            height_cm,
            weight_kg,
            age,
            sex,
            creatinine: None,
            creatinine_unit: CreatinineUnit::default(),
            bsa: None,
            ccr: None,
            last_cycle: None,
            last_regimen: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check if this patient has been written to the store.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Session biometrics for this patient.
    pub fn biometrics(&self) -> PatientBiometrics {
        PatientBiometrics {
            name: Some(self.name.clone()),
            height_cm: Some(self.height_cm),
            weight_kg: Some(self.weight_kg),
            age: Some(self.age),
            sex: Some(self.sex),
            creatinine: self.creatinine,
            creatinine_unit: Some(self.creatinine_unit),
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Li Wei".into(), 170.0, 70.0, 60.0, Sex::Male);
        assert_eq!(patient.name, "Li Wei");
        assert!(!patient.is_saved());
        assert_eq!(patient.created_at, patient.updated_at);
        assert_eq!(patient.creatinine_unit, CreatinineUnit::Umol);
    }

    #[test]
    fn test_biometrics_complete() {
        let patient = Patient::new("Li Wei".into(), 170.0, 70.0, 60.0, Sex::Male);
        assert!(patient.biometrics().is_complete());

        let mut partial = patient.biometrics();
        partial.sex = None;
        assert!(!partial.is_complete());

        let mut zero_age = patient.biometrics();
        zero_age.age = Some(0.0);
        assert!(!zero_age.is_complete());
    }

    #[test]
    fn test_out_of_range() {
        let bio = PatientBiometrics {
            height_cm: Some(20.0),
            weight_kg: Some(70.0),
            creatinine: Some(30.0),
            creatinine_unit: Some(CreatinineUnit::Mg),
            ..Default::default()
        };
        // 30 mg/dL = 2652 µmol/L, above the plausible maximum
        assert_eq!(bio.out_of_range(), vec![Measurement::Height, Measurement::Creatinine]);
    }
}
