//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{now_timestamp, Database, DbError, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = r#"
    id, name, height_cm, weight_kg, age, sex, creatinine, creatinine_unit,
    bsa, ccr, last_cycle, last_regimen, notes, created_at, updated_at
"#;

impl Database {
    /// Insert a new patient. Stamps `created_at`/`updated_at`, assigns the
    /// generated ID to `patient` and returns it.
    pub fn insert_patient(&self, patient: &mut Patient) -> DbResult<i64> {
        let now = now_timestamp();
        self.conn.execute(
            r#"
            INSERT INTO patients (
                name, height_cm, weight_kg, age, sex, creatinine, creatinine_unit,
                bsa, ccr, last_cycle, last_regimen, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            "#,
            params![
                patient.name,
                patient.height_cm,
                patient.weight_kg,
                patient.age,
                patient.sex.as_str(),
                patient.creatinine,
                patient.creatinine_unit.as_str(),
                patient.bsa,
                patient.ccr,
                patient.last_cycle,
                patient.last_regimen,
                patient.notes,
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        patient.id = Some(id);
        patient.created_at = now.clone();
        patient.updated_at = now;
        info!(patient_id = id, "Inserted patient");
        Ok(id)
    }

    /// Update an existing patient. Returns whether a row changed.
    pub fn update_patient(&self, patient: &mut Patient) -> DbResult<bool> {
        let id = patient
            .id
            .ok_or_else(|| DbError::Constraint("cannot update a patient without an id".into()))?;
        let now = now_timestamp();

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                height_cm = ?3,
                weight_kg = ?4,
                age = ?5,
                sex = ?6,
                creatinine = ?7,
                creatinine_unit = ?8,
                bsa = ?9,
                ccr = ?10,
                last_cycle = ?11,
                last_regimen = ?12,
                notes = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
            params![
                id,
                patient.name,
                patient.height_cm,
                patient.weight_kg,
                patient.age,
                patient.sex.as_str(),
                patient.creatinine,
                patient.creatinine_unit.as_str(),
                patient.bsa,
                patient.ccr,
                patient.last_cycle,
                patient.last_regimen,
                patient.notes,
                now,
            ],
        )?;

        if rows_affected > 0 {
            patient.updated_at = now;
            info!(patient_id = id, "Updated patient");
        }
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                PatientRow::from_row,
            )
            .optional()?;

        row.map(Patient::try_from).transpose()
    }

    /// List all patients, newest first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map([], PatientRow::from_row)?;
        rows.map(|r| r.map_err(DbError::from).and_then(Patient::try_from))
            .collect()
    }

    /// Search patients by name (prefix match), newest first.
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", escape_like(query));
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], PatientRow::from_row)?;
        rows.map(|r| r.map_err(DbError::from).and_then(Patient::try_from))
            .collect()
    }

    /// Delete a patient together with every history record that references it.
    ///
    /// Both deletes run in one transaction: either the patient and all of its
    /// history are gone, or nothing changed.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let history_removed = tx.execute("DELETE FROM history WHERE patient_id = ?", [id])?;
        let rows_affected = tx.execute("DELETE FROM patients WHERE id = ?", [id])?;
        tx.commit()?;

        info!(patient_id = id, history_removed, "Deleted patient");
        Ok(rows_affected > 0)
    }
}

/// Escape `%`, `_` and `\` for a LIKE pattern using `\` as the escape char.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Raw row from the patients table.
struct PatientRow {
    id: i64,
    name: String,
    height_cm: f64,
    weight_kg: f64,
    age: f64,
    sex: String,
    creatinine: Option<f64>,
    creatinine_unit: String,
    bsa: Option<f64>,
    ccr: Option<f64>,
    last_cycle: Option<u32>,
    last_regimen: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            height_cm: row.get(2)?,
            weight_kg: row.get(3)?,
            age: row.get(4)?,
            sex: row.get(5)?,
            creatinine: row.get(6)?,
            creatinine_unit: row.get(7)?,
            bsa: row.get(8)?,
            ccr: row.get(9)?,
            last_cycle: row.get(10)?,
            last_regimen: row.get(11)?,
            notes: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let sex = row
            .sex
            .parse()
            .map_err(|e| DbError::Constraint(format!("patient {}: {}", row.id, e)))?;
        let creatinine_unit = row
            .creatinine_unit
            .parse()
            .map_err(|e| DbError::Constraint(format!("patient {}: {}", row.id, e)))?;

        Ok(Patient {
            id: Some(row.id),
            name: row.name,
            height_cm: row.height_cm,
            weight_kg: row.weight_kg,
            age: row.age,
            sex,
            creatinine: row.creatinine,
            creatinine_unit,
            bsa: row.bsa,
            ccr: row.ccr,
            last_cycle: row.last_cycle,
            last_regimen: row.last_regimen,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
