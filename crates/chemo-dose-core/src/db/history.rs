//! Calculation history database operations.

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{now_timestamp, Database, DbError, DbResult};
use crate::models::{AdverseReactions, DoseEntry, HistoryRecord};

const HISTORY_COLUMNS: &str = r#"
    id, patient_id, patient_name, regimen_id, regimen_name, cancer_type,
    cycle, bsa, ccr, doses, reactions, created_at
"#;

impl Database {
    /// Insert a history record. Stamps `created_at`, assigns the generated ID
    /// to `record` and returns it.
    pub fn insert_history(&self, record: &mut HistoryRecord) -> DbResult<i64> {
        let now = now_timestamp();
        let doses_json = serde_json::to_string(&record.doses)?;
        let reactions_json = serde_json::to_string(&record.reactions)?;

        self.conn.execute(
            r#"
            INSERT INTO history (
                patient_id, patient_name, regimen_id, regimen_name, cancer_type,
                cycle, bsa, ccr, doses, reactions, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.patient_id,
                record.patient_name,
                record.regimen_id,
                record.regimen_name,
                record.cancer_type,
                record.cycle,
                record.bsa,
                record.ccr,
                doses_json,
                reactions_json,
                now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        record.id = Some(id);
        record.created_at = now;
        info!(
            history_id = id,
            patient_id = ?record.patient_id,
            regimen_id = %record.regimen_id,
            "Inserted history record"
        );
        Ok(id)
    }

    /// Insert a history record and, when it names a patient, stamp that
    /// patient's last cycle and regimen. Both writes commit or neither does.
    pub fn record_calculation(&self, record: &mut HistoryRecord) -> DbResult<i64> {
        let created_at = record.created_at.clone();
        let tx = self.conn.unchecked_transaction()?;

        let written = self.insert_history(record).and_then(|id| {
            if let Some(patient_id) = record.patient_id {
                tx.execute(
                    r#"
                    UPDATE patients SET
                        last_cycle = ?2,
                        last_regimen = ?3,
                        updated_at = ?4
                    WHERE id = ?1
                    "#,
                    params![patient_id, record.cycle, record.regimen_id, record.created_at],
                )?;
            }
            tx.commit()?;
            Ok(id)
        });

        if written.is_err() {
            record.id = None;
            record.created_at = created_at;
        }
        written
    }

    /// Get a history record by ID.
    pub fn get_history(&self, id: i64) -> DbResult<Option<HistoryRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE id = ?"),
                [id],
                HistoryRow::from_row,
            )
            .optional()?;

        row.map(HistoryRecord::try_from).transpose()
    }

    /// List history records, newest first. `None` returns every record.
    pub fn list_history(&self, limit: Option<usize>) -> DbResult<Vec<HistoryRecord>> {
        let mut sql = format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM history
            ORDER BY created_at DESC, id DESC
            "#
        );
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match limit {
            Some(limit) => stmt.query_map([limit as i64], HistoryRow::from_row)?,
            None => stmt.query_map([], HistoryRow::from_row)?,
        };
        rows.map(|r| r.map_err(DbError::from).and_then(HistoryRecord::try_from))
            .collect()
    }

    /// All history records for a patient, newest first.
    pub fn history_for_patient(&self, patient_id: i64) -> DbResult<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM history
            WHERE patient_id = ?
            ORDER BY created_at DESC, id DESC
            "#
        ))?;

        let rows = stmt.query_map([patient_id], HistoryRow::from_row)?;
        rows.map(|r| r.map_err(DbError::from).and_then(HistoryRecord::try_from))
            .collect()
    }

    /// Delete a single history record.
    pub fn delete_history(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM history WHERE id = ?", [id])?;
        if rows_affected > 0 {
            info!(history_id = id, "Deleted history record");
        }
        Ok(rows_affected > 0)
    }

    /// Delete all history. Returns the number of removed records.
    pub fn clear_history(&self) -> DbResult<usize> {
        let removed = self.conn.execute("DELETE FROM history", [])?;
        info!(removed, "Cleared history");
        Ok(removed)
    }

    /// Distinct patient names from history, most recently used first.
    pub fn recent_patient_names(&self, limit: usize) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT patient_name
            FROM history
            GROUP BY patient_name
            ORDER BY MAX(created_at) DESC, MAX(id) DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// Raw row from the history table.
struct HistoryRow {
    id: i64,
    patient_id: Option<i64>,
    patient_name: String,
    regimen_id: String,
    regimen_name: String,
    cancer_type: String,
    cycle: u32,
    bsa: f64,
    ccr: f64,
    doses: String,
    reactions: String,
    created_at: String,
}

impl HistoryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            patient_name: row.get(2)?,
            regimen_id: row.get(3)?,
            regimen_name: row.get(4)?,
            cancer_type: row.get(5)?,
            cycle: row.get(6)?,
            bsa: row.get(7)?,
            ccr: row.get(8)?,
            doses: row.get(9)?,
            reactions: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let doses: Vec<DoseEntry> = serde_json::from_str(&row.doses)?;
        let reactions: AdverseReactions = serde_json::from_str(&row.reactions)?;

        Ok(HistoryRecord {
            id: Some(row.id),
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            regimen_id: row.regimen_id,
            regimen_name: row.regimen_name,
            cancer_type: row.cancer_type,
            cycle: row.cycle,
            bsa: row.bsa,
            ccr: row.ccr,
            doses,
            reactions,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Sex;
    use crate::models::Patient;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn record(patient_id: Option<i64>, patient_name: &str) -> HistoryRecord {
        HistoryRecord {
            id: None,
            patient_id,
            patient_name: patient_name.into(),
            regimen_id: "pp_carboplatin".into(),
            regimen_name: "PP (carboplatin)".into(),
            cancer_type: "lung".into(),
            cycle: 1,
            bsa: 1.82,
            ccr: 77.8,
            doses: vec![
                DoseEntry {
                    drug_name: "Pemetrexed".into(),
                    calculated_dose: 910.0,
                    dosage_unit: "mg/m²".into(),
                },
                DoseEntry {
                    drug_name: "Carboplatin".into(),
                    calculated_dose: 514.0,
                    dosage_unit: "Calvert".into(),
                },
            ],
            reactions: AdverseReactions::from([("nausea_vomiting".to_string(), 2)]),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let mut rec = record(None, "Li Wei");

        let id = db.insert_history(&mut rec).unwrap();
        assert_eq!(rec.id, Some(id));
        assert!(!rec.created_at.is_empty());

        let retrieved = db.get_history(id).unwrap().unwrap();
        assert_eq!(retrieved, rec);
        assert_eq!(retrieved.doses[1].calculated_dose, 514.0);
        assert_eq!(retrieved.reactions["nausea_vomiting"], 2);
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let db = setup_db();
        let a = db.insert_history(&mut record(None, "A")).unwrap();
        let b = db.insert_history(&mut record(None, "B")).unwrap();
        let c = db.insert_history(&mut record(None, "C")).unwrap();

        let ids: Vec<_> = db
            .list_history(Some(10))
            .unwrap()
            .into_iter()
            .filter_map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![c, b, a]);

        assert_eq!(db.list_history(Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_list_without_limit() {
        let db = setup_db();
        for _ in 0..120 {
            db.insert_history(&mut record(None, "A")).unwrap();
        }
        assert_eq!(db.list_history(None).unwrap().len(), 120);
        assert_eq!(db.list_history(Some(0)).unwrap().len(), 0);
    }

    #[test]
    fn test_record_calculation_updates_patient() {
        let db = setup_db();
        let mut patient = Patient::new("Li Wei".into(), 170.0, 70.0, 60.0, Sex::Male);
        let pid = db.insert_patient(&mut patient).unwrap();

        let mut rec = record(Some(pid), "Li Wei");
        rec.cycle = 4;
        let id = db.record_calculation(&mut rec).unwrap();
        assert_eq!(rec.id, Some(id));

        let stored = db.get_patient(pid).unwrap().unwrap();
        assert_eq!(stored.last_cycle, Some(4));
        assert_eq!(stored.last_regimen.as_deref(), Some("pp_carboplatin"));
        assert_eq!(stored.updated_at, rec.created_at);
    }

    #[test]
    fn test_record_calculation_rolls_back_on_patient_failure() {
        let db = setup_db();
        let mut patient = Patient::new("Li Wei".into(), 170.0, 70.0, 60.0, Sex::Male);
        let pid = db.insert_patient(&mut patient).unwrap();
        db.conn()
            .execute_batch(
                r#"
                CREATE TRIGGER patients_locked BEFORE UPDATE ON patients
                BEGIN SELECT RAISE(ABORT, 'patients locked'); END;
                "#,
            )
            .unwrap();

        let mut rec = record(Some(pid), "Li Wei");
        assert!(db.record_calculation(&mut rec).is_err());
        assert_eq!(rec.id, None);
        assert!(rec.created_at.is_empty());
        assert!(db.list_history(None).unwrap().is_empty());

        // Retrying once the store accepts writes leaves a single row
        db.conn().execute_batch("DROP TRIGGER patients_locked").unwrap();
        db.record_calculation(&mut rec).unwrap();
        assert_eq!(db.list_history(None).unwrap().len(), 1);
    }

    #[test]
    fn test_history_for_patient() {
        let db = setup_db();
        let mut patient = Patient::new("Li Wei".into(), 170.0, 70.0, 60.0, Sex::Male);
        let pid = db.insert_patient(&mut patient).unwrap();

        db.insert_history(&mut record(Some(pid), "Li Wei")).unwrap();
        db.insert_history(&mut record(Some(pid), "Li Wei")).unwrap();
        db.insert_history(&mut record(None, "Walk-in")).unwrap();

        let records = db.history_for_patient(pid).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.patient_id == Some(pid)));
    }

    #[test]
    fn test_delete_and_clear() {
        let db = setup_db();
        let a = db.insert_history(&mut record(None, "A")).unwrap();
        db.insert_history(&mut record(None, "B")).unwrap();

        assert!(db.delete_history(a).unwrap());
        assert!(!db.delete_history(a).unwrap());
        assert_eq!(db.list_history(Some(10)).unwrap().len(), 1);

        assert_eq!(db.clear_history().unwrap(), 1);
        assert!(db.list_history(Some(10)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_patient_cascades() {
        let db = setup_db();
        let mut keep = Patient::new("Keep".into(), 160.0, 55.0, 50.0, Sex::Female);
        let mut gone = Patient::new("Drop".into(), 170.0, 70.0, 60.0, Sex::Male);
        let keep_id = db.insert_patient(&mut keep).unwrap();
        let gone_id = db.insert_patient(&mut gone).unwrap();

        db.insert_history(&mut record(Some(keep_id), "Keep")).unwrap();
        db.insert_history(&mut record(Some(gone_id), "Drop")).unwrap();
        db.insert_history(&mut record(Some(gone_id), "Drop")).unwrap();
        db.insert_history(&mut record(None, "Drop")).unwrap();

        assert!(db.delete_patient(gone_id).unwrap());

        assert!(db.history_for_patient(gone_id).unwrap().is_empty());
        assert_eq!(db.history_for_patient(keep_id).unwrap().len(), 1);
        // Unlinked rows with the same name survive
        assert_eq!(db.list_history(Some(10)).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_patient_names() {
        let db = setup_db();
        db.insert_history(&mut record(None, "A")).unwrap();
        db.insert_history(&mut record(None, "B")).unwrap();
        db.insert_history(&mut record(None, "A")).unwrap();
        db.insert_history(&mut record(None, "C")).unwrap();

        assert_eq!(db.recent_patient_names(10).unwrap(), vec!["C", "A", "B"]);
        assert_eq!(db.recent_patient_names(2).unwrap(), vec!["C", "A"]);
    }

    #[test]
    fn test_corrupt_json_is_error() {
        let db = setup_db();
        let id = db.insert_history(&mut record(None, "A")).unwrap();
        db.conn()
            .execute("UPDATE history SET doses = 'not json' WHERE id = ?", [id])
            .unwrap();

        assert!(matches!(db.get_history(id), Err(DbError::Json(_))));
    }
}
