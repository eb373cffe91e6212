//! History export for record keeping and review.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Database, DbResult};
use crate::models::HistoryRecord;

const CSV_HEADER: &str = "history_id,created_at,patient_name,regimen_id,regimen_name,cancer_type,cycle,bsa,ccr,drug_name,calculated_dose,dosage_unit,worst_reaction_grade\n";

/// Batch history export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    /// Export timestamp
    pub exported_at: String,
    /// Exported records, newest first
    pub records: Vec<HistoryRecord>,
    /// Total calculated dose count across records
    pub total_doses: usize,
}

impl HistoryExport {
    /// Build an export from already loaded records.
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        let total_doses = records.iter().map(|r| r.doses.len()).sum();
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            records,
            total_doses,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one line per calculated dose.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);

        for record in &self.records {
            let id = record.id.map(|id| id.to_string()).unwrap_or_default();
            let worst = record
                .worst_reaction_grade()
                .map(|g| g.to_string())
                .unwrap_or_default();

            for dose in &record.doses {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                    id,
                    escape_csv(&record.created_at),
                    escape_csv(&record.patient_name),
                    escape_csv(&record.regimen_id),
                    escape_csv(&record.regimen_name),
                    escape_csv(&record.cancer_type),
                    record.cycle,
                    record.bsa,
                    record.ccr,
                    escape_csv(&dose.drug_name),
                    dose.calculated_dose,
                    escape_csv(&dose.dosage_unit),
                    worst,
                ));
            }
        }

        csv
    }
}

/// History exporter.
pub struct HistoryExporter<'a> {
    db: &'a Database,
}

impl<'a> HistoryExporter<'a> {
    /// Create a new history exporter.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Export the most recent `limit` records, or all of them for `None`.
    pub fn export_recent(&self, limit: Option<usize>) -> DbResult<HistoryExport> {
        let export = HistoryExport::from_records(self.db.list_history(limit)?);
        info!(records = export.records.len(), "Exported history");
        Ok(export)
    }

    /// Export every record for a patient.
    pub fn export_for_patient(&self, patient_id: i64) -> DbResult<HistoryExport> {
        let export = HistoryExport::from_records(self.db.history_for_patient(patient_id)?);
        info!(patient_id, records = export.records.len(), "Exported patient history");
        Ok(export)
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdverseReactions, DoseEntry};

    fn make_record(patient_name: &str) -> HistoryRecord {
        HistoryRecord {
            id: None,
            patient_id: None,
            patient_name: patient_name.to_string(),
            regimen_id: "mfolfox6_adjuvant".to_string(),
            regimen_name: "mFOLFOX6".to_string(),
            cancer_type: "colorectal".to_string(),
            cycle: 2,
            bsa: 1.82,
            ccr: 77.8,
            doses: vec![
                DoseEntry {
                    drug_name: "Oxaliplatin".to_string(),
                    calculated_dose: 155.0,
                    dosage_unit: "mg/m²".to_string(),
                },
                DoseEntry {
                    drug_name: "Leucovorin".to_string(),
                    calculated_dose: 728.0,
                    dosage_unit: "mg/m²".to_string(),
                },
            ],
            reactions: AdverseReactions::from([("neurotoxicity".to_string(), 1)]),
            created_at: "2024-01-15T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_from_records_counts_doses() {
        let export = HistoryExport::from_records(vec![make_record("A"), make_record("B")]);
        assert_eq!(export.records.len(), 2);
        assert_eq!(export.total_doses, 4);
    }

    #[test]
    fn test_history_export_json() {
        let export = HistoryExport::from_records(vec![make_record("Li Wei")]);
        let json = export.to_json().unwrap();
        assert!(json.contains("Oxaliplatin"));
        assert!(json.contains("\"total_doses\": 2"));
    }

    #[test]
    fn test_history_export_csv() {
        let export = HistoryExport::from_records(vec![make_record("Li Wei")]);
        let csv = export.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 doses
        assert!(lines[0].starts_with("history_id,"));
        assert!(lines[1].contains("Oxaliplatin,155,mg/m²,1"));
        assert!(lines[2].contains("Leucovorin,728"));
    }

    #[test]
    fn test_csv_quotes_names() {
        let export = HistoryExport::from_records(vec![make_record("Wang, \"Xiao\" Ming")]);
        let csv = export.to_csv();
        assert!(csv.contains("\"Wang, \"\"Xiao\"\" Ming\""));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_exporter_reads_store() {
        let db = Database::open_in_memory().unwrap();
        db.insert_history(&mut make_record("A")).unwrap();
        let mut linked = make_record("B");
        linked.patient_id = Some(7);
        db.insert_history(&mut linked).unwrap();

        let exporter = HistoryExporter::new(&db);
        assert_eq!(exporter.export_recent(Some(10)).unwrap().records.len(), 2);
        assert_eq!(exporter.export_recent(Some(1)).unwrap().records.len(), 1);
        assert_eq!(exporter.export_recent(None).unwrap().total_doses, 4);

        let for_patient = exporter.export_for_patient(7).unwrap();
        assert_eq!(for_patient.records.len(), 1);
        assert_eq!(for_patient.records[0].patient_name, "B");
    }
}
