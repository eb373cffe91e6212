//! Persistence integration tests: patients, history cascade and settings.

use chemo_dose_core::db::Database;
use chemo_dose_core::models::{AdverseReactions, DoseEntry, HistoryRecord, Patient};
use chemo_dose_core::settings::{AppSettings, SettingKey, SettingsStore, Theme};
use chemo_dose_core::{BsaFormula, CreatinineUnit, Sex};

fn make_patient(name: &str) -> Patient {
    let mut patient = Patient::new(name.to_string(), 168.0, 62.0, 58.0, Sex::Female);
    patient.creatinine = Some(70.0);
    patient
}

fn make_record(patient_id: Option<i64>, patient_name: &str, cycle: u32) -> HistoryRecord {
    HistoryRecord {
        id: None,
        patient_id,
        patient_name: patient_name.to_string(),
        regimen_id: "folfiri".to_string(),
        regimen_name: "FOLFIRI".to_string(),
        cancer_type: "colorectal".to_string(),
        cycle,
        bsa: 1.7,
        ccr: 80.0,
        doses: vec![DoseEntry {
            drug_name: "Irinotecan".to_string(),
            calculated_dose: 306.0,
            dosage_unit: "mg/m²".to_string(),
        }],
        reactions: AdverseReactions::new(),
        created_at: String::new(),
    }
}

#[test]
fn test_delete_patient_removes_exactly_its_history() {
    let db = Database::open_in_memory().unwrap();

    let mut ids = Vec::new();
    for name in ["Alpha", "Bravo", "Charlie"] {
        let id = db.insert_patient(&mut make_patient(name)).unwrap();
        for cycle in 1..=3 {
            db.insert_history(&mut make_record(Some(id), name, cycle))
                .unwrap();
        }
        ids.push(id);
    }
    db.insert_history(&mut make_record(None, "Walk-in", 1)).unwrap();
    assert_eq!(db.list_history(None).unwrap().len(), 10);

    assert!(db.delete_patient(ids[1]).unwrap());

    let remaining = db.list_history(None).unwrap();
    assert_eq!(remaining.len(), 7);
    assert!(remaining.iter().all(|r| r.patient_id != Some(ids[1])));
    assert_eq!(db.history_for_patient(ids[0]).unwrap().len(), 3);
    assert_eq!(db.history_for_patient(ids[2]).unwrap().len(), 3);
    assert!(db.get_patient(ids[1]).unwrap().is_none());
    assert_eq!(db.list_patients().unwrap().len(), 2);
}

#[test]
fn test_history_for_patient_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let id = db.insert_patient(&mut make_patient("Alpha")).unwrap();

    for cycle in 1..=4 {
        db.insert_history(&mut make_record(Some(id), "Alpha", cycle))
            .unwrap();
    }

    let cycles: Vec<u32> = db
        .history_for_patient(id)
        .unwrap()
        .iter()
        .map(|r| r.cycle)
        .collect();
    assert_eq!(cycles, vec![4, 3, 2, 1]);
}

#[test]
fn test_read_after_write() {
    let db = Database::open_in_memory().unwrap();
    let mut patient = make_patient("Alpha");
    let id = db.insert_patient(&mut patient).unwrap();

    patient.weight_kg = 60.0;
    patient.creatinine_unit = CreatinineUnit::Mg;
    patient.creatinine = Some(0.9);
    db.update_patient(&mut patient).unwrap();

    let stored = db.get_patient(id).unwrap().unwrap();
    assert_eq!(stored.weight_kg, 60.0);
    assert_eq!(stored.creatinine_unit, CreatinineUnit::Mg);
    assert_eq!(stored.creatinine, Some(0.9));
}

#[test]
fn test_on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chemo.db");

    let patient_id = {
        let db = Database::open(&path).unwrap();
        let id = db.insert_patient(&mut make_patient("Alpha")).unwrap();
        db.insert_history(&mut make_record(Some(id), "Alpha", 1))
            .unwrap();
        id
    };

    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_patient(patient_id).unwrap().unwrap().name, "Alpha");
    assert_eq!(db.history_for_patient(patient_id).unwrap().len(), 1);
    assert_eq!(db.recent_patient_names(5).unwrap(), vec!["Alpha"]);
}

#[test]
fn test_settings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("chemo.db");
    let mirror = dir.path().join("settings.json");
    let store = SettingsStore::with_mirror(&mirror);

    {
        let db = Database::open(&db_path).unwrap();
        let mut settings = store.load(&db);
        settings.bsa_formula = BsaFormula::XuWensheng;
        store.save_one(&db, &settings, SettingKey::BsaFormula).unwrap();
        settings.toggle_theme();
        store.save_one(&db, &settings, SettingKey::Theme).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let settings = store.load(&db);
    assert_eq!(settings.bsa_formula, BsaFormula::XuWensheng);
    assert_eq!(settings.theme, Theme::Dark);
    assert!(mirror.exists());
}

#[test]
fn test_settings_mirror_used_when_store_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = dir.path().join("settings.json");
    let store = SettingsStore::with_mirror(&mirror);

    let db = Database::open_in_memory().unwrap();
    let mut settings = AppSettings::default();
    settings.default_creatinine_unit = CreatinineUnit::Mg;
    store.save(&db, &settings).unwrap();

    db.conn().execute("DROP TABLE settings", []).unwrap();
    assert_eq!(store.load(&db), settings);
}
