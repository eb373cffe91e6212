//! SQLite schema definition.

/// Complete database schema for the dose calculator.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    height_cm REAL NOT NULL,
    weight_kg REAL NOT NULL,
    age REAL NOT NULL,
    sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
    creatinine REAL,
    creatinine_unit TEXT NOT NULL DEFAULT 'umol' CHECK (creatinine_unit IN ('umol', 'mg')),
    bsa REAL,
    ccr REAL,
    last_cycle INTEGER,
    last_regimen TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);

-- ============================================================================
-- Calculation History
-- ============================================================================

-- patient_id is a soft reference: history may outlive an unsaved patient,
-- and patient deletion removes matching rows explicitly.
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER,
    patient_name TEXT NOT NULL,
    regimen_id TEXT NOT NULL,
    regimen_name TEXT NOT NULL,
    cancer_type TEXT NOT NULL,
    cycle INTEGER NOT NULL DEFAULT 1,
    bsa REAL NOT NULL,
    ccr REAL NOT NULL,
    doses TEXT NOT NULL DEFAULT '[]',            -- JSON array of DoseEntry
    reactions TEXT NOT NULL DEFAULT '{}',        -- JSON object {reaction_id: grade}
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_patient ON history(patient_id);
CREATE INDEX IF NOT EXISTS idx_history_regimen ON history(regimen_id);
CREATE INDEX IF NOT EXISTS idx_history_created_at ON history(created_at);

-- ============================================================================
-- Settings (key/value, JSON values)
-- ============================================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
