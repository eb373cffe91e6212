//! Application settings.
//!
//! Settings live in the `settings` table as one JSON value per key. A JSON
//! mirror of the whole [`AppSettings`] is kept on disk so preferences survive
//! a store that cannot be opened or read.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculator::{BsaFormula, CreatinineUnit, ParseEnumError};
use crate::db::{Database, DbError};

/// Default UI language.
pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Settings errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Settings file error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

impl From<ParseEnumError> for SettingsError {
    fn from(e: ParseEnumError) -> Self {
        SettingsError::InvalidValue(e.to_string())
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// UI colour theme.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(SettingsError::InvalidValue(format!("unknown theme: {:?}", s))),
        }
    }
}

/// A settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BsaFormula,
    Theme,
    Language,
    DefaultCreatinineUnit,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::BsaFormula,
        SettingKey::Theme,
        SettingKey::Language,
        SettingKey::DefaultCreatinineUnit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::BsaFormula => "bsa_formula",
            SettingKey::Theme => "theme",
            SettingKey::Language => "language",
            SettingKey::DefaultCreatinineUnit => "default_creatinine_unit",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

/// User preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub bsa_formula: BsaFormula,
    pub theme: Theme,
    pub language: String,
    pub default_creatinine_unit: CreatinineUnit,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bsa_formula: BsaFormula::default(),
            theme: Theme::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            default_creatinine_unit: CreatinineUnit::default(),
        }
    }
}

impl AppSettings {
    /// Flip between light and dark theme, returning the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// JSON value of one setting.
    pub fn value(&self, key: SettingKey) -> SettingsResult<Value> {
        let value = match key {
            SettingKey::BsaFormula => serde_json::to_value(self.bsa_formula)?,
            SettingKey::Theme => serde_json::to_value(self.theme)?,
            SettingKey::Language => Value::String(self.language.clone()),
            SettingKey::DefaultCreatinineUnit => {
                serde_json::to_value(self.default_creatinine_unit)?
            }
        };
        Ok(value)
    }

    /// Set one setting from its JSON value. On error the settings are unchanged.
    pub fn apply(&mut self, key: SettingKey, value: Value) -> SettingsResult<()> {
        match key {
            SettingKey::BsaFormula => self.bsa_formula = serde_json::from_value(value)?,
            SettingKey::Theme => self.theme = serde_json::from_value(value)?,
            SettingKey::Language => self.language = serde_json::from_value(value)?,
            SettingKey::DefaultCreatinineUnit => {
                self.default_creatinine_unit = serde_json::from_value(value)?
            }
        }
        Ok(())
    }

    /// Set one value from its text form, accepting the same ids the
    /// calculator enums parse.
    pub fn apply_str(&mut self, key: SettingKey, value: &str) -> SettingsResult<()> {
        match key {
            SettingKey::BsaFormula => self.bsa_formula = value.parse()?,
            SettingKey::Theme => self.theme = value.parse()?,
            SettingKey::Language => {
                let language = value.trim();
                if language.is_empty() {
                    return Err(SettingsError::InvalidValue("empty language".into()));
                }
                self.language = language.to_string();
            }
            SettingKey::DefaultCreatinineUnit => self.default_creatinine_unit = value.parse()?,
        }
        Ok(())
    }
}

/// Loads and saves [`AppSettings`] against the database and the JSON mirror.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    mirror_path: Option<PathBuf>,
}

impl SettingsStore {
    /// Store without a mirror file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that mirrors every save to `path`.
    pub fn with_mirror(path: impl Into<PathBuf>) -> Self {
        Self {
            mirror_path: Some(path.into()),
        }
    }

    pub fn mirror_path(&self) -> Option<&PathBuf> {
        self.mirror_path.as_ref()
    }

    /// Load settings: defaults overlaid with stored values.
    ///
    /// Falls back to the mirror file when the store cannot be read, and to
    /// defaults when the mirror is missing too. Unknown keys and values that
    /// fail to parse are skipped.
    pub fn load(&self, db: &Database) -> AppSettings {
        let stored = match db.all_settings() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read settings from database, using mirror");
                return self.load_mirror().unwrap_or_default();
            }
        };

        let mut settings = AppSettings::default();
        for (key, value) in stored {
            let applied = key
                .parse::<SettingKey>()
                .and_then(|k| settings.apply(k, value));
            if let Err(e) = applied {
                warn!(key = %key, error = %e, "Ignoring stored setting");
            }
        }

        debug!(?settings, "Loaded settings");
        settings
    }

    /// Save all settings.
    pub fn save(&self, db: &Database, settings: &AppSettings) -> SettingsResult<()> {
        for key in SettingKey::ALL {
            db.set_setting(key.as_str(), &settings.value(key)?)?;
        }
        self.write_mirror(settings);
        Ok(())
    }

    /// Save a single setting.
    pub fn save_one(
        &self,
        db: &Database,
        settings: &AppSettings,
        key: SettingKey,
    ) -> SettingsResult<()> {
        db.set_setting(key.as_str(), &settings.value(key)?)?;
        self.write_mirror(settings);
        Ok(())
    }

    /// Clear stored settings and return defaults.
    pub fn reset(&self, db: &Database) -> SettingsResult<AppSettings> {
        db.clear_settings()?;
        let settings = AppSettings::default();
        self.write_mirror(&settings);
        info!("Reset settings to defaults");
        Ok(settings)
    }

    fn load_mirror(&self) -> Option<AppSettings> {
        let path = self.mirror_path.as_ref()?;
        let loaded = std::fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|raw| Ok(serde_json::from_str::<AppSettings>(&raw)?));

        match loaded {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read settings mirror, using defaults");
                None
            }
        }
    }

    fn write_mirror(&self, settings: &AppSettings) {
        let Some(path) = &self.mirror_path else {
            return;
        };

        let written = serde_json::to_string_pretty(settings)
            .map_err(SettingsError::from)
            .and_then(|json| Ok(std::fs::write(path, json)?));

        if let Err(e) = written {
            warn!(path = %path.display(), error = %e, "Failed to write settings mirror");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.bsa_formula, BsaFormula::Mosteller);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, "zh-CN");
        assert_eq!(settings.default_creatinine_unit, CreatinineUnit::Umol);
    }

    #[test]
    fn test_toggle_theme() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.toggle_theme(), Theme::Dark);
        assert_eq!(settings.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_key_parse() {
        assert_eq!("theme".parse::<SettingKey>().unwrap(), SettingKey::Theme);
        assert!(matches!(
            "font_size".parse::<SettingKey>(),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_apply_rejects_bad_value() {
        let mut settings = AppSettings::default();
        assert!(settings.apply(SettingKey::Theme, json!("sepia")).is_err());
        assert_eq!(settings.theme, Theme::Light);

        settings.apply(SettingKey::BsaFormula, json!("xu_wensheng")).unwrap();
        assert_eq!(settings.bsa_formula, BsaFormula::XuWensheng);
    }

    #[test]
    fn test_apply_str_accepts_enum_aliases() {
        let mut settings = AppSettings::default();
        settings.apply_str(SettingKey::BsaFormula, "xu").unwrap();
        assert_eq!(settings.bsa_formula, BsaFormula::XuWensheng);
        settings.apply_str(SettingKey::BsaFormula, "DuBois").unwrap();
        assert_eq!(settings.bsa_formula, BsaFormula::Dubois);
        settings.apply_str(SettingKey::DefaultCreatinineUnit, "mg/dL").unwrap();
        assert_eq!(settings.default_creatinine_unit, CreatinineUnit::Mg);
        settings.apply_str(SettingKey::Theme, " Dark ").unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        settings.apply_str(SettingKey::Language, "en-US").unwrap();
        assert_eq!(settings.language, "en-US");

        let before = settings.clone();
        for (key, value) in [
            (SettingKey::BsaFormula, "haycock"),
            (SettingKey::Theme, "sepia"),
            (SettingKey::Language, "  "),
            (SettingKey::DefaultCreatinineUnit, "mmol"),
        ] {
            assert!(matches!(
                settings.apply_str(key, value),
                Err(SettingsError::InvalidValue(_))
            ));
        }
        assert_eq!(settings, before);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn test_load_empty_store_gives_defaults() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(SettingsStore::new().load(&db), AppSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let db = Database::open_in_memory().unwrap();
        let store = SettingsStore::new();

        let mut settings = AppSettings::default();
        settings.bsa_formula = BsaFormula::Dubois;
        settings.toggle_theme();
        store.save(&db, &settings).unwrap();

        assert_eq!(store.load(&db), settings);
    }

    #[test]
    fn test_save_one_only_writes_key() {
        let db = Database::open_in_memory().unwrap();
        let store = SettingsStore::new();

        let mut settings = AppSettings::default();
        settings.default_creatinine_unit = CreatinineUnit::Mg;
        store
            .save_one(&db, &settings, SettingKey::DefaultCreatinineUnit)
            .unwrap();

        let stored = db.all_settings().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored["default_creatinine_unit"], json!("mg"));
    }

    #[test]
    fn test_load_skips_invalid_rows() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("theme", &json!("sepia")).unwrap();
        db.set_setting("font_size", &json!(14)).unwrap();
        db.set_setting("bsa_formula", &json!("dubois")).unwrap();

        let settings = SettingsStore::new().load(&db);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.bsa_formula, BsaFormula::Dubois);
    }

    #[test]
    fn test_reset() {
        let db = Database::open_in_memory().unwrap();
        let store = SettingsStore::new();
        let mut settings = AppSettings::default();
        settings.toggle_theme();
        store.save(&db, &settings).unwrap();

        assert_eq!(store.reset(&db).unwrap(), AppSettings::default());
        assert!(db.all_settings().unwrap().is_empty());
    }

    #[test]
    fn test_mirror_written_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let db = Database::open_in_memory().unwrap();
        let store = SettingsStore::with_mirror(&path);

        let mut settings = AppSettings::default();
        settings.bsa_formula = BsaFormula::XuWensheng;
        store.save(&db, &settings).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mirrored: AppSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(mirrored, settings);
    }

    #[test]
    fn test_load_falls_back_to_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let db = Database::open_in_memory().unwrap();
        db.conn().execute("DROP TABLE settings", []).unwrap();

        let settings = SettingsStore::with_mirror(&path).load(&db);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.bsa_formula, BsaFormula::Mosteller);
    }

    #[test]
    fn test_load_without_store_or_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        db.conn().execute("DROP TABLE settings", []).unwrap();

        let store = SettingsStore::with_mirror(dir.path().join("missing.json"));
        assert_eq!(store.load(&db), AppSettings::default());
    }

    #[test]
    fn test_mirror_failure_does_not_fail_save() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_in_memory().unwrap();
        // A directory path cannot be written as a file
        let store = SettingsStore::with_mirror(dir.path());

        assert!(store.save(&db, &AppSettings::default()).is_ok());
        assert_eq!(db.all_settings().unwrap().len(), 4);
    }
}
