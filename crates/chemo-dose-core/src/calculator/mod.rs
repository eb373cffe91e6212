//! Dosing calculator.
//!
//! Pure, total functions:
//! - Body surface area (Mosteller, Xu Wensheng, DuBois)
//! - Creatinine clearance (Cockcroft-Gault)
//! - Dose by BSA and carboplatin dose (Calvert)
//! - Renal function classification
//!
//! Invalid or missing input never fails; it yields 0 and the caller decides
//! whether that means "not entered" or a real zero.

mod bsa;
mod clearance;
mod dose;
mod limits;
mod renal;

pub use bsa::*;
pub use clearance::*;
pub use dose::*;
pub use limits::*;
pub use renal::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Biological sex, used by the Xu Wensheng and Cockcroft-Gault formulas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "1" => Ok(Sex::Male),
            "female" | "f" | "2" => Ok(Sex::Female),
            _ => Err(ParseEnumError::new("sex", s)),
        }
    }
}

/// Unit a serum creatinine value was entered in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CreatinineUnit {
    /// µmol/L
    #[default]
    Umol,
    /// mg/dL
    Mg,
}

impl CreatinineUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            CreatinineUnit::Umol => "umol",
            CreatinineUnit::Mg => "mg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreatinineUnit::Umol => "µmol/L",
            CreatinineUnit::Mg => "mg/dL",
        }
    }
}

impl fmt::Display for CreatinineUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatinineUnit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "umol" | "µmol/l" | "umol/l" => Ok(CreatinineUnit::Umol),
            "mg" | "mg/dl" => Ok(CreatinineUnit::Mg),
            _ => Err(ParseEnumError::new("creatinine unit", s)),
        }
    }
}

/// Unknown string id for one of the calculator enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// True for finite values strictly greater than zero. NaN is rejected.
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parse() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("2".parse::<Sex>().unwrap(), Sex::Female);
        assert!("x".parse::<Sex>().is_err());
    }

    #[test]
    fn test_creatinine_unit_parse() {
        assert_eq!("umol".parse::<CreatinineUnit>().unwrap(), CreatinineUnit::Umol);
        assert_eq!("mg/dL".parse::<CreatinineUnit>().unwrap(), CreatinineUnit::Mg);
        assert!("mmol".parse::<CreatinineUnit>().is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.818_18, 2), 1.82);
        assert_eq!(round_to(77.777, 1), 77.8);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}
