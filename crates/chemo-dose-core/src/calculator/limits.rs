//! Clamp bounds and plausibility ranges for patient measurements.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Inclusive numeric range a computed value is forced into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range. Unlike `f64::clamp`, does not panic
    /// when min > max.
    pub fn apply(&self, value: f64) -> f64 {
        let mut v = value;
        if v < self.min {
            v = self.min;
        }
        if v > self.max {
            v = self.max;
        }
        v
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Output bounds applied by the BSA and creatinine clearance estimators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalculatorLimits {
    /// Body surface area, m²
    pub bsa: ClampRange,
    /// Creatinine clearance, mL/min
    pub ccr: ClampRange,
}

impl CalculatorLimits {
    pub const DEFAULT: CalculatorLimits = CalculatorLimits {
        bsa: ClampRange::new(0.5, 3.0),
        ccr: ClampRange::new(0.0, 200.0),
    };
}

impl Default for CalculatorLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A biometric input that has a plausibility range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Height,
    Weight,
    Age,
    Creatinine,
}

impl Measurement {
    pub const ALL: [Measurement; 4] = [
        Measurement::Height,
        Measurement::Weight,
        Measurement::Age,
        Measurement::Creatinine,
    ];

    /// Plausible input range (cm, kg, years, µmol/L).
    pub fn plausible_range(self) -> ClampRange {
        match self {
            Measurement::Height => ClampRange::new(30.0, 250.0),
            Measurement::Weight => ClampRange::new(2.0, 300.0),
            Measurement::Age => ClampRange::new(1.0, 150.0),
            Measurement::Creatinine => ClampRange::new(10.0, 2000.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Measurement::Height => "height",
            Measurement::Weight => "weight",
            Measurement::Age => "age",
            Measurement::Creatinine => "creatinine",
        }
    }
}

impl FromStr for Measurement {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("measurement", s))
    }
}

/// Check whether a value lies inside the plausibility range of a measurement.
///
/// Advisory only: the estimators accept any positive input.
pub fn is_value_valid(measurement: Measurement, value: f64) -> bool {
    measurement.plausible_range().contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_range_apply() {
        let range = ClampRange::new(0.5, 3.0);
        assert_eq!(range.apply(0.1), 0.5);
        assert_eq!(range.apply(1.7), 1.7);
        assert_eq!(range.apply(4.2), 3.0);
    }

    #[test]
    fn test_default_limits() {
        let limits = CalculatorLimits::default();
        assert_eq!(limits.bsa, ClampRange::new(0.5, 3.0));
        assert_eq!(limits.ccr, ClampRange::new(0.0, 200.0));
    }

    #[test]
    fn test_value_validity() {
        assert!(is_value_valid(Measurement::Height, 170.0));
        assert!(!is_value_valid(Measurement::Height, 20.0));
        assert!(is_value_valid(Measurement::Weight, 2.0));
        assert!(!is_value_valid(Measurement::Weight, 301.0));
        assert!(is_value_valid(Measurement::Age, 150.0));
        assert!(!is_value_valid(Measurement::Age, 0.0));
        assert!(is_value_valid(Measurement::Creatinine, 88.4));
        assert!(!is_value_valid(Measurement::Creatinine, f64::NAN));
    }
}
