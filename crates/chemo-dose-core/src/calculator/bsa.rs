//! Body surface area estimators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{is_positive, round_to, CalculatorLimits, ClampRange, ParseEnumError, Sex};

/// Selectable BSA estimator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BsaFormula {
    /// sqrt(height_cm × weight_kg / 3600)
    #[default]
    Mosteller,
    /// Sex-differentiated linear formula for Chinese adults
    XuWensheng,
    /// 0.007184 × weight^0.425 × height^0.725
    Dubois,
}

impl BsaFormula {
    pub const ALL: [BsaFormula; 3] = [BsaFormula::Mosteller, BsaFormula::XuWensheng, BsaFormula::Dubois];

    pub fn as_str(self) -> &'static str {
        match self {
            BsaFormula::Mosteller => "mosteller",
            BsaFormula::XuWensheng => "xu_wensheng",
            BsaFormula::Dubois => "dubois",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BsaFormula::Mosteller => "Mosteller",
            BsaFormula::XuWensheng => "Xu Wensheng",
            BsaFormula::Dubois => "DuBois",
        }
    }

    /// Unclamped, unrounded estimate in m².
    fn raw(self, height_cm: f64, weight_kg: f64, sex: Sex) -> f64 {
        match self {
            BsaFormula::Mosteller => (height_cm * weight_kg / 3600.0).sqrt(),
            BsaFormula::XuWensheng => match sex {
                Sex::Male => 0.0057 * height_cm + 0.0121 * weight_kg + 0.0882,
                Sex::Female => 0.0073 * height_cm + 0.0127 * weight_kg - 0.2106,
            },
            BsaFormula::Dubois => 0.007184 * weight_kg.powf(0.425) * height_cm.powf(0.725),
        }
    }
}

impl fmt::Display for BsaFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BsaFormula {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mosteller" => Ok(BsaFormula::Mosteller),
            "xu_wensheng" | "xu-wensheng" | "xu" => Ok(BsaFormula::XuWensheng),
            "dubois" | "du_bois" => Ok(BsaFormula::Dubois),
            _ => Err(ParseEnumError::new("BSA formula", s)),
        }
    }
}

/// Body surface area in m², clamped to the default limits and rounded to
/// 2 decimals. Returns exactly 0 when height or weight is not positive.
pub fn compute_body_surface_area(height_cm: f64, weight_kg: f64, formula: BsaFormula, sex: Sex) -> f64 {
    compute_body_surface_area_with_limits(
        height_cm,
        weight_kg,
        formula,
        sex,
        &CalculatorLimits::DEFAULT.bsa,
    )
}

/// [`compute_body_surface_area`] with caller-supplied clamp bounds.
pub fn compute_body_surface_area_with_limits(
    height_cm: f64,
    weight_kg: f64,
    formula: BsaFormula,
    sex: Sex,
    limits: &ClampRange,
) -> f64 {
    if !is_positive(height_cm) || !is_positive(weight_kg) {
        return 0.0;
    }

    let bsa = limits.apply(formula.raw(height_cm, weight_kg, sex));
    round_to(bsa, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mosteller_reference() {
        assert_eq!(compute_body_surface_area(170.0, 70.0, BsaFormula::Mosteller, Sex::Male), 1.82);
    }

    #[test]
    fn test_mosteller_ignores_sex() {
        let male = compute_body_surface_area(160.0, 55.0, BsaFormula::Mosteller, Sex::Male);
        let female = compute_body_surface_area(160.0, 55.0, BsaFormula::Mosteller, Sex::Female);
        assert_eq!(male, female);
    }

    #[test]
    fn test_xu_wensheng_by_sex() {
        // 0.0057*170 + 0.0121*70 + 0.0882 = 1.9042
        assert_eq!(compute_body_surface_area(170.0, 70.0, BsaFormula::XuWensheng, Sex::Male), 1.9);
        // 0.0073*160 + 0.0127*55 - 0.2106 = 1.6559
        assert_eq!(compute_body_surface_area(160.0, 55.0, BsaFormula::XuWensheng, Sex::Female), 1.66);
    }

    #[test]
    fn test_dubois() {
        // 0.007184 * 70^0.425 * 170^0.725 ≈ 1.8097
        assert_eq!(compute_body_surface_area(170.0, 70.0, BsaFormula::Dubois, Sex::Male), 1.81);
    }

    #[test]
    fn test_non_positive_inputs_yield_zero() {
        assert_eq!(compute_body_surface_area(0.0, 70.0, BsaFormula::Mosteller, Sex::Male), 0.0);
        assert_eq!(compute_body_surface_area(170.0, -1.0, BsaFormula::Dubois, Sex::Male), 0.0);
        assert_eq!(compute_body_surface_area(f64::NAN, 70.0, BsaFormula::Mosteller, Sex::Male), 0.0);
    }

    #[test]
    fn test_clamped_to_limits() {
        assert_eq!(compute_body_surface_area(50.0, 3.0, BsaFormula::Mosteller, Sex::Male), 0.5);
        assert_eq!(compute_body_surface_area(250.0, 300.0, BsaFormula::Mosteller, Sex::Male), 3.0);
    }

    #[test]
    fn test_custom_limits() {
        let limits = ClampRange::new(1.0, 1.5);
        let bsa = compute_body_surface_area_with_limits(170.0, 70.0, BsaFormula::Mosteller, Sex::Male, &limits);
        assert_eq!(bsa, 1.5);
    }

    #[test]
    fn test_formula_parse_roundtrip() {
        for formula in BsaFormula::ALL {
            assert_eq!(formula.as_str().parse::<BsaFormula>().unwrap(), formula);
        }
    }
}
