//! Creatinine clearance (Cockcroft-Gault).

use super::{is_positive, round_to, CalculatorLimits, ClampRange, CreatinineUnit, Sex};

/// µmol/L per mg/dL of serum creatinine.
pub const CREATININE_UMOL_PER_MG_DL: f64 = 88.4;

/// Female correction factor for Cockcroft-Gault.
pub const FEMALE_CLEARANCE_FACTOR: f64 = 0.85;

/// Convert a serum creatinine value to mg/dL.
pub fn creatinine_to_mg_dl(value: f64, unit: CreatinineUnit) -> f64 {
    match unit {
        CreatinineUnit::Umol => value / CREATININE_UMOL_PER_MG_DL,
        CreatinineUnit::Mg => value,
    }
}

/// Creatinine clearance in mL/min, clamped to the default limits and rounded
/// to 1 decimal. Returns 0 when age, weight or creatinine is not positive.
pub fn compute_creatinine_clearance(
    age: f64,
    weight_kg: f64,
    serum_creatinine: f64,
    unit: CreatinineUnit,
    sex: Sex,
) -> f64 {
    compute_creatinine_clearance_with_limits(
        age,
        weight_kg,
        serum_creatinine,
        unit,
        sex,
        &CalculatorLimits::DEFAULT.ccr,
    )
}

/// [`compute_creatinine_clearance`] with caller-supplied clamp bounds.
pub fn compute_creatinine_clearance_with_limits(
    age: f64,
    weight_kg: f64,
    serum_creatinine: f64,
    unit: CreatinineUnit,
    sex: Sex,
    limits: &ClampRange,
) -> f64 {
    if !is_positive(age) || !is_positive(weight_kg) || !is_positive(serum_creatinine) {
        return 0.0;
    }

    let creatinine_mg = creatinine_to_mg_dl(serum_creatinine, unit);
    let mut ccr = (140.0 - age) * weight_kg / (72.0 * creatinine_mg);
    if sex == Sex::Female {
        ccr *= FEMALE_CLEARANCE_FACTOR;
    }

    round_to(limits.apply(ccr), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_male_umol() {
        let ccr = compute_creatinine_clearance(60.0, 70.0, 88.4, CreatinineUnit::Umol, Sex::Male);
        assert_eq!(ccr, 77.8);
    }

    #[test]
    fn test_umol_matches_mg() {
        let from_umol = compute_creatinine_clearance(60.0, 70.0, 88.4, CreatinineUnit::Umol, Sex::Male);
        let from_mg = compute_creatinine_clearance(60.0, 70.0, 1.0, CreatinineUnit::Mg, Sex::Male);
        assert_eq!(from_umol, from_mg);
    }

    #[test]
    fn test_female_factor() {
        // 77.777... * 0.85 = 66.11
        let ccr = compute_creatinine_clearance(60.0, 70.0, 1.0, CreatinineUnit::Mg, Sex::Female);
        assert_eq!(ccr, 66.1);
    }

    #[test]
    fn test_invalid_inputs_yield_zero() {
        assert_eq!(compute_creatinine_clearance(0.0, 70.0, 1.0, CreatinineUnit::Mg, Sex::Male), 0.0);
        assert_eq!(compute_creatinine_clearance(60.0, 0.0, 1.0, CreatinineUnit::Mg, Sex::Male), 0.0);
        assert_eq!(compute_creatinine_clearance(60.0, 70.0, 0.0, CreatinineUnit::Mg, Sex::Male), 0.0);
        assert_eq!(compute_creatinine_clearance(60.0, 70.0, -5.0, CreatinineUnit::Umol, Sex::Male), 0.0);
    }

    #[test]
    fn test_clamped() {
        // Very low creatinine would exceed 200
        assert_eq!(compute_creatinine_clearance(20.0, 100.0, 0.2, CreatinineUnit::Mg, Sex::Male), 200.0);
        // Age above 140 would go negative
        assert_eq!(compute_creatinine_clearance(145.0, 70.0, 1.0, CreatinineUnit::Mg, Sex::Male), 0.0);
    }

    #[test]
    fn test_conversion() {
        assert_eq!(creatinine_to_mg_dl(88.4, CreatinineUnit::Umol), 1.0);
        assert_eq!(creatinine_to_mg_dl(1.3, CreatinineUnit::Mg), 1.3);
    }
}
