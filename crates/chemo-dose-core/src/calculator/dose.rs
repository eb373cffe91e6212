//! Dose formulas.

use super::is_positive;

/// Offset added to Ccr in the Calvert formula (non-renal clearance, mL/min).
pub const CALVERT_NON_RENAL_CLEARANCE: f64 = 25.0;

/// Dose in mg for a per-m² rate: `round(bsa × rate)`.
pub fn compute_dose_by_bsa(bsa: f64, rate_per_m2: f64) -> f64 {
    if !is_positive(bsa) || !is_positive(rate_per_m2) {
        return 0.0;
    }
    (bsa * rate_per_m2).round()
}

/// Carboplatin dose in mg (Calvert): `round(AUC × (Ccr + 25))`.
pub fn compute_carboplatin_dose(target_auc: f64, ccr: f64) -> f64 {
    if !is_positive(target_auc) || !is_positive(ccr) {
        return 0.0;
    }
    (target_auc * (ccr + CALVERT_NON_RENAL_CLEARANCE)).round()
}
