//! Regimen catalog.
//!
//! Read-only reference data compiled into the library: regimens, cancer
//! types, treatment scenarios, adverse reaction taxonomy and patient
//! guidance. Adding or removing a regimen is a data change in
//! `regimens.rs`, not a runtime operation.

mod reference;
mod regimens;

use std::collections::BTreeMap;

use crate::models::{
    AdverseReactionType, CancerType, HomeCareItem, ReactionGrade, RedFlag, Regimen, RegimenError,
    TreatmentScenario,
};

/// The compiled regimen catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    cancer_types: Vec<CancerType>,
    scenarios: Vec<TreatmentScenario>,
    regimens: Vec<Regimen>,
    adverse_reactions: Vec<AdverseReactionType>,
    reaction_grades: Vec<ReactionGrade>,
    home_care: Vec<HomeCareItem>,
    red_flags: Vec<RedFlag>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Build the builtin catalog.
    pub fn builtin() -> Self {
        Self {
            cancer_types: reference::cancer_types(),
            scenarios: reference::scenarios(),
            regimens: regimens::regimens(),
            adverse_reactions: reference::adverse_reaction_types(),
            reaction_grades: reference::reaction_grades(),
            home_care: reference::home_care(),
            red_flags: reference::red_flags(),
        }
    }

    /// Validate every regimen against the catalog invariants.
    pub fn validate(&self) -> Result<(), RegimenError> {
        self.regimens.iter().try_for_each(Regimen::validate)
    }

    pub fn regimens(&self) -> &[Regimen] {
        &self.regimens
    }

    /// Get a regimen by ID.
    pub fn regimen(&self, id: &str) -> Option<&Regimen> {
        self.regimens.iter().find(|r| r.id == id)
    }

    /// Regimens for a cancer type, in catalog order.
    pub fn regimens_for_cancer(&self, cancer_type: &str) -> Vec<&Regimen> {
        self.regimens
            .iter()
            .filter(|r| r.cancer_type == cancer_type)
            .collect()
    }

    /// Regimens for a cancer type and treatment scenario.
    pub fn regimens_for(&self, cancer_type: &str, scenario: &str) -> Vec<&Regimen> {
        self.regimens
            .iter()
            .filter(|r| r.cancer_type == cancer_type && r.scenario == scenario)
            .collect()
    }

    /// All regimens grouped by cancer type ID. Cancer types without regimens
    /// map to an empty list.
    pub fn grouped_by_cancer(&self) -> BTreeMap<String, Vec<&Regimen>> {
        self.cancer_types
            .iter()
            .map(|c| (c.id.clone(), self.regimens_for_cancer(&c.id)))
            .collect()
    }

    pub fn cancer_types(&self) -> &[CancerType] {
        &self.cancer_types
    }

    pub fn cancer_type(&self, id: &str) -> Option<&CancerType> {
        self.cancer_types.iter().find(|c| c.id == id)
    }

    pub fn scenario(&self, id: &str) -> Option<&TreatmentScenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Scenarios that have at least one regimen for the cancer type, sorted
    /// by display order.
    pub fn scenarios_for_cancer(&self, cancer_type: &str) -> Vec<&TreatmentScenario> {
        let mut scenarios: Vec<&TreatmentScenario> = self
            .scenarios
            .iter()
            .filter(|s| {
                self.regimens
                    .iter()
                    .any(|r| r.cancer_type == cancer_type && r.scenario == s.id)
            })
            .collect();
        scenarios.sort_by_key(|s| s.order);
        scenarios
    }

    pub fn adverse_reactions(&self) -> &[AdverseReactionType] {
        &self.adverse_reactions
    }

    pub fn reaction_grades(&self) -> &[ReactionGrade] {
        &self.reaction_grades
    }

    pub fn home_care(&self) -> &[HomeCareItem] {
        &self.home_care
    }

    pub fn red_flags(&self) -> &[RedFlag] {
        &self.red_flags
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::Dosage;

    #[test]
    fn test_builtin_validates() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.regimens().len(), 16);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_regimen_ids_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<_> = catalog.regimens().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.regimens().len());
    }

    #[test]
    fn test_regimens_reference_known_tags() {
        let catalog = Catalog::builtin();
        for regimen in catalog.regimens() {
            assert!(catalog.cancer_type(&regimen.cancer_type).is_some(), "{}", regimen.id);
            assert!(catalog.scenario(&regimen.scenario).is_some(), "{}", regimen.id);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::builtin();
        let regimen = catalog.regimen("pp_carboplatin").unwrap();
        assert_eq!(regimen.cycle_days, 21);
        assert_eq!(regimen.drugs[1].dosage, Dosage::TargetAuc { auc: 5.0 });
        assert!(catalog.regimen("missing").is_none());
    }

    #[test]
    fn test_regimens_for_cancer_and_scenario() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.regimens_for_cancer("colorectal").len(), 6);
        assert_eq!(catalog.regimens_for("colorectal", "adjuvant").len(), 3);
        assert_eq!(catalog.regimens_for("sclc", "limited").len(), 2);
        assert!(catalog.regimens_for("breast", "adjuvant").is_empty());
    }

    #[test]
    fn test_grouped_by_cancer() {
        let catalog = Catalog::builtin();
        let grouped = catalog.grouped_by_cancer();
        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped["btc"].len(), 3);
        assert!(grouped["ovarian"].is_empty());
    }

    #[test]
    fn test_scenarios_for_cancer_ordered() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog
            .scenarios_for_cancer("sclc")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["limited", "extensive"]);

        let ids: Vec<_> = catalog
            .scenarios_for_cancer("colorectal")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["adjuvant", "firstline"]);
    }

    #[test]
    fn test_reference_content() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.adverse_reactions().len(), 8);
        assert_eq!(catalog.reaction_grades().len(), 6);
        assert_eq!(catalog.reaction_grades()[5].value, 5);
        assert!(!catalog.home_care().is_empty());
        assert!(!catalog.red_flags().is_empty());
    }
}
