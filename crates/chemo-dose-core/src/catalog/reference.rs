//! Reference content: cancer types, scenarios, adverse reactions, patient guidance.

use crate::models::{
    AdverseReactionType, CancerType, HomeCareItem, ReactionCategory, ReactionGrade, RedFlag,
    TreatmentScenario,
};

pub(super) fn cancer_types() -> Vec<CancerType> {
    [
        ("colorectal", "Colorectal cancer"),
        ("nsclc", "Non-small cell lung cancer"),
        ("sclc", "Small cell lung cancer"),
        ("gastric", "Gastric cancer"),
        ("btc", "Biliary tract cancer"),
        ("breast", "Breast cancer"),
        ("ovarian", "Ovarian cancer"),
    ]
    .into_iter()
    .map(|(id, name)| CancerType {
        id: id.into(),
        name: name.into(),
    })
    .collect()
}

pub(super) fn scenarios() -> Vec<TreatmentScenario> {
    [
        ("adjuvant", "Adjuvant (post-operative)", 1),
        ("neoadjuvant", "Neoadjuvant", 2),
        ("firstline", "Advanced, first line", 3),
        ("limited", "Limited stage", 1),
        ("extensive", "Extensive stage", 2),
    ]
    .into_iter()
    .map(|(id, name, order)| TreatmentScenario {
        id: id.into(),
        name: name.into(),
        order,
    })
    .collect()
}

pub(super) fn adverse_reaction_types() -> Vec<AdverseReactionType> {
    use ReactionCategory::*;

    [
        ("neutropenia", "Neutropenia", Hematologic, "Low white cell count"),
        ("thrombocytopenia", "Thrombocytopenia", Hematologic, "Low platelet count"),
        ("anemia", "Anemia", Hematologic, "Low hemoglobin"),
        ("nausea_vomiting", "Nausea / vomiting", NonHematologic, "Common gastrointestinal reaction"),
        ("neurotoxicity", "Neurotoxicity", NonHematologic, "Peripheral sensory neuropathy"),
        ("diarrhea", "Diarrhea", NonHematologic, "Increased stool frequency"),
        ("mucositis", "Oral mucositis", NonHematologic, "Mouth ulcers or pain"),
        ("allergic", "Allergic reaction", Special, "Rash, dyspnea and similar"),
    ]
    .into_iter()
    .map(|(id, name, category, description)| AdverseReactionType {
        id: id.into(),
        name: name.into(),
        category,
        description: description.into(),
    })
    .collect()
}

/// NCI CTCAE 5.0 grades.
pub(super) fn reaction_grades() -> Vec<ReactionGrade> {
    [
        (0, "None", None),
        (1, "Grade 1", Some("Mild; asymptomatic")),
        (2, "Grade 2", Some("Moderate; intervention indicated")),
        (3, "Grade 3", Some("Severe; medical intervention")),
        (4, "Grade 4", Some("Life-threatening")),
        (5, "Grade 5", Some("Death")),
    ]
    .into_iter()
    .map(|(value, label, description)| ReactionGrade {
        value,
        label: label.into(),
        description: description.map(Into::into),
    })
    .collect()
}

pub(super) fn home_care() -> Vec<HomeCareItem> {
    [
        ("Drink plenty of water", "2000-2500 mL per day to help clear the drugs"),
        ("Light diet", "Small, frequent, easily digested meals"),
        ("Rest", "Sleep well and stay moderately active"),
        ("Monitor temperature", "Check daily; seek care for fever"),
        ("Skin care", "Keep skin clean and avoid dryness"),
        ("Oral care", "Rinse with salt water to prevent mucositis"),
    ]
    .into_iter()
    .map(|(title, description)| HomeCareItem {
        title: title.into(),
        description: description.into(),
    })
    .collect()
}

pub(super) fn red_flags() -> Vec<RedFlag> {
    [
        ("Fever above 38 °C", "May indicate infection"),
        ("Severe diarrhea", "More than 6 times a day or bloody stool"),
        ("Severe vomiting", "Unable to eat or drink"),
        ("Bleeding", "Gum bleeding, bruising"),
        ("Shortness of breath", "Chest tightness, breathlessness"),
        ("Altered consciousness", "Confusion, drowsiness"),
    ]
    .into_iter()
    .map(|(text, description)| RedFlag {
        text: text.into(),
        description: description.into(),
    })
    .collect()
}
