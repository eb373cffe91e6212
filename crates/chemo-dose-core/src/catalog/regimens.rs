//! Builtin regimen table (CSCO guideline regimens).

use crate::models::{Drug, Regimen, RegimenWarning, WarningSeverity};

use WarningSeverity::{Danger, Info, Warning};

const CSCO: &str = "CSCO guideline";

fn base(id: &str, name: &str, cancer_type: &str, scenario: &str, description: &str, weeks: u32) -> Regimen {
    Regimen {
        id: id.into(),
        name: name.into(),
        cancer_type: cancer_type.into(),
        scenario: scenario.into(),
        description: description.into(),
        cycle_days: weeks * 7,
        cycle_weeks: weeks,
        recommended_cycles: None,
        source: CSCO.into(),
        evidence_level: "1A".into(),
        drugs: Vec::new(),
        warnings: Vec::new(),
        contraindications: Vec::new(),
        recommended: true,
    }
}

fn warn(severity: WarningSeverity, title: &str, content: &str) -> RegimenWarning {
    RegimenWarning::new(severity, title, content)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// Drugs shared across regimens

fn oxaliplatin(mg_per_m2: f64, administration: &str) -> Drug {
    Drug::per_m2("Oxaliplatin", "OXA", mg_per_m2).given(administration, "Single dose, day 1", "Day 1")
}

fn leucovorin() -> Drug {
    Drug::per_m2("Leucovorin", "LV", 400.0).given("IV infusion over 2 h", "Single dose, day 1", "Day 1")
}

fn fluorouracil_bolus() -> Drug {
    Drug::per_m2("Fluorouracil", "5-FU", 400.0)
        .given("IV bolus", "Bolus dose, day 1", "Day 1")
        .with_note("IV bolus")
}

fn fluorouracil_infusion(hours: &str) -> Drug {
    Drug::per_m2("Fluorouracil", "5-FU", 2400.0).given(
        &format!("Continuous IV infusion over {} h", hours),
        &format!("Continuous infusion over {} h", hours),
        "Days 1-2",
    )
}

fn capecitabine() -> Drug {
    Drug::per_m2("Capecitabine", "CAP", 1000.0).given(
        "Oral, twice daily (morning and evening)",
        "Single dose × 2/day × 14 days",
        "Days 1-14",
    )
}

fn s1(administration: &str) -> Drug {
    Drug::per_m2("S-1", "S-1", 40.0).given(administration, "Single dose × 2/day × 14 days", "Days 1-14")
}

fn irinotecan(mg_per_m2: f64, administration: &str) -> Drug {
    Drug::per_m2("Irinotecan", "IRI", mg_per_m2).given(administration, "Single dose, day 1", "Day 1")
}

fn carboplatin(administration: &str) -> Drug {
    Drug::target_auc("Carboplatin", "CBP", 5.0).given(administration, "AUC 5-6, day 1", "Day 1")
}

fn cisplatin(mg_per_m2: f64, method: &str, day: &str) -> Drug {
    Drug::per_m2("Cisplatin", "DDP", mg_per_m2).given("IV infusion", method, day)
}

fn etoposide() -> Drug {
    Drug::per_m2("Etoposide", "VP-16", 100.0).given("IV infusion", "Single dose, days 1-3", "Days 1-3")
}

fn gemcitabine() -> Drug {
    Drug::per_m2("Gemcitabine", "GEM", 1000.0).given(
        "IV infusion over 30 min",
        "Single dose, days 1 and 8",
        "Days 1, 8",
    )
}

fn oxaliplatin_neurotoxicity() -> RegimenWarning {
    warn(
        Warning,
        "Oxaliplatin neurotoxicity",
        "Avoid cold drinks and cold water; keep warm",
    )
}

fn cisplatin_hydration() -> RegimenWarning {
    warn(Warning, "Hydration", "Cisplatin requires adequate hydration")
}

fn concurrent_radiotherapy() -> RegimenWarning {
    warn(
        Info,
        "Concurrent radiotherapy",
        "Concurrent thoracic radiotherapy is advised for limited stage",
    )
}

pub(super) fn regimens() -> Vec<Regimen> {
    vec![
        // Colorectal, adjuvant
        Regimen {
            recommended_cycles: Some(12),
            drugs: vec![
                oxaliplatin(85.0, "IV infusion over 2 h"),
                leucovorin(),
                fluorouracil_bolus(),
                fluorouracil_infusion("46-48").with_note("1200 mg/m²/day × 2 days"),
            ],
            warnings: vec![
                oxaliplatin_neurotoxicity(),
                warn(Info, "Photosensitivity", "Fluorouracil may cause photosensitivity reactions"),
            ],
            contraindications: strings(&[
                "Hypersensitivity to oxaliplatin or other platinum compounds",
                "Severe bone marrow suppression",
                "Severe renal impairment",
            ]),
            ..base(
                "mfolfox6_adjuvant",
                "mFOLFOX6",
                "colorectal",
                "adjuvant",
                "Oxaliplatin + leucovorin + fluorouracil",
                2,
            )
        },
        Regimen {
            recommended_cycles: Some(8),
            drugs: vec![oxaliplatin(130.0, "IV infusion over 2 h"), capecitabine()],
            warnings: vec![
                oxaliplatin_neurotoxicity(),
                warn(
                    Info,
                    "Capecitabine",
                    "Take within 30 minutes after a meal",
                ),
            ],
            contraindications: strings(&[
                "Severe renal impairment",
                "Hypersensitivity to fluoropyrimidines",
            ]),
            ..base(
                "xelox_adjuvant",
                "XELOX",
                "colorectal",
                "adjuvant",
                "Oxaliplatin + capecitabine",
                3,
            )
        },
        Regimen {
            evidence_level: "2B".into(),
            recommended: false,
            drugs: vec![
                irinotecan(165.0, "IV infusion"),
                oxaliplatin(85.0, "IV infusion"),
                leucovorin().given("IV infusion", "Single dose, day 1", "Day 1"),
                fluorouracil_infusion("48").with_note("May be increased to 3200 mg/m²"),
            ],
            warnings: vec![
                warn(Danger, "Intensive regimen", "High toxicity; monitor blood counts closely"),
                warn(Warning, "Oxaliplatin neurotoxicity", "Avoid cold drinks and cold water"),
                warn(
                    Warning,
                    "Irinotecan",
                    "Watch for delayed diarrhea and cholinergic syndrome",
                ),
            ],
            contraindications: strings(&[
                "Severe bone marrow suppression",
                "Severe hepatic or renal impairment",
                "Use irinotecan with caution in UGT1A1*28 carriers",
            ]),
            ..base(
                "folfoxiri_adjuvant",
                "FOLFOXIRI",
                "colorectal",
                "adjuvant",
                "Irinotecan + oxaliplatin + leucovorin + fluorouracil",
                2,
            )
        },
        // Colorectal, first line
        Regimen {
            drugs: vec![
                oxaliplatin(85.0, "IV infusion over 2 h"),
                leucovorin(),
                fluorouracil_bolus(),
                fluorouracil_infusion("46-48"),
            ],
            warnings: vec![oxaliplatin_neurotoxicity()],
            ..base(
                "mfolfox6_firstline",
                "mFOLFOX6",
                "colorectal",
                "firstline",
                "Oxaliplatin + leucovorin + fluorouracil",
                2,
            )
        },
        Regimen {
            drugs: vec![oxaliplatin(130.0, "IV infusion over >2 h"), capecitabine()],
            warnings: vec![oxaliplatin_neurotoxicity()],
            ..base(
                "xelox_firstline",
                "XELOX (CAPEOX)",
                "colorectal",
                "firstline",
                "Oxaliplatin + capecitabine",
                3,
            )
        },
        Regimen {
            drugs: vec![
                irinotecan(180.0, "IV infusion over 30-90 min"),
                leucovorin(),
                fluorouracil_bolus(),
                fluorouracil_infusion("46-48").with_note("1200 mg/m²/day × 2 days"),
            ],
            warnings: vec![warn(
                Warning,
                "Delayed diarrhea",
                "Irinotecan may cause severe diarrhea that needs prompt treatment",
            )],
            contraindications: strings(&[
                "Chronic enteritis or bowel obstruction",
                "Hypersensitivity to irinotecan",
            ]),
            ..base(
                "folfiri",
                "FOLFIRI",
                "colorectal",
                "firstline",
                "Irinotecan + leucovorin + fluorouracil",
                2,
            )
        },
        // Non-small cell lung cancer
        Regimen {
            drugs: vec![
                Drug::per_m2("Pemetrexed", "PEM", 500.0).given(
                    "IV infusion over at least 10 min",
                    "Single dose, day 1",
                    "Day 1",
                ),
                carboplatin("IV infusion over 30-60 min"),
            ],
            warnings: vec![
                warn(
                    Info,
                    "Premedication",
                    "Corticosteroids and folic acid are required to prevent adverse reactions",
                ),
                warn(Info, "Carboplatin", "Calvert formula: dose = AUC × (Ccr + 25)"),
            ],
            contraindications: strings(&[
                "Hypersensitivity to pemetrexed or carboplatin",
                "Severe renal impairment (Ccr < 45 mL/min)",
            ]),
            ..base(
                "pp_carboplatin",
                "PP (carboplatin)",
                "nsclc",
                "firstline",
                "Pemetrexed + carboplatin",
                3,
            )
        },
        // Small cell lung cancer, limited stage
        Regimen {
            drugs: vec![
                cisplatin(75.0, "Single dose, day 1", "Day 1"),
                etoposide(),
            ],
            warnings: vec![cisplatin_hydration(), concurrent_radiotherapy()],
            ..base(
                "ep_limited_sclc",
                "EP",
                "sclc",
                "limited",
                "Cisplatin + etoposide",
                3,
            )
        },
        Regimen {
            recommended: false,
            drugs: vec![carboplatin("IV infusion"), etoposide()],
            warnings: vec![concurrent_radiotherapy()],
            ..base(
                "ec_limited_sclc",
                "EC",
                "sclc",
                "limited",
                "Carboplatin + etoposide",
                3,
            )
        },
        // Small cell lung cancer, extensive stage
        Regimen {
            drugs: vec![
                cisplatin(75.0, "Single dose, day 1", "Day 1"),
                etoposide(),
            ],
            warnings: vec![cisplatin_hydration()],
            ..base(
                "ep_extensive_sclc",
                "EP",
                "sclc",
                "extensive",
                "Cisplatin + etoposide",
                3,
            )
        },
        Regimen {
            drugs: vec![carboplatin("IV infusion"), etoposide()],
            ..base(
                "ec_extensive_sclc",
                "EC",
                "sclc",
                "extensive",
                "Carboplatin + etoposide",
                3,
            )
        },
        // Gastric, adjuvant
        Regimen {
            recommended_cycles: Some(8),
            drugs: vec![oxaliplatin(130.0, "IV infusion over 2 h"), capecitabine()],
            warnings: vec![warn(Warning, "Neurotoxicity", "Avoid cold exposure")],
            contraindications: strings(&[
                "Severe renal impairment",
                "Hypersensitivity to fluoropyrimidines",
            ]),
            ..base(
                "xelox_adjuvant_gastric",
                "XELOX",
                "gastric",
                "adjuvant",
                "Oxaliplatin + capecitabine",
                3,
            )
        },
        Regimen {
            recommended_cycles: Some(8),
            drugs: vec![
                oxaliplatin(130.0, "IV infusion over 2 h"),
                s1("Oral, twice daily (morning and evening)"),
            ],
            warnings: vec![warn(Warning, "Neurotoxicity", "Avoid cold exposure")],
            contraindications: strings(&["Severe renal impairment"]),
            ..base(
                "sox_adjuvant_gastric",
                "SOX",
                "gastric",
                "adjuvant",
                "Oxaliplatin + S-1",
                3,
            )
        },
        // Biliary tract cancer
        Regimen {
            drugs: vec![
                gemcitabine(),
                cisplatin(25.0, "Single dose, days 1 and 8", "Days 1, 8"),
            ],
            warnings: vec![cisplatin_hydration()],
            ..base(
                "gp_btc",
                "GP",
                "btc",
                "firstline",
                "Gemcitabine + cisplatin",
                3,
            )
        },
        Regimen {
            drugs: vec![
                gemcitabine(),
                s1("Oral, twice daily").with_note(
                    "Adjust by BSA: <1.25 m²: 60 mg/day, 1.25-1.5 m²: 80 mg/day, >1.5 m²: 100 mg/day",
                ),
            ],
            ..base(
                "gs_btc",
                "GS",
                "btc",
                "firstline",
                "Gemcitabine + S-1",
                3,
            )
        },
        Regimen {
            drugs: vec![gemcitabine(), oxaliplatin(100.0, "IV infusion over 2 h")],
            ..base(
                "gemox_btc",
                "GEMOX",
                "btc",
                "firstline",
                "Gemcitabine + oxaliplatin",
                3,
            )
        },
    ]
}
