//! Drug interaction engine.
//!
//! A pure function over a static table of known interacting pairs. Each
//! entry names two drug tokens; a warning is emitted when two distinct
//! medications on the prescription match them (case-insensitive substring
//! match against the brand or generic name). The table is illustrative
//! pharmacy-workflow data, not a clinical reference.

use crate::model::{InteractionSeverity, InteractionWarning, Medication};

struct InteractionRule {
    drug_a: &'static str,
    drug_b: &'static str,
    severity: InteractionSeverity,
    description: &'static str,
    recommendation: &'static str,
}

const INTERACTION_RULES: &[InteractionRule] = &[
    InteractionRule {
        drug_a: "warfarin",
        drug_b: "aspirin",
        severity: InteractionSeverity::Major,
        description: "Concurrent use significantly increases bleeding risk",
        recommendation: "Monitor INR closely and watch for signs of bleeding",
    },
    InteractionRule {
        drug_a: "warfarin",
        drug_b: "ibuprofen",
        severity: InteractionSeverity::Major,
        description: "NSAIDs potentiate anticoagulation and irritate the GI tract",
        recommendation: "Prefer acetaminophen for pain relief",
    },
    InteractionRule {
        drug_a: "sildenafil",
        drug_b: "nitroglycerin",
        severity: InteractionSeverity::Critical,
        description: "Combined vasodilation can cause severe hypotension",
        recommendation: "Do not dispense together; contact the prescriber",
    },
    InteractionRule {
        drug_a: "simvastatin",
        drug_b: "clarithromycin",
        severity: InteractionSeverity::Critical,
        description: "CYP3A4 inhibition raises statin levels and rhabdomyolysis risk",
        recommendation: "Hold the statin for the duration of the antibiotic course",
    },
    InteractionRule {
        drug_a: "lisinopril",
        drug_b: "spironolactone",
        severity: InteractionSeverity::Moderate,
        description: "ACE inhibitor plus potassium-sparing diuretic risks hyperkalemia",
        recommendation: "Monitor serum potassium within one week of starting",
    },
    InteractionRule {
        drug_a: "fluoxetine",
        drug_b: "tramadol",
        severity: InteractionSeverity::Major,
        description: "Serotonergic combination raises serotonin syndrome risk",
        recommendation: "Counsel the patient on early symptoms; consider alternatives",
    },
    InteractionRule {
        drug_a: "digoxin",
        drug_b: "amiodarone",
        severity: InteractionSeverity::Major,
        description: "Amiodarone reduces digoxin clearance, risking toxicity",
        recommendation: "Reduce the digoxin dose and monitor serum levels",
    },
    InteractionRule {
        drug_a: "lithium",
        drug_b: "ibuprofen",
        severity: InteractionSeverity::Moderate,
        description: "NSAIDs reduce renal lithium clearance",
        recommendation: "Monitor lithium levels; prefer acetaminophen",
    },
    InteractionRule {
        drug_a: "levothyroxine",
        drug_b: "calcium",
        severity: InteractionSeverity::Minor,
        description: "Calcium impairs levothyroxine absorption",
        recommendation: "Separate administration by at least four hours",
    },
    InteractionRule {
        drug_a: "metformin",
        drug_b: "cimetidine",
        severity: InteractionSeverity::Moderate,
        description: "Cimetidine reduces metformin elimination",
        recommendation: "Consider an alternative H2 antagonist",
    },
];

/// Screens a medication list against the interaction table. Pure: no
/// side effects, no ordering guarantee, each matched rule reported once.
///
/// O(patterns x medications^2), acceptable because both are small.
pub fn check_interactions(medications: &[Medication]) -> Vec<InteractionWarning> {
    let mut warnings = Vec::new();
    if medications.len() < 2 {
        return warnings;
    }

    for rule in INTERACTION_RULES {
        if let Some((first, second)) = find_pair(medications, rule.drug_a, rule.drug_b) {
            warnings.push(InteractionWarning {
                drug_a: first.name.clone(),
                drug_b: second.name.clone(),
                severity: rule.severity,
                description: rule.description.to_string(),
                recommendation: rule.recommendation.to_string(),
            });
        }
    }

    warnings
}

/// Finds two distinct medications matching the rule's tokens.
fn find_pair<'a>(
    medications: &'a [Medication],
    token_a: &str,
    token_b: &str,
) -> Option<(&'a Medication, &'a Medication)> {
    for (i, first) in medications.iter().enumerate() {
        if !name_matches(first, token_a) {
            continue;
        }
        for (j, second) in medications.iter().enumerate() {
            if i != j && name_matches(second, token_b) {
                return Some((first, second));
            }
        }
    }
    None
}

fn name_matches(medication: &Medication, token: &str) -> bool {
    medication.name.to_lowercase().contains(token)
        || medication
            .generic_name
            .as_deref()
            .map_or(false, |g| g.to_lowercase().contains(token))
}
