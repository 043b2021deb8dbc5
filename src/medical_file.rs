//! Read-only sections of the medical file: visit summaries and drug
//! sensitivities. Text comes from the string table, so both languages
//! stay in one place.

use serde::Serialize;

use crate::i18n::translate;
use crate::models::Language;

struct Visit {
    date: &'static str,
    doctor_key: &'static str,
    summary_key: &'static str,
}

struct Sensitivity {
    name_key: &'static str,
    reaction_key: &'static str,
}

// Newest first.
const VISITS: &[Visit] = &[
    Visit {
        date: "15/01/2024",
        doctor_key: "psychogeriatrician",
        summary_key: "summaryText1",
    },
    Visit {
        date: "02/12/2023",
        doctor_key: "familyDoctor",
        summary_key: "summaryText2",
    },
];

const SENSITIVITIES: &[Sensitivity] = &[
    Sensitivity {
        name_key: "penicillin",
        reaction_key: "reactionRash",
    },
    Sensitivity {
        name_key: "sulfa",
        reaction_key: "reactionNausea",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitSummary {
    /// `DD/MM/YYYY`, as written on the clinic letter.
    pub date: &'static str,
    pub doctor: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugSensitivity {
    pub name: String,
    pub reaction: String,
}

pub fn visit_summaries(lang: Language) -> Vec<VisitSummary> {
    VISITS
        .iter()
        .map(|v| VisitSummary {
            date: v.date,
            doctor: translate(v.doctor_key, lang).to_string(),
            summary: translate(v.summary_key, lang).to_string(),
        })
        .collect()
}

pub fn drug_sensitivities(lang: Language) -> Vec<DrugSensitivity> {
    SENSITIVITIES
        .iter()
        .map(|s| DrugSensitivity {
            name: translate(s.name_key, lang).to_string(),
            reaction: translate(s.reaction_key, lang).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_are_localized() {
        let en = visit_summaries(Language::En);
        assert_eq!(en.len(), 2);
        assert_eq!(en[0].date, "15/01/2024");
        assert_eq!(en[0].doctor, "Psychogeriatrician");
        assert!(en[0].summary.starts_with("Routine follow-up."));
        assert_eq!(en[1].doctor, "Family Doctor");

        let he = visit_summaries(Language::He);
        assert_eq!(he[1].doctor, "רופא משפחה");
    }

    #[test]
    fn sensitivities_are_localized() {
        let en = drug_sensitivities(Language::En);
        assert_eq!(
            en,
            vec![
                DrugSensitivity {
                    name: "Penicillin".into(),
                    reaction: "Reaction: Skin rash and shortness of breath".into(),
                },
                DrugSensitivity {
                    name: "Sulfa".into(),
                    reaction: "Reaction: Severe nausea and vomiting".into(),
                },
            ]
        );
        assert_eq!(drug_sensitivities(Language::He)[0].name, "פניצילין");
    }

    #[test]
    fn every_key_is_in_the_string_table() {
        let keys = VISITS
            .iter()
            .flat_map(|v| [v.doctor_key, v.summary_key])
            .chain(SENSITIVITIES.iter().flat_map(|s| [s.name_key, s.reaction_key]));
        for key in keys {
            assert_ne!(translate(key, Language::En), key, "missing {key}");
        }
    }
}
