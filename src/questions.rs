//! Daily status questionnaire, the static question bank.
//!
//! Nine sections, bilingual. Follow-up questions carry a `depends_on`
//! gate on an earlier yes/no answer. The bank is built once and never
//! mutated.

use std::sync::LazyLock;

use crate::models::{Dependency, LocalizedText, Question, QuestionKind, QuestionOption};

const fn text(he: &'static str, en: &'static str) -> LocalizedText {
    LocalizedText::new(he, en)
}

const fn opt(value: &'static str, he: &'static str, en: &'static str) -> QuestionOption {
    QuestionOption {
        value,
        label: text(he, en),
    }
}

fn no_yes() -> Vec<QuestionOption> {
    vec![opt("no", "לא", "No"), opt("yes", "כן", "Yes")]
}

fn gate(question_id: &'static str, required_value: &'static str) -> Option<Dependency> {
    Some(Dependency {
        question_id,
        required_value,
    })
}

const STAGE: LocalizedText = text("1. שלב המחלה", "1. Disease stage");
const COGNITIVE: LocalizedText = text(
    "2. מצב קוגניטיבי והתמצאות",
    "2. Cognitive state and orientation",
);
const COMMUNICATION: LocalizedText = text(
    "3. תקשורת ושיתוף פעולה",
    "3. Communication and cooperation",
);
const BEHAVIOUR: LocalizedText = text(
    "4. התנהגות ומצב רגשי",
    "4. Behaviour and emotional state",
);
const SLEEP: LocalizedText = text("5. שינה", "5. Sleep");
const PHYSICAL: LocalizedText = text(
    "6. מדדים פיזיים - אכילה, שתייה ולחץ דם",
    "6. Physical measures - eating, drinking and blood pressure",
);
const MEDICATIONS: LocalizedText = text("7. תרופות", "7. Medications");
const UNUSUAL_EVENT: LocalizedText = text("8. אירוע חריג", "8. Unusual event");
const FAMILY: LocalizedText = text("9. הערכת המשפחה", "9. Family assessment");

static DAILY_QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(build_daily_questions);

/// The daily questionnaire in presentation order.
pub fn daily_questions() -> &'static [Question] {
    &DAILY_QUESTIONS
}

/// Look up a question by id.
pub fn find_question(id: &str) -> Option<&'static Question> {
    daily_questions().iter().find(|q| q.id == id)
}

fn build_daily_questions() -> Vec<Question> {
    vec![
        // 1. Disease stage
        Question {
            id: "disease_stage",
            section: STAGE,
            title: text("באיזה שלב נמצאת המחלה?", "Stage of the disease"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![
                    opt("early", "שלב מוקדם", "Early"),
                    opt("moderate", "שלב בינוני", "Moderate"),
                    opt("advanced", "שלב מתקדם", "Advanced"),
                ],
            },
            depends_on: None,
        },
        // 2. Cognitive state
        Question {
            id: "cognitive_worsening",
            section: COGNITIVE,
            title: text("האם חלה החמרה לאחרונה?", "Has there been a recent worsening?"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "cognitive_severity",
            section: COGNITIVE,
            title: text("דרגי את חומרת ההחמרה (1-5)", "Rate severity (1-5)"),
            help: None,
            kind: QuestionKind::Scale { min: 1, max: 5 },
            depends_on: gate("cognitive_worsening", "yes"),
        },
        Question {
            id: "cognitive_symptoms",
            section: COGNITIVE,
            title: text("מה בלט בהחמרה?", "What stood out?"),
            help: Some(text("ניתן לבחור יותר מתשובה אחת", "Select all that apply")),
            kind: QuestionKind::MultiChoice {
                options: vec![
                    opt("names", "שכחת שמות", "Forgotten names"),
                    opt("repeating", "חזרה על שאלות", "Repeated questions"),
                    opt("confusion", "בלבול בזמן/מקום", "Confused about time/place"),
                    opt("recognition", "אי זיהוי בני משפחה", "Not recognizing family"),
                ],
            },
            depends_on: gate("cognitive_worsening", "yes"),
        },
        // 3. Communication
        Question {
            id: "comm_level",
            section: COMMUNICATION,
            title: text("רמת תקשורת", "Level of communication"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![
                    opt("normal", "תקינה יחסית", "Relatively normal"),
                    opt("low_understanding", "ירידה בהבנה", "Decreased understanding"),
                    opt("expression_diff", "קושי בביטוי", "Difficulty expressing"),
                    opt("no_comm", "היעדר תקשורת", "Lack of communication"),
                ],
            },
            depends_on: None,
        },
        Question {
            id: "cooperation_level",
            section: COMMUNICATION,
            title: text("רמת שיתוף פעולה בטיפול", "Level of cooperation in treatment"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![
                    opt("cooperates", "משתף/ת פעולה", "Cooperates"),
                    opt("partial", "משתף/ת חלקית", "Partially cooperates"),
                    opt("verbal_resist", "מתנגד/ת מילולית", "Verbally resists"),
                    opt("physical_resist", "מתנגד/ת פיזית", "Physically resists"),
                ],
            },
            depends_on: None,
        },
        // 4. Behaviour
        Question {
            id: "behavioral_signs",
            section: BEHAVIOUR,
            title: text("סימנים שהופיעו", "Signs that appeared"),
            help: Some(text("ניתן לבחור יותר מתשובה אחת", "Select all that apply")),
            kind: QuestionKind::MultiChoice {
                options: vec![
                    opt("unrest", "אי שקט", "Restlessness"),
                    opt("anxiety", "חרדה", "Anxiety"),
                    opt("verbal_agg", "תוקפנות מילולית", "Verbal aggression"),
                    opt("physical_agg", "תוקפנות פיזית", "Physical aggression"),
                ],
            },
            depends_on: None,
        },
        Question {
            id: "general_severity",
            section: BEHAVIOUR,
            title: text("דרגת חומרה כללית (1-5)", "General severity scale 1-5"),
            help: None,
            kind: QuestionKind::Scale { min: 1, max: 5 },
            depends_on: None,
        },
        Question {
            id: "evening_worsening",
            section: BEHAVIOUR,
            title: text("האם יש החמרה בשעות הערב?", "Is there a worsening in the evening?"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        // 5. Sleep
        Question {
            id: "sleep_hours",
            section: SLEEP,
            title: text("שעות שינה בלילה (מספר)", "Hours of sleep at night"),
            help: Some(text("מספר בין 0 ל-12", "A number between 0 and 12")),
            kind: QuestionKind::Number {
                min: Some(0.0),
                max: Some(12.0),
            },
            depends_on: None,
        },
        Question {
            id: "waking_up",
            section: SLEEP,
            title: text("האם היו יקיצות?", "Waking up"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "waking_times",
            section: SLEEP,
            title: text("כמה פעמים?", "How many times?"),
            help: Some(text("מספר בין 0 ל-12", "A number between 0 and 12")),
            kind: QuestionKind::Number {
                min: Some(0.0),
                max: Some(12.0),
            },
            depends_on: gate("waking_up", "yes"),
        },
        // 6. Physical measures
        Question {
            id: "eating_habit",
            section: PHYSICAL,
            title: text("אכילה", "Eating"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![
                    opt("normal", "כרגיל", "As usual"),
                    opt("slight_dec", "ירידה קלה", "Slight decrease"),
                    opt("sig_dec", "ירידה משמעותית", "Significant decrease"),
                    opt("refusal", "סירוב אכילה", "Refusal to eat"),
                ],
            },
            depends_on: None,
        },
        Question {
            id: "meals_count",
            section: PHYSICAL,
            title: text("מספר ארוחות היום", "Number of meals per day"),
            help: None,
            kind: QuestionKind::Number { min: None, max: None },
            depends_on: None,
        },
        Question {
            id: "needs_assistance",
            section: PHYSICAL,
            title: text("נדרש סיוע באכילה?", "Required assistance"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "drinking_habit",
            section: PHYSICAL,
            title: text("שתייה", "Drinking"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![
                    opt("normal", "כרגיל", "As usual"),
                    opt("less", "פחות מהרגיל", "Less than usual"),
                    opt("none", "כמעט ולא", "Almost none"),
                ],
            },
            depends_on: None,
        },
        Question {
            id: "water_amount",
            section: PHYSICAL,
            title: text("כמות משוערת (כוסות)", "Approximate amount (glasses)"),
            help: None,
            kind: QuestionKind::Number { min: None, max: None },
            depends_on: None,
        },
        Question {
            id: "dehydration_signs",
            section: PHYSICAL,
            title: text("סימני התייבשות", "Signs of dehydration"),
            help: Some(text("ניתן לבחור יותר מתשובה אחת", "Select all that apply")),
            kind: QuestionKind::MultiChoice {
                options: vec![
                    opt("dry_mouth", "יובש בפה", "Dry mouth"),
                    opt("low_urine", "מיעוט שתן", "Low urine output"),
                    opt("confusion", "בלבול מוגבר", "Increased confusion"),
                ],
            },
            depends_on: None,
        },
        Question {
            id: "bp_measured",
            section: PHYSICAL,
            title: text("לחץ דם נמדד היום?", "Blood pressure measured"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "bp_normal",
            section: PHYSICAL,
            title: text("האם תקין ביחס לשגרה?", "Is it normal compared to usual?"),
            help: None,
            kind: QuestionKind::SingleChoice {
                options: vec![opt("yes", "כן", "Yes"), opt("no", "לא", "No")],
            },
            depends_on: gate("bp_measured", "yes"),
        },
        Question {
            id: "bp_systolic",
            section: PHYSICAL,
            title: text("לחץ דם סיסטולי", "Systolic"),
            help: None,
            kind: QuestionKind::Number { min: None, max: None },
            depends_on: gate("bp_measured", "yes"),
        },
        Question {
            id: "bp_diastolic",
            section: PHYSICAL,
            title: text("לחץ דם דיאסטולי", "Diastolic"),
            help: None,
            kind: QuestionKind::Number { min: None, max: None },
            depends_on: gate("bp_measured", "yes"),
        },
        Question {
            id: "associated_symptoms",
            section: PHYSICAL,
            title: text("תסמינים נלווים", "Associated symptoms"),
            help: Some(text("ניתן לבחור יותר מתשובה אחת", "Select all that apply")),
            kind: QuestionKind::MultiChoice {
                options: vec![
                    opt("dizziness", "סחרחורת", "Dizziness"),
                    opt("fatigue", "עייפות חריגה", "Unusual fatigue"),
                    opt("headache", "כאב ראש", "Headache"),
                ],
            },
            depends_on: None,
        },
        // 7. Medications
        Question {
            id: "med_change",
            section: MEDICATIONS,
            title: text("האם בוצע שינוי תרופתי לאחרונה?", "Recent medication change?"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "med_change_days",
            section: MEDICATIONS,
            title: text("לפני כמה ימים?", "How many days ago?"),
            help: None,
            kind: QuestionKind::Number { min: None, max: None },
            depends_on: gate("med_change", "yes"),
        },
        Question {
            id: "new_med_signs",
            section: MEDICATIONS,
            title: text("האם הופיעו סימנים חדשים מאז?", "Have new signs appeared since?"),
            help: Some(text("ניתן לבחור יותר מתשובה אחת", "Select all that apply")),
            kind: QuestionKind::MultiChoice {
                options: vec![
                    opt("cog_det", "החמרה קוגניטיבית", "Cognitive deterioration"),
                    opt("sleepy", "ישנוניות", "Sleepiness"),
                    opt("unrest", "אי שקט", "Restlessness"),
                    opt("behavior", "שינוי התנהגותי", "Behavioral change"),
                ],
            },
            depends_on: gate("med_change", "yes"),
        },
        // 8. Unusual event
        Question {
            id: "unusual_event",
            section: UNUSUAL_EVENT,
            title: text("האם קרה אירוע חריג היום?", "Unusual event"),
            help: None,
            kind: QuestionKind::SingleChoice { options: no_yes() },
            depends_on: None,
        },
        Question {
            id: "unusual_event_desc",
            section: UNUSUAL_EVENT,
            title: text("תיאור קצר של האירוע", "Short description"),
            help: Some(text("מה קרה, מתי ואיך הסתיים", "What happened, when, and how it ended")),
            kind: QuestionKind::FreeText,
            depends_on: gate("unusual_event", "yes"),
        },
        // 9. Family assessment
        Question {
            id: "family_assessment",
            section: FAMILY,
            title: text(
                "עד כמה המצב חריג ביחס לשגרה? (1-10)",
                "How unusual is the situation (1-10)?",
            ),
            help: None,
            kind: QuestionKind::Scale { min: 1, max: 10 },
            depends_on: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bank_has_expected_size() {
        assert_eq!(daily_questions().len(), 31);
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = daily_questions().iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), daily_questions().len());
    }

    #[test]
    fn dependencies_point_to_earlier_choice_questions() {
        let bank = daily_questions();
        for (idx, q) in bank.iter().enumerate() {
            if let Some(dep) = &q.depends_on {
                let target = bank
                    .iter()
                    .position(|t| t.id == dep.question_id)
                    .unwrap_or_else(|| panic!("{} depends on unknown {}", q.id, dep.question_id));
                assert!(target < idx, "{} must come after {}", q.id, dep.question_id);
                assert!(bank[target].has_option(dep.required_value));
            }
        }
    }

    #[test]
    fn choice_questions_have_options() {
        for q in daily_questions() {
            match &q.kind {
                QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                    assert!(!options.is_empty(), "{} has no options", q.id)
                }
                _ => assert!(q.options().is_empty()),
            }
        }
    }

    #[test]
    fn bounds_are_ordered() {
        for q in daily_questions() {
            match q.kind {
                QuestionKind::Scale { min, max } => assert!(min < max, "{}", q.id),
                QuestionKind::Number { min: Some(min), max: Some(max) } => {
                    assert!(min < max, "{}", q.id)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn find_question_by_id() {
        let q = find_question("sleep_hours").unwrap();
        assert_eq!(q.kind, QuestionKind::Number { min: Some(0.0), max: Some(12.0) });
        assert!(find_question("nope").is_none());
    }

    #[test]
    fn severity_followups_gate_on_worsening() {
        for id in ["cognitive_severity", "cognitive_symptoms"] {
            let dep = find_question(id).unwrap().depends_on.clone().unwrap();
            assert_eq!(dep.question_id, "cognitive_worsening");
            assert_eq!(dep.required_value, "yes");
        }
    }
}
