//! UI string table (Hebrew / English).

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{Language, LocalizedText};

const fn text(he: &'static str, en: &'static str) -> LocalizedText {
    LocalizedText::new(he, en)
}

const STRINGS: &[(&str, LocalizedText)] = &[
    ("appName", text("awareCare", "awareCare")),
    ("greeting", text("שלום למשפחה", "Hello Family")),
    ("subtitle", text("בואו נעקוב ביחד אחרי המצב היום", "Let's track the status together today")),
    // Menu
    ("home", text("בית", "Home")),
    ("quickView", text("מבט מהיר", "Quick View")),
    ("myDoctor", text("הרופא שלי", "My Doctor")),
    ("liveMedicalFile", text("תיק רפואי חי", "Live Medical File")),
    ("journal", text("יומן", "Journal")),
    ("statusAssessment", text("שאלון הערכת מצב", "Status Assessment")),
    ("tutorial", text("הדרכה", "Tutorial")),
    ("contactUs", text("צור קשר", "Contact Us")),
    ("infoAndGuidance", text("מידע רלוונטי", "Relevant Information")),
    ("personalArea", text("אזור אישי", "Personal Area")),
    // Medical file
    ("uploadDocs", text("העלאת מסמכים", "Upload Documents")),
    ("medications", text("תרופות ומרשמים", "Meds & Prescriptions")),
    ("visitSummaries", text("סיכומי ביקור והפניות", "Summaries & Referrals")),
    ("medHistory", text("היסטוריית תרופות", "Medication History")),
    ("questHistory", text("היסטוריית שאלונים", "Questionnaire History")),
    ("sensitivities", text("רגישות לתרופות", "Drug Sensitivities")),
    ("activeMeds", text("תרופות פעילות", "Active Medications")),
    ("stoppedMeds", text("תרופות שהופסקו", "Discontinued Meds")),
    ("psychogeriatrician", text("פסיכוגריאטר", "Psychogeriatrician")),
    ("familyDoctor", text("רופא משפחה", "Family Doctor")),
    (
        "summaryText1",
        text(
            "ביקור מעקב שגרתי. נצפתה יציבות קוגניטיבית. אין שינוי במינון תרופתי. מומלץ להמשיך מעקב לחץ דם בבית.",
            "Routine follow-up. Cognitive stability observed. No change in medication dosage. Continue home blood pressure monitoring recommended.",
        ),
    ),
    (
        "summaryText2",
        text(
            "תלונה על נדודי שינה. הומלץ על שינוי סביבת השינה והפחתת קפאין בערב.",
            "Complaint of insomnia. Recommended changing sleep environment and reducing caffeine in the evening.",
        ),
    ),
    ("penicillin", text("פניצילין", "Penicillin")),
    ("reactionRash", text("תגובה: פריחה עורית וקוצר נשימה", "Reaction: Skin rash and shortness of breath")),
    ("sulfa", text("סולפה", "Sulfa")),
    ("reactionNausea", text("תגובה: בחילות והקאות חריפות", "Reaction: Severe nausea and vomiting")),
    // Wizard
    ("vibeQuestion", text("איך המטופל/ת מרגיש/ה היום?", "How is the patient feeling today?")),
    ("vibeGood", text("מצוין, אין שינוי", "Great, no change")),
    ("vibeNotGood", text("לא כל כך טוב...", "Not so good...")),
    ("next", text("הבא", "Next")),
    ("confirmAndNext", text("אישור ומעבר לשאלה הבאה", "Confirm & Next")),
    ("back", text("חזור", "Back")),
    ("finish", text("סיום", "Finish")),
    ("save", text("שמור", "Save")),
    // Reports
    ("statusSnapshot", text("תיאור מצב יומי", "Daily Status Report")),
    ("reportNormal", text("דיווח תקין", "Status: Normal")),
    ("reportFull", text("דיווח מפורט", "Full Report")),
    ("analyzing", text("מנתח נתונים בבינה מלאכותית...", "AI is analyzing clinical data...")),
    ("doctorFeedback", text("תגובת פסיכוגריאטר", "Psychogeriatrician Response")),
    ("noData", text("טרם הוזנו נתונים.", "No data entered yet.")),
    ("videoCall", text("שיחת וידאו דחופה", "Urgent Video Call")),
    ("expedite", text("זירוז תור קיים", "Expedite Appointment")),
    // Journal and appointments
    ("appointments", text("זימון תור וביקורים", "Appointments")),
    ("todaysSchedule", text("לוח זמנים להיום", "Today's Schedule")),
    ("noEventsToday", text("אין אירועים להיום", "No events for today")),
    ("allDay", text("כל היום", "All day")),
    ("syncWithDoctor", text("סנכרון עם הרופא (יומן)", "Sync with Doctor (Calendar)")),
    ("eventNewMedStart", text("התחלת תרופה חדשה", "New medication start")),
    ("eventMedTime", text("זמן קבלת תרופות", "Medication time")),
    ("eventAppointment", text("זימון תור", "Appointment")),
];

static TABLE: LazyLock<HashMap<&'static str, LocalizedText>> =
    LazyLock::new(|| STRINGS.iter().copied().collect());

/// Look up a UI string. Unknown keys come back unchanged.
pub fn translate(key: &str, lang: Language) -> &str {
    match TABLE.get(key) {
        Some(text) => text.get(lang),
        None => key,
    }
}

/// The whole table for one language, for clients that render locally.
pub fn strings(lang: Language) -> HashMap<&'static str, &'static str> {
    STRINGS.iter().map(|(k, v)| (*k, v.get(lang))).collect()
}
