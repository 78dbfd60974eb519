use std::sync::LazyLock;

use super::{section_items, section_lines, DomainAdapter};
use crate::models::{
    Condition, Confidence, DiagnosisRecord, Domain, DomainRecord, Level, Test, Treatment,
};
use crate::pipeline::extraction::fallback::Backfill;
use crate::pipeline::extraction::grammar::{loose, strict, DomainGrammar, SectionGrammar};
use crate::pipeline::extraction::lines::{clean_field, decompose, LineFilter, LineItem, SubFieldPattern};
use crate::pipeline::extraction::policy::ParsePolicy;

pub const CONDITIONS: &str = "conditions";
pub const TESTS: &str = "tests";
pub const TREATMENTS: &str = "treatments";
pub const WARNING_SIGNS: &str = "warning_signs";
pub const REASONING: &str = "reasoning";

const CONDITION_WORDS: &str = r"(?:Possible\s+)?(?:Condition\s*\(s\)|Conditions?)";
const TEST_WORDS: &str = r"(?:Recommended\s+)?(?:Diagnostic\s+)?Tests?";
const TREATMENT_WORDS: &str = r"Treatments?(?:\s+(?:Recommendations?|Options|Plan))?";
const WARNING_WORDS: &str = r"When\s+to\s+See\s+(?:a\s+)?Doctor|Warning\s+Signs?";
const REASONING_WORDS: &str = r"(?:Medical\s+)?Reasoning";

/// Medical reasoning accepts prose lines as well as bullets.
const REASONING_FILTER: LineFilter = LineFilter::Prose {
    min_unbulleted_chars: 10,
    min_item_chars: 5,
};

static GRAMMAR: LazyLock<DomainGrammar> = LazyLock::new(|| {
    DomainGrammar::new(vec![
        SectionGrammar::block(
            CONDITIONS,
            vec![strict("✅", CONDITION_WORDS), loose(CONDITION_WORDS)],
        ),
        SectionGrammar::block(TESTS, vec![strict("🧪", TEST_WORDS), loose(TEST_WORDS)]),
        SectionGrammar::block(
            TREATMENTS,
            vec![strict("💊", TREATMENT_WORDS), loose(TREATMENT_WORDS)],
        ),
        SectionGrammar::block(
            WARNING_SIGNS,
            vec![strict("🚨", WARNING_WORDS), loose(WARNING_WORDS)],
        )
        .stopping_at_blank_line(),
        SectionGrammar::block(
            REASONING,
            vec![strict("🧠", REASONING_WORDS), loose(REASONING_WORDS)],
        )
        .stopping_at_blank_line(),
    ])
});

/// `name - Confidence: Level (pct%)`, then `Level (pct)` without the sign,
/// then `name - Confidence: Level`.
static CONDITION_PATTERNS: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![
        SubFieldPattern::new(
            "confidence_with_percentage",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Confidence\s*:?\s*(?P<level>[A-Za-z]+)\s*\(?\s*(?P<percentage>\d{1,3})\s*%",
        ),
        SubFieldPattern::new(
            "confidence_with_bare_number",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Confidence\s*:?\s*(?P<level>[A-Za-z]+)\s*\(\s*(?P<percentage>\d{1,3})\s*\)",
        ),
        SubFieldPattern::new(
            "confidence_level",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Confidence\s*:?\s*(?P<level>[A-Za-z]+)",
        ),
    ]
});

static CONDITION_DETAIL_PATTERNS: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![SubFieldPattern::new(
        "reasoning",
        r"(?i)^(?:[-–—]\s*)?Reasoning\s*:\s*(?P<reasoning>.+)$",
    )]
});

/// `name - Purpose: p - Urgency: u`, then either half alone.
static TEST_PATTERNS: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![
        SubFieldPattern::new(
            "purpose_and_urgency",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Purpose\s*:\s*(?P<purpose>.*?)\s*[-–—]\s*Urgency\s*:\s*(?P<urgency>[A-Za-z]+)",
        ),
        SubFieldPattern::new(
            "purpose",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Purpose\s*:\s*(?P<purpose>.+)$",
        ),
        SubFieldPattern::new(
            "urgency",
            r"(?i)^(?P<name>.+?)\s*[-–—]\s*Urgency\s*:\s*(?P<urgency>[A-Za-z]+)",
        ),
    ]
});

/// `action - explanation`, split at the first spaced dash so hyphenated
/// words stay whole.
static TREATMENT_PATTERNS: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![SubFieldPattern::new(
        "explained",
        r"^(?P<action>.+?)\s+[-–—]\s+(?P<explanation>.+)$",
    )]
});

pub struct DiagnosisAdapter;

impl DomainAdapter for DiagnosisAdapter {
    fn domain(&self) -> Domain {
        Domain::Diagnosis
    }

    fn grammar(&self) -> &DomainGrammar {
        &GRAMMAR
    }

    fn parse(&self, text: &str, policy: &ParsePolicy) -> DomainRecord {
        DomainRecord::Diagnosis(parse_diagnosis(text, policy))
    }
}

/// Parse a symptom-analysis response into a diagnosis record.
pub fn parse_diagnosis(text: &str, policy: &ParsePolicy) -> DiagnosisRecord {
    let grammar = &*GRAMMAR;
    let sentinels = &policy.sentinels;
    let mut backfill = Backfill::new();

    let conditions = section_items(text, grammar, CONDITIONS, LineFilter::Bulleted)
        .iter()
        .map(|item| condition_from_item(item, policy))
        .collect();
    let conditions = backfill.list(CONDITIONS, conditions, || Condition {
        name: sentinels.condition_name.clone(),
        confidence: Confidence {
            level: sentinels.condition_level,
            percentage: None,
        },
        reasoning: sentinels.condition_reasoning.clone(),
        is_fallback: true,
    });

    let tests = section_items(text, grammar, TESTS, LineFilter::Bulleted)
        .iter()
        .map(|item| test_from_line(&item.text, policy))
        .collect();
    let tests = backfill.list(TESTS, tests, || Test {
        name: sentinels.test_name.clone(),
        purpose: None,
        urgency: sentinels.test_urgency,
        is_fallback: true,
    });

    let treatments = section_items(text, grammar, TREATMENTS, LineFilter::Bulleted)
        .iter()
        .map(|item| treatment_from_line(&item.text))
        .collect();
    let treatments = backfill.list(TREATMENTS, treatments, || Treatment {
        action: sentinels.treatment_action.clone(),
        explanation: None,
        is_fallback: true,
    });

    let warning_signs = section_lines(text, grammar, WARNING_SIGNS, LineFilter::Bulleted);
    let warning_signs = backfill.list(WARNING_SIGNS, warning_signs, || {
        sentinels.warning_sign.clone()
    });

    let reasoning = section_lines(text, grammar, REASONING, REASONING_FILTER);
    let reasoning = backfill.list(REASONING, reasoning, || sentinels.reasoning.clone());

    DiagnosisRecord {
        conditions,
        tests,
        treatments,
        warning_signs,
        reasoning,
        fallback_fields: backfill.into_fields(),
    }
}

fn condition_from_item(item: &LineItem, policy: &ParsePolicy) -> Condition {
    let parts = decompose(&item.text, &CONDITION_PATTERNS);

    let (name, confidence) = match parts.field("name") {
        Some(name) => {
            let level = parts
                .field("level")
                .map(|l| Level::parse_or(l, policy.default_confidence))
                .unwrap_or(policy.default_confidence);
            let percentage = parts
                .field("percentage")
                .and_then(|p| p.parse::<u16>().ok())
                .map(|p| p.min(100) as u8);
            (clean_field(name), Confidence { level, percentage })
        }
        None => (
            clean_field(&item.text),
            Confidence {
                level: policy.default_confidence,
                percentage: None,
            },
        ),
    };

    let reasoning = item
        .details
        .iter()
        .find_map(|detail| {
            decompose(detail, &CONDITION_DETAIL_PATTERNS)
                .field("reasoning")
                .map(clean_field)
        })
        .unwrap_or_else(|| policy.implicit_reasoning.clone());

    Condition {
        name,
        confidence,
        reasoning,
        is_fallback: false,
    }
}

fn test_from_line(line: &str, policy: &ParsePolicy) -> Test {
    let parts = decompose(line, &TEST_PATTERNS);
    let name = parts.field("name").map(clean_field).unwrap_or_else(|| clean_field(line));
    let urgency = parts
        .field("urgency")
        .map(|u| Level::parse_or(u, policy.default_urgency))
        .unwrap_or(policy.default_urgency);

    Test {
        name,
        purpose: parts.field("purpose").map(clean_field),
        urgency,
        is_fallback: false,
    }
}

fn treatment_from_line(line: &str) -> Treatment {
    let parts = decompose(line, &TREATMENT_PATTERNS);
    Treatment {
        action: parts.field("action").map(clean_field).unwrap_or_else(|| clean_field(line)),
        explanation: parts.field("explanation").map(clean_field),
        is_fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DiagnosisRecord {
        parse_diagnosis(text, &ParsePolicy::default())
    }

    fn comprehensive_response() -> &'static str {
        "---\n\n\
✅ **Possible Condition(s):**\n\
• Migraine - Confidence: High (75%)\n  \
Reasoning: Unilateral throbbing headache with photophobia\n\
• Tension headache - Confidence: Medium\n  \
Reasoning: Stress-related, bilateral pressure\n\
\n\
🧪 **Recommended Tests:**\n\
• Blood pressure check - Purpose: rule out hypertension - Urgency: Medium\n\
• MRI brain - Purpose: exclude structural causes - Urgency: Low\n\
\n\
💊 **Treatment Recommendations:**\n\
• Rest in a dark room - Reduces light sensitivity\n\
• Over-the-counter analgesics\n\
\n\
🚨 **When to See a Doctor:**\n\
• Sudden severe headache\n\
• Vision loss\n\
\n\
🧠 **Medical Reasoning:**\n\
• Age consideration → Migraine peaks in middle age\n\
• Medication consideration → No interacting drugs listed\n\
\n---\n"
    }

    #[test]
    fn parses_comprehensive_template() {
        let record = parse(comprehensive_response());
        assert!(record.fallback_fields.is_empty(), "{:?}", record.fallback_fields);

        assert_eq!(record.conditions.len(), 2);
        assert_eq!(record.conditions[0].name, "Migraine");
        assert_eq!(record.conditions[0].confidence.level, Level::High);
        assert_eq!(record.conditions[0].confidence.percentage, Some(75));
        assert_eq!(
            record.conditions[0].reasoning,
            "Unilateral throbbing headache with photophobia"
        );
        assert_eq!(record.conditions[1].name, "Tension headache");
        assert_eq!(record.conditions[1].confidence.level, Level::Medium);
        assert_eq!(record.conditions[1].confidence.percentage, None);

        assert_eq!(record.tests.len(), 2);
        assert_eq!(record.tests[1].name, "MRI brain");
        assert_eq!(record.tests[1].purpose.as_deref(), Some("exclude structural causes"));
        assert_eq!(record.tests[1].urgency, Level::Low);

        assert_eq!(record.treatments[0].action, "Rest in a dark room");
        assert_eq!(
            record.treatments[0].explanation.as_deref(),
            Some("Reduces light sensitivity")
        );
        assert_eq!(record.treatments[1].action, "Over-the-counter analgesics");
        assert_eq!(record.treatments[1].explanation, None);

        assert_eq!(record.warning_signs, vec!["Sudden severe headache", "Vision loss"]);
        assert_eq!(record.reasoning.len(), 2);
        assert!(record.reasoning[0].starts_with("Age consideration →"));
    }

    #[test]
    fn confidence_decomposition_with_percentage() {
        let record = parse("✅ Possible Condition(s):\n• Flu - Confidence: High (82%)");
        let flu = &record.conditions[0];
        assert_eq!(flu.name, "Flu");
        assert_eq!(flu.confidence.level, Level::High);
        assert_eq!(flu.confidence.percentage, Some(82));
        assert_eq!(flu.reasoning, "Based on symptom analysis");
        assert!(!flu.is_fallback);
    }

    #[test]
    fn percentage_never_fabricated() {
        let record = parse("✅ Conditions:\n• Flu - Confidence: Low\n• Cold");
        assert_eq!(record.conditions[0].confidence.level, Level::Low);
        assert_eq!(record.conditions[0].confidence.percentage, None);
        assert_eq!(record.conditions[1].name, "Cold");
        assert_eq!(record.conditions[1].confidence.level, Level::Medium);
        assert_eq!(record.conditions[1].confidence.percentage, None);
    }

    #[test]
    fn parenthesised_percentage_without_sign() {
        let record = parse("✅ Conditions:\n• Flu - Confidence: High (82)");
        assert_eq!(record.conditions[0].name, "Flu");
        assert_eq!(record.conditions[0].confidence.level, Level::High);
        assert_eq!(record.conditions[0].confidence.percentage, Some(82));
    }

    #[test]
    fn percentage_clamped_to_hundred() {
        let record = parse("✅ Conditions:\n• Flu - Confidence: High (150%)");
        assert_eq!(record.conditions[0].confidence.percentage, Some(100));
    }

    #[test]
    fn unknown_level_word_uses_default() {
        let record = parse("✅ Conditions:\n• Flu - Confidence: Uncertain");
        assert_eq!(record.conditions[0].name, "Flu");
        assert_eq!(record.conditions[0].confidence.level, Level::Medium);
    }

    #[test]
    fn test_line_variants() {
        let record = parse(
            "🧪 Tests:\n\
• CBC - Purpose: rule out infection - Urgency: high\n\
• Chest X-ray - Purpose: check lungs\n\
• Throat swab - Urgency: Low\n\
• Urinalysis",
        );
        let t = &record.tests;
        assert_eq!((t[0].name.as_str(), t[0].urgency), ("CBC", Level::High));
        assert_eq!(t[1].name, "Chest X-ray");
        assert_eq!(t[1].purpose.as_deref(), Some("check lungs"));
        assert_eq!(t[1].urgency, Level::Medium);
        assert_eq!((t[2].name.as_str(), t[2].urgency), ("Throat swab", Level::Low));
        assert_eq!(t[2].purpose, None);
        assert_eq!(t[3].name, "Urinalysis");
        assert_eq!(t[3].urgency, Level::Medium);
    }

    #[test]
    fn absent_tests_section_falls_back() {
        let record = parse("✅ Possible Condition(s):\n• Flu - Confidence: High (82%)");
        assert_eq!(record.tests.len(), 1);
        assert!(record.tests[0].is_fallback);
        assert_eq!(
            record.tests[0].name,
            "Consult healthcare provider for appropriate testing"
        );
        assert!(record.fallback_fields.contains(&TESTS.to_string()));
        assert!(!record.fallback_fields.contains(&CONDITIONS.to_string()));
    }

    #[test]
    fn empty_text_is_fully_sentineled() {
        let record = parse("");
        assert_eq!(
            record.fallback_fields,
            vec![CONDITIONS, TESTS, TREATMENTS, WARNING_SIGNS, REASONING]
        );
        assert_eq!(record.conditions[0].name, "Further evaluation needed");
        assert_eq!(record.conditions[0].confidence.level, Level::Low);
        assert_eq!(
            record.conditions[0].reasoning,
            "Unable to determine specific condition from provided symptoms"
        );
        assert_eq!(
            record.warning_signs,
            vec!["Seek immediate medical attention if symptoms worsen"]
        );
    }

    #[test]
    fn present_section_without_bullets_falls_back() {
        let record = parse("💊 Treatment Recommendations:\nJust rest for now.");
        assert_eq!(record.treatments.len(), 1);
        assert!(record.treatments[0].is_fallback);
    }

    #[test]
    fn loose_headers_used_without_markers() {
        let record = parse(
            "Possible Condition(s):\n• Sinusitis\nTests:\n• Nasal endoscopy\nTreatment:\n• Saline rinse - clears mucus",
        );
        assert_eq!(record.conditions[0].name, "Sinusitis");
        assert_eq!(record.tests[0].name, "Nasal endoscopy");
        assert_eq!(record.treatments[0].action, "Saline rinse");
    }

    #[test]
    fn warnings_do_not_swallow_reasoning_without_blank_line() {
        let record = parse(
            "🚨 When to See a Doctor:\n• High fever\n🧠 Medical Reasoning:\n• Fever suggests infection",
        );
        assert_eq!(record.warning_signs, vec!["High fever"]);
        assert_eq!(record.reasoning, vec!["Fever suggests infection"]);
    }

    #[test]
    fn reasoning_accepts_prose_lines() {
        let record = parse("🧠 Reasoning:\nSymptoms point towards a viral cause.\nok");
        assert_eq!(record.reasoning, vec!["Symptoms point towards a viral cause."]);
    }

    #[test]
    fn nested_reasoning_line_is_not_a_section_header() {
        let record = parse(
            "Condition(s):\n• Flu - Confidence: High (80%)\n  Reasoning: fever and aches\n• Cold - Confidence: Low (20%)",
        );
        assert_eq!(record.conditions.len(), 2);
        assert_eq!(record.conditions[0].reasoning, "fever and aches");
        assert_eq!(record.conditions[1].reasoning, "Based on symptom analysis");
        assert!(record.fallback_fields.contains(&REASONING.to_string()));
    }

    #[test]
    fn bullet_reading_like_a_header_stays_in_its_section() {
        let record = parse(
            "✅ Possible Condition(s):\n• Flu\n• Tests\n• Cold\n🧪 Recommended Tests:\n• CBC",
        );
        let names: Vec<&str> = record.conditions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Flu", "Tests", "Cold"]);
        assert_eq!(record.tests[0].name, "CBC");
    }

    #[test]
    fn policy_defaults_are_configurable() {
        let policy = ParsePolicy {
            default_confidence: Level::Low,
            default_urgency: Level::High,
            implicit_reasoning: "n/a".into(),
            ..ParsePolicy::default()
        };
        let record = parse_diagnosis("✅ Conditions:\n• Flu\n🧪 Tests:\n• CBC", &policy);
        assert_eq!(record.conditions[0].confidence.level, Level::Low);
        assert_eq!(record.conditions[0].reasoning, "n/a");
        assert_eq!(record.tests[0].urgency, Level::High);
    }

    #[test]
    fn bold_names_are_cleaned() {
        let record = parse("✅ Conditions:\n• **Flu** - Confidence: High (82%)");
        assert_eq!(record.conditions[0].name, "Flu");
    }
}
