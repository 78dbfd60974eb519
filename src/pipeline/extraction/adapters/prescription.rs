use std::sync::LazyLock;

use super::{section_items, DomainAdapter};
use crate::models::{Domain, DomainRecord, Medicine, PrescriptionRecord};
use crate::pipeline::extraction::fallback::Backfill;
use crate::pipeline::extraction::grammar::{
    loose, loose_value, strict, DomainGrammar, SectionGrammar,
};
use crate::pipeline::extraction::lines::{
    clean_field, decompose, strip_bullet, LineFilter, LineItem, SubFieldPattern,
};
use crate::pipeline::extraction::policy::ParsePolicy;
use crate::pipeline::extraction::section::extract_section_body;

pub const MEDICINES: &str = "medicines";
pub const DIAGNOSIS: &str = "diagnosis";
pub const DOCTOR_ADVICE: &str = "doctor_advice";

const DIAGNOSIS_WORDS: &str = r"Diagnosis(?:\s*/\s*Condition)?|Condition";
const ADVICE_WORDS: &str = r"Doctor['’]?s\s+Advice|Advice";

static GRAMMAR: LazyLock<DomainGrammar> = LazyLock::new(|| {
    DomainGrammar::new(vec![
        SectionGrammar::block(
            MEDICINES,
            vec![
                strict("🧾", r"(?:Prescribed\s+)?(?:Medicines?|Medications?)"),
                loose(r"(?:Prescribed\s+)?(?:Medicines?|Medications?)"),
            ],
        ),
        SectionGrammar::single_line(
            DIAGNOSIS,
            vec![strict("🔍", DIAGNOSIS_WORDS), loose_value(DIAGNOSIS_WORDS)],
        ),
        SectionGrammar::single_line(
            DOCTOR_ADVICE,
            vec![strict("📋", ADVICE_WORDS), loose_value(ADVICE_WORDS)],
        ),
    ])
});

/// `name – dosage` with an en or em dash, then with a spaced hyphen.
static MEDICINE_PATTERNS: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![
        SubFieldPattern::new("dashed", r"^(?P<name>.+?)\s*[–—]\s*(?P<dosage>.+)$"),
        SubFieldPattern::new("hyphenated", r"^(?P<name>.+?)\s+-\s+(?P<dosage>.+)$"),
    ]
});

static ALTERNATIVE: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![SubFieldPattern::new(
        "alternative",
        r"(?i)^(?:↪\x{FE0F}?\s*)?Alternative\s*:\s*(?P<alternative>.+)$",
    )]
});

static PRICE: LazyLock<Vec<SubFieldPattern>> = LazyLock::new(|| {
    vec![SubFieldPattern::new(
        "price",
        r"(?i)^(?:💰\s*)?Price\s*:\s*(?P<price>.+)$",
    )]
});

pub struct PrescriptionAdapter;

impl DomainAdapter for PrescriptionAdapter {
    fn domain(&self) -> Domain {
        Domain::Prescription
    }

    fn grammar(&self) -> &DomainGrammar {
        &GRAMMAR
    }

    fn parse(&self, text: &str, policy: &ParsePolicy) -> DomainRecord {
        DomainRecord::Prescription(parse_prescription(text, policy))
    }
}

/// Parse a prescription-image analysis into medicines, diagnosis and advice.
pub fn parse_prescription(text: &str, policy: &ParsePolicy) -> PrescriptionRecord {
    let grammar = &*GRAMMAR;
    let sentinels = &policy.sentinels;
    let mut backfill = Backfill::new();

    let medicines = medicine_items(text, grammar)
        .iter()
        .map(medicine_from_item)
        .collect();
    let medicines = backfill.list(MEDICINES, medicines, || Medicine {
        name: sentinels.medicine_name.clone(),
        dosage: None,
        alternative: None,
        price: None,
        is_fallback: true,
    });

    let diagnosis = backfill.scalar(
        DIAGNOSIS,
        inline_value(text, grammar, DIAGNOSIS),
        &sentinels.prescription_diagnosis,
    );
    let doctor_advice = backfill.scalar(
        DOCTOR_ADVICE,
        inline_value(text, grammar, DOCTOR_ADVICE),
        &sentinels.doctor_advice,
    );

    PrescriptionRecord {
        medicines,
        diagnosis,
        doctor_advice,
        fallback_fields: backfill.into_fields(),
    }
}

/// Bulleted medicines, or a single medicine written as an unbulleted block.
fn medicine_items(text: &str, grammar: &DomainGrammar) -> Vec<LineItem> {
    let items = section_items(text, grammar, MEDICINES, LineFilter::Bulleted);
    if !items.is_empty() {
        return items;
    }
    extract_section_body(text, MEDICINES, grammar)
        .and_then(|body| LineItem::from_block(&body))
        .filter(|item| !is_detail_line(&item.text))
        .into_iter()
        .collect()
}

fn is_detail_line(line: &str) -> bool {
    decompose(line, &ALTERNATIVE).pattern().is_some() || decompose(line, &PRICE).pattern().is_some()
}

fn medicine_from_item(item: &LineItem) -> Medicine {
    let parts = decompose(&item.text, &MEDICINE_PATTERNS);
    let name = parts
        .field("name")
        .map(clean_field)
        .unwrap_or_else(|| clean_field(&item.text));

    let mut alternative = None;
    let mut price = None;
    for detail in &item.details {
        // details may carry their own bullet when the model nests a list
        let detail = strip_bullet(detail).unwrap_or(detail.as_str());
        if alternative.is_none() {
            alternative = decompose(detail, &ALTERNATIVE).field("alternative").map(clean_field);
        }
        if price.is_none() {
            price = decompose(detail, &PRICE).field("price").map(clean_field);
        }
    }

    Medicine {
        name,
        dosage: parts.field("dosage").map(clean_field),
        alternative,
        price,
        is_fallback: false,
    }
}

fn inline_value(text: &str, grammar: &DomainGrammar, name: &str) -> Option<String> {
    extract_section_body(text, name, grammar)
        .map(|body| clean_field(strip_bullet(&body).unwrap_or(body.as_str())))
        .filter(|v| !v.is_empty())
}
