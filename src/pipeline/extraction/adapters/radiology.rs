use std::sync::LazyLock;

use super::{section_lines, DomainAdapter};
use crate::models::{Domain, DomainRecord, RadiologyResult};
use crate::pipeline::extraction::fallback::Backfill;
use crate::pipeline::extraction::grammar::{
    loose, loose_value, strict, DomainGrammar, SectionGrammar,
};
use crate::pipeline::extraction::lines::{strip_bullet, LineFilter};
use crate::pipeline::extraction::policy::ParsePolicy;
use crate::pipeline::extraction::section::extract_section_body;

pub const FINDINGS: &str = "findings";
pub const CONDITIONS: &str = "conditions";
pub const RECOMMENDED_TESTS: &str = "recommended_tests";
pub const IMPRESSION: &str = "impression";

const FINDINGS_WORDS: &str = r"(?:Radiological\s+)?Findings";
const CONDITION_WORDS: &str =
    r"(?:Possible\s+)?(?:Conditions?|Interpretation)(?:\s*/\s*Interpretation)?";
const TEST_WORDS: &str = r"(?:Recommended\s+)?(?:Follow[- ]?up\s+)?Tests?";
const IMPRESSION_WORDS: &str = r"(?:Radiologist(?:-Style)?\s+)?Impression(?:\s*\([^)\n]*\))?";

static GRAMMAR: LazyLock<DomainGrammar> = LazyLock::new(|| {
    DomainGrammar::new(vec![
        SectionGrammar::block(FINDINGS, vec![strict("✅", FINDINGS_WORDS), loose(FINDINGS_WORDS)]),
        SectionGrammar::block(
            CONDITIONS,
            vec![strict("🩺", CONDITION_WORDS), loose(CONDITION_WORDS)],
        ),
        SectionGrammar::block(
            RECOMMENDED_TESTS,
            vec![strict("🧪", TEST_WORDS), loose(TEST_WORDS)],
        ),
        SectionGrammar::block(
            IMPRESSION,
            vec![strict("📋", IMPRESSION_WORDS), loose_value(IMPRESSION_WORDS)],
        )
        .stopping_at_blank_line(),
    ])
});

pub struct RadiologyAdapter;

impl DomainAdapter for RadiologyAdapter {
    fn domain(&self) -> Domain {
        Domain::Radiology
    }

    fn grammar(&self) -> &DomainGrammar {
        &GRAMMAR
    }

    fn parse(&self, text: &str, policy: &ParsePolicy) -> DomainRecord {
        DomainRecord::Radiology(parse_radiology(text, policy))
    }
}

/// Parse an imaging analysis into findings, interpretation and impression.
pub fn parse_radiology(text: &str, policy: &ParsePolicy) -> RadiologyResult {
    let grammar = &*GRAMMAR;
    let sentinels = &policy.sentinels;
    let mut backfill = Backfill::new();

    let findings = section_lines(text, grammar, FINDINGS, LineFilter::Bulleted);
    let findings = backfill.list(FINDINGS, findings, || sentinels.radiology_finding.clone());

    let conditions = section_lines(text, grammar, CONDITIONS, LineFilter::Bulleted);
    let conditions = backfill.list(CONDITIONS, conditions, || {
        sentinels.radiology_condition.clone()
    });

    let recommended_tests = section_lines(text, grammar, RECOMMENDED_TESTS, LineFilter::Bulleted);
    let recommended_tests = backfill.list(RECOMMENDED_TESTS, recommended_tests, || {
        sentinels.radiology_test.clone()
    });

    let impression = backfill.scalar(
        IMPRESSION,
        impression_text(text, grammar),
        &sentinels.radiology_impression,
    );

    RadiologyResult {
        findings,
        conditions,
        recommended_tests,
        impression,
        fallback_fields: backfill.into_fields(),
    }
}

/// The impression block joined into one line. A stray bullet is dropped;
/// a horizontal rule closing the response is not part of it.
fn impression_text(text: &str, grammar: &DomainGrammar) -> Option<String> {
    let body = extract_section_body(text, IMPRESSION, grammar)?;
    let joined = body
        .lines()
        .map(|line| strip_bullet(line).unwrap_or(line.trim()))
        .filter(|line| !line.is_empty() && !line.chars().all(|c| c == '-'))
        .collect::<Vec<_>>()
        .join(" ");
    Some(joined)
}
