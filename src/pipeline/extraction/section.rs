use std::sync::LazyLock;

use regex::Regex;

use super::grammar::{BodyShape, DomainGrammar, PatternKind, SectionGrammar};

/// A blank line: newline, optional spaces/tabs, newline.
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

/// A section located in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: &'static str,
    /// Position of the winning pattern in the section's try-order.
    pub pattern_index: usize,
    pub kind: PatternKind,
    /// Trimmed body. May be empty when the header is present with nothing under it.
    pub body: String,
}

/// Locate one section of `text`.
///
/// Patterns are tried strictly in order and the first one that matches
/// anywhere in the text wins, even when a later pattern would match earlier
/// in the text. The body runs from the end of the header to the earliest of:
/// another section's header, a blank line (when the section stops there),
/// or the end of the text.
pub fn extract_section(
    text: &str,
    section: &SectionGrammar,
    grammar: &DomainGrammar,
) -> Option<Section> {
    let (pattern_index, pattern, header) = section
        .patterns
        .iter()
        .enumerate()
        .find_map(|(i, p)| p.header.find(text).map(|m| (i, p, m)))?;

    let start = header.end();
    let mut end = text.len();

    for boundary in grammar.boundaries_for(section.name) {
        if let Some(m) = boundary.find_at(text, start) {
            end = end.min(m.start());
        }
    }
    if section.stop_at_blank_line {
        if let Some(m) = BLANK_LINE.find_at(text, start) {
            end = end.min(m.start());
        }
    }

    let raw = &text[start..end.max(start)];
    let body = match section.shape {
        BodyShape::Block => raw.trim(),
        BodyShape::SingleLine => raw.lines().next().unwrap_or("").trim(),
    };

    tracing::debug!(
        section = section.name,
        pattern_index,
        kind = ?pattern.kind,
        body_chars = body.chars().count(),
        "Section located"
    );

    Some(Section {
        name: section.name,
        pattern_index,
        kind: pattern.kind,
        body: body.to_string(),
    })
}

/// Body of section `name`, or `None` when no header form matched (or the
/// grammar has no such section).
pub fn extract_section_body(text: &str, name: &str, grammar: &DomainGrammar) -> Option<String> {
    let section = grammar.section(name)?;
    match extract_section(text, section, grammar) {
        Some(found) => Some(found.body),
        None => {
            tracing::debug!(section = name, "Section absent");
            None
        }
    }
}
