//! Header grammar shared by every domain.
//!
//! A section is announced by a header. Each section lists its header
//! patterns in try-order: a strict form that requires the section's marker
//! glyph, then a loose form made of header words only. Both tolerate the
//! markdown emphasis the model likes to add (`✅ **Possible Condition(s):**`).

use regex::Regex;
use serde::Serialize;

/// Spaces and optional `**`/`__` between a marker and the header words.
const EMPHASIS: &str = r"[ \t]*(?:\*\*|__)?[ \t]*";

/// After the header words: optional colon inside or outside the emphasis,
/// then any whitespace (newlines included) before the body.
const TAIL: &str = r"[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?\s*";

/// Like `TAIL`, but the header must be the only thing on its line.
const LINE_END_TAIL: &str = r"[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\*\*|__)?[ \t]*$\s*";

/// Like `TAIL`, but requires a colon unless the header ends its line,
/// so a value may follow on the same line.
const VALUE_TAIL: &str = r"[ \t]*(?:\*\*|__)?[ \t]*(?::|$)[ \t]*(?:\*\*|__)?\s*";

/// Start of line plus decoration that is not a word: numbering (`2.`),
/// `#`, doubled `**`/`__`, emoji. Bullet glyphs are excluded so a list
/// item never reads as a header.
const LINE_PREFIX: &str =
    r"^[ \t]*(?:\d+[.)][ \t]*|#+[ \t]*|(?:\*\*|__)[ \t]*|[^\p{L}\p{N}\s•*\-][ \t]*){0,6}";

/// Which form of a section header matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Marker glyph plus header words.
    Strict,
    /// Header words only, anchored to the start of a line.
    Loose,
}

/// What part of the text after a header forms the section body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Everything up to the next known header.
    Block,
    /// Only the first line after the header.
    SingleLine,
}

/// One candidate header form for a section.
#[derive(Debug, Clone)]
pub struct SectionPattern {
    pub kind: PatternKind,
    pub header: Regex,
}

/// A logical section: its header forms in try-order and how its body ends.
#[derive(Debug, Clone)]
pub struct SectionGrammar {
    pub name: &'static str,
    pub patterns: Vec<SectionPattern>,
    /// End the body at the first blank line as well as at the next header.
    pub stop_at_blank_line: bool,
    pub shape: BodyShape,
}

/// Every section a domain knows about. Any section's header bounds the
/// body of every other section.
#[derive(Debug, Clone)]
pub struct DomainGrammar {
    pub sections: Vec<SectionGrammar>,
}

impl SectionGrammar {
    pub fn block(name: &'static str, patterns: Vec<SectionPattern>) -> Self {
        Self {
            name,
            patterns,
            stop_at_blank_line: false,
            shape: BodyShape::Block,
        }
    }

    pub fn single_line(name: &'static str, patterns: Vec<SectionPattern>) -> Self {
        Self {
            shape: BodyShape::SingleLine,
            ..Self::block(name, patterns)
        }
    }

    pub fn stopping_at_blank_line(mut self) -> Self {
        self.stop_at_blank_line = true;
        self
    }
}

impl DomainGrammar {
    pub fn new(sections: Vec<SectionGrammar>) -> Self {
        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&SectionGrammar> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Header patterns of every section except `name`.
    pub fn boundaries_for<'g>(&'g self, name: &'g str) -> impl Iterator<Item = &'g Regex> + 'g {
        self.sections
            .iter()
            .filter(move |s| s.name != name)
            .flat_map(|s| s.patterns.iter().map(|p| &p.header))
    }
}

/// Strict header: `marker` then `words` (a regex alternation), unanchored.
pub fn strict(marker: &str, words: &str) -> SectionPattern {
    let marker = regex::escape(marker);
    SectionPattern {
        kind: PatternKind::Strict,
        header: compile(&format!(r"(?i){marker}\x{{FE0F}}?{EMPHASIS}(?:{words}){TAIL}")),
    }
}

/// Loose header for list sections: `words` alone on a line.
pub fn loose(words: &str) -> SectionPattern {
    SectionPattern {
        kind: PatternKind::Loose,
        header: compile(&format!(r"(?im){LINE_PREFIX}(?:{words}){LINE_END_TAIL}")),
    }
}

/// Loose header for one-line sections: `words:` at the start of a line,
/// followed by the value.
pub fn loose_value(words: &str) -> SectionPattern {
    SectionPattern {
        kind: PatternKind::Loose,
        header: compile(&format!(r"(?im){LINE_PREFIX}(?:{words}){VALUE_TAIL}")),
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid header pattern {pattern:?}: {e}"))
}
