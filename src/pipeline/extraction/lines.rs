use std::collections::BTreeMap;

use regex::Regex;

/// Glyphs that open a bullet line. All three are equivalent.
pub const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// One bullet line of a section body, plus the non-bullet lines nested
/// under it (`↪ Alternative: ...`, `Reasoning: ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub text: String,
    pub details: Vec<String>,
}

/// Which lines of a body count as items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFilter {
    /// Only bullet lines are items. Non-bullet lines attach to the item
    /// above them; before the first bullet they are dropped.
    Bulleted,
    /// Bullet lines and prose lines longer than `min_unbulleted_chars` are
    /// items; cleaned items of `min_item_chars` or fewer are dropped.
    Prose {
        min_unbulleted_chars: usize,
        min_item_chars: usize,
    },
}

/// Strip a leading bullet marker, returning the cleaned line.
/// A marker doubled up (`**bold**`, `---`) is not a bullet.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !BULLET_MARKERS.contains(&first) {
        return None;
    }
    if chars.next() == Some(first) {
        return None;
    }
    Some(trimmed[first.len_utf8()..].trim())
}

/// Trim a field and drop markdown emphasis wrapped around it (`**Flu**`).
pub fn clean_field(value: &str) -> String {
    let mut v = value.trim();
    for emphasis in ["**", "__"] {
        if let Some(inner) = v.strip_prefix(emphasis).and_then(|s| s.strip_suffix(emphasis)) {
            v = inner.trim();
        }
    }
    v.to_string()
}

/// Split a section body into ordered line items.
pub fn parse_line_items(body: &str, filter: LineFilter) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match (strip_bullet(trimmed), filter) {
            (Some(cleaned), LineFilter::Bulleted) => {
                if !cleaned.is_empty() {
                    items.push(LineItem::new(cleaned));
                }
            }
            (None, LineFilter::Bulleted) => {
                if let Some(last) = items.last_mut() {
                    last.details.push(trimmed.to_string());
                }
            }
            (
                bullet,
                LineFilter::Prose {
                    min_unbulleted_chars,
                    min_item_chars,
                },
            ) => {
                let cleaned = match bullet {
                    Some(cleaned) => cleaned,
                    None if trimmed.chars().count() > min_unbulleted_chars => trimmed,
                    None => continue,
                };
                if cleaned.chars().count() > min_item_chars {
                    items.push(LineItem::new(cleaned));
                }
            }
        }
    }

    items
}

/// Cleaned item texts only, in source order.
pub fn parse_lines(body: &str, filter: LineFilter) -> Vec<String> {
    parse_line_items(body, filter)
        .into_iter()
        .map(|item| item.text)
        .collect()
}

impl LineItem {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            details: Vec::new(),
        }
    }

    /// Treat an unbulleted block as a single item: first line is the item,
    /// the rest are its details.
    pub fn from_block(body: &str) -> Option<Self> {
        let mut lines = body.lines().map(str::trim).filter(|l| !l.is_empty());
        let mut item = Self::new(lines.next()?);
        item.details.extend(lines.map(str::to_string));
        Some(item)
    }
}

/// A secondary pattern that splits a cleaned line into named sub-fields.
/// Field names are the regex's named capture groups.
#[derive(Debug, Clone)]
pub struct SubFieldPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl SubFieldPattern {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid sub-field pattern {name}: {e}")),
        }
    }
}

/// Outcome of decomposing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decomposed {
    /// A sub-field pattern matched. Only groups that captured non-blank
    /// text are present.
    Fields {
        pattern: &'static str,
        fields: BTreeMap<String, String>,
    },
    /// No pattern matched; the whole line is the primary field.
    PrimaryOnly(String),
}

impl Decomposed {
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Fields { fields, .. } => fields.get(name).map(String::as_str),
            Self::PrimaryOnly(_) => None,
        }
    }

    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            Self::Fields { pattern, .. } => Some(pattern),
            Self::PrimaryOnly(_) => None,
        }
    }
}

/// Try each pattern in priority order; the first match wins.
pub fn decompose(line: &str, patterns: &[SubFieldPattern]) -> Decomposed {
    for pattern in patterns {
        let Some(caps) = pattern.regex.captures(line) else {
            continue;
        };
        let fields = pattern
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                let value = caps.name(name)?.as_str().trim();
                (!value.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        return Decomposed::Fields {
            pattern: pattern.name,
            fields,
        };
    }
    Decomposed::PrimaryOnly(line.trim().to_string())
}
