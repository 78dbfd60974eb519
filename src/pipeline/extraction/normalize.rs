// Normalize model output before section matching.
// Unifies line endings and drops invisible formatting characters that would
// otherwise sit between a marker glyph and its header words.

/// Normalize a raw response: `\r\n` and lone `\r` become `\n`, zero-width
/// and bidi-control characters are removed. Emoji, variation selectors and
/// all other text are preserved.
pub fn normalize_response(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
            continue;
        }
        if is_invisible(c) {
            continue;
        }
        out.push(c);
    }

    out
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'  // Zero-width space
        | '\u{200C}' // Zero-width non-joiner
        | '\u{200E}' // Left-to-right mark
        | '\u{200F}' // Right-to-left mark
        | '\u{202A}' // Left-to-right embedding
        | '\u{202B}' // Right-to-left embedding
        | '\u{202C}' // Pop directional formatting
        | '\u{202D}' // Left-to-right override
        | '\u{202E}' // Right-to-left override
        | '\u{2060}' // Word joiner
        | '\u{FEFF}' // BOM / zero-width no-break space
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(normalize_response("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn zero_width_chars_removed() {
        assert_eq!(
            normalize_response("\u{FEFF}🧪\u{200B} Tests"),
            "🧪 Tests"
        );
    }

    #[test]
    fn emoji_and_variation_selectors_survive() {
        let text = "↪\u{FE0F} Alternative: Generic • ₹20 🧑\u{200D}⚕️";
        assert_eq!(normalize_response(text), text);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_response(""), "");
    }
}
