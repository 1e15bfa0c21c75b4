//! Text normalization applied before splitting.

/// Normalizes whitespace and quote variants.
///
/// - CRLF / CR become LF, other unicode spaces become a plain space
/// - curly quotes, primes and guillemets become `'` or `"`
/// - runs of spaces collapse, lines are trimmed
/// - two or more line breaks collapse to exactly one blank line (`\n\n`)
/// - the result is trimmed
pub fn normalize_text(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                mapped.push('\n');
            }
            '\n' => mapped.push('\n'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' | '`' => {
                mapped.push('\'')
            }
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
            | '\u{00BB}' => mapped.push('"'),
            '\u{200B}' | '\u{FEFF}' => {}
            c if c.is_whitespace() => mapped.push(' '),
            c => mapped.push(c),
        }
    }

    let mut out = String::with_capacity(mapped.len());
    let mut blank_run = false;

    for line in mapped.split('\n') {
        let mut collapsed = String::with_capacity(line.len());
        for word in line.split(' ').filter(|w| !w.is_empty()) {
            if !collapsed.is_empty() {
                collapsed.push(' ');
            }
            collapsed.push_str(word);
        }

        if collapsed.is_empty() {
            blank_run = true;
            continue;
        }

        if !out.is_empty() {
            out.push_str(if blank_run { "\n\n" } else { "\n" });
        }
        out.push_str(&collapsed);
        blank_run = false;
    }

    out
}

/// Number of whitespace-separated words.
#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of unicode scalar values.
#[inline]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(normalize_text("a  \t b\u{00A0}c"), "a b c");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize_text("one\r\n\r\n\r\ntwo\nthree"), "one\n\ntwo\nthree");
    }

    #[test]
    fn test_trims_lines_and_document() {
        assert_eq!(normalize_text("   \n  first  \n\n   second   \n  "), "first\n\nsecond");
    }

    #[test]
    fn test_normalizes_quotes() {
        assert_eq!(
            normalize_text("\u{201C}Zorg\u{201D} isn\u{2019}t \u{00AB}blue\u{00BB}"),
            "\"Zorg\" isn't \"blue\""
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(normalize_text(" \n\t \r\n "), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_text("A  b\r\n\r\n\u{2018}c\u{2019}\n d ");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_counts() {
        assert_eq!(word_count("the sky\nis green"), 4);
        assert_eq!(char_count("año"), 3);
    }
}
