//! Decides which part of an editor's text is page-generated boilerplate.
//!
//! The boilerplate ends with a docstring, so everything after the last
//! closing `"""` is treated as user-authored and removed. Text without the
//! delimiter is never touched.

/// Marker that closes the generated docstring.
pub const DELIMITER: &str = "\"\"\"";

/// Outcome of truncating one editor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation<'a> {
    /// Text that should remain in the editor.
    pub retained: &'a str,
    /// Number of bytes cut from the end of the input.
    pub removed_bytes: usize,
}

impl Truncation<'_> {
    pub fn changed(&self) -> bool {
        self.removed_bytes > 0
    }
}

/// Returns the text that should remain once user code is removed.
///
/// The result is always a prefix of `text`, and `truncate(truncate(x)) ==
/// truncate(x)`.
pub fn truncate(text: &str) -> &str {
    let Some(last) = text.rfind(DELIMITER) else {
        return text;
    };
    let cut = last + DELIMITER.len();
    if is_blank(&text[cut..]) {
        return text;
    }
    &text[..cut]
}

/// True when `rest` holds only characters a browser's `trim()` removes.
pub fn is_blank(rest: &str) -> bool {
    rest.chars().all(is_trimmable)
}

// ECMAScript WhiteSpace and LineTerminator. Unlike `char::is_whitespace`,
// this includes U+FEFF and excludes U+0085.
fn is_trimmable(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Passes an absent value through unchanged.
pub fn truncate_opt(text: Option<&str>) -> Option<&str> {
    text.map(truncate)
}

/// Like [`truncate`], but also reports how much was removed.
pub fn truncate_report(text: &str) -> Truncation<'_> {
    let retained = truncate(text);
    Truncation {
        retained,
        removed_bytes: text.len() - retained.len(),
    }
}
