//! Shortest spellings of number and string literals.

use memchr::{memchr_iter, memchr3};

/// Shortest decimal or exponent spelling of a finite, non-negative number.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let plain = format!("{value}");
    let plain = match plain.strip_prefix("0.") {
        Some(fraction) => format!(".{fraction}"),
        None => plain,
    };
    let exponent = format!("{value:e}");
    if exponent.len() < plain.len() {
        exponent
    } else {
        plain
    }
}

/// `text` as a string literal, using whichever quote needs fewer escapes.
pub fn quote_string(text: &str) -> String {
    let bytes = text.as_bytes();
    let doubles = memchr_iter(b'"', bytes).count();
    let singles = memchr_iter(b'\'', bytes).count();
    let quote = if singles < doubles { '\'' } else { '"' };

    let plain = memchr3(b'\\', quote as u8, b'\n', bytes).is_none()
        && !bytes.iter().any(|&b| b < 0x20 || b == 0xe2 || b == 0xef);
    if plain {
        let mut out = String::with_capacity(text.len() + 2);
        out.push(quote);
        out.push_str(text);
        out.push(quote);
        return out;
    }

    let mut out = String::with_capacity(text.len() + 8);
    out.push(quote);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push('\t'),
            '\0' => {
                // `\0` followed by a digit would read as a legacy octal escape.
                if chars.peek().is_some_and(char::is_ascii_digit) {
                    out.push_str("\\x00");
                } else {
                    out.push_str("\\0");
                }
            }
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '\u{feff}' => out.push_str("\\ufeff"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Whether a property key can be written without quotes.
pub(crate) fn is_bare_key(text: &str) -> bool {
    jsz_scanner::is_identifier(text)
}

/// Whether a string key is the canonical spelling of a non-negative integer,
/// so `{"1": x}` can print as `{1: x}`.
pub(crate) fn is_numeric_key(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= 15
        && text.bytes().all(|b| b.is_ascii_digit())
        && (text == "0" || !text.starts_with('0'))
}
