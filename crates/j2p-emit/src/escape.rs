//! Single-quoted PHP string escaping (§4.4: "String literal escaping
//! targets single-quoted form: backslash, single-quote, `\n`, `\r`, `\t`
//! are escaped").
//!
//! PHP single-quoted strings only natively recognize `\\` and `\'` as
//! escapes; everything else is literal. This emitter always builds
//! `Expression::Literal(Literal::String(..))` values that never actually
//! contain a raw newline/carriage-return/tab from source (those come
//! through `StringInterpolation` parts instead), but it escapes all four
//! defensively so that a string literal assembled programmatically with an
//! embedded control character still renders as a single, valid PHP
//! statement rather than breaking across lines.

pub fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
