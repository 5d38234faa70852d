//! Decoding of raw field bytes.
//!
//! The raw span of a field (as given by [`FieldOffsets::field_range`]) ends right
//! before the next delimiter or record terminator. When ignored lines (comments,
//! blank lines) separate two records, the span of the earlier record's final field
//! also covers those lines, so every decoder first cuts the span at the record
//! terminator.
//!
//! [`FieldOffsets::field_range`]: crate::FieldOffsets::field_range

use crate::options::FieldRules;

/// Cuts `raw` at the first newline that is not inside a quoted section.
pub fn record_prefix<'a>(raw: &'a [u8], rules: &FieldRules) -> &'a [u8] {
    if !raw.contains(&b'\n') {
        return raw;
    }
    let mut in_quote = false;
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if rules.escape_backslash && b == b'\\' {
            i += 2;
            continue;
        }
        if Some(b) == rules.quote {
            in_quote = !in_quote;
        } else if b == b'\n' && !in_quote {
            return &raw[..i];
        }
        i += 1;
    }
    raw
}

/// Extracts the token a numeric parser sees: the span is cut at the first newline
/// and trimmed of ASCII whitespace (which includes the `\r` of CRLF files).
///
/// Numbers cannot span lines, so no quote tracking is needed here.
#[inline]
pub fn numeric_token(raw: &[u8]) -> &[u8] {
    let raw = match raw.iter().position(|&b| b == b'\n') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    raw.trim_ascii()
}

/// Decodes a raw field into text: strips the record terminator, optional
/// surrounding blanks and enclosing quotes, then resolves escapes.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
pub fn decode_text(raw: &[u8], rules: &FieldRules) -> String {
    let mut field = record_prefix(raw, rules);
    if let Some((b'\r', rest)) = field.split_last() {
        field = rest;
    }
    if rules.trim_ws {
        field = trim_blanks(field);
    }

    let mut quoted = false;
    if let Some(q) = rules.quote {
        if field.len() >= 2 && field[0] == q && field[field.len() - 1] == q {
            field = &field[1..field.len() - 1];
            quoted = true;
        }
    }

    let needs_unescape = (rules.escape_backslash && field.contains(&b'\\'))
        || (quoted && rules.escape_double && rules.quote.is_some_and(|q| field.contains(&q)));
    if !needs_unescape {
        return String::from_utf8_lossy(field).into_owned();
    }

    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        let b = field[i];
        if rules.escape_backslash && b == b'\\' && i + 1 < field.len() {
            out.push(field[i + 1]);
            i += 2;
        } else if quoted
            && rules.escape_double
            && Some(b) == rules.quote
            && field.get(i + 1) == Some(&b)
        {
            out.push(b);
            i += 2;
        } else {
            out.push(b);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn trim_blanks(mut field: &[u8]) -> &[u8] {
    while let Some((b' ' | b'\t', rest)) = field.split_first() {
        field = rest;
    }
    while let Some((b' ' | b'\t', rest)) = field.split_last() {
        field = rest;
    }
    field
}
