//! Single-pass scanner producing field start offsets.

use readidx_common::{Result, error::Error};

use crate::options::FieldRules;

/// The outcome of scanning one source.
#[derive(Debug)]
pub(crate) struct Scan {
    /// Field start offsets followed by one sentinel.
    pub offsets: Vec<u64>,
    /// Fields per record, taken from the first indexed record.
    pub columns: usize,
    /// Number of indexed records (the header included).
    pub records: usize,
    /// The last record ended inside an open quote.
    pub unterminated_quote: bool,
}

/// Scans `bytes` and records the start of every field.
///
/// The first `skip` raw lines are dropped, then blank lines and lines starting with
/// the comment byte are ignored wherever they occur. Every remaining record must
/// have the same number of fields as the first one.
pub(crate) fn scan(name: &str, bytes: &[u8], rules: &FieldRules, skip: usize) -> Result<Scan> {
    let len = bytes.len();
    let mut pos = 0;
    let mut line = 1;

    for _ in 0..skip {
        if pos >= len {
            break;
        }
        pos = next_line(bytes, pos);
        line += 1;
    }

    let mut offsets = Vec::new();
    let mut columns = 0;
    let mut records = 0;
    let mut unterminated_quote = false;
    let mut sentinel = pos as u64;

    while pos < len {
        let first = bytes[pos];
        if first == b'\n' || (first == b'\r' && bytes.get(pos + 1) == Some(&b'\n')) {
            pos = next_line(bytes, pos);
            line += 1;
            continue;
        }
        if Some(first) == rules.comment {
            pos = next_line(bytes, pos);
            line += 1;
            continue;
        }

        let record_line = line;
        let record_start = offsets.len();
        offsets.push(pos as u64);
        let mut in_quote = false;
        let mut i = pos;
        while i < len {
            let b = bytes[i];
            if rules.escape_backslash && b == b'\\' {
                if bytes.get(i + 1) == Some(&b'\n') {
                    line += 1;
                }
                i += 2;
                continue;
            }
            if Some(b) == rules.quote {
                in_quote = !in_quote;
            } else if b == b'\n' {
                if !in_quote {
                    break;
                }
                line += 1;
            } else if b == rules.delimiter && !in_quote {
                offsets.push(i as u64 + 1);
            }
            i += 1;
        }
        let end = i.min(len);
        unterminated_quote = in_quote;

        let fields = offsets.len() - record_start;
        if records == 0 {
            columns = fields;
        } else if fields != columns {
            return Err(Error::invalid_format(
                format!("{name}:{record_line}"),
                format!("expected {columns} fields, found {fields}"),
            ));
        }
        records += 1;
        sentinel = end as u64 + 1;
        pos = end + 1;
        line += 1;
    }

    if records == 0 {
        offsets.push(0);
    } else {
        offsets.push(sentinel);
    }
    Ok(Scan {
        offsets,
        columns,
        records,
        unterminated_quote,
    })
}

/// Returns the position just past the newline that ends the line starting at `pos`.
fn next_line(bytes: &[u8], pos: usize) -> usize {
    match bytes[pos..].iter().position(|&b| b == b'\n') {
        Some(n) => pos + n + 1,
        None => bytes.len(),
    }
}
