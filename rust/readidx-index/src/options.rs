//! Tokenization rules and indexing configuration.

use readidx_common::{Result, error::Error};
use serde::{Deserialize, Serialize};

/// Configuration shared by every file of an index collection.
///
/// All character options must be ASCII; [`ParseOptions::validate`] rejects anything
/// else, since offsets are computed on raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Field separator.
    pub delimiter: char,
    /// Quote character; `None` disables quoting.
    pub quote: Option<char>,
    /// Trim spaces and tabs around decoded text values.
    pub trim_ws: bool,
    /// A doubled quote inside a quoted field stands for one literal quote.
    pub escape_double: bool,
    /// A backslash makes the following byte literal.
    pub escape_backslash: bool,
    /// The first indexed record holds column names.
    pub has_header: bool,
    /// Number of raw lines to drop at the start of every file.
    pub skip: usize,
    /// Lines starting with this character are ignored.
    pub comment: Option<char>,
    /// Degree of parallelism for indexing and materialization; 0 means all
    /// available hardware threads.
    pub num_threads: usize,
    /// Report indexing progress at `info` log level.
    pub progress: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            delimiter: ',',
            quote: Some('"'),
            trim_ws: true,
            escape_double: true,
            escape_backslash: false,
            has_header: true,
            skip: 0,
            comment: None,
            num_threads: 0,
            progress: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> ParseOptions {
        Default::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: Option<char>) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_trim_ws(mut self, trim_ws: bool) -> Self {
        self.trim_ws = trim_ws;
        self
    }

    pub fn with_escape_double(mut self, escape_double: bool) -> Self {
        self.escape_double = escape_double;
        self
    }

    pub fn with_escape_backslash(mut self, escape_backslash: bool) -> Self {
        self.escape_backslash = escape_backslash;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_comment(mut self, comment: Option<char>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The degree of parallelism to use, resolving 0 to the hardware thread count.
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            readidx_workflow::worker_pool::available_threads()
        } else {
            self.num_threads
        }
    }

    /// Checks that the options describe a usable tokenizer.
    pub fn validate(&self) -> Result<()> {
        self.rules().map(|_| ())
    }

    /// Validates the options and resolves the byte-level tokenization rules.
    pub fn rules(&self) -> Result<FieldRules> {
        let delimiter = structural_byte("delimiter", self.delimiter)?;
        let quote = self
            .quote
            .map(|q| structural_byte("quote", q))
            .transpose()?;
        let comment = self
            .comment
            .map(|c| structural_byte("comment", c))
            .transpose()?;
        if quote == Some(delimiter) {
            return Err(Error::invalid_arg("quote", "must differ from the delimiter"));
        }
        if comment == Some(delimiter) {
            return Err(Error::invalid_arg(
                "comment",
                "must differ from the delimiter",
            ));
        }
        if self.escape_backslash && (delimiter == b'\\' || quote == Some(b'\\')) {
            return Err(Error::invalid_arg(
                "escape_backslash",
                "backslash cannot also be the delimiter or the quote",
            ));
        }
        Ok(FieldRules {
            delimiter,
            quote,
            comment,
            trim_ws: self.trim_ws,
            escape_double: self.escape_double,
            escape_backslash: self.escape_backslash,
        })
    }
}

/// Byte-level tokenization rules resolved from [`ParseOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub delimiter: u8,
    pub quote: Option<u8>,
    pub comment: Option<u8>,
    pub trim_ws: bool,
    pub escape_double: bool,
    pub escape_backslash: bool,
}

fn structural_byte(name: &str, ch: char) -> Result<u8> {
    if !ch.is_ascii() {
        return Err(Error::invalid_arg(name, format!("{ch:?} is not ASCII")));
    }
    if ch == '\n' || ch == '\r' {
        return Err(Error::invalid_arg(name, "cannot be a line terminator"));
    }
    Ok(ch as u8)
}

#[cfg(test)]
mod tests {
    use super::ParseOptions;

    #[test]
    fn test_default_rules() {
        let rules = ParseOptions::default().rules().unwrap();
        assert_eq!(rules.delimiter, b',');
        assert_eq!(rules.quote, Some(b'"'));
        assert_eq!(rules.comment, None);
        assert!(rules.escape_double);
        assert!(!rules.escape_backslash);
    }

    #[test]
    fn test_invalid_options() {
        assert!(ParseOptions::new().with_delimiter('é').validate().is_err());
        assert!(ParseOptions::new().with_delimiter('\n').validate().is_err());
        assert!(
            ParseOptions::new()
                .with_delimiter('"')
                .validate()
                .is_err()
        );
        assert!(
            ParseOptions::new()
                .with_comment(Some(','))
                .validate()
                .is_err()
        );
        assert!(
            ParseOptions::new()
                .with_delimiter('\t')
                .with_quote(None)
                .with_comment(Some('#'))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_effective_threads() {
        assert_eq!(ParseOptions::new().with_num_threads(3).effective_threads(), 3);
        assert!(ParseOptions::new().effective_threads() >= 1);
    }

    #[test]
    fn test_serde_defaults() {
        let options: ParseOptions =
            serde_json::from_str(r#"{ "delimiter": ";", "has_header": false }"#).unwrap();
        assert_eq!(options.delimiter, ';');
        assert!(!options.has_header);
        assert_eq!(options.quote, Some('"'));

        let json = serde_json::to_string(&options).unwrap();
        let back: ParseOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
