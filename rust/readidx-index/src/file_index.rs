//! Field-offset index over a single delimited text source.

use std::{ops::Range, path::Path};

use readidx_common::Result;
use readidx_io::{MappedFile, SharedSource};

use crate::{
    field,
    offsets::FieldOffsets,
    options::{FieldRules, ParseOptions},
    tokenizer,
};

/// One decoded record.
pub type Row = Vec<String>;

/// The field-offset index of one delimited text source.
///
/// Holds the shared source bytes and the offset table; both are immutable after
/// [`FileIndex::build`] and can be handed out to any number of readers.
///
/// Row numbers are data-row numbers: row 0 is the first record after the header.
pub struct FileIndex {
    filename: String,
    source: SharedSource,
    offsets: FieldOffsets,
    rules: FieldRules,
    columns: usize,
    rows: usize,
    header_rows: usize,
}

impl FileIndex {
    /// Indexes the given source.
    ///
    /// # Errors
    ///
    /// Fails if the options are invalid or if a record's field count differs from
    /// that of the first record.
    pub fn build(
        filename: impl Into<String>,
        source: SharedSource,
        options: &ParseOptions,
    ) -> Result<FileIndex> {
        let filename = filename.into();
        let rules = options.rules()?;
        let scan = tokenizer::scan(&filename, source.as_bytes(), &rules, options.skip)?;
        if scan.unterminated_quote {
            log::warn!("{filename}: last record ends inside an open quote");
        }

        let header_rows = usize::from(options.has_header && scan.records > 0);
        let rows = scan.records - header_rows;
        let offsets = FieldOffsets::from_vec(scan.offsets);
        debug_assert!(offsets.is_monotonic());

        if options.progress {
            log::info!(
                "indexed {filename}: {rows} rows, {} columns, {} bytes",
                scan.columns,
                source.size()
            );
        } else {
            log::debug!("indexed {filename}: {rows} rows, {} columns", scan.columns);
        }

        Ok(FileIndex {
            filename,
            source,
            offsets,
            rules,
            columns: scan.columns,
            rows,
            header_rows,
        })
    }

    /// Memory-maps the file at `path` and indexes it.
    pub fn open<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<FileIndex> {
        let path = path.as_ref();
        let source = MappedFile::open_shared(path)?;
        FileIndex::build(path.display().to_string(), source, options)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Number of data rows (the header excluded).
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// Number of leading records in the offset table that are not data rows
    /// (1 when the file has a header, 0 otherwise).
    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    pub fn offsets(&self) -> &FieldOffsets {
        &self.offsets
    }

    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Flat position in the offset table of the field at `row`, `col`.
    #[inline]
    pub fn field_index(&self, row: usize, col: usize) -> usize {
        (row + self.header_rows) * self.columns + col
    }

    /// Byte range of the raw field at `row`, `col` within the source.
    pub fn field_range(&self, row: usize, col: usize) -> Range<usize> {
        self.check_bounds(row, col);
        self.offsets.field_range(self.field_index(row, col))
    }

    /// Raw, undecoded bytes of the field at `row`, `col`.
    pub fn field_bytes(&self, row: usize, col: usize) -> &[u8] {
        &self.source.as_bytes()[self.field_range(row, col)]
    }

    /// Decoded text of the field at `row`, `col`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows()` or `col >= num_columns()`.
    pub fn get(&self, row: usize, col: usize) -> String {
        field::decode_text(self.field_bytes(row, col), &self.rules)
    }

    /// All decoded fields of data row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows()`.
    pub fn get_row(&self, row: usize) -> Row {
        (0..self.columns).map(|col| self.get(row, col)).collect()
    }

    /// Column names: the header record when present, otherwise `X1..Xn`.
    pub fn get_header(&self) -> Row {
        if self.header_rows == 0 {
            return (1..=self.columns).map(|i| format!("X{i}")).collect();
        }
        let bytes = self.source.as_bytes();
        (0..self.columns)
            .map(|col| field::decode_text(&bytes[self.offsets.field_range(col)], &self.rules))
            .collect()
    }

    fn check_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.rows,
            "row {row} out of range for {} ({} rows)",
            self.filename,
            self.rows
        );
        assert!(
            col < self.columns,
            "column {col} out of range for {} ({} columns)",
            self.filename,
            self.columns
        );
    }
}

impl std::fmt::Debug for FileIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileIndex")
            .field("filename", &self.filename)
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("header_rows", &self.header_rows)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use readidx_io::{memory::NamedBuffer, share};

    use super::FileIndex;
    use crate::ParseOptions;

    fn index(text: &'static str, options: &ParseOptions) -> FileIndex {
        FileIndex::build("inline", share(NamedBuffer::new("inline", text)), options).unwrap()
    }

    #[test]
    fn test_rows_and_header() {
        let idx = index("name,value\nfoo,1\n\"bar, baz\",2\n", &ParseOptions::default());
        assert_eq!(idx.num_rows(), 2);
        assert_eq!(idx.num_columns(), 2);
        assert_eq!(idx.header_rows(), 1);
        assert_eq!(idx.get_header(), vec!["name", "value"]);
        assert_eq!(idx.get_row(0), vec!["foo", "1"]);
        assert_eq!(idx.get_row(1), vec!["bar, baz", "2"]);
        assert_eq!(idx.field_bytes(1, 0), b"\"bar, baz\"");
        assert_eq!(idx.offsets().field_count(), 3 * 2);
    }

    #[test]
    fn test_no_header() {
        let idx = index("1,2\n3,4\n", &ParseOptions::default().with_header(false));
        assert_eq!(idx.num_rows(), 2);
        assert_eq!(idx.header_rows(), 0);
        assert_eq!(idx.get_header(), vec!["X1", "X2"]);
        assert_eq!(idx.get(1, 1), "4");
    }

    #[test]
    fn test_crlf_and_comments() {
        let options = ParseOptions::default().with_comment(Some('#'));
        let idx = index("a;b\r\n# skipped\r\n1;2\r\n", &options.with_delimiter(';'));
        assert_eq!(idx.get_header(), vec!["a", "b"]);
        assert_eq!(idx.num_rows(), 1);
        assert_eq!(idx.get_row(0), vec!["1", "2"]);
    }

    #[test]
    fn test_header_only() {
        let idx = index("a,b,c\n", &ParseOptions::default());
        assert_eq!(idx.num_rows(), 0);
        assert_eq!(idx.num_columns(), 3);
        assert_eq!(idx.get_header(), vec!["a", "b", "c"]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range() {
        let idx = index("a\n1\n", &ParseOptions::default());
        idx.get(1, 0);
    }
}
