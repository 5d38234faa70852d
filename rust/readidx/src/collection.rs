//! A set of indexed files presented as one table.

use std::{ops::Range, path::Path, sync::Arc};

use readidx_common::{Result, error::Error, verify_arg};
use readidx_index::{FileIndex, ParseOptions, Row};
use readidx_io::{MappedFile, SharedSource};
use readidx_workflow::data_parallel;

use crate::{
    column::{Column, ColumnIter},
    cursor::FullCursor,
    lazy::{ColumnSegment, LazyColumn, value::FieldValue},
};

/// One input of an [`IndexCollection`]: a display name and its bytes.
pub struct SourceInput {
    pub name: String,
    pub source: SharedSource,
}

impl SourceInput {
    pub fn new(name: impl Into<String>, source: SharedSource) -> SourceInput {
        SourceInput {
            name: name.into(),
            source,
        }
    }

    /// Memory-maps the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SourceInput> {
        let path = path.as_ref();
        Ok(SourceInput::new(
            path.display().to_string(),
            MappedFile::open_shared(path)?,
        ))
    }
}

/// The logical concatenation of several indexed files sharing one schema.
///
/// Global row `r` belongs to the first file whose cumulative row count exceeds `r`;
/// rows keep file order. Collections are always handled through an `Arc`, which
/// every column view and cursor derived from the collection clones.
pub struct IndexCollection {
    indexes: Vec<Arc<FileIndex>>,
    /// Global row number at which each file starts, followed by the total row count.
    row_starts: Vec<usize>,
    rows: usize,
    columns: usize,
    /// The file that fixes the column count and supplies the header.
    schema_file: usize,
    num_threads: usize,
}

impl IndexCollection {
    /// Indexes every input, in parallel across inputs.
    ///
    /// # Errors
    ///
    /// Fails if `inputs` is empty, the options are invalid, any input is malformed, or
    /// the inputs disagree on the number of columns.
    pub fn new(inputs: Vec<SourceInput>, options: &ParseOptions) -> Result<Arc<IndexCollection>> {
        verify_arg!(inputs, !inputs.is_empty());
        options.validate()?;
        let num_threads = options.effective_threads();
        log::debug!(
            "indexing {} inputs with {num_threads} threads",
            inputs.len()
        );

        let indexes = data_parallel::map(Some(num_threads), inputs, |input| {
            FileIndex::build(input.name, input.source, options).map(Arc::new)
        })
        .into_iter()
        .collect::<Result<Vec<_>>>()?;
        Self::from_indexes(indexes, num_threads)
    }

    /// Memory-maps and indexes the files at `paths`.
    pub fn open<P: AsRef<Path>>(paths: &[P], options: &ParseOptions) -> Result<Arc<IndexCollection>> {
        let inputs = paths
            .iter()
            .map(SourceInput::open)
            .collect::<Result<Vec<_>>>()?;
        Self::new(inputs, options)
    }

    /// Assembles a collection from already built indexes.
    ///
    /// The column count is taken from the first index that has any records; indexes
    /// without records (empty files) are accepted regardless of their column count.
    pub fn from_indexes(
        indexes: Vec<Arc<FileIndex>>,
        num_threads: usize,
    ) -> Result<Arc<IndexCollection>> {
        verify_arg!(indexes, !indexes.is_empty());
        let schema_file = indexes
            .iter()
            .position(|idx| idx.num_columns() > 0)
            .unwrap_or(0);
        let columns = indexes[schema_file].num_columns();
        for idx in &indexes {
            if idx.num_columns() != columns && idx.num_columns() != 0 {
                return Err(Error::invalid_arg(
                    "inputs",
                    format!(
                        "{} has {} columns, expected {columns}",
                        idx.filename(),
                        idx.num_columns()
                    ),
                ));
            }
        }

        let mut row_starts = Vec::with_capacity(indexes.len() + 1);
        let mut rows = 0;
        for idx in &indexes {
            row_starts.push(rows);
            rows += idx.num_rows();
        }
        row_starts.push(rows);
        log::debug!(
            "collection of {} files: {rows} rows, {columns} columns",
            indexes.len()
        );

        Ok(Arc::new(IndexCollection {
            indexes,
            row_starts,
            rows,
            columns,
            schema_file,
            num_threads: num_threads.max(1),
        }))
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// Degree of parallelism used for typed column materialization.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn filenames(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|idx| idx.filename().to_string())
            .collect()
    }

    /// Data row count of each file, in file order.
    pub fn row_sizes(&self) -> Vec<usize> {
        self.indexes.iter().map(|idx| idx.num_rows()).collect()
    }

    pub fn file_indexes(&self) -> &[Arc<FileIndex>] {
        &self.indexes
    }

    /// Resolves global row `row` to `(file, local_row)`, or `None` past the end.
    pub fn locate(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.rows {
            return None;
        }
        let file = self.row_starts.partition_point(|&start| start <= row) - 1;
        Some((file, row - self.row_starts[file]))
    }

    /// Global row range covered by file `file`.
    pub fn file_rows(&self, file: usize) -> Range<usize> {
        self.row_starts[file]..self.row_starts[file + 1]
    }

    /// Decoded text at global row `row`, column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows()` or `col >= num_columns()`.
    pub fn get(&self, row: usize, col: usize) -> String {
        let (file, local) = self.owner(row);
        self.indexes[file].get(local, col)
    }

    /// All decoded fields of global row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows()`; see [`IndexCollection::try_row`].
    pub fn row(&self, row: usize) -> Row {
        let (file, local) = self.owner(row);
        self.indexes[file].get_row(local)
    }

    /// All decoded fields of global row `row`, or `None` past the end.
    pub fn try_row(&self, row: usize) -> Option<Row> {
        self.locate(row)
            .map(|(file, local)| self.indexes[file].get_row(local))
    }

    /// Column names, taken from the first file that has any records.
    ///
    /// Always holds `num_columns()` names.
    pub fn get_header(&self) -> Row {
        self.indexes[self.schema_file].get_header()
    }

    /// A text view over all rows of column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= num_columns()`.
    pub fn get_column(self: &Arc<Self>, col: usize) -> Column {
        self.check_column(col);
        let begin = ColumnIter::new(FullCursor::new(self.clone(), col, 0));
        let end = ColumnIter::new(FullCursor::new(self.clone(), col, self.rows));
        Column::new(begin, end)
    }

    /// A lazily materialized typed view over all rows of column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col >= num_columns()`.
    pub fn typed_column<T: FieldValue>(&self, col: usize) -> LazyColumn<T> {
        self.check_column(col);
        let segments = self
            .indexes
            .iter()
            .filter(|idx| idx.num_rows() > 0)
            .map(|idx| ColumnSegment::from_index(idx, col))
            .collect();
        LazyColumn::from_segments(segments, self.num_threads)
    }

    fn owner(&self, row: usize) -> (usize, usize) {
        match self.locate(row) {
            Some(owner) => owner,
            None => panic!("row {row} out of range for collection of {} rows", self.rows),
        }
    }

    fn check_column(&self, col: usize) {
        assert!(
            col < self.columns,
            "column {col} out of range for collection of {} columns",
            self.columns
        );
    }
}

impl std::fmt::Debug for IndexCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCollection")
            .field("files", &self.indexes.len())
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use readidx_io::{memory::NamedBuffer, share};

    use super::{IndexCollection, SourceInput};
    use crate::ParseOptions;

    fn inline(name: &str, text: &str) -> SourceInput {
        SourceInput::new(name, share(NamedBuffer::new(name, text)))
    }

    #[test]
    fn test_locate() {
        let options = ParseOptions::default().with_header(false);
        let coll = IndexCollection::new(
            vec![
                inline("a", "1\n2\n"),
                inline("b", ""),
                inline("c", "3\n"),
                inline("d", "4\n5\n6\n"),
            ],
            &options,
        )
        .unwrap();
        assert_eq!(coll.row_sizes(), vec![2, 0, 1, 3]);
        assert_eq!(coll.locate(0), Some((0, 0)));
        assert_eq!(coll.locate(1), Some((0, 1)));
        assert_eq!(coll.locate(2), Some((2, 0)));
        assert_eq!(coll.locate(3), Some((3, 0)));
        assert_eq!(coll.locate(5), Some((3, 2)));
        assert_eq!(coll.locate(6), None);
        assert_eq!(coll.file_rows(1), 2..2);
        assert_eq!(coll.try_row(6), None);
    }

    #[test]
    fn test_mismatched_columns() {
        let err = IndexCollection::new(
            vec![inline("a", "x,y\n1,2\n"), inline("b", "x,y,z\n1,2,3\n")],
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("b has 3 columns, expected 2"));
    }

    #[test]
    fn test_empty_first_file() {
        let coll = IndexCollection::new(
            vec![inline("a", ""), inline("b", "x,y\n1,2\n"), inline("c", "x,y\n3,4\n")],
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(coll.num_columns(), 2);
        assert_eq!(coll.get_header(), vec!["x", "y"]);
        assert_eq!(coll.get_header().len(), coll.num_columns());
        assert_eq!(coll.row_sizes(), vec![0, 1, 1]);
        assert_eq!(coll.get_column(1).to_vec(), vec!["2", "4"]);

        let no_header = IndexCollection::new(
            vec![inline("a", ""), inline("b", "1,2,3\n")],
            &ParseOptions::default().with_header(false),
        )
        .unwrap();
        assert_eq!(no_header.get_header(), vec!["X1", "X2", "X3"]);
    }

    #[test]
    fn test_no_inputs() {
        assert!(IndexCollection::new(Vec::new(), &ParseOptions::default()).is_err());
    }

    #[test]
    #[should_panic(expected = "row 2 out of range")]
    fn test_row_out_of_range() {
        let coll =
            IndexCollection::new(vec![inline("a", "x\n1\n2\n")], &ParseOptions::default()).unwrap();
        coll.row(2);
    }
}
