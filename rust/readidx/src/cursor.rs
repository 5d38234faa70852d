//! Column cursors over indexed files.

use std::{ops::Range, sync::Arc};

use readidx_index::FileIndex;

use crate::{
    collection::IndexCollection,
    column::{Column, ColumnCursor, ColumnIter},
};

/// A cursor over one column of an [`IndexCollection`], addressed by global row.
///
/// Caches the file owning the current row together with that file's global row
/// range, so sequential movement only resolves the owning file again when it
/// crosses a file boundary.
#[derive(Clone)]
pub(crate) struct FullCursor {
    collection: Arc<IndexCollection>,
    column: usize,
    row: usize,
    file: usize,
    file_rows: Range<usize>,
}

impl FullCursor {
    pub(crate) fn new(collection: Arc<IndexCollection>, column: usize, row: usize) -> FullCursor {
        let mut cursor = FullCursor {
            collection,
            column,
            row: 0,
            file: 0,
            file_rows: 0..0,
        };
        cursor.seek(row);
        cursor
    }

    fn seek(&mut self, row: usize) {
        let rows = self.collection.num_rows();
        assert!(row <= rows, "cursor moved to row {row} past the end ({rows} rows)");
        self.row = row;
        if self.file_rows.contains(&row) {
            return;
        }
        match self.collection.locate(row) {
            Some((file, _)) => {
                self.file = file;
                self.file_rows = self.collection.file_rows(file);
            }
            None => self.file_rows = rows..rows,
        }
    }
}

impl ColumnCursor for FullCursor {
    fn next(&mut self) {
        self.seek(self.row + 1);
    }

    fn prev(&mut self) {
        match self.row.checked_sub(1) {
            Some(row) => self.seek(row),
            None => panic!("cursor moved before the first row"),
        }
    }

    fn advance(&mut self, n: isize) {
        match self.row.checked_add_signed(n) {
            Some(row) => self.seek(row),
            None => panic!("cursor moved before the first row"),
        }
    }

    fn position(&self) -> usize {
        self.row
    }

    fn value(&self) -> String {
        assert!(
            self.file_rows.contains(&self.row),
            "dereferenced the end of a column ({} rows)",
            self.collection.num_rows()
        );
        self.collection.file_indexes()[self.file].get(self.row - self.file_rows.start, self.column)
    }

    fn clone_box(&self) -> Box<dyn ColumnCursor> {
        Box::new(self.clone())
    }
}

/// A cursor over one column of a single [`FileIndex`].
#[derive(Clone)]
pub(crate) struct FileCursor {
    index: Arc<FileIndex>,
    column: usize,
    row: usize,
}

impl FileCursor {
    fn seek(&mut self, row: Option<usize>) {
        match row {
            Some(row) if row <= self.index.num_rows() => self.row = row,
            _ => panic!(
                "cursor moved out of range for {} ({} rows)",
                self.index.filename(),
                self.index.num_rows()
            ),
        }
    }
}

impl ColumnCursor for FileCursor {
    fn next(&mut self) {
        self.seek(self.row.checked_add(1));
    }

    fn prev(&mut self) {
        self.seek(self.row.checked_sub(1));
    }

    fn advance(&mut self, n: isize) {
        self.seek(self.row.checked_add_signed(n));
    }

    fn position(&self) -> usize {
        self.row
    }

    fn value(&self) -> String {
        self.index.get(self.row, self.column)
    }

    fn clone_box(&self) -> Box<dyn ColumnCursor> {
        Box::new(self.clone())
    }
}

/// A text view over all data rows of column `col` of a single file.
///
/// # Panics
///
/// Panics if `col >= index.num_columns()`.
pub fn file_column(index: &Arc<FileIndex>, col: usize) -> Column {
    assert!(
        col < index.num_columns(),
        "column {col} out of range for {} ({} columns)",
        index.filename(),
        index.num_columns()
    );
    let begin = FileCursor {
        index: index.clone(),
        column: col,
        row: 0,
    };
    let end = FileCursor {
        row: index.num_rows(),
        ..begin.clone()
    };
    Column::new(ColumnIter::new(begin), ColumnIter::new(end))
}
