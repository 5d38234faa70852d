//! Typed columns that parse on demand and materialize once.

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use readidx_common::{Result, verify_arg, verify_data};
use readidx_index::{FieldOffsets, FileIndex};
use readidx_io::SharedSource;
use readidx_workflow::data_parallel;

pub mod value;

use value::FieldValue;

/// One column of one indexed source: the offset table, the bytes it points into
/// and the layout needed to address the column's fields.
#[derive(Clone)]
pub struct ColumnSegment {
    offsets: FieldOffsets,
    source: SharedSource,
    column: usize,
    num_columns: usize,
    skip: usize,
    rows: usize,
}

impl ColumnSegment {
    /// Binds column `column` of a table laid out with `num_columns` fields per record,
    /// whose first `skip` records are not data rows.
    pub fn new(
        offsets: FieldOffsets,
        source: SharedSource,
        column: usize,
        num_columns: usize,
        skip: usize,
    ) -> Result<ColumnSegment> {
        verify_arg!(column, column < num_columns);
        let records = offsets.record_count(num_columns);
        verify_data!(offsets, skip <= records);
        verify_data!(offsets, offsets.field_count() == records * num_columns);
        Ok(ColumnSegment {
            offsets,
            source,
            column,
            num_columns,
            skip,
            rows: records - skip,
        })
    }

    /// Binds column `col` of an already built file index.
    pub fn from_index(index: &FileIndex, col: usize) -> ColumnSegment {
        ColumnSegment {
            offsets: index.offsets().clone(),
            source: index.source().clone(),
            column: col,
            num_columns: index.num_columns(),
            skip: index.header_rows(),
            rows: index.num_rows(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Raw bytes of the field at `row`, as delimited by the offset table.
    #[inline]
    pub fn raw(&self, row: usize) -> &[u8] {
        let idx = (row + self.skip) * self.num_columns + self.column;
        let range = self.offsets.field_range(idx);
        self.source.read_at(range.start as u64..range.end as u64)
    }

    #[inline]
    pub fn parse<T: FieldValue>(&self, row: usize) -> T {
        T::parse_field(self.raw(row))
    }
}

impl fmt::Debug for ColumnSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSegment")
            .field("source", &self.source.name())
            .field("column", &self.column)
            .field("rows", &self.rows)
            .finish()
    }
}

/// A column of `T` values backed by one or more indexed sources.
///
/// Until the column is materialized, [`LazyColumn::get`] parses the requested field
/// alone. [`LazyColumn::materialize`] converts every row in parallel and caches the
/// array; it runs at most once per instance, and all later reads index the cache.
pub struct LazyColumn<T> {
    segments: Vec<ColumnSegment>,
    /// Global row at which each segment starts, followed by the total length.
    segment_starts: Vec<usize>,
    len: usize,
    num_threads: usize,
    data: OnceLock<Arc<[T]>>,
    #[cfg(test)]
    materializations: std::sync::atomic::AtomicUsize,
}

pub type LazyFloatColumn = LazyColumn<f64>;
pub type LazyIntColumn = LazyColumn<i32>;

impl<T: FieldValue> LazyColumn<T> {
    /// Binds column `column` of a single source directly from its offset table.
    pub fn new(
        offsets: FieldOffsets,
        source: SharedSource,
        column: usize,
        num_columns: usize,
        skip: usize,
        num_threads: usize,
    ) -> Result<LazyColumn<T>> {
        let segment = ColumnSegment::new(offsets, source, column, num_columns, skip)?;
        Ok(Self::from_segments(vec![segment], num_threads))
    }

    /// Concatenates the segments, in order, into one column.
    pub fn from_segments(segments: Vec<ColumnSegment>, num_threads: usize) -> LazyColumn<T> {
        let mut segment_starts = Vec::with_capacity(segments.len() + 1);
        let mut len = 0;
        for segment in &segments {
            segment_starts.push(len);
            len += segment.len();
        }
        segment_starts.push(len);
        LazyColumn {
            segments,
            segment_starts,
            len,
            num_threads: num_threads.max(1),
            data: OnceLock::new(),
            #[cfg(test)]
            materializations: Default::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn segments(&self) -> &[ColumnSegment] {
        &self.segments
    }

    pub fn is_materialized(&self) -> bool {
        self.data.get().is_some()
    }

    /// The value at row `i`, from the cache when materialized and parsed from the
    /// source otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn get(&self, i: usize) -> T {
        match self.data.get() {
            Some(data) => data[i],
            None => self.read_element(i),
        }
    }

    /// Parses row `i` from the source, bypassing the cache.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn read_element(&self, i: usize) -> T {
        assert!(i < self.len, "row {i} out of range for column of {} rows", self.len);
        let seg = self.segment_of(i);
        self.segments[seg].parse(i - self.segment_starts[seg])
    }

    /// Converts every row and caches the result. Later calls return the same array.
    pub fn materialize(&self) -> Arc<[T]> {
        self.data().clone()
    }

    /// The materialized values, converting them first if needed.
    pub fn as_slice(&self) -> &[T] {
        self.data()
    }

    /// Number of missing values; materializes the column.
    pub fn missing_count(&self) -> usize {
        self.as_slice().iter().filter(|v| v.is_missing()).count()
    }

    /// Iterates over the materialized values.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, T>> {
        self.as_slice().iter().copied()
    }

    fn data(&self) -> &Arc<[T]> {
        self.data.get_or_init(|| self.convert_all())
    }

    fn segment_of(&self, i: usize) -> usize {
        self.segment_starts.partition_point(|&start| start <= i) - 1
    }

    fn convert_all(&self) -> Arc<[T]> {
        #[cfg(test)]
        self.materializations
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        log::debug!(
            "materializing {} rows as {} on {} threads",
            self.len,
            T::TYPE_NAME,
            self.num_threads
        );

        let mut out = vec![T::missing(); self.len];
        let mut rest = out.as_mut_slice();
        let mut jobs = Vec::new();
        for range in data_parallel::split_range(self.len, self.num_threads) {
            let mut pos = range.start;
            while pos < range.end {
                let seg = self.segment_of(pos);
                let end = self.segment_starts[seg + 1].min(range.end);
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(end - pos);
                rest = tail;
                jobs.push((seg, pos - self.segment_starts[seg], chunk));
                pos = end;
            }
        }
        log::trace!("{} conversion jobs", jobs.len());

        let segments = &self.segments;
        data_parallel::for_each(Some(self.num_threads), jobs, |(seg, first, chunk)| {
            let segment = &segments[seg];
            for (k, slot) in chunk.iter_mut().enumerate() {
                *slot = segment.parse(first + k);
            }
        });
        out.into()
    }
}

impl<T> fmt::Debug for LazyColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LazyColumn(len={}, materialized={})",
            self.len,
            if self.data.get().is_some() { "T" } else { "F" }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use readidx_index::FieldOffsets;
    use readidx_io::{memory::NamedBuffer, share};

    use super::{ColumnSegment, LazyColumn, LazyFloatColumn, LazyIntColumn};
    use crate::lazy::value::{FieldValue, NA_I32, NA_I64};

    /// Offsets of "a,b\n1.5,x\nNA,y\n-3,z\n": header plus three records.
    fn table() -> (FieldOffsets, readidx_io::SharedSource) {
        let text = "a,b\n1.5,x\nNA,y\n-3,z\n";
        let offsets = FieldOffsets::from_vec(vec![0, 2, 4, 8, 10, 13, 15, 18, 20]);
        (offsets, share(NamedBuffer::new("t", text)))
    }

    #[test]
    fn test_point_reads_match_materialization() {
        let (offsets, source) = table();
        let col = LazyFloatColumn::new(offsets, source, 0, 2, 1, 2).unwrap();
        assert_eq!(col.len(), 3);
        let singles = (0..col.len()).map(|i| col.get(i).to_bits()).collect::<Vec<_>>();
        assert!(!col.is_materialized());
        let all = col.materialize();
        assert_eq!(all.iter().map(|v| v.to_bits()).collect::<Vec<_>>(), singles);
        assert_eq!(all[0], 1.5);
        assert!(all[1].is_missing());
        assert_eq!(all[2], -3.0);
        assert_eq!(col.missing_count(), 1);
    }

    fn integer_reads<T: FieldValue>() -> (Vec<T>, Arc<[T]>) {
        let text = "1\nabc\n99999999999999\n-4\n";
        let offsets = FieldOffsets::from_vec(vec![0, 2, 6, 21, 24]);
        let col =
            LazyColumn::<T>::new(offsets, share(NamedBuffer::new("n", text)), 0, 1, 0, 2).unwrap();
        let singles = (0..col.len()).map(|i| col.get(i)).collect::<Vec<_>>();
        assert!(!col.is_materialized());
        (singles, col.materialize())
    }

    #[test]
    fn test_integer_point_reads_match_materialization() {
        let (singles, all) = integer_reads::<i32>();
        assert_eq!(singles, vec![1, NA_I32, NA_I32, -4]);
        assert_eq!(&*all, singles.as_slice());

        let (singles, all) = integer_reads::<i64>();
        assert_eq!(singles, vec![1, NA_I64, 99_999_999_999_999, -4]);
        assert_eq!(&*all, singles.as_slice());
    }

    #[test]
    fn test_materializes_once() {
        let (offsets, source) = table();
        let col = LazyIntColumn::new(offsets, source, 0, 2, 1, 4).unwrap();
        let first = col.materialize();
        let second = col.materialize();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(col.iter().collect::<Vec<_>>(), vec![i32::missing(), i32::missing(), -3]);
        assert_eq!(col.materializations.load(Ordering::Relaxed), 1);
        assert_eq!(format!("{col:?}"), "LazyColumn(len=3, materialized=T)");
    }

    #[test]
    fn test_concurrent_first_materialization() {
        let text = (0..1000).map(|i| format!("{i}\n")).collect::<String>();
        let mut offsets = vec![0u64];
        let mut pos = 0;
        for i in 0..1000 {
            pos += format!("{i}\n").len() as u64;
            offsets.push(pos);
        }
        let col = Arc::new(
            LazyColumn::<i64>::new(
                FieldOffsets::from_vec(offsets),
                share(NamedBuffer::new("n", text)),
                0,
                1,
                0,
                3,
            )
            .unwrap(),
        );
        let results = std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| s.spawn(|| col.materialize()))
                .collect::<Vec<_>>();
            handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(col.materializations.load(Ordering::Relaxed), 1);
        assert_eq!(results[0][999], 999);
    }

    #[test]
    fn test_segments_are_concatenated() {
        let first = share(NamedBuffer::new("a", "x\n1\n2\n"));
        let second = share(NamedBuffer::new("b", "x\n3\n"));
        let segments = vec![
            ColumnSegment::new(FieldOffsets::from_vec(vec![0, 2, 4, 6]), first, 0, 1, 1).unwrap(),
            ColumnSegment::new(FieldOffsets::from_vec(vec![0, 2, 4]), second, 0, 1, 1).unwrap(),
        ];
        for threads in [1, 2, 3, 8] {
            let col = LazyIntColumn::from_segments(segments.clone(), threads);
            assert_eq!(col.get(2), 3);
            assert_eq!(col.as_slice(), &[1, 2, 3]);
        }
    }

    #[test]
    fn test_invalid_layout() {
        let (offsets, source) = table();
        assert!(LazyFloatColumn::new(offsets.clone(), source.clone(), 2, 2, 1, 1).is_err());
        assert!(LazyFloatColumn::new(offsets.clone(), source.clone(), 0, 2, 5, 1).is_err());
        assert!(LazyFloatColumn::new(offsets, source, 0, 3, 0, 1).is_err());
    }

    #[test]
    fn test_empty_column() {
        let col = LazyFloatColumn::from_segments(Vec::new(), 4);
        assert!(col.is_empty());
        assert_eq!(col.materialize().len(), 0);
        assert_eq!(col.missing_count(), 0);
    }
}
