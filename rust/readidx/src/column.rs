//! Type-erased column cursors and the column view built from them.

use std::{
    fmt,
    iter::FusedIterator,
    ops::{Add, AddAssign, Sub},
};

/// A random-access cursor over the text values of one column.
///
/// Implementations address values by an absolute position; `position() == len`
/// is the past-the-end cursor and must not be dereferenced.
pub trait ColumnCursor: Send + Sync {
    /// Moves to the next position.
    fn next(&mut self);

    /// Moves to the previous position.
    fn prev(&mut self);

    /// Moves by `n` positions (backwards when negative).
    fn advance(&mut self, n: isize);

    /// The absolute position of the cursor.
    fn position(&self) -> usize;

    /// Returns `true` if both cursors point at the same position.
    fn equal_to(&self, other: &dyn ColumnCursor) -> bool {
        self.position() == other.position()
    }

    /// Number of steps from this cursor to `other`.
    fn distance_to(&self, other: &dyn ColumnCursor) -> isize {
        other.position() as isize - self.position() as isize
    }

    /// The decoded text at the current position.
    fn value(&self) -> String;

    fn clone_box(&self) -> Box<dyn ColumnCursor>;
}

/// An owning handle to a [`ColumnCursor`] with value semantics: cloning the handle
/// clones the cursor.
pub struct ColumnIter {
    cursor: Box<dyn ColumnCursor>,
}

impl ColumnIter {
    pub fn new<C: ColumnCursor + 'static>(cursor: C) -> ColumnIter {
        ColumnIter {
            cursor: Box::new(cursor),
        }
    }

    pub fn from_box(cursor: Box<dyn ColumnCursor>) -> ColumnIter {
        ColumnIter { cursor }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn value(&self) -> String {
        self.cursor.value()
    }

    pub fn move_next(&mut self) -> &mut Self {
        self.cursor.next();
        self
    }

    pub fn move_prev(&mut self) -> &mut Self {
        self.cursor.prev();
        self
    }

    pub fn advance(&mut self, n: isize) -> &mut Self {
        self.cursor.advance(n);
        self
    }

    /// Returns a new cursor `n` positions away from this one.
    pub fn offset(&self, n: isize) -> ColumnIter {
        let mut copy = self.clone();
        copy.advance(n);
        copy
    }

    /// Number of steps from this cursor to `other`.
    pub fn distance(&self, other: &ColumnIter) -> isize {
        self.cursor.distance_to(other.cursor.as_ref())
    }
}

impl Clone for ColumnIter {
    fn clone(&self) -> Self {
        ColumnIter {
            cursor: self.cursor.clone_box(),
        }
    }
}

impl PartialEq for ColumnIter {
    fn eq(&self, other: &Self) -> bool {
        self.cursor.equal_to(other.cursor.as_ref())
    }
}

impl Eq for ColumnIter {}

impl fmt::Debug for ColumnIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnIter")
            .field("position", &self.position())
            .finish()
    }
}

impl AddAssign<isize> for ColumnIter {
    fn add_assign(&mut self, n: isize) {
        self.advance(n);
    }
}

impl Add<isize> for &ColumnIter {
    type Output = ColumnIter;

    fn add(self, n: isize) -> ColumnIter {
        self.offset(n)
    }
}

impl Add<isize> for ColumnIter {
    type Output = ColumnIter;

    fn add(mut self, n: isize) -> ColumnIter {
        self.advance(n);
        self
    }
}

impl Sub<isize> for &ColumnIter {
    type Output = ColumnIter;

    fn sub(self, n: isize) -> ColumnIter {
        self.offset(-n)
    }
}

impl Sub for &ColumnIter {
    type Output = isize;

    /// `a - b` is the number of steps from `b` to `a`.
    fn sub(self, other: Self) -> isize {
        other.distance(self)
    }
}

/// A half-open range `[begin, end)` of one column's values.
///
/// A view: it owns two cursors, never the data. Slicing re-expresses the range and
/// costs O(1).
#[derive(Clone)]
pub struct Column {
    begin: ColumnIter,
    end: ColumnIter,
}

impl Column {
    /// # Panics
    ///
    /// Panics if `end` lies before `begin`.
    pub fn new(begin: ColumnIter, end: ColumnIter) -> Column {
        assert!(begin.distance(&end) >= 0, "column end precedes its begin");
        Column { begin, end }
    }

    pub fn begin(&self) -> &ColumnIter {
        &self.begin
    }

    pub fn end(&self) -> &ColumnIter {
        &self.end
    }

    /// Number of values in the range.
    pub fn len(&self) -> usize {
        self.begin.distance(&self.end) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The value at index `i` of the range.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn get(&self, i: usize) -> String {
        assert!(i < self.len(), "index {i} out of range for column of length {}", self.len());
        self.begin.offset(i as isize).value()
    }

    /// The sub-range `[start, end)` of this range.
    ///
    /// # Panics
    ///
    /// Panics unless `start <= end <= self.len()`.
    pub fn slice(&self, start: usize, end: usize) -> Column {
        assert!(
            start <= end && end <= self.len(),
            "slice {start}..{end} out of range for column of length {}",
            self.len()
        );
        Column {
            begin: self.begin.offset(start as isize),
            end: self.begin.offset(end as isize),
        }
    }

    pub fn iter(&self) -> ColumnValues {
        ColumnValues {
            front: self.begin.clone(),
            back: self.end.clone(),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().collect()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("begin", &self.begin.position())
            .field("end", &self.end.position())
            .finish()
    }
}

impl IntoIterator for &Column {
    type Item = String;
    type IntoIter = ColumnValues;

    fn into_iter(self) -> ColumnValues {
        self.iter()
    }
}

impl IntoIterator for Column {
    type Item = String;
    type IntoIter = ColumnValues;

    fn into_iter(self) -> ColumnValues {
        ColumnValues {
            front: self.begin,
            back: self.end,
        }
    }
}

/// Iterator over the values of a [`Column`], from both ends.
#[derive(Clone, Debug)]
pub struct ColumnValues {
    front: ColumnIter,
    back: ColumnIter,
}

impl Iterator for ColumnValues {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.front == self.back {
            return None;
        }
        let value = self.front.value();
        self.front.move_next();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.front.distance(&self.back) as usize;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        if n >= self.len() {
            self.front = self.back.clone();
            return None;
        }
        self.front.advance(n as isize);
        self.next()
    }
}

impl DoubleEndedIterator for ColumnValues {
    fn next_back(&mut self) -> Option<String> {
        if self.front == self.back {
            return None;
        }
        self.back.move_prev();
        Some(self.back.value())
    }
}

impl ExactSizeIterator for ColumnValues {}

impl FusedIterator for ColumnValues {}
