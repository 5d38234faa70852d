//! The flat table of field start offsets.

use std::{ops::Range, sync::Arc};

/// A shared, immutable table of field start offsets.
///
/// Entry `i` is the byte position at which field `i` starts; fields are laid out
/// record by record, `columns` entries per record. One trailing sentinel follows
/// the last field, so a table describing `n` fields stores `n + 1` offsets.
///
/// Adjacent fields are separated by exactly one delimiter or newline byte, which
/// makes `offsets[i + 1] - 1` the exclusive end of field `i`.
///
/// Cloning is cheap: all clones share the same allocation.
#[derive(Clone)]
pub struct FieldOffsets(Arc<[u64]>);

impl FieldOffsets {
    /// Creates a table describing zero fields.
    pub fn empty() -> FieldOffsets {
        FieldOffsets(Arc::from([0u64].as_slice()))
    }

    /// Wraps a vector of offsets.
    ///
    /// # Panics
    ///
    /// Panics if `offsets` is empty; even a table of zero fields holds its sentinel.
    pub fn from_vec(offsets: Vec<u64>) -> FieldOffsets {
        assert!(!offsets.is_empty(), "offsets must include the sentinel");
        FieldOffsets(offsets.into())
    }

    /// Number of fields described by the table.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns `true` if the table describes no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of complete records of `columns` fields described by the table.
    #[inline]
    pub fn record_count(&self, columns: usize) -> usize {
        if columns == 0 {
            0
        } else {
            self.field_count() / columns
        }
    }

    /// Returns the underlying slice of offsets, sentinel included.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Returns the byte range of the field at the flat index `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.field_count()`.
    #[inline]
    pub fn field_range(&self, idx: usize) -> Range<usize> {
        let start = self.0[idx] as usize;
        let end = (self.0[idx + 1] as usize).saturating_sub(1);
        start..end.max(start)
    }

    /// Returns `true` if the offsets never decrease.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Returns `true` if both values share the same allocation.
    pub fn ptr_eq(&self, other: &FieldOffsets) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for FieldOffsets {
    fn default() -> Self {
        FieldOffsets::empty()
    }
}

impl From<Vec<u64>> for FieldOffsets {
    fn from(offsets: Vec<u64>) -> Self {
        FieldOffsets::from_vec(offsets)
    }
}

impl std::fmt::Debug for FieldOffsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOffsets")
            .field("fields", &self.field_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldOffsets;

    #[test]
    fn test_field_ranges() {
        // "1,2\n3,4\n"
        let offsets = FieldOffsets::from_vec(vec![0, 2, 4, 6, 8]);
        assert_eq!(offsets.field_count(), 4);
        assert_eq!(offsets.record_count(2), 2);
        assert_eq!(offsets.field_range(0), 0..1);
        assert_eq!(offsets.field_range(1), 2..3);
        assert_eq!(offsets.field_range(3), 6..7);
        assert!(offsets.is_monotonic());
    }

    #[test]
    fn test_empty() {
        let offsets = FieldOffsets::empty();
        assert!(offsets.is_empty());
        assert_eq!(offsets.record_count(3), 0);
        assert_eq!(offsets.record_count(0), 0);
    }

    #[test]
    fn test_shared_clone() {
        let a = FieldOffsets::from(vec![0, 2, 4]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&FieldOffsets::from(vec![0, 2, 4])));
    }
}
