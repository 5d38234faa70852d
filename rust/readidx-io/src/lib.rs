//! Byte source abstractions:
//! - `ByteSource`: an immutable, randomly addressable byte range (a memory-mapped
//!   file or an in-memory buffer).
//! - `SharedSource`: the reference-counted handle every index and lazy column holds,
//!   so the underlying mapping outlives all of its readers.
//!
//! Provides two implementations: file-backed (memory-mapped) and memory-based.

use std::{ops::Range, sync::Arc};

pub mod file;
pub mod memory;

pub use file::MappedFile;

/// A shared, reference-counted byte source.
pub type SharedSource = Arc<dyn ByteSource>;

/// A conceptual file or buffer whose entire content is addressable in memory.
///
/// Implementations must be immutable once constructed: readers on several
/// threads borrow slices from `as_bytes()` concurrently and without locking.
pub trait ByteSource: Send + Sync + 'static {
    /// Returns the full content of the source.
    fn as_bytes(&self) -> &[u8];

    /// Returns a display name for the source (a path for files).
    fn name(&self) -> &str {
        ""
    }

    /// Returns the size of the source in bytes.
    fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Returns the bytes in the given range, clamped to the end of the source.
    ///
    /// An empty slice is returned when `range.start` lies beyond the end.
    fn read_at(&self, range: Range<u64>) -> &[u8] {
        let bytes = self.as_bytes();
        let len = bytes.len() as u64;
        if range.start >= len || range.start >= range.end {
            return &[];
        }
        let end = range.end.min(len);
        &bytes[range.start as usize..end as usize]
    }
}

impl<T> ByteSource for Arc<T>
where
    T: ByteSource + ?Sized,
{
    fn as_bytes(&self) -> &[u8] {
        self.as_ref().as_bytes()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn size(&self) -> u64 {
        self.as_ref().size()
    }
}

/// Wraps any byte source into a [`SharedSource`].
pub fn share<S: ByteSource>(source: S) -> SharedSource {
    Arc::new(source)
}
