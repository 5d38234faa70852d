//! Lazily materialized tables over indexed delimited text files.
//!
//! An [`IndexCollection`] presents several indexed files with the same schema as one
//! table. Columns are available in two forms:
//!
//! - [`Column`]: a text view made of two type-erased cursors ([`ColumnIter`]). Slicing
//!   is O(1) and never copies field data.
//! - [`LazyColumn`]: a typed view that parses single values on demand. The first
//!   full read converts the whole column in parallel, once, and caches the result.
//!
//! Every view holds shared ownership of the collection, offset tables and mapped
//! sources it reads from, so views stay valid after the collection handle that
//! produced them is dropped.

pub mod collection;
pub mod column;
pub mod cursor;
pub mod lazy;

pub use collection::{IndexCollection, SourceInput};
pub use column::{Column, ColumnCursor, ColumnIter, ColumnValues};
pub use lazy::{
    ColumnSegment, LazyColumn, LazyFloatColumn, LazyIntColumn,
    value::{FieldValue, NA_F64, NA_I32, NA_I64},
};
pub use readidx_index::{FieldOffsets, FileIndex, ParseOptions, Row};
