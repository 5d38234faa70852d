//! Field-offset indexing of delimited text.
//!
//! A [`FileIndex`] records the byte offset at which every field of a delimited text
//! file starts, without decoding any of the fields. Values are decoded on request,
//! straight from the shared (usually memory-mapped) source.
//!
//! - [`ParseOptions`]: tokenization rules and indexing configuration.
//! - [`FieldOffsets`]: the shared, flat table of field start offsets.
//! - [`field`]: decoding of raw field bytes into text or numeric tokens.

pub mod field;
pub mod file_index;
pub mod offsets;
pub mod options;
mod tokenizer;

pub use file_index::{FileIndex, Row};
pub use offsets::FieldOffsets;
pub use options::{FieldRules, ParseOptions};
