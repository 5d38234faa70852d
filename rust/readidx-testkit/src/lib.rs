//! Test utilities for the readidx crates.
//!
//! - [`files`]: temporary directories populated with delimited text files
//! - [`data_gen`]: deterministic generators of delimited text content

pub mod data_gen;
pub mod files;
