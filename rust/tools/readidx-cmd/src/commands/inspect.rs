//! Inspect command implementation

use anyhow::Result;
use readidx::ParseOptions;
use serde::Serialize;

use crate::{commands::open_collection, utils::format_size};

#[derive(Serialize)]
struct InspectSummary {
    rows: usize,
    columns: usize,
    header: Vec<String>,
    files: Vec<FileInfo>,
    options: ParseOptions,
}

#[derive(Serialize)]
struct FileInfo {
    name: String,
    rows: usize,
    size: String,
    field_count: usize,
}

/// Run the inspect command
pub fn run(files: Vec<String>, options: &ParseOptions) -> Result<()> {
    let collection = open_collection(&files, options)?;

    let files = collection
        .file_indexes()
        .iter()
        .map(|index| FileInfo {
            name: index.filename().to_string(),
            rows: index.num_rows(),
            size: format_size(index.source().size()),
            field_count: index.offsets().field_count(),
        })
        .collect();

    let summary = InspectSummary {
        rows: collection.num_rows(),
        columns: collection.num_columns(),
        header: collection.get_header(),
        files,
        options: options.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
