use anyhow::Result;
use readidx::ParseOptions;

use crate::commands::{check_column, open_collection};

/// Prints the values of `column` in rows `[start, end)`, one per line.
pub fn run(
    column: usize,
    start: Option<usize>,
    end: Option<usize>,
    files: Vec<String>,
    options: &ParseOptions,
) -> Result<()> {
    let collection = open_collection(&files, options)?;
    check_column(&collection, column)?;

    let values = collection.get_column(column);
    let end = end.unwrap_or(values.len()).min(values.len());
    let start = start.unwrap_or(0);
    if start > end {
        anyhow::bail!("Start row {start} lies after end row {end}");
    }
    log::debug!("printing rows {start}..{end} of column {column}");

    for value in values.slice(start, end) {
        println!("{value}");
    }
    Ok(())
}
