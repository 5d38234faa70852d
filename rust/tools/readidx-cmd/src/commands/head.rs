use anyhow::Result;
use readidx::ParseOptions;

use crate::{commands::open_collection, utils::format_row};

pub fn run(count: usize, files: Vec<String>, options: &ParseOptions) -> Result<()> {
    let collection = open_collection(&files, options)?;
    if collection.num_rows() == 0 {
        println!("No rows found.");
        return Ok(());
    }

    println!("{}", format_row(&collection.get_header(), options.delimiter));
    for row in 0..count.min(collection.num_rows()) {
        println!("{}", format_row(&collection.row(row), options.delimiter));
    }
    Ok(())
}
