//! Command implementations for readidx-cmd

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use readidx::{IndexCollection, ParseOptions};

use crate::utils::validate_file_exists;

pub mod column;
pub mod head;
pub mod inspect;
pub mod materialize;

/// Tokenization options shared by all commands.
///
/// Values given on the command line override those loaded with `--options`.
#[derive(Args, Debug, Default)]
pub struct ParseArgs {
    /// JSON file holding parse options
    #[arg(long, global = true)]
    options: Option<String>,

    /// Field delimiter
    #[arg(short, long, global = true)]
    delimiter: Option<char>,

    /// Quote character
    #[arg(long, global = true, conflicts_with = "no_quote")]
    quote: Option<char>,

    /// Disable quoting
    #[arg(long, global = true)]
    no_quote: bool,

    /// Keep blanks around values
    #[arg(long, global = true)]
    no_trim: bool,

    /// Do not treat doubled quotes as literal quotes
    #[arg(long, global = true)]
    no_escape_double: bool,

    /// Treat backslash as an escape character
    #[arg(long, global = true)]
    escape_backslash: bool,

    /// The files have no header line
    #[arg(long, global = true)]
    no_header: bool,

    /// Number of lines to skip at the start of every file
    #[arg(long, global = true)]
    skip: Option<usize>,

    /// Comment character
    #[arg(long, global = true)]
    comment: Option<char>,

    /// Worker threads (0 for all available)
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Report indexing progress
    #[arg(long, global = true)]
    progress: bool,
}

impl ParseArgs {
    pub fn to_options(&self) -> Result<ParseOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options file: {path}"))?;
                serde_json::from_str::<ParseOptions>(&text)
                    .with_context(|| format!("Invalid options file: {path}"))?
            }
            None => ParseOptions::default(),
        };
        if let Some(delimiter) = self.delimiter {
            options.delimiter = delimiter;
        }
        if self.no_quote {
            options.quote = None;
        } else if let Some(quote) = self.quote {
            options.quote = Some(quote);
        }
        if self.no_trim {
            options.trim_ws = false;
        }
        if self.no_escape_double {
            options.escape_double = false;
        }
        if self.escape_backslash {
            options.escape_backslash = true;
        }
        if self.no_header {
            options.has_header = false;
        }
        if let Some(skip) = self.skip {
            options.skip = skip;
        }
        if let Some(comment) = self.comment {
            options.comment = Some(comment);
        }
        if let Some(threads) = self.threads {
            options.num_threads = threads;
        }
        if self.progress {
            options.progress = true;
        }
        options.validate().context("Invalid parse options")?;
        Ok(options)
    }
}

/// Checks the paths and indexes them as one collection.
pub fn open_collection(files: &[String], options: &ParseOptions) -> Result<Arc<IndexCollection>> {
    for file in files {
        validate_file_exists(file)?;
    }
    log::debug!("opening {} files", files.len());
    IndexCollection::open(files, options).context("Failed to index files")
}

/// Fails unless `column` is a valid column of `collection`.
pub fn check_column(collection: &IndexCollection, column: usize) -> Result<()> {
    if column >= collection.num_columns() {
        anyhow::bail!(
            "Column {column} out of range: the files have {} columns",
            collection.num_columns()
        );
    }
    Ok(())
}
