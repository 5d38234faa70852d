use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

use commands::{ParseArgs, materialize::ValueType};

#[derive(Parser)]
#[command(name = "readidx-cmd")]
#[command(about = "Command-line utility for indexing and reading delimited text files")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    parse: ParseArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the files and display summary information as JSON
    Inspect {
        /// Files to index, in row order
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Print the first rows of the combined table
    Head {
        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Files to index, in row order
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Print the text values of one column
    Column {
        /// Zero-based column number
        #[arg(short, long)]
        column: usize,

        /// First row to print
        #[arg(long)]
        start: Option<usize>,

        /// Row at which to stop (exclusive)
        #[arg(long)]
        end: Option<usize>,

        /// Files to index, in row order
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Convert one column to numbers and print the values
    Materialize {
        /// Zero-based column number
        #[arg(short, long)]
        column: usize,

        /// Target value type
        #[arg(long = "type", value_enum, default_value_t = ValueType::F64)]
        value_type: ValueType,

        /// Only print the number of rows and missing values
        #[arg(short, long)]
        summary: bool,

        /// Files to index, in row order
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let options = cli.parse.to_options()?;

    match cli.command {
        Commands::Inspect { files } => commands::inspect::run(files, &options),
        Commands::Head { count, files } => commands::head::run(count, files, &options),
        Commands::Column {
            column,
            start,
            end,
            files,
        } => commands::column::run(column, start, end, files, &options),
        Commands::Materialize {
            column,
            value_type,
            summary,
            files,
        } => commands::materialize::run(column, value_type, summary, files, &options),
    }
}
