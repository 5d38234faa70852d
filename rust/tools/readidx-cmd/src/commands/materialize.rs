use std::fmt::Display;

use anyhow::Result;
use clap::ValueEnum;
use readidx::{FieldValue, IndexCollection, LazyColumn, ParseOptions};
use serde::Serialize;

use crate::commands::{check_column, open_collection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    F64,
    I32,
    I64,
}

#[derive(Serialize)]
struct MaterializeSummary {
    column: String,
    value_type: &'static str,
    rows: usize,
    missing: usize,
}

pub fn run(
    column: usize,
    value_type: ValueType,
    summary: bool,
    files: Vec<String>,
    options: &ParseOptions,
) -> Result<()> {
    let collection = open_collection(&files, options)?;
    check_column(&collection, column)?;

    match value_type {
        ValueType::F64 => print_column::<f64>(&collection, column, summary),
        ValueType::I32 => print_column::<i32>(&collection, column, summary),
        ValueType::I64 => print_column::<i64>(&collection, column, summary),
    }
}

fn print_column<T: FieldValue + Display>(
    collection: &IndexCollection,
    column: usize,
    summary: bool,
) -> Result<()> {
    let values: LazyColumn<T> = collection.typed_column(column);
    let data = values.materialize();
    if !summary {
        for value in data.iter() {
            if value.is_missing() {
                println!("NA");
            } else {
                println!("{value}");
            }
        }
    }

    let header = collection.get_header();
    let summary = MaterializeSummary {
        column: header[column].clone(),
        value_type: T::TYPE_NAME,
        rows: values.len(),
        missing: values.missing_count(),
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
