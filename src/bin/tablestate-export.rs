//! TableState export tool
//!
//! Reads a JSON array of records on stdin, applies search, sort and column
//! hiding, and prints the processed rows as CSV or JSON.
//!
//! ```bash
//! cat players.json | tablestate-export --sort score:desc,name --search ann --hide notes
//! ```

use clap::Parser;
use log::{error, info};
use std::io::{self, Read, Write};
use std::process;
use tablestate::{
    parse_date, parse_sorting, Column, DataType, ExportFormat, Record, Schema, TableOptions, TableState, Value,
};

#[derive(Parser)]
#[command(name = "tablestate-export")]
#[command(about = "Search, sort and export a JSON array of records", long_about = None)]
#[command(version)]
struct Cli {
    /// Sort criteria, e.g. `score:desc,name:asc`
    #[arg(short, long)]
    sort: Option<String>,

    /// Free-text search term
    #[arg(short = 'q', long)]
    search: Option<String>,

    /// Columns to search (defaults to every text column)
    #[arg(long, value_delimiter = ',')]
    search_fields: Vec<String>,

    /// Columns to leave out of the export
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,

    /// Output format: csv or json
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,
}

/// Column type guessed from a sample value.
fn infer_data_type(value: &Value) -> DataType {
    match value {
        Value::Int(_) | Value::Float(_) => DataType::Number,
        Value::Bool(_) => DataType::Boolean,
        Value::Date(_) => DataType::Date,
        Value::String(s) if parse_date(s).is_some() => DataType::Date,
        Value::String(_) | Value::Null => DataType::Text,
        Value::List(_) | Value::Map(_) => DataType::Other,
    }
}

/// One column per field of the first record, in field order.
fn infer_schema(rows: &[Record]) -> tablestate::Result<Schema<Record>> {
    let columns = rows
        .first()
        .map(|first| {
            first
                .fields()
                .map(|(field, value)| Column::field(field, field).data_type(infer_data_type(value)))
                .collect()
        })
        .unwrap_or_default();
    Schema::new(columns)
}

fn run(cli: Cli) -> tablestate::Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let rows: Vec<Record> = serde_json::from_str(&input)?;
    let schema = infer_schema(&rows)?;
    info!("Loaded {} rows with {} columns", rows.len(), schema.len());

    let options = TableOptions {
        search_fields: cli.search_fields,
        ..TableOptions::default()
    };
    let mut table = TableState::new(rows, schema, options);
    if let Some(sort) = cli.sort.as_deref() {
        table.update_sorting(parse_sorting(sort));
    }
    if let Some(term) = cli.search {
        table.update_search(term);
    }
    for column_id in &cli.hide {
        table.hide_column(column_id);
    }

    info!("Exporting {} of {} rows", table.filtered_rows(), table.total_rows());
    let payload = table.export_data(cli.format, "export")?;
    Ok(payload.content)
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(err) = stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
                error!("Failed to write output: {}", err);
                process::exit(1);
            }
        }
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}
