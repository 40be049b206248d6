use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze property-management imports before committing them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer field mappings, data quality, and recommendations for a CSV sample
    Analyze(AnalyzeArgs),
    /// List known export dialects and the fields each one recognises
    Catalog(CatalogArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input CSV file to analyze ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Rows to sample; "Bulk Data Export" needs more than 100 (0 reads the whole file)
    #[arg(long, default_value_t = 100)]
    pub sample_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the analysis as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
    /// Also write the JSON analysis to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Manual correction of the form `source=target` (repeatable)
    #[arg(long = "map", action = clap::ArgAction::Append)]
    pub overrides: Vec<String>,
    /// Write the final source-to-target mapping plan as YAML
    #[arg(long = "mapping-out")]
    pub mapping_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Restrict the listing to one dialect id (e.g. tenant_data)
    #[arg(long)]
    pub dialect: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
