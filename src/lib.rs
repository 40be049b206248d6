//! Rule-based analysis of tabular imports for a property-management back
//! office.
//!
//! Given a header row and a bounded sample of rows, [`analyze`] recognises
//! known export dialects, proposes a normalized target field for every
//! column with a qualitative confidence, scores data quality, and emits
//! recommendations for a human to review before the import is committed.
//! The engine is pure and synchronous; everything outside it (file sampling,
//! reports, the CLI) lives in the remaining modules.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod confidence;
pub mod dialect;
pub mod error;
pub mod inference;
pub mod io_utils;
pub mod mapping;
pub mod report;
pub mod sample;

use std::{env, fs::File, io, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

pub use crate::analysis::{DataAnalysis, analyze};
pub use crate::error::AnalysisError;

use crate::{
    catalog::Dialect,
    cli::{AnalyzeArgs, CatalogArgs, Cli, Commands},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("import_analyzer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => handle_analyze(&args),
        Commands::Catalog(args) => handle_catalog(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Sampling up to {} row(s) from '{}' with delimiter '{}'",
        args.sample_rows,
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let sample = sample::read_sample(&args.input, delimiter, encoding, args.sample_rows)
        .with_context(|| format!("Sampling {:?}", args.input))?;
    debug!("Headers: {:?}", sample.headers);

    let mut result = analyze(&sample.headers, &sample.rows);
    result
        .apply_overrides(&args.overrides)
        .context("Applying mapping overrides")?;
    info!(
        "Analyzed {} column(s) over {} row(s): {} (quality {:.2})",
        result.field_mappings.len(),
        sample.rows.len(),
        result.detected_format,
        result.data_quality_score
    );

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Creating analysis file {path:?}"))?;
        serde_json::to_writer_pretty(file, &result).context("Writing analysis JSON")?;
        info!("Analysis written to {path:?}");
    }
    if let Some(path) = &args.mapping_out {
        let file = File::create(path).with_context(|| format!("Creating mapping plan {path:?}"))?;
        serde_yaml::to_writer(file, &result.mapping_plan()).context("Writing mapping plan YAML")?;
        info!("Mapping plan for {} column(s) written to {path:?}", result.field_mappings.len());
    }

    if args.json {
        let stdout = io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &result).context("Writing analysis JSON")?;
        println!();
    } else {
        print!("{}", report::render_report(&result));
    }
    Ok(())
}

fn handle_catalog(args: &CatalogArgs) -> Result<()> {
    let dialects = match args.dialect.as_deref() {
        Some(id) => vec![Dialect::from_id(id).ok_or_else(|| {
            anyhow!(
                "Unknown dialect '{id}'. Known dialects: {}",
                Dialect::ALL.map(Dialect::id).join(", ")
            )
        })?],
        None => Dialect::ALL.to_vec(),
    };

    let headers = vec![
        "catalog".to_string(),
        "target".to_string(),
        "patterns".to_string(),
        "required".to_string(),
    ];
    let mut rows = Vec::new();
    for dialect in &dialects {
        for entry in dialect.fields() {
            rows.push(catalog_row(dialect.id(), entry));
        }
    }
    if args.dialect.is_none() {
        for entry in catalog::GENERIC_FIELDS {
            rows.push(catalog_row("generic", entry));
        }
    }
    print!("{}", report::render_table(&headers, &rows));
    info!("Listed {} catalog field(s)", rows.len());
    Ok(())
}

fn catalog_row(catalog_id: &str, entry: &catalog::FieldPatterns) -> Vec<String> {
    vec![
        catalog_id.to_string(),
        entry.target.to_string(),
        entry.patterns.len().to_string(),
        if catalog::is_required_target(entry.target) { "yes" } else { "" }.to_string(),
    ]
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
