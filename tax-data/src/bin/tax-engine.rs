use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tax_core::calculations::TaxReturnCalculator;
use tax_core::extraction::{ExtractionValidator, FieldMapper, review_document};
use tax_core::{
    ExtractedDocumentPayload, FilingStatus, TaxReturnFacts, TaxReturnInput, TaxYearRegistry,
};
use tax_data::logging::init_logging;
use tax_data::{EngineSettings, TaxTableLoader};
use tracing::{info, warn};

/// Compute federal tax returns and map recognized tax documents.
///
/// Results are written to stdout as JSON; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "tax-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a return with the recommended deduction method and suggestions
    Compute(ReturnArgs),
    /// Show the itemized-deduction what-if ladder for a return
    Scenarios(ReturnArgs),
    /// Map a recognized document payload to form fields and validate them
    Map(MapArgs),
    /// Load and validate tax-year tables
    CheckTables(TablesArgs),
}

#[derive(Args, Debug)]
struct TablesArgs {
    /// Directory with one subdirectory of tables per tax year
    /// (defaults to the built-in tables)
    #[arg(long)]
    tables_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReturnArgs {
    /// JSON file with the return's totals or its income and deduction line items
    #[arg(short, long)]
    input: PathBuf,

    /// Tax year to compute, overriding the one in the input
    #[arg(short, long)]
    year: Option<i32>,

    #[command(flatten)]
    tables: TablesArgs,
}

#[derive(Args, Debug)]
struct MapArgs {
    /// JSON file with the document-recognition payload
    #[arg(short, long)]
    input: PathBuf,

    /// TOML file with extraction and validation thresholds
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Compute(args) => {
            let (registry, facts) = load_return(&args)?;
            let config = registry.get(facts.tax_year)?;
            let result = TaxReturnCalculator::new(config)
                .compute_enhanced_return(&facts)
                .context("Failed to compute return")?;
            print_json(&result)
        }
        Command::Scenarios(args) => {
            let (registry, facts) = load_return(&args)?;
            let config = registry.get(facts.tax_year)?;
            let scenarios = TaxReturnCalculator::new(config)
                .scenarios(&facts)
                .context("Failed to build deduction scenarios")?;
            print_json(&scenarios)
        }
        Command::Map(args) => {
            let settings = match &args.settings {
                Some(path) => EngineSettings::load(path)
                    .with_context(|| format!("Failed to load settings: {}", path.display()))?,
                None => EngineSettings::default(),
            };
            let payload: ExtractedDocumentPayload = read_json(&args.input)?;

            let review = review_document(
                &payload,
                &FieldMapper::new(settings.extraction),
                &ExtractionValidator::new(settings.validation),
            );
            if !review.validation.is_valid {
                warn!(
                    errors = review.validation.errors.len(),
                    "document has blocking validation errors"
                );
            }
            print_json(&review)
        }
        Command::CheckTables(args) => {
            let registry = load_registry(&args)?;
            for tax_year in registry.tax_years() {
                let config = registry.get(tax_year)?;
                for status in FilingStatus::ALL {
                    info!(
                        tax_year,
                        filing_status = %status,
                        brackets = config.brackets_for(status)?.len(),
                        standard_deduction = %config.standard_deduction_for(status)?,
                        "tables ok"
                    );
                }
            }
            println!("Validated tax tables for: {:?}", registry.tax_years());
            Ok(())
        }
    }
}

fn load_registry(args: &TablesArgs) -> Result<TaxYearRegistry> {
    match &args.tables_dir {
        Some(dir) => TaxTableLoader::load_registry(dir)
            .with_context(|| format!("Failed to load tax tables from: {}", dir.display())),
        None => TaxTableLoader::builtin_registry().context("Built-in tax tables are invalid"),
    }
}

fn load_return(args: &ReturnArgs) -> Result<(TaxYearRegistry, TaxReturnFacts)> {
    let registry = load_registry(&args.tables)?;
    let mut facts = read_json::<TaxReturnInput>(&args.input)?.into_facts();
    if let Some(year) = args.year {
        facts.tax_year = year;
    }
    Ok((registry, facts))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
