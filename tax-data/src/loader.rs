use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{
    ConfigurationError, CreditConfig, FilingStatus, ParseFilingStatusError, PlanningConfig,
    StandardDeduction, TaxBracket, TaxYearConfig, TaxYearRegistry,
};
use thiserror::Error;
use tracing::{debug, info};

pub const BRACKETS_FILE: &str = "tax_brackets.csv";
pub const STANDARD_DEDUCTIONS_FILE: &str = "standard_deductions.csv";
pub const PARAMETERS_FILE: &str = "parameters.toml";

const BUILTIN_2024_BRACKETS: &str = include_str!("../data/2024/tax_brackets.csv");
const BUILTIN_2024_STANDARD_DEDUCTIONS: &str = include_str!("../data/2024/standard_deductions.csv");
const BUILTIN_2024_PARAMETERS: &str = include_str!("../data/2024/parameters.toml");

/// Errors that can occur when loading tax-year tables.
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid filing status: {0}")]
    InvalidFilingStatus(#[from] ParseFilingStatusError),

    #[error("{file} has a row for tax year {found}, expected {expected}")]
    TaxYearMismatch {
        file: &'static str,
        expected: i32,
        found: i32,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No tax-year tables found under {}", .0.display())]
    NoTaxYears(PathBuf),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl From<csv::Error> for TableLoadError {
    fn from(err: csv::Error) -> Self {
        TableLoadError::CsvParse(err.to_string())
    }
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
fn schedule_to_filing_statuses(
    schedule: &str
) -> Result<&'static [FilingStatus], TableLoadError> {
    match schedule {
        "X" => Ok(&[FilingStatus::Single]),
        "Y-1" => Ok(&[
            FilingStatus::MarriedFilingJointly,
            FilingStatus::QualifyingSurvivingSpouse,
        ]),
        "Y-2" => Ok(&[FilingStatus::MarriedFilingSeparately]),
        "Z" => Ok(&[FilingStatus::HeadOfHousehold]),
        _ => Err(TableLoadError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from the tax brackets CSV file.
///
/// The CSV format uses IRS schedule designations:
/// - `tax_year`: The tax year (e.g., 2024)
/// - `schedule`: The IRS schedule code (X, Y-1, Y-2, Z)
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `base_tax`: The tax owed on all income below `min_income`
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A single record from the standard deductions CSV file. `filing_status`
/// accepts any spelling [`FilingStatus::parse`] does.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub tax_year: i32,
    pub filing_status: String,
    pub amount: Decimal,
}

/// Contents of a year's `parameters.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct YearParameters {
    pub tax_year: i32,
    pub credits: CreditConfig,
    pub planning: PlanningConfig,
}

/// Loader for versioned tax-year tables.
///
/// A year is three files: the bracket schedules, the standard deductions and
/// the credit/planning parameters. The bracket CSV uses IRS schedule codes
/// (X, Y-1, Y-2, Z) which are mapped to filing statuses; Y-1 rows are
/// duplicated for both statuses it covers.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse tax bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TableLoadError> {
        parse_csv(reader)
    }

    pub fn parse_standard_deductions<R: Read>(
        reader: R
    ) -> Result<Vec<StandardDeductionRecord>, TableLoadError> {
        parse_csv(reader)
    }

    pub fn parse_parameters(toml_text: &str) -> Result<YearParameters, TableLoadError> {
        Ok(toml::from_str(toml_text)?)
    }

    /// Assembles and validates one year's configuration.
    ///
    /// Every record must belong to `parameters.tax_year`.
    pub fn build_year(
        brackets: &[TaxBracketRecord],
        standard_deductions: &[StandardDeductionRecord],
        parameters: YearParameters,
    ) -> Result<TaxYearConfig, TableLoadError> {
        let tax_year = parameters.tax_year;

        let mut expanded = Vec::new();
        for record in brackets {
            check_year(BRACKETS_FILE, tax_year, record.tax_year)?;
            for &filing_status in schedule_to_filing_statuses(&record.schedule)? {
                expanded.push(TaxBracket {
                    tax_year: record.tax_year,
                    filing_status,
                    min_income: record.min_income,
                    max_income: record.max_income,
                    tax_rate: record.rate,
                    base_tax: record.base_tax,
                });
            }
        }

        let deductions = standard_deductions
            .iter()
            .map(|record| {
                check_year(STANDARD_DEDUCTIONS_FILE, tax_year, record.tax_year)?;
                Ok(StandardDeduction {
                    tax_year: record.tax_year,
                    filing_status: FilingStatus::parse(&record.filing_status)?,
                    amount: record.amount,
                })
            })
            .collect::<Result<Vec<_>, TableLoadError>>()?;

        let config = TaxYearConfig {
            tax_year,
            brackets: expanded,
            standard_deductions: deductions,
            credits: parameters.credits,
            planning: parameters.planning,
        };
        config.validate()?;

        debug!(
            tax_year,
            brackets = config.brackets.len(),
            "built tax-year configuration"
        );
        Ok(config)
    }

    /// Loads one year from a directory holding the three table files.
    pub fn load_year_dir(dir: &Path) -> Result<TaxYearConfig, TableLoadError> {
        let brackets = Self::parse_brackets(open(&dir.join(BRACKETS_FILE))?)?;
        let deductions =
            Self::parse_standard_deductions(open(&dir.join(STANDARD_DEDUCTIONS_FILE))?)?;
        let parameters_path = dir.join(PARAMETERS_FILE);
        let parameters_text =
            fs::read_to_string(&parameters_path).map_err(|source| TableLoadError::Io {
                path: parameters_path.clone(),
                source,
            })?;
        let parameters = Self::parse_parameters(&parameters_text)?;

        Self::build_year(&brackets, &deductions, parameters)
    }

    /// Loads every year under `root`, one subdirectory per year.
    ///
    /// Subdirectories without a `parameters.toml` are skipped.
    pub fn load_registry(root: &Path) -> Result<TaxYearRegistry, TableLoadError> {
        let io_error = |source| TableLoadError::Io {
            path: root.to_path_buf(),
            source,
        };

        let mut dirs = Vec::new();
        for entry in fs::read_dir(root).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.join(PARAMETERS_FILE).is_file() {
                dirs.push(path);
            }
        }
        dirs.sort();

        if dirs.is_empty() {
            return Err(TableLoadError::NoTaxYears(root.to_path_buf()));
        }

        let mut registry = TaxYearRegistry::new();
        for dir in dirs {
            let config = Self::load_year_dir(&dir)?;
            info!(tax_year = config.tax_year, dir = %dir.display(), "loaded tax tables");
            registry.insert(config)?;
        }
        Ok(registry)
    }

    /// Tables compiled into the binary.
    pub fn builtin_registry() -> Result<TaxYearRegistry, TableLoadError> {
        let config = Self::build_year(
            &Self::parse_brackets(BUILTIN_2024_BRACKETS.as_bytes())?,
            &Self::parse_standard_deductions(BUILTIN_2024_STANDARD_DEDUCTIONS.as_bytes())?,
            Self::parse_parameters(BUILTIN_2024_PARAMETERS)?,
        )?;

        let mut registry = TaxYearRegistry::new();
        registry.insert(config)?;
        Ok(registry)
    }
}

fn parse_csv<R, T>(reader: R) -> Result<Vec<T>, TableLoadError>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

fn open(path: &Path) -> Result<File, TableLoadError> {
    File::open(path).map_err(|source| TableLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn check_year(
    file: &'static str,
    expected: i32,
    found: i32,
) -> Result<(), TableLoadError> {
    if found != expected {
        return Err(TableLoadError::TaxYearMismatch {
            file,
            expected,
            found,
        });
    }
    Ok(())
}
