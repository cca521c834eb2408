use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Dependent, FilingStatus};

pub const DEFAULT_TAX_YEAR: i32 = 2024;

fn default_tax_year() -> i32 {
    DEFAULT_TAX_YEAR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Employee,
    SelfEmployed,
    Retired,
    Unemployed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Wages,
    Interest,
    Dividends,
    CapitalGains,
    Business,
    Rental,
    Retirement,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub source: IncomeSource,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    MortgageInterest,
    StateAndLocalTaxes,
    Charitable,
    Medical,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionEntry {
    pub category: DeductionCategory,
    pub amount: Decimal,
}

/// Financial facts for one return, built fresh for each computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturnFacts {
    #[serde(default = "default_tax_year")]
    pub tax_year: i32,
    pub gross_income: Decimal,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub itemized_deductions: Decimal,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    #[serde(default)]
    pub total_withholdings: Decimal,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub has_business_income: bool,
    #[serde(default)]
    pub has_investment_income: bool,
    #[serde(default)]
    pub has_retirement_income: bool,
}

impl TaxReturnFacts {
    pub fn new(
        filing_status: FilingStatus,
        gross_income: Decimal,
    ) -> Self {
        Self {
            tax_year: DEFAULT_TAX_YEAR,
            gross_income,
            filing_status,
            itemized_deductions: Decimal::ZERO,
            dependents: Vec::new(),
            total_withholdings: Decimal::ZERO,
            age: None,
            employment_type: None,
            has_business_income: false,
            has_investment_income: false,
            has_retirement_income: false,
        }
    }

    /// Builds facts from individual income and deduction line items.
    ///
    /// Negative entries are clamped to zero before summing. Income flags are
    /// derived from the sources present with a positive amount.
    pub fn from_entries(
        tax_year: i32,
        filing_status: FilingStatus,
        incomes: &[IncomeEntry],
        deductions: &[DeductionEntry],
        dependents: Vec<Dependent>,
        total_withholdings: Decimal,
    ) -> Self {
        let has_source = |wanted: &[IncomeSource]| {
            incomes
                .iter()
                .any(|e| wanted.contains(&e.source) && e.amount > Decimal::ZERO)
        };

        Self {
            tax_year,
            gross_income: incomes.iter().map(|e| clamp_non_negative("income entry", e.amount)).sum(),
            filing_status,
            itemized_deductions: deductions
                .iter()
                .map(|e| clamp_non_negative("deduction entry", e.amount))
                .sum(),
            dependents,
            total_withholdings: clamp_non_negative("total_withholdings", total_withholdings),
            age: None,
            employment_type: None,
            has_business_income: has_source(&[IncomeSource::Business]),
            has_investment_income: has_source(&[
                IncomeSource::Interest,
                IncomeSource::Dividends,
                IncomeSource::CapitalGains,
            ]),
            has_retirement_income: has_source(&[IncomeSource::Retirement]),
        }
    }

    /// Copy of these facts with negative monetary inputs clamped to zero.
    pub fn clamped(&self) -> Self {
        Self {
            gross_income: clamp_non_negative("gross_income", self.gross_income),
            itemized_deductions: clamp_non_negative("itemized_deductions", self.itemized_deductions),
            total_withholdings: clamp_non_negative("total_withholdings", self.total_withholdings),
            ..self.clone()
        }
    }
}

/// Return facts given as line items instead of totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturnEntries {
    #[serde(default = "default_tax_year")]
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub incomes: Vec<IncomeEntry>,
    #[serde(default)]
    pub deductions: Vec<DeductionEntry>,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    #[serde(default)]
    pub total_withholdings: Decimal,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
}

/// Either shape a return can be submitted in: itemized line items
/// (recognized by their `incomes` list) or precomputed totals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TaxReturnInput {
    Entries(TaxReturnEntries),
    Facts(TaxReturnFacts),
}

impl TaxReturnInput {
    pub fn into_facts(self) -> TaxReturnFacts {
        match self {
            Self::Facts(facts) => facts,
            Self::Entries(entries) => {
                let mut facts = TaxReturnFacts::from_entries(
                    entries.tax_year,
                    entries.filing_status,
                    &entries.incomes,
                    &entries.deductions,
                    entries.dependents,
                    entries.total_withholdings,
                );
                facts.age = entries.age;
                facts.employment_type = entries.employment_type;
                facts
            }
        }
    }
}

fn clamp_non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative input clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}
