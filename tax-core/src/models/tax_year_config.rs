use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{FilingStatus, StandardDeduction, TaxBracket};
use crate::calculations::common::round_half_up;

/// Fatal problems with the tax tables themselves.
///
/// These are never downgraded to a zero result: a calculation that cannot
/// find its tables must fail so the audit trail is not silently corrupted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no tax tables loaded for tax year {0}")]
    UnknownTaxYear(i32),

    #[error("facts are for tax year {requested} but the tables are for {loaded}")]
    TaxYearMismatch { requested: i32, loaded: i32 },

    #[error("no tax brackets for {filing_status} in tax year {tax_year}")]
    MissingBrackets {
        tax_year: i32,
        filing_status: FilingStatus,
    },

    #[error("no standard deduction for {filing_status} in tax year {tax_year}")]
    MissingStandardDeduction {
        tax_year: i32,
        filing_status: FilingStatus,
    },

    #[error("invalid bracket table for {filing_status} in tax year {tax_year}: {reason}")]
    InvalidBracketTable {
        tax_year: i32,
        filing_status: FilingStatus,
        reason: String,
    },

    #[error("no earned income credit entry for {0} qualifying children")]
    MissingEitcBucket(u8),

    #[error("invalid credit table: {0}")]
    InvalidCreditTable(String),
}

/// Maximum credit and income cliff for one qualifying-child count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcBucket {
    pub qualifying_children: u8,
    pub max_credit: Decimal,
    pub income_limit: Decimal,
}

/// Phase-in rate per child-count bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcPhaseInRates {
    pub no_children: Decimal,
    pub one_child: Decimal,
    pub two_or_more_children: Decimal,
}

impl EitcPhaseInRates {
    pub fn for_children(
        &self,
        qualifying_children: u8,
    ) -> Decimal {
        match qualifying_children {
            0 => self.no_children,
            1 => self.one_child,
            _ => self.two_or_more_children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditConfig {
    pub child_tax_credit_per_child: Decimal,
    pub eitc_buckets: Vec<EitcBucket>,
    pub eitc_phase_in: EitcPhaseInRates,
}

impl CreditConfig {
    pub fn eitc_bucket(
        &self,
        qualifying_children: u8,
    ) -> Result<&EitcBucket, ConfigurationError> {
        self.eitc_buckets
            .iter()
            .find(|b| b.qualifying_children == qualifying_children)
            .ok_or(ConfigurationError::MissingEitcBucket(qualifying_children))
    }
}

/// Thresholds used by the deduction optimizer's suggestions and scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Deduction gap under which "close to itemizing" is flagged.
    pub near_itemize_gap: Decimal,
    /// Additional itemized amounts tried by the scenario ladder.
    pub scenario_increments: Vec<Decimal>,
    /// AGI above which retirement contributions are suggested.
    pub retirement_agi_threshold: Decimal,
    /// AGI below which low-income credits are suggested.
    pub low_income_agi_threshold: Decimal,
    /// Age at which catch-up retirement contributions become available.
    pub catch_up_age: u32,
}

/// Every table needed to compute one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub brackets: Vec<TaxBracket>,
    pub standard_deductions: Vec<StandardDeduction>,
    pub credits: CreditConfig,
    pub planning: PlanningConfig,
}

impl TaxYearConfig {
    /// Brackets for `filing_status` in ascending order.
    pub fn brackets_for(
        &self,
        filing_status: FilingStatus,
    ) -> Result<Vec<&TaxBracket>, ConfigurationError> {
        let mut brackets: Vec<&TaxBracket> = self
            .brackets
            .iter()
            .filter(|b| b.filing_status == filing_status)
            .collect();

        if brackets.is_empty() {
            return Err(ConfigurationError::MissingBrackets {
                tax_year: self.tax_year,
                filing_status,
            });
        }

        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        Ok(brackets)
    }

    pub fn standard_deduction_for(
        &self,
        filing_status: FilingStatus,
    ) -> Result<Decimal, ConfigurationError> {
        self.standard_deductions
            .iter()
            .find(|d| d.filing_status == filing_status)
            .map(|d| d.amount)
            .ok_or(ConfigurationError::MissingStandardDeduction {
                tax_year: self.tax_year,
                filing_status,
            })
    }

    /// Checks every table for structural consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found. Bracket schedules must
    /// start at zero, be contiguous and gapless, end in a single unbounded
    /// bracket, have strictly increasing rates and carry `base_tax` values
    /// that match the accumulated tax of the brackets below them.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for status in FilingStatus::ALL {
            self.validate_brackets(status)?;
            self.standard_deduction_for(status)?;
        }
        self.validate_credits()
    }

    fn validate_brackets(
        &self,
        filing_status: FilingStatus,
    ) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidBracketTable {
            tax_year: self.tax_year,
            filing_status,
            reason,
        };

        let brackets = self.brackets_for(filing_status)?;

        if brackets[0].min_income != Decimal::ZERO {
            return Err(invalid(format!(
                "first bracket starts at {} instead of 0",
                brackets[0].min_income
            )));
        }

        let mut accumulated = Decimal::ZERO;
        for (idx, bracket) in brackets.iter().enumerate() {
            if bracket.tax_year != self.tax_year {
                return Err(invalid(format!(
                    "bracket starting at {} belongs to tax year {}",
                    bracket.min_income, bracket.tax_year
                )));
            }

            if round_half_up(accumulated) != round_half_up(bracket.base_tax) {
                return Err(invalid(format!(
                    "base tax {} at {} does not match accumulated tax {}",
                    bracket.base_tax,
                    bracket.min_income,
                    round_half_up(accumulated)
                )));
            }

            let is_last = idx + 1 == brackets.len();
            match (bracket.max_income, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(invalid(format!(
                        "bracket starting at {} is unbounded but is not the last",
                        bracket.min_income
                    )));
                }
                (Some(max), true) => {
                    return Err(invalid(format!(
                        "top bracket ends at {max}; it must be unbounded"
                    )));
                }
                (Some(max), false) => {
                    let next = brackets[idx + 1];
                    if max <= bracket.min_income {
                        return Err(invalid(format!(
                            "bracket bounds {}..{} are empty",
                            bracket.min_income, max
                        )));
                    }
                    if next.min_income != max {
                        return Err(invalid(format!(
                            "gap or overlap between {} and {}",
                            max, next.min_income
                        )));
                    }
                    if next.tax_rate <= bracket.tax_rate {
                        return Err(invalid(format!(
                            "rate {} at {} does not exceed previous rate {}",
                            next.tax_rate, next.min_income, bracket.tax_rate
                        )));
                    }
                    accumulated += (max - bracket.min_income) * bracket.tax_rate;
                }
            }
        }

        Ok(())
    }

    fn validate_credits(&self) -> Result<(), ConfigurationError> {
        let credits = &self.credits;

        if credits.child_tax_credit_per_child < Decimal::ZERO {
            return Err(ConfigurationError::InvalidCreditTable(format!(
                "child tax credit per child is negative: {}",
                credits.child_tax_credit_per_child
            )));
        }

        for children in 0..=crate::calculations::credits::EITC_MAX_QUALIFYING_CHILDREN {
            let bucket = credits.eitc_bucket(children)?;
            if bucket.max_credit < Decimal::ZERO || bucket.income_limit <= Decimal::ZERO {
                return Err(ConfigurationError::InvalidCreditTable(format!(
                    "earned income credit entry for {children} children has max credit {} and income limit {}",
                    bucket.max_credit, bucket.income_limit
                )));
            }
        }

        let rates = &credits.eitc_phase_in;
        for rate in [rates.no_children, rates.one_child, rates.two_or_more_children] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ConfigurationError::InvalidCreditTable(format!(
                    "earned income credit phase-in rate must be between 0 and 1, got {rate}"
                )));
            }
        }

        Ok(())
    }
}

/// Immutable set of tax-year tables keyed by year.
#[derive(Debug, Clone, Default)]
pub struct TaxYearRegistry {
    years: BTreeMap<i32, TaxYearConfig>,
}

impl TaxYearRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers `config`, replacing any tables already held for
    /// the same year.
    pub fn insert(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<(), ConfigurationError> {
        config.validate()?;
        self.years.insert(config.tax_year, config);
        Ok(())
    }

    pub fn get(
        &self,
        tax_year: i32,
    ) -> Result<&TaxYearConfig, ConfigurationError> {
        self.years
            .get(&tax_year)
            .ok_or(ConfigurationError::UnknownTaxYear(tax_year))
    }

    /// Most recent year with loaded tables.
    pub fn latest(&self) -> Option<&TaxYearConfig> {
        self.years.values().next_back()
    }

    pub fn tax_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::config_2024;

    #[test]
    fn validate_accepts_2024_tables() {
        assert_eq!(config_2024().validate(), Ok(()));
    }

    #[test]
    fn brackets_for_returns_ascending_order() {
        let mut config = config_2024();
        config.brackets.reverse();

        let brackets = config.brackets_for(FilingStatus::Single).unwrap();

        assert_eq!(brackets.len(), 7);
        assert_eq!(brackets[0].min_income, dec!(0));
        assert_eq!(brackets[6].max_income, None);
    }

    #[test]
    fn brackets_for_missing_status_is_error() {
        let mut config = config_2024();
        config
            .brackets
            .retain(|b| b.filing_status != FilingStatus::HeadOfHousehold);

        let result = config.brackets_for(FilingStatus::HeadOfHousehold);

        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingBrackets {
                tax_year: 2024,
                filing_status: FilingStatus::HeadOfHousehold,
            })
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let mut config = config_2024();
        let bracket = config
            .brackets
            .iter_mut()
            .find(|b| b.filing_status == FilingStatus::Single && b.min_income == dec!(11600))
            .unwrap();
        bracket.min_income = dec!(11700);

        let err = config.validate().unwrap_err();

        let ConfigurationError::InvalidBracketTable { filing_status, reason, .. } = err else {
            panic!("expected InvalidBracketTable, got {err:?}");
        };
        assert_eq!(filing_status, FilingStatus::Single);
        assert!(reason.contains("gap or overlap"), "reason: {reason}");
    }

    #[test]
    fn validate_rejects_non_increasing_rates() {
        let mut config = config_2024();
        let bracket = config
            .brackets
            .iter_mut()
            .find(|b| {
                b.filing_status == FilingStatus::MarriedFilingJointly && b.tax_rate == dec!(0.24)
            })
            .unwrap();
        bracket.tax_rate = dec!(0.22);

        let err = config.validate().unwrap_err();

        assert!(
            matches!(err, ConfigurationError::InvalidBracketTable { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn validate_rejects_inconsistent_base_tax() {
        let mut config = config_2024();
        let bracket = config
            .brackets
            .iter_mut()
            .find(|b| b.filing_status == FilingStatus::HeadOfHousehold && b.tax_rate == dec!(0.22))
            .unwrap();
        bracket.base_tax += dec!(1);

        let err = config.validate().unwrap_err();

        let ConfigurationError::InvalidBracketTable { reason, .. } = err else {
            panic!("expected InvalidBracketTable, got {err:?}");
        };
        assert!(reason.contains("base tax"), "reason: {reason}");
    }

    #[test]
    fn validate_rejects_bounded_top_bracket() {
        let mut config = config_2024();
        let top = config
            .brackets
            .iter_mut()
            .find(|b| b.filing_status == FilingStatus::Single && b.max_income.is_none())
            .unwrap();
        top.max_income = Some(dec!(10000000));

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_every_eitc_bucket() {
        let mut config = config_2024();
        config.credits.eitc_buckets.retain(|b| b.qualifying_children != 2);

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::MissingEitcBucket(2))
        );
    }

    #[test]
    fn standard_deduction_lookup() {
        let config = config_2024();

        assert_eq!(
            config.standard_deduction_for(FilingStatus::HeadOfHousehold),
            Ok(dec!(21900))
        );
    }

    // =========================================================================
    // registry tests
    // =========================================================================

    #[test]
    fn registry_returns_inserted_year() {
        let mut registry = TaxYearRegistry::new();
        registry.insert(config_2024()).unwrap();

        assert_eq!(registry.get(2024).map(|c| c.tax_year), Ok(2024));
        assert_eq!(registry.tax_years(), vec![2024]);
        assert_eq!(registry.latest().map(|c| c.tax_year), Some(2024));
    }

    #[test]
    fn registry_unknown_year_is_configuration_error() {
        let registry = TaxYearRegistry::new();

        assert_eq!(
            registry.get(1999).err(),
            Some(ConfigurationError::UnknownTaxYear(1999))
        );
    }

    #[test]
    fn registry_refuses_invalid_tables() {
        let mut config = config_2024();
        config.standard_deductions.clear();
        let mut registry = TaxYearRegistry::new();

        assert!(registry.insert(config).is_err());
        assert!(registry.tax_years().is_empty());
    }
}
