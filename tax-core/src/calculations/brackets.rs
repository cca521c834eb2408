//! Progressive bracket tax for a filing status's rate schedule.
//!
//! Liability is accumulated bracket by bracket: each bracket whose lower
//! bound is below the taxable income taxes the slice of income between its
//! bounds at its marginal rate. The result is rounded half-up to cents.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::BracketCalculator;
//! use tax_core::{FilingStatus, TaxBracket, TaxYearConfig};
//! # use tax_core::{CreditConfig, EitcPhaseInRates, PlanningConfig};
//!
//! let brackets = vec![
//!     TaxBracket {
//!         tax_year: 2024,
//!         filing_status: FilingStatus::Single,
//!         min_income: dec!(0),
//!         max_income: Some(dec!(11600)),
//!         tax_rate: dec!(0.10),
//!         base_tax: dec!(0),
//!     },
//!     TaxBracket {
//!         tax_year: 2024,
//!         filing_status: FilingStatus::Single,
//!         min_income: dec!(11600),
//!         max_income: None,
//!         tax_rate: dec!(0.12),
//!         base_tax: dec!(1160),
//!     },
//! ];
//! # let config = TaxYearConfig {
//! #     tax_year: 2024,
//! #     brackets,
//! #     standard_deductions: vec![],
//! #     credits: CreditConfig {
//! #         child_tax_credit_per_child: dec!(2000),
//! #         eitc_buckets: vec![],
//! #         eitc_phase_in: EitcPhaseInRates {
//! #             no_children: dec!(0),
//! #             one_child: dec!(0),
//! #             two_or_more_children: dec!(0),
//! #         },
//! #     },
//! #     planning: PlanningConfig {
//! #         near_itemize_gap: dec!(5000),
//! #         scenario_increments: vec![],
//! #         retirement_agi_threshold: dec!(100000),
//! #         low_income_agi_threshold: dec!(30000),
//! #         catch_up_age: 50,
//! #     },
//! # };
//!
//! let calculator = BracketCalculator::new(&config);
//! let tax = calculator.compute_liability(dec!(20000), FilingStatus::Single).unwrap();
//!
//! // 11600 × 10% + 8400 × 12%
//! assert_eq!(tax, dec!(2168.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::{ConfigurationError, FilingStatus, TaxYearConfig};

/// Calculator over one tax year's rate schedules.
#[derive(Debug, Clone, Copy)]
pub struct BracketCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> BracketCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Tax owed on `taxable_income` under `filing_status`'s schedule.
    ///
    /// Negative income is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingBrackets`] when the tax year has no
    /// schedule for `filing_status`. An unknown schedule is never treated as
    /// zero tax.
    pub fn compute_liability(
        &self,
        taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Result<Decimal, ConfigurationError> {
        let brackets = self.config.brackets_for(filing_status)?;
        let income = max(taxable_income, Decimal::ZERO);

        let mut tax = Decimal::ZERO;
        for bracket in brackets {
            if income <= bracket.min_income {
                break;
            }
            tax += bracket.portion_of(income) * bracket.tax_rate;
        }

        let tax = round_half_up(tax);
        debug!(%income, %filing_status, %tax, "computed bracket liability");
        Ok(tax)
    }

    /// Tax owed computed from the schedule's closed form: the containing
    /// bracket's `base_tax` plus the marginal slice at its rate.
    ///
    /// Agrees with [`Self::compute_liability`] for any validated table.
    pub fn closed_form_liability(
        &self,
        taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Result<Decimal, ConfigurationError> {
        let brackets = self.config.brackets_for(filing_status)?;
        if taxable_income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let bracket = brackets
            .iter()
            .find(|b| b.contains(taxable_income))
            .ok_or_else(|| ConfigurationError::InvalidBracketTable {
                tax_year: self.config.tax_year,
                filing_status,
                reason: format!("no bracket covers taxable income {taxable_income}"),
            })?;

        let marginal_income = taxable_income - bracket.min_income;
        Ok(round_half_up(bracket.base_tax + marginal_income * bracket.tax_rate))
    }

    /// Flat standard deduction for `filing_status`.
    pub fn standard_deduction(
        &self,
        filing_status: FilingStatus,
    ) -> Result<Decimal, ConfigurationError> {
        self.config.standard_deduction_for(filing_status)
    }

    /// Rate of the highest bracket `taxable_income` reaches; zero for no
    /// taxable income.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
        filing_status: FilingStatus,
    ) -> Result<Decimal, ConfigurationError> {
        let brackets = self.config.brackets_for(filing_status)?;
        if taxable_income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        Ok(brackets
            .iter()
            .take_while(|b| taxable_income > b.min_income)
            .last()
            .map_or(Decimal::ZERO, |b| b.tax_rate))
    }

    pub fn tax_year(&self) -> i32 {
        self.config.tax_year
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::test_support::config_2024;

    // =========================================================================
    // compute_liability tests
    // =========================================================================

    #[test]
    fn compute_liability_is_zero_for_zero_income_in_every_status() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        for status in FilingStatus::ALL {
            assert_eq!(calculator.compute_liability(dec!(0), status), Ok(dec!(0)));
        }
    }

    #[test]
    fn compute_liability_treats_negative_income_as_zero() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        assert_eq!(
            calculator.compute_liability(dec!(-2500), FilingStatus::Single),
            Ok(dec!(0))
        );
    }

    #[test]
    fn compute_liability_first_bracket() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        let result = calculator.compute_liability(dec!(10000), FilingStatus::Single);

        assert_eq!(result, Ok(dec!(1000.00)));
    }

    #[test]
    fn compute_liability_single_third_bracket() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        let result = calculator.compute_liability(dec!(60400), FilingStatus::Single);

        // 1160 + (47150 - 11600) * 0.12 + (60400 - 47150) * 0.22 = 1160 + 4266 + 2915
        assert_eq!(result, Ok(dec!(8341.00)));
    }

    #[test]
    fn compute_liability_at_bracket_boundary() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        let result = calculator.compute_liability(dec!(47150), FilingStatus::Single);

        assert_eq!(result, Ok(dec!(5426.00)));
    }

    #[test]
    fn compute_liability_top_bracket() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        let result = calculator.compute_liability(dec!(700000), FilingStatus::Single);

        // 183647.25 + (700000 - 609350) * 0.37 = 183647.25 + 33540.50
        assert_eq!(result, Ok(dec!(217187.75)));
    }

    #[test]
    fn compute_liability_rounds_to_cents() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        let result = calculator.compute_liability(dec!(12345.67), FilingStatus::Single);

        // 1160 + 745.67 * 0.12 = 1160 + 89.4804
        assert_eq!(result, Ok(dec!(1249.48)));
    }

    #[test]
    fn compute_liability_missing_schedule_is_error() {
        let mut config = config_2024();
        config
            .brackets
            .retain(|b| b.filing_status != FilingStatus::QualifyingSurvivingSpouse);
        let calculator = BracketCalculator::new(&config);

        let result =
            calculator.compute_liability(dec!(50000), FilingStatus::QualifyingSurvivingSpouse);

        assert_eq!(
            result,
            Err(ConfigurationError::MissingBrackets {
                tax_year: 2024,
                filing_status: FilingStatus::QualifyingSurvivingSpouse,
            })
        );
    }

    #[test]
    fn compute_liability_is_monotonic_and_matches_closed_form() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        for status in FilingStatus::ALL {
            let mut previous = Decimal::ZERO;
            let mut income = Decimal::ZERO;
            while income <= dec!(800000) {
                let tax = calculator.compute_liability(income, status).unwrap();
                let closed = calculator.closed_form_liability(income, status).unwrap();

                assert!(tax >= previous, "{status} not monotonic at {income}");
                assert_eq!(tax, closed, "{status} mismatch at {income}");

                previous = tax;
                income += dec!(1234.57);
            }
        }
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_is_zero_without_income() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        assert_eq!(
            calculator.marginal_rate(dec!(0), FilingStatus::Single),
            Ok(dec!(0))
        );
    }

    #[test]
    fn marginal_rate_uses_highest_bracket_reached() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        assert_eq!(
            calculator.marginal_rate(dec!(11600), FilingStatus::Single),
            Ok(dec!(0.10))
        );
        assert_eq!(
            calculator.marginal_rate(dec!(11600.01), FilingStatus::Single),
            Ok(dec!(0.12))
        );
        assert_eq!(
            calculator.marginal_rate(dec!(170800), FilingStatus::MarriedFilingJointly),
            Ok(dec!(0.22))
        );
        assert_eq!(
            calculator.marginal_rate(dec!(5000000), FilingStatus::HeadOfHousehold),
            Ok(dec!(0.37))
        );
    }

    #[test]
    fn standard_deduction_lookup() {
        let config = config_2024();
        let calculator = BracketCalculator::new(&config);

        assert_eq!(
            calculator.standard_deduction(FilingStatus::MarriedFilingJointly),
            Ok(dec!(29200))
        );
    }
}
