//! Full return computation composed from the bracket, deduction and credit
//! calculators.
//!
//! # Sequence
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | AGI = gross income (no above-the-line adjustments) |
//! | 2    | Deduction = larger of standard and itemized |
//! | 3    | Taxable income = AGI - deduction, minimum 0 |
//! | 4    | Liability from the rate schedule |
//! | 5    | Credits = Child Tax Credit + Earned Income Credit |
//! | 6    | Final tax = liability - credits - withholdings |
//! | 7    | Negative final tax is a refund, positive is owed |
//!
//! The effective rate is tax after credits (minimum 0) over AGI, so a refund
//! driven by withholding never produces a negative rate.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculations::brackets::BracketCalculator;
use crate::calculations::common::{max, rate, round_half_up};
use crate::calculations::credits::CreditCalculator;
use crate::calculations::deductions::DeductionOptimizer;
use crate::{
    ConfigurationError, DeductionMethod, DeductionScenario, EnhancedTaxCalculationResult,
    TaxCalculationResult, TaxReturnFacts, TaxYearConfig,
};

#[derive(Debug, Clone, Copy)]
pub struct TaxReturnCalculator<'a> {
    config: &'a TaxYearConfig,
    brackets: BracketCalculator<'a>,
    credits: CreditCalculator<'a>,
    optimizer: DeductionOptimizer<'a>,
}

impl<'a> TaxReturnCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self {
            config,
            brackets: BracketCalculator::new(config),
            credits: CreditCalculator::new(&config.credits),
            optimizer: DeductionOptimizer::new(config),
        }
    }

    /// Computes liability and refund/amount owed using the larger deduction.
    ///
    /// Negative monetary inputs are clamped to zero.
    ///
    /// # Arguments
    ///
    /// * `facts` - The return's income, deductions, dependents and
    ///   withholdings for this calculator's tax year
    ///
    /// # Returns
    ///
    /// A [`TaxCalculationResult`] in which at most one of `refund_amount` and
    /// `amount_owed` is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when `facts` are for a different tax
    /// year than the loaded tables or the tables lack the filing status.
    pub fn compute_return(
        &self,
        facts: &TaxReturnFacts,
    ) -> Result<TaxCalculationResult, ConfigurationError> {
        self.check_tax_year(facts)?;
        let facts = facts.clamped();

        let standard = self.brackets.standard_deduction(facts.filing_status)?;
        let method = if round_half_up(facts.itemized_deductions) > standard {
            DeductionMethod::Itemized
        } else {
            DeductionMethod::Standard
        };

        self.assemble(&facts, method)
    }

    /// Computes the return with the optimizer's recommended deduction method
    /// and attaches the comparison and all suggestions.
    pub fn compute_enhanced_return(
        &self,
        facts: &TaxReturnFacts,
    ) -> Result<EnhancedTaxCalculationResult, ConfigurationError> {
        self.check_tax_year(facts)?;
        let facts = facts.clamped();

        let comparison = self.optimizer.compare(
            facts.gross_income,
            facts.filing_status,
            facts.itemized_deductions,
        )?;
        let result = self.assemble(&facts, comparison.recommended_method)?;

        let mut suggestions = self.optimizer.generate_optimization_suggestions(
            &comparison,
            result.adjusted_gross_income,
            facts.filing_status,
            &facts.dependents,
        );
        suggestions.extend(self.optimizer.profile_suggestions(&facts));

        info!(
            tax_year = result.tax_year,
            filing_status = %facts.filing_status,
            final_tax = %result.final_tax,
            method = result.deduction_method.as_str(),
            "computed return"
        );

        Ok(EnhancedTaxCalculationResult {
            result,
            deduction_comparison: comparison,
            suggestions,
        })
    }

    /// What-if itemized deduction ladder for `facts`.
    pub fn scenarios(
        &self,
        facts: &TaxReturnFacts,
    ) -> Result<Vec<DeductionScenario>, ConfigurationError> {
        self.check_tax_year(facts)?;
        let facts = facts.clamped();

        self.optimizer.generate_scenarios(
            facts.gross_income,
            facts.filing_status,
            facts.itemized_deductions,
        )
    }

    fn check_tax_year(
        &self,
        facts: &TaxReturnFacts,
    ) -> Result<(), ConfigurationError> {
        if facts.tax_year != self.config.tax_year {
            return Err(ConfigurationError::TaxYearMismatch {
                requested: facts.tax_year,
                loaded: self.config.tax_year,
            });
        }
        Ok(())
    }

    fn assemble(
        &self,
        facts: &TaxReturnFacts,
        method: DeductionMethod,
    ) -> Result<TaxCalculationResult, ConfigurationError> {
        let status = facts.filing_status;
        let gross_income = round_half_up(facts.gross_income);
        let adjusted_gross_income = gross_income;

        let standard_deduction = self.brackets.standard_deduction(status)?;
        let itemized_deduction = round_half_up(facts.itemized_deductions);
        let deduction = match method {
            DeductionMethod::Standard => standard_deduction,
            DeductionMethod::Itemized => itemized_deduction,
        };

        let taxable_income = max(adjusted_gross_income - deduction, Decimal::ZERO);
        let tax_liability = self.brackets.compute_liability(taxable_income, status)?;

        let child_tax_credit = self.credits.child_tax_credit(&facts.dependents);
        let earned_income_credit = self
            .credits
            .earned_income_credit(adjusted_gross_income, &facts.dependents)?;
        let total_credits = child_tax_credit + earned_income_credit;

        let withholdings = round_half_up(facts.total_withholdings);
        let final_tax = tax_liability - total_credits - withholdings;
        let (refund_amount, amount_owed) = if final_tax < Decimal::ZERO {
            (-final_tax, Decimal::ZERO)
        } else {
            (Decimal::ZERO, final_tax)
        };

        let tax_after_credits = max(tax_liability - total_credits, Decimal::ZERO);
        let marginal_rate = self.brackets.marginal_rate(taxable_income, status)?;

        debug!(
            %taxable_income,
            %tax_liability,
            %total_credits,
            %withholdings,
            %final_tax,
            "assembled return"
        );

        Ok(TaxCalculationResult {
            tax_year: self.config.tax_year,
            gross_income,
            adjusted_gross_income,
            standard_deduction,
            itemized_deduction,
            deduction_method: method,
            taxable_income,
            tax_liability,
            child_tax_credit,
            earned_income_credit,
            total_credits,
            final_tax,
            refund_amount,
            amount_owed,
            effective_rate: rate(tax_after_credits, adjusted_gross_income),
            marginal_rate,
        })
    }
}
