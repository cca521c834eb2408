//! Standard versus itemized deduction comparison, suggestions and what-if
//! scenarios.
//!
//! Each method is evaluated on its own (the deductions are never mixed) and
//! the method with the strictly lower liability is recommended. Ties go to
//! the standard deduction.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::BracketCalculator;
use crate::calculations::common::{format_currency, max, rate, round_half_up};
use crate::models::{count_child_tax_credit, count_earned_income_credit};
use crate::{
    ConfigurationError, DeductionComparison, DeductionMethod, DeductionScenario, Dependent,
    EmploymentType, FilingStatus, TaxReturnFacts, TaxYearConfig,
};

#[derive(Debug, Clone, Copy)]
pub struct DeductionOptimizer<'a> {
    config: &'a TaxYearConfig,
    brackets: BracketCalculator<'a>,
}

impl<'a> DeductionOptimizer<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self {
            config,
            brackets: BracketCalculator::new(config),
        }
    }

    /// Computes liability under both deduction methods and recommends the
    /// cheaper one.
    ///
    /// # Arguments
    ///
    /// * `adjusted_gross_income` - AGI; negative values count as zero
    /// * `filing_status` - Selects the rate schedule and standard deduction
    /// * `itemized_total` - Sum of itemized deductions; negative values count
    ///   as zero
    ///
    /// # Returns
    ///
    /// A [`DeductionComparison`] with both liabilities, their effective rates
    /// and the absolute difference. Ties recommend the standard deduction.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::DeductionOptimizer;
    /// use tax_core::{DeductionMethod, FilingStatus, StandardDeduction, TaxBracket, TaxYearConfig};
    /// # use tax_core::{CreditConfig, EitcPhaseInRates, PlanningConfig};
    /// let config = TaxYearConfig {
    ///     tax_year: 2024,
    ///     brackets: vec![TaxBracket {
    ///         tax_year: 2024,
    ///         filing_status: FilingStatus::Single,
    ///         min_income: dec!(0),
    ///         max_income: None,
    ///         tax_rate: dec!(0.10),
    ///         base_tax: dec!(0),
    ///     }],
    ///     standard_deductions: vec![StandardDeduction {
    ///         tax_year: 2024,
    ///         filing_status: FilingStatus::Single,
    ///         amount: dec!(10000),
    ///     }],
    /// #   credits: CreditConfig {
    /// #       child_tax_credit_per_child: dec!(2000),
    /// #       eitc_buckets: vec![],
    /// #       eitc_phase_in: EitcPhaseInRates {
    /// #           no_children: dec!(0),
    /// #           one_child: dec!(0),
    /// #           two_or_more_children: dec!(0),
    /// #       },
    /// #   },
    ///     planning: PlanningConfig {
    ///         near_itemize_gap: dec!(5000),
    ///         scenario_increments: vec![dec!(10000)],
    ///         retirement_agi_threshold: dec!(100000),
    ///         low_income_agi_threshold: dec!(30000),
    ///         catch_up_age: 50,
    ///     },
    /// };
    ///
    /// let comparison = DeductionOptimizer::new(&config)
    ///     .compare(dec!(50000), FilingStatus::Single, dec!(15000))
    ///     .unwrap();
    ///
    /// assert_eq!(comparison.standard_tax_liability, dec!(4000.00));
    /// assert_eq!(comparison.itemized_tax_liability, dec!(3500.00));
    /// assert_eq!(comparison.recommended_method, DeductionMethod::Itemized);
    /// assert_eq!(comparison.tax_savings, dec!(500.00));
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigurationError`] when the tax year lacks a schedule or
    /// standard deduction for `filing_status`.
    pub fn compare(
        &self,
        adjusted_gross_income: Decimal,
        filing_status: FilingStatus,
        itemized_total: Decimal,
    ) -> Result<DeductionComparison, ConfigurationError> {
        let agi = max(adjusted_gross_income, Decimal::ZERO);
        let itemized_deduction = round_half_up(max(itemized_total, Decimal::ZERO));
        let standard_deduction = self.brackets.standard_deduction(filing_status)?;

        let standard_taxable = max(agi - standard_deduction, Decimal::ZERO);
        let itemized_taxable = max(agi - itemized_deduction, Decimal::ZERO);

        let standard_tax_liability = self
            .brackets
            .compute_liability(standard_taxable, filing_status)?;
        let itemized_tax_liability = self
            .brackets
            .compute_liability(itemized_taxable, filing_status)?;

        let recommended_method = if itemized_tax_liability < standard_tax_liability {
            DeductionMethod::Itemized
        } else {
            DeductionMethod::Standard
        };

        debug!(
            %agi,
            %standard_tax_liability,
            %itemized_tax_liability,
            method = recommended_method.as_str(),
            "compared deduction methods"
        );

        Ok(DeductionComparison {
            standard_deduction,
            itemized_deduction,
            standard_tax_liability,
            itemized_tax_liability,
            recommended_method,
            tax_savings: (standard_tax_liability - itemized_tax_liability).abs(),
            effective_standard_rate: rate(standard_tax_liability, agi),
            effective_itemized_rate: rate(itemized_tax_liability, agi),
        })
    }

    /// Human-readable planning suggestions for a comparison.
    ///
    /// Every rule is evaluated independently; the order of the returned
    /// list is fixed: deduction method, near-itemizing, filing status, child
    /// tax credit, earned income credit, income-level advice.
    pub fn generate_optimization_suggestions(
        &self,
        comparison: &DeductionComparison,
        adjusted_gross_income: Decimal,
        filing_status: FilingStatus,
        dependents: &[Dependent],
    ) -> Vec<String> {
        let planning = &self.config.planning;
        let mut suggestions = Vec::new();

        suggestions.push(match comparison.recommended_method {
            _ if comparison.tax_savings.is_zero() => format!(
                "Standard and itemized deductions produce the same tax ({}); the standard deduction is simpler to claim.",
                format_currency(comparison.standard_tax_liability)
            ),
            DeductionMethod::Standard => format!(
                "Take the standard deduction of {}; it saves {} compared with itemizing.",
                format_currency(comparison.standard_deduction),
                format_currency(comparison.tax_savings)
            ),
            DeductionMethod::Itemized => format!(
                "Itemize your deductions ({}); it saves {} compared with the standard deduction.",
                format_currency(comparison.itemized_deduction),
                format_currency(comparison.tax_savings)
            ),
        });

        let gap = comparison.standard_deduction - comparison.itemized_deduction;
        if comparison.recommended_method == DeductionMethod::Standard
            && comparison.tax_savings > Decimal::ZERO
            && gap > Decimal::ZERO
            && gap < planning.near_itemize_gap
        {
            suggestions.push(format!(
                "You are close to itemizing: {} more in itemized deductions would match the standard deduction. Bunching charitable gifts or prepaying deductible expenses could close the gap.",
                format_currency(gap)
            ));
        }

        if filing_status == FilingStatus::MarriedFilingSeparately {
            suggestions.push(
                "Married filing separately often costs more in total; compare the result of filing jointly."
                    .to_string(),
            );
        }

        let ctc_children = count_child_tax_credit(dependents);
        if ctc_children > 0 {
            let potential =
                Decimal::from(ctc_children) * self.config.credits.child_tax_credit_per_child;
            suggestions.push(format!(
                "{} qualifying {} may provide up to {} in Child Tax Credit.",
                ctc_children,
                if ctc_children == 1 { "child" } else { "children" },
                format_currency(potential)
            ));
        }

        if count_earned_income_credit(dependents) > 0 {
            suggestions.push(
                "Your dependents may make you eligible for the Earned Income Credit; confirm eligibility against your earned income."
                    .to_string(),
            );
        }

        if adjusted_gross_income > planning.retirement_agi_threshold {
            suggestions.push(
                "Consider maximizing pre-tax retirement contributions (401(k), traditional IRA) to reduce taxable income."
                    .to_string(),
            );
        } else if adjusted_gross_income > Decimal::ZERO
            && adjusted_gross_income < planning.low_income_agi_threshold
        {
            suggestions.push(
                "At this income level, check your eligibility for the Saver's Credit and the Earned Income Credit."
                    .to_string(),
            );
        }

        suggestions
    }

    /// Suggestions driven by the taxpayer profile rather than the numbers.
    pub fn profile_suggestions(
        &self,
        facts: &TaxReturnFacts,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if facts.age.is_some_and(|age| age >= self.config.planning.catch_up_age) {
            suggestions.push(
                "You are old enough for catch-up contributions to 401(k) plans and IRAs.".to_string(),
            );
        }

        if facts.has_business_income || facts.employment_type == Some(EmploymentType::SelfEmployed)
        {
            suggestions.push(
                "Business income may owe self-employment tax; track deductible business expenses and consider quarterly estimated payments."
                    .to_string(),
            );
        }

        if facts.has_investment_income {
            suggestions.push(
                "Review investment positions for tax-loss harvesting opportunities before year end."
                    .to_string(),
            );
        }

        if facts.has_retirement_income || facts.employment_type == Some(EmploymentType::Retired) {
            suggestions.push(
                "Plan retirement account withdrawals to avoid pushing income into a higher bracket."
                    .to_string(),
            );
        }

        suggestions
    }

    /// What-if ladder of increased itemized deductions.
    ///
    /// The first entry is the current baseline with zero savings. Every rung
    /// adds one configured increment to the current itemized total and is
    /// compared independently, so savings are always relative to the
    /// baseline and never cumulative.
    ///
    /// # Arguments
    ///
    /// * `adjusted_gross_income` - AGI the ladder is evaluated at
    /// * `filing_status` - Selects the rate schedule and standard deduction
    /// * `current_itemized` - Today's itemized total; negative values count
    ///   as zero
    ///
    /// # Returns
    ///
    /// One [`DeductionScenario`] for the baseline followed by one per
    /// configured increment, each priced at its better deduction method.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::DeductionOptimizer;
    /// use tax_core::{FilingStatus, StandardDeduction, TaxBracket, TaxYearConfig};
    /// # use tax_core::{CreditConfig, EitcPhaseInRates, PlanningConfig};
    /// let config = TaxYearConfig {
    ///     tax_year: 2024,
    ///     brackets: vec![TaxBracket {
    ///         tax_year: 2024,
    ///         filing_status: FilingStatus::Single,
    ///         min_income: dec!(0),
    ///         max_income: None,
    ///         tax_rate: dec!(0.10),
    ///         base_tax: dec!(0),
    ///     }],
    ///     standard_deductions: vec![StandardDeduction {
    ///         tax_year: 2024,
    ///         filing_status: FilingStatus::Single,
    ///         amount: dec!(10000),
    ///     }],
    /// #   credits: CreditConfig {
    /// #       child_tax_credit_per_child: dec!(2000),
    /// #       eitc_buckets: vec![],
    /// #       eitc_phase_in: EitcPhaseInRates {
    /// #           no_children: dec!(0),
    /// #           one_child: dec!(0),
    /// #           two_or_more_children: dec!(0),
    /// #       },
    /// #   },
    ///     planning: PlanningConfig {
    ///         near_itemize_gap: dec!(5000),
    ///         scenario_increments: vec![dec!(10000)],
    ///         retirement_agi_threshold: dec!(100000),
    ///         low_income_agi_threshold: dec!(30000),
    ///         catch_up_age: 50,
    ///     },
    /// };
    ///
    /// let scenarios = DeductionOptimizer::new(&config)
    ///     .generate_scenarios(dec!(50000), FilingStatus::Single, dec!(2000))
    ///     .unwrap();
    ///
    /// // the baseline takes the 10,000 standard deduction
    /// assert_eq!(scenarios[0].liability, dec!(4000.00));
    /// assert_eq!(scenarios[1].itemized_total, dec!(12000));
    /// assert_eq!(scenarios[1].savings_vs_current, dec!(200.00));
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigurationError`] from [`Self::compare`].
    pub fn generate_scenarios(
        &self,
        adjusted_gross_income: Decimal,
        filing_status: FilingStatus,
        current_itemized: Decimal,
    ) -> Result<Vec<DeductionScenario>, ConfigurationError> {
        let current_itemized = max(current_itemized, Decimal::ZERO);
        let baseline = self
            .compare(adjusted_gross_income, filing_status, current_itemized)?
            .recommended_liability();

        let mut scenarios = vec![DeductionScenario {
            label: "Current deductions".to_string(),
            itemized_total: round_half_up(current_itemized),
            liability: baseline,
            savings_vs_current: Decimal::ZERO,
        }];

        for increment in &self.config.planning.scenario_increments {
            let itemized_total = round_half_up(current_itemized + increment);
            let liability = self
                .compare(adjusted_gross_income, filing_status, itemized_total)?
                .recommended_liability();

            scenarios.push(DeductionScenario {
                label: format!("Itemize {} more", format_currency(*increment)),
                itemized_total,
                liability,
                savings_vs_current: baseline - liability,
            });
        }

        Ok(scenarios)
    }
}
