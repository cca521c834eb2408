//! Child Tax Credit and a simplified Earned Income Credit.
//!
//! The earned income credit here only phases in: the credit grows at the
//! bucket's phase-in rate until it reaches the bucket maximum, then drops to
//! zero once income exceeds the bucket's income limit. The statutory
//! phase-out range between the plateau and the limit is not modelled.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{round_half_up, round_whole};
use crate::models::{count_child_tax_credit, count_earned_income_credit};
use crate::{ConfigurationError, CreditConfig, Dependent};

/// Qualifying-child count at which the earned income credit table tops out.
pub const EITC_MAX_QUALIFYING_CHILDREN: u8 = 3;

#[derive(Debug, Clone, Copy)]
pub struct CreditCalculator<'a> {
    config: &'a CreditConfig,
}

impl<'a> CreditCalculator<'a> {
    pub fn new(config: &'a CreditConfig) -> Self {
        Self { config }
    }

    /// Number of qualifying dependents times the per-child amount.
    ///
    /// # Arguments
    ///
    /// * `dependents` - Everyone claimed on the return; only those flagged
    ///   for the child tax credit count
    ///
    /// # Returns
    ///
    /// The credit rounded half-up to cents, zero with no qualifying children.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::CreditCalculator;
    /// use tax_core::{CreditConfig, Dependent, EitcPhaseInRates};
    ///
    /// let config = CreditConfig {
    ///     child_tax_credit_per_child: dec!(2000),
    ///     eitc_buckets: vec![],
    ///     eitc_phase_in: EitcPhaseInRates {
    ///         no_children: dec!(0.0765),
    ///         one_child: dec!(0.34),
    ///         two_or_more_children: dec!(0.40),
    ///     },
    /// };
    /// let kids = [Dependent::qualifying_child("Ava"), Dependent::qualifying_child("Ben")];
    ///
    /// assert_eq!(CreditCalculator::new(&config).child_tax_credit(&kids), dec!(4000));
    /// ```
    pub fn child_tax_credit(
        &self,
        dependents: &[Dependent],
    ) -> Decimal {
        let qualifying = Decimal::from(count_child_tax_credit(dependents));
        round_half_up(qualifying * self.config.child_tax_credit_per_child)
    }

    /// Earned income credit for `income`, rounded to whole dollars.
    ///
    /// # Arguments
    ///
    /// * `income` - Earned income (adjusted gross income on this return)
    /// * `dependents` - Everyone claimed on the return; qualifying children
    ///   beyond [`EITC_MAX_QUALIFYING_CHILDREN`] use the top bucket
    ///
    /// # Returns
    ///
    /// `income` times the bucket's phase-in rate, capped at the bucket
    /// maximum. Zero when `income` is not positive or exceeds the bucket's
    /// income limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::CreditCalculator;
    /// use tax_core::{CreditConfig, EitcBucket, EitcPhaseInRates};
    ///
    /// let config = CreditConfig {
    ///     child_tax_credit_per_child: dec!(2000),
    ///     eitc_buckets: vec![EitcBucket {
    ///         qualifying_children: 0,
    ///         max_credit: dec!(632),
    ///         income_limit: dec!(18591),
    ///     }],
    ///     eitc_phase_in: EitcPhaseInRates {
    ///         no_children: dec!(0.0765),
    ///         one_child: dec!(0.34),
    ///         two_or_more_children: dec!(0.40),
    ///     },
    /// };
    /// let credits = CreditCalculator::new(&config);
    ///
    /// // 5000 × 7.65% = 382.50, rounded to whole dollars
    /// assert_eq!(credits.earned_income_credit(dec!(5000), &[]).unwrap(), dec!(383));
    /// assert_eq!(credits.earned_income_credit(dec!(12000), &[]).unwrap(), dec!(632));
    /// assert_eq!(credits.earned_income_credit(dec!(20000), &[]).unwrap(), dec!(0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingEitcBucket`] when the credit table
    /// has no entry for the capped child count.
    pub fn earned_income_credit(
        &self,
        income: Decimal,
        dependents: &[Dependent],
    ) -> Result<Decimal, ConfigurationError> {
        let qualifying = count_earned_income_credit(dependents)
            .min(usize::from(EITC_MAX_QUALIFYING_CHILDREN)) as u8;
        let bucket = self.config.eitc_bucket(qualifying)?;

        if income <= Decimal::ZERO || income > bucket.income_limit {
            debug!(%income, qualifying, limit = %bucket.income_limit, "no earned income credit");
            return Ok(Decimal::ZERO);
        }

        let phase_in = income * self.config.eitc_phase_in.for_children(qualifying);
        Ok(round_whole(phase_in.min(bucket.max_credit)))
    }
}
