use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// One marginal-rate band of a filing status's rate schedule.
///
/// `base_tax` is the total tax owed on all income below `min_income`, i.e.
/// the sum of the fully-filled lower brackets. It is redundant with the
/// bracket sequence and exists so the closed-form schedule lookup can be
/// cross-checked against bracket-by-bracket accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub min_income: Decimal,
    /// `None` for the top, unbounded bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// Portion of `taxable_income` that falls inside this bracket.
    pub fn portion_of(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= self.min_income {
            return Decimal::ZERO;
        }
        let upper = match self.max_income {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        upper - self.min_income
    }

    /// Whether `taxable_income` lands in this bracket (exclusive lower bound,
    /// inclusive upper bound).
    pub fn contains(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income > self.min_income
            && self.max_income.is_none_or(|max| taxable_income <= max)
    }
}
