use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    Standard,
    Itemized,
}

impl DeductionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Itemized => "itemized",
        }
    }
}

/// Full liability/refund computation for one return.
///
/// Exactly one of `refund_amount` and `amount_owed` is non-zero unless
/// `final_tax` is exactly zero, in which case both are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub tax_year: i32,
    pub gross_income: Decimal,
    pub adjusted_gross_income: Decimal,
    pub standard_deduction: Decimal,
    pub itemized_deduction: Decimal,
    pub deduction_method: DeductionMethod,
    pub taxable_income: Decimal,
    pub tax_liability: Decimal,
    pub child_tax_credit: Decimal,
    pub earned_income_credit: Decimal,
    pub total_credits: Decimal,
    /// Liability minus credits minus withholdings. Negative means a refund.
    pub final_tax: Decimal,
    pub refund_amount: Decimal,
    pub amount_owed: Decimal,
    /// Tax after credits (floored at zero) divided by AGI.
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
}

/// Liabilities under both deduction methods for the same AGI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionComparison {
    pub standard_deduction: Decimal,
    pub itemized_deduction: Decimal,
    pub standard_tax_liability: Decimal,
    pub itemized_tax_liability: Decimal,
    pub recommended_method: DeductionMethod,
    /// Absolute difference between the two liabilities.
    pub tax_savings: Decimal,
    pub effective_standard_rate: Decimal,
    pub effective_itemized_rate: Decimal,
}

impl DeductionComparison {
    /// Liability under the recommended method.
    pub fn recommended_liability(&self) -> Decimal {
        match self.recommended_method {
            DeductionMethod::Standard => self.standard_tax_liability,
            DeductionMethod::Itemized => self.itemized_tax_liability,
        }
    }
}

/// One rung of the what-if itemized deduction ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionScenario {
    pub label: String,
    pub itemized_total: Decimal,
    pub liability: Decimal,
    /// Liability reduction relative to the current baseline.
    pub savings_vs_current: Decimal,
}

/// The externally visible result: the base computation with the deduction
/// method chosen by the optimizer, its comparison and the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedTaxCalculationResult {
    #[serde(flatten)]
    pub result: TaxCalculationResult,
    pub deduction_comparison: DeductionComparison,
    pub suggestions: Vec<String>,
}
