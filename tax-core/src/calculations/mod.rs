//! Tax liability, deduction and credit calculations.
//!
//! Each calculator borrows one tax year's [`TaxYearConfig`](crate::TaxYearConfig)
//! and is pure: identical inputs always give identical outputs.

pub mod brackets;
pub mod common;
pub mod credits;
pub mod deductions;
pub mod tax_return;

pub use brackets::BracketCalculator;
pub use credits::{CreditCalculator, EITC_MAX_QUALIFYING_CHILDREN};
pub use deductions::DeductionOptimizer;
pub use tax_return::TaxReturnCalculator;
