//! Deterministic tax computation and document-field mapping.
//!
//! [`calculations`] turns a return's financial facts into a liability or
//! refund; [`extraction`] turns recognized tax-document data into
//! confidence-scored form fields and validates them. Everything here is pure
//! and synchronous; tables are supplied per tax year through
//! [`TaxYearConfig`].

pub mod calculations;
pub mod extraction;
pub mod models;

#[cfg(test)]
mod test_support;

pub use models::*;
