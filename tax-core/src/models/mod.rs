mod dependent;
mod document;
mod filing_status;
mod standard_deduction;
mod tax_bracket;
mod tax_calculation;
mod tax_facts;
mod tax_year_config;
mod validation;

pub(crate) use dependent::{count_child_tax_credit, count_earned_income_credit};
pub use dependent::Dependent;
pub use document::{
    DocumentType, ExtractedDocumentPayload, ExtractionMethod, FieldValue, FormField,
    IncomeCategory, MappingMetadata, TaxDocumentMapping,
};
pub use filing_status::{FilingStatus, ParseFilingStatusError};
pub use standard_deduction::StandardDeduction;
pub use tax_bracket::TaxBracket;
pub use tax_calculation::{
    DeductionComparison, DeductionMethod, DeductionScenario, EnhancedTaxCalculationResult,
    TaxCalculationResult,
};
pub use tax_facts::{
    DEFAULT_TAX_YEAR, DeductionCategory, DeductionEntry, EmploymentType, IncomeEntry,
    IncomeSource, TaxReturnEntries, TaxReturnFacts, TaxReturnInput,
};
pub use tax_year_config::{
    ConfigurationError, CreditConfig, EitcBucket, EitcPhaseInRates, PlanningConfig,
    TaxYearConfig, TaxYearRegistry,
};
pub use validation::ValidationResult;
