//! Expected structured fields for every supported document type.
//!
//! Each concrete [`DocumentType`] owns a static [`DocumentSchema`]; adding a
//! document type means adding a variant and its schema, nothing else.
//! Structured-field names are matched after normalization (ASCII
//! alphanumerics only, lowercased), so `"WagesTipsAndOtherCompensation"` and
//! `"wages_tips_and_other_compensation"` are the same key.

use super::ocr::OcrFallback;
use crate::{DocumentType, IncomeCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Amount,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub source_description: &'static str,
    /// Structured-field names tried in order.
    pub keys: &'static [&'static str],
    pub kind: FieldKind,
    pub ocr_fallback: Option<OcrFallback>,
}

#[derive(Debug)]
pub struct DocumentSchema {
    pub income_category: IncomeCategory,
    pub fields: &'static [FieldSpec],
}

const fn amount(
    id: &'static str,
    label: &'static str,
    source_description: &'static str,
    keys: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        source_description,
        keys,
        kind: FieldKind::Amount,
        ocr_fallback: None,
    }
}

const fn text(
    id: &'static str,
    label: &'static str,
    source_description: &'static str,
    keys: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        id,
        label,
        source_description,
        keys,
        kind: FieldKind::Text,
        ocr_fallback: None,
    }
}

pub const WAGES: &str = "wages";
pub const EMPLOYER_NAME: &str = "employer_name";

static W2: DocumentSchema = DocumentSchema {
    income_category: IncomeCategory::Wages,
    fields: &[
        FieldSpec {
            ocr_fallback: Some(OcrFallback::Box1Wages),
            ..amount(
                WAGES,
                "Wages, tips, other compensation",
                "W-2 Box 1 - Wages",
                &["WagesTipsAndOtherCompensation", "WagesTipsOtherCompensation", "Wages", "Box1"],
            )
        },
        amount(
            "federal_income_tax_withheld",
            "Federal income tax withheld",
            "W-2 Box 2 - Federal income tax withheld",
            &["FederalIncomeTaxWithheld", "FederalTaxWithheld", "Box2"],
        ),
        amount(
            "social_security_wages",
            "Social security wages",
            "W-2 Box 3 - Social security wages",
            &["SocialSecurityWages", "Box3"],
        ),
        amount(
            "social_security_tax_withheld",
            "Social security tax withheld",
            "W-2 Box 4 - Social security tax withheld",
            &["SocialSecurityTaxWithheld", "Box4"],
        ),
        amount(
            "medicare_wages",
            "Medicare wages and tips",
            "W-2 Box 5 - Medicare wages and tips",
            &["MedicareWagesAndTips", "MedicareWages", "Box5"],
        ),
        amount(
            "medicare_tax_withheld",
            "Medicare tax withheld",
            "W-2 Box 6 - Medicare tax withheld",
            &["MedicareTaxWithheld", "Box6"],
        ),
        amount(
            "state_wages",
            "State wages, tips, etc.",
            "W-2 Box 16 - State wages",
            &["StateWagesTipsEtc", "StateWages", "Box16"],
        ),
        amount(
            "state_income_tax",
            "State income tax",
            "W-2 Box 17 - State income tax",
            &["StateIncomeTax", "Box17"],
        ),
        text(
            EMPLOYER_NAME,
            "Employer name",
            "W-2 Box c - Employer name",
            &["EmployerName", "Employer.Name", "Employer"],
        ),
    ],
};

static FORM_1099_INT: DocumentSchema = DocumentSchema {
    income_category: IncomeCategory::Interest,
    fields: &[
        amount(
            "interest_income",
            "Interest income",
            "1099-INT Box 1 - Interest income",
            &["InterestIncome", "Box1"],
        ),
        amount(
            "early_withdrawal_penalty",
            "Early withdrawal penalty",
            "1099-INT Box 2 - Early withdrawal penalty",
            &["EarlyWithdrawalPenalty", "Box2"],
        ),
        amount(
            "us_savings_bond_interest",
            "Interest on U.S. savings bonds and Treasury obligations",
            "1099-INT Box 3 - U.S. savings bond interest",
            &["InterestOnUSSavingsBondsAndTreasuryObligations", "USSavingsBondInterest", "Box3"],
        ),
        amount(
            "federal_income_tax_withheld",
            "Federal income tax withheld",
            "1099-INT Box 4 - Federal income tax withheld",
            &["FederalIncomeTaxWithheld", "Box4"],
        ),
        amount(
            "tax_exempt_interest",
            "Tax-exempt interest",
            "1099-INT Box 8 - Tax-exempt interest",
            &["TaxExemptInterest", "Box8"],
        ),
        text("payer_name", "Payer name", "1099-INT - Payer name", &["PayerName", "Payer.Name", "Payer"]),
    ],
};

static FORM_1099_DIV: DocumentSchema = DocumentSchema {
    income_category: IncomeCategory::Dividends,
    fields: &[
        amount(
            "ordinary_dividends",
            "Total ordinary dividends",
            "1099-DIV Box 1a - Total ordinary dividends",
            &["TotalOrdinaryDividends", "OrdinaryDividends", "Box1a"],
        ),
        amount(
            "qualified_dividends",
            "Qualified dividends",
            "1099-DIV Box 1b - Qualified dividends",
            &["QualifiedDividends", "Box1b"],
        ),
        amount(
            "capital_gain_distributions",
            "Total capital gain distributions",
            "1099-DIV Box 2a - Total capital gain distributions",
            &["TotalCapitalGainDistributions", "CapitalGainDistributions", "Box2a"],
        ),
        amount(
            "federal_income_tax_withheld",
            "Federal income tax withheld",
            "1099-DIV Box 4 - Federal income tax withheld",
            &["FederalIncomeTaxWithheld", "Box4"],
        ),
        amount(
            "section_199a_dividends",
            "Section 199A dividends",
            "1099-DIV Box 5 - Section 199A dividends",
            &["Section199ADividends", "Box5"],
        ),
        text("payer_name", "Payer name", "1099-DIV - Payer name", &["PayerName", "Payer.Name", "Payer"]),
    ],
};

static FORM_1099_MISC: DocumentSchema = DocumentSchema {
    income_category: IncomeCategory::MiscellaneousIncome,
    fields: &[
        amount("rents", "Rents", "1099-MISC Box 1 - Rents", &["Rents", "Box1"]),
        amount("royalties", "Royalties", "1099-MISC Box 2 - Royalties", &["Royalties", "Box2"]),
        amount(
            "other_income",
            "Other income",
            "1099-MISC Box 3 - Other income",
            &["OtherIncome", "Box3"],
        ),
        amount(
            "federal_income_tax_withheld",
            "Federal income tax withheld",
            "1099-MISC Box 4 - Federal income tax withheld",
            &["FederalIncomeTaxWithheld", "Box4"],
        ),
        text("payer_name", "Payer name", "1099-MISC - Payer name", &["PayerName", "Payer.Name", "Payer"]),
    ],
};

static FORM_1099_NEC: DocumentSchema = DocumentSchema {
    income_category: IncomeCategory::SelfEmployment,
    fields: &[
        amount(
            "nonemployee_compensation",
            "Nonemployee compensation",
            "1099-NEC Box 1 - Nonemployee compensation",
            &["NonemployeeCompensation", "Box1"],
        ),
        amount(
            "federal_income_tax_withheld",
            "Federal income tax withheld",
            "1099-NEC Box 4 - Federal income tax withheld",
            &["FederalIncomeTaxWithheld", "Box4"],
        ),
        text("payer_name", "Payer name", "1099-NEC - Payer name", &["PayerName", "Payer.Name", "Payer"]),
    ],
};

impl DocumentType {
    /// Field schema for a concrete document type; `None` for the generic
    /// 1099, which has to be resolved to a subtype first.
    pub fn schema(&self) -> Option<&'static DocumentSchema> {
        match self {
            Self::W2 => Some(&W2),
            Self::Form1099Int => Some(&FORM_1099_INT),
            Self::Form1099Div => Some(&FORM_1099_DIV),
            Self::Form1099Misc => Some(&FORM_1099_MISC),
            Self::Form1099Nec => Some(&FORM_1099_NEC),
            Self::Form1099 => None,
        }
    }
}

/// Normalized form of a structured-field name.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
