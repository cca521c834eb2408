use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known filing status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized filing status '{0}'")]
pub struct ParseFilingStatusError(pub String);

/// Filing status selecting a bracket schedule and a standard deduction.
///
/// Serializes as `SINGLE`, `MARRIED_FILING_JOINTLY`, ...; deserializes from any
/// spelling accepted by [`FilingStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    /// Short IRS-style code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    /// Canonical lookup key, e.g. `MARRIED_FILING_JOINTLY`.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::MarriedFilingJointly => "MARRIED_FILING_JOINTLY",
            Self::MarriedFilingSeparately => "MARRIED_FILING_SEPARATELY",
            Self::HeadOfHousehold => "HEAD_OF_HOUSEHOLD",
            Self::QualifyingSurvivingSpouse => "QUALIFYING_SURVIVING_SPOUSE",
        }
    }

    /// Parses a filing status from a short code or a full name.
    ///
    /// Case, surrounding whitespace, and the separator used between words
    /// (space, hyphen, underscore) are ignored, so `"married filing jointly"`,
    /// `"Married-Filing-Jointly"` and `"MFJ"` all collapse to the same key.
    pub fn parse(s: &str) -> Result<Self, ParseFilingStatusError> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' | '_' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        match key.as_str() {
            "S" | "SINGLE" => Ok(Self::Single),
            "MFJ" | "MARRIED_FILING_JOINTLY" => Ok(Self::MarriedFilingJointly),
            "MFS" | "MARRIED_FILING_SEPARATELY" => Ok(Self::MarriedFilingSeparately),
            "HOH" | "HEAD_OF_HOUSEHOLD" => Ok(Self::HeadOfHousehold),
            "QSS" | "QW" | "QUALIFYING_SURVIVING_SPOUSE" | "QUALIFYING_WIDOW" => {
                Ok(Self::QualifyingSurvivingSpouse)
            }
            _ => Err(ParseFilingStatusError(s.to_string())),
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for FilingStatus {
    type Err = ParseFilingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FilingStatus {
    type Error = ParseFilingStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_codes() {
        assert_eq!(FilingStatus::parse("S"), Ok(FilingStatus::Single));
        assert_eq!(FilingStatus::parse("MFJ"), Ok(FilingStatus::MarriedFilingJointly));
        assert_eq!(FilingStatus::parse("MFS"), Ok(FilingStatus::MarriedFilingSeparately));
        assert_eq!(FilingStatus::parse("HOH"), Ok(FilingStatus::HeadOfHousehold));
        assert_eq!(FilingStatus::parse("QSS"), Ok(FilingStatus::QualifyingSurvivingSpouse));
    }

    #[test]
    fn parse_collapses_case_and_separators() {
        for input in [
            "MARRIED_FILING_JOINTLY",
            "married filing jointly",
            "Married-Filing-Jointly",
            "  married_filing_jointly ",
        ] {
            assert_eq!(
                FilingStatus::parse(input),
                Ok(FilingStatus::MarriedFilingJointly),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(
            FilingStatus::parse("married"),
            Err(ParseFilingStatusError("married".to_string()))
        );
    }

    #[test]
    fn canonical_name_round_trips_through_parse() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::parse(status.canonical_name()), Ok(status));
            assert_eq!(FilingStatus::parse(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&FilingStatus::HeadOfHousehold).unwrap();
        assert_eq!(json, "\"HEAD_OF_HOUSEHOLD\"");

        let parsed: FilingStatus = serde_json::from_str("\"head of household\"").unwrap();
        assert_eq!(parsed, FilingStatus::HeadOfHousehold);

        let err = serde_json::from_str::<FilingStatus>("\"widowed\"");
        assert!(err.is_err());
    }
}
