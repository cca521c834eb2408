//! Ordered regular-expression fallbacks for values missing from structured
//! extraction.
//!
//! A ladder is plain data: a list of named patterns, each paired with the
//! function that turns its captures into an amount. Patterns are tried in
//! order and the first one producing a positive amount wins, so new layout
//! variants are added by appending a pattern rather than by touching the
//! matching loop.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::money::parse_amount;

/// Turns the captures of a successful match into an amount.
pub type AmountExtractor = fn(&Captures<'_>) -> Option<Decimal>;

pub struct OcrPattern {
    pub name: &'static str,
    regex: Regex,
    extract: AmountExtractor,
}

impl OcrPattern {
    pub fn new(
        name: &'static str,
        pattern: &str,
        extract: AmountExtractor,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            extract,
        })
    }
}

/// Amount recovered from recognized text, with the pattern that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrMatch {
    pub amount: Decimal,
    pub pattern: &'static str,
}

pub struct OcrLadder {
    patterns: Vec<OcrPattern>,
}

impl OcrLadder {
    pub fn new(patterns: Vec<OcrPattern>) -> Self {
        Self { patterns }
    }

    /// First positive amount found by the patterns, in ladder order.
    ///
    /// Returns `None` when nothing wage-shaped is present; absence is never
    /// reported as zero.
    pub fn extract(
        &self,
        text: &str,
    ) -> Option<OcrMatch> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .regex
                .captures_iter(text)
                .filter_map(|caps| (pattern.extract)(&caps))
                .find(|amount| *amount > Decimal::ZERO)
                .map(|amount| OcrMatch {
                    amount,
                    pattern: pattern.name,
                })
        })
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }
}

impl std::fmt::Debug for OcrLadder {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("OcrLadder")
            .field("patterns", &self.pattern_names())
            .finish()
    }
}

/// Parses the `amount` capture group.
pub fn amount_group(caps: &Captures<'_>) -> Option<Decimal> {
    caps.name("amount").and_then(|m| parse_amount(m.as_str()))
}

/// Rejects Social Security, Medicare and state wages (W-2 Boxes 3, 5
/// and 16), which share the "wages" label with Box 1.
fn unqualified_wages(caps: &Captures<'_>) -> Option<Decimal> {
    if caps.name("qualifier").is_some() {
        return None;
    }
    amount_group(caps)
}

/// Also rejects a bare integer running straight into the next box label,
/// such as the `2` in "compensation 2 Federal income tax withheld".
fn inline_wages(caps: &Captures<'_>) -> Option<Decimal> {
    let amount = caps.name("amount")?.as_str();
    if caps.name("next_label").is_some() && !amount.contains([',', '.']) {
        return None;
    }
    unqualified_wages(caps)
}

const AMOUNT: &str = r"(?P<amount>[0-9][0-9,]*(?:\.[0-9]{1,2})?)";

const QUALIFIER: &str = r"(?P<qualifier>(?:social\s+security|medicare|state)\s+)?";

/// W-2 Box 1 layouts seen on real scans, most specific first.
static BOX1_WAGES: LazyLock<OcrLadder> = LazyLock::new(|| {
    let patterns: [(&'static str, String, AmountExtractor); 5] = [
        // "Box 1 Wages, tips, other compensation 52,000.00"
        (
            "box_label_inline",
            format!(r"(?i)\bbox\s*1\b[^0-9$\n]{{0,60}}\$?\s*{AMOUNT}"),
            amount_group,
        ),
        // "Wages: $52,000.00"
        (
            "colon_currency",
            format!(r"(?i){QUALIFIER}wages[^:\n]{{0,50}}:\s*\$\s*{AMOUNT}"),
            unqualified_wages,
        ),
        // "1 52,000.00" alone on a line
        (
            "bare_box_number",
            r"(?m)^\s*1\s+\$?(?P<amount>[0-9][0-9,]*\.[0-9]{2})\s*$".to_string(),
            amount_group,
        ),
        // "Wages, tips, other compensation 52000"
        (
            "wages_and_tips",
            format!(
                r"(?i){QUALIFIER}wages,?\s*(?:and\s+)?tips(?:,?\s*(?:and\s+)?other\s+comp(?:ensation|\.)?)?\s*\$?\s*{AMOUNT}(?P<next_label>[ \t]+[a-z])?"
            ),
            inline_wages,
        ),
        // label on one line, amount on the next
        (
            "label_newline_amount",
            format!(r"(?i){QUALIFIER}wages[^\n]*\n\s*\$?\s*{AMOUNT}"),
            unqualified_wages,
        ),
    ];

    OcrLadder::new(
        patterns
            .into_iter()
            .map(|(name, pattern, extract)| {
                OcrPattern::new(name, &pattern, extract)
                    .expect("built-in wage pattern must compile")
            })
            .collect(),
    )
});

/// Fallback ladders attached to individual form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrFallback {
    Box1Wages,
}

impl OcrFallback {
    pub fn ladder(&self) -> &'static OcrLadder {
        match self {
            Self::Box1Wages => &BOX1_WAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn wages(text: &str) -> Option<OcrMatch> {
        OcrFallback::Box1Wages.ladder().extract(text)
    }

    #[test]
    fn extracts_wages_and_tips_line() {
        let found = wages("1 Wages, tips, other compensation 161130.48");

        assert_eq!(
            found,
            Some(OcrMatch {
                amount: dec!(161130.48),
                pattern: "wages_and_tips",
            })
        );
    }

    #[test]
    fn extracts_box_label_inline() {
        let found = wages("Box 1 Wages, tips, other compensation $52,000.00").unwrap();

        assert_eq!(found.amount, dec!(52000.00));
        assert_eq!(found.pattern, "box_label_inline");
    }

    #[test]
    fn extracts_colon_currency() {
        let found = wages("Employee wages: $52,300.10").unwrap();

        assert_eq!(found.amount, dec!(52300.10));
        assert_eq!(found.pattern, "colon_currency");
    }

    #[test]
    fn extracts_bare_box_number() {
        let found = wages("Employer copy\n1 73,250.00\n2 9,100.00").unwrap();

        assert_eq!(found.amount, dec!(73250.00));
        assert_eq!(found.pattern, "bare_box_number");
    }

    #[test]
    fn extracts_label_then_newline_amount() {
        let found = wages("Employee wages (see instructions)\n  45000.00").unwrap();

        assert_eq!(found.amount, dec!(45000.00));
        assert_eq!(found.pattern, "label_newline_amount");
    }

    #[test]
    fn earlier_pattern_wins() {
        let found = wages("Box 1 $10.00\nWages and tips 20.00").unwrap();

        assert_eq!(found.amount, dec!(10.00));
    }

    #[test]
    fn zero_match_falls_through_to_next_pattern() {
        let found = wages("Box 1 0.00\nWages and tips 500.00").unwrap();

        assert_eq!(found.amount, dec!(500.00));
        assert_eq!(found.pattern, "wages_and_tips");
    }

    #[test]
    fn box_number_after_label_is_not_an_amount() {
        let found = wages(
            "1 Wages, tips, other compensation 2 Federal income tax withheld\n52,000.00 6,000.00",
        );

        assert_eq!(
            found,
            Some(OcrMatch {
                amount: dec!(52000.00),
                pattern: "label_newline_amount",
            })
        );
    }

    #[test]
    fn social_security_wages_are_not_box1() {
        assert_eq!(wages("Social security wages: $48,000.00"), None);
        assert_eq!(wages("3 Social Security wages\n48,000.00"), None);
    }

    #[test]
    fn medicare_and_state_wages_are_not_box1() {
        assert_eq!(wages("5 Medicare wages and tips 49,500.00"), None);
        assert_eq!(wages("16 State wages, tips, etc. 47,000.00"), None);
    }

    #[test]
    fn box1_still_found_beside_qualified_wages() {
        let found = wages(
            "3 Social security wages 48,000.00\n1 Wages, tips, other compensation 52,000.00",
        )
        .unwrap();

        assert_eq!(found.amount, dec!(52000.00));
        assert_eq!(found.pattern, "wages_and_tips");
    }

    #[test]
    fn text_without_wages_is_absent() {
        assert_eq!(wages("Form 1099-INT Payer: First Bank"), None);
        assert_eq!(wages(""), None);
    }

    #[test]
    fn ladder_order_is_stable() {
        assert_eq!(
            OcrFallback::Box1Wages.ladder().pattern_names(),
            vec![
                "box_label_inline",
                "colon_currency",
                "bare_box_number",
                "wages_and_tips",
                "label_newline_amount",
            ]
        );
    }
}
