use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

/// Strips currency symbols, thousands separators and whitespace.
fn normalize_amount_input(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',') && !c.is_whitespace())
        .collect()
}

/// Parses a monetary string such as `"$ 1,234.56"`.
///
/// Returns `None` for empty or malformed input; malformed values are logged
/// at debug level since they are routine OCR noise.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return None;
    }
    match normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
    {
        Ok(amount) => Some(amount),
        Err(e) => {
            debug!(input = %s, "unparsable amount: {}", e);
            None
        }
    }
}

/// Parses a structured field value that may be a JSON number or string.
pub fn parse_value_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Like [`parse_value_amount`], but zero and negative amounts count as
/// missing.
pub fn positive_amount(value: &Value) -> Option<Decimal> {
    parse_value_amount(value).filter(|amount| *amount > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_amount_strips_currency_and_separators() {
        assert_eq!(parse_amount("$1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount(" $ 161,130.48 "), Some(dec!(161130.48)));
        assert_eq!(parse_amount("1 234"), Some(dec!(1234)));
    }

    #[test]
    fn parse_amount_rejects_malformed_input() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount("12.34.56"), None);
    }

    #[test]
    fn parse_value_amount_handles_numbers_and_strings() {
        assert_eq!(parse_value_amount(&json!(52000)), Some(dec!(52000)));
        assert_eq!(parse_value_amount(&json!(161130.48)), Some(dec!(161130.48)));
        assert_eq!(parse_value_amount(&json!("$9,100.00")), Some(dec!(9100.00)));
        assert_eq!(parse_value_amount(&json!(null)), None);
        assert_eq!(parse_value_amount(&json!({"amount": 5})), None);
    }

    #[test]
    fn positive_amount_drops_zero_and_negative() {
        assert_eq!(positive_amount(&json!("0.00")), None);
        assert_eq!(positive_amount(&json!(-15)), None);
        assert_eq!(positive_amount(&json!("abc")), None);
        assert_eq!(positive_amount(&json!("12.5")), Some(dec!(12.5)));
    }
}
