//! Monetary and quantity text parsing
//!
//! CSV exports format amounts in many ways: `45.23`, `$45.23`, `-$45.23`,
//! `($45.23)`, `1,234.56`, `.23`. [`parse_signed_money`] pulls the first
//! numeric run out of the text and derives the sign from any minus sign or
//! parenthesis found anywhere in it.
//!
//! Digit grouping is accepted only when the groups are well formed
//! (`1,234,567.89`). Anything else falls back to the plain digit run, so
//! `1,23` parses as `1`. Locale conventions with a decimal comma are not
//! supported.

use crate::types::ConvertError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

fn grouped_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?").expect("grouped money regex")
    })
}

fn plain_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]*\.?[0-9]+").expect("plain money regex"))
}

/// Whether a grouped run ending just before `rest` is a complete number
///
/// `1,2345` and `1,234,56` are not: another digit or a short group follows.
fn ends_number(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some(',') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    }
}

/// First numeric run in `text`, preferring a well-formed grouped number
fn numeric_run(text: &str) -> Option<&str> {
    let plain = plain_run().find(text)?;

    match grouped_run().find_at(text, plain.start()) {
        Some(grouped)
            if grouped.start() == plain.start() && ends_number(&text[grouped.end()..]) =>
        {
            Some(grouped.as_str())
        }
        _ => Some(plain.as_str()),
    }
}

fn has_negative_marker(text: &str) -> bool {
    text.chars().any(|c| matches!(c, '-' | '(' | ')'))
}

/// Parse a signed amount out of free-form text
///
/// # Arguments
///
/// * `text` - Raw CSV field, e.g. `"($1,045.10)"`
/// * `force_positive` - Return the magnitude regardless of sign markers
///
/// # Returns
///
/// The parsed value. The scale of the source digits is preserved, so `"45.0"`
/// displays as `45.0` and `"45"` as `45`.
///
/// # Errors
///
/// Returns `ConvertError::ParseError` naming `text` if it contains no digits
/// or the digit run does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use csv_to_qif::core::money::parse_signed_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_signed_money("($45.23)", false).unwrap(), Decimal::new(-4523, 2));
/// assert_eq!(parse_signed_money("($45.23)", true).unwrap(), Decimal::new(4523, 2));
/// ```
pub fn parse_signed_money(text: &str, force_positive: bool) -> Result<Decimal, ConvertError> {
    let run = numeric_run(text).ok_or_else(|| ConvertError::parse(text))?;

    let mut digits: String = run.chars().filter(|c| *c != ',').collect();
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }

    let magnitude = Decimal::from_str(&digits).map_err(|_| ConvertError::parse(text))?;

    // Zero stays unsigned so it never renders as "-0"
    if force_positive || magnitude.is_zero() || !has_negative_marker(text) {
        Ok(magnitude)
    } else {
        Ok(-magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("45.23", Decimal::new(4523, 2))]
    #[case("$45.23", Decimal::new(4523, 2))]
    #[case("-45.23", Decimal::new(-4523, 2))]
    #[case("-$45.23", Decimal::new(-4523, 2))]
    #[case("($45.23)", Decimal::new(-4523, 2))]
    #[case("45", Decimal::new(45, 0))]
    #[case("$45", Decimal::new(45, 0))]
    #[case("-45", Decimal::new(-45, 0))]
    #[case("-$45", Decimal::new(-45, 0))]
    #[case("($45)", Decimal::new(-45, 0))]
    #[case(".23", Decimal::new(23, 2))]
    #[case("$.23", Decimal::new(23, 2))]
    #[case("-.23", Decimal::new(-23, 2))]
    #[case("-$.23", Decimal::new(-23, 2))]
    #[case("($.23)", Decimal::new(-23, 2))]
    fn test_parse_signed_money(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_signed_money(text, false).unwrap(), expected, "text = '{}'", text);
        assert_eq!(
            parse_signed_money(text, true).unwrap(),
            expected.abs(),
            "text = '{}' (forced positive)",
            text
        );
    }

    #[rstest]
    #[case::grouped("1,234.56", Decimal::new(123456, 2))]
    #[case::grouped_currency("$12,345", Decimal::new(12345, 0))]
    #[case::grouped_accounting("($1,234,567.89)", Decimal::new(-123456789, 2))]
    #[case::grouped_trailing_minus("1,000.00-", Decimal::new(-100000, 2))]
    #[case::bad_grouping("1,23", Decimal::new(1, 0))]
    #[case::long_last_group("1,2345", Decimal::new(1, 0))]
    #[case::long_trailing_digits("12,345678", Decimal::new(12, 0))]
    #[case::short_trailing_group("1,234,56", Decimal::new(1, 0))]
    #[case::grouped_then_list("1,234, 5", Decimal::new(1234, 0))]
    #[case::ungrouped_large("1234567.5", Decimal::new(12345675, 1))]
    fn test_thousands_separators(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_signed_money(text, false).unwrap(), expected);
    }

    #[rstest]
    #[case::trailing_point("45.", Decimal::new(45, 0))]
    #[case::surrounding_text("Price: 12.5 USD", Decimal::new(125, 1))]
    #[case::whitespace("  7.25  ", Decimal::new(725, 2))]
    #[case::first_run_wins("3 @ 4.50", Decimal::new(3, 0))]
    #[case::zero("0.00", Decimal::ZERO)]
    #[case::negative_zero("-0.00", Decimal::ZERO)]
    fn test_edge_cases(#[case] text: &str, #[case] expected: Decimal) {
        assert_eq!(parse_signed_money(text, false).unwrap(), expected);
    }

    #[test]
    fn test_scale_is_preserved() {
        assert_eq!(parse_signed_money("45.0", false).unwrap().to_string(), "45.0");
        assert_eq!(parse_signed_money("45", false).unwrap().to_string(), "45");
        assert_eq!(parse_signed_money(".23", false).unwrap().to_string(), "0.23");
        assert_eq!(parse_signed_money("-0.00", false).unwrap().to_string(), "0.00");
    }

    #[rstest]
    #[case::empty("")]
    #[case::letters("N/A")]
    #[case::currency_only("$")]
    #[case::sign_only("-")]
    #[case::parens_only("()")]
    #[case::lone_point(".")]
    fn test_no_digits_is_parse_error(#[case] text: &str) {
        let result = parse_signed_money(text, false);
        assert_eq!(result, Err(ConvertError::parse(text)));

        let result = parse_signed_money(text, true);
        assert_eq!(result, Err(ConvertError::parse(text)));
    }

    #[test]
    fn test_parse_error_names_text() {
        let error = parse_signed_money("pending", false).unwrap_err();
        assert_eq!(error.to_string(), "Cannot find monetary value in string 'pending'");
    }
}
