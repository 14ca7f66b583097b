//! QIF record serialization
//!
//! This module centralizes all QIF format concerns:
//! - `Display` for [`QifRecord`], producing the seven field lines and the `^`
//!   terminator, each ending in `\n`
//! - Number formatting for the `T` (amount) and `Q` (quantity) fields
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::QifRecord;
use rust_decimal::Decimal;
use std::fmt;

/// Insert `,` between groups of three integer digits
///
/// Accepts an optionally negative decimal string as produced by `Decimal`'s
/// `Display`; the fraction is left untouched.
///
/// # Examples
///
/// ```
/// use csv_to_qif::io::group_thousands;
///
/// assert_eq!(group_thousands("-1234567.891"), "-1,234,567.891");
/// assert_eq!(group_thousands("999"), "999");
/// ```
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Format a transaction amount: two decimal places, grouped thousands
///
/// Rounds half to even. Amounts that round to zero are written unsigned.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    group_thousands(&format!("{:.2}", rounded))
}

/// Format a share quantity: grouped thousands, source precision kept
pub fn format_quantity(quantity: Decimal) -> String {
    group_thousands(&quantity.to_string())
}

impl fmt::Display for QifRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "D{}", self.date)?;
        writeln!(f, "N{}", self.action)?;
        writeln!(f, "Y{}", self.security)?;
        writeln!(f, "I{}", self.price)?;
        writeln!(f, "T{}", format_amount(self.value))?;
        writeln!(f, "Q{}", format_quantity(self.quantity))?;
        writeln!(f, "M{}", self.memo)?;
        writeln!(f, "^")
    }
}
