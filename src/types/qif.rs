//! QIF record type
//!
//! A [`QifRecord`] is built for a single CSV row, serialized immediately by
//! [`crate::io::qif_format`] and dropped. Text fields borrow from the CSV row
//! and the action lookup table so no per-row copies are made.

use rust_decimal::Decimal;

/// One QIF investment transaction
#[derive(Debug, Clone, PartialEq)]
pub struct QifRecord<'a> {
    /// `D` - date, passed through unchanged
    pub date: &'a str,

    /// `N` - canonical QIF action code (e.g. `Buy`, `ReinvDiv`)
    pub action: &'a str,

    /// `Y` - security name, passed through unchanged
    pub security: &'a str,

    /// `I` - price per share, signed
    pub price: Decimal,

    /// `T` - transaction amount, signed
    pub value: Decimal,

    /// `Q` - share quantity, always positive
    pub quantity: Decimal,

    /// `M` - memo, passed through unchanged
    pub memo: &'a str,
}
