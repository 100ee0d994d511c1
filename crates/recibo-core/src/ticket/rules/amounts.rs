//! Amount extraction and separator normalization for receipts.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{SUBTOTAL, SUBTOTAL_NO_DISCOUNT, TOTAL};

/// Amounts found on a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReceiptAmounts {
    /// Operation amount subject to tax.
    pub taxable: Option<f64>,
    /// Amount charged.
    pub total: Option<f64>,
}

/// Extract the taxable and total amounts from receipt text.
///
/// When no `TOTAL` line parses, the total is the taxable amount.
pub fn extract_amounts(text: &str) -> ReceiptAmounts {
    let taxable = extract_taxable_amount(text);
    let total = extract_total_amount(text).or(taxable);

    ReceiptAmounts { taxable, total }
}

/// Extract the taxable amount, trying `SUBTOTAL SIN DESCUENTOS`, then
/// `SUBTOTAL`, then `TOTAL`.
pub fn extract_taxable_amount(text: &str) -> Option<f64> {
    [&*SUBTOTAL_NO_DISCOUNT, &*SUBTOTAL, &*TOTAL]
        .into_iter()
        .find_map(|pattern| first_amount(pattern, text))
}

/// Extract the amount printed after `TOTAL`.
pub fn extract_total_amount(text: &str) -> Option<f64> {
    first_amount(&TOTAL, text)
}

fn first_amount(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| normalize_amount(&caps[1]))
}

/// Parse an amount whose decimal separator may be a comma or a period.
///
/// With a comma present, periods are thousands separators and the comma is
/// the decimal point. With only periods, the last one is a decimal point
/// when exactly two digits follow it; otherwise every period is a thousands
/// separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();

    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else if let Some((_, fraction)) = s.rsplit_once('.') {
        if fraction.len() == 2 {
            s.to_string()
        } else {
            s.replace('.', "")
        }
    } else {
        s.to_string()
    };

    Decimal::from_str(&normalized).ok()
}

/// [`parse_amount`] as a float, the type the record carries.
pub fn normalize_amount(s: &str) -> Option<f64> {
    // Going through the decimal string keeps the float correctly rounded.
    parse_amount(s).and_then(|amount| amount.to_string().parse().ok())
}
