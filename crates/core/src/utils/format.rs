//! Display formatting for currency amounts.
//!
//! Every amount on the dashboard goes through [`format_currency`], so totals
//! and per-holding figures share one rounding and precision rule.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::CURRENCY_DECIMALS;

/// Glyph placed in front of an amount. Unknown codes render as `"XXX "`.
pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "JPY" => "¥".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{} ", other),
    }
}

/// Formats `amount` with thousands separators and exactly `decimals`
/// fractional digits, rounding half to even.
pub fn format_number(amount: Decimal, decimals: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match fraction {
        Some(fraction) if !fraction.is_empty() => format!("{}{}.{}", sign, grouped, fraction),
        _ => format!("{}{}", sign, grouped),
    }
}

/// Formats a currency amount with its glyph using the dashboard-wide rule.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let number = format_number(amount, CURRENCY_DECIMALS);
    match number.strip_prefix('-') {
        Some(unsigned) => format!("-{}{}", currency_symbol(currency), unsigned),
        None => format!("{}{}", currency_symbol(currency), number),
    }
}
