//! Minor-unit money helpers: parsing user input, plain and display formatting.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

const MINOR_PER_MAJOR: i64 = 100;

/// Largest amount, in minor units, accepted for an entry, allocation or ceiling.
///
/// Ten trillion major units. Sums over thousands of such amounts still fit in `i64`.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> Option<&'static str> {
        match self.as_str() {
            "USD" => Some("$"),
            "INR" => Some("₹"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" => Some("¥"),
            _ => None,
        }
    }

    fn uses_indian_grouping(&self) -> bool {
        self.as_str() == "INR"
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// Parses a major-unit amount such as `85.50` or `1,250` into minor units.
///
/// Grouping commas are ignored and digits past the second decimal place are
/// rounded half-up. The sign is preserved; positivity is checked by callers.
pub fn parse_major_units(input: &str) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(input.trim().to_string());
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
        return Err(invalid());
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().map_or(false, |digit| digit >= 5);

    let minor = whole_value
        .checked_mul(MINOR_PER_MAJOR)
        .and_then(|v| v.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or_else(invalid)?;
    Ok(if negative { -minor } else { minor })
}

/// Formats minor units as a plain two-decimal major-unit string (`2514.50`).
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100)
}

/// Formats minor units for display with a currency symbol and digit grouping.
pub fn format_currency(amount: i64, currency: &CurrencyCode) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    let whole = group_digits(
        &(magnitude / 100).to_string(),
        currency.uses_indian_grouping(),
    );
    let body = format!("{whole}.{:02}", magnitude % 100);
    match currency.symbol() {
        Some(symbol) => format!("{sign}{symbol}{body}"),
        None => format!("{sign}{} {body}", currency.as_str()),
    }
}

/// Formats a percentage with one decimal place (`3.3%`).
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_digits(digits: &str, indian: bool) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = if indian { 2 } else { 3 };
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
