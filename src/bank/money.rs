//! Money is kept as integer cents everywhere below the CLI.

use crate::bank::error::BankError;

/// Parse a user-typed amount such as `12`, `12.5` or `12.34` into cents.
/// At most two decimal places; must be strictly positive.
pub fn parse_amount(input: &str) -> Result<i64, BankError> {
    let raw = input.trim().trim_start_matches('$');
    if raw.is_empty() {
        return Err(BankError::InvalidAmount("empty amount".to_string()));
    }
    if raw.starts_with('-') {
        return Err(BankError::InvalidAmount(format!("{raw} is negative")));
    }

    let (whole, frac) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (raw, ""),
    };
    if frac.len() > 2 {
        return Err(BankError::InvalidAmount(format!("{raw} has more than two decimal places")));
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(frac) || (whole.is_empty() && frac.is_empty()) {
        return Err(BankError::InvalidAmount(format!("'{raw}' is not a number")));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| BankError::InvalidAmount(format!("{raw} is too large")))?
    };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().unwrap_or(0) * 10,
        _ => frac.parse::<i64>().unwrap_or(0),
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(|| BankError::InvalidAmount(format!("{raw} is too large")))?;
    ensure_positive(cents)?;
    Ok(cents)
}

pub fn ensure_positive(cents: i64) -> Result<(), BankError> {
    if cents <= 0 {
        return Err(BankError::InvalidAmount(format!(
            "{} must be greater than zero",
            format_cents(cents)
        )));
    }
    Ok(())
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
