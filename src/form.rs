//! Parsing helpers that turn raw form fields into typed values.
//!
//! Forms are deserialized into `String` fields and every value is parsed here,
//! so bad input becomes a [ValidationError] instead of a silent cast.

use time::{Date, macros::format_description};

use crate::ValidationError;

/// The largest whole number accepted for a day's men's or girls' income.
///
/// Keeps the summed income well inside `i64`.
pub(crate) const MAX_INCOME_AMOUNT: i64 = 1_000_000_000;

/// The largest amount accepted for a single expense.
///
/// Keeps the summed expenses finite.
pub(crate) const MAX_EXPENSE_AMOUNT: u64 = 1_000_000_000_000;

/// Trim `value` and check that something is left.
pub(crate) fn required<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Parse a calendar date in the `YYYY-MM-DD` format.
pub(crate) fn parse_date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    let value = required(field, value)?;

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate(value.to_owned()))
}

/// Parse a base-10 whole number that is zero or greater.
pub(crate) fn parse_non_negative_integer(
    field: &'static str,
    value: &str,
) -> Result<i64, ValidationError> {
    let value = required(field, value)?;

    let number: i64 = value
        .parse()
        .map_err(|_| ValidationError::InvalidInteger {
            field,
            value: value.to_owned(),
        })?;

    if number < 0 {
        return Err(ValidationError::NegativeAmount(field));
    }

    if number > MAX_INCOME_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            field,
            max: MAX_INCOME_AMOUNT.unsigned_abs(),
        });
    }

    Ok(number)
}

/// Parse a finite decimal number that is zero or greater.
pub(crate) fn parse_non_negative_amount(
    field: &'static str,
    value: &str,
) -> Result<f64, ValidationError> {
    let value = required(field, value)?;

    let amount: f64 = value
        .parse()
        .ok()
        .filter(|amount: &f64| amount.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount {
            field,
            value: value.to_owned(),
        })?;

    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(field));
    }

    if amount > MAX_EXPENSE_AMOUNT as f64 {
        return Err(ValidationError::AmountTooLarge {
            field,
            max: MAX_EXPENSE_AMOUNT,
        });
    }

    // Normalise -0.0 so it is stored and displayed as zero.
    Ok(amount.abs())
}
