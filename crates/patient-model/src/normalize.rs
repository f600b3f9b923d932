//! Field normalizers.
//!
//! Each normalizer takes one raw field value, checks it against the field's
//! rules and returns the canonical form. They are pure: audit logging of
//! rejected values happens in [`crate::PatientRecord`], which knows who is
//! being edited.
//!
//! # Birth dates
//!
//! Dates are read from the three digit groups in the input, whatever the
//! separators. When the last group has four digits the groups are taken as
//! day-month-year, otherwise as year-month-day. Only the last group is
//! inspected, so `"14 05 20"` is read as year 14 and rejected.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::document::DocumentType;
use crate::error::ValidationError;

/// Earliest accepted birth year.
pub const MIN_BIRTH_YEAR: u32 = 1870;

/// Digits in a national phone number.
pub const PHONE_DIGITS: usize = 10;

/// ASCII digit runs. `\d` would also match non-ASCII digits.
static DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid digit run regex"));

fn digit_runs(raw: &str) -> Vec<&str> {
    DIGIT_RUNS.find_iter(raw).map(|m| m.as_str()).collect()
}

/// Parse a digit run, saturating on overflow so huge values fail range checks.
fn parse_component(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Validate a first or last name and return it title-cased.
///
/// An empty name passes; it is stored as an empty cell, which is read back as
/// a missing value.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    if !raw.chars().all(char::is_alphabetic) {
        return Err(ValidationError::NonAlphabeticName {
            value: raw.to_string(),
        });
    }
    let mut chars = raw.chars();
    let mut titled = String::with_capacity(raw.len());
    if let Some(first) = chars.next() {
        titled.extend(first.to_uppercase());
    }
    titled.extend(chars.flat_map(char::to_lowercase));
    Ok(titled)
}

/// Validate a birth date against the local current date.
pub fn normalize_birth_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    normalize_birth_date_on(raw, Local::now().date_naive())
}

/// Validate a birth date against an explicit `today`.
pub fn normalize_birth_date_on(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let runs = digit_runs(raw);
    let [first, second, third] = runs.as_slice() else {
        return Err(ValidationError::IncompleteBirthDate {
            value: raw.to_string(),
        });
    };

    let (year, month, day) = if third.len() == 4 {
        (*third, *second, *first)
    } else {
        (*first, *second, *third)
    };
    let year = parse_component(year);
    let month = parse_component(month);
    let day = parse_component(day);

    if year < MIN_BIRTH_YEAR {
        return Err(ValidationError::YearTooEarly {
            year,
            min: MIN_BIRTH_YEAR,
        });
    }
    if i64::from(year) > i64::from(today.year()) {
        return Err(ValidationError::YearInFuture {
            year,
            current: today.year(),
        });
    }
    if month == 0 || month > 12 {
        return Err(ValidationError::InvalidMonth { month });
    }

    // Year is bounded by the current year here, so the cast is lossless.
    let days = days_in_month(year as i32, month);
    let invalid_day = || ValidationError::InvalidDay {
        day,
        month,
        year,
        days_in_month: days,
    };
    if day == 0 || day > days {
        return Err(invalid_day());
    }
    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid_day)?;

    if date > today {
        return Err(ValidationError::DateInFuture {
            date: date.format("%Y-%m-%d").to_string(),
        });
    }
    Ok(date)
}

/// Normalize a phone number to its 10-digit national form.
///
/// Separators and punctuation are dropped. An 11-digit number must start with
/// the country digit `7` or `8`, which is stripped.
pub fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let digits = if raw.chars().all(|c| c.is_ascii_digit()) {
        raw.to_string()
    } else {
        digit_runs(raw).concat()
    };

    match digits.len() {
        len if len == PHONE_DIGITS + 1 => {
            if !digits.starts_with(['7', '8']) {
                return Err(ValidationError::ForeignPhoneCountry { value: digits });
            }
            Ok(digits[1..].to_string())
        }
        PHONE_DIGITS => Ok(digits),
        _ => Err(ValidationError::InvalidPhoneLength { value: digits }),
    }
}

/// Match a document type label, ignoring case.
pub fn normalize_document_type(raw: &str) -> Result<DocumentType, ValidationError> {
    let lowered = raw.to_lowercase();
    DocumentType::from_label(&lowered)
        .ok_or(ValidationError::UnknownDocumentType { value: lowered })
}

/// Keep only the digits of a document id and check their count.
pub fn normalize_document_id(
    raw: &str,
    document_type: DocumentType,
) -> Result<String, ValidationError> {
    let digits = digit_runs(raw).concat();
    let expected = document_type.digit_count();
    if digits.len() != expected {
        return Err(ValidationError::DocumentIdLength {
            actual: digits.len(),
            value: digits,
            expected,
        });
    }
    Ok(digits)
}
