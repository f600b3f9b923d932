//! Error types for patient record validation.

use thiserror::Error;

use crate::record::PatientField;

/// A raw field value that broke one of the normalization rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // === Names ===
    /// Name contains a character that is not a letter.
    #[error("name '{value}' must contain letters only")]
    NonAlphabeticName { value: String },

    // === Birth date ===
    /// Birth date does not contain exactly three digit groups.
    #[error("birth date '{value}' must have day, month and year")]
    IncompleteBirthDate { value: String },

    /// Year is before the earliest accepted year.
    #[error("year {year} is before {min}")]
    YearTooEarly { year: u32, min: u32 },

    /// Year is after the current year.
    #[error("year {year} is after the current year {current}")]
    YearInFuture { year: u32, current: i32 },

    /// Month is outside 1..=12.
    #[error("month {month} is not in 1..=12")]
    InvalidMonth { month: u32 },

    /// Day is outside the days of the given month.
    #[error("day {day} is not valid for {year}-{month:02} ({days_in_month} days)")]
    InvalidDay {
        day: u32,
        month: u32,
        year: u32,
        days_in_month: u32,
    },

    /// Complete date lies after today.
    #[error("birth date {date} is in the future")]
    DateInFuture { date: String },

    // === Phone ===
    /// 11-digit phone number with a country digit other than 7 or 8.
    #[error("phone '{value}' has an unsupported country code")]
    ForeignPhoneCountry { value: String },

    /// Phone number does not have 10 or 11 digits.
    #[error("phone '{value}' must have 10 or 11 digits")]
    InvalidPhoneLength { value: String },

    // === Documents ===
    /// Document type is not one of the known labels.
    #[error("unknown document type '{value}'")]
    UnknownDocumentType { value: String },

    /// Document id digit count does not match the document type.
    #[error("document id '{value}' must have {expected} digits, got {actual}")]
    DocumentIdLength {
        value: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced by [`crate::PatientRecord`] construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatientError {
    /// A field was missing or not text (e.g. an empty CSV cell).
    #[error("field {field} has a wrong type: expected text")]
    WrongType { field: PatientField },

    /// A stored row does not have exactly one cell per field.
    #[error("row has {actual} values, expected {expected}")]
    RowLength { expected: usize, actual: usize },

    /// A field value failed validation.
    #[error("invalid {field}")]
    Validation {
        field: PatientField,
        #[source]
        source: ValidationError,
    },

    /// Attempt to change a write-once field.
    #[error("field {field} cannot be changed after creation")]
    ImmutableField { field: PatientField },
}

impl PatientError {
    pub(crate) fn validation(field: PatientField, source: ValidationError) -> Self {
        Self::Validation { field, source }
    }

    /// The field this error refers to, if any.
    pub fn field(&self) -> Option<PatientField> {
        match self {
            Self::WrongType { field }
            | Self::Validation { field, .. }
            | Self::ImmutableField { field } => Some(*field),
            Self::RowLength { .. } => None,
        }
    }
}

/// A field name that does not belong to a patient record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown patient field '{0}'")]
pub struct UnknownFieldError(pub String);

/// Result type for patient record operations.
pub type Result<T> = std::result::Result<T, PatientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PatientError::validation(
            PatientField::Phone,
            ValidationError::InvalidPhoneLength {
                value: "123".to_string(),
            },
        );
        assert_eq!(err.to_string(), "invalid phone");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("phone '123' must have 10 or 11 digits")
        );
    }

    #[test]
    fn test_error_field() {
        let err = PatientError::ImmutableField {
            field: PatientField::LastName,
        };
        assert_eq!(err.field(), Some(PatientField::LastName));
        assert_eq!(
            err.to_string(),
            "field last_name cannot be changed after creation"
        );
    }

    #[test]
    fn test_row_length_has_no_field() {
        let err = PatientError::RowLength {
            expected: 6,
            actual: 8,
        };
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "row has 8 values, expected 6");
    }
}
