//! Identity document types accepted for patient registration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of identity document, with the digit count its number must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Internal passport, 10 digits.
    Passport,
    /// Foreign travel passport, 9 digits.
    ForeignPassport,
    /// Driver's license, 10 digits.
    DriverLicense,
}

impl DocumentType {
    /// Every supported document type.
    pub const fn all() -> [Self; 3] {
        [Self::Passport, Self::ForeignPassport, Self::DriverLicense]
    }

    /// Canonical lower-case label, as stored in the backing file.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passport => "паспорт",
            Self::ForeignPassport => "заграничный паспорт",
            Self::DriverLicense => "водительское удостоверение",
        }
    }

    /// Number of digits a document id of this type must have.
    #[must_use]
    pub const fn digit_count(&self) -> usize {
        match self {
            Self::Passport => 10,
            Self::ForeignPassport => 9,
            Self::DriverLicense => 10,
        }
    }

    /// Look up a document type by its exact canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
