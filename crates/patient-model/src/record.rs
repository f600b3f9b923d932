//! The validated patient record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::audit::SharedAuditTrail;
use crate::document::DocumentType;
use crate::error::{PatientError, Result, UnknownFieldError, ValidationError};
use crate::normalize::{
    normalize_birth_date, normalize_document_id, normalize_document_type, normalize_name,
    normalize_phone,
};

/// Username used in audit lines before both names are known.
pub const NEW_USER: &str = "New User";

/// Number of columns in a stored record.
pub const FIELD_COUNT: usize = 6;

/// Fields of a patient record, in storage column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientField {
    FirstName,
    LastName,
    BirthDate,
    Phone,
    DocumentType,
    DocumentId,
}

impl PatientField {
    /// All fields in storage column order.
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::FirstName,
        Self::LastName,
        Self::BirthDate,
        Self::Phone,
        Self::DocumentType,
        Self::DocumentId,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::BirthDate => "birth_date",
            Self::Phone => "phone",
            Self::DocumentType => "document_type",
            Self::DocumentId => "document_id",
        }
    }

    /// Human-readable label used in record summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::BirthDate => "Birth date",
            Self::Phone => "Phone",
            Self::DocumentType => "Document type",
            Self::DocumentId => "Document id",
        }
    }
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatientField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// A patient whose fields are always in normalized form.
///
/// Names are write-once. The other fields change only through validating
/// setters that leave the record untouched on failure. Every creation and
/// change is written to the shared audit trail.
///
/// Changing the document type does not re-check the stored document id, so a
/// record may hold an id validated against its previous type.
#[derive(Clone, Serialize)]
pub struct PatientRecord {
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    phone: String,
    document_type: DocumentType,
    document_id: String,
    #[serde(skip)]
    audit: SharedAuditTrail,
}

impl PatientRecord {
    /// Validate six raw fields and build a record.
    ///
    /// Fields are checked in column order; the document id is checked
    /// against the already normalized document type. The first failure is
    /// audited and returned.
    pub fn new(
        audit: SharedAuditTrail,
        first_name: &str,
        last_name: &str,
        birth_date: &str,
        phone: &str,
        document_type: &str,
        document_id: &str,
    ) -> Result<Self> {
        let first_name = audited(
            &audit,
            NEW_USER,
            PatientField::FirstName,
            first_name,
            normalize_name(first_name),
        )?;
        let last_name = audited(
            &audit,
            NEW_USER,
            PatientField::LastName,
            last_name,
            normalize_name(last_name),
        )?;
        let username = username_of(&first_name, &last_name);
        let birth_date = audited(
            &audit,
            &username,
            PatientField::BirthDate,
            birth_date,
            normalize_birth_date(birth_date),
        )?;
        let phone = audited(
            &audit,
            &username,
            PatientField::Phone,
            phone,
            normalize_phone(phone),
        )?;
        let document_type = audited(
            &audit,
            &username,
            PatientField::DocumentType,
            document_type,
            normalize_document_type(document_type),
        )?;
        let document_id = audited(
            &audit,
            &username,
            PatientField::DocumentId,
            document_id,
            normalize_document_id(document_id, document_type),
        )?;

        audit.info(&format!("patient created: {username}"));
        tracing::debug!("patient record created");

        Ok(Self {
            first_name,
            last_name,
            birth_date,
            phone,
            document_type,
            document_id,
            audit,
        })
    }

    /// Rebuild a record from stored cells with full validation.
    ///
    /// A missing cell fails with [`PatientError::WrongType`], a row with
    /// more cells than fields with [`PatientError::RowLength`].
    pub fn from_row(audit: SharedAuditTrail, cells: &[Option<&str>]) -> Result<Self> {
        if cells.len() > FIELD_COUNT {
            audit.error(&format!(
                "row has {} values, expected {FIELD_COUNT}: {NEW_USER}",
                cells.len()
            ));
            return Err(PatientError::RowLength {
                expected: FIELD_COUNT,
                actual: cells.len(),
            });
        }
        let mut values = [""; FIELD_COUNT];
        for (index, field) in PatientField::ALL.into_iter().enumerate() {
            match cells.get(index).copied().flatten() {
                Some(value) => values[index] = value,
                None => {
                    audit.error(&format!("missing {field} value: {NEW_USER}"));
                    return Err(PatientError::WrongType { field });
                }
            }
        }
        let [first_name, last_name, birth_date, phone, document_type, document_id] = values;
        Self::new(
            audit,
            first_name,
            last_name,
            birth_date,
            phone,
            document_type,
            document_id,
        )
    }

    /// Normalized values in storage column order.
    pub fn to_row(&self) -> [String; FIELD_COUNT] {
        PatientField::ALL.map(|field| self.field(field))
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Birth date as `YYYY-MM-DD`.
    pub fn birth_date_iso(&self) -> String {
        self.birth_date.format("%Y-%m-%d").to_string()
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// `User <First> <Last>`, as written to the audit trail.
    pub fn username(&self) -> String {
        username_of(&self.first_name, &self.last_name)
    }

    /// The audit trail this record writes to.
    pub fn audit(&self) -> &SharedAuditTrail {
        &self.audit
    }

    /// Normalized value of a field as text.
    pub fn field(&self, field: PatientField) -> String {
        match field {
            PatientField::FirstName => self.first_name.clone(),
            PatientField::LastName => self.last_name.clone(),
            PatientField::BirthDate => self.birth_date_iso(),
            PatientField::Phone => self.phone.clone(),
            PatientField::DocumentType => self.document_type.label().to_string(),
            PatientField::DocumentId => self.document_id.clone(),
        }
    }

    /// Value of a field looked up by name; `None` for unknown names.
    pub fn field_by_name(&self, name: &str) -> Option<String> {
        name.parse::<PatientField>()
            .ok()
            .map(|field| self.field(field))
    }

    /// Whether `name` is a patient record field.
    pub fn has_field(&self, name: &str) -> bool {
        name.parse::<PatientField>().is_ok()
    }

    /// Always fails: the first name is write-once.
    pub fn set_first_name(&mut self, _first_name: &str) -> Result<()> {
        Err(self.reject_immutable(PatientField::FirstName))
    }

    /// Always fails: the last name is write-once.
    pub fn set_last_name(&mut self, _last_name: &str) -> Result<()> {
        Err(self.reject_immutable(PatientField::LastName))
    }

    pub fn set_birth_date(&mut self, raw: &str) -> Result<()> {
        let birth_date = self.checked(PatientField::BirthDate, raw, normalize_birth_date(raw))?;
        self.birth_date = birth_date;
        self.changed(PatientField::BirthDate);
        Ok(())
    }

    pub fn set_phone(&mut self, raw: &str) -> Result<()> {
        let phone = self.checked(PatientField::Phone, raw, normalize_phone(raw))?;
        self.phone = phone;
        self.changed(PatientField::Phone);
        Ok(())
    }

    /// Replace the document type. The stored document id is kept as is.
    pub fn set_document_type(&mut self, raw: &str) -> Result<()> {
        let document_type =
            self.checked(PatientField::DocumentType, raw, normalize_document_type(raw))?;
        self.document_type = document_type;
        self.changed(PatientField::DocumentType);
        Ok(())
    }

    /// Replace the document id, checked against the current document type.
    pub fn set_document_id(&mut self, raw: &str) -> Result<()> {
        let document_id = self.checked(
            PatientField::DocumentId,
            raw,
            normalize_document_id(raw, self.document_type),
        )?;
        self.document_id = document_id;
        self.changed(PatientField::DocumentId);
        Ok(())
    }

    fn checked<T>(
        &self,
        field: PatientField,
        raw: &str,
        result: std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        audited(&self.audit, &self.username(), field, raw, result)
    }

    fn changed(&self, field: PatientField) {
        self.audit
            .info(&format!("{field} changed: {}", self.username()));
        tracing::debug!(%field, "patient field updated");
    }

    fn reject_immutable(&self, field: PatientField) -> PatientError {
        self.audit
            .error(&format!("attempt to change {field}: {}", self.username()));
        tracing::warn!(%field, "rejected change of write-once field");
        PatientError::ImmutableField { field }
    }
}

fn username_of(first_name: &str, last_name: &str) -> String {
    if first_name.is_empty() || last_name.is_empty() {
        NEW_USER.to_string()
    } else {
        format!("User {first_name} {last_name}")
    }
}

/// Audit a rejected value before surfacing it as a [`PatientError`].
fn audited<T>(
    audit: &SharedAuditTrail,
    username: &str,
    field: PatientField,
    raw: &str,
    result: std::result::Result<T, ValidationError>,
) -> Result<T> {
    result.map_err(|source| {
        audit.error(&format!("rejected {field} '{raw}' ({source}): {username}"));
        tracing::warn!(%field, "rejected patient field value");
        PatientError::validation(field, source)
    })
}

impl fmt::Debug for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatientRecord")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("birth_date", &self.birth_date)
            .field("phone", &self.phone)
            .field("document_type", &self.document_type)
            .field("document_id", &self.document_id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PatientRecord {
    fn eq(&self, other: &Self) -> bool {
        self.to_row() == other.to_row()
    }
}

impl Eq for PatientRecord {}

impl fmt::Display for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in PatientField::ALL {
            writeln!(f, "{}: {}", field.label(), self.field(field))?;
        }
        Ok(())
    }
}
