//! Student domain model.
//!
//! # Responsibility
//! - Define the persisted student record and its create/update payloads.
//! - Enforce field constraints before anything reaches storage.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `email` is unique across students (enforced by storage).
//! - Patches only carry the fields they change; `id` is never patchable.

use crate::model::validation::{check_email, check_length, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned student identity.
pub type StudentId = i64;

pub const STUDENT_NAME_MIN: usize = 2;
pub const STUDENT_NAME_MAX: usize = 100;
pub const STUDENT_PHONE_MIN: usize = 10;
pub const STUDENT_PHONE_MAX: usize = 20;

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Full name, 2..=100 characters.
    pub name: String,
    /// Unique, syntactically valid email address.
    pub email: String,
    /// Free-form phone number, 10..=20 characters.
    pub phone: String,
}

/// Create payload for a student.
///
/// Deserialization only checks shape; writes run [`NewStudent::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl NewStudent {
    /// Builds a validated create payload.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let student = Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        };
        student.validate()?;
        Ok(student)
    }

    /// Checks name, email and phone in that order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        check_email("email", &self.email)?;
        validate_phone(&self.phone)
    }
}

/// Partial update for a student; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl StudentPatch {
    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Checks every supplied field; absent fields are skipped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            check_email("email", email)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    check_length("name", name, STUDENT_NAME_MIN, STUDENT_NAME_MAX)
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    check_length("phone", phone, STUDENT_PHONE_MIN, STUDENT_PHONE_MAX)
}
