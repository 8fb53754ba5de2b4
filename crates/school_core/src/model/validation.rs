//! Field-level constraint checks shared by all entity payloads.
//!
//! # Responsibility
//! - Express length, email syntax and id positivity rules once.
//! - Report the violated field and constraint in a typed error.
//!
//! # Invariants
//! - Lengths are counted in characters, not bytes.
//! - Checks are pure; they never touch storage.
//! - Email domains compare case-insensitively; local parts are kept as typed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMAIL_MAX_CHARS: usize = 254;

static EMAIL_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("valid email local-part regex")
});
static EMAIL_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("valid email domain regex")
});

/// Constraint kinds a payload field can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Character count outside `min..=max`.
    Length {
        min: usize,
        max: usize,
        actual: usize,
    },
    /// Value is not a syntactically valid email address.
    Email,
    /// Foreign-key id must be strictly positive.
    PositiveId { actual: i64 },
}

impl Constraint {
    /// Short machine-readable constraint code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Length { .. } => "length",
            Self::Email => "email",
            Self::PositiveId { .. } => "positive_id",
        }
    }
}

/// First constraint violation found in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self { field, constraint }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.constraint {
            Constraint::Length { min, max, actual } => write!(
                f,
                "{} must be between {min} and {max} characters, got {actual}",
                self.field
            ),
            Constraint::Email => write!(f, "{} must be a valid email address", self.field),
            Constraint::PositiveId { actual } => {
                write!(f, "{} must be greater than 0, got {actual}", self.field)
            }
        }
    }
}

impl Error for ValidationError {}

/// Checks that `value` has between `min` and `max` characters inclusive.
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::new(
            field,
            Constraint::Length { min, max, actual },
        ));
    }
    Ok(())
}

/// Checks email syntax: `local@domain` with a dotted domain whose last
/// label contains a letter. Local parts may use non-ASCII letters.
pub fn check_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, Constraint::Email))
    }
}

/// Checks that an id used as a foreign key is strictly positive.
pub fn check_positive_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            Constraint::PositiveId { actual: value },
        ))
    }
}

/// Returns the stored form of an email address: domain lowercased.
pub fn normalize_email(value: &str) -> String {
    match value.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => value.to_string(),
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().count() > EMAIL_MAX_CHARS {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }
    let tld_has_letter = domain
        .rsplit('.')
        .next()
        .is_some_and(|label| label.chars().any(|c| c.is_ascii_alphabetic()));
    tld_has_letter && EMAIL_LOCAL_RE.is_match(local) && EMAIL_DOMAIN_RE.is_match(domain)
}
