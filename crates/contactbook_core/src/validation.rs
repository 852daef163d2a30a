//! Contact input normalization and field validation.
//!
//! # Responsibility
//! - Normalize raw `{name, email, phone}` input.
//! - Produce per-field error maps for the HTTP boundary (authoritative) and
//!   the client form (advisory).
//!
//! # Invariants
//! - Validation is pure: no I/O, no logging.
//! - Both validators check the same normalized values, so a form that passes
//!   the advisory check also passes the authoritative one.
//! - An empty `FieldErrors` means the input may be persisted.

use crate::model::contact::NewContact;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Valid email is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_FORMAT: &str = "Please enter a valid email address";
pub const PHONE_INVALID: &str = "Phone must be exactly 10 digits";
pub const PHONE_REQUIRED: &str = "Phone is required";

/// Validated contact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// Field name -> message map. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw contact input as received from a client. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }

    /// Trims `name`/`email` and strips every non-digit from `phone`.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|value| value.trim().to_string()),
            email: self.email.as_deref().map(|value| value.trim().to_string()),
            phone: self.phone.as_deref().map(normalize_phone),
        }
    }

    /// Normalizes and validates, yielding an insert payload on success.
    pub fn into_new_contact(self) -> Result<NewContact, FieldErrors> {
        let errors = validate_contact(&self);
        if !errors.is_empty() {
            return Err(errors);
        }

        let normalized = self.normalized();
        Ok(NewContact {
            name: normalized.name.unwrap_or_default(),
            email: normalized.email.unwrap_or_default(),
            phone: normalized.phone.unwrap_or_default(),
        })
    }
}

/// Keeps ASCII digits only: `"(555) 123-4567"` -> `"5551234567"`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Authoritative validation applied before any persistence call.
pub fn validate_contact(input: &ContactInput) -> FieldErrors {
    let input = input.normalized();
    let mut errors = FieldErrors::new();

    if is_blank(input.name.as_deref()) {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    match input.email.as_deref() {
        Some(email) if EMAIL_RE.is_match(email) => {}
        _ => errors.insert(Field::Email, EMAIL_INVALID),
    }

    match input.phone.as_deref() {
        Some(phone) if PHONE_RE.is_match(phone) => {}
        _ => errors.insert(Field::Phone, PHONE_INVALID),
    }

    errors
}

/// Advisory validation for the add form.
///
/// Distinguishes missing values from malformed ones so the form can show a
/// more specific hint than the server.
pub fn validate_contact_form(input: &ContactInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(input.name.as_deref()) {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if is_blank(input.email.as_deref()) {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !input
        .email
        .as_deref()
        .is_some_and(|email| EMAIL_RE.is_match(email.trim()))
    {
        errors.insert(Field::Email, EMAIL_FORMAT);
    }

    if is_blank(input.phone.as_deref()) {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !input
        .phone
        .as_deref()
        .is_some_and(|phone| PHONE_RE.is_match(&normalize_phone(phone)))
    {
        errors.insert(Field::Phone, PHONE_INVALID);
    }

    errors
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}
