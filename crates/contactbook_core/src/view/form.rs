//! Add-contact form state.
//!
//! # Invariants
//! - Editing a field clears that field's error and nothing else.
//! - `submission()` never yields input that fails the advisory validator.

use crate::validation::{normalize_phone, validate_contact_form, ContactInput, Field, FieldErrors};

/// Editable form fields plus the errors currently shown next to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    phone: String,
    errors: FieldErrors,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
        }
        self.errors.remove(field);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    /// Shows server-reported field errors on the form.
    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Validates current values and returns the payload to send.
    ///
    /// On failure the errors are stored on the form and returned.
    pub fn submission(&mut self) -> Result<ContactInput, FieldErrors> {
        let input = ContactInput::new(self.name.as_str(), self.email.as_str(), self.phone.as_str());
        let errors = validate_contact_form(&input);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(errors);
        }

        self.errors = FieldErrors::new();
        Ok(ContactInput {
            phone: Some(normalize_phone(&self.phone)),
            ..input
        })
    }

    /// Clears values and errors after a successful add.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::ContactForm;
    use crate::validation::{Field, EMAIL_FORMAT, NAME_REQUIRED};

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = ContactForm::new();
        form.set_field(Field::Email, "nope");
        form.submission().expect_err("empty name and bad email");
        assert_eq!(form.error(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(form.error(Field::Email), Some(EMAIL_FORMAT));

        form.set_field(Field::Email, "ada@example.com");
        assert_eq!(form.error(Field::Email), None);
        assert_eq!(form.error(Field::Name), Some(NAME_REQUIRED));
    }

    #[test]
    fn submission_sends_digits_only_phone() {
        let mut form = ContactForm::new();
        form.set_field(Field::Name, "Ada");
        form.set_field(Field::Email, "ada@example.com");
        form.set_field(Field::Phone, "555-123-4567");

        let input = form.submission().expect("form is valid");
        assert_eq!(input.phone.as_deref(), Some("5551234567"));
        assert_eq!(input.name.as_deref(), Some("Ada"));
        assert!(form.errors().is_empty());
    }
}
