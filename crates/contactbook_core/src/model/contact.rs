//! Contact domain model.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - `NewContact` values are already normalized and validated.

use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key. Monotonic and never reused.
pub type ContactId = i64;

/// Stored contact record.
///
/// Serialized with the table's column names (`created_at` stays snake_case).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    /// Exactly 10 ASCII digits.
    pub phone: String,
    /// `YYYY-MM-DD HH:MM:SS` in UTC, as written by SQLite `CURRENT_TIMESTAMP`.
    pub created_at: String,
}

/// Insert payload for a contact that passed validation.
///
/// Built through `ContactInput::into_new_contact`, which keeps unvalidated
/// input from reaching the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}
