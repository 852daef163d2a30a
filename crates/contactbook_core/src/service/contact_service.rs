//! Contact use-case service.
//!
//! # Responsibility
//! - Provide list/add/delete entry points for core callers.
//! - Run authoritative validation before any persistence call.
//! - Turn zero-row deletes into `NotFound`.
//!
//! # Invariants
//! - Invalid input never reaches the repository.
//! - Service layer remains storage-agnostic.

use crate::db::{DbError, Store};
use crate::messages;
use crate::model::contact::{Contact, ContactId};
use crate::model::page::{ContactPage, PageRequest};
use crate::repo::contact_repo::{ContactRepository, RepoError, SqliteContactRepository};
use crate::validation::{ContactInput, FieldErrors};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Input failed field validation; nothing was persisted.
    Validation(FieldErrors),
    /// Email is already taken by another contact.
    DuplicateEmail(String),
    /// Delete target does not exist.
    NotFound(ContactId),
    /// Delete target id is not a positive integer.
    InvalidId(ContactId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ContactServiceError {
    /// HTTP status a client sees for this failure.
    pub fn client_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::DuplicateEmail(_) | Self::InvalidId(_) => 400,
            Self::NotFound(_) => 404,
            Self::Repo(_) => 500,
        }
    }

    /// Client-facing message. Storage faults use `storage_message` so no
    /// internal detail leaks.
    pub fn client_message(&self, storage_message: &'static str) -> &'static str {
        match self {
            Self::Validation(_) => messages::VALIDATION_FAILED,
            Self::DuplicateEmail(_) => messages::CONTACT_EXISTS,
            Self::InvalidId(_) => messages::INVALID_CONTACT_ID,
            Self::NotFound(_) => messages::CONTACT_NOT_FOUND,
            Self::Repo(_) => storage_message,
        }
    }
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::DuplicateEmail(email) => write!(f, "contact already exists: {email}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidId(id) => write!(f, "invalid contact id: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ContactServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Runs `f` against a SQLite-backed service while holding the store lock.
pub fn with_contact_service<T>(
    store: &Store,
    f: impl FnOnce(&ContactService<SqliteContactRepository<'_>>) -> Result<T, ContactServiceError>,
) -> Result<T, ContactServiceError> {
    store.with_connection(|conn| f(&ContactService::new(SqliteContactRepository::new(conn))))
}

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists one page of contacts, newest first.
    pub fn list_contacts(&self, request: PageRequest) -> Result<ContactPage, ContactServiceError> {
        Ok(self.repo.list_contacts(request)?)
    }

    /// Validates, normalizes and stores one contact.
    ///
    /// # Contract
    /// - Returns the stored record with store-assigned `id`/`created_at`.
    /// - Returns `Validation` without touching storage on bad input.
    pub fn add_contact(&self, input: ContactInput) -> Result<Contact, ContactServiceError> {
        let contact = input
            .into_new_contact()
            .map_err(ContactServiceError::Validation)?;
        Ok(self.repo.add_contact(&contact)?)
    }

    pub fn get_contact(&self, id: ContactId) -> Result<Option<Contact>, ContactServiceError> {
        Ok(self.repo.get_contact(id)?)
    }

    /// Hard-deletes one contact.
    pub fn delete_contact(&self, id: ContactId) -> Result<(), ContactServiceError> {
        if id < 1 {
            return Err(ContactServiceError::InvalidId(id));
        }

        match self.repo.delete_contact(id)? {
            0 => Err(ContactServiceError::NotFound(id)),
            _ => Ok(()),
        }
    }
}
