//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create, paginated list, get and delete over `contacts`.
//! - Keep SQL details inside the core persistence boundary.
//! - Translate UNIQUE violations on `email` into `RepoError::DuplicateEmail`.
//!
//! # Invariants
//! - List order is `created_at DESC, id DESC`, so pages never overlap.
//! - Delete reports affected rows instead of failing on a missing id.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, NewContact};
use crate::model::page::{total_pages, ContactPage, PageRequest};
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_COLUMNS: &str = "id, name, email, phone, created_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Another contact already uses this email.
    DuplicateEmail(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => write!(f, "contact already exists: {email}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateEmail(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact operations.
pub trait ContactRepository {
    fn list_contacts(&self, request: PageRequest) -> RepoResult<ContactPage>;
    fn add_contact(&self, contact: &NewContact) -> RepoResult<Contact>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Returns the number of deleted rows (0 or 1).
    fn delete_contact(&self, id: ContactId) -> RepoResult<usize>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self, request: PageRequest) -> RepoResult<ContactPage> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        let total = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative contact count `{total}`")))?;

        let offset = i64::try_from(request.offset()).map_err(|_| {
            RepoError::InvalidData(format!("page offset {} overflows", request.offset()))
        })?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS}
             FROM contacts
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![i64::from(request.limit()), offset])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(ContactPage {
            contacts,
            total,
            total_pages: total_pages(total, request.limit()),
            current_page: request.page(),
        })
    }

    fn add_contact(&self, contact: &NewContact) -> RepoResult<Contact> {
        self.conn
            .query_row(
                &format!(
                    "INSERT INTO contacts (name, email, phone)
                     VALUES (?1, ?2, ?3)
                     RETURNING {CONTACT_COLUMNS};"
                ),
                params![
                    contact.name.as_str(),
                    contact.email.as_str(),
                    contact.phone.as_str()
                ],
                |row| Ok(parse_contact_row(row)),
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::DuplicateEmail(contact.email.clone())
                } else {
                    RepoError::from(err)
                }
            })?
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1;"),
                [id],
                |row| Ok(parse_contact_row(row)),
            )
            .optional()?;

        found.transpose()
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        Ok(changed)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let created_at: Option<String> = row.get("created_at")?;
    let created_at = created_at.ok_or_else(|| {
        RepoError::InvalidData("missing created_at in contacts.created_at".to_string())
    })?;

    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        created_at,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
