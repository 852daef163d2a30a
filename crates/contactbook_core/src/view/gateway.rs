//! Transport seam between the view model and the contacts API.
//!
//! # Responsibility
//! - Define the three calls the client issues (list, add, delete).
//! - Carry server-side failures back as user-facing strings or field maps.
//!
//! # Invariants
//! - Gateway errors never contain storage internals; `message` is shown to
//!   users verbatim.

use crate::db::Store;
use crate::messages;
use crate::model::contact::{Contact, ContactId};
use crate::model::page::{ContactPage, PageRequest};
use crate::service::contact_service::{with_contact_service, ContactServiceError};
use crate::validation::{ContactInput, FieldErrors};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure reported by a gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Server rejected the input field by field.
    Validation(FieldErrors),
    /// Server answered with a non-success status and an error string.
    Rejected { status: u16, message: String },
    /// Request never produced a server answer.
    Transport(String),
}

impl GatewayError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{}: {errors}", messages::VALIDATION_FAILED),
            Self::Rejected { message, .. } => write!(f, "{message}"),
            Self::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl Error for GatewayError {}

/// Calls the view model issues against the contacts API.
pub trait ContactsGateway {
    fn list_contacts(&self, request: PageRequest) -> Result<ContactPage, GatewayError>;
    fn add_contact(&self, input: &ContactInput) -> Result<Contact, GatewayError>;
    fn delete_contact(&self, id: ContactId) -> Result<(), GatewayError>;
}

/// In-process gateway that talks to a `Store` directly.
///
/// Mirrors the HTTP status mapping so the view behaves the same with or
/// without a network hop.
#[derive(Clone)]
pub struct LocalGateway {
    store: Store,
}

impl LocalGateway {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl ContactsGateway for LocalGateway {
    fn list_contacts(&self, request: PageRequest) -> Result<ContactPage, GatewayError> {
        with_contact_service(&self.store, |service| service.list_contacts(request))
            .map_err(|err| to_gateway_error(err, messages::FETCH_FAILED))
    }

    fn add_contact(&self, input: &ContactInput) -> Result<Contact, GatewayError> {
        with_contact_service(&self.store, |service| service.add_contact(input.clone()))
            .map_err(|err| to_gateway_error(err, messages::ADD_FAILED))
    }

    fn delete_contact(&self, id: ContactId) -> Result<(), GatewayError> {
        with_contact_service(&self.store, |service| service.delete_contact(id))
            .map_err(|err| to_gateway_error(err, messages::DELETE_FAILED))
    }
}

fn to_gateway_error(err: ContactServiceError, storage_message: &'static str) -> GatewayError {
    match err {
        ContactServiceError::Validation(errors) => GatewayError::Validation(errors),
        other => {
            if let ContactServiceError::Repo(repo_err) = &other {
                error!(
                    "event=gateway_call module=view status=error error_code=storage_fault error={}",
                    repo_err
                );
            }
            GatewayError::rejected(other.client_status(), other.client_message(storage_message))
        }
    }
}
