//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod db;
pub mod logging;
pub mod messages;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;
pub mod view;

pub use db::{DbError, DbResult, FallbackPolicy, Store, StoreConfig, StoreMode};
pub use logging::{default_log_level, describe_panic, init_logging, logging_status, LogTarget};
pub use model::contact::{Contact, ContactId, NewContact};
pub use model::page::{ContactPage, PageRequest, PageRequestError, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_service::{with_contact_service, ContactService, ContactServiceError};
pub use validation::{validate_contact, validate_contact_form, ContactInput, Field, FieldErrors};
pub use view::gateway::{ContactsGateway, GatewayError, LocalGateway};
pub use view::http_gateway::HttpGateway;
pub use view::state::{AddOutcome, ContactBookView, DeleteOutcome};
