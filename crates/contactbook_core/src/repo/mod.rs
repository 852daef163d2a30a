//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes accept only validated `NewContact` payloads.
//! - Repository APIs return semantic errors (`DuplicateEmail`) in addition to
//!   DB transport errors.

pub mod contact_repo;
