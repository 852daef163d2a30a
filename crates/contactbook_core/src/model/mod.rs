//! Contact domain model and pagination types.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage, HTTP and view layers.
//!
//! # Invariants
//! - Every stored contact is identified by a store-assigned `ContactId`.
//! - Deletion is a hard delete; ids are never reused.

pub mod contact;
pub mod page;
