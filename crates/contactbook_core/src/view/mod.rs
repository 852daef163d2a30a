//! Headless presentation layer for the contact book page.
//!
//! # Responsibility
//! - Model the add form, paginated table and status banners without any UI
//!   toolkit, so the behavior can be driven and tested in-process.
//! - Talk to the API only through `ContactsGateway`.
//!
//! # Invariants
//! - The view keeps no state across requests beyond what the last fetch
//!   returned; every mutation is followed by a re-fetch.

pub mod form;
pub mod gateway;
pub mod http_gateway;
pub mod pagination;
pub mod state;
