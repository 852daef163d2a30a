//! Client-facing status strings.
//!
//! Shared by the HTTP layer and the in-process gateway so both surfaces
//! report failures with identical wording. None of these carry storage detail.

pub const WELCOME: &str = "Welcome to Contact Book API";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const CONTACT_EXISTS: &str = "Contact already exists";
pub const CONTACT_NOT_FOUND: &str = "Contact not found";
pub const INVALID_CONTACT_ID: &str = "Invalid contact ID";
pub const INVALID_PAGINATION: &str = "Invalid pagination parameters";
pub const INVALID_JSON_BODY: &str = "Invalid JSON body";
pub const FETCH_FAILED: &str = "Failed to fetch contacts";
pub const ADD_FAILED: &str = "Failed to add contact";
pub const DELETE_FAILED: &str = "Failed to delete contact";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const INTERNAL_ERROR: &str = "Internal server error";
