//! HTTP surface for the contact book.
//!
//! # Responsibility
//! - Assemble the router, shared state and cross-cutting layers.
//!
//! # Invariants
//! - Every unmatched path or method answers 404 with a JSON error body.
//! - A panicking handler answers 500 and the process keeps serving.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use axum::http::HeaderValue;
use axum::routing::{delete, get};
use axum::Router;
use contactbook_core::Store;
use tower_http::catch_panic::CatchPanicLayer;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Builds the full application router.
pub fn build_app(state: AppState, cors_origins: &[HeaderValue]) -> Router {
    Router::new()
        .route("/", get(routes::welcome))
        .route(
            "/contacts",
            get(routes::list_contacts)
                .post(routes::add_contact)
                .fallback(routes::route_not_found),
        )
        .route(
            "/contacts/:id",
            delete(routes::delete_contact).fallback(routes::route_not_found),
        )
        .route("/health", get(routes::health))
        .fallback(routes::route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(middleware::cors_layer(cors_origins))
}
