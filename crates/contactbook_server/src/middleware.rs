//! Cross-cutting HTTP layers: request logging, CORS, panic recovery.

use crate::error::FaultDetail;
use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contactbook_core::{describe_panic, messages};
use log::{error, info, warn};
use serde_json::json;
use std::any::Any;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Logs one `http_request` event per request with status and duration.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();

    if let Some(FaultDetail(detail)) = response.extensions().get::<FaultDetail>() {
        error!(
            "event=http_request module=http status=error method={} path={} http_status={} duration_ms={} error={}",
            method,
            path,
            status.as_u16(),
            duration_ms,
            detail
        );
    } else if status.is_server_error() {
        error!(
            "event=http_request module=http status=error method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=http status=rejected method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=http status=ok method={} path={} http_status={} duration_ms={}",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    }

    response
}

/// CORS restricted to `origins`, with credentials.
pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Converts a handler panic into a generic 500 body.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = describe_panic(&*payload);

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": messages::INTERNAL_ERROR })),
    )
        .into_response();
    response.extensions_mut().insert(FaultDetail(detail));
    response
}
