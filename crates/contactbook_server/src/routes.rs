//! Route handlers for the contacts API.
//!
//! # Responsibility
//! - Parse path, query and body input at the HTTP boundary.
//! - Run service calls off the async runtime.
//! - Shape success bodies; failures go through `ApiError`.
//!
//! # Invariants
//! - Handlers never touch SQL; all storage access goes through the service.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use contactbook_core::messages;
use contactbook_core::model::page::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use contactbook_core::{
    with_contact_service, ContactId, ContactInput, ContactPage, ContactService, ContactServiceError,
    PageRequest, SqliteContactRepository,
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

/// Raw `page`/`limit` query values; parsed by hand so bad input maps to one message.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

impl ListParams {
    fn page_request(&self) -> Result<PageRequest, ApiError> {
        let page = parse_param(self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_param(self.limit.as_deref(), DEFAULT_PAGE_SIZE)?;
        PageRequest::new(page, limit).map_err(|err| {
            warn!("event=contacts_list module=http status=rejected error={err}");
            ApiError::BadRequest(messages::INVALID_PAGINATION)
        })
    }
}

fn parse_param(raw: Option<&str>, default: u32) -> Result<i64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(i64::from(default)),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| ApiError::BadRequest(messages::INVALID_PAGINATION)),
    }
}

/// Runs a service call on the blocking pool.
async fn call_service<T, F>(state: &AppState, storage_message: &'static str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ContactService<SqliteContactRepository<'_>>) -> Result<T, ContactServiceError>
        + Send
        + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || with_contact_service(&store, f))
        .await
        .map_err(|err| ApiError::internal(storage_message, err.to_string()))?
        .map_err(|err| ApiError::from_service(err, storage_message))
}

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": messages::WELCOME }))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ContactPage>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        warn!("event=contacts_list module=http status=rejected error={rejection}");
        ApiError::BadRequest(messages::INVALID_PAGINATION)
    })?;
    let request = params.page_request()?;

    let page = call_service(&state, messages::FETCH_FAILED, move |service| {
        service.list_contacts(request)
    })
    .await?;
    Ok(Json(page))
}

pub async fn add_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = body.map_err(|rejection| {
        warn!("event=contact_add module=http status=rejected error={rejection}");
        ApiError::BadRequest(messages::INVALID_JSON_BODY)
    })?;

    let contact = call_service(&state, messages::ADD_FAILED, move |service| {
        service.add_contact(input)
    })
    .await?;
    info!(
        "event=contact_add module=http status=ok id={}",
        contact.id
    );
    Ok((StatusCode::CREATED, Json(contact)).into_response())
}

pub async fn delete_contact(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(raw_id) = raw_id.map_err(|rejection| {
        warn!("event=contact_delete module=http status=rejected error={rejection}");
        ApiError::BadRequest(messages::INVALID_CONTACT_ID)
    })?;
    let id: ContactId = raw_id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(messages::INVALID_CONTACT_ID))?;

    call_service(&state, messages::DELETE_FAILED, move |service| {
        service.delete_contact(id)
    })
    .await?;
    info!("event=contact_delete module=http status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound(messages::ROUTE_NOT_FOUND)
}
