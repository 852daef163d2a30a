//! `ContactsGateway` over the contacts REST API.
//!
//! # Responsibility
//! - Issue `GET /contacts`, `POST /contacts` and `DELETE /contacts/:id`.
//! - Decode `{error}` and `{error, details}` bodies into `GatewayError`.
//!
//! # Invariants
//! - Only connection-level failures become `GatewayError::Transport`.

use super::gateway::{ContactsGateway, GatewayError};
use crate::model::contact::{Contact, ContactId};
use crate::model::page::{ContactPage, PageRequest};
use crate::validation::{ContactInput, FieldErrors};
use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body returned by the API for every non-2xx answer.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<FieldErrors>,
}

/// Blocking HTTP client for one API base URL, e.g. `http://localhost:5000`.
#[derive(Clone)]
pub struct HttpGateway {
    agent: Agent,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl ContactsGateway for HttpGateway {
    fn list_contacts(&self, request: PageRequest) -> Result<ContactPage, GatewayError> {
        let response = self
            .agent
            .get(&self.url("/contacts"))
            .query("page", &request.page().to_string())
            .query("limit", &request.limit().to_string())
            .call()
            .map_err(to_gateway_error)?;
        debug!(
            "event=gateway_call module=view status=ok call=list http_status={}",
            response.status()
        );
        response
            .into_json::<ContactPage>()
            .map_err(|err| GatewayError::Transport(format!("unreadable contacts page: {err}")))
    }

    fn add_contact(&self, input: &ContactInput) -> Result<Contact, GatewayError> {
        let response = self
            .agent
            .post(&self.url("/contacts"))
            .send_json(input)
            .map_err(to_gateway_error)?;
        response
            .into_json::<Contact>()
            .map_err(|err| GatewayError::Transport(format!("unreadable contact: {err}")))
    }

    fn delete_contact(&self, id: ContactId) -> Result<(), GatewayError> {
        self.agent
            .delete(&self.url(&format!("/contacts/{id}")))
            .call()
            .map_err(to_gateway_error)?;
        Ok(())
    }
}

fn to_gateway_error(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::Status(status, response) => match response.into_string() {
            Ok(body) => decode_rejection(status, &body),
            Err(read_err) => {
                warn!(
                    "event=gateway_call module=view status=error http_status={} error={}",
                    status, read_err
                );
                GatewayError::rejected(status, format!("Request failed with status {status}"))
            }
        },
        ureq::Error::Transport(transport) => GatewayError::Transport(transport.to_string()),
    }
}

fn decode_rejection(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) if status == 400 && !details.is_empty() => GatewayError::Validation(details),
        Ok(ErrorBody { error, .. }) => GatewayError::rejected(status, error),
        Err(_) => GatewayError::rejected(status, format!("Request failed with status {status}")),
    }
}
