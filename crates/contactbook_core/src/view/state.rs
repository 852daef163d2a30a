//! Contact book page state machine.
//!
//! # Responsibility
//! - Hold the list, paging and banner state the client renders.
//! - Drive list/add/delete through a `ContactsGateway`.
//! - Decide which page to re-fetch after each mutation.
//!
//! # Invariants
//! - Every gateway call runs with `loading = true` and ends with it cleared.
//! - A successful add always re-fetches page 1.
//! - Deleting the only row of page N > 1 re-fetches page N - 1.
//! - Success banners expire `SUCCESS_MESSAGE_TTL` after they are shown.

use super::form::ContactForm;
use super::gateway::{ContactsGateway, GatewayError};
use super::pagination::{page_numbers, PageItem};
use crate::model::contact::{Contact, ContactId};
use crate::model::page::{PageRequest, DEFAULT_PAGE_SIZE};
use crate::validation::{ContactInput, FieldErrors};
use log::{debug, error};
use std::time::{Duration, Instant};

pub const CONTACTS_PER_PAGE: u32 = DEFAULT_PAGE_SIZE;
pub const SUCCESS_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch contacts. Please check if the server is running.";
pub const ADDED_MESSAGE: &str = "Contact added successfully!";
pub const DELETED_MESSAGE: &str = "Contact deleted successfully!";

/// Result of an add attempt, as seen by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Contact),
    /// Advisory or server-side field errors; shown next to the inputs.
    Invalid(FieldErrors),
    /// Non-field failure; shown in the error banner.
    Failed,
}

/// Result of a delete attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation prompt.
    Cancelled,
    Deleted,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SuccessBanner {
    text: String,
    expires_at: Instant,
}

/// Headless model of the single contact-book page.
pub struct ContactBookView<G: ContactsGateway> {
    gateway: G,
    contacts: Vec<Contact>,
    current_page: u32,
    total_pages: u64,
    total_contacts: u64,
    loading: bool,
    error: Option<String>,
    success: Option<SuccessBanner>,
    form: ContactForm,
}

impl<G: ContactsGateway> ContactBookView<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            contacts: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_contacts: 0,
            loading: false,
            error: None,
            success: None,
            form: ContactForm::new(),
        }
    }

    /// Initial load of page 1.
    pub fn load(&mut self) -> bool {
        self.fetch_contacts(1)
    }

    /// Fetches `page` and adopts the server's view of paging totals.
    pub fn fetch_contacts(&mut self, page: u32) -> bool {
        self.loading = true;
        self.error = None;

        let request = match PageRequest::new(i64::from(page), i64::from(CONTACTS_PER_PAGE)) {
            Ok(request) => request,
            Err(err) => {
                error!("event=contacts_fetch module=view status=error error={err}");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.loading = false;
                return false;
            }
        };

        let fetched = match self.gateway.list_contacts(request) {
            Ok(result) => {
                debug!(
                    "event=contacts_fetch module=view status=ok page={} rows={}",
                    result.current_page,
                    result.contacts.len()
                );
                self.contacts = result.contacts;
                self.total_pages = result.total_pages;
                self.current_page = result.current_page;
                self.total_contacts = result.total;
                true
            }
            Err(err) => {
                error!("event=contacts_fetch module=view status=error error={err}");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                false
            }
        };

        self.loading = false;
        fetched
    }

    /// Validates the form, submits it, and resets it on success.
    pub fn submit_form(&mut self) -> AddOutcome {
        let input = match self.form.submission() {
            Ok(input) => input,
            Err(errors) => return AddOutcome::Invalid(errors),
        };

        let outcome = self.add_contact(&input);
        match &outcome {
            AddOutcome::Added(_) => self.form.reset(),
            AddOutcome::Invalid(errors) => self.form.set_errors(errors.clone()),
            AddOutcome::Failed => {}
        }
        outcome
    }

    /// Adds a contact and jumps back to page 1, where it now appears.
    pub fn add_contact(&mut self, input: &ContactInput) -> AddOutcome {
        self.loading = true;
        self.clear_messages();

        let outcome = match self.gateway.add_contact(input) {
            Ok(contact) => {
                self.show_success(ADDED_MESSAGE);
                self.fetch_contacts(1);
                AddOutcome::Added(contact)
            }
            Err(GatewayError::Validation(errors)) => {
                error!("event=contact_add module=view status=error error_code=validation errors={errors}");
                AddOutcome::Invalid(errors)
            }
            Err(err) => {
                error!("event=contact_add module=view status=error error={err}");
                self.error = Some(err.to_string());
                AddOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    /// Deletes a contact after `confirm` approves it.
    ///
    /// `confirm` is the interactive prompt; returning `false` aborts before any
    /// request is issued.
    pub fn delete_contact(
        &mut self,
        id: ContactId,
        confirm: impl FnOnce(ContactId) -> bool,
    ) -> DeleteOutcome {
        if !confirm(id) {
            return DeleteOutcome::Cancelled;
        }

        self.loading = true;
        self.clear_messages();

        let outcome = match self.gateway.delete_contact(id) {
            Ok(()) => {
                self.show_success(DELETED_MESSAGE);
                let page = if self.contacts.len() == 1 && self.current_page > 1 {
                    self.current_page - 1
                } else {
                    self.current_page
                };
                self.fetch_contacts(page);
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!("event=contact_delete module=view status=error id={id} error={err}");
                self.error = Some(err.to_string());
                DeleteOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    /// Navigates to `page`; out-of-range or same-page requests are ignored.
    pub fn change_page(&mut self, page: u32) -> bool {
        if page < 1 || u64::from(page) > self.total_pages || page == self.current_page {
            return false;
        }
        self.fetch_contacts(page)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(page) => self.change_page(page),
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(self.current_page.saturating_add(1))
    }

    /// Dismisses both banners.
    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// Drops the success banner once its display time has passed.
    pub fn expire_messages(&mut self, now: Instant) {
        if self
            .success
            .as_ref()
            .is_some_and(|banner| now >= banner.expires_at)
        {
            self.success = None;
        }
    }

    fn show_success(&mut self, text: &str) {
        self.success = Some(SuccessBanner {
            text: text.to_string(),
            expires_at: Instant::now() + SUCCESS_MESSAGE_TTL,
        });
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn total_contacts(&self) -> u64 {
        self.total_contacts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_ref().map(|banner| banner.text.as_str())
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    /// Section header, e.g. `Contacts (12)`.
    pub fn header_label(&self) -> String {
        format!("Contacts ({})", self.total_contacts)
    }

    pub fn is_empty_state(&self) -> bool {
        !self.loading && self.contacts.is_empty()
    }

    pub fn shows_pagination(&self) -> bool {
        !self.loading && !self.contacts.is_empty() && self.total_pages > 1
    }

    /// e.g. `Page 2 of 5`.
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }

    pub fn page_items(&self) -> Vec<PageItem> {
        let total = u32::try_from(self.total_pages).unwrap_or(u32::MAX);
        page_numbers(self.current_page, total)
    }

    pub fn can_go_previous(&self) -> bool {
        !self.loading && self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        !self.loading && u64::from(self.current_page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::ContactBookView;
    use crate::model::contact::{Contact, ContactId};
    use crate::model::page::{total_pages, ContactPage, PageRequest};
    use crate::validation::ContactInput;
    use crate::view::gateway::{ContactsGateway, GatewayError};

    struct FixedGateway {
        total: u64,
    }

    impl ContactsGateway for FixedGateway {
        fn list_contacts(&self, request: PageRequest) -> Result<ContactPage, GatewayError> {
            let contacts = (0..u64::from(request.limit()).min(self.total))
                .map(|index| Contact {
                    id: index as ContactId + 1,
                    name: format!("Contact {index}"),
                    email: format!("contact{index}@example.com"),
                    phone: "5551234567".to_string(),
                    created_at: "2024-01-01 00:00:00".to_string(),
                })
                .collect();
            Ok(ContactPage {
                contacts,
                total: self.total,
                total_pages: total_pages(self.total, request.limit()),
                current_page: request.page(),
            })
        }

        fn add_contact(&self, _input: &ContactInput) -> Result<Contact, GatewayError> {
            Err(GatewayError::Transport("read-only".to_string()))
        }

        fn delete_contact(&self, _id: ContactId) -> Result<(), GatewayError> {
            Err(GatewayError::Transport("read-only".to_string()))
        }
    }

    #[test]
    fn pagination_bar_hides_while_loading() {
        let mut view = ContactBookView::new(FixedGateway { total: 25 });
        assert!(view.load());
        assert!(view.shows_pagination());

        view.loading = true;
        assert!(!view.shows_pagination());
        assert!(!view.can_go_next());
    }

    #[test]
    fn single_page_hides_pagination_bar() {
        let mut view = ContactBookView::new(FixedGateway { total: 4 });
        assert!(view.load());
        assert!(!view.shows_pagination());
    }
}
