//! Pagination request/response types.
//!
//! # Invariants
//! - `PageRequest::page >= 1`.
//! - `PageRequest::limit` is within `1..=MAX_PAGE_SIZE`.
//! - `ContactPage::total_pages == ceil(total / limit)`.

use crate::model::contact::Contact;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Rejected pagination input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    InvalidPage(i64),
    InvalidLimit(i64),
}

impl Display for PageRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPage(page) => write!(f, "page must be >= 1, got {page}"),
            Self::InvalidLimit(limit) => {
                write!(f, "limit must be within 1..={MAX_PAGE_SIZE}, got {limit}")
            }
        }
    }
}

impl Error for PageRequestError {}

/// Validated page coordinates for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validates raw page/limit values.
    pub fn new(page: i64, limit: i64) -> Result<Self, PageRequestError> {
        let page = u32::try_from(page)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(PageRequestError::InvalidPage(page))?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|value| (1..=MAX_PAGE_SIZE).contains(value))
            .ok_or(PageRequestError::InvalidLimit(limit))?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of contacts plus totals, in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    /// Sorted by `created_at DESC, id DESC`.
    pub contacts: Vec<Contact>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}
