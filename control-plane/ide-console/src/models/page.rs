//! Search and pagination over already-loaded collections.
//!
//! Items are ordered by `(created_at, id)` before slicing so that pages stay
//! stable regardless of how the backing store iterates.

use chrono::{DateTime, Utc};
use ide_models::{CloudConnector, Runner, Searchable, VmImage};
use serde::{Deserialize, Serialize};

use crate::config::MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(
        page: Option<usize>,
        per_page: Option<usize>,
        default_size: usize,
    ) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Ordering key used for listings.
pub trait Listed {
    fn created_at(&self) -> DateTime<Utc>;
    fn list_id(&self) -> &str;
}

impl Listed for CloudConnector {
    fn created_at(&self) -> DateTime<Utc> {
        self.added
    }
    fn list_id(&self) -> &str {
        &self.id
    }
}

impl Listed for VmImage {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn list_id(&self) -> &str {
        &self.identifier
    }
}

impl Listed for Runner {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn list_id(&self) -> &str {
        &self.id
    }
}

/// Filters `items` by the free-text term, sorts them and cuts one page.
pub fn search_page<T>(
    items: Vec<T>,
    term: Option<&str>,
    request: PageRequest,
) -> Page<T>
where
    T: Searchable + Listed,
{
    let mut matched: Vec<T> = match term {
        Some(term) => items
            .into_iter()
            .filter(|item| item.matches_term(term))
            .collect(),
        None => items,
    };
    matched.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.list_id().cmp(b.list_id()))
    });
    paginate(matched, request)
}

pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(request.per_page);
    let start = (request.page - 1).saturating_mul(request.per_page);
    let items = items
        .into_iter()
        .skip(start)
        .take(request.per_page)
        .collect();

    Page {
        items,
        page: request.page,
        per_page: request.per_page,
        total_items,
        total_pages,
    }
}
