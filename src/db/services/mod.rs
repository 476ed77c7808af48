//! Data access for the poster service, one module per area.
//!
//! Functions take a `&DbConn` and return sea-orm models; tenant scoping is
//! applied here so handlers cannot forget it.

pub mod audit_service;
pub mod device_service;
pub mod location_service;
pub mod organisation_service;
pub mod poster_service;
pub mod sync_service;
pub mod template_service;
pub mod user_service;

use serde::Serialize;

/// Rows per page for every paginated listing.
pub const PAGE_SIZE: u64 = 20;

/// One page of a listing. `page` is 1-based.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: u64,
    pub page: u64,
    pub num_pages: u64,
}

impl<T> Page<T> {
    /// Slices an already loaded, already ordered list.
    pub fn from_vec(all: Vec<T>, page: u64) -> Self {
        let count = all.len() as u64;
        let num_pages = count.div_ceil(PAGE_SIZE).max(1);
        let page = page.clamp(1, num_pages);
        let items = all
            .into_iter()
            .skip(((page - 1) * PAGE_SIZE) as usize)
            .take(PAGE_SIZE as usize)
            .collect();
        Page { items, count, page, num_pages }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            page: self.page,
            num_pages: self.num_pages,
        }
    }
}
