use serde::{Deserialize, Serialize};

use crate::client::QueryParam;
use crate::models::Meta;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Arguments of one page fetch; also the deferred `next` of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.unwrap_or(defaults.page).max(1),
            limit: limit.unwrap_or(defaults.limit).max(1),
        }
    }

    pub fn query(&self) -> [QueryParam<'static>; 2] {
        [("page", Some(self.page.to_string())), ("limit", Some(self.limit.to_string()))]
    }

    /// The following page, or `None` once `total <= page * limit`
    pub fn next_after(meta: &Meta) -> Option<PageRequest> {
        let seen = u64::from(meta.page) * u64::from(meta.limit);
        if u64::from(meta.total) <= seen {
            None
        } else {
            Some(PageRequest {
                page: meta.page + 1,
                limit: meta.limit,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageRequest>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}
