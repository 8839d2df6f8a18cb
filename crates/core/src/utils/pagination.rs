//! Fixed-size pagination over an already ordered result set.

use serde::Serialize;

use crate::errors::{Error, Result};

/// Position of a page within its result set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// A single empty page, used when no query was executed.
    pub fn empty(per_page: usize) -> Self {
        Page {
            items: Vec::new(),
            info: PageInfo {
                number: 1,
                num_pages: 1,
                per_page,
                count: 0,
                has_next: false,
                has_previous: false,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        if self.items.is_empty() {
            1
        } else {
            self.items.len().div_ceil(self.per_page)
        }
    }

    /// Strict lookup: a page number that does not parse or is out of range is not found.
    pub fn page(self, raw: Option<&str>) -> Result<Page<T>> {
        let number = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => self.num_pages(),
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| Error::NotFound(format!("Invalid page ({value})")))?,
        };
        if number == 0 || number > self.num_pages() {
            return Err(Error::NotFound(format!("Invalid page ({number})")));
        }
        Ok(self.build(number))
    }

    /// Tolerant lookup: garbage means the first page, too large means the last.
    pub fn get_page(self, raw: Option<&str>) -> Page<T> {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim) {
            Some("last") => num_pages,
            Some(value) => match value.parse::<usize>() {
                Ok(0) | Err(_) => 1,
                Ok(n) if n > num_pages => num_pages,
                Ok(n) => n,
            },
            None => 1,
        };
        self.build(number)
    }

    fn build(self, number: usize) -> Page<T> {
        let num_pages = self.num_pages();
        let count = self.items.len();
        let start = (number - 1) * self.per_page;
        let items = self
            .items
            .into_iter()
            .skip(start)
            .take(self.per_page)
            .collect();
        Page {
            items,
            info: PageInfo {
                number,
                num_pages,
                per_page: self.per_page,
                count,
                has_next: number < num_pages,
                has_previous: number > 1,
            },
        }
    }
}
