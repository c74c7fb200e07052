//! Pagination
//!
//! Page numbers are 1-based. A missing page means the first one; a page
//! that is zero, not a number, or past the end falls back to the last page.
//! An empty listing still has one (empty) page.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total: u64,
    pub per_page: u64,
}

impl Paginator {
    pub fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    pub fn num_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw `?page=` value to a valid page number
    pub fn resolve(&self, requested: Option<&str>) -> u64 {
        let last = self.num_pages();
        match requested.map(|raw| raw.trim().parse::<u64>()) {
            None => 1,
            Some(Ok(n)) if (1..=last).contains(&n) => n,
            Some(_) => last,
        }
    }

    pub fn offset(&self, number: u64) -> u64 {
        (number.saturating_sub(1)).saturating_mul(self.per_page)
    }

    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            total: self.total,
        }
    }
}

/// One page of results with its position
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}
