//! Page-number pagination primitives shared by CaptionBoard endpoints.
//!
//! Endpoints paginate with a zero-based page number and a fixed page size.
//! [`PageNumber`] parses untrusted query input defensively, [`PageRequest`]
//! converts a page into SQL offset/limit values, and [`Page`] is the envelope
//! a read model returns alongside its total row count.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Zero-based page index parsed defensively from untrusted input.
///
/// Negative and non-numeric values collapse to page zero rather than
/// erroring; pagination input is navigation state, not a validity contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl PageNumber {
    /// First page.
    pub const ZERO: Self = Self(0);

    /// Construct from an already-validated index.
    #[must_use]
    pub const fn new(page: u32) -> Self {
        Self(page)
    }

    /// Parse an optional raw query value, mapping anything unusable to page
    /// zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::parse_lossy(Some("3")), PageNumber::new(3));
    /// assert_eq!(PageNumber::parse_lossy(Some("-7")), PageNumber::ZERO);
    /// assert_eq!(PageNumber::parse_lossy(Some("banana")), PageNumber::ZERO);
    /// assert_eq!(PageNumber::parse_lossy(None), PageNumber::ZERO);
    /// ```
    #[must_use]
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::ZERO;
        };
        match raw.trim().parse::<i64>() {
            Ok(value) if value <= 0 => Self::ZERO,
            Ok(value) => Self(u32::try_from(value).unwrap_or(u32::MAX)),
            Err(_) => Self::ZERO,
        }
    }

    /// The underlying zero-based index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A page request: page number plus the fixed rows-per-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: PageNumber,
    per_page: NonZeroU32,
}

impl PageRequest {
    /// Build a request for the given page with `per_page` rows per page.
    #[must_use]
    pub const fn new(page: PageNumber, per_page: NonZeroU32) -> Self {
        Self { page, per_page }
    }

    /// Requested page number.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn per_page(&self) -> NonZeroU32 {
        self.per_page
    }

    /// SQL `OFFSET` for this page: `page * per_page`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.get()) * i64::from(self.per_page.get())
    }

    /// SQL `LIMIT` for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page.get())
    }
}

/// Errors raised when assembling a [`Page`] envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// A page holds more rows than the request allowed.
    #[error("page holds {actual} rows but at most {limit} were requested")]
    Overfull { limit: u32, actual: usize },
}

/// One page of results plus the totals navigation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    per_page: u32,
    total_items: u64,
}

impl<T> Page<T> {
    /// Assemble a page, enforcing that the result respects the row limit.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Overfull`] when `items` exceeds the request's
    /// per-page limit.
    pub fn new(request: PageRequest, items: Vec<T>, total_items: u64) -> Result<Self, PageError> {
        let limit = request.per_page.get();
        if items.len() > limit as usize {
            return Err(PageError::Overfull {
                limit,
                actual: items.len(),
            });
        }
        Ok(Self {
            items,
            page: request.page.get(),
            per_page: limit,
            total_items,
        })
    }

    /// An empty page for the given request, keeping the total so navigation
    /// still renders when a read degrades or a page lies past the end.
    #[must_use]
    pub fn empty(request: PageRequest, total_items: u64) -> Self {
        Self {
            items: Vec::new(),
            page: request.page.get(),
            per_page: request.per_page.get(),
            total_items,
        }
    }

    /// Rows on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows-per-page limit the page was assembled under.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Exact total row count across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// `ceil(total_items / per_page)`; zero when there are no rows.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.per_page as u64)
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Whether a further page exists beyond this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        (u64::from(self.page) + 1) * u64::from(self.per_page) < self.total_items
    }

    /// Consume the page, yielding its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Map the page's items, keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}
