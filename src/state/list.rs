use super::filters::FilterMap;
use crate::api::types::Page;
use crate::api::{ApiError, PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl Pagination {
    pub fn from_count(current_page: u32, total_count: u64) -> Self {
        let pages = total_count.div_ceil(u64::from(PAGE_SIZE)).max(1);
        Self {
            current_page,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
            total_count,
        }
    }

    /// Forces `page` into `1..=total_pages`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages.max(1))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
        }
    }
}

/// What one list fetch has to ask the backend for.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub seq: u64,
    pub page: u32,
    pub filters: FilterMap,
}

/// What the view should draw; exactly one of these at a time.
#[derive(Debug, PartialEq)]
pub enum ListDisplay<'a, T> {
    Loading,
    Error(&'a str),
    Empty,
    Rows(&'a [T]),
}

/// Page/filter bookkeeping and load status for one paginated resource.
///
/// Purely commands and queries: `load` hands back the [`ListRequest`] to send,
/// and the caller reports the outcome through [`ListState::finish`]. Each
/// request carries a sequence number so an older response that arrives late
/// is dropped.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    pagination: Pagination,
    page: u32,
    filters: FilterMap,
    seq: u64,
    issued: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: Pagination::default(),
            page: 1,
            filters: FilterMap::new(),
            seq: 0,
            issued: false,
        }
    }
}

impl<T> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    /// True when `(page, filters)` differs from what was last loaded, i.e. the
    /// view should issue a new `load`.
    pub fn is_stale(&self, page: u32, filters: &FilterMap) -> bool {
        !self.issued || self.page != page || &self.filters != filters
    }

    pub fn load(&mut self, page: u32, filters: &FilterMap) -> ListRequest {
        self.page = page.max(1);
        self.filters = filters.clone();
        self.issue()
    }

    /// Re-sends the stored `(page, filters)` unchanged.
    pub fn refetch(&mut self) -> ListRequest {
        self.issue()
    }

    fn issue(&mut self) -> ListRequest {
        self.seq += 1;
        self.issued = true;
        self.loading = true;
        self.error = None;
        tracing::debug!("List load #{} page={} filters={}", self.seq, self.page, self.filters.len());
        ListRequest {
            seq: self.seq,
            page: self.page,
            filters: self.filters.clone(),
        }
    }

    /// Applies the response to request `seq`. Returns `false` when the
    /// response was superseded by a newer request and ignored.
    pub fn finish(&mut self, seq: u64, result: Result<Page<T>, ApiError>) -> bool {
        if seq != self.seq {
            tracing::debug!("Dropping stale list response #{} (latest #{})", seq, self.seq);
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                // A shrinking count can leave the requested page past the end.
                let pagination = Pagination::from_count(self.page, page.count);
                self.page = pagination.clamp(self.page);
                self.pagination = Pagination {
                    current_page: self.page,
                    ..pagination
                };
                self.items = page.results;
                self.error = None;
            }
            Err(e) => {
                // No stale rows next to an error banner.
                self.items.clear();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Forgets what was loaded so the next `is_stale` check asks for a fresh
    /// `load`. Responses still in flight are dropped when they arrive.
    pub fn invalidate(&mut self) {
        self.seq += 1;
        self.issued = false;
        self.loading = false;
        self.error = None;
        self.items.clear();
        self.pagination = Pagination::default();
        self.page = 1;
        self.filters = FilterMap::new();
    }

    pub fn display(&self) -> ListDisplay<'_, T> {
        if self.loading {
            ListDisplay::Loading
        } else if let Some(err) = &self.error {
            ListDisplay::Error(err)
        } else if self.items.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Rows(&self.items)
        }
    }

    /// Next page number for navigation, clamped to the known page range.
    pub fn next_page(&self) -> u32 {
        self.pagination.clamp(self.page.saturating_add(1))
    }

    pub fn prev_page(&self) -> u32 {
        self.pagination.clamp(self.page.saturating_sub(1))
    }
}
