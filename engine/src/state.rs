//! List view state and its transitions.

use hubview_client::ApiError;
use hubview_types::{ListPage, ParamState, TaskMarker};

/// Issue order of a fetch. Only the newest issued fetch may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// User-initiated: shows the loading indicator.
    Loud,
    /// Background refresh: never touches the loading indicator.
    Silent,
}

/// Which empty-state the view should render, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing exists yet.
    NoData,
    /// Filters exclude everything.
    NoFilterResults,
    Items,
}

/// Result of handing a completion to [`ListState::complete`].
#[derive(Debug)]
pub enum Applied {
    Page { any_pending: bool },
    Failed(ApiError),
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
}

/// Items, loading flag, and last error of one list view.
#[derive(Debug)]
pub struct ListState<T> {
    page: ListPage<T>,
    loading: bool,
    last_error: Option<String>,
    latest: Option<RequestSeq>,
    latest_settled: bool,
    /// Newest loud fetch still owed a `loading = false`.
    loading_seq: Option<RequestSeq>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            page: ListPage::default(),
            loading: false,
            last_error: None,
            latest: None,
            latest_settled: true,
            loading_seq: None,
        }
    }
}

impl<T> ListState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> &ListPage<T> {
        &self.page
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.page.items
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.page.total_count
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while the newest issued fetch has not completed.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        !self.latest_settled
    }

    #[must_use]
    pub fn latest(&self) -> Option<RequestSeq> {
        self.latest
    }

    /// Register a new fetch and return its sequence number.
    pub fn begin(&mut self, mode: FetchMode) -> RequestSeq {
        let seq = self.latest.map_or(RequestSeq::first(), RequestSeq::next);
        self.latest = Some(seq);
        self.latest_settled = false;
        if mode == FetchMode::Loud {
            self.loading = true;
            self.loading_seq = Some(seq);
        }
        seq
    }

    /// Apply the result of fetch `seq` if it is still the newest.
    ///
    /// A silent fetch that supersedes an outstanding loud one clears the
    /// loading flag it inherited; otherwise silent results leave it alone.
    pub fn complete(&mut self, seq: RequestSeq, result: Result<ListPage<T>, ApiError>) -> Applied
    where
        T: TaskMarker,
    {
        if self.latest != Some(seq) {
            return Applied::Stale;
        }
        self.latest_settled = true;
        if self.loading_seq.is_some_and(|loud| seq >= loud) {
            self.loading = false;
            self.loading_seq = None;
        }

        match result {
            Ok(page) => {
                let any_pending = page.has_pending();
                self.page = page;
                self.last_error = None;
                Applied::Page { any_pending }
            }
            Err(err) => {
                self.last_error = Some(err.describe());
                Applied::Failed(err)
            }
        }
    }

    /// Empty-state classification against the active params.
    #[must_use]
    pub fn empty_state(&self, params: &ParamState, filter_keys: &[&str]) -> EmptyState {
        if !self.page.items.is_empty() {
            EmptyState::Items
        } else if params.filter_is_set(filter_keys) {
            EmptyState::NoFilterResults
        } else {
            EmptyState::NoData
        }
    }
}
