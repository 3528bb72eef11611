//! The list view: param store, fetcher, and poll supervisor wired together.
//!
//! A [`ListView`] is a plain state machine. It hands out [`PendingFetch`]
//! futures and takes their [`FetchCompletion`]s back through
//! [`ListView::complete`], so the caller decides how fetches are driven: one at
//! a time with [`ListView::refresh`], or concurrently from a
//! [`ListSession`](crate::ListSession).

use hubview_client::ApiError;
use hubview_types::{
    ListPage, ListSettings, ParamDefaults, ParamPatch, ParamState, SortKey, TaskMarker,
};
use tokio::time::Instant;

use crate::error::ViewError;
use crate::fetcher::{FetchCompletion, FetchHandle, ListSource, PendingFetch, pending_fetch};
use crate::liveness::ViewLiveness;
use crate::location::Location;
use crate::param_store::ParamStore;
use crate::poll::PollSupervisor;
use crate::state::{Applied, EmptyState, FetchMode, ListState, RequestSeq};

/// Static description of one list: which query keys it understands.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    /// Keys kept when parsing the location.
    pub recognized: &'static [&'static str],
    /// Keys that count as an active filter for empty-state purposes.
    pub filter_keys: &'static [&'static str],
    pub default_sort: Option<&'static str>,
}

impl ListSpec {
    fn defaults(&self, settings: &ListSettings) -> ParamDefaults {
        ParamDefaults {
            page_size: settings.default_page_size(),
            sort: self.default_sort.and_then(SortKey::parse),
        }
    }
}

/// What happened to a completion handed back to the view.
#[derive(Debug)]
pub enum Completion {
    Applied,
    Failed(ApiError),
    Stale,
    Closed,
}

/// Render-ready copy of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    pub params: ParamState,
    pub items: Vec<T>,
    pub total_count: u64,
    pub loading: bool,
    pub last_error: Option<String>,
    pub polling: bool,
    pub empty: EmptyState,
    pub closed: bool,
}

impl<T> ListSnapshot<T> {
    #[must_use]
    pub fn has_pending(&self) -> bool
    where
        T: TaskMarker,
    {
        self.items.iter().any(TaskMarker::is_pending)
    }
}

pub struct ListView<S: ListSource, L> {
    source: S,
    params: ParamStore<L>,
    fixed: ParamState,
    filter_keys: &'static [&'static str],
    state: ListState<S::Item>,
    poll: PollSupervisor,
    liveness: ViewLiveness,
    in_flight: Vec<FetchHandle>,
}

impl<S, L> ListView<S, L>
where
    S: ListSource,
    S::Item: TaskMarker + 'static,
    L: Location,
{
    pub fn new(source: S, location: L, spec: &ListSpec, settings: &ListSettings) -> Self {
        Self {
            source,
            params: ParamStore::new(location, spec.recognized, spec.defaults(settings)),
            fixed: ParamState::new(),
            filter_keys: spec.filter_keys,
            state: ListState::new(),
            poll: PollSupervisor::new(settings.poll_interval()),
            liveness: ViewLiveness::new(),
            in_flight: Vec::new(),
        }
    }

    /// Params sent with every request but never written to the location.
    ///
    /// Keys in the view's own params take precedence.
    pub fn with_fixed_filter(mut self, fixed: ParamState) -> Self {
        self.fixed = fixed;
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn params(&self) -> &ParamState {
        self.params.state()
    }

    #[must_use]
    pub fn location(&self) -> &L {
        self.params.location()
    }

    #[must_use]
    pub fn state(&self) -> &ListState<S::Item> {
        &self.state
    }

    #[must_use]
    pub fn page(&self) -> &ListPage<S::Item> {
        self.state.page()
    }

    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        self.state.items()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    #[must_use]
    pub fn poll(&self) -> &PollSupervisor {
        &self.poll
    }

    #[must_use]
    pub fn liveness(&self) -> &ViewLiveness {
        &self.liveness
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.liveness.is_alive()
    }

    /// Fetches issued and still outstanding.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|handle| handle.is_live()).count()
    }

    #[must_use]
    pub fn empty_state(&self) -> EmptyState {
        self.state.empty_state(self.params.state(), self.filter_keys)
    }

    /// The query actually sent: view params over the fixed filter.
    #[must_use]
    pub fn request_params(&self) -> ParamState {
        self.params.state().merged_over(&self.fixed)
    }

    /// Start a fetch for the current params. `None` once the view is closed.
    pub fn issue(&mut self, mode: FetchMode) -> Option<PendingFetch<S::Item>> {
        self.start(mode).map(|(_, fetch)| fetch)
    }

    fn start(&mut self, mode: FetchMode) -> Option<(RequestSeq, PendingFetch<S::Item>)> {
        if self.is_closed() {
            return None;
        }
        let params = self.request_params();
        let seq = self.state.begin(mode);
        tracing::debug!(%seq, ?mode, query = %params.serialize(), "fetching list page");
        // Callers may drop a fetch without completing it.
        self.in_flight.retain(FetchHandle::is_live);
        let (fetch, handle) = pending_fetch(self.source.list(params), seq, mode);
        self.in_flight.push(handle);
        Some((seq, fetch))
    }

    /// Apply a finished fetch and let the poll supervisor re-evaluate.
    pub fn complete(&mut self, completion: FetchCompletion<S::Item>, now: Instant) -> Completion {
        if self.is_closed() {
            return Completion::Closed;
        }
        let FetchCompletion { seq, mode, result } = completion;
        self.in_flight.retain(|handle| handle.seq != seq);

        match self.state.complete(seq, result) {
            Applied::Stale => {
                tracing::debug!(%seq, ?mode, "discarding stale list response");
                Completion::Stale
            }
            Applied::Page { any_pending } => {
                self.poll.observe(any_pending, now);
                Completion::Applied
            }
            Applied::Failed(err) => {
                tracing::warn!(%seq, ?mode, error = %err, "list fetch failed");
                self.poll.observe_failure();
                Completion::Failed(err)
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn refresh(&mut self, mode: FetchMode) -> Result<(), ViewError> {
        let fetch = self.issue(mode).ok_or(ViewError::Closed)?;
        let completion = fetch.await.ok_or(ViewError::Closed)?;
        match self.complete(completion, Instant::now()) {
            Completion::Applied | Completion::Stale => Ok(()),
            Completion::Failed(err) => Err(err.into()),
            Completion::Closed => Err(ViewError::Closed),
        }
    }

    /// Update params without fetching. Returns the new state.
    pub fn stage_params(&mut self, patch: &ParamPatch) -> ParamState {
        self.params.update(patch).clone()
    }

    /// Update params, then fetch the page they describe.
    pub async fn set_params(&mut self, patch: &ParamPatch) -> Result<(), ViewError> {
        if self.is_closed() {
            return Err(ViewError::Closed);
        }
        self.stage_params(patch);
        self.refresh(FetchMode::Loud).await
    }

    /// Re-read params after the location changed externally, then fetch.
    pub async fn reload_location(&mut self) -> Result<(), ViewError> {
        self.params.reload();
        self.refresh(FetchMode::Loud).await
    }

    #[must_use]
    pub fn poll_deadline(&self) -> Option<Instant> {
        if self.is_closed() {
            return None;
        }
        self.poll.deadline()
    }

    /// Issue the poll fetch if its deadline has passed.
    ///
    /// When the newest fetch is still outstanding the poll is dropped: that
    /// fetch's result re-evaluates pending items on its own.
    pub fn fire_poll(&mut self, now: Instant) -> Option<PendingFetch<S::Item>> {
        if self.is_closed() || !self.poll.is_due(now) {
            return None;
        }
        if self.state.is_fetching() {
            tracing::debug!("poll deadline reached during a fetch, deferring to its result");
            self.poll.cancel();
            return None;
        }
        let (seq, fetch) = self.start(FetchMode::Silent)?;
        self.poll.mark_in_flight(seq);
        Some(fetch)
    }

    /// Wait for the poll deadline, run the silent fetch, and apply it.
    ///
    /// Returns `None` when nothing was scheduled or the poll was dropped.
    pub async fn run_poll(&mut self) -> Option<Completion> {
        let due = self.poll_deadline()?;
        tokio::time::sleep_until(due).await;
        let fetch = self.fire_poll(Instant::now())?;
        let completion = fetch.await?;
        Some(self.complete(completion, Instant::now()))
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<S::Item>
    where
        S::Item: Clone,
    {
        ListSnapshot {
            params: self.params.state().clone(),
            items: self.state.items().to_vec(),
            total_count: self.state.total_count(),
            loading: self.state.is_loading(),
            last_error: self.state.last_error().map(str::to_string),
            polling: self.poll.is_active(),
            empty: self.empty_state(),
            closed: self.is_closed(),
        }
    }
}

impl<S: ListSource, L> ListView<S, L> {
    /// Tear down: cancel the poll deadline and abort outstanding fetches.
    ///
    /// Later completions are ignored.
    pub fn close(&mut self) {
        if self.liveness.is_alive() {
            tracing::debug!(in_flight = self.in_flight.len(), "closing list view");
        }
        self.liveness.close();
        self.poll.cancel();
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

impl<S: ListSource, L> Drop for ListView<S, L> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S: ListSource, L> std::fmt::Debug for ListView<S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("params", self.params.state())
            .field("total_count", &self.state.total_count())
            .field("loading", &self.state.is_loading())
            .field("poll", &self.poll.state())
            .field("alive", &self.liveness.is_alive())
            .finish_non_exhaustive()
    }
}
