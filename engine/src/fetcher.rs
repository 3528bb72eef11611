//! One page at a time from a remote collection.

use std::rc::{Rc, Weak};

use futures_util::FutureExt;
use futures_util::future::{AbortHandle, Abortable, LocalBoxFuture};
use hubview_client::{ApiError, Collection, Resource};
use hubview_types::{ListPage, ParamState};

use crate::state::{FetchMode, RequestSeq};

/// A paginated collection the list view can read from.
pub trait ListSource {
    type Item;

    /// Request the page described by `params`.
    ///
    /// The future owns everything it needs so it can outlive the borrow.
    fn list(&self, params: ParamState)
    -> LocalBoxFuture<'static, Result<ListPage<Self::Item>, ApiError>>;
}

impl<C> ListSource for Resource<C>
where
    C: Collection + 'static,
    C::Item: 'static,
{
    type Item = C::Item;

    fn list(
        &self,
        params: ParamState,
    ) -> LocalBoxFuture<'static, Result<ListPage<Self::Item>, ApiError>> {
        let resource = self.clone();
        async move { resource.fetch_page(&params).await }.boxed_local()
    }
}

/// A resolved fetch, tagged with the sequence it was issued under.
#[derive(Debug)]
pub struct FetchCompletion<T> {
    pub seq: RequestSeq,
    pub mode: FetchMode,
    pub result: Result<ListPage<T>, ApiError>,
}

/// An issued fetch. Resolves to `None` when the view aborted it.
pub type PendingFetch<T> = LocalBoxFuture<'static, Option<FetchCompletion<T>>>;

/// The view's side of an issued fetch.
#[derive(Debug)]
pub(crate) struct FetchHandle {
    pub(crate) seq: RequestSeq,
    abort_handle: AbortHandle,
    // Upgrades only while the fetch future exists.
    alive: Weak<()>,
}

impl FetchHandle {
    /// False once the fetch future finished or was dropped.
    pub(crate) fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }

    pub(crate) fn abort(&self) {
        self.abort_handle.abort();
    }
}

pub(crate) fn pending_fetch<T: 'static>(
    request: LocalBoxFuture<'static, Result<ListPage<T>, ApiError>>,
    seq: RequestSeq,
    mode: FetchMode,
) -> (PendingFetch<T>, FetchHandle) {
    let (abort_handle, abort_registration) = AbortHandle::new_pair();
    let token = Rc::new(());
    let handle = FetchHandle {
        seq,
        abort_handle,
        alive: Rc::downgrade(&token),
    };
    let fetch = async move {
        let _token = token;
        let result = Abortable::new(request, abort_registration).await.ok()?;
        Some(FetchCompletion { seq, mode, result })
    }
    .boxed_local();
    (fetch, handle)
}
