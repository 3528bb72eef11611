//! Scenario tests for list views, driven by a scripted source on paused time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use hubview_client::{ApiError, StatusCode};
use hubview_types::{ListPage, ListSettings, ParamPatch, ParamState, TaskMarker, TaskState};
use tokio::time::Instant;
use crate::location::Location;

use crate::{
    Completion, EmptyState, FetchMode, ListSession, ListSource, ListSpec, ListView,
    MemoryLocation, PollState,
};

const POLL: Duration = Duration::from_millis(5000);

const SPEC: ListSpec = ListSpec {
    recognized: &["page", "page_size", "sort", "name__icontains"],
    filter_keys: &["name__icontains"],
    default_sort: Some("name"),
};

#[derive(Debug, Clone, PartialEq)]
struct Remote {
    name: &'static str,
    state: Option<TaskState>,
}

impl TaskMarker for Remote {
    fn task_state(&self) -> Option<TaskState> {
        self.state
    }
}

fn remote(name: &'static str, state: Option<TaskState>) -> Remote {
    Remote { name, state }
}

type Response = (Duration, Result<ListPage<Remote>, ApiError>);

/// Replays canned responses and records every query it was asked for.
#[derive(Clone, Default)]
struct ScriptedSource {
    responses: Rc<RefCell<VecDeque<Response>>>,
    requests: Rc<RefCell<Vec<ParamState>>>,
}

impl ScriptedSource {
    fn new() -> Self {
        Self::default()
    }

    fn respond(&self, items: Vec<Remote>) -> &Self {
        self.respond_after(Duration::ZERO, items)
    }

    fn respond_after(&self, delay: Duration, items: Vec<Remote>) -> &Self {
        let count = items.len() as u64;
        self.responses
            .borrow_mut()
            .push_back((delay, Ok(ListPage::new(items, count))));
        self
    }

    fn fail(&self, err: ApiError) -> &Self {
        self.responses
            .borrow_mut()
            .push_back((Duration::ZERO, Err(err)));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn last_request(&self) -> ParamState {
        self.requests.borrow().last().cloned().unwrap_or_default()
    }
}

impl ListSource for ScriptedSource {
    type Item = Remote;

    fn list(
        &self,
        params: ParamState,
    ) -> LocalBoxFuture<'static, Result<ListPage<Remote>, ApiError>> {
        self.requests.borrow_mut().push(params);
        let (delay, response) = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(ListPage::default())));
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        }
        .boxed_local()
    }
}

fn settings() -> ListSettings {
    ListSettings::new(10, POLL).unwrap()
}

fn list_view(source: &ScriptedSource) -> ListView<ScriptedSource, MemoryLocation> {
    ListView::new(source.clone(), MemoryLocation::default(), &SPEC, &settings())
}

#[tokio::test(start_paused = true)]
async fn waiting_item_refetches_once_then_stops() {
    let source = ScriptedSource::new();
    source
        .respond(vec![remote("quay", Some(TaskState::Waiting))])
        .respond(vec![remote("quay", Some(TaskState::Completed))]);
    let mut view = list_view(&source);

    view.refresh(FetchMode::Loud).await.unwrap();
    let loaded_at = Instant::now();
    assert!(!view.is_loading());
    assert_eq!(view.poll_deadline(), Some(loaded_at + POLL));
    assert_eq!(source.request_count(), 1);

    // Nothing goes out before the deadline.
    assert!(view.fire_poll(loaded_at + POLL - Duration::from_millis(1)).is_none());

    tokio::time::sleep_until(loaded_at + POLL).await;
    let fetch = view.fire_poll(Instant::now()).expect("poll is due");
    assert!(!view.is_loading(), "silent refresh must not show loading");
    assert!(matches!(view.poll().state(), PollState::InFlight { .. }));
    assert_eq!(view.poll_deadline(), None);

    let completion = fetch.await.expect("not aborted");
    assert!(!view.is_loading());
    assert!(matches!(
        view.complete(completion, Instant::now()),
        Completion::Applied
    ));

    assert_eq!(source.request_count(), 2);
    assert_eq!(view.items()[0].state, Some(TaskState::Completed));
    assert_eq!(view.poll().state(), PollState::Idle);
    assert!(view.run_poll().await.is_none());
    assert_eq!(source.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn run_poll_waits_for_the_full_delay() {
    let source = ScriptedSource::new();
    source
        .respond(vec![remote("a", Some(TaskState::Running))])
        .respond(vec![remote("a", None)]);
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();

    let before = Instant::now();
    let completion = view.run_poll().await;
    assert!(matches!(completion, Some(Completion::Applied)));
    assert!(Instant::now() - before >= POLL);
}

#[tokio::test(start_paused = true)]
async fn many_pending_items_still_poll_once() {
    let source = ScriptedSource::new();
    source
        .respond(vec![
            remote("a", Some(TaskState::Running)),
            remote("b", Some(TaskState::Waiting)),
            remote("c", Some(TaskState::Running)),
        ])
        .respond(vec![remote("a", None)]);
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();

    tokio::time::sleep(POLL).await;
    let first = view.fire_poll(Instant::now());
    let second = view.fire_poll(Instant::now());
    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(source.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn settled_items_never_poll() {
    let source = ScriptedSource::new();
    source.respond(vec![
        remote("a", Some(TaskState::Completed)),
        remote("b", Some(TaskState::Failed)),
        remote("c", None),
    ]);
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();

    assert_eq!(view.poll_deadline(), None);
    tokio::time::sleep(POLL * 3).await;
    assert!(view.fire_poll(Instant::now()).is_none());
    assert_eq!(source.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_response_is_discarded() {
    let source = ScriptedSource::new();
    source
        .respond_after(Duration::from_millis(300), vec![remote("old", None)])
        .respond_after(Duration::from_millis(10), vec![remote("new", None)]);
    let mut view = list_view(&source);

    let slow = view.issue(FetchMode::Loud).unwrap();
    view.stage_params(&ParamPatch::new().set("name__icontains", "new"));
    let fast = view.issue(FetchMode::Loud).unwrap();

    let fast = fast.await.unwrap();
    assert!(matches!(
        view.complete(fast, Instant::now()),
        Completion::Applied
    ));
    assert!(!view.is_loading());

    let slow = slow.await.unwrap();
    assert!(matches!(
        view.complete(slow, Instant::now()),
        Completion::Stale
    ));
    assert_eq!(view.items(), [remote("new", None)]);
    assert!(!view.is_loading());
}

#[tokio::test(start_paused = true)]
async fn close_before_deadline_cancels_poll() {
    let source = ScriptedSource::new();
    source.respond(vec![remote("a", Some(TaskState::Running))]);
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();
    assert!(view.poll_deadline().is_some());

    view.close();
    tokio::time::sleep(POLL * 2).await;

    assert_eq!(view.poll_deadline(), None);
    assert!(view.fire_poll(Instant::now()).is_none());
    assert!(view.run_poll().await.is_none());
    assert!(view.issue(FetchMode::Loud).is_none());
    assert_eq!(source.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_aborts_in_flight_fetch() {
    let source = ScriptedSource::new();
    source.respond_after(Duration::from_secs(1), vec![remote("a", None)]);
    let mut view = list_view(&source);

    let fetch = view.issue(FetchMode::Loud).unwrap();
    view.close();
    assert!(fetch.await.is_none());
    assert!(view.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropped_fetches_are_pruned_on_reissue() {
    let source = ScriptedSource::new();
    source
        .respond_after(Duration::from_secs(1), vec![remote("a", None)])
        .respond(vec![remote("b", None)]);
    let mut view = list_view(&source);

    let abandoned = view.issue(FetchMode::Loud).unwrap();
    assert_eq!(view.in_flight(), 1);
    drop(abandoned);
    assert_eq!(view.in_flight(), 0);

    view.refresh(FetchMode::Loud).await.unwrap();
    assert_eq!(view.in_flight(), 0);
    assert_eq!(view.items()[0].name, "b");
    assert!(!view.is_loading());
}

#[tokio::test(start_paused = true)]
async fn failed_poll_returns_to_idle() {
    let source = ScriptedSource::new();
    source
        .respond(vec![remote("a", Some(TaskState::Running))])
        .fail(ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        });
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();

    let completion = view.run_poll().await;
    assert!(matches!(completion, Some(Completion::Failed(_))));
    assert_eq!(view.poll().state(), PollState::Idle);
    assert_eq!(view.state().last_error(), Some("502 Bad Gateway"));
    // Previous page stays on screen.
    assert_eq!(view.items().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_during_fetch_defers_to_that_fetch() {
    let source = ScriptedSource::new();
    source
        .respond(vec![remote("a", Some(TaskState::Running))])
        .respond_after(POLL * 2, vec![remote("a", Some(TaskState::Running))]);
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();

    let manual = view.issue(FetchMode::Loud).unwrap();
    tokio::time::sleep(POLL).await;
    assert!(view.fire_poll(Instant::now()).is_none());
    assert_eq!(view.poll().state(), PollState::Idle);

    let done = manual.await.unwrap();
    view.complete(done, Instant::now());
    assert_eq!(view.poll_deadline(), Some(Instant::now() + POLL));
    assert_eq!(source.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn fixed_filter_is_sent_but_not_stored() {
    let source = ScriptedSource::new();
    let fixed: ParamState = [("name__startswith", "galaxy.")].into_iter().collect();
    let mut view = list_view(&source).with_fixed_filter(fixed);

    view.set_params(&ParamPatch::new().set("name__icontains", "admin"))
        .await
        .unwrap();

    let sent = source.last_request();
    assert_eq!(
        sent.get("name__startswith").and_then(|v| v.as_text()),
        Some("galaxy.")
    );
    assert_eq!(
        sent.get("name__icontains").and_then(|v| v.as_text()),
        Some("admin")
    );
    assert!(!view.location().query().contains("name__startswith"));
    assert!(!view.params().contains("name__startswith"));
}

#[tokio::test(start_paused = true)]
async fn empty_state_tracks_filters() {
    let source = ScriptedSource::new();
    let mut view = list_view(&source);
    view.refresh(FetchMode::Loud).await.unwrap();
    assert_eq!(view.empty_state(), EmptyState::NoData);

    view.set_params(&ParamPatch::new().set("name__icontains", "zzz"))
        .await
        .unwrap();
    assert_eq!(view.empty_state(), EmptyState::NoFilterResults);
}

#[tokio::test(start_paused = true)]
async fn session_polls_until_settled_and_publishes() {
    let source = ScriptedSource::new();
    source
        .respond(vec![remote("quay", Some(TaskState::Waiting))])
        .respond(vec![remote("quay", Some(TaskState::Running))])
        .respond(vec![remote("quay", Some(TaskState::Completed))]);
    let (session, handle) = ListSession::new(list_view(&source));

    let driver = async {
        let mut snapshots = handle.watch();
        loop {
            snapshots.changed().await.unwrap();
            let snapshot = snapshots.borrow_and_update().clone();
            if !snapshot.items.is_empty() && !snapshot.has_pending() {
                break;
            }
        }
        handle.close();
    };

    let started = Instant::now();
    let (view, ()) = tokio::join!(session.run(), driver);

    assert_eq!(source.request_count(), 3);
    assert!(Instant::now() - started >= POLL * 2);
    assert!(view.is_closed());
    assert!(handle.snapshot().closed);
}

#[tokio::test(start_paused = true)]
async fn session_applies_param_updates() {
    let source = ScriptedSource::new();
    source
        .respond_after(Duration::from_millis(500), vec![remote("slow", None)])
        .respond(vec![remote("filtered", None)]);
    let (session, handle) = ListSession::new(list_view(&source));

    let driver = async {
        // Overtake the slow initial page.
        handle.update_params(ParamPatch::new().set("name__icontains", "filt"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = handle.snapshot();
        handle.close();
        snapshot
    };

    let (_view, snapshot) = tokio::join!(session.run(), driver);
    assert_eq!(snapshot.items, vec![remote("filtered", None)]);
    assert!(!snapshot.loading);
    assert_eq!(
        snapshot.params.get("name__icontains").and_then(|v| v.as_text()),
        Some("filt")
    );
}
