//! Drives a [`ListView`] from commands, in-flight fetches, and the poll timer.
//!
//! The driver is single-threaded: fetch futures are `!Send` and are polled
//! from the same task as the command loop. Fetches run concurrently with new
//! commands, so a param change can overtake a slow page; the view's sequence
//! check throws the slow page away.

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use hubview_types::{ParamPatch, TaskMarker};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::fetcher::{ListSource, PendingFetch};
use crate::liveness::ViewLiveness;
use crate::location::Location;
use crate::state::FetchMode;
use crate::view::{Completion, ListSnapshot, ListView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    UpdateParams(ParamPatch),
    Refresh,
    Close,
}

/// Caller's side of a running [`ListSession`].
#[derive(Debug, Clone)]
pub struct SessionHandle<T> {
    commands: mpsc::UnboundedSender<ListCommand>,
    snapshots: watch::Receiver<ListSnapshot<T>>,
    liveness: ViewLiveness,
}

impl<T: Clone> SessionHandle<T> {
    /// Returns false if the session has already stopped.
    pub fn update_params(&self, patch: ParamPatch) -> bool {
        self.commands.send(ListCommand::UpdateParams(patch)).is_ok()
    }

    pub fn refresh(&self) -> bool {
        self.commands.send(ListCommand::Refresh).is_ok()
    }

    /// Tear the view down immediately; the session loop exits on its next turn.
    pub fn close(&self) {
        self.liveness.close();
        let _ = self.commands.send(ListCommand::Close);
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.snapshots.clone()
    }
}

pub struct ListSession<S: ListSource, L> {
    view: ListView<S, L>,
    commands: mpsc::UnboundedReceiver<ListCommand>,
    snapshots: watch::Sender<ListSnapshot<S::Item>>,
}

impl<S, L> ListSession<S, L>
where
    S: ListSource,
    S::Item: TaskMarker + Clone + 'static,
    L: Location,
{
    pub fn new(view: ListView<S, L>) -> (Self, SessionHandle<S::Item>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(view.snapshot());
        let handle = SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            liveness: view.liveness().clone(),
        };
        let session = Self {
            view,
            commands: command_rx,
            snapshots: snapshot_tx,
        };
        (session, handle)
    }

    /// Run until closed or every handle is dropped. Returns the closed view.
    pub async fn run(mut self) -> ListView<S, L> {
        let mut in_flight: FuturesUnordered<PendingFetch<S::Item>> = FuturesUnordered::new();
        if let Some(fetch) = self.view.issue(FetchMode::Loud) {
            in_flight.push(fetch);
        }
        self.publish();

        while !self.view.is_closed() {
            let deadline = self.view.poll_deadline();
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ListCommand::UpdateParams(patch)) => {
                        self.view.stage_params(&patch);
                        in_flight.extend(self.view.issue(FetchMode::Loud));
                    }
                    Some(ListCommand::Refresh) => {
                        in_flight.extend(self.view.issue(FetchMode::Loud));
                    }
                    Some(ListCommand::Close) | None => break,
                },
                Some(done) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Some(done) = done
                        && let Completion::Failed(err) = self.view.complete(done, Instant::now())
                    {
                        tracing::debug!(error = %err, "session fetch failed");
                    }
                }
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    in_flight.extend(self.view.fire_poll(Instant::now()));
                }
            }
            self.publish();
        }

        self.view.close();
        self.publish();
        self.view
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.view.snapshot());
    }
}
