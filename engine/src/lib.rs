//! View orchestration for hubview: list state, polling, and the resource views.
//!
//! # List synchronization
//!
//! Every paginated view runs the same loop:
//!
//! 1. [`ParamStore`] holds page/sort/filter state and mirrors it into a
//!    [`Location`].
//! 2. A param change issues a fetch through a [`ListSource`]. The result
//!    replaces the page in [`ListState`].
//! 3. [`PollSupervisor`] looks at the items. If any carries a running or
//!    waiting task it arms one deadline; when that passes, one silent fetch
//!    goes out and the cycle repeats until nothing is pending.
//!
//! Fetches are numbered. Only the newest may be applied, so a slow response
//! that lands after a newer request is dropped. Closing a view flips its
//! [`ViewLiveness`], aborts outstanding fetches, and cancels the deadline.
//!
//! Nothing here is `Send`: views live on one task and suspend only at
//! network calls.

mod alerts;
mod error;
mod fetcher;
mod liveness;
pub mod lists;
mod location;
mod param_store;
mod poll;
mod registry;
mod remote_form;
mod roles;
mod session;
mod state;
mod user_detail;
mod view;

pub use alerts::AlertChannel;
pub use error::ViewError;
pub use fetcher::{FetchCompletion, ListSource, PendingFetch};
pub use liveness::ViewLiveness;
pub use location::{Location, MemoryLocation};
pub use param_store::ParamStore;
pub use poll::{PollDecision, PollState, PollSupervisor};
pub use registry::{ActionItem, RegistryListView, RowAction, SaveOutcome};
pub use remote_form::RemoteForm;
pub use roles::{ASSIGNABLE_ROLE_PREFIX, RolePicker, RoleRow};
pub use session::{ListCommand, ListSession, SessionHandle};
pub use state::{Applied, EmptyState, FetchMode, ListState, RequestSeq};
pub use user_detail::{UserDetailState, UserDetailView};
pub use view::{Completion, ListSnapshot, ListSpec, ListView};

pub use hubview_client;
pub use hubview_types;

#[cfg(test)]
mod tests;
