//! Background task markers carried by list items.
//!
//! Task lifecycle is owned by the server. The console only reads the state to
//! decide whether a list needs another look.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Waiting,
    Skipped,
    Running,
    Completed,
    Failed,
    Canceled,
    Canceling,
    /// Any state this build does not know about. Never pending.
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// `running` and `waiting` mean the item is still being processed.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Running | Self::Waiting)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Skipped => "skipped",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items that may carry a pending-task marker.
pub trait TaskMarker {
    fn task_state(&self) -> Option<TaskState>;

    fn is_pending(&self) -> bool {
        self.task_state().is_some_and(TaskState::is_pending)
    }
}

/// The most recent sync task reported for a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl SyncTask {
    #[must_use]
    pub fn new(state: TaskState) -> Self {
        Self {
            task_id: None,
            state,
            started_at: None,
            finished_at: None,
            error: None,
        }
    }
}

/// Body returned when the server starts a task (`{"task": "<href>"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub task: String,
}

impl TaskRef {
    /// Last non-empty path segment of the task href.
    #[must_use]
    pub fn task_id(&self) -> &str {
        self.task
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.task)
    }
}
