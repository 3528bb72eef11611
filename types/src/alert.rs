//! User-facing alerts raised by mutating actions.

use crate::task::TaskRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertVariant {
    Success,
    Danger,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub variant: AlertVariant,
    pub description: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn new(title: impl Into<String>, variant: AlertVariant) -> Self {
        Self {
            title: title.into(),
            variant,
            description: None,
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(title, AlertVariant::Success)
    }

    #[must_use]
    pub fn danger(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, AlertVariant::Danger).with_description(description)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Alert announcing a server task. The description names the task.
#[must_use]
pub fn task_alert(task: &TaskRef, title: impl Into<String>, variant: AlertVariant) -> Alert {
    Alert::new(title, variant).with_description(format!("Task {}", task.task_id()))
}

/// Side channel receiving alerts. Rendering happens elsewhere.
pub trait AlertSink {
    fn push_alert(&mut self, alert: Alert);
}

/// The alert stack owned by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertList {
    alerts: Vec<Alert>,
}

impl AlertList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dismiss the alert at `index`. Out-of-range indices are ignored.
    pub fn close(&mut self, index: usize) -> Option<Alert> {
        (index < self.alerts.len()).then(|| self.alerts.remove(index))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Alert] {
        &self.alerts
    }

    #[must_use]
    pub fn last(&self) -> Option<&Alert> {
        self.alerts.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn take(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }
}

impl AlertSink for AlertList {
    fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }
}
