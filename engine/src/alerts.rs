use hubview_types::{Alert, AlertSink};
use tokio::sync::mpsc;

/// Forwards alerts to whoever renders them.
#[derive(Debug, Clone)]
pub struct AlertChannel(mpsc::UnboundedSender<Alert>);

impl AlertChannel {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl AlertSink for AlertChannel {
    fn push_alert(&mut self, alert: Alert) {
        if self.0.send(alert).is_err() {
            tracing::debug!("alert receiver dropped");
        }
    }
}
