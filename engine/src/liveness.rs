use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that a view is still mounted.
///
/// Every completion checks it before touching view state. Clones observe the
/// same flag, so a handle held elsewhere can tear the view down.
#[derive(Debug, Clone)]
pub struct ViewLiveness(Arc<AtomicBool>);

impl Default for ViewLiveness {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLiveness {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the view torn down. Idempotent.
    pub fn close(&self) {
        self.0.store(false, Ordering::Release);
    }
}
