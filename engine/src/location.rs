//! The navigable location a list view mirrors its params into.

/// Query-string half of the current location.
pub trait Location {
    /// Current query string, without the leading `?`.
    fn query(&self) -> String;

    /// Replace the query string. Only the query changes; the path stays.
    fn navigate(&mut self, query: &str);
}

/// In-memory location with a history stack.
///
/// Serves tests, the CLI, and views whose params never reach the address bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    history: Vec<String>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: vec![initial.into()],
        }
    }

    /// Every query string this location has held, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Step back one entry. Returns false at the first entry.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        self.history.last().cloned().unwrap_or_default()
    }

    fn navigate(&mut self, query: &str) {
        self.history.push(query.to_string());
    }
}
