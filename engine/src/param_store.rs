//! Param state bound to a [`Location`].

use hubview_types::{ParamDefaults, ParamPatch, ParamState};

use crate::location::Location;

/// Canonical param state for one view, mirrored into its location.
///
/// Defaults fill in on construction but are not written back until the first
/// update, so opening a view does not add a history entry.
#[derive(Debug)]
pub struct ParamStore<L> {
    location: L,
    recognized: &'static [&'static str],
    defaults: ParamDefaults,
    state: ParamState,
}

impl<L: Location> ParamStore<L> {
    pub fn new(location: L, recognized: &'static [&'static str], defaults: ParamDefaults) -> Self {
        let state = ParamState::parse(&location.query(), recognized).with_defaults(&defaults);
        Self {
            location,
            recognized,
            defaults,
            state,
        }
    }

    /// Merge `patch`, write the result to the location, and return it.
    ///
    /// Removed or invalid paging keys fall back to the defaults. A patch that
    /// changes nothing leaves the location alone. The caller issues the
    /// dependent fetch; this never does IO.
    pub fn update(&mut self, patch: &ParamPatch) -> &ParamState {
        let next = self.state.apply(patch).with_defaults(&self.defaults);
        if next != self.state {
            self.location.navigate(&next.serialize());
            self.state = next;
        }
        &self.state
    }

    /// Re-read the location after it changed underneath the store.
    pub fn reload(&mut self) -> &ParamState {
        self.state =
            ParamState::parse(&self.location.query(), self.recognized).with_defaults(&self.defaults);
        &self.state
    }
}

impl<L> ParamStore<L> {
    #[must_use]
    pub fn state(&self) -> &ParamState {
        &self.state
    }

    #[must_use]
    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }
}
