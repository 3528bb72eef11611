//! Role picker for assigning roles to a group.
//!
//! Params live in a local [`MemoryLocation`]; the picker never touches the
//! address bar. Only `galaxy.` roles are listed.

use hubview_client::HubClient;
use hubview_types::{ListSettings, ParamPatch, ParamState, Role};

use crate::error::ViewError;
use crate::lists::{ROLE_LIST, RoleList};
use crate::location::MemoryLocation;
use crate::state::{EmptyState, FetchMode};

pub const ASSIGNABLE_ROLE_PREFIX: &str = "galaxy.";

const INITIAL_PARAMS: &str = "page=1&page_size=10&sort=name";

/// One row of the picker table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRow<'a> {
    pub role: &'a Role,
    pub selected: bool,
    /// Already assigned; shown checked and cannot be toggled.
    pub disabled: bool,
}

#[derive(Debug)]
pub struct RolePicker {
    list: RoleList<MemoryLocation>,
    assigned: Vec<String>,
    selected: Vec<Role>,
}

impl RolePicker {
    pub fn new<I, S>(client: &HubClient, assigned: I, selected: Vec<Role>, settings: &ListSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fixed: ParamState = [("name__startswith", ASSIGNABLE_ROLE_PREFIX)]
            .into_iter()
            .collect();
        let list = RoleList::new(
            client.roles(),
            MemoryLocation::new(INITIAL_PARAMS),
            &ROLE_LIST,
            settings,
        )
        .with_fixed_filter(fixed);
        Self {
            list,
            assigned: assigned.into_iter().map(Into::into).collect(),
            selected,
        }
    }

    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.list.refresh(FetchMode::Loud).await
    }

    pub async fn set_params(&mut self, patch: &ParamPatch) -> Result<(), ViewError> {
        self.list.set_params(patch).await
    }

    #[must_use]
    pub fn list(&self) -> &RoleList<MemoryLocation> {
        &self.list
    }

    #[must_use]
    pub fn selected(&self) -> &[Role] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|r| r.name == name)
    }

    #[must_use]
    pub fn is_assigned(&self, name: &str) -> bool {
        self.assigned.iter().any(|r| r == name)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<RoleRow<'_>> {
        self.list
            .items()
            .iter()
            .map(|role| RoleRow {
                role,
                selected: self.is_selected(&role.name) || self.is_assigned(&role.name),
                disabled: self.is_assigned(&role.name),
            })
            .collect()
    }

    /// Select or deselect a role. Assigned roles are left alone.
    pub fn toggle(&mut self, role: &Role) -> &[Role] {
        if self.is_assigned(&role.name) {
            return &self.selected;
        }
        if self.is_selected(&role.name) {
            self.selected.retain(|r| r.name != role.name);
        } else {
            self.selected.push(role.clone());
        }
        &self.selected
    }

    pub fn remove_selected(&mut self, name: &str) -> &[Role] {
        self.selected.retain(|r| r.name != name);
        &self.selected
    }

    #[must_use]
    pub fn empty_state(&self) -> EmptyState {
        self.list.empty_state()
    }
}
