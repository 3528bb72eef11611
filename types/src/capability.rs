//! Permission-gated actions.
//!
//! The server grants free-form permission strings. They are resolved into
//! [`Capability`] values once, at the boundary, so every check in the views is
//! an enum lookup.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AddRegistry,
    ChangeRegistry,
    DeleteRegistry,
    ViewUser,
    AddUser,
    ChangeUser,
    DeleteUser,
    AddNamespace,
    ChangeNamespace,
    DeleteNamespace,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::AddRegistry,
        Capability::ChangeRegistry,
        Capability::DeleteRegistry,
        Capability::ViewUser,
        Capability::AddUser,
        Capability::ChangeUser,
        Capability::DeleteUser,
        Capability::AddNamespace,
        Capability::ChangeNamespace,
        Capability::DeleteNamespace,
    ];

    /// The server-side permission string.
    #[must_use]
    pub const fn permission(self) -> &'static str {
        match self {
            Self::AddRegistry => "galaxy.add_containerregistryremote",
            Self::ChangeRegistry => "galaxy.change_containerregistryremote",
            Self::DeleteRegistry => "galaxy.delete_containerregistryremote",
            Self::ViewUser => "galaxy.view_user",
            Self::AddUser => "galaxy.add_user",
            Self::ChangeUser => "galaxy.change_user",
            Self::DeleteUser => "galaxy.delete_user",
            Self::AddNamespace => "galaxy.add_namespace",
            Self::ChangeNamespace => "galaxy.change_namespace",
            Self::DeleteNamespace => "galaxy.delete_namespace",
        }
    }

    #[must_use]
    pub fn from_permission(permission: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cap| cap.permission() == permission)
    }
}

/// Capability check consulted before exposing a mutating action.
pub trait PermissionOracle {
    fn allows(&self, capability: Capability) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<Capability>,
}

impl CapabilitySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve server permission strings. Unrecognized strings are ignored.
    pub fn from_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions
            .into_iter()
            .filter_map(|p| Capability::from_permission(p.as_ref()))
            .collect()
    }

    #[must_use]
    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    pub fn grant(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl PermissionOracle for CapabilitySet {
    fn allows(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

/// The signed-in user as far as the views are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    username: Option<String>,
    capabilities: CapabilitySet,
}

impl Viewer {
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            username: None,
            capabilities: CapabilitySet::new(),
        }
    }

    #[must_use]
    pub fn user(username: impl Into<String>, capabilities: CapabilitySet) -> Self {
        Self {
            username: Some(username.into()),
            capabilities,
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl PermissionOracle for Viewer {
    fn allows(&self, capability: Capability) -> bool {
        !self.is_anonymous() && self.capabilities.allows(capability)
    }
}
