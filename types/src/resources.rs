//! Records returned by the hub API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{SyncTask, TaskMarker, TaskState};

/// A credential-like field whose value the server never returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOnlyField {
    pub name: String,
    pub is_set: bool,
}

impl WriteOnlyField {
    #[must_use]
    pub fn unset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_set: false,
        }
    }
}

/// Write-only fields a new registry remote starts with.
pub const REGISTRY_WRITE_ONLY_FIELDS: [&str; 5] = [
    "username",
    "password",
    "proxy_username",
    "proxy_password",
    "client_key",
];

/// Remote container registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRemote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_tls_validation")]
    pub tls_validation: bool,
    #[serde(default)]
    pub is_indexable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_concurrency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    #[serde(default)]
    pub write_only_fields: Vec<WriteOnlyField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_task: Option<SyncTask>,
}

const fn default_tls_validation() -> bool {
    true
}

/// Fields the server computes; never sent back on create or update.
pub const REGISTRY_READ_ONLY_FIELDS: [&str; 6] = [
    "id",
    "created_at",
    "updated_at",
    "is_indexable",
    "write_only_fields",
    "last_sync_task",
];

impl RegistryRemote {
    /// A blank remote for the "add" form.
    ///
    /// The API treats a missing `tls_validation` as true, so the form starts there.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            url: String::new(),
            created_at: None,
            updated_at: None,
            tls_validation: true,
            is_indexable: false,
            policy: None,
            username: None,
            password: None,
            proxy_url: None,
            proxy_username: None,
            proxy_password: None,
            client_cert: None,
            client_key: None,
            ca_cert: None,
            download_concurrency: None,
            rate_limit: None,
            write_only_fields: REGISTRY_WRITE_ONLY_FIELDS
                .into_iter()
                .map(WriteOnlyField::unset)
                .collect(),
            last_sync_task: None,
        }
    }

    #[must_use]
    pub fn last_sync_status(&self) -> Option<TaskState> {
        self.last_sync_task.as_ref().map(|task| task.state)
    }

    /// When the last sync finished, or started if it has not finished.
    #[must_use]
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        let task = self.last_sync_task.as_ref()?;
        task.finished_at.or(task.started_at)
    }

    #[must_use]
    pub fn write_only_is_set(&self, field: &str) -> bool {
        self.write_only_fields
            .iter()
            .any(|f| f.name == field && f.is_set)
    }
}

impl TaskMarker for RegistryRemote {
    fn task_state(&self) -> Option<TaskState> {
        self.last_sync_status()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

impl TaskMarker for Role {
    fn task_state(&self) -> Option<TaskState> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl TaskMarker for User {
    fn task_state(&self) -> Option<TaskState> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceLink {
    pub name: String,
    pub url: String,
}

/// Namespace as it appears in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub num_collections: u64,
}

impl TaskMarker for NamespaceSummary {
    fn task_state(&self) -> Option<TaskState> {
        None
    }
}

/// Object-level group permissions attached to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermissions {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub object_roles: Vec<String>,
}

/// Namespace detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    #[serde(flatten)]
    pub summary: NamespaceSummary,
    #[serde(default)]
    pub groups: Vec<GroupPermissions>,
    #[serde(default)]
    pub resources: String,
    #[serde(default)]
    pub owners: Vec<serde_json::Value>,
    #[serde(default)]
    pub links: Vec<NamespaceLink>,
}
