//! Core domain types for hubview.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod alert;
mod capability;
mod form;
mod page;
pub mod params;
mod resources;
mod route;
pub mod settings;
mod task;
mod text;

pub use alert::{Alert, AlertList, AlertSink, AlertVariant, task_alert};
pub use capability::{Capability, CapabilitySet, PermissionOracle, Viewer};
pub use form::{ErrorMessages, NO_FIELD, changed_fields, strip_blank_fields, without_fields};
pub use page::ListPage;
pub use params::{ParamDefaults, ParamPatch, ParamState, ParamValue, SortKey};
pub use resources::{
    GroupPermissions, GroupRef, Namespace, NamespaceLink, NamespaceSummary,
    REGISTRY_READ_ONLY_FIELDS, REGISTRY_WRITE_ONLY_FIELDS, RegistryRemote, Role, User,
    WriteOnlyField,
};
pub use route::Route;
pub use settings::{ApiToken, ClientSettings, ListSettings, SettingsError};
pub use task::{SyncTask, TaskMarker, TaskRef, TaskState};
pub use text::{sha_label, truncate_sha};
