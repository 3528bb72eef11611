//! Remote container registries.

use hubview_types::{
    REGISTRY_READ_ONLY_FIELDS, RegistryRemote, TaskRef, changed_fields, strip_blank_fields,
    without_fields,
};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::{ApiError, Collection, Resource};

pub struct RegistryRemotes;

impl Collection for RegistryRemotes {
    type Item = RegistryRemote;
    type Detail = RegistryRemote;

    const PATH: &'static str = "_ui/v1/execution-environments/registries/";
}

fn writable_fields(remote: &RegistryRemote) -> Result<Map<String, Value>, ApiError> {
    let value = serde_json::to_value(remote)?;
    let map = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(without_fields(map, &REGISTRY_READ_ONLY_FIELDS))
}

impl Resource<RegistryRemotes> {
    /// Create a remote. Blank fields are left out of the request.
    pub async fn create(&self, remote: &RegistryRemote) -> Result<RegistryRemote, ApiError> {
        let payload = strip_blank_fields(writable_fields(remote)?);
        self.client()
            .send_json(Method::POST, RegistryRemotes::PATH, &Value::Object(payload))
            .await
    }

    /// PATCH only the fields that differ from `unmodified`.
    ///
    /// With nothing to change no request is sent and `edited` is returned.
    pub async fn smart_update(
        &self,
        id: &str,
        edited: &RegistryRemote,
        unmodified: &RegistryRemote,
    ) -> Result<RegistryRemote, ApiError> {
        let changes = changed_fields(&writable_fields(unmodified)?, &writable_fields(edited)?);
        if changes.is_empty() {
            tracing::debug!(id, "registry unchanged, skipping update");
            return Ok(edited.clone());
        }
        self.client()
            .send_json(Method::PATCH, &Self::detail_path(id), &Value::Object(changes))
            .await
    }

    /// Start a sync from the remote registry.
    pub async fn sync(&self, id: &str) -> Result<TaskRef, ApiError> {
        let path = format!("{}sync/", Self::detail_path(id));
        self.client()
            .send_json(Method::POST, &path, &Value::Object(Map::new()))
            .await
    }

    /// Start indexing execution environments found in the registry.
    pub async fn index(&self, id: &str) -> Result<TaskRef, ApiError> {
        let path = format!("{}index/", Self::detail_path(id));
        self.client()
            .send_json(Method::POST, &path, &Value::Object(Map::new()))
            .await
    }
}
