//! Shared test utilities and fixtures
//!
//! A mock hub served by wiremock, plus builders for clients and viewers.

#![allow(dead_code)]

use std::time::Duration;

use hubview_client::HubClient;
use hubview_types::{ApiToken, Capability, CapabilitySet, ClientSettings, ListSettings, Viewer};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REGISTRIES: &str = "/api/_ui/v1/execution-environments/registries/";
pub const USERS: &str = "/api/_ui/v1/users/";
pub const ROLES: &str = "/api/pulp/api/v3/roles/";

pub fn client_for(server: &MockServer) -> HubClient {
    let settings = ClientSettings::new(&format!("{}/api/", server.uri()), true)
        .expect("valid mock URL")
        .with_token(Some(ApiToken::new("test-token")));
    HubClient::new(&settings).expect("client builds")
}

/// Short poll interval so polling tests finish quickly against a real server.
pub fn fast_settings() -> ListSettings {
    ListSettings::new(10, Duration::from_millis(50)).expect("valid list settings")
}

pub fn admin() -> Viewer {
    Viewer::user("admin", CapabilitySet::all())
}

pub fn viewer_with(capabilities: &[Capability]) -> Viewer {
    Viewer::user("someone", capabilities.iter().copied().collect())
}

pub fn registry_json(id: &str, name: &str, state: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": "https://registry.example.com",
        "tls_validation": true,
        "is_indexable": false,
        "write_only_fields": [
            {"name": "password", "is_set": false},
            {"name": "proxy_password", "is_set": false},
            {"name": "client_key", "is_set": false}
        ],
        "last_sync_task": {"state": state}
    })
}

pub fn hub_page(items: Vec<Value>) -> Value {
    let count = items.len();
    json!({
        "meta": {"count": count},
        "links": {},
        "data": items
    })
}

pub fn pulp_page(items: Vec<Value>) -> Value {
    let count = items.len();
    json!({
        "count": count,
        "next": null,
        "previous": null,
        "results": items
    })
}

pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": format!("{username}@example.com"),
        "groups": [{"id": 1, "name": "admins"}],
        "is_superuser": false
    })
}

/// Serve `items` for every registry list request.
pub async fn mount_registry_list(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(REGISTRIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(hub_page(items)))
        .mount(server)
        .await;
}

pub async fn list_requests(server: &MockServer, list_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == list_path)
        .count()
}
