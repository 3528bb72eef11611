//! Role picker against a mock hub.

use hubview_engine::{EmptyState, RolePicker};
use hubview_types::{ListSettings, ParamPatch, Role};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{ROLES, client_for, list_requests, pulp_page};

fn role(name: &str) -> Role {
    Role {
        name: name.to_string(),
        description: None,
        locked: true,
    }
}

async fn mount_roles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ROLES))
        .and(query_param("name__startswith", "galaxy."))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulp_page(vec![
            json!({"name": "galaxy.content_admin", "description": "Manage content", "locked": true}),
            json!({"name": "galaxy.user_admin", "locked": true}),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_only_assignable_roles() {
    let server = MockServer::start().await;
    mount_roles(&server).await;

    let mut picker = RolePicker::new(
        &client_for(&server),
        ["galaxy.user_admin"],
        Vec::new(),
        &ListSettings::default(),
    );
    picker.load().await.expect("roles load");

    let rows: Vec<_> = picker
        .rows()
        .into_iter()
        .map(|row| (row.role.name.clone(), row.selected, row.disabled))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("galaxy.content_admin".to_string(), false, false),
            ("galaxy.user_admin".to_string(), true, true),
        ]
    );
    assert_eq!(picker.empty_state(), EmptyState::Items);
    // The prefix filter is sent, never stored in the picker's params.
    assert!(!picker.list().params().contains("name__startswith"));
}

#[tokio::test]
async fn toggle_skips_assigned_roles() {
    let server = MockServer::start().await;
    mount_roles(&server).await;

    let mut picker = RolePicker::new(
        &client_for(&server),
        ["galaxy.user_admin"],
        Vec::new(),
        &ListSettings::default(),
    );
    picker.load().await.expect("roles load");

    picker.toggle(&role("galaxy.content_admin"));
    assert!(picker.is_selected("galaxy.content_admin"));
    picker.toggle(&role("galaxy.user_admin"));
    assert!(!picker.is_selected("galaxy.user_admin"));

    picker.toggle(&role("galaxy.content_admin"));
    assert!(picker.selected().is_empty());
}

#[tokio::test]
async fn name_filter_with_no_matches_reports_filter_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROLES))
        .and(query_param("name__icontains", "nothing"))
        .and(query_param("name__startswith", "galaxy."))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulp_page(Vec::new())))
        .expect(1)
        .mount(&server)
        .await;

    let mut picker = RolePicker::new(
        &client_for(&server),
        Vec::<String>::new(),
        Vec::new(),
        &ListSettings::default(),
    );
    picker
        .set_params(&ParamPatch::new().set("name__icontains", "nothing"))
        .await
        .expect("filtered load succeeds");

    assert_eq!(picker.empty_state(), EmptyState::NoFilterResults);
    assert_eq!(list_requests(&server, ROLES).await, 1);
}
