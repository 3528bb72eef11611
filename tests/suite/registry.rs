//! Remote registry list against a mock hub: delete, sync polling, and the form.

use hubview_engine::{
    Completion, MemoryLocation, RegistryListView, RowAction, SaveOutcome, ViewError,
};
use hubview_types::{AlertList, AlertVariant, Capability, ListSettings, TaskState, Viewer};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    REGISTRIES, admin, client_for, fast_settings, hub_page, list_requests, mount_registry_list,
    registry_json, viewer_with,
};

fn open_view(
    server: &MockServer,
    viewer: Viewer,
    settings: &ListSettings,
) -> RegistryListView<MemoryLocation> {
    RegistryListView::open(
        &client_for(server),
        MemoryLocation::new(""),
        viewer,
        settings,
        AlertList::new(),
    )
    .expect("viewer is signed in")
}

#[tokio::test]
async fn anonymous_viewer_is_unauthorized() {
    let server = MockServer::start().await;
    let result = RegistryListView::open(
        &client_for(&server),
        MemoryLocation::new(""),
        Viewer::anonymous(),
        &ListSettings::default(),
        AlertList::new(),
    );
    assert!(matches!(result, Err(ViewError::Unauthorized)));
}

#[tokio::test]
async fn delete_success_alerts_and_refetches() {
    let server = MockServer::start().await;
    mount_registry_list(&server, vec![registry_json("1", "quay", "completed")]).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REGISTRIES}1/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &ListSettings::default());
    view.load().await.expect("list loads");
    let target = view.list().items()[0].clone();

    view.open_delete(&target).expect("admin may delete");
    assert_eq!(view.delete_target().map(|r| r.name.as_str()), Some("quay"));
    view.confirm_delete().await.expect("refetch succeeds");

    let alert = view.alerts().last().expect("an alert was pushed");
    assert_eq!(alert.variant, AlertVariant::Success);
    assert_eq!(
        alert.title,
        "Remote registry \"quay\" has been successfully deleted."
    );
    assert!(view.delete_target().is_none());
    assert_eq!(list_requests(&server, REGISTRIES).await, 2);
}

#[tokio::test]
async fn delete_failure_pushes_danger_alert() {
    let server = MockServer::start().await;
    mount_registry_list(&server, vec![registry_json("1", "quay", "completed")]).await;
    Mock::given(method("DELETE"))
        .and(path(format!("{REGISTRIES}1/")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &ListSettings::default());
    view.load().await.expect("list loads");
    let target = view.list().items()[0].clone();

    view.open_delete(&target).expect("admin may delete");
    view.confirm_delete().await.expect("refetch succeeds");

    let alert = view.alerts().last().expect("an alert was pushed");
    assert_eq!(alert.variant, AlertVariant::Danger);
    assert_eq!(alert.title, "Remote registry \"quay\" could not be deleted.");
    assert_eq!(alert.description.as_deref(), Some("500 Internal Server Error"));
    assert!(view.delete_target().is_none());
    assert_eq!(list_requests(&server, REGISTRIES).await, 2);
}

#[tokio::test]
async fn sync_polls_until_the_task_settles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REGISTRIES))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hub_page(vec![registry_json("1", "quay", "completed")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REGISTRIES))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hub_page(vec![registry_json("1", "quay", "running")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_registry_list(&server, vec![registry_json("1", "quay", "completed")]).await;
    Mock::given(method("POST"))
        .and(path(format!("{REGISTRIES}1/sync/")))
        .respond_with(
            ResponseTemplate::new(202).set_body_json(json!({"task": "/api/pulp/api/v3/tasks/t-1/"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &fast_settings());
    view.load().await.expect("list loads");
    assert!(!view.list().poll().is_active());

    let target = view.list().items()[0].clone();
    view.sync(&target).await.expect("sync refetch succeeds");

    let alert = view.alerts().last().expect("an alert was pushed");
    assert_eq!(alert.variant, AlertVariant::Info);
    assert_eq!(alert.title, "Sync started for remote registry \"quay\".");
    assert_eq!(alert.description.as_deref(), Some("Task t-1"));
    assert!(!view.list().is_loading());
    assert!(view.list().poll().is_active());

    let completion = view.list_mut().run_poll().await;
    assert!(matches!(completion, Some(Completion::Applied)));
    assert_eq!(
        view.list().items()[0].last_sync_status(),
        Some(TaskState::Completed)
    );
    assert!(!view.list().poll().is_active());
    assert!(view.list_mut().run_poll().await.is_none());
    assert_eq!(list_requests(&server, REGISTRIES).await, 3);
}

#[tokio::test]
async fn closing_cancels_a_scheduled_poll() {
    let server = MockServer::start().await;
    mount_registry_list(&server, vec![registry_json("1", "quay", "waiting")]).await;

    let mut view = open_view(&server, admin(), &fast_settings());
    view.load().await.expect("list loads");
    assert!(view.list().poll().is_active());

    view.close();
    assert!(view.list_mut().run_poll().await.is_none());
    assert_eq!(list_requests(&server, REGISTRIES).await, 1);
}

#[tokio::test]
async fn new_form_posts_without_blank_fields() {
    let server = MockServer::start().await;
    mount_registry_list(&server, Vec::new()).await;
    Mock::given(method("POST"))
        .and(path(REGISTRIES))
        .and(body_json(json!({
            "name": "quay",
            "url": "https://quay.io",
            "tls_validation": true
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(registry_json("7", "quay", "completed")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &ListSettings::default());
    view.open_new_form().expect("admin may add");
    let form = view.form_mut().expect("form is open");
    assert!(form.is_new());
    form.remote_mut().name = "quay".to_string();
    form.remote_mut().url = "https://quay.io".to_string();
    form.remote_mut().username = Some(String::new());

    let outcome = view.save_form().await.expect("save runs");
    assert_eq!(outcome, SaveOutcome::Saved);
    assert!(view.form().is_none());
    assert_eq!(list_requests(&server, REGISTRIES).await, 1);
}

#[tokio::test]
async fn edit_form_patches_only_changes() {
    let server = MockServer::start().await;
    mount_registry_list(&server, vec![registry_json("1", "quay", "completed")]).await;
    Mock::given(method("PATCH"))
        .and(path(format!("{REGISTRIES}1/")))
        .and(body_json(json!({"url": "https://quay.io"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registry_json("1", "quay", "completed")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &ListSettings::default());
    view.load().await.expect("list loads");
    let target = view.list().items()[0].clone();

    view.open_edit_form(&target).expect("admin may edit");
    let form = view.form_mut().expect("form is open");
    assert!(!form.allows_name_edit());
    form.remote_mut().url = "https://quay.io".to_string();

    let outcome = view.save_form().await.expect("save runs");
    assert_eq!(outcome, SaveOutcome::Saved);
    assert_eq!(list_requests(&server, REGISTRIES).await, 2);
}

#[tokio::test]
async fn rejected_save_keeps_form_open_with_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REGISTRIES))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"status": "400", "detail": "Enter a valid URL.", "source": {"parameter": "url"}}]
        })))
        .mount(&server)
        .await;

    let mut view = open_view(&server, admin(), &ListSettings::default());
    view.open_new_form().expect("admin may add");
    let form = view.form_mut().expect("form is open");
    form.remote_mut().name = "quay".to_string();
    form.remote_mut().url = "nope".to_string();

    let outcome = view.save_form().await.expect("save runs");
    assert_eq!(outcome, SaveOutcome::Rejected);
    let form = view.form().expect("form stays open");
    assert_eq!(form.errors().get("url"), Some("Enter a valid URL."));
    assert_eq!(list_requests(&server, REGISTRIES).await, 0);
}

#[tokio::test]
async fn row_actions_follow_capabilities() {
    let server = MockServer::start().await;
    let remote = serde_json::from_value(registry_json("1", "quay", "completed"))
        .expect("registry fixture parses");

    let admin_view = open_view(&server, admin(), &ListSettings::default());
    let actions: Vec<_> = admin_view
        .row_actions(&remote)
        .into_iter()
        .map(|item| (item.action, item.enabled))
        .collect();
    assert_eq!(
        actions,
        vec![
            (RowAction::Sync, true),
            (RowAction::Edit, true),
            (RowAction::Delete, true),
            (RowAction::Index, false),
        ]
    );
    assert!(admin_view.can_add());

    let mut deleter = open_view(
        &server,
        viewer_with(&[Capability::DeleteRegistry]),
        &ListSettings::default(),
    );
    let actions: Vec<_> = deleter
        .row_actions(&remote)
        .into_iter()
        .map(|item| item.action)
        .collect();
    assert_eq!(actions, vec![RowAction::Delete, RowAction::Index]);
    assert!(!deleter.can_add());
    assert!(matches!(
        deleter.sync(&remote).await,
        Err(ViewError::Forbidden(Capability::ChangeRegistry))
    ));
    assert!(matches!(
        deleter.index(&remote).await,
        Err(ViewError::Unavailable(_))
    ));
}
