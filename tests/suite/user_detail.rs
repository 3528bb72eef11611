//! User detail page against a mock hub.

use hubview_engine::{UserDetailState, UserDetailView};
use hubview_types::{AlertList, AlertVariant, Capability, Route, Viewer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{USERS, admin, client_for, user_json, viewer_with};

async fn mount_user(server: &MockServer, id: u64, username: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{USERS}{id}/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(id, username)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn missing_user_redirects_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS}9/")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let view = UserDetailView::open(&client_for(&server), admin(), "9", AlertList::new()).await;
    assert_eq!(view.redirect(), Some(&Route::NotFound));
    assert!(view.user().is_none());
}

#[tokio::test]
async fn server_error_also_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{USERS}3/")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let view = UserDetailView::open(&client_for(&server), admin(), "3", AlertList::new()).await;
    assert_eq!(view.redirect(), Some(&Route::NotFound));
}

#[tokio::test]
async fn viewer_without_view_permission_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let view = UserDetailView::open(
        &client,
        viewer_with(&[Capability::ChangeUser]),
        "3",
        AlertList::new(),
    )
    .await;
    assert_eq!(view.state(), &UserDetailState::Unauthorized);

    let view = UserDetailView::open(&client, Viewer::anonymous(), "3", AlertList::new()).await;
    assert_eq!(view.state(), &UserDetailState::Unauthorized);
}

#[tokio::test]
async fn loaded_user_offers_edit_by_capability() {
    let server = MockServer::start().await;
    mount_user(&server, 3, "ada").await;

    let view = UserDetailView::open(
        &client_for(&server),
        viewer_with(&[Capability::ViewUser, Capability::ChangeUser]),
        "3",
        AlertList::new(),
    )
    .await;
    assert_eq!(view.user().map(|u| u.username.as_str()), Some("ada"));
    assert_eq!(view.edit_route(), Some(Route::EditUser { id: 3 }));
    assert!(!view.can_delete());
}

#[tokio::test]
async fn delete_redirects_to_user_list() {
    let server = MockServer::start().await;
    mount_user(&server, 3, "ada").await;
    Mock::given(method("DELETE"))
        .and(path(format!("{USERS}3/")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut view =
        UserDetailView::open(&client_for(&server), admin(), "3", AlertList::new()).await;
    view.open_delete().expect("admin may delete");
    assert!(view.delete_dialog_open());
    view.confirm_delete().await.expect("delete runs");

    assert!(!view.delete_dialog_open());
    assert_eq!(view.redirect(), Some(&Route::UserList));
    let alert = view.alerts().last().expect("an alert was pushed");
    assert_eq!(alert.variant, AlertVariant::Success);
    assert_eq!(alert.title, "User \"ada\" has been successfully deleted.");
}

#[tokio::test]
async fn failed_delete_stays_on_the_page() {
    let server = MockServer::start().await;
    mount_user(&server, 3, "ada").await;
    Mock::given(method("DELETE"))
        .and(path(format!("{USERS}3/")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut view =
        UserDetailView::open(&client_for(&server), admin(), "3", AlertList::new()).await;
    view.open_delete().expect("admin may delete");
    view.confirm_delete().await.expect("delete runs");

    assert!(!view.delete_dialog_open());
    assert!(view.user().is_some());
    let alert = view.alerts().last().expect("an alert was pushed");
    assert_eq!(alert.variant, AlertVariant::Danger);
    assert_eq!(alert.description.as_deref(), Some("500 Internal Server Error"));
}
