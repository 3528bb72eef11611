//! Read-only user page with edit and delete affordances.

use hubview_client::users::Users;
use hubview_client::{HubClient, Resource};
use hubview_types::{
    Alert, AlertList, AlertSink, Capability, PermissionOracle, Route, User, Viewer,
};

use crate::error::ViewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDetailState {
    Unauthorized,
    Redirect(Route),
    Loaded(User),
}

#[derive(Debug)]
pub struct UserDetailView<A = AlertList> {
    users: Resource<Users>,
    viewer: Viewer,
    state: UserDetailState,
    delete_dialog: bool,
    alerts: A,
}

impl<A: AlertSink> UserDetailView<A> {
    /// Check access, then load the user. Any load failure redirects to the
    /// not-found page.
    pub async fn open(client: &HubClient, viewer: Viewer, user_id: &str, alerts: A) -> Self {
        let users = client.users();
        let state = if viewer.is_anonymous() || !viewer.allows(Capability::ViewUser) {
            UserDetailState::Unauthorized
        } else {
            match users.get(user_id).await {
                Ok(user) => UserDetailState::Loaded(user),
                Err(err) => {
                    tracing::debug!(user_id, error = %err, "user load failed");
                    UserDetailState::Redirect(Route::NotFound)
                }
            }
        };
        Self {
            users,
            viewer,
            state,
            delete_dialog: false,
            alerts,
        }
    }

    #[must_use]
    pub fn state(&self) -> &UserDetailState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            UserDetailState::Loaded(user) => Some(user),
            UserDetailState::Unauthorized | UserDetailState::Redirect(_) => None,
        }
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&Route> {
        match &self.state {
            UserDetailState::Redirect(route) => Some(route),
            UserDetailState::Unauthorized | UserDetailState::Loaded(_) => None,
        }
    }

    #[must_use]
    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut A {
        &mut self.alerts
    }

    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.user().is_some() && self.viewer.allows(Capability::ChangeUser)
    }

    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.user().is_some() && self.viewer.allows(Capability::DeleteUser)
    }

    /// Where the edit button leads.
    #[must_use]
    pub fn edit_route(&self) -> Option<Route> {
        let user = self.user().filter(|_| self.can_edit())?;
        Some(Route::EditUser { id: user.id })
    }

    pub fn open_delete(&mut self) -> Result<(), ViewError> {
        if !self.can_delete() {
            return Err(ViewError::Forbidden(Capability::DeleteUser));
        }
        self.delete_dialog = true;
        Ok(())
    }

    #[must_use]
    pub fn delete_dialog_open(&self) -> bool {
        self.delete_dialog
    }

    /// Delete the user shown in the dialog.
    ///
    /// Success redirects to the user list. Failure leaves the page as it was
    /// with a danger alert.
    pub async fn confirm_delete(&mut self) -> Result<(), ViewError> {
        if !self.delete_dialog {
            return Ok(());
        }
        let Some((id, username)) = self.user().map(|u| (u.id, u.username.clone())) else {
            return Err(ViewError::Closed);
        };

        let deleted = match self.users.delete(&id.to_string()).await {
            Ok(()) => {
                self.alerts.push_alert(Alert::success(format!(
                    "User \"{username}\" has been successfully deleted."
                )));
                true
            }
            Err(err) => {
                self.alerts.push_alert(Alert::danger(
                    format!("User \"{username}\" could not be deleted."),
                    err.describe(),
                ));
                false
            }
        };
        self.close_delete(deleted);
        Ok(())
    }

    /// Close the dialog. After a deletion the page leaves for the user list.
    pub fn close_delete(&mut self, did_delete: bool) {
        self.delete_dialog = false;
        if did_delete {
            self.state = UserDetailState::Redirect(Route::UserList);
        }
    }
}
