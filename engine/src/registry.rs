//! Remote registry list: list + poll, row actions, delete dialog, remote form.

use hubview_client::registries::RegistryRemotes;
use hubview_client::{HubClient, Resource};
use hubview_types::{
    Alert, AlertList, AlertSink, AlertVariant, Capability, ListSettings, ParamPatch,
    PermissionOracle, RegistryRemote, Viewer, task_alert,
};

use crate::error::ViewError;
use crate::lists::{REGISTRY_LIST, RegistryList};
use crate::location::Location;
use crate::remote_form::RemoteForm;
use crate::state::FetchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Sync,
    Edit,
    Delete,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionItem {
    pub action: RowAction,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The server rejected the form; errors are on the form, which stays open.
    Rejected,
    NotOpen,
}

const INDEX_UNSUPPORTED: &str =
    "Indexing execution environments is only supported on registry.redhat.io";

pub struct RegistryListView<L: Location, A = AlertList> {
    remotes: Resource<RegistryRemotes>,
    list: RegistryList<L>,
    viewer: Viewer,
    alerts: A,
    delete_target: Option<RegistryRemote>,
    form: Option<RemoteForm>,
}

fn remote_id(remote: &RegistryRemote) -> Result<&str, ViewError> {
    remote.id.as_deref().ok_or(ViewError::MissingId)
}

impl<L: Location, A: AlertSink> RegistryListView<L, A> {
    /// Build the view. Anonymous viewers get [`ViewError::Unauthorized`].
    ///
    /// Nothing is fetched until [`load`](Self::load).
    pub fn open(
        client: &HubClient,
        location: L,
        viewer: Viewer,
        settings: &ListSettings,
        alerts: A,
    ) -> Result<Self, ViewError> {
        if viewer.is_anonymous() {
            return Err(ViewError::Unauthorized);
        }
        let remotes = client.registries();
        let list = RegistryList::new(remotes.clone(), location, &REGISTRY_LIST, settings);
        Ok(Self {
            remotes,
            list,
            viewer,
            alerts,
            delete_target: None,
            form: None,
        })
    }

    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.list.refresh(FetchMode::Loud).await
    }

    pub async fn set_params(&mut self, patch: &ParamPatch) -> Result<(), ViewError> {
        self.list.set_params(patch).await
    }

    #[must_use]
    pub fn list(&self) -> &RegistryList<L> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut RegistryList<L> {
        &mut self.list
    }

    #[must_use]
    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut A {
        &mut self.alerts
    }

    #[must_use]
    pub fn can_add(&self) -> bool {
        self.viewer.allows(Capability::AddRegistry)
    }

    /// Actions offered for one row, in display order.
    #[must_use]
    pub fn row_actions(&self, remote: &RegistryRemote) -> Vec<ActionItem> {
        let can_change = self.viewer.allows(Capability::ChangeRegistry);
        let mut actions = Vec::with_capacity(4);
        if can_change {
            actions.push(ActionItem {
                action: RowAction::Sync,
                enabled: true,
            });
            actions.push(ActionItem {
                action: RowAction::Edit,
                enabled: true,
            });
        }
        if self.viewer.allows(Capability::DeleteRegistry) {
            actions.push(ActionItem {
                action: RowAction::Delete,
                enabled: true,
            });
        }
        actions.push(ActionItem {
            action: RowAction::Index,
            enabled: remote.is_indexable,
        });
        actions
    }

    fn require(&self, capability: Capability) -> Result<(), ViewError> {
        if self.viewer.allows(capability) {
            Ok(())
        } else {
            Err(ViewError::Forbidden(capability))
        }
    }

    pub fn open_delete(&mut self, remote: &RegistryRemote) -> Result<(), ViewError> {
        self.require(Capability::DeleteRegistry)?;
        self.delete_target = Some(remote.clone());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
    }

    #[must_use]
    pub fn delete_target(&self) -> Option<&RegistryRemote> {
        self.delete_target.as_ref()
    }

    /// Delete the remote named in the open dialog.
    ///
    /// Either way an alert is pushed, the list is fetched again, and the
    /// dialog closes. A failed delete is not an `Err`; the alert carries it.
    pub async fn confirm_delete(&mut self) -> Result<(), ViewError> {
        let Some(target) = self.delete_target.take() else {
            return Ok(());
        };
        let id = remote_id(&target)?;
        let name = &target.name;

        match self.remotes.delete(id).await {
            Ok(()) => {
                tracing::info!(id, name = %name, "remote registry deleted");
                self.alerts.push_alert(Alert::success(format!(
                    "Remote registry \"{name}\" has been successfully deleted."
                )));
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "remote registry delete failed");
                self.alerts.push_alert(Alert::danger(
                    format!("Remote registry \"{name}\" could not be deleted."),
                    err.describe(),
                ));
            }
        }

        self.list.refresh(FetchMode::Loud).await
    }

    /// Start a sync. Success re-fetches silently, which arms polling while
    /// the task is pending.
    pub async fn sync(&mut self, remote: &RegistryRemote) -> Result<(), ViewError> {
        self.require(Capability::ChangeRegistry)?;
        let id = remote_id(remote)?;
        let name = &remote.name;

        match self.remotes.sync(id).await {
            Ok(task) => {
                self.alerts.push_alert(task_alert(
                    &task,
                    format!("Sync started for remote registry \"{name}\"."),
                    AlertVariant::Info,
                ));
                self.list.refresh(FetchMode::Silent).await
            }
            Err(err) => {
                self.alerts.push_alert(Alert::danger(
                    format!("Remote registry \"{name}\" could not be synced."),
                    err.describe(),
                ));
                Ok(())
            }
        }
    }

    pub async fn index(&mut self, remote: &RegistryRemote) -> Result<(), ViewError> {
        if !remote.is_indexable {
            return Err(ViewError::Unavailable(INDEX_UNSUPPORTED));
        }
        let id = remote_id(remote)?;
        let name = &remote.name;

        match self.remotes.index(id).await {
            Ok(task) => self.alerts.push_alert(task_alert(
                &task,
                format!("Indexing started for execution environment \"{name}\"."),
                AlertVariant::Success,
            )),
            Err(err) => self.alerts.push_alert(Alert::danger(
                format!("Execution environment \"{name}\" could not be indexed."),
                err.describe(),
            )),
        }
        Ok(())
    }

    pub fn open_new_form(&mut self) -> Result<(), ViewError> {
        self.require(Capability::AddRegistry)?;
        self.form = Some(RemoteForm::create());
        Ok(())
    }

    pub fn open_edit_form(&mut self, remote: &RegistryRemote) -> Result<(), ViewError> {
        self.require(Capability::ChangeRegistry)?;
        self.form = Some(RemoteForm::edit(remote).ok_or(ViewError::MissingId)?);
        Ok(())
    }

    #[must_use]
    pub fn form(&self) -> Option<&RemoteForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RemoteForm> {
        self.form.as_mut()
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Save the open form. Success closes it and re-fetches the list.
    pub async fn save_form(&mut self) -> Result<SaveOutcome, ViewError> {
        let Some(form) = self.form.as_mut() else {
            return Ok(SaveOutcome::NotOpen);
        };
        let capability = form.required_capability();
        if !self.viewer.allows(capability) {
            return Err(ViewError::Forbidden(capability));
        }

        match form.save(&self.remotes).await {
            Ok(saved) => {
                tracing::info!(name = %saved.name, "remote registry saved");
                self.form = None;
                self.list.refresh(FetchMode::Loud).await?;
                Ok(SaveOutcome::Saved)
            }
            Err(err) => {
                tracing::debug!(error = %err, "remote registry form rejected");
                Ok(SaveOutcome::Rejected)
            }
        }
    }

    /// Tear down the list; pending polls never run.
    pub fn close(&mut self) {
        self.list.close();
    }
}
