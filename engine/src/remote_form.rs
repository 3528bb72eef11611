//! Add/edit form for a registry remote.

use hubview_client::registries::RegistryRemotes;
use hubview_client::{ApiError, Resource};
use hubview_types::{Capability, ErrorMessages, RegistryRemote};

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormMode {
    New,
    Edit {
        id: String,
        unmodified: Box<RegistryRemote>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteForm {
    mode: FormMode,
    remote: RegistryRemote,
    errors: ErrorMessages,
}

impl RemoteForm {
    /// Blank form for a new remote.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::New,
            remote: RegistryRemote::blank(),
            errors: ErrorMessages::new(),
        }
    }

    /// Form editing `remote`. `None` when the record has no id.
    #[must_use]
    pub fn edit(remote: &RegistryRemote) -> Option<Self> {
        let id = remote.id.clone()?;
        Some(Self {
            mode: FormMode::Edit {
                id,
                unmodified: Box::new(remote.clone()),
            },
            remote: remote.clone(),
            errors: ErrorMessages::new(),
        })
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.mode == FormMode::New
    }

    /// Names are fixed once a remote exists.
    #[must_use]
    pub fn allows_name_edit(&self) -> bool {
        self.is_new()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.is_new() {
            "Add remote registry"
        } else {
            "Edit remote registry"
        }
    }

    /// Capability needed to save this form.
    #[must_use]
    pub fn required_capability(&self) -> Capability {
        if self.is_new() {
            Capability::AddRegistry
        } else {
            Capability::ChangeRegistry
        }
    }

    #[must_use]
    pub fn remote(&self) -> &RegistryRemote {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut RegistryRemote {
        &mut self.remote
    }

    pub fn update(&mut self, remote: RegistryRemote) {
        self.remote = remote;
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorMessages {
        &self.errors
    }

    /// Create, or PATCH the fields that changed since the form opened.
    ///
    /// On failure the messages are kept on the form for inline display.
    pub async fn save(
        &mut self,
        remotes: &Resource<RegistryRemotes>,
    ) -> Result<RegistryRemote, ApiError> {
        let result = match &self.mode {
            FormMode::New => remotes.create(&self.remote).await,
            FormMode::Edit { id, unmodified } => {
                remotes.smart_update(id, &self.remote, unmodified).await
            }
        };
        match result {
            Ok(saved) => {
                self.errors = ErrorMessages::new();
                Ok(saved)
            }
            Err(err) => {
                self.errors = err.form_messages();
                Err(err)
            }
        }
    }
}
