//! Navigation targets a view can ask the router to go to.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    NotFound,
    UserList,
    EditUser { id: u64 },
    UserDetail { id: u64 },
    RegistryList,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::NotFound => "/not-found".to_string(),
            Self::UserList => "/users".to_string(),
            Self::EditUser { id } => format!("/users/{id}/edit"),
            Self::UserDetail { id } => format!("/users/{id}"),
            Self::RegistryList => "/registries".to_string(),
        }
    }
}
