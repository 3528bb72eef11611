//! Query keys and defaults for each paginated collection.

use hubview_client::Resource;
use hubview_client::namespaces::Namespaces;
use hubview_client::registries::RegistryRemotes;
use hubview_client::roles::Roles;
use hubview_client::users::Users;

use crate::view::{ListSpec, ListView};

pub const REGISTRY_LIST: ListSpec = ListSpec {
    recognized: &["page", "page_size", "sort", "name__icontains"],
    filter_keys: &["name__icontains"],
    default_sort: Some("name"),
};

pub const ROLE_LIST: ListSpec = ListSpec {
    recognized: &["page", "page_size", "sort", "name__icontains"],
    filter_keys: &["name__icontains"],
    default_sort: Some("name"),
};

pub const USER_LIST: ListSpec = ListSpec {
    recognized: &[
        "page",
        "page_size",
        "sort",
        "username__contains",
        "first_name__contains",
        "last_name__contains",
        "email__contains",
    ],
    filter_keys: &[
        "username__contains",
        "first_name__contains",
        "last_name__contains",
        "email__contains",
    ],
    default_sort: Some("username"),
};

pub const NAMESPACE_LIST: ListSpec = ListSpec {
    recognized: &["page", "page_size", "sort", "keywords"],
    filter_keys: &["keywords"],
    default_sort: Some("name"),
};

pub type UserListView<L> = ListView<Resource<Users>, L>;
pub type NamespaceListView<L> = ListView<Resource<Namespaces>, L>;
pub type RegistryList<L> = ListView<Resource<RegistryRemotes>, L>;
pub type RoleList<L> = ListView<Resource<Roles>, L>;
