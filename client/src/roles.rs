//! Assignable roles (pulp role API).

use hubview_types::Role;

use crate::Collection;

pub struct Roles;

impl Collection for Roles {
    type Item = Role;
    type Detail = Role;

    const PATH: &'static str = "pulp/api/v3/roles/";
}
