//! Hub user accounts.

use hubview_types::User;

use crate::Collection;

pub struct Users;

impl Collection for Users {
    type Item = User;
    type Detail = User;

    const PATH: &'static str = "_ui/v1/users/";
}
