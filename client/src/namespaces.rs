//! Collection namespaces.

use hubview_types::{Namespace, NamespaceSummary};

use crate::Collection;

pub struct Namespaces;

impl Collection for Namespaces {
    type Item = NamespaceSummary;
    type Detail = Namespace;

    const PATH: &'static str = "_ui/v1/namespaces/";
}
