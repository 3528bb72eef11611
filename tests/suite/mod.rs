//! Integration test suite modules.

mod registry;
mod role_picker;
mod user_detail;
