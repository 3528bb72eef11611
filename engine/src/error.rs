use hubview_client::ApiError;
use hubview_types::Capability;

/// Why a view operation did not happen.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("missing permission {}", .0.permission())]
    Forbidden(Capability),
    #[error("sign in to view this page")]
    Unauthorized,
    #[error("view is closed")]
    Closed,
    #[error("record has no id")]
    MissingId,
    #[error("{0}")]
    Unavailable(&'static str),
}
