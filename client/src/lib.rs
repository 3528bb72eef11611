//! REST client for the hub API.
//!
//! # Architecture
//!
//! - [`HubClient`] - shared reqwest client bound to a base URL and optional token
//! - [`Collection`] - a paginated endpoint: path, list item type, detail type
//! - [`Resource`] - typed handle for one collection (list, get, delete)
//! - [`registries`], [`roles`], [`users`], [`namespaces`] - the collections the
//!   console uses, plus their resource-specific calls (create, PATCH, sync, index)
//!
//! # Response Shapes
//!
//! The hub answers list requests in two envelopes, both normalized to
//! [`ListPage`]:
//!
//! | Envelope | Items | Count |
//! |----------|-------|-------|
//! | Hub UI API | `data` | `meta.count` |
//! | Pulp API | `results` | `count` |
//!
//! # Error Handling
//!
//! Every call returns [`ApiError`]. Nothing is retried: a failure goes back to
//! the view, which decides how to show it. 404 becomes [`ApiError::NotFound`]
//! so detail views can redirect. 400 bodies with field messages become
//! [`ApiError::Validation`].

mod collection;
pub mod namespaces;
pub mod registries;
pub mod roles;
pub mod users;

pub use collection::{Collection, Resource};
pub use hubview_types;
pub use reqwest::StatusCode;

use std::time::Duration;

use futures_util::StreamExt;
use hubview_types::{ApiToken, ClientSettings, ErrorMessages, ListPage, ParamState};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

const CONNECT_TIMEOUT_SECS: u64 = 30;

const TCP_KEEPALIVE_SECS: u64 = 60;

const POOL_MAX_IDLE_PER_HOST: usize = 16;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found")]
    NotFound,
    #[error("validation failed")]
    Validation(ErrorMessages),
    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound => Some(StatusCode::NOT_FOUND),
            Self::Validation(_) => Some(StatusCode::BAD_REQUEST),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            Self::Json(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Short text for an alert description: `"500 Internal Server Error"`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.status() {
            Some(status) => format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
            None => self.to_string(),
        }
    }

    /// Field messages for a form, falling back to a general message.
    #[must_use]
    pub fn form_messages(&self) -> ErrorMessages {
        match self {
            Self::Validation(messages) => messages.clone(),
            other => ErrorMessages::general(other.describe()),
        }
    }
}

fn base_client_builder(allow_insecure: bool) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("hubview/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(!allow_insecure)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Read at most 32 KiB of an error body.
pub async fn read_capped_error_body(response: Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Map a non-2xx response onto [`ApiError`].
async fn check_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let body = read_capped_error_body(response).await;
    if status == StatusCode::BAD_REQUEST
        && let Some(messages) = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| ErrorMessages::from_body(&value))
    {
        return Err(ApiError::Validation(messages));
    }

    tracing::warn!(%status, body_bytes = body.len(), "API request failed");
    Err(ApiError::Status { status, body })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Shared connection to one hub.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<ApiToken>,
}

impl HubClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let http = base_client_builder(settings.allow_insecure())
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url().clone(),
            token: settings.token().cloned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn registries(&self) -> Resource<registries::RegistryRemotes> {
        Resource::new(self.clone())
    }

    pub fn roles(&self) -> Resource<roles::Roles> {
        Resource::new(self.clone())
    }

    pub fn users(&self) -> Resource<users::Users> {
        Resource::new(self.clone())
    }

    pub fn namespaces(&self) -> Resource<namespaces::Namespaces> {
        Resource::new(self.clone())
    }

    fn endpoint(&self, path: &str, params: Option<&ParamState>) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path)?;
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.set_query(Some(&params.serialize()));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Token {}", token.expose_secret())),
            None => builder,
        }
    }

    pub(crate) async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ParamState,
    ) -> Result<ListPage<T>, ApiError> {
        let envelope: collection::PageEnvelope<T> = self.get_json(path, Some(params)).await?;
        Ok(envelope.into_page())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&ParamState>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, params)?;
        tracing::debug!(%url, "GET");
        let response = self.request(Method::GET, url).send().await?;
        decode(check_response(response).await?).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, None)?;
        tracing::debug!(%method, %url, "sending JSON body");
        let response = self.request(method, url).json(body).send().await?;
        decode(check_response(response).await?).await
    }

    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path, None)?;
        tracing::debug!(%method, %url, "sending request");
        let response = self.request(method, url).send().await?;
        check_response(response).await?;
        Ok(())
    }
}
