//! Resolved configuration types shared across crates.
//!
//! Raw TOML structs (with `Option` fields) stay private in `hubview-config`.
//! The loader resolves them into these types at the parse boundary, so a
//! value of one of these types is already valid.

use std::time::Duration;

use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base URL must use https (set allow_insecure for local servers): {0}")]
    InsecureBaseUrl(String),
    #[error("page size must be positive")]
    ZeroPageSize,
    #[error("poll interval must be positive")]
    ZeroPollInterval,
}

/// API token. Debug output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

/// Where and how to reach the hub API.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    base_url: Url,
    token: Option<ApiToken>,
    timeout: Duration,
    allow_insecure: bool,
}

impl ClientSettings {
    /// Parse and validate a base URL. A trailing slash is added so relative
    /// endpoint paths join under it.
    pub fn new(base_url: &str, allow_insecure: bool) -> Result<Self, SettingsError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|source| SettingsError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if url.scheme() != "https" && !allow_insecure {
            return Err(SettingsError::InsecureBaseUrl(url.to_string()));
        }
        Ok(Self {
            base_url: url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            allow_insecure,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<ApiToken>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> Option<&ApiToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn allow_insecure(&self) -> bool {
        self.allow_insecure
    }
}

/// Paging and polling defaults for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    default_page_size: u32,
    poll_interval: Duration,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ListSettings {
    pub fn new(default_page_size: u32, poll_interval: Duration) -> Result<Self, SettingsError> {
        if default_page_size == 0 {
            return Err(SettingsError::ZeroPageSize);
        }
        if poll_interval.is_zero() {
            return Err(SettingsError::ZeroPollInterval);
        }
        Ok(Self {
            default_page_size,
            poll_interval,
        })
    }

    #[must_use]
    pub const fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
