//! Configuration for hubview.
//!
//! The file lives at `$HUBVIEW_CONFIG` or `~/.hubview/config.toml`. A missing
//! file is not an error: every field has a default except the server URL,
//! which the caller must supply some other way.
//!
//! ```toml
//! [server]
//! base_url = "https://hub.example.com/api/galaxy/"
//! token = "${HUB_TOKEN}"
//! timeout_seconds = 30
//!
//! [lists]
//! default_page_size = 10
//! poll_interval_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use hubview_types::{ApiToken, ClientSettings, ListSettings, SettingsError};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "HUBVIEW_CONFIG";
pub const TOKEN_ENV: &str = "HUBVIEW_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct HubConfig {
    pub server: Option<ServerConfig>,
    pub lists: Option<ListsConfig>,
}

#[derive(Default, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// API token. `${VAR}` references are expanded from the environment.
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub allow_insecure: bool,
}

// Manual Debug impl to prevent leaking the token in logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field(
                "token",
                &if self.token.is_some() { "[REDACTED]" } else { "None" },
            )
            .field("timeout_seconds", &self.timeout_seconds)
            .field("allow_insecure", &self.allow_insecure)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListsConfig {
    pub default_page_size: Option<u32>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no server URL configured (set [server] base_url or pass --url)")]
    MissingBaseUrl,
    #[error(transparent)]
    Invalid(#[from] SettingsError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::MissingBaseUrl | ConfigError::Invalid(_) => None,
        }
    }
}

/// Replace `${VAR}` with the variable's value. Unset variables become empty.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 3 + len..];
    }

    out.push_str(rest);
    out
}

impl HubConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str::<HubConfig>(&content) {
            Ok(config) => {
                if config.has_literal_token() {
                    warn_if_shared(path);
                }
                Ok(Some(config))
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    fn has_literal_token(&self) -> bool {
        self.server
            .as_ref()
            .and_then(|s| s.token.as_deref())
            .is_some_and(|token| !token.contains("${"))
    }

    /// Resolve into settings, reading `HUBVIEW_TOKEN` from the environment.
    pub fn resolve(
        &self,
        base_url_override: Option<&str>,
    ) -> Result<(ClientSettings, ListSettings), ConfigError> {
        let env_token = env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        self.resolve_with(base_url_override, env_token)
    }

    /// Resolve with an explicit token override (wins over the file).
    pub fn resolve_with(
        &self,
        base_url_override: Option<&str>,
        token_override: Option<String>,
    ) -> Result<(ClientSettings, ListSettings), ConfigError> {
        let server = self.server.as_ref();
        let base_url = base_url_override
            .map(str::to_string)
            .or_else(|| server.and_then(|s| s.base_url.clone()))
            .ok_or(ConfigError::MissingBaseUrl)?;
        let allow_insecure = server.is_some_and(|s| s.allow_insecure);

        let token = token_override
            .or_else(|| {
                server
                    .and_then(|s| s.token.as_deref())
                    .map(expand_env_vars)
            })
            .filter(|t| !t.is_empty())
            .map(ApiToken::new);

        let mut client = ClientSettings::new(&base_url, allow_insecure)?.with_token(token);
        if let Some(secs) = server.and_then(|s| s.timeout_seconds) {
            client = client.with_timeout(Duration::from_secs(secs));
        }

        let defaults = ListSettings::default();
        let lists = self.lists.as_ref();
        let list_settings = ListSettings::new(
            lists
                .and_then(|l| l.default_page_size)
                .unwrap_or(defaults.default_page_size()),
            lists
                .and_then(|l| l.poll_interval_ms)
                .map_or(defaults.poll_interval(), Duration::from_millis),
        )?;

        Ok((client, list_settings))
    }
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let Ok(metadata) = fs::metadata(path) else {
        return;
    };
    // Only complain about files we own; someone else's file is their call.
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid && metadata.permissions().mode() & 0o077 != 0 {
        tracing::warn!(
            path = %path.display(),
            "Config file contains a literal token and is readable by other users. \
             Consider chmod 600 or a ${{VAR}} reference."
        );
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}

/// `$HUBVIEW_CONFIG`, or `~/.hubview/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".hubview").join("config.toml"))
}
