//! Client configuration.
//!
//! A small JSON file describes which hosted collection to talk to; the
//! `NOTESYNC_*` environment variables override it. The access token is only
//! ever read from the environment and is never written back to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{has_http_scheme, non_blank};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_API_URL: &str = "http://localhost:3377";
pub const DEFAULT_APP_ID: &str = "notesync";
pub const DEFAULT_COLLECTION: &str = "notes";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

pub const ENV_API_URL: &str = "NOTESYNC_API_URL";
pub const ENV_APP_ID: &str = "NOTESYNC_APP_ID";
pub const ENV_COLLECTION: &str = "NOTESYNC_COLLECTION";
pub const ENV_ACCESS_TOKEN: &str = "NOTESYNC_ACCESS_TOKEN";

const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("app_id", &self.app_id)
            .field("collection", &self.collection)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            app_id: default_app_id(),
            collection: default_collection(),
            poll_interval_ms: default_poll_interval_ms(),
            access_token: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_app_id() -> String {
    DEFAULT_APP_ID.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Platform config location, e.g. `~/.config/notesync/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notesync").join(CONFIG_FILE_NAME))
}

impl ClientConfig {
    /// Load the file (if any), apply environment overrides and validate.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        normalized.validate()?;
        std::fs::write(path, serde_json::to_string_pretty(&normalized)?)?;
        Ok(())
    }

    /// Apply `NOTESYNC_*` overrides using the given variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_url) = non_blank(lookup(ENV_API_URL)) {
            self.api_url = api_url;
        }
        if let Some(app_id) = non_blank(lookup(ENV_APP_ID)) {
            self.app_id = app_id;
        }
        if let Some(collection) = non_blank(lookup(ENV_COLLECTION)) {
            self.collection = collection;
        }
        if let Some(token) = non_blank(lookup(ENV_ACCESS_TOKEN)) {
            self.access_token = Some(token);
        }
        self.normalize();
    }

    pub fn validate(&self) -> Result<()> {
        if !has_http_scheme(&self.api_url) {
            return Err(Error::Config(
                "api_url must include http:// or https://".to_string(),
            ));
        }
        if self.app_id.is_empty() {
            return Err(Error::Config("app_id must not be empty".to_string()));
        }
        if self.collection.is_empty() {
            return Err(Error::Config("collection must not be empty".to_string()));
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(Error::Config(format!(
                "poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}"
            )));
        }
        Ok(())
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn normalize(&mut self) {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        self.app_id = self.app_id.trim().to_string();
        self.collection = self.collection.trim().to_string();
        self.access_token = non_blank(self.access_token.take());
    }
}
