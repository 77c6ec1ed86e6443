//! Application-level configuration loading: JSON file first, environment variables on top.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::party_store::sqlite::DEFAULT_DATABASE_URL;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "WEDDING_GAME_CONFIG_PATH";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// HTTP listening port.
    pub port: u16,
    /// `sqlite:` URL of the database.
    pub database_url: String,
    /// Directory receiving uploaded photos.
    pub upload_dir: PathBuf,
    /// Password of the admin panel.
    pub admin_password: String,
    /// Chat platform settings.
    pub line: LineSettings,
    /// Photo backup settings.
    pub archive: ArchiveSettings,
}

/// Chat platform credentials; the bot runs offline when no access token is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineSettings {
    /// Bearer token for the Messaging API.
    pub channel_access_token: Option<String>,
    /// Secret used to verify webhook signatures.
    pub channel_secret: Option<String>,
    /// Override of the Messaging API host.
    pub api_base_url: Option<String>,
}

/// Where uploaded photos are copied to; `url` wins over `dir` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArchiveSettings {
    /// Local backup directory.
    pub dir: Option<PathBuf>,
    /// Base URL of a remote backup service.
    pub url: Option<String>,
    /// Bearer token for the remote service.
    pub token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            line: LineSettings::default(),
            archive: ArchiveSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration file (falling back to defaults) and apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file(&resolve_config_path());
        config.apply_overrides(|key| env::var(key).ok());
        if config.admin_password == DEFAULT_ADMIN_PASSWORD {
            warn!("using the default admin password; set ADMIN_PASSWORD");
        }
        config
    }

    fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration file");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Overlay values found by `lookup` (the process environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(err) => warn!(%port, error = %err, "ignoring invalid PORT"),
            }
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.admin_password = password;
        }
        if let Some(token) = lookup("LINE_CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = Some(token);
        }
        if let Some(secret) = lookup("LINE_CHANNEL_SECRET") {
            self.line.channel_secret = Some(secret);
        }
        if let Some(url) = lookup("LINE_API_BASE_URL") {
            self.line.api_base_url = Some(url);
        }
        if let Some(dir) = lookup("ARCHIVE_DIR") {
            self.archive.dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("ARCHIVE_URL") {
            self.archive.url = Some(url);
        }
        if let Some(token) = lookup("ARCHIVE_TOKEN") {
            self.archive.token = Some(token);
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
