//! Configuration loading and discovery.
//!
//! Configuration is optional: with no file present the built-in defaults
//! apply. Files are discovered by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from the XDG config directory
//! 3. Merging with defaults
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `.bumpit.<ext>` in current directory or any parent
//! - `bumpit.<ext>` in current directory or any parent
//! - `~/.config/bumpit/config.<ext>` (user config)
//!
//! Keyword lists from the environment (`MAJOR_WORDING` and friends) are
//! applied on top of whatever the files say; see
//! [`KeywordSet::resolve`](crate::keywords::KeywordSet::resolve).
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use bumpit_core::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let config = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// The configuration for bumpit.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL logs. Unset means stderr only.
    pub log_dir: Option<Utf8PathBuf>,
    /// Keyword list overrides.
    pub keywords: Option<KeywordsConfig>,
}

/// Keyword lists per bump tier.
///
/// ```toml
/// [keywords]
/// major = ["breaking", "overhaul"]
/// minor = ["feat"]
/// ```
///
/// Unset tiers keep their built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct KeywordsConfig {
    /// Keywords that trigger a major bump.
    pub major: Option<Vec<String>>,
    /// Keywords that trigger a minor bump.
    pub minor: Option<Vec<String>>,
    /// Keywords that trigger a patch bump.
    pub patch: Option<Vec<String>>,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information.
    Info,
    /// Warnings about potential issues (default, keeps CI logs quiet).
    #[default]
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Extensions probed for each candidate file, first match wins.
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Stem for config file names and the XDG directory.
const APP_NAME: &str = "bumpit";

/// Collects configuration sources and merges them with figment.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    search_from: Option<Utf8PathBuf>,
    user_config: bool,
    stop_at: Option<String>,
    extra_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// A loader that reads user config and stops discovery at `.git`.
    pub fn new() -> Self {
        Self {
            search_from: None,
            user_config: true,
            stop_at: Some(".git".to_owned()),
            extra_files: Vec::new(),
        }
    }

    /// Discover a project config file starting at `dir` and walking up.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, dir: P) -> Self {
        self.search_from = Some(dir.as_ref().to_owned());
        self
    }

    /// Toggle reading `~/.config/bumpit/config.<ext>`.
    pub const fn with_user_config(mut self, enabled: bool) -> Self {
        self.user_config = enabled;
        self
    }

    /// Stop discovery at the first directory containing `marker`.
    ///
    /// The directory containing the marker is still searched; its parents
    /// are not.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.stop_at = Some(marker.into());
        self
    }

    /// Walk all the way to the filesystem root.
    pub fn without_boundary_marker(mut self) -> Self {
        self.stop_at = None;
        self
    }

    /// Merge `path` on top of everything discovered. It must exist.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.extra_files.push(path.as_ref().to_owned());
        self
    }

    /// Merge every source into a [`Config`].
    ///
    /// Later layers win: defaults, user config, project config, then
    /// explicit files in the order they were added.
    #[tracing::instrument(skip(self), fields(search_from = ?self.search_from))]
    pub fn load(self) -> ConfigResult<Config> {
        let mut layers = Vec::new();
        if self.user_config {
            layers.extend(user_config_file());
        }
        if let Some(ref start) = self.search_from {
            layers.extend(self.project_config_file(start));
        }
        for file in &self.extra_files {
            if !file.is_file() {
                return Err(ConfigError::Missing(file.clone()));
            }
            layers.push(file.clone());
        }

        let figment = layers.iter().fold(
            Figment::from(Serialized::defaults(Config::default())),
            |figment, path| {
                tracing::debug!(%path, "merging config file");
                merge_file(figment, path)
            },
        );

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            has_keywords = config.keywords.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Closest `.bumpit.<ext>` or `bumpit.<ext>` at or above `start`.
    fn project_config_file(&self, start: &Utf8Path) -> Option<Utf8PathBuf> {
        for dir in start.ancestors() {
            let found = [format!(".{APP_NAME}"), APP_NAME.to_owned()]
                .iter()
                .flat_map(|stem| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .map(move |ext| dir.join(format!("{stem}.{ext}")))
                })
                .find(|candidate| candidate.is_file());
            if found.is_some() {
                return found;
            }

            if let Some(ref marker) = self.stop_at
                && dir.join(marker).exists()
            {
                break;
            }
        }
        None
    }
}

/// `config.<ext>` in the platform config directory, if present.
fn user_config_file() -> Option<Utf8PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| dirs.config_dir().join(format!("config.{ext}")))
        .find(|path| path.is_file())
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
}

/// Format follows the extension; anything unrecognized is read as TOML.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}
