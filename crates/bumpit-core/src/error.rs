//! Error types for bumpit-core configuration.
//!
//! Domain errors live next to their modules ([`VersionError`],
//! [`ManifestError`], [`BumpError`], [`OutputError`]).
//!
//! [`VersionError`]: crate::version::VersionError
//! [`ManifestError`]: crate::manifest::ManifestError
//! [`BumpError`]: crate::bump::BumpError
//! [`OutputError`]: crate::output::OutputError

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    Missing(Utf8PathBuf),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
