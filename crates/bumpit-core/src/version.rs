//! Version parsing and bump computation.
//!
//! Versions are strictly three numeric components (`X.Y.Z`). Pre-release and
//! build-metadata suffixes are rejected rather than carried along.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from version operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    /// The version string is not three dot-separated non-negative integers.
    #[error("invalid version format: {0:?} (expected MAJOR.MINOR.PATCH)")]
    InvalidFormat(String),

    /// The bump type is not one of `major`, `minor`, `patch`.
    #[error("invalid bump type: {0:?} (expected major, minor or patch)")]
    InvalidBumpType(String),

    /// Incrementing a component would overflow.
    #[error("cannot bump {level} component of {version}: value out of range")]
    Overflow {
        /// The version being bumped.
        version: Version,
        /// The requested bump level.
        level: BumpLevel,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Semver bump level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// Patch release (x.y.Z).
    Patch,
    /// Minor release (x.Y.0).
    Minor,
    /// Major release (X.0.0).
    Major,
}

impl BumpLevel {
    /// All levels, in classification priority order (highest first).
    pub const PRIORITY: [Self; 3] = [Self::Major, Self::Minor, Self::Patch];

    /// Lowercase name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpLevel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(VersionError::InvalidBumpType(s.to_owned())),
        }
    }
}

/// Parse a strict `MAJOR.MINOR.PATCH` version string.
///
/// Each component must be a plain non-negative integer. Leading zeros are
/// accepted on input and dropped on output (`"01.2.3"` becomes `1.2.3`).
pub fn parse_version(s: &str) -> VersionResult<Version> {
    let invalid = || VersionError::InvalidFormat(s.to_owned());

    let parts: Vec<&str> = s.split('.').collect();
    let &[major, minor, patch] = parts.as_slice() else {
        return Err(invalid());
    };

    let component = |part: &str| -> VersionResult<u64> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    Ok(Version::new(
        component(major)?,
        component(minor)?,
        component(patch)?,
    ))
}

/// Compute the next version by applying a bump level.
///
/// Lower-order components reset to zero.
pub fn next_version(current: &Version, level: BumpLevel) -> VersionResult<Version> {
    let overflow = || VersionError::Overflow {
        version: current.clone(),
        level,
    };

    let next = match level {
        BumpLevel::Patch => Version::new(
            current.major,
            current.minor,
            current.patch.checked_add(1).ok_or_else(overflow)?,
        ),
        BumpLevel::Minor => Version::new(
            current.major,
            current.minor.checked_add(1).ok_or_else(overflow)?,
            0,
        ),
        BumpLevel::Major => Version::new(current.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
    };
    Ok(next)
}

/// Parse `version`, apply `level`, and render the result as `X.Y.Z`.
pub fn bump(version: &str, level: BumpLevel) -> VersionResult<String> {
    let current = parse_version(version)?;
    Ok(next_version(&current, level)?.to_string())
}
