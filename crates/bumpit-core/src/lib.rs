//! Core library for bumpit.
//!
//! Classifies a commit message into a semver bump level by keyword, applies
//! the bump to the `version` field of a `package.json` manifest, and
//! publishes the result for CI.
//!
//! # Modules
//!
//! - [`bump`] - Bump planning and execution
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types
//! - [`keywords`] - Keyword tiers and commit message classification
//! - [`manifest`] - `package.json` loading and rewriting
//! - [`output`] - CI output channels
//! - [`version`] - Strict `X.Y.Z` parsing and bump arithmetic
//!
//! # Quick Start
//!
//! ```no_run
//! use bumpit_core::{KeywordSet, bump};
//! use camino::Utf8Path;
//!
//! let keywords = KeywordSet::resolve(None, |name| std::env::var(name).ok());
//! let plan = bump::plan_bump(Utf8Path::new("."), "", "feat: add login", &keywords, None)
//!     .expect("failed to plan bump");
//! println!("{} -> {}", plan.previous, plan.next);
//! ```
#![deny(unsafe_code)]

pub mod bump;

pub mod config;

pub mod error;

pub mod keywords;

pub mod manifest;

pub mod output;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

pub use keywords::KeywordSet;

pub use version::BumpLevel;

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
