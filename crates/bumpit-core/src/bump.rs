//! Version bump planning and execution.
//!
//! All orchestration logic lives here. The CLI is purely a display layer.
//!
//! # Two-phase workflow
//!
//! 1. **Plan** ([`plan_bump`]): validate the commit message, load the
//!    manifest, classify the message and compute the next version. Nothing is
//!    written.
//! 2. **Execute** ([`BumpPlan::execute`]): rewrite the manifest.
//!
//! Publishing the new version to CI ([`crate::output`]) is left to the caller
//! so that a dry run can stop after the plan.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::keywords::KeywordSet;
use crate::manifest::{self, Manifest, ManifestError};
use crate::output::ReleaseOutputs;
use crate::version::{self, BumpLevel, VersionError};

/// Errors from bump operations.
#[derive(Error, Debug)]
pub enum BumpError {
    /// No commit message was supplied.
    #[error("commit message is required")]
    MissingMessage,

    /// Loading or writing the manifest failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The current version could not be parsed or bumped.
    #[error("{path}: {source}")]
    Version {
        /// Manifest the version came from.
        path: Utf8PathBuf,
        /// Underlying version error.
        #[source]
        source: VersionError,
    },
}

/// Result alias for bump operations.
pub type BumpResult<T> = Result<T, BumpError>;

/// Why a bump level was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "keyword")]
pub enum LevelSource {
    /// A keyword in the commit message matched.
    Keyword(String),
    /// Nothing matched; patch is the fallback.
    Default,
    /// The caller forced the level.
    Forced,
}

impl fmt::Display for LevelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "matched {k:?}"),
            Self::Default => write!(f, "no keyword matched"),
            Self::Forced => write!(f, "forced"),
        }
    }
}

/// A computed bump, ready to write.
#[derive(Debug, Clone)]
pub struct BumpPlan {
    /// The loaded manifest (still holding the previous version).
    pub manifest: Manifest,
    /// Version currently in the manifest.
    pub previous: Version,
    /// Version that will be written.
    pub next: Version,
    /// Selected bump level.
    pub level: BumpLevel,
    /// How the level was selected.
    pub source: LevelSource,
}

/// Plan a version bump for the manifest under `project_root/folder`.
///
/// # Arguments
/// * `project_root`: working directory the folder is resolved against
/// * `folder`: optional sub-folder holding `package.json` (empty for root)
/// * `message`: commit message to classify
/// * `keywords`: resolved keyword tiers
/// * `forced`: if set, skips classification
#[instrument(skip_all, fields(%project_root, %folder))]
pub fn plan_bump(
    project_root: &Utf8Path,
    folder: &str,
    message: &str,
    keywords: &KeywordSet,
    forced: Option<BumpLevel>,
) -> BumpResult<BumpPlan> {
    if message.is_empty() {
        return Err(BumpError::MissingMessage);
    }

    let path = manifest::manifest_path(project_root, folder);
    let manifest = Manifest::load(&path)?;

    let version_error = |source: VersionError| BumpError::Version {
        path: path.clone(),
        source,
    };
    let previous = version::parse_version(manifest.version()).map_err(version_error)?;

    let (level, source) = match forced {
        Some(level) => (level, LevelSource::Forced),
        None => match keywords.classify_match(message) {
            Some(m) => (m.level, LevelSource::Keyword(m.keyword.to_owned())),
            None => (BumpLevel::Patch, LevelSource::Default),
        },
    };
    debug!(%level, %source, "classified commit message");

    let next = version::next_version(&previous, level).map_err(version_error)?;

    Ok(BumpPlan {
        manifest,
        previous,
        next,
        level,
        source,
    })
}

/// Result of a successful bump.
#[derive(Debug, Clone, Serialize)]
pub struct BumpOutcome {
    /// Manifest that was rewritten.
    pub manifest: Utf8PathBuf,
    /// The previous version.
    pub previous: Version,
    /// The new version.
    pub new: Version,
    /// The applied bump level.
    pub level: BumpLevel,
    /// How the level was selected.
    pub source: LevelSource,
}

impl BumpOutcome {
    /// CI outputs describing the new version.
    pub fn outputs(&self) -> ReleaseOutputs {
        ReleaseOutputs::new(&self.new)
    }
}

impl BumpPlan {
    /// Path of the manifest this plan will rewrite.
    pub fn manifest_path(&self) -> &Utf8Path {
        self.manifest.path()
    }

    /// Write the new version into the manifest.
    #[instrument(skip(self), fields(path = %self.manifest.path(), next = %self.next))]
    pub fn execute(mut self) -> BumpResult<BumpOutcome> {
        self.manifest.set_version(self.next.to_string());
        self.manifest.save()?;

        info!(previous = %self.previous, new = %self.next, level = %self.level, "bump complete");

        Ok(BumpOutcome {
            manifest: self.manifest.path().to_path_buf(),
            previous: self.previous,
            new: self.next,
            level: self.level,
            source: self.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(manifest: &str) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(root.join("package.json"), manifest).unwrap();
        (tmp, root)
    }

    fn plan(root: &Utf8Path, message: &str) -> BumpResult<BumpPlan> {
        plan_bump(root, "", message, &KeywordSet::default(), None)
    }

    #[test]
    fn scenarios_from_default_keywords() {
        let (_tmp, root) = project(r#"{"version": "1.2.3"}"#);

        for (message, level, next) in [
            ("fix: null pointer", BumpLevel::Patch, "1.2.4"),
            ("feat: add login", BumpLevel::Minor, "1.3.0"),
            ("BREAKING CHANGE: remove endpoint", BumpLevel::Major, "2.0.0"),
            ("chore: update deps", BumpLevel::Patch, "1.2.4"),
        ] {
            let plan = plan(&root, message).unwrap();
            assert_eq!(plan.level, level, "{message}");
            assert_eq!(plan.next.to_string(), next, "{message}");
        }
    }

    #[test]
    fn unmatched_message_records_default_source() {
        let (_tmp, root) = project(r#"{"version": "1.2.3"}"#);
        let plan = plan(&root, "chore: update deps").unwrap();
        assert_eq!(plan.source, LevelSource::Default);
    }

    #[test]
    fn forced_level_skips_classification() {
        let (_tmp, root) = project(r#"{"version": "1.2.3"}"#);
        let plan = plan_bump(
            &root,
            "",
            "fix: tiny",
            &KeywordSet::default(),
            Some(BumpLevel::Major),
        )
        .unwrap();
        assert_eq!(plan.next, Version::new(2, 0, 0));
        assert_eq!(plan.source, LevelSource::Forced);
    }

    #[test]
    fn empty_message_fails_before_reading_manifest() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        assert!(matches!(plan(&root, ""), Err(BumpError::MissingMessage)));
    }

    #[test]
    fn whitespace_message_is_classified_not_missing() {
        let (_tmp, root) = project(r#"{"version": "1.2.3"}"#);
        let plan = plan(&root, "   ").unwrap();
        assert_eq!(plan.source, LevelSource::Default);
        assert_eq!(plan.next, Version::new(1, 2, 4));
    }

    #[test]
    fn missing_manifest_names_path() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();

        let err = plan_bump(&root, "web", "fix", &KeywordSet::default(), None).unwrap_err();
        assert!(matches!(
            err,
            BumpError::Manifest(ManifestError::NotFound(_))
        ));
        assert!(err.to_string().contains("web/package.json"));
    }

    #[test]
    fn invalid_version_is_reported() {
        let (_tmp, root) = project(r#"{"version": "1.2"}"#);
        let err = plan(&root, "fix").unwrap_err();
        assert!(matches!(
            err,
            BumpError::Version {
                source: VersionError::InvalidFormat(_),
                ..
            }
        ));
    }

    #[test]
    fn plan_does_not_write() {
        let original = r#"{"version":"1.2.3"}"#;
        let (_tmp, root) = project(original);
        let _plan = plan(&root, "feat: x").unwrap();
        assert_eq!(
            fs::read_to_string(root.join("package.json")).unwrap(),
            original
        );
    }

    #[test]
    fn execute_rewrites_manifest_in_folder() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("packages/api")).unwrap();
        fs::write(
            root.join("packages/api/package.json"),
            r#"{"name":"api","version":"0.9.9"}"#,
        )
        .unwrap();

        let outcome = plan_bump(&root, "packages/api", "feat: v1", &KeywordSet::default(), None)
            .unwrap()
            .execute()
            .unwrap();

        assert_eq!(outcome.previous, Version::new(0, 9, 9));
        assert_eq!(outcome.new, Version::new(0, 10, 0));
        assert_eq!(outcome.outputs().new_tag, "v0.10.0");
        assert_eq!(
            fs::read_to_string(root.join("packages/api/package.json")).unwrap(),
            "{\n  \"name\": \"api\",\n  \"version\": \"0.10.0\"\n}\n"
        );
    }
}
