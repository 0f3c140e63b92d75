//! `package.json` manifest loading and rewriting.
//!
//! The manifest is kept as an untyped JSON document so every field other
//! than `version` passes through untouched. Key order is preserved; the
//! original whitespace is not (output is always 2-space pretty JSON with a
//! trailing newline).

use std::fs;
use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// File name of the manifest inside the target folder.
pub const MANIFEST_FILE: &str = "package.json";

/// Errors from manifest operations.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest exists at the resolved path.
    #[error("{0} not found")]
    NotFound(Utf8PathBuf),

    /// The manifest could not be read or written.
    #[error("failed to {action} {path}: {source}")]
    Io {
        /// What was being attempted (`read` or `write`).
        action: &'static str,
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document could not be serialized back to JSON.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The manifest is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The manifest has no usable `version` field.
    #[error("no version field found in {0}")]
    MissingVersion(Utf8PathBuf),

    /// The `version` field exists but is not a string.
    #[error("version field in {path} is not a string: {value}")]
    VersionNotString {
        /// Manifest path.
        path: Utf8PathBuf,
        /// The offending value.
        value: Value,
    },
}

/// Result alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Resolve the manifest path for an optional target folder.
///
/// The folder is always taken relative to `root`: an empty folder means
/// `root` itself, and leading `/` or drive prefixes are ignored.
pub fn manifest_path(root: &Utf8Path, folder: &str) -> Utf8PathBuf {
    let mut path = root.to_path_buf();
    for component in Utf8Path::new(folder).components() {
        match component {
            Utf8Component::Normal(_) | Utf8Component::ParentDir => path.push(component),
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::CurDir => {}
        }
    }
    path.join(MANIFEST_FILE)
}

/// A loaded manifest document.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: Utf8PathBuf,
    document: Value,
    version: String,
}

impl Manifest {
    /// Load and validate the manifest at `path`.
    #[instrument(skip_all, fields(%path))]
    pub fn load(path: &Utf8Path) -> ManifestResult<Self> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_at(path, &content)
    }

    /// Parse manifest content that was read from `path`.
    pub fn from_str_at(path: &Utf8Path, content: &str) -> ManifestResult<Self> {
        let document: Value =
            serde_json::from_str(content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let version = match document.get("version") {
            Some(value) if is_truthy(value) => match value {
                Value::String(s) => s.clone(),
                other => {
                    return Err(ManifestError::VersionNotString {
                        path: path.to_path_buf(),
                        value: other.clone(),
                    });
                }
            },
            _ => return Err(ManifestError::MissingVersion(path.to_path_buf())),
        };

        debug!(%version, "manifest loaded");
        Ok(Self {
            path: path.to_path_buf(),
            document,
            version,
        })
    }

    /// Path the manifest was loaded from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Current `version` value.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The full JSON document.
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Replace the `version` field in memory.
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        if let Some(object) = self.document.as_object_mut() {
            object.insert("version".into(), Value::String(version.clone()));
        }
        self.version = version;
    }

    /// Serialize the document: 2-space indentation plus a trailing newline.
    pub fn render(&self) -> ManifestResult<String> {
        let mut out = serde_json::to_string_pretty(&self.document).map_err(|source| {
            ManifestError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        out.push('\n');
        Ok(out)
    }

    /// Overwrite the manifest file with the rendered document.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn save(&self) -> ManifestResult<()> {
        let content = self.render()?;
        fs::write(&self.path, content).map_err(|source| ManifestError::Io {
            action: "write",
            path: self.path.clone(),
            source,
        })?;
        debug!("manifest written");
        Ok(())
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn manifest_path_without_folder() {
        let root = Utf8Path::new("/work");
        assert_eq!(manifest_path(root, ""), Utf8Path::new("/work/package.json"));
    }

    #[test]
    fn manifest_path_with_folder() {
        let root = Utf8Path::new("/work");
        assert_eq!(
            manifest_path(root, "packages/web"),
            Utf8Path::new("/work/packages/web/package.json")
        );
    }

    #[test]
    fn manifest_path_absolute_folder_stays_under_root() {
        let root = Utf8Path::new("/work");
        assert_eq!(
            manifest_path(root, "/abs/dir"),
            Utf8Path::new("/work/abs/dir/package.json")
        );
        assert_eq!(
            manifest_path(root, "./packages/../web/"),
            Utf8Path::new("/work/packages/../web/package.json")
        );
    }

    #[test]
    fn load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(&tmp).join(MANIFEST_FILE);

        let err = Manifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound(ref p) if *p == path));
        assert!(err.to_string().contains(path.as_str()));
    }

    #[test]
    fn load_malformed_json() {
        let err = Manifest::from_str_at(Utf8Path::new("package.json"), "{ nope").unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn falsy_or_absent_version_is_missing() {
        for content in [
            r#"{"name": "app"}"#,
            r#"{"version": null}"#,
            r#"{"version": ""}"#,
            r#"{"version": false}"#,
            r#"{"version": 0}"#,
            r#"["1.2.3"]"#,
        ] {
            let err = Manifest::from_str_at(Utf8Path::new("package.json"), content).unwrap_err();
            assert!(
                matches!(err, ManifestError::MissingVersion(_)),
                "{content}: {err}"
            );
        }
    }

    #[test]
    fn non_string_version_is_rejected() {
        let err =
            Manifest::from_str_at(Utf8Path::new("package.json"), r#"{"version": 1}"#).unwrap_err();
        assert!(matches!(err, ManifestError::VersionNotString { .. }));
    }

    #[test]
    fn render_uses_two_spaces_and_trailing_newline() {
        let mut manifest = Manifest::from_str_at(
            Utf8Path::new("package.json"),
            r#"{"name":"app","version":"1.2.3","private":true}"#,
        )
        .unwrap();
        manifest.set_version("1.2.4");

        assert_eq!(
            manifest.render().unwrap(),
            "{\n  \"name\": \"app\",\n  \"version\": \"1.2.4\",\n  \"private\": true\n}\n"
        );
    }

    #[test]
    fn save_then_reload_changes_only_version() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(&tmp).join(MANIFEST_FILE);
        let original = r#"{
    "name": "app",
    "version": "1.2.3",
    "scripts": {"build": "tsc", "test": "jest"},
    "files": ["dist", "README.md"],
    "nested": {"version": "9.9.9"}
}"#;
        fs::write(&path, original).unwrap();

        let mut manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.version(), "1.2.3");
        manifest.set_version("2.0.0");
        manifest.save().unwrap();

        let reloaded = Manifest::load(&path).unwrap();
        assert_eq!(reloaded.version(), "2.0.0");

        let mut expected: Value = serde_json::from_str(original).unwrap();
        expected["version"] = Value::String("2.0.0".into());
        assert_eq!(reloaded.document(), &expected);

        let keys: Vec<&String> = reloaded.document().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "version", "scripts", "files", "nested"]);
    }
}
