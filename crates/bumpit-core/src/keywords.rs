//! Commit message classification by keyword tiers.
//!
//! A [`KeywordSet`] holds one keyword list per [`BumpLevel`], scanned in fixed
//! priority order: major, then minor, then patch. The first keyword found as a
//! substring of the lowercased message decides the level. Messages that match
//! nothing fall back to [`BumpLevel::Patch`].
//!
//! Matching is plain substring search, so `feat` also fires inside
//! `features` or `defeat`.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::KeywordsConfig;
use crate::version::BumpLevel;

/// Environment variable overriding the major keyword list.
pub const ENV_MAJOR_WORDING: &str = "MAJOR_WORDING";
/// Environment variable overriding the minor keyword list.
pub const ENV_MINOR_WORDING: &str = "MINOR_WORDING";
/// Environment variable overriding the patch keyword list.
pub const ENV_PATCH_WORDING: &str = "PATCH_WORDING";

const DEFAULT_MAJOR: &[&str] = &["major", "breaking"];
const DEFAULT_MINOR: &[&str] = &["feature", "feat"];
const DEFAULT_PATCH: &[&str] = &["patch", "fixes", "fix", "misc", "docs", "refactor"];

/// The keyword that decided a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch<'a> {
    /// Tier the keyword belongs to.
    pub level: BumpLevel,
    /// The keyword found in the message.
    pub keyword: &'a str,
}

/// Ordered keyword tiers used to classify commit messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    tiers: Vec<(BumpLevel, Vec<String>)>,
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(
            normalize(DEFAULT_MAJOR.iter().copied()),
            normalize(DEFAULT_MINOR.iter().copied()),
            normalize(DEFAULT_PATCH.iter().copied()),
        )
    }
}

impl KeywordSet {
    /// Build a set from explicit per-tier lists.
    ///
    /// Lists are stored as given; use [`parse_list`] to normalize raw input.
    pub fn new(major: Vec<String>, minor: Vec<String>, patch: Vec<String>) -> Self {
        Self {
            tiers: vec![
                (BumpLevel::Major, major),
                (BumpLevel::Minor, minor),
                (BumpLevel::Patch, patch),
            ],
        }
    }

    /// Resolve keywords from the environment, config file and defaults.
    ///
    /// Per tier, a non-empty environment value wins over the config file list,
    /// which wins over the built-in default. `lookup` reads one environment
    /// variable; pass `|name| std::env::var(name).ok()` in production.
    #[instrument(skip_all)]
    pub fn resolve<F>(config: Option<&KeywordsConfig>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tiers = BumpLevel::PRIORITY
            .iter()
            .map(|&level| {
                let (env_name, from_config) = match level {
                    BumpLevel::Major => (ENV_MAJOR_WORDING, config.and_then(|c| c.major.as_ref())),
                    BumpLevel::Minor => (ENV_MINOR_WORDING, config.and_then(|c| c.minor.as_ref())),
                    BumpLevel::Patch => (ENV_PATCH_WORDING, config.and_then(|c| c.patch.as_ref())),
                };
                let from_env = lookup(env_name).filter(|v| !v.trim().is_empty());

                let keywords = if let Some(raw) = from_env {
                    debug!(%level, env = env_name, "keywords from environment");
                    parse_list(&raw)
                } else if let Some(list) = from_config {
                    debug!(%level, "keywords from config file");
                    normalize(list.iter().map(String::as_str))
                } else {
                    defaults.keywords(level).to_vec()
                };
                (level, keywords)
            })
            .collect();

        Self { tiers }
    }

    /// Keywords configured for one tier.
    pub fn keywords(&self, level: BumpLevel) -> &[String] {
        self.tiers
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, k)| k.as_slice())
            .unwrap_or_default()
    }

    /// Find the first keyword contained in `message`, honoring tier priority.
    ///
    /// Returns `None` when no keyword matches.
    pub fn classify_match(&self, message: &str) -> Option<KeywordMatch<'_>> {
        let message = message.to_lowercase();
        self.tiers.iter().find_map(|(level, keywords)| {
            keywords
                .iter()
                .find(|keyword| message.contains(keyword.as_str()))
                .map(|keyword| KeywordMatch {
                    level: *level,
                    keyword: keyword.as_str(),
                })
        })
    }

    /// Classify a commit message, defaulting to patch when nothing matches.
    pub fn classify(&self, message: &str) -> BumpLevel {
        self.classify_match(message)
            .map_or(BumpLevel::Patch, |m| m.level)
    }
}

/// Split a comma-separated keyword list, trimming and lowercasing entries.
///
/// Empty entries are dropped: an empty keyword would match every message.
pub fn parse_list(raw: &str) -> Vec<String> {
    normalize(raw.split(','))
}

fn normalize<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
