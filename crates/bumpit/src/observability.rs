//! Observability setup: structured logging.
//!
//! Stdout belongs to progress lines and CI workflow commands, so log output
//! never goes there. Human-readable events go to stderr; when a log path or
//! directory is configured, JSON lines are also appended to a file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "BUMPIT_LOG_PATH";
const ENV_LOG_DIR: &str = "BUMPIT_LOG_DIR";
const LOG_FILE_SUFFIX: &str = ".jsonl";

/// Configuration for observability setup.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// The service name used for the default log file name.
    pub service: String,
    /// Directory for JSONL log files. No file logging if unset.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Create config from environment variables with optional overrides.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            log_dir,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    file_name: String,
}

impl LogTarget {
    #[cfg(test)]
    fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Guard that must be held for the lifetime of the application so buffered
/// file logs are flushed on exit.
pub struct ObservabilityGuard {
    _log_guard: Option<WorkerGuard>,
}

/// Initialize logging.
///
/// Returns a guard that must be held for the application lifetime.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, log_guard) = match resolve_log_target(&cfg.service, cfg.log_dir.as_deref()) {
        Ok(Some(target)) => {
            let appender = tracing_appender::rolling::never(&target.dir, &target.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Ok(None) => (None, None),
        Err(err) => {
            eprintln!("Warning: {err}. Logging to stderr only.");
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::debug!("observability initialized");

    Ok(ObservabilityGuard {
        _log_guard: log_guard,
    })
}

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

// ============================================================================
// Log Target Resolution
// ============================================================================

fn resolve_log_target(
    service: &str,
    config_log_dir: Option<&Path>,
) -> Result<Option<LogTarget>, String> {
    let path_override = std::env::var_os(ENV_LOG_PATH).map(PathBuf::from);
    let dir_override = std::env::var_os(ENV_LOG_DIR).map(PathBuf::from);

    resolve_log_target_with(
        service,
        path_override,
        dir_override,
        config_log_dir.map(PathBuf::from),
    )
}

fn resolve_log_target_with(
    service: &str,
    path_override: Option<PathBuf>,
    dir_override: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<Option<LogTarget>, String> {
    if let Some(path) = path_override {
        return log_target_from_path(&path).map(Some);
    }

    match dir_override.or(config_dir) {
        Some(dir) => log_target_from_dir(dir, service).map(Some),
        None => Ok(None),
    }
}

fn log_target_from_dir(dir: PathBuf, service: &str) -> Result<LogTarget, String> {
    let file_name = format!("{service}{LOG_FILE_SUFFIX}");
    ensure_writable(&dir, &file_name)?;
    Ok(LogTarget { dir, file_name })
}

fn log_target_from_path(path: &Path) -> Result<LogTarget, String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("{ENV_LOG_PATH} must include a file name"))?
        .to_str()
        .ok_or_else(|| format!("{ENV_LOG_PATH} must be valid UTF-8"))?
        .to_string();

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_writable(dir, &file_name)?;

    Ok(LogTarget {
        dir: dir.to_path_buf(),
        file_name,
    })
}

fn ensure_writable(dir: &Path, file_name: &str) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create log directory {}: {e}", dir.display()))?;

    let path = dir.join(file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;

    Ok(())
}
