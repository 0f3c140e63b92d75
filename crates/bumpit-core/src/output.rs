//! Machine-readable outputs for CI consumers.
//!
//! Each [`OutputChannel`] is independent: it decides for itself whether it
//! applies, and [`emit_all`] attempts every applicable channel even if an
//! earlier one failed.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use semver::Version;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable naming the step output file.
pub const ENV_OUTPUT_FILE: &str = "GITHUB_OUTPUT";

/// Errors from output emission.
#[derive(Error, Debug)]
#[error("failed to emit {channel} outputs: {source}")]
pub struct OutputError {
    /// Name of the channel that failed.
    pub channel: &'static str,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Result alias for output emission.
pub type OutputResult<T> = Result<T, OutputError>;

/// The key/value pairs published after a bump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseOutputs {
    /// Tag name, `v` + version.
    pub new_tag: String,
    /// Bare version.
    pub new_version: String,
}

impl ReleaseOutputs {
    /// Outputs for a newly bumped version.
    pub fn new(version: &Version) -> Self {
        Self {
            new_tag: format!("v{version}"),
            new_version: version.to_string(),
        }
    }

    /// Output names and values, in emission order.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            ("newTag", self.new_tag.as_str()),
            ("newVersion", self.new_version.as_str()),
        ]
    }
}

/// A destination for [`ReleaseOutputs`].
pub trait OutputChannel {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether this channel should be written in the current environment.
    fn is_applicable(&self) -> bool {
        true
    }

    /// Write the outputs.
    fn emit(&mut self, outputs: &ReleaseOutputs) -> io::Result<()>;
}

/// Legacy `::set-output name=K::V` workflow commands.
#[derive(Debug)]
pub struct WorkflowCommands<W> {
    writer: W,
}

impl<W: Write> WorkflowCommands<W> {
    /// Write workflow commands to `writer` (normally stdout).
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputChannel for WorkflowCommands<W> {
    fn name(&self) -> &'static str {
        "set-output"
    }

    fn emit(&mut self, outputs: &ReleaseOutputs) -> io::Result<()> {
        for (key, value) in outputs.pairs() {
            writeln!(self.writer, "::set-output name={key}::{value}")?;
        }
        self.writer.flush()
    }
}

/// `K=V` lines appended to the step output file.
#[derive(Debug, Clone, Default)]
pub struct OutputFile {
    path: Option<PathBuf>,
}

impl OutputFile {
    /// Append to `path`, or do nothing when `None`.
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Use the file named by [`ENV_OUTPUT_FILE`], if set and non-empty.
    pub fn from_env() -> Self {
        let path = std::env::var_os(ENV_OUTPUT_FILE)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(path)
    }
}

impl OutputChannel for OutputFile {
    fn name(&self) -> &'static str {
        "output-file"
    }

    fn is_applicable(&self) -> bool {
        self.path.is_some()
    }

    fn emit(&mut self, outputs: &ReleaseOutputs) -> io::Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for (key, value) in outputs.pairs() {
            writeln!(file, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Emit `outputs` through every applicable channel.
///
/// All channels are attempted; the first failure is returned afterwards.
pub fn emit_all(
    channels: &mut [&mut dyn OutputChannel],
    outputs: &ReleaseOutputs,
) -> OutputResult<()> {
    let mut first_error = None;

    for channel in channels.iter_mut() {
        let name = channel.name();
        if !channel.is_applicable() {
            debug!(channel = name, "output channel not applicable, skipping");
            continue;
        }

        match channel.emit(outputs) {
            Ok(()) => debug!(channel = name, "outputs emitted"),
            Err(source) => {
                warn!(channel = name, error = %source, "output emission failed");
                first_error.get_or_insert(OutputError {
                    channel: name,
                    source,
                });
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}
