//! Library interface for the `bumpit` CLI.
//!
//! This crate exposes the CLI's argument parser as a library, primarily for
//! documentation generation and testing. The actual entry point is in
//! `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // detected per stream by `if_supports_color`
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    MAJOR_WORDING      Comma-separated keywords for a major bump (default: major,breaking)
    MINOR_WORDING      Comma-separated keywords for a minor bump (default: feature,feat)
    PATCH_WORDING      Comma-separated keywords for a patch bump
                       (default: patch,fixes,fix,misc,docs,refactor)
    GITHUB_OUTPUT      File to append newTag=/newVersion= outputs to
    RUST_LOG           Log filter (e.g., debug, bumpit=trace)
    BUMPIT_LOG_PATH    Explicit JSONL log file path
    BUMPIT_LOG_DIR     JSONL log directory
";

/// Command-line interface definition for bumpit.
#[derive(Parser)]
#[command(name = "bumpit")]
#[command(
    about = "Bump the package.json version from keywords in a commit message",
    long_about = None
)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// Bump arguments.
    #[command(flatten)]
    pub bump: commands::bump::BumpArgs,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, value_enum, default_value_t)]
    pub color: ColorChoice,
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
