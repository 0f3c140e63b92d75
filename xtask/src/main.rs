//! Build automation tasks for bumpit.
//!
//! - `completions` writes shell completion scripts
//! - `man` writes the `bumpit(1)` manpage
//!
//! Run `cargo xtask --help` to see available commands.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Project maintenance tasks")]
struct Xtask {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Generate shell completions for the bumpit CLI.
    Completions(commands::completions::CompletionsArgs),

    /// Generate the bumpit manpage.
    Man(commands::man::ManArgs),
}

fn main() -> Result<(), String> {
    match Xtask::parse().command {
        Task::Completions(args) => commands::completions::cmd_completions(&args),
        Task::Man(args) => commands::man::cmd_man(&args),
    }
}

/// Directory containing the workspace `Cargo.toml`.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(&manifest_dir).to_path_buf()
}
