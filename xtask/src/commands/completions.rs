use std::fs;
use std::path::PathBuf;

use clap::Args;
use clap_complete::{Shell, generate_to};

const BIN_NAME: &str = "bumpit";

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Output directory, relative to the workspace root
    #[arg(long = "out-dir", default_value = "dist/share/completions")]
    pub out_dir: PathBuf,

    /// Generate only for this shell (default: bash, zsh, fish and powershell)
    #[arg(long, value_enum)]
    pub shell: Option<Shell>,
}

pub fn cmd_completions(args: &CompletionsArgs) -> Result<(), String> {
    let out_dir = crate::workspace_root().join(&args.out_dir);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;

    let shells = args.shell.map_or_else(
        || vec![Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell],
        |shell| vec![shell],
    );

    let mut cmd = bumpit::command();
    for shell in shells {
        let path = generate_to(shell, &mut cmd, BIN_NAME, &out_dir)
            .map_err(|e| format!("{shell} completions: {e}"))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}
