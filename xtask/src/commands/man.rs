use std::fs;
use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Output directory, relative to the workspace root
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    pub out_dir: PathBuf,
}

/// bumpit has no subcommands, so a single page covers it.
pub fn cmd_man(args: &ManArgs) -> Result<(), String> {
    let out_dir = crate::workspace_root().join(&args.out_dir);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;

    let mut page: Vec<u8> = Vec::new();
    clap_mangen::Man::new(bumpit::command())
        .render(&mut page)
        .map_err(|e| format!("render manpage: {e}"))?;

    let man_path = out_dir.join("bumpit.1");
    fs::write(&man_path, page).map_err(|e| format!("{}: {e}", man_path.display()))?;
    println!("wrote {}", man_path.display());

    Ok(())
}
