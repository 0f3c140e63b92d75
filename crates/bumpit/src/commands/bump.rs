//! Bump command: thin CLI layer over `bumpit_core::bump`.

use anyhow::{Context, bail};
use clap::Args;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tracing::{debug, instrument};

use bumpit_core::bump::{self, BumpPlan};
use bumpit_core::config::Config;
use bumpit_core::output::{self, OutputFile, WorkflowCommands};
use bumpit_core::{BumpLevel, KeywordSet};

/// Arguments for a bump run.
#[derive(Args, Debug, Default)]
pub struct BumpArgs {
    /// Commit message to classify (may start with `-`)
    #[arg(value_name = "COMMIT_MESSAGE", allow_hyphen_values = true)]
    pub message: Option<String>,

    /// Folder containing package.json, relative to the working directory
    #[arg(value_name = "FOLDER", allow_hyphen_values = true)]
    pub folder: Option<String>,

    /// Force a bump level instead of classifying the message
    #[arg(long, value_name = "LEVEL")]
    pub bump: Option<BumpLevel>,

    /// Show what would happen without writing the manifest or emitting outputs
    #[arg(long)]
    pub dry_run: bool,
}

impl BumpArgs {
    /// Reject a missing or empty commit message before any file is touched.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.message.as_deref().is_none_or(str::is_empty) {
            bail!("commit message is required (usage: bumpit <COMMIT_MESSAGE> [FOLDER])");
        }
        Ok(())
    }
}

/// Execute a bump run.
#[instrument(name = "cmd_bump", skip_all, fields(folder = ?args.folder, dry_run = args.dry_run))]
pub fn cmd_bump(args: BumpArgs, config: &Config, cwd: &camino::Utf8Path) -> anyhow::Result<()> {
    args.validate()?;
    let message = args.message.unwrap_or_default();

    let keywords = KeywordSet::resolve(config.keywords.as_ref(), |name| std::env::var(name).ok());
    debug!(?keywords, "resolved keywords");

    let folder = args.folder.as_deref().unwrap_or_default();
    let plan = bump::plan_bump(cwd, folder, &message, &keywords, args.bump)
        .context("bump planning failed")?;

    print_plan(&plan, &message);

    if args.dry_run {
        println!(
            "{} {} → {}",
            "Would bump".if_supports_color(Stdout, |t| t.yellow()),
            plan.previous,
            plan.next.if_supports_color(Stdout, |t| t.green())
        );
        println!(
            "{}",
            "Dry run: no changes made.".if_supports_color(Stdout, |t| t.yellow())
        );
        return Ok(());
    }

    let outcome = plan.execute().context("bump failed")?;

    println!(
        "🚀 {}: {}",
        "New version".if_supports_color(Stdout, |t| t.bold()),
        outcome.new.if_supports_color(Stdout, |t| t.green())
    );
    println!(
        "✅ {}",
        "Version bumped successfully".if_supports_color(Stdout, |t| t.green())
    );

    let outputs = outcome.outputs();
    let mut commands = WorkflowCommands::new(std::io::stdout().lock());
    let mut output_file = OutputFile::from_env();
    output::emit_all(&mut [&mut commands, &mut output_file], &outputs)
        .context("failed to publish outputs")?;

    Ok(())
}

/// Progress lines describing what is about to happen.
fn print_plan(plan: &BumpPlan, message: &str) {
    let label = |text: &str| text.if_supports_color(Stdout, |t| t.bold()).to_string();

    println!(
        "📦 {}: {}",
        label("Manifest"),
        plan.manifest_path().if_supports_color(Stdout, |t| t.cyan())
    );
    println!("🏷️  {}: {}", label("Current version"), plan.previous);
    println!("📝 {}: {}", label("Commit message"), message);
    println!(
        "🔍 {}: {} {}",
        label("Bump type"),
        plan.level.if_supports_color(Stdout, |t| t.yellow()),
        format!("({})", plan.source).if_supports_color(Stdout, |t| t.dimmed())
    );
}
