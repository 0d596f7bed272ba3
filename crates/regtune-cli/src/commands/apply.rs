//! Apply and refresh command implementations

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::Confirm;
use regtune_catalog::Profile;
use regtune_core::{ApplyReport, ChangeKind, PendingChange};

use crate::context::Context;
use crate::error::{CliError, Result};

/// Options of the apply command
#[derive(Debug, Clone, Default)]
pub struct ApplyArgs {
    pub profile: Option<PathBuf>,
    pub preset: Option<String>,
    pub enable: Vec<String>,
    pub disable: Vec<String>,
    pub yes: bool,
    pub restart: bool,
}

/// Run the apply command
///
/// Builds the selection (profile, then preset, then individual toggles),
/// previews the pending changes, confirms and applies.
pub fn run_apply(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let session = &ctx.session;

    if let Some(path) = &args.profile {
        let profile = Profile::load(path)?;
        let matched = session.import_profile(&profile)?;
        println!(
            "{} Imported profile: {} of {} entries matched",
            "=>".blue().bold(),
            matched,
            profile.len()
        );
    }

    if let Some(key) = &args.preset {
        match session.apply_preset(key)? {
            Some(count) => println!(
                "{} Preset {} selected {} items",
                "=>".blue().bold(),
                key.cyan(),
                count
            ),
            None => {
                return Err(CliError::user(format!(
                    "Unknown preset '{}'. Run 'regtune presets' to list them.",
                    key
                )));
            }
        }
    }

    for title in &args.enable {
        session.toggle(title, true)?;
    }
    for title in &args.disable {
        session.toggle(title, false)?;
    }

    let pending = session.pending_changes()?;
    if pending.is_empty() {
        println!("{} Nothing to change.", "OK".green().bold());
        return Ok(());
    }
    print_pending(&pending);

    if !args.yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Apply {} changes?", pending.len()))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = apply_in_background(ctx)?;
    ctx.persist()?;
    print_report(&report);

    if report.needs_restart {
        if args.restart {
            session.restart_subsystem()?;
            println!("{} Desktop shell restarted.", "OK".green().bold());
        } else {
            println!(
                "Some changes take effect after restarting the desktop shell. \
                 Re-run with {} or run {}.",
                "--restart".cyan(),
                ctx.settings.engine.restart_command.cyan()
            );
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} items failed to apply",
            report.failed.len()
        )))
    }
}

/// Drive the apply pass on a blocking worker.
fn apply_in_background(ctx: &Context) -> Result<ApplyReport> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(runtime.block_on(ctx.session.apply_in_background())?)
}

fn print_pending(pending: &[PendingChange]) {
    println!("{}", "Pending changes".bold());
    for change in pending {
        match change.kind {
            ChangeKind::Apply => println!("   {} {}", "+".green(), change.title),
            ChangeKind::Restore => println!("   {} {}", "-".red(), change.title),
        }
    }
    println!();
}

fn print_report(report: &ApplyReport) {
    println!(
        "{} Processed {} items: {} succeeded, {} failed, {} read-only skipped",
        "=>".blue().bold(),
        report.processed(),
        report.success_count.to_string().green(),
        report.failed.len().to_string().red(),
        report.skipped_display_only
    );
    for failure in &report.failed {
        println!("   {} {}", "!".red(), failure.title.yellow());
        for error in &failure.errors {
            println!("      {}", error.dimmed());
        }
    }
}

/// Run the refresh command
pub fn run_refresh(ctx: &Context) -> Result<()> {
    let applied = ctx.session.refresh()?;
    let total = ctx.session.with_catalog(|catalog| catalog.len())?;
    println!(
        "{} {} of {} items applied.",
        "OK".green().bold(),
        applied.to_string().green(),
        total
    );
    Ok(())
}
