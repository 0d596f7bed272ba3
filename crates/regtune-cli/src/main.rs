//! regtune CLI
//!
//! Checks, applies and restores declarative registry optimizations.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::ApplyArgs;
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    let Some(cmd) = cli.command else {
        // No command provided - show help hint
        println!("{} registry optimization manager", "regtune".green().bold());
        println!();
        println!("Run {} for available commands.", "regtune --help".cyan());
        return Ok(());
    };

    let ctx = Context::open(cli.config.as_deref(), cli.sandbox.as_deref())?;
    execute_command(&ctx, cmd)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List { class, json } => commands::run_list(ctx, class.map(Into::into), json),
        Commands::Search { query } => commands::run_search(ctx, &query),
        Commands::Presets => commands::run_presets(ctx),
        Commands::Export { file } => commands::run_export(ctx, &file),
        Commands::Apply {
            profile,
            preset,
            enable,
            disable,
            yes,
            restart,
        } => commands::run_apply(
            ctx,
            &ApplyArgs {
                profile,
                preset,
                enable,
                disable,
                yes,
                restart,
            },
        ),
        Commands::Refresh => commands::run_refresh(ctx),
    }
}
