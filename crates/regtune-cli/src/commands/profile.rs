//! Profile export

use std::path::Path;

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Run the export command
///
/// Writes the live selection, which after load equals the live check state.
pub fn run_export(ctx: &Context, file: &Path) -> Result<()> {
    let profile = ctx.session.export_profile()?;
    profile.save(file)?;
    println!(
        "{} Exported {} items to {}",
        "OK".green().bold(),
        profile.len(),
        file.display().to_string().cyan()
    );
    Ok(())
}
