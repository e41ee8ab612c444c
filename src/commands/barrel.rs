//! `glean barrel` command.

use std::path::Path;

use crate::barrel::{BarrelGenerator, BarrelOutcome};
use crate::config::GleanConfig;
use crate::context::ServiceContext;
use crate::error::GleanError;

/// Execute the `barrel` command.
///
/// # Errors
///
/// Returns an error if `folder` is not a directory or a barrel cannot be written.
pub fn run(ctx: &ServiceContext, config: &GleanConfig, folder: &Path) -> Result<Vec<BarrelOutcome>, GleanError> {
    println!("Scanning: {}", folder.display());
    let outcomes = BarrelGenerator::new(&config.barrel).generate(ctx.fs.as_ref(), folder)?;
    let mut updated = 0;
    for outcome in &outcomes {
        if outcome.updated {
            updated += 1;
            println!("[UPDATED] {}", outcome.path.display());
        } else {
            println!("[SKIPPED] {} (no changes)", outcome.path.display());
        }
    }
    println!("Done: {updated} updated, {} unchanged.", outcomes.len() - updated);
    Ok(outcomes)
}
