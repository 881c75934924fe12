//! Implementation of the `windlass cleanup` command.

use windlass_core::prelude::ArtifactCleaner;

use crate::{
    cli::{CleanupArgs, global::GlobalArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: CleanupArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let cleaner = ArtifactCleaner::new()?;

    let report = if args.dry_run {
        cleaner.preview(&args.dir)?
    } else {
        cleaner.clean(&args.dir)?
    };

    if report.was_clean() {
        output.success("No template artifacts found")?;
        return Ok(());
    }

    let verb = if args.dry_run { "Would remove" } else { "Removed" };
    for dir in &report.removed_dirs {
        output.print(&format!("  {verb} directory: {}", dir.display()))?;
    }
    for file in &report.removed_files {
        output.print(&format!("  {verb} file: {}", file.display()))?;
    }
    for dir in &report.pruned_empty {
        output.print(&format!("  {verb} empty directory: {}", dir.display()))?;
    }
    for (path, reason) in &report.failed {
        output.warning(&format!("  Could not remove {}: {reason}", path.display()))?;
    }

    output.print("")?;
    output.success(&format!("{verb} {} item(s)", report.total_removed()))?;
    Ok(())
}
