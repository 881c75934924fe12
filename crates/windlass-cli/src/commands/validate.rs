//! Implementation of the `windlass validate` command.
//!
//! Re-runs the structure checks the pipeline performs after generation, so
//! a project can be re-checked at any later point.

use windlass_core::prelude::StructureValidator;

use crate::{
    cli::{ValidateArgs, global::GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ValidateArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let validator = StructureValidator::new();
    let report = validator.validate(&args.dir, args.require_remote)?;

    output.header(&format!("Validation: {}", report.project))?;
    for check in &report.checks {
        if check.passed {
            output.success(&format!("{}: {}", check.name, check.details))?;
        } else {
            output.warning(&format!("{}: {}", check.name, check.details))?;
        }
    }

    output.print("")?;
    output.print(&format!(
        "{}/{} checks passed",
        report.passed_count(),
        report.checks.len()
    ))?;

    if args.report {
        validator.write_report(&args.dir, &report)?;
        output.info("Report written to logs/validation_report.md")?;
    }

    if !report.passed() {
        return Err(CliError::InvalidInput {
            message: format!(
                "project structure has {} failing check(s)",
                report.checks.len() - report.passed_count()
            ),
        });
    }
    Ok(())
}
