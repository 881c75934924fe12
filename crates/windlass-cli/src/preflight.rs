//! Pre-run checks for external tools.
//!
//! Checks are contextual: nothing is required unless the invocation actually
//! uses it.  `copier` is needed only when that engine was requested, `git`
//! only when publishing was requested.  The `uv` package manager is *not*
//! checked here because the installer stage bootstraps it on demand.

use crate::cli::{Engine, NewArgs};
use crate::error::{CliError, CliResult};

/// Verify that the external tools this invocation needs are on PATH.
pub fn check(args: &NewArgs) -> CliResult<()> {
    if args.engine == Engine::Copier && which::which("copier").is_err() {
        return Err(CliError::MissingDependency {
            name: "copier",
            hint: "Install it with: uv tool install copier (or pipx install copier), \
                   or use --engine builtin",
        });
    }

    if args.github && which::which("git").is_err() {
        return Err(CliError::MissingDependency {
            name: "git",
            hint: "Install git from https://git-scm.com and re-run, \
                   or drop --github to skip publishing",
        });
    }

    // gh and a token are both optional: publishing falls back from the gh
    // CLI to the REST API to printed manual instructions.
    if args.github
        && which::which("gh").is_err()
        && std::env::var_os("GITHUB_TOKEN").is_none()
        && std::env::var_os("GH_TOKEN").is_none()
    {
        tracing::warn!(
            "neither the gh CLI nor GITHUB_TOKEN is available; \
             repository creation will print manual instructions"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn new_args(extra: &[&str]) -> NewArgs {
        let mut argv = vec!["windlass", "new", "demo"];
        argv.extend_from_slice(extra);
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::New(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn builtin_engine_needs_no_tools() {
        let args = new_args(&["--engine", "builtin"]);
        assert!(check(&args).is_ok());
    }

    #[test]
    fn auto_engine_needs_no_tools() {
        // Auto falls back to the builtin engine when copier is absent, so the
        // preflight never fails on it.
        let args = new_args(&[]);
        assert!(check(&args).is_ok());
    }
}
