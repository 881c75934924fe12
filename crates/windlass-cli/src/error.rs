//! Structured error handling for the windlass CLI.
//!
//! Errors carry user-facing suggestions and map onto process exit codes:
//!
//! | Category       | Code |
//! |----------------|------|
//! | User error     |  2   |
//! | Internal error |  1   |

use std::path::PathBuf;
use std::{error::Error, fmt::Write as _};

use owo_colors::OwoColorize;
use thiserror::Error;

use windlass_core::prelude::CoreError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Target directory already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Project name validation failed.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// A required external tool is missing from PATH.
    #[error("Required tool '{name}' not found")]
    MissingDependency { name: &'static str, hint: &'static str },

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from the pipeline.
    ///
    /// Wrapped here so the CLI can attach suggestions drawn from the core
    /// error without touching core internals.
    #[error("Generation failed: {0}")]
    Core(#[from] CoreError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by the user at the confirmation prompt.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Error categories for styling and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments, cancellation).
    UserError,
    /// Internal or system error.
    Internal,
}

impl CliError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Choose a different project name".into(),
                format!("Or remove the existing directory: rm -rf {}", path.display()),
            ],

            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{name}' is invalid: {reason}"),
                "Use letters, digits, spaces, hyphens, and underscores".into(),
                "Examples: my-game, Data Pipeline, agent_lab".into(),
            ],

            Self::MissingDependency { name, hint } => vec![
                format!("'{name}' is required for this invocation but was not found on PATH"),
                (*hint).into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file syntax (TOML)".into(),
                "Pass --config to use a different file".into(),
            ],

            Self::Core(core_err) => match core_err {
                CoreError::TemplateNotFound { name } => vec![
                    format!("No template named '{name}'"),
                    "List available templates: windlass list".into(),
                ],
                CoreError::Bootstrap { .. } => vec![
                    "The uv package manager could not be set up".into(),
                    "Install it manually: curl -LsSf https://astral.sh/uv/install.sh | sh".into(),
                    "Or re-run with --skip-install".into(),
                ],
                CoreError::Render { .. } => vec![
                    "The templating engine failed".into(),
                    "Re-run with -vv to see the engine output".into(),
                    "Or try --engine builtin for the embedded scaffolds".into(),
                ],
                _ => vec!["Re-run with -v for more detail".into()],
            },

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions and available disk space".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    /// Error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::ProjectExists { .. }
            | Self::InvalidProjectName { .. }
            | Self::Cancelled => ErrorCategory::UserError,
            Self::Core(core) => match core {
                CoreError::TemplateNotFound { .. } | CoreError::OverlayWithoutBase { .. } => {
                    ErrorCategory::UserError
                }
                _ => ErrorCategory::Internal,
            },
            Self::MissingDependency { .. }
            | Self::ConfigError { .. }
            | Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = write!(out, "\n{} {}\n\n", "\u{2717}".red().bold(), "Error:".red().bold());
        let _ = writeln!(out, "  {}", self.to_string().red());

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                let _ = writeln!(out, "  {} {}", "\u{2192}".dimmed(), err.to_string().dimmed());
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = write!(out, "\n{}\n", "Suggestions:".yellow().bold());
            for suggestion in suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let _ = write!(
                out,
                "\n{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            );
        }
        out
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = write!(out, "\nError: {self}\n");

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                let _ = writeln!(out, "  Caused by: {err}");
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                let _ = writeln!(out, "  {s}");
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }
        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }
        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn template_not_found_suggests_list() {
        let err = CliError::Core(CoreError::TemplateNotFound {
            name: "rust-embedded".into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("windlass list")));
    }

    #[test]
    fn bootstrap_failure_suggests_skip_install() {
        let err = CliError::Core(CoreError::Bootstrap {
            reason: "uv missing".into(),
        });
        assert!(err.suggestions().iter().any(|s| s.contains("--skip-install")));
    }

    #[test]
    fn missing_dependency_repeats_the_hint() {
        let err = CliError::MissingDependency {
            name: "git",
            hint: "Install git from https://git-scm.com",
        };
        assert!(err.suggestions().iter().any(|s| s.contains("git-scm.com")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn user_errors_exit_two() {
        assert_eq!(CliError::Cancelled.exit_code(), 2);
        assert_eq!(
            CliError::InvalidProjectName {
                name: "".into(),
                reason: "empty".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::Core(CoreError::TemplateNotFound { name: "x".into() }).exit_code(),
            2
        );
    }

    #[test]
    fn internal_errors_exit_one() {
        assert_eq!(
            CliError::Core(CoreError::Bootstrap { reason: "x".into() }).exit_code(),
            1
        );
        assert_eq!(
            CliError::MissingDependency {
                name: "git",
                hint: ""
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_suggestions_header() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let s = CliError::Cancelled.format_plain(true);
        assert!(!s.contains("--verbose"));
    }
}
