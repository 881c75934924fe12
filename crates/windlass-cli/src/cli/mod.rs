//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "windlass",
    bin_name = "windlass",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2693} Project-template generator",
    long_about = "Windlass renders layered project templates, installs the \
                  selected framework stack, and optionally publishes the \
                  result to GitHub.",
    after_help = "EXAMPLES:\n\
        \x20 windlass new my-game --template python-game-development --yes\n\
        \x20 windlass new my-api  --template python-modern --focus web_api --github\n\
        \x20 windlass list\n\
        \x20 windlass validate ./my-game\n\
        \x20 windlass completions bash > /usr/share/bash-completion/completions/windlass",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project from a template.
    #[command(
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 windlass new my-game --template python-game-development --yes\n\
            \x20 windlass new my-agents --template python-agentic-ai --focus ai_first\n\
            \x20 windlass new my-api --github --org acme --private"
    )]
    New(NewArgs),

    /// List available templates.
    #[command(visible_alias = "ls", about = "List available templates")]
    List(ListArgs),

    /// Validate the structure of a generated project.
    #[command(
        about = "Validate a generated project",
        after_help = "EXAMPLES:\n\
            \x20 windlass validate\n\
            \x20 windlass validate ./my-game --report"
    )]
    Validate(ValidateArgs),

    /// Remove template artifacts from a project.
    #[command(
        about = "Clean template artifacts",
        after_help = "EXAMPLES:\n\
            \x20 windlass cleanup ./my-game\n\
            \x20 windlass cleanup ./my-game --dry-run"
    )]
    Cleanup(CleanupArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 windlass completions bash > ~/.local/share/bash-completion/completions/windlass\n\
            \x20 windlass completions zsh  > ~/.zfunc/_windlass"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `windlass new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name.  The directory is derived from it (lowercase,
    /// hyphenated) and created under the output directory.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Template to render.  Falls back to the config-file default, then
    /// `python-modern`.
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        help = "Template to render (default: python-modern, see `windlass list`)"
    )]
    pub template: Option<String>,

    /// One-line project description.
    #[arg(
        short = 'd',
        long = "description",
        value_name = "TEXT",
        help = "Project description"
    )]
    pub description: Option<String>,

    /// Author name for project metadata.
    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    /// Author email for project metadata.
    #[arg(long = "email", value_name = "EMAIL", help = "Author email")]
    pub email: Option<String>,

    /// Python version for the virtual environment.
    #[arg(
        long = "python",
        value_name = "VERSION",
        help = "Python version (e.g. 3.12)"
    )]
    pub python: Option<String>,

    /// Complexity preset answer, passed through to the template.
    #[arg(long = "preset", value_name = "PRESET", help = "Complexity preset")]
    pub preset: Option<String>,

    /// Integration focus, expanded into a framework selection.
    #[arg(
        long = "focus",
        value_name = "FOCUS",
        help = "Integration focus (ai_first, web_api, data_processing, full_stack)"
    )]
    pub focus: Option<String>,

    /// Output directory the project directory is created under.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory for the project (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Create a GitHub repository and push the initial commit.
    #[arg(long = "github", help = "Publish to GitHub after generation")]
    pub github: bool,

    /// Create the GitHub repository as private.
    #[arg(long = "private", requires = "github", help = "Make the repository private")]
    pub private: bool,

    /// GitHub organization to create the repository under.
    #[arg(
        long = "org",
        value_name = "ORG",
        requires = "github",
        help = "GitHub organization"
    )]
    pub org: Option<String>,

    /// Skip the framework installation stage.
    #[arg(long = "skip-install", help = "Skip framework installation")]
    pub skip_install: bool,

    /// Templating engine to use.
    #[arg(
        long = "engine",
        value_enum,
        default_value = "auto",
        help = "Templating engine"
    )]
    pub engine: Engine,

    /// Directory holding the template sources (copier engine only).
    #[arg(
        long = "templates-root",
        value_name = "DIR",
        help = "Template sources directory"
    )]
    pub templates_root: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and generate immediately")]
    pub yes: bool,

    /// Show the resolved plan without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without generating")]
    pub dry_run: bool,
}

/// Which templating engine implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Engine {
    /// Use copier when installed, the builtin scaffolds otherwise.
    #[default]
    Auto,
    /// Require the external copier CLI.
    Copier,
    /// Use the embedded scaffold generator.
    Builtin,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `windlass list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `windlass validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Project directory to validate.
    #[arg(value_name = "DIR", default_value = ".", help = "Project directory")]
    pub dir: PathBuf,

    /// Also require a configured git remote.
    #[arg(long = "require-remote", help = "Fail the git check when no remote is set")]
    pub require_remote: bool,

    /// Write the markdown report to logs/validation_report.md.
    #[arg(long = "report", help = "Write a markdown validation report")]
    pub report: bool,
}

// ── cleanup ───────────────────────────────────────────────────────────────────

/// Arguments for `windlass cleanup`.
#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Project directory to clean.
    #[arg(value_name = "DIR", default_value = ".", help = "Project directory")]
    pub dir: PathBuf,

    /// Preview what would be removed without removing it.
    #[arg(long = "dry-run", help = "Preview without removing anything")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `windlass completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "windlass",
            "new",
            "my-game",
            "--template",
            "python-game-development",
            "--yes",
        ]);
        assert!(matches!(cli.command, Commands::New(_)));
    }

    #[test]
    fn new_template_flag_is_optional() {
        let cli = Cli::parse_from(["windlass", "new", "demo"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.template, None);
        assert_eq!(args.engine, Engine::Auto);
        assert!(!args.github);
    }

    #[test]
    fn private_requires_github() {
        let result = Cli::try_parse_from(["windlass", "new", "demo", "--private"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["windlass", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_defaults_to_current_dir() {
        let cli = Cli::parse_from(["windlass", "validate"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected Validate command");
        };
        assert_eq!(args.dir, PathBuf::from("."));
    }
}
