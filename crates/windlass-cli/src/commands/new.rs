//! Implementation of the `windlass new` command.
//!
//! Responsibility: translate CLI arguments into a [`ProjectConfig`], drive
//! the generation pipeline stage by stage, and display results.  No stage
//! logic lives here.
//!
//! Stage order is fixed: render, install, cleanup, publish, validate, todos.
//! Only a render failure or a package-manager bootstrap failure aborts the
//! run; individual installer failures and publish failures degrade to
//! warnings so a flaky network never costs the user their generated project.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use windlass_adapters::{EngineChoice, RemoteRepoManager, builtin_registry, select_engine};
use windlass_core::prelude::{
    ArtifactCleaner, InstallerDispatcher, ProjectConfig, RemoteOptions, RenderService,
    StructureValidator, TemplateCatalog, TodoGenerator,
};

use crate::{
    cli::{Engine, NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    preflight,
};

/// Execute the `windlass new` command.
///
/// Dispatch sequence:
/// 1. Validate the name and resolve the run configuration
/// 2. Preflight checks for external tools
/// 3. Confirm with the user unless `--yes` or `--quiet`
/// 4. Early-exit if `--dry-run`
/// 5. Run the pipeline stages in order
/// 6. Print a stage-by-stage summary
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    validate_project_name(&args.name)?;

    let project = resolve_config(&args, &config)?;
    debug!(
        template = %project.template,
        target = %project.target_dir.display(),
        skip_install = project.skip_install,
        "run configuration resolved"
    );

    if project.target_dir.exists() {
        return Err(CliError::ProjectExists {
            path: project.target_dir,
        });
    }

    preflight::check(&args)?;

    // Confirm before touching the filesystem.
    if !global.quiet && !args.yes && !args.dry_run {
        show_configuration(&project, &output)?;
        if !output.confirm("Generate this project?")? {
            return Err(CliError::Cancelled);
        }
    }

    if args.dry_run {
        output.info(&format!(
            "Dry run: would generate '{}' at {}",
            project.slug(),
            project.target_dir.display()
        ))?;
        show_configuration(&project, &output)?;
        return Ok(());
    }

    // ── 1. Render ─────────────────────────────────────────────────────────
    let catalog = TemplateCatalog::builtin();
    let templates_root = resolve_templates_root(&args, &config);
    let engine = select_engine(engine_choice(args.engine), &templates_root);

    output.header(&format!("Generating '{}'...", project.slug()))?;
    info!(engine = engine.name(), template = %project.template, "render stage started");

    let renderer = RenderService::new(engine.as_ref(), &catalog);
    let answers = renderer.render(&project)?;
    output.success(&format!(
        "Rendered template '{}' ({} answers recorded)",
        project.template,
        answers.len()
    ))?;

    // ── 2. Install ────────────────────────────────────────────────────────
    if project.skip_install {
        output.info("Skipping framework installation (--skip-install)")?;
    } else {
        let dispatcher = InstallerDispatcher::new(builtin_registry());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let summary = runtime.block_on(dispatcher.dispatch(&project.target_dir, &answers))?;

        output.success(&format!(
            "Installed {} framework(s)",
            summary.installed.len()
        ))?;
        for (name, reason) in &summary.failed {
            output.warning(&format!("Installer '{name}' failed: {reason}"))?;
        }
        for name in &summary.skipped {
            output.warning(&format!("No installer for '{name}', skipped"))?;
        }
    }

    // ── 3. Cleanup ────────────────────────────────────────────────────────
    let cleaner = ArtifactCleaner::new()?;
    let report = cleaner.clean(&project.target_dir)?;
    if report.was_clean() {
        output.info("No template artifacts to remove")?;
    } else {
        output.success(&format!(
            "Removed {} template artifact(s)",
            report.total_removed()
        ))?;
        for (path, reason) in &report.failed {
            output.warning(&format!("Could not remove {}: {reason}", path.display()))?;
        }
    }

    // ── 4. Publish ────────────────────────────────────────────────────────
    if project.remote.create {
        match RemoteRepoManager::new().publish(&project.target_dir, &project) {
            Ok(outcome) => match &outcome.repo_url {
                Some(url) if outcome.verified => {
                    output.success(&format!("Published to {url} (push verified)"))?;
                }
                Some(url) => {
                    output.warning(&format!(
                        "Published to {url}, but the push could not be verified yet"
                    ))?;
                }
                None => {
                    output.warning(
                        "Repository not created automatically; see the instructions above",
                    )?;
                }
            },
            // A publish failure never undoes a generated project.
            Err(e) => {
                warn!(error = %e, "publish stage failed");
                output.warning(&format!("Publishing failed: {e}"))?;
            }
        }
    }

    // ── 5. Validate ───────────────────────────────────────────────────────
    let validator = StructureValidator::new();
    let validation = validator.validate(&project.target_dir, project.remote.create)?;
    validator.write_report(&project.target_dir, &validation)?;
    if validation.passed() {
        output.success(&format!(
            "Structure validation passed ({}/{} checks)",
            validation.passed_count(),
            validation.checks.len()
        ))?;
    } else {
        output.warning(&format!(
            "Structure validation: {}/{} checks passed (see logs/validation_report.md)",
            validation.passed_count(),
            validation.checks.len()
        ))?;
    }

    // ── 6. Sprint TODOs ───────────────────────────────────────────────────
    let todos = TodoGenerator::new().generate_all(
        &project.target_dir,
        &project.slug(),
        &project.template,
    )?;
    output.success(&format!("Generated {} sprint TODO document(s)", todos.len()))?;

    // ── Done ──────────────────────────────────────────────────────────────
    output.print("")?;
    output.success(&format!(
        "Project '{}' ready at {}",
        project.slug(),
        project.target_dir.display()
    ))?;
    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project.slug()))?;
        if !project.skip_install {
            output.print("  source .venv/bin/activate")?;
        }
        output.print("  cat docs/TODO.*.1.md")?;
    }

    Ok(())
}

// ── Configuration resolution ──────────────────────────────────────────────────

/// Merge CLI flags over config-file defaults into a run configuration.
fn resolve_config(args: &NewArgs, config: &AppConfig) -> CliResult<ProjectConfig> {
    let remote = RemoteOptions {
        create: args.github,
        private: args.private || (args.github && config.github.private),
        org: args.org.clone().or_else(|| {
            if args.github {
                config.github.org.clone()
            } else {
                None
            }
        }),
    };

    let mut project = ProjectConfig {
        template: args
            .template
            .clone()
            .unwrap_or_else(|| config.defaults.template.clone()),
        target_dir: PathBuf::new(),
        project_name: args.name.clone(),
        project_description: args
            .description
            .clone()
            .unwrap_or_else(|| format!("{} generated with windlass", args.name)),
        author_name: args
            .author
            .clone()
            .unwrap_or_else(|| config.defaults.author_name.clone()),
        author_email: args
            .email
            .clone()
            .unwrap_or_else(|| config.defaults.author_email.clone()),
        python_version: args
            .python
            .clone()
            .unwrap_or_else(|| config.defaults.python_version.clone()),
        complexity_preset: args.preset.clone(),
        integration_focus: args.focus.clone(),
        remote,
        skip_install: args.skip_install,
    };

    let parent = match &args.output {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    project.target_dir = parent.join(project.slug());

    Ok(project)
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    if name.contains('/') || name.contains('\\') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot contain path separators".into(),
        });
    }
    Ok(())
}

fn resolve_templates_root(args: &NewArgs, config: &AppConfig) -> PathBuf {
    args.templates_root
        .clone()
        .or_else(|| config.templates.root.clone())
        .unwrap_or_else(|| PathBuf::from("templates"))
}

fn engine_choice(engine: Engine) -> EngineChoice {
    match engine {
        Engine::Auto => EngineChoice::Auto,
        Engine::Copier => EngineChoice::Copier,
        Engine::Builtin => EngineChoice::Builtin,
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(project: &ProjectConfig, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:      {}", project.project_name))?;
    out.print(&format!("  Template:     {}", project.template))?;
    out.print(&format!("  Author:       {} <{}>", project.author_name, project.author_email))?;
    out.print(&format!("  Python:       {}", project.python_version))?;
    if let Some(focus) = &project.integration_focus {
        out.print(&format!("  Focus:        {focus}"))?;
    }
    if project.remote.create {
        let visibility = if project.remote.private { "private" } else { "public" };
        let owner = project.remote.org.as_deref().unwrap_or("personal account");
        out.print(&format!("  GitHub:       {visibility}, under {owner}"))?;
    }
    out.print(&format!("  Location:     {}", project.target_dir.display()))?;
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn new_args(extra: &[&str]) -> NewArgs {
        let mut argv = vec!["windlass", "new", "My Demo"];
        argv.extend_from_slice(extra);
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::New(args) => args,
            _ => unreachable!(),
        }
    }

    // ── validate_project_name ────────────────────────────────────────────

    #[test]
    fn empty_name_is_invalid() {
        assert!(matches!(
            validate_project_name("  "),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn dotfile_name_is_invalid() {
        assert!(validate_project_name(".hidden").is_err());
    }

    #[test]
    fn path_separator_in_name_is_invalid() {
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("a\\b").is_err());
    }

    #[test]
    fn valid_names_pass() {
        for name in &["my-project", "my_app", "Data Pipeline", "MyApp2"] {
            assert!(validate_project_name(name).is_ok(), "failed for: {name}");
        }
    }

    // ── resolve_config ───────────────────────────────────────────────────

    #[test]
    fn flags_override_config_defaults() {
        let args = new_args(&["--author", "Flag Author", "--python", "3.13"]);
        let cfg = AppConfig::default();
        let project = resolve_config(&args, &cfg).unwrap();
        assert_eq!(project.author_name, "Flag Author");
        assert_eq!(project.python_version, "3.13");
        // Email falls back to the config default.
        assert_eq!(project.author_email, cfg.defaults.author_email);
    }

    #[test]
    fn target_dir_is_slug_under_output() {
        let args = new_args(&["--output", "/tmp/workspace"]);
        let project = resolve_config(&args, &AppConfig::default()).unwrap();
        assert_eq!(project.target_dir, PathBuf::from("/tmp/workspace/my-demo"));
    }

    #[test]
    fn config_org_applies_only_when_publishing() {
        let mut cfg = AppConfig::default();
        cfg.github.org = Some("acme".into());

        let without = resolve_config(&new_args(&[]), &cfg).unwrap();
        assert_eq!(without.remote.org, None);

        let with = resolve_config(&new_args(&["--github"]), &cfg).unwrap();
        assert_eq!(with.remote.org.as_deref(), Some("acme"));
    }

    #[test]
    fn template_falls_back_to_the_config_default() {
        let project = resolve_config(&new_args(&[]), &AppConfig::default()).unwrap();
        assert_eq!(project.template, "python-modern");

        let mut cfg = AppConfig::default();
        cfg.defaults.template = "python-data-science".into();
        let project = resolve_config(&new_args(&[]), &cfg).unwrap();
        assert_eq!(project.template, "python-data-science");

        let flagged = new_args(&["--template", "python-agentic-ai"]);
        let project = resolve_config(&flagged, &cfg).unwrap();
        assert_eq!(project.template, "python-agentic-ai");
    }

    #[test]
    fn description_gets_a_default() {
        let project = resolve_config(&new_args(&[]), &AppConfig::default()).unwrap();
        assert!(project.project_description.contains("My Demo"));
    }

    // ── engine mapping ───────────────────────────────────────────────────

    #[test]
    fn engine_flag_maps_to_adapter_choice() {
        assert_eq!(engine_choice(Engine::Builtin), EngineChoice::Builtin);
        assert_eq!(engine_choice(Engine::Copier), EngineChoice::Copier);
        assert_eq!(engine_choice(Engine::Auto), EngineChoice::Auto);
    }
}
