//! Structural validation of generated projects.
//!
//! Eight filesystem-only checks, each producing a pass/warn outcome with a
//! human-readable detail line. Failures are warnings, not errors: the
//! pipeline reports them and the run still counts as generated.

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::domain::ENGINE_ANSWERS_FILE;
use crate::error::{CoreError, CoreResult};

const ESSENTIAL_FILES: &[&str] = &["pyproject.toml", "README.md", ".gitignore"];
const ESSENTIAL_DIRS: &[&str] = &["src", "tests", "docs"];
const FORBIDDEN_FILES: &[&str] = &["copier-answers.yml", ENGINE_ANSWERS_FILE];
const FORBIDDEN_DIRS: &[&str] = &["template", "template_DELETE_ME"];
const FORBIDDEN_NAME_MARKERS: &[&str] = &[".DISABLE", ".jinja.bak", "DELETE_ME"];

/// Result of one validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub details: String,
}

/// All check outcomes for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub project: String,
    pub checks: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }
}

pub struct StructureValidator;

impl StructureValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run every check against `project_dir`.
    ///
    /// `remote_requested` controls whether the git check is enforced; when
    /// the user opted out of publishing, a missing remote is not a finding.
    pub fn validate(
        &self,
        project_dir: &Path,
        remote_requested: bool,
    ) -> CoreResult<ValidationReport> {
        if !project_dir.is_dir() {
            return Err(CoreError::MissingDirectory {
                path: project_dir.to_path_buf(),
            });
        }

        info!(project = %project_dir.display(), "validating project structure");
        let checks = vec![
            check_essential_files(project_dir),
            check_essential_dirs(project_dir),
            check_forbidden_artifacts(project_dir),
            check_package_structure(project_dir),
            check_configuration(project_dir),
            check_documentation(project_dir),
            check_tests(project_dir),
            check_git(project_dir, remote_requested),
        ];

        for check in &checks {
            if check.passed {
                info!(check = check.name, "{}", check.details);
            } else {
                warn!(check = check.name, "{}", check.details);
            }
        }

        Ok(ValidationReport {
            project: project_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| project_dir.display().to_string()),
            checks,
        })
    }

    /// Write the markdown report to `logs/validation_report.md`.
    pub fn write_report(&self, project_dir: &Path, report: &ValidationReport) -> CoreResult<()> {
        let logs_dir = project_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        fs::write(logs_dir.join("validation_report.md"), render_report(report))?;
        Ok(())
    }
}

impl Default for StructureValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ── individual checks ──────────────────────────────────────────────────────

fn check_essential_files(dir: &Path) -> CheckOutcome {
    let missing: Vec<&str> = ESSENTIAL_FILES
        .iter()
        .copied()
        .filter(|f| !dir.join(f).is_file())
        .collect();
    outcome(
        "Essential Files",
        missing.is_empty(),
        if missing.is_empty() {
            format!("all essential files present ({})", ESSENTIAL_FILES.len())
        } else {
            format!("missing essential files: {}", missing.join(", "))
        },
    )
}

fn check_essential_dirs(dir: &Path) -> CheckOutcome {
    let missing: Vec<&str> = ESSENTIAL_DIRS
        .iter()
        .copied()
        .filter(|d| !dir.join(d).is_dir())
        .collect();
    outcome(
        "Essential Directories",
        missing.is_empty(),
        if missing.is_empty() {
            format!(
                "all essential directories present ({})",
                ESSENTIAL_DIRS.len()
            )
        } else {
            format!("missing essential directories: {}", missing.join(", "))
        },
    )
}

fn check_forbidden_artifacts(dir: &Path) -> CheckOutcome {
    let mut found: Vec<String> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.file_name() != std::ffi::OsStr::new(".git"))
        .filter_map(Result::ok)
    {
        let name = entry.file_name().to_string_lossy();
        let hit = (entry.file_type().is_file() && FORBIDDEN_FILES.contains(&name.as_ref()))
            || (entry.file_type().is_dir() && FORBIDDEN_DIRS.contains(&name.as_ref()))
            || FORBIDDEN_NAME_MARKERS.iter().any(|m| name.contains(m));
        if hit {
            let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            found.push(rel.display().to_string());
        }
    }
    outcome(
        "Forbidden Artifacts",
        found.is_empty(),
        if found.is_empty() {
            "no template artifacts found".to_string()
        } else {
            found.truncate(5);
            format!("template artifacts found: {}", found.join(", "))
        },
    )
}

fn check_package_structure(dir: &Path) -> CheckOutcome {
    let src = dir.join("src");
    if !src.is_dir() {
        return outcome("Python Package Structure", false, "src/ directory not found".into());
    }
    let packages: Vec<String> = match fs::read_dir(&src) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                !name.starts_with('.') && !name.starts_with("__")
            })
            .filter(|e| e.path().join("__init__.py").is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(e) => return outcome("Python Package Structure", false, format!("cannot read src/: {e}")),
    };
    outcome(
        "Python Package Structure",
        !packages.is_empty(),
        if packages.is_empty() {
            "no package with __init__.py found in src/".to_string()
        } else {
            format!("valid packages found: {}", packages.join(", "))
        },
    )
}

fn check_configuration(dir: &Path) -> CheckOutcome {
    let pyproject = dir.join("pyproject.toml");
    if !pyproject.is_file() {
        return outcome("Configuration Files", false, "pyproject.toml not found".into());
    }
    match fs::read_to_string(&pyproject) {
        Ok(text) if text.contains("[project]") => {
            let mut extras = 0;
            for name in ["ruff.toml", "mypy.ini", "pytest.ini", ".pre-commit-config.yaml"] {
                if dir.join(name).is_file() {
                    extras += 1;
                }
            }
            outcome(
                "Configuration Files",
                true,
                format!("pyproject.toml valid, {extras} additional config files"),
            )
        }
        Ok(_) => outcome(
            "Configuration Files",
            false,
            "pyproject.toml has no [project] table".into(),
        ),
        Err(e) => outcome("Configuration Files", false, format!("pyproject.toml unreadable: {e}")),
    }
}

fn check_documentation(dir: &Path) -> CheckOutcome {
    let docs = dir.join("docs");
    if !docs.is_dir() {
        return outcome("Documentation Structure", false, "docs/ directory not found".into());
    }
    let mut doc_files = 0;
    let mut planning_files = 0;
    for entry in WalkDir::new(&docs).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(".md") {
            doc_files += 1;
            if ["roadmap", "summary", "techstack", "status", "todo"]
                .iter()
                .any(|t| name.contains(t))
            {
                planning_files += 1;
            }
        }
    }
    outcome(
        "Documentation Structure",
        doc_files > 0,
        if doc_files == 0 {
            "no documentation files found in docs/".to_string()
        } else {
            format!("{doc_files} documentation files, {planning_files} planning files")
        },
    )
}

fn check_tests(dir: &Path) -> CheckOutcome {
    let tests = dir.join("tests");
    if !tests.is_dir() {
        return outcome("Testing Structure", false, "tests/ directory not found".into());
    }
    let mut test_files = 0;
    for entry in WalkDir::new(&tests).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if (name.starts_with("test_") || name.ends_with("_test.py")) && name.ends_with(".py") {
            test_files += 1;
        }
    }
    let has_config = ["conftest.py", "pytest.ini"]
        .iter()
        .any(|f| tests.join(f).is_file() || dir.join(f).is_file());
    outcome(
        "Testing Structure",
        test_files > 0 || has_config,
        if test_files == 0 && !has_config {
            "no test files or configuration found".to_string()
        } else {
            format!("{test_files} test files, config present: {has_config}")
        },
    )
}

fn check_git(dir: &Path, remote_requested: bool) -> CheckOutcome {
    if !remote_requested {
        return outcome(
            "Git Repository",
            true,
            "repository creation was skipped by user choice".into(),
        );
    }
    let git_dir = dir.join(".git");
    if !git_dir.is_dir() {
        return outcome("Git Repository", false, "git repository not initialized".into());
    }
    let mut issues: Vec<&str> = Vec::new();
    if !git_dir.join("HEAD").is_file() {
        issues.push("no HEAD found");
    }
    let has_origin = fs::read_to_string(git_dir.join("config"))
        .map(|c| c.contains("[remote \"origin\"]"))
        .unwrap_or(false);
    if !has_origin {
        issues.push("no remote 'origin' configured");
    }
    outcome(
        "Git Repository",
        issues.is_empty(),
        if issues.is_empty() {
            "git repository properly configured".to_string()
        } else {
            format!("git issues: {}", issues.join("; "))
        },
    )
}

fn outcome(name: &'static str, passed: bool, details: String) -> CheckOutcome {
    CheckOutcome {
        name,
        passed,
        details,
    }
}

// ── report rendering ───────────────────────────────────────────────────────

fn recommendation(check_name: &str) -> &'static str {
    match check_name {
        "Essential Files" => "create the missing files from the template or by hand",
        "Essential Directories" => "create the missing directories and populate them",
        "Forbidden Artifacts" => "run `windlass cleanup` to remove template artifacts",
        "Python Package Structure" => "ensure src/ contains a package with __init__.py",
        "Configuration Files" => "fix syntax errors in configuration files",
        "Documentation Structure" => "add documentation files under docs/",
        "Testing Structure" => "add test files and pytest configuration",
        "Git Repository" => "initialize git, commit, and configure the origin remote",
        _ => "review and fix the reported issue",
    }
}

fn render_report(report: &ValidationReport) -> String {
    let mut out = format!(
        "# Project Validation Report\n\n\
         **Project:** {}\n\
         **Validation Date:** {}\n\n\
         ## Results\n\n",
        report.project,
        Local::now().format("%Y-%m-%d %H:%M:%S"),
    );
    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "WARNING" };
        out.push_str(&format!(
            "### {}\n**Status:** {}\n**Details:** {}\n\n",
            check.name, status, check.details
        ));
    }
    let passed = report.passed_count();
    let total = report.checks.len();
    out.push_str(&format!(
        "## Summary\n\n\
         - **Total Checks:** {total}\n\
         - **Passed:** {passed}\n\
         - **Warnings:** {}\n\
         - **Overall:** {}\n\n",
        total - passed,
        if passed == total { "PASS" } else { "WARNINGS" },
    ));
    let failing: Vec<&CheckOutcome> = report.checks.iter().filter(|c| !c.passed).collect();
    if failing.is_empty() {
        out.push_str("All validation checks passed.\n");
    } else {
        out.push_str("## Recommendations\n\n");
        for check in failing {
            out.push_str(&format!("- **{}:** {}\n", check.name, recommendation(check.name)));
        }
    }
    out
}
