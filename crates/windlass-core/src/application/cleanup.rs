//! Artifact cleanup for generated projects.
//!
//! Removes template leftovers and development debris so the tree is clean
//! before any git operation. Four phases: named artifact directories, named
//! artifact files, recursive forbidden patterns, then a bottom-up prune of
//! empty directories. The `.git` subtree is never touched.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::{ANSWERS_FILE, ENGINE_ANSWERS_FILE};
use crate::error::{CoreError, CoreResult};

/// Top-level directories that are always artifacts.
///
/// The virtual environment is deliberately absent: the install stage
/// creates `.venv` before cleanup runs, and it must survive.
const ARTIFACT_DIRS: &[&str] = &[
    "template",
    "template_DELETE_ME",
    "templates",
    ".template",
    "__template__",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    "node_modules",
    ".tox",
    "htmlcov",
    "dist",
    "build",
];

/// Top-level files that are always artifacts.
const ARTIFACT_FILES: &[&str] = &[
    "template.json",
    "template.yaml",
    "template.yml",
    ".template_config",
    "generator_config.json",
    "template_metadata.json",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "copier-answers.yml",
    ENGINE_ANSWERS_FILE,
    ANSWERS_FILE,
];

/// Glob patterns matched at the top level only.
const ARTIFACT_GLOBS: &[&str] = &["*.egg-info", "*.tmp", "*.temp", "*.bak", "*.orig"];

/// Patterns matched against every path in the tree.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "**/generator_*",
    "**/template_*",
    "**/*.template",
    "**/*.DISABLE*",
    "**/*.jinja.bak*",
    "**/*DELETE_ME*",
];

/// What one cleanup (or preview) pass found, removed, and failed to remove.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Removed directories, relative to the project root.
    pub removed_dirs: Vec<PathBuf>,
    /// Removed files, relative to the project root.
    pub removed_files: Vec<PathBuf>,
    /// Empty directories pruned in the final phase.
    pub pruned_empty: Vec<PathBuf>,
    /// Artifacts that could not be removed, with the failure reason.
    /// A failed item never aborts the pass.
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn total_removed(&self) -> usize {
        self.removed_dirs.len() + self.removed_files.len() + self.pruned_empty.len()
    }

    pub fn was_clean(&self) -> bool {
        self.total_removed() == 0 && self.failed.is_empty()
    }
}

pub struct ArtifactCleaner {
    forbidden: GlobSet,
    top_level: GlobSet,
}

impl ArtifactCleaner {
    pub fn new() -> CoreResult<Self> {
        Ok(Self {
            forbidden: build_globset(FORBIDDEN_PATTERNS)?,
            top_level: build_globset(ARTIFACT_GLOBS)?,
        })
    }

    /// Remove all artifacts under `project_dir` and report what was taken.
    pub fn clean(&self, project_dir: &Path) -> CoreResult<CleanupReport> {
        self.run(project_dir, false)
    }

    /// Report what `clean` would remove, without touching anything.
    pub fn preview(&self, project_dir: &Path) -> CoreResult<CleanupReport> {
        self.run(project_dir, true)
    }

    fn run(&self, project_dir: &Path, dry_run: bool) -> CoreResult<CleanupReport> {
        if !project_dir.is_dir() {
            return Err(CoreError::MissingDirectory {
                path: project_dir.to_path_buf(),
            });
        }

        info!(project = %project_dir.display(), dry_run, "cleaning template artifacts");
        let mut report = CleanupReport::default();

        self.clean_named(project_dir, dry_run, &mut report)?;
        self.clean_forbidden(project_dir, dry_run, &mut report)?;
        self.prune_empty_dirs(project_dir, dry_run, &mut report)?;

        if report.was_clean() {
            info!("no artifacts found, project already clean");
        } else {
            info!(removed = report.total_removed(), "cleanup finished");
        }
        Ok(report)
    }

    /// Phase 1 and 2: named directories and files, plus top-level globs.
    fn clean_named(
        &self,
        project_dir: &Path,
        dry_run: bool,
        report: &mut CleanupReport,
    ) -> CoreResult<()> {
        for name in ARTIFACT_DIRS {
            let path = project_dir.join(name);
            if path.is_dir() {
                remove_dir(project_dir, &path, dry_run, report);
            }
        }
        for name in ARTIFACT_FILES {
            let path = project_dir.join(name);
            if path.is_file() {
                remove_file(project_dir, &path, dry_run, report);
            }
        }

        // Top-level glob matches only; recursive patterns are phase 3.
        let entries: Vec<PathBuf> = fs::read_dir(project_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect();
        for path in entries {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if self.top_level.is_match(Path::new(file_name)) {
                if path.is_dir() {
                    remove_dir(project_dir, &path, dry_run, report);
                } else {
                    remove_file(project_dir, &path, dry_run, report);
                }
            }
        }
        Ok(())
    }

    /// Phase 3: recursive forbidden patterns, `.git` excluded.
    fn clean_forbidden(
        &self,
        project_dir: &Path,
        dry_run: bool,
        report: &mut CleanupReport,
    ) -> CoreResult<()> {
        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(project_dir)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.file_name() != std::ffi::OsStr::new(".git"))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry during cleanup");
                    continue;
                }
            };
            let rel = entry
                .path()
                .strip_prefix(project_dir)
                .unwrap_or(entry.path());
            if self.forbidden.is_match(rel) {
                matches.push(entry.path().to_path_buf());
            }
        }

        // Longest paths first so children go before their parents.
        matches.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
        for path in matches {
            if path.is_dir() {
                remove_dir(project_dir, &path, dry_run, report);
            } else if path.is_file() {
                remove_file(project_dir, &path, dry_run, report);
            }
        }
        Ok(())
    }

    /// Phase 4: bottom-up removal of directories left empty.
    fn prune_empty_dirs(
        &self,
        project_dir: &Path,
        dry_run: bool,
        report: &mut CleanupReport,
    ) -> CoreResult<()> {
        for entry in WalkDir::new(project_dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_entry(|e| e.file_name() != std::ffi::OsStr::new(".git"))
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let is_empty = fs::read_dir(entry.path())
                .map(|mut d| d.next().is_none())
                .unwrap_or(false);
            if is_empty {
                let rel = relative(project_dir, entry.path());
                debug!(dir = %rel.display(), "pruning empty directory");
                if !dry_run {
                    if let Err(e) = fs::remove_dir(entry.path()) {
                        warn!(dir = %rel.display(), error = %e, "could not prune empty directory");
                        report.failed.push((rel, e.to_string()));
                        continue;
                    }
                }
                report.pruned_empty.push(rel);
            }
        }
        Ok(())
    }
}

fn build_globset(patterns: &[&str]) -> CoreResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CoreError::Answers {
            reason: format!("invalid cleanup pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| CoreError::Answers {
        reason: format!("failed to build cleanup matcher: {e}"),
    })
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

// A failure on one item is recorded and the pass moves on; permission
// problems on template debris must never cost the user the generated
// project.

fn remove_dir(root: &Path, path: &Path, dry_run: bool, report: &mut CleanupReport) {
    let rel = relative(root, path);
    debug!(dir = %rel.display(), "removing artifact directory");
    if !dry_run {
        if let Err(e) = fs::remove_dir_all(path) {
            warn!(dir = %rel.display(), error = %e, "could not remove artifact directory");
            report.failed.push((rel, e.to_string()));
            return;
        }
    }
    report.removed_dirs.push(rel);
}

fn remove_file(root: &Path, path: &Path, dry_run: bool, report: &mut CleanupReport) {
    let rel = relative(root, path);
    debug!(file = %rel.display(), "removing artifact file");
    if !dry_run {
        if let Err(e) = fs::remove_file(path) {
            warn!(file = %rel.display(), error = %e, "could not remove artifact file");
            report.failed.push((rel, e.to_string()));
            return;
        }
    }
    report.removed_files.push(rel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn removes_named_artifact_dirs_and_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("__pycache__")).unwrap();
        fs::create_dir_all(root.join("template")).unwrap();
        touch(&root.join("template/x.jinja"));
        touch(&root.join(ENGINE_ANSWERS_FILE));
        touch(&root.join("src/keep.py"));

        let cleaner = ArtifactCleaner::new().unwrap();
        let report = cleaner.clean(root).unwrap();

        assert!(!root.join("__pycache__").exists());
        assert!(!root.join("template").exists());
        assert!(!root.join(ENGINE_ANSWERS_FILE).exists());
        assert!(root.join("src/keep.py").exists());
        assert_eq!(report.removed_dirs.len(), 2);
    }

    #[test]
    fn removes_forbidden_patterns_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("src/deep/main.py.DISABLE"));
        touch(&root.join("docs/old_DELETE_ME.md"));
        touch(&root.join("src/main.py"));

        let cleaner = ArtifactCleaner::new().unwrap();
        cleaner.clean(root).unwrap();

        assert!(!root.join("src/deep/main.py.DISABLE").exists());
        assert!(!root.join("docs/old_DELETE_ME.md").exists());
        assert!(root.join("src/main.py").exists());
    }

    #[test]
    fn prunes_directories_left_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        // Removing the only file inside leaves a nested empty chain.
        touch(&root.join("old/nested/scaffold_DELETE_ME.txt"));
        touch(&root.join("src/main.py"));

        let cleaner = ArtifactCleaner::new().unwrap();
        let report = cleaner.clean(root).unwrap();

        assert!(!root.join("old").exists());
        assert!(root.join("src").exists());
        assert!(report.pruned_empty.len() >= 2);
    }

    #[test]
    fn git_subtree_is_never_touched() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join(".git/hooks/template_post.sample"));
        fs::create_dir_all(root.join(".git/refs/heads")).unwrap();
        touch(&root.join("README.md"));

        let cleaner = ArtifactCleaner::new().unwrap();
        cleaner.clean(root).unwrap();

        assert!(root.join(".git/hooks/template_post.sample").exists());
        assert!(root.join(".git/refs/heads").exists());
    }

    #[test]
    fn preview_reports_without_removing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("__pycache__")).unwrap();
        touch(&root.join(".DS_Store"));

        let cleaner = ArtifactCleaner::new().unwrap();
        let report = cleaner.preview(root).unwrap();

        assert!(!report.was_clean());
        assert!(root.join("__pycache__").exists());
        assert!(root.join(".DS_Store").exists());
    }

    #[test]
    fn clean_tree_reports_clean_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("src/main.py"));
        touch(&root.join("README.md"));

        let cleaner = ArtifactCleaner::new().unwrap();
        let first = cleaner.clean(root).unwrap();
        let second = cleaner.clean(root).unwrap();

        assert!(first.was_clean());
        assert_eq!(first, second);
    }

    #[test]
    fn failed_removal_is_recorded_not_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("blocked")).unwrap();

        // remove_file on a directory fails at the fs layer on every
        // platform, which stands in for a permission-denied artifact.
        let mut report = CleanupReport::default();
        remove_file(root, &root.join("blocked"), false, &mut report);

        assert_eq!(report.failed.len(), 1);
        assert!(report.removed_files.is_empty());
        assert!(!report.was_clean());
        assert_eq!(report.failed[0].0, PathBuf::from("blocked"));
    }

    #[cfg(unix)]
    #[test]
    fn per_item_failure_does_not_abort_the_pass() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("locked/stale_DELETE_ME.txt"));
        touch(&root.join("template.json"));
        touch(&root.join("src/main.py"));
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users bypass the mode bits; there is no failure to
        // exercise then, so bow out after restoring the tree.
        let locked = fs::remove_file(root.join("locked/stale_DELETE_ME.txt")).is_err();
        if locked {
            let cleaner = ArtifactCleaner::new().unwrap();
            let report = cleaner.clean(root).unwrap();

            // The unrelated artifact was still removed.
            assert!(!root.join("template.json").exists());
            assert!(root.join("src/main.py").exists());
            assert!(!report.failed.is_empty());
            assert!(root.join("locked/stale_DELETE_ME.txt").exists());
        }
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn missing_project_dir_is_an_error() {
        let cleaner = ArtifactCleaner::new().unwrap();
        let err = cleaner.clean(Path::new("/nonexistent/project")).unwrap_err();
        assert!(matches!(err, CoreError::MissingDirectory { .. }));
    }
}
