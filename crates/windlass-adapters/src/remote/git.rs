//! Thin wrapper over the `git` CLI, scoped to one repository.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use windlass_core::prelude::{CoreError, CoreResult};

use crate::process;

pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: &Path) -> Self {
        Self {
            repo_dir: repo_dir.to_path_buf(),
        }
    }

    fn git(&self, args: &[&str]) -> CoreResult<process::CommandOutput> {
        process::run("git", args, Some(&self.repo_dir)).map_err(|e| CoreError::Publish {
            reason: e.to_string(),
        })
    }

    fn git_checked(&self, args: &[&str]) -> CoreResult<process::CommandOutput> {
        let output = self.git(args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(CoreError::Publish {
                reason: format!("git {} failed: {}", args.join(" "), output.stderr),
            })
        }
    }

    pub fn init_if_needed(&self) -> CoreResult<()> {
        if self.repo_dir.join(".git").is_dir() {
            debug!("git repository already initialized");
            return Ok(());
        }
        self.git_checked(&["init"])?;
        info!("git repository initialized");
        Ok(())
    }

    /// Ensure `user.name` and `user.email` are set, locally if missing.
    pub fn ensure_identity(&self, name: &str, email: &str) -> CoreResult<()> {
        if !self.git(&["config", "user.name"])?.success() {
            self.git_checked(&["config", "user.name", name])?;
            debug!(name, "git user.name set");
        }
        if !self.git(&["config", "user.email"])?.success() {
            self.git_checked(&["config", "user.email", email])?;
            debug!(email, "git user.email set");
        }
        Ok(())
    }

    pub fn stage_all(&self) -> CoreResult<()> {
        self.git_checked(&["add", "-A"])?;
        Ok(())
    }

    /// Commit the index. An empty index ("nothing to commit") is not an
    /// error; a repeated publish attempt should not fail here.
    pub fn commit(&self, message: &str) -> CoreResult<()> {
        let output = self.git(&["commit", "-m", message])?;
        if output.success() {
            info!("changes committed");
            return Ok(());
        }
        let combined = format!("{}{}", output.stdout, output.stderr);
        if combined.contains("nothing to commit") {
            debug!("nothing to commit, continuing");
            return Ok(());
        }
        Err(CoreError::Publish {
            reason: format!("git commit failed: {}", output.stderr),
        })
    }

    /// Point `origin` at `url`, replacing any existing remote.
    pub fn set_origin(&self, url: &str) -> CoreResult<()> {
        // Ignore failure: origin may not exist yet.
        let _ = self.git(&["remote", "remove", "origin"]);
        self.git_checked(&["remote", "add", "origin", url])?;
        info!(url, "origin remote configured");
        Ok(())
    }

    /// Push to origin, trying `main` first and `master` as a fallback.
    pub fn push(&self) -> CoreResult<String> {
        for branch in ["main", "master"] {
            let output = self.git(&["push", "-u", "origin", branch])?;
            if output.success() {
                info!(branch, "pushed to origin");
                return Ok(branch.to_string());
            }
            warn!(branch, stderr = %output.stderr, "push failed");
        }
        Err(CoreError::Publish {
            reason: "push to origin failed for both main and master".into(),
        })
    }

    pub fn head_commit(&self) -> CoreResult<String> {
        Ok(self.git_checked(&["rev-parse", "HEAD"])?.stdout)
    }

    /// The commit `origin` has for `branch`, if the remote is reachable.
    pub fn remote_commit(&self, branch: &str) -> Option<String> {
        let output = self
            .git(&["ls-remote", "origin", &format!("refs/heads/{branch}")])
            .ok()?;
        if !output.success() || output.stdout.is_empty() {
            return None;
        }
        output
            .stdout
            .split_whitespace()
            .next()
            .map(str::to_string)
    }
}
