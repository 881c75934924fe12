//! Generic framework installer: `uv add` with a fixed dependency list.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;
use windlass_core::prelude::{AnswerMap, CoreError, CoreResult, FrameworkInstaller};

use crate::process;

pub struct UvPackageInstaller {
    name: &'static str,
    packages: &'static [&'static str],
}

impl UvPackageInstaller {
    pub fn new(name: &'static str, packages: &'static [&'static str]) -> Self {
        Self { name, packages }
    }

    /// PATH with the venv's binary directory prepended, so `uv` and any
    /// tools it invokes resolve inside the project environment.
    fn env_with_venv(&self, venv: &Path) -> Vec<(String, String)> {
        let bin_dir = if cfg!(windows) { "Scripts" } else { "bin" };
        let venv_bin = venv.join(bin_dir);
        let path = std::env::var("PATH").unwrap_or_default();
        let sep = if cfg!(windows) { ";" } else { ":" };
        vec![
            ("PATH".into(), format!("{}{sep}{path}", venv_bin.display())),
            ("VIRTUAL_ENV".into(), venv.display().to_string()),
        ]
    }
}

#[async_trait]
impl FrameworkInstaller for UvPackageInstaller {
    fn name(&self) -> &str {
        self.name
    }

    async fn install(
        &self,
        project_dir: &Path,
        _answers: &AnswerMap,
        venv: Option<&Path>,
    ) -> CoreResult<()> {
        let venv = venv.ok_or_else(|| CoreError::Installer {
            name: self.name.to_string(),
            reason: "no virtual environment path provided".into(),
        })?;

        let mut args: Vec<&str> = vec!["add"];
        args.extend(self.packages);
        info!(framework = self.name, packages = self.packages.len(), "adding dependencies");

        let output = process::run_async("uv", &args, Some(project_dir), &self.env_with_venv(venv))
            .await
            .map_err(|e| CoreError::Installer {
                name: self.name.to_string(),
                reason: e.to_string(),
            })?;
        if !output.success() {
            return Err(CoreError::Installer {
                name: self.name.to_string(),
                reason: format!(
                    "uv add exited with status {}: {}",
                    output.status, output.stderr
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_venv_path_is_rejected() {
        let installer = UvPackageInstaller::new("polars", &["polars>=0.20.0"]);
        let err = installer
            .install(Path::new("/tmp/proj"), &AnswerMap::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Installer { .. }));
    }
}
