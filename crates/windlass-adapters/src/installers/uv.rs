//! Package-manager bootstrap.
//!
//! Ensures `uv` exists (installing it with the upstream script when it
//! does not) and creates the project virtual environment. Runs before any
//! other installer; its failure aborts the installation stage.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};
use windlass_core::prelude::{AnswerMap, CoreError, CoreResult, FrameworkInstaller};

use crate::process;

const UNIX_INSTALL: &str = "curl -LsSf https://astral.sh/uv/install.sh | sh";
const WINDOWS_INSTALL: &str = "irm https://astral.sh/uv/install.ps1 | iex";

#[derive(Default)]
pub struct UvBootstrap;

impl UvBootstrap {
    pub fn new() -> Self {
        Self
    }

    async fn uv_available(&self) -> bool {
        matches!(
            process::run_async("uv", &["--version"], None, &[]).await,
            Ok(out) if out.success()
        )
    }

    async fn install_uv(&self) -> CoreResult<()> {
        let script = if cfg!(windows) {
            WINDOWS_INSTALL
        } else {
            UNIX_INSTALL
        };
        info!("installing uv with the upstream script");
        let output = process::run_shell_async(script)
            .await
            .map_err(|e| installer_err(e.to_string()))?;
        if !output.success() {
            return Err(installer_err(format!(
                "install script exited with status {}: {}",
                output.status, output.stderr
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FrameworkInstaller for UvBootstrap {
    fn name(&self) -> &str {
        "uv"
    }

    async fn install(
        &self,
        project_dir: &Path,
        answers: &AnswerMap,
        _venv: Option<&Path>,
    ) -> CoreResult<()> {
        if !self.uv_available().await {
            self.install_uv().await?;
            if !self.uv_available().await {
                // Installed but not yet on PATH; a shell restart is needed.
                warn!("uv installed but not found on PATH, skipping venv creation");
                return Err(installer_err(
                    "uv installed but not available on PATH; restart your shell and re-run"
                        .to_string(),
                ));
            }
        }

        let python_version = answers.get_str("python_version").unwrap_or("3.12");
        info!(python_version, "creating virtual environment");
        let output = process::run_async(
            "uv",
            &["venv", "--python", python_version],
            Some(project_dir),
            &[],
        )
        .await
        .map_err(|e| installer_err(e.to_string()))?;
        if !output.success() {
            return Err(installer_err(format!(
                "uv venv failed with status {}: {}",
                output.status, output.stderr
            )));
        }
        info!("virtual environment ready");
        Ok(())
    }
}

fn installer_err(reason: String) -> CoreError {
    CoreError::Installer {
        name: "uv".into(),
        reason,
    }
}
