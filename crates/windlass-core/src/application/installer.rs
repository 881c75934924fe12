//! Framework installation dispatch.
//!
//! The dispatcher resolves which frameworks to install from the answers,
//! bootstraps the package manager first, then runs every remaining
//! installer sequentially. A failed framework installer is logged and
//! skipped; a failed bootstrap aborts the stage, because every later
//! installer depends on the package manager existing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::application::ports::FrameworkInstaller;
use crate::domain::{AnswerMap, resolve_frameworks};
use crate::error::{CoreError, CoreResult};

/// Virtual environment directory the bootstrap creates at the project root.
pub const VENV_DIR: &str = ".venv";

/// The set of framework installers known to this build, keyed by framework
/// name. Ordering is the map's key order, which keeps runs deterministic.
#[derive(Default)]
pub struct InstallerRegistry {
    installers: BTreeMap<String, Box<dyn FrameworkInstaller>>,
}

impl InstallerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, installer: Box<dyn FrameworkInstaller>) {
        self.installers.insert(installer.name().to_string(), installer);
    }

    pub fn get(&self, name: &str) -> Option<&dyn FrameworkInstaller> {
        self.installers.get(name).map(Box::as_ref)
    }

    /// Framework names an installer exists for.
    pub fn names(&self) -> Vec<&str> {
        self.installers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.installers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installers.is_empty()
    }
}

/// Outcome of one dispatch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    pub installed: Vec<String>,
    /// Framework name and failure reason, in run order.
    pub failed: Vec<(String, String)>,
    /// Selected frameworks no installer exists for.
    pub skipped: Vec<String>,
}

impl InstallSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct InstallerDispatcher {
    registry: InstallerRegistry,
}

impl InstallerDispatcher {
    pub fn new(registry: InstallerRegistry) -> Self {
        Self { registry }
    }

    /// Run the installation stage for a rendered project.
    ///
    /// `uv` runs first and without a venv path, since it is the installer
    /// that creates the venv. Everything else is handed
    /// `<project>/.venv` and runs in sorted order, continuing past
    /// individual failures.
    pub async fn dispatch(
        &self,
        project_dir: &Path,
        answers: &AnswerMap,
    ) -> CoreResult<InstallSummary> {
        let available = self.registry.names();
        let mut selected = resolve_frameworks(answers, &available);
        info!(count = selected.len(), frameworks = ?selected, "resolved framework selection");

        let mut summary = InstallSummary::default();
        if selected.is_empty() {
            return Ok(summary);
        }

        let venv: PathBuf = project_dir.join(VENV_DIR);

        if let Some(pos) = selected.iter().position(|f| f == "uv") {
            selected.remove(pos);
            info!("bootstrapping package manager");
            match self.registry.get("uv") {
                Some(uv) => {
                    // Bootstrap failure is fatal for the whole stage.
                    uv.install(project_dir, answers, None).await.map_err(|e| {
                        CoreError::Bootstrap {
                            reason: e.to_string(),
                        }
                    })?;
                    summary.installed.push("uv".into());
                }
                None => {
                    return Err(CoreError::Bootstrap {
                        reason: "no installer registered for 'uv'".into(),
                    });
                }
            }
        }

        for framework in selected {
            let Some(installer) = self.registry.get(&framework) else {
                warn!(framework, "no installer registered, skipping");
                summary.skipped.push(framework);
                continue;
            };
            info!(framework, "running installer");
            match installer.install(project_dir, answers, Some(&venv)).await {
                Ok(()) => summary.installed.push(framework),
                Err(e) => {
                    error!(framework, error = %e, "installer failed, continuing");
                    summary.failed.push((framework, e.to_string()));
                }
            }
        }

        info!(
            installed = summary.installed.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped.len(),
            "installation stage finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::INSTALL_ALL_PRESET;
    use async_trait::async_trait;
    use serde_yaml::Value;
    use std::sync::Mutex;

    struct FakeInstaller {
        name: String,
        fail: bool,
        log: std::sync::Arc<Mutex<Vec<(String, bool)>>>,
    }

    #[async_trait]
    impl FrameworkInstaller for FakeInstaller {
        fn name(&self) -> &str {
            &self.name
        }

        async fn install(
            &self,
            _project_dir: &Path,
            _answers: &AnswerMap,
            venv: Option<&Path>,
        ) -> CoreResult<()> {
            self.log
                .lock()
                .unwrap()
                .push((self.name.clone(), venv.is_some()));
            if self.fail {
                return Err(CoreError::Installer {
                    name: self.name.clone(),
                    reason: "simulated failure".into(),
                });
            }
            Ok(())
        }
    }

    fn registry_with(
        names: &[(&str, bool)],
    ) -> (InstallerRegistry, std::sync::Arc<Mutex<Vec<(String, bool)>>>) {
        let log = std::sync::Arc::new(Mutex::new(Vec::new()));
        let mut registry = InstallerRegistry::new();
        for (name, fail) in names {
            registry.register(Box::new(FakeInstaller {
                name: name.to_string(),
                fail: *fail,
                log: log.clone(),
            }));
        }
        (registry, log)
    }

    fn answers_with(pairs: &[(&str, &str)]) -> AnswerMap {
        let mut m = AnswerMap::new();
        for (k, v) in pairs {
            m.insert(*k, Value::String((*v).to_string()));
        }
        m
    }

    #[tokio::test]
    async fn uv_runs_first_and_without_a_venv_path() {
        let (registry, log) =
            registry_with(&[("ruff", false), ("uv", false), ("polars", false)]);
        let dispatcher = InstallerDispatcher::new(registry);
        let answers = answers_with(&[("complexity_preset", INSTALL_ALL_PRESET)]);

        let summary = dispatcher
            .dispatch(Path::new("/tmp/proj"), &answers)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log[0], ("uv".to_string(), false));
        for entry in &log[1..] {
            assert!(entry.1, "{} should receive the venv path", entry.0);
        }
        assert_eq!(summary.installed.len(), 3);
    }

    #[tokio::test]
    async fn bootstrap_failure_aborts_the_stage() {
        let (registry, log) = registry_with(&[("uv", true), ("ruff", false)]);
        let dispatcher = InstallerDispatcher::new(registry);
        let answers = answers_with(&[]);

        let err = dispatcher
            .dispatch(Path::new("/tmp/proj"), &answers)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Bootstrap { .. }));
        // Nothing after uv ran.
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn framework_failure_is_recorded_and_run_continues() {
        let (registry, _log) = registry_with(&[
            ("uv", false),
            ("ruff", true),
            ("polars", false),
        ]);
        let dispatcher = InstallerDispatcher::new(registry);
        let answers = answers_with(&[
            ("complexity_preset", INSTALL_ALL_PRESET),
        ]);

        let summary = dispatcher
            .dispatch(Path::new("/tmp/proj"), &answers)
            .await
            .unwrap();

        assert!(!summary.all_succeeded());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "ruff");
        assert!(summary.installed.contains(&"polars".to_string()));
    }

    #[tokio::test]
    async fn selection_is_filtered_to_registered_installers() {
        // Focus asks for fastapi and friends; only baseline is registered.
        let (registry, _log) = registry_with(&[("uv", false), ("ruff", false)]);
        let dispatcher = InstallerDispatcher::new(registry);
        let answers = answers_with(&[("integration_focus", "web_api")]);

        let summary = dispatcher
            .dispatch(Path::new("/tmp/proj"), &answers)
            .await
            .unwrap();

        assert_eq!(summary.installed, vec!["uv".to_string(), "ruff".to_string()]);
        assert!(summary.skipped.is_empty());
    }
}
