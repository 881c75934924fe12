//! Ports implemented by the adapters crate.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::{AnswerMap, TemplateDescriptor};
use crate::error::CoreResult;

/// A templating engine capable of expanding one template into a target
/// directory.
///
/// The engine receives only scalar data. With `overwrite` set, files the
/// template produces replace same-path files already in `dest`; this is how
/// overlays layer on top of a rendered base.
pub trait TemplateEngine {
    /// Short engine name for logs ("copier", "builtin").
    fn name(&self) -> &'static str;

    /// Render `template` into `dest` and return the answers the run
    /// resolved.
    fn render(
        &self,
        template: &TemplateDescriptor,
        dest: &Path,
        data: &BTreeMap<String, String>,
        overwrite: bool,
    ) -> CoreResult<AnswerMap>;
}

/// A single framework's installation routine.
///
/// Installers shell out to the package manager, so the trait is async; the
/// dispatcher still awaits them one at a time.
#[async_trait]
pub trait FrameworkInstaller: Send + Sync {
    /// Framework key as it appears in preset selections ("polars", "uv").
    fn name(&self) -> &str;

    /// Install the framework into the project.
    ///
    /// `venv` is the virtual environment to install into. It is `None`
    /// exactly once per run: for the package-manager bootstrap itself,
    /// which creates that environment.
    async fn install(
        &self,
        project_dir: &Path,
        answers: &AnswerMap,
        venv: Option<&Path>,
    ) -> CoreResult<()>;
}
