//! Resolved run configuration for a single `windlass new` invocation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remote publishing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOptions {
    /// Create and push to a GitHub repository after generation.
    pub create: bool,
    /// Create the repository as private.
    pub private: bool,
    /// Organization to create the repository under. `None` means the
    /// authenticated user's account.
    pub org: Option<String>,
}

/// Everything a single generation run needs, resolved up front from CLI
/// flags, the config file, and defaults. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Catalog name of the template to render.
    pub template: String,
    /// Directory the project is generated into.
    pub target_dir: PathBuf,
    /// Human-readable project name, as given.
    pub project_name: String,
    pub project_description: String,
    pub author_name: String,
    pub author_email: String,
    /// Python interpreter version for the virtual environment, e.g. "3.12".
    pub python_version: String,
    /// Complexity preset answer, verbatim. The admin preset switches the
    /// installer dispatcher into install-everything mode.
    pub complexity_preset: Option<String>,
    /// Integration focus preset name, e.g. "ai_first".
    pub integration_focus: Option<String>,
    pub remote: RemoteOptions,
    /// Skip the framework installation stage entirely.
    pub skip_install: bool,
}

impl ProjectConfig {
    /// Directory/repository slug: lowercased, spaces and underscores
    /// become hyphens.
    pub fn slug(&self) -> String {
        self.project_name
            .trim()
            .to_lowercase()
            .replace([' ', '_'], "-")
    }

    /// Python package name: the slug with hyphens as underscores.
    pub fn package_name(&self) -> String {
        self.slug().replace('-', "_")
    }

    /// The key → value data handed to the templating engine.
    ///
    /// Only scalars; the engine receives these as `--data key=value` pairs.
    pub fn engine_data(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        data.insert("project_name".into(), self.project_name.clone());
        data.insert("project_slug".into(), self.slug());
        data.insert("package_name".into(), self.package_name());
        data.insert(
            "project_description".into(),
            self.project_description.clone(),
        );
        data.insert("author_name".into(), self.author_name.clone());
        data.insert("author_email".into(), self.author_email.clone());
        data.insert("python_version".into(), self.python_version.clone());
        if let Some(preset) = &self.complexity_preset {
            data.insert("complexity_preset".into(), preset.clone());
        }
        if let Some(focus) = &self.integration_focus {
            data.insert("integration_focus".into(), focus.clone());
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> ProjectConfig {
        ProjectConfig {
            template: "python-modern".into(),
            target_dir: PathBuf::from("/tmp/out"),
            project_name: name.into(),
            project_description: "A test project".into(),
            author_name: "Jo Example".into(),
            author_email: "jo@example.com".into(),
            python_version: "3.12".into(),
            complexity_preset: None,
            integration_focus: None,
            remote: RemoteOptions::default(),
            skip_install: true,
        }
    }

    #[test]
    fn slug_normalizes_spaces_and_underscores() {
        assert_eq!(config("My Cool_Project").slug(), "my-cool-project");
    }

    #[test]
    fn slug_trims_whitespace() {
        assert_eq!(config("  padded  ").slug(), "padded");
    }

    #[test]
    fn package_name_uses_underscores() {
        assert_eq!(config("My Cool Project").package_name(), "my_cool_project");
    }

    #[test]
    fn engine_data_carries_derived_names() {
        let data = config("Star Chart").engine_data();
        assert_eq!(data.get("project_slug").map(String::as_str), Some("star-chart"));
        assert_eq!(data.get("package_name").map(String::as_str), Some("star_chart"));
        assert!(!data.contains_key("integration_focus"));
    }

    #[test]
    fn engine_data_includes_presets_when_set() {
        let mut cfg = config("demo");
        cfg.integration_focus = Some("ai_first".into());
        let data = cfg.engine_data();
        assert_eq!(
            data.get("integration_focus").map(String::as_str),
            Some("ai_first")
        );
    }
}
