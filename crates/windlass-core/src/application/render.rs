//! Template rendering: base first, overlay on top, answers merged.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::application::ports::TemplateEngine;
use crate::domain::{ANSWERS_FILE, AnswerMap, ProjectConfig, TemplateCatalog};
use crate::error::{CoreError, CoreResult};

/// Drives the templating engine and owns the base/overlay protocol.
pub struct RenderService<'a> {
    engine: &'a dyn TemplateEngine,
    catalog: &'a TemplateCatalog,
}

impl<'a> RenderService<'a> {
    pub fn new(engine: &'a dyn TemplateEngine, catalog: &'a TemplateCatalog) -> Self {
        Self { engine, catalog }
    }

    /// Render the configured template into `config.target_dir`.
    ///
    /// For a base template this is a single engine run. For an overlay the
    /// base renders first, then the overlay renders with overwrite enabled
    /// and is fed the base run's answers, so both runs resolve identically.
    /// The merged answers are written to the sidecar file and returned.
    pub fn render(&self, config: &ProjectConfig) -> CoreResult<AnswerMap> {
        let descriptor = self.catalog.get(&config.template)?;
        let dest = &config.target_dir;
        let data = config.engine_data();

        info!(
            template = descriptor.name,
            engine = self.engine.name(),
            dest = %dest.display(),
            "rendering project"
        );

        let answers = match descriptor.base_name()? {
            None => self.engine.render(descriptor, dest, &data, false)?,
            Some(base_name) => {
                let base = self.catalog.get(base_name)?;
                debug!(base = base.name, overlay = descriptor.name, "rendering base then overlay");
                let base_answers = self.engine.render(base, dest, &data, false)?;

                // Feed the base answers back in so overlay-only keys get
                // resolved against the same inputs.
                let mut overlay_data = base_answers.to_string_map();
                overlay_data.extend(data);
                let overlay_answers =
                    self.engine.render(descriptor, dest, &overlay_data, true)?;

                base_answers.merged_with(&overlay_answers)
            }
        };

        self.create_logs_directory(dest, &config.project_name)?;
        answers.save(&dest.join(ANSWERS_FILE))?;
        info!(keys = answers.len(), "answers sidecar written");
        Ok(answers)
    }

    /// `logs/` with a `.gitkeep` so the empty directory survives git, plus
    /// a short README explaining why it exists.
    fn create_logs_directory(&self, dest: &Path, project_name: &str) -> CoreResult<()> {
        if !dest.exists() {
            return Err(CoreError::MissingDirectory {
                path: dest.to_path_buf(),
            });
        }
        let logs_dir = dest.join("logs");
        fs::create_dir_all(&logs_dir)?;
        fs::write(logs_dir.join(".gitkeep"), "")?;
        fs::write(
            logs_dir.join("README.md"),
            format!(
                "# Logs for {project_name}\n\n\
                 This directory holds application logs. It is listed in `.gitignore`\n\
                 so log files are never committed; the `.gitkeep` file keeps the\n\
                 empty directory tracked.\n"
            ),
        )?;
        debug!("logs directory created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemoteOptions;
    use serde_yaml::Value;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Records every render call and returns canned answers.
    struct RecordingEngine {
        calls: RefCell<Vec<(String, bool)>>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TemplateEngine for RecordingEngine {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn render(
            &self,
            template: &crate::domain::TemplateDescriptor,
            dest: &Path,
            data: &BTreeMap<String, String>,
            overwrite: bool,
        ) -> CoreResult<AnswerMap> {
            fs::create_dir_all(dest)?;
            self.calls
                .borrow_mut()
                .push((template.name.to_string(), overwrite));

            let mut answers = AnswerMap::from_strings(data);
            answers.insert(
                "rendered_by",
                Value::String(template.name.to_string()),
            );
            if !template.is_base {
                answers.insert("overlay_extra", Value::String("yes".into()));
            }
            Ok(answers)
        }
    }

    fn config_for(template: &str, dest: PathBuf) -> ProjectConfig {
        ProjectConfig {
            template: template.into(),
            target_dir: dest,
            project_name: "Demo Project".into(),
            project_description: "A demo".into(),
            author_name: "Jo".into(),
            author_email: "jo@example.com".into(),
            python_version: "3.12".into(),
            complexity_preset: None,
            integration_focus: None,
            remote: RemoteOptions::default(),
            skip_install: true,
        }
    }

    #[test]
    fn base_template_renders_once_without_overwrite() {
        let dir = tempdir().unwrap();
        let engine = RecordingEngine::new();
        let catalog = TemplateCatalog::builtin();
        let service = RenderService::new(&engine, &catalog);

        service
            .render(&config_for("python-modern", dir.path().join("out")))
            .unwrap();

        let calls = engine.calls.borrow();
        assert_eq!(&*calls, &[("python-modern".to_string(), false)]);
    }

    #[test]
    fn overlay_renders_base_first_then_overwrites() {
        let dir = tempdir().unwrap();
        let engine = RecordingEngine::new();
        let catalog = TemplateCatalog::builtin();
        let service = RenderService::new(&engine, &catalog);

        service
            .render(&config_for(
                "python-game-development",
                dir.path().join("out"),
            ))
            .unwrap();

        let calls = engine.calls.borrow();
        assert_eq!(
            &*calls,
            &[
                ("python-modern".to_string(), false),
                ("python-game-development".to_string(), true),
            ]
        );
    }

    #[test]
    fn merged_answers_keep_base_keys_and_overlay_wins() {
        let dir = tempdir().unwrap();
        let engine = RecordingEngine::new();
        let catalog = TemplateCatalog::builtin();
        let service = RenderService::new(&engine, &catalog);

        let answers = service
            .render(&config_for(
                "python-game-development",
                dir.path().join("out"),
            ))
            .unwrap();

        // Overlay ran last, so its value for the shared key wins.
        assert_eq!(
            answers.get_str("rendered_by"),
            Some("python-game-development")
        );
        // Overlay-only key present, base keys preserved.
        assert_eq!(answers.get_str("overlay_extra"), Some("yes"));
        assert_eq!(answers.get_str("project_slug"), Some("demo-project"));
    }

    #[test]
    fn sidecar_and_logs_directory_are_created() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let engine = RecordingEngine::new();
        let catalog = TemplateCatalog::builtin();
        let service = RenderService::new(&engine, &catalog);

        service.render(&config_for("python-modern", out.clone())).unwrap();

        assert!(out.join(ANSWERS_FILE).is_file());
        assert!(out.join("logs/.gitkeep").is_file());
        assert!(out.join("logs/README.md").is_file());
    }

    #[test]
    fn unknown_template_fails_before_any_render() {
        let dir = tempdir().unwrap();
        let engine = RecordingEngine::new();
        let catalog = TemplateCatalog::builtin();
        let service = RenderService::new(&engine, &catalog);

        let err = service
            .render(&config_for("rust-embedded", dir.path().join("out")))
            .unwrap_err();
        assert!(matches!(err, CoreError::TemplateNotFound { .. }));
        assert!(engine.calls.borrow().is_empty());
    }
}
