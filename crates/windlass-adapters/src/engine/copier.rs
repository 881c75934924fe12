//! The copier-backed engine.
//!
//! Shells out to the `copier` CLI for each template run and reads the
//! answers file it leaves in the destination. Runs are non-interactive:
//! every parameter is passed with `--data` and the rest take template
//! defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use windlass_core::domain::ENGINE_ANSWERS_FILE;
use windlass_core::prelude::{AnswerMap, CoreError, CoreResult, TemplateDescriptor, TemplateEngine};

use crate::process;

pub struct CopierCli {
    templates_root: PathBuf,
}

impl CopierCli {
    pub fn new(templates_root: PathBuf) -> Self {
        Self { templates_root }
    }

    fn template_path(&self, template: &TemplateDescriptor) -> CoreResult<PathBuf> {
        let path = self.templates_root.join(template.name);
        if !path.is_dir() {
            return Err(CoreError::MissingDirectory { path });
        }
        Ok(path)
    }
}

impl TemplateEngine for CopierCli {
    fn name(&self) -> &'static str {
        "copier"
    }

    fn render(
        &self,
        template: &TemplateDescriptor,
        dest: &Path,
        data: &BTreeMap<String, String>,
        overwrite: bool,
    ) -> CoreResult<AnswerMap> {
        let src = self.template_path(template)?;
        let src_str = src.display().to_string();
        let dest_str = dest.display().to_string();

        let mut args: Vec<String> = vec![
            "copy".into(),
            "--defaults".into(),
            "--trust".into(),
        ];
        if overwrite {
            args.push("--overwrite".into());
        }
        for (key, value) in data {
            args.push("--data".into());
            args.push(format!("{key}={value}"));
        }
        args.push(src_str);
        args.push(dest_str);

        info!(template = template.name, overwrite, "running copier");
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = process::run("copier", &arg_refs, None).map_err(|e| CoreError::Render {
            template: template.name.to_string(),
            reason: e.to_string(),
        })?;
        if !output.success() {
            return Err(CoreError::Render {
                template: template.name.to_string(),
                reason: format!("copier exited with status {}: {}", output.status, output.stderr),
            });
        }

        let answers_file = dest.join(ENGINE_ANSWERS_FILE);
        debug!(file = %answers_file.display(), "reading engine answers");
        if answers_file.is_file() {
            AnswerMap::load(&answers_file)
        } else {
            // Older copier versions only write the answers file when the
            // template records it; fall back to the data we passed in.
            Ok(AnswerMap::from_strings(data))
        }
    }
}
