//! Builtin fallback engine.
//!
//! A minimal scaffold generator used when copier is not installed. Each
//! template is a fixed list of files with `{{key}}` placeholders; the
//! placeholders are substituted from the run data in both paths and
//! contents. Deliberately much smaller than the real templates, but the
//! output satisfies the structural checks, so a machine without copier can
//! still generate a working skeleton.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};
use windlass_core::prelude::{AnswerMap, CoreError, CoreResult, TemplateDescriptor, TemplateEngine};

/// A single scaffold file: relative path template and content template.
type ScaffoldFile = (&'static str, &'static str);

const BASE_FILES: &[ScaffoldFile] = &[
    (
        "pyproject.toml",
        r#"[project]
name = "{{project_slug}}"
version = "0.1.0"
description = "{{project_description}}"
authors = [{ name = "{{author_name}}", email = "{{author_email}}" }]
requires-python = ">={{python_version}}"
dependencies = []

[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[tool.hatch.build.targets.wheel]
packages = ["src/{{package_name}}"]

[tool.ruff]
line-length = 100
target-version = "py312"

[tool.pytest.ini_options]
testpaths = ["tests"]
"#,
    ),
    (
        "README.md",
        r#"# {{project_name}}

{{project_description}}

## Getting started

```bash
uv venv --python {{python_version}}
uv sync
uv run python -m {{package_name}}
```
"#,
    ),
    (
        ".gitignore",
        r#"__pycache__/
*.py[cod]
.venv/
.pytest_cache/
.mypy_cache/
.ruff_cache/
dist/
build/
logs/*.log
.env
"#,
    ),
    (
        "src/{{package_name}}/__init__.py",
        r#""""{{project_name}}: {{project_description}}"""

__version__ = "0.1.0"
"#,
    ),
    (
        "src/{{package_name}}/main.py",
        r#""""Application entry point for {{project_name}}."""


def main() -> None:
    print("{{project_name}} is alive")


if __name__ == "__main__":
    main()
"#,
    ),
    (
        "tests/test_main.py",
        r#"from {{package_name}}.main import main


def test_main_runs() -> None:
    main()
"#,
    ),
    (
        "docs/PROJECT-SUMMARY.md",
        r#"# {{project_name}}

**Author:** {{author_name}} <{{author_email}}>
**Python:** {{python_version}}

{{project_description}}
"#,
    ),
];

const GAME_DEV_FILES: &[ScaffoldFile] = &[
    (
        "README.md",
        r#"# {{project_name}}

{{project_description}}

A pygame project. Run the game loop with:

```bash
uv run python -m {{package_name}}.game
```
"#,
    ),
    (
        "src/{{package_name}}/game.py",
        r#""""Main game loop for {{project_name}}."""


class Game:
    def __init__(self) -> None:
        self.running = False

    def run(self) -> None:
        self.running = True
        while self.running:
            self.update()
            self.render()
            self.running = False

    def update(self) -> None:
        pass

    def render(self) -> None:
        pass
"#,
    ),
];

const AGENTIC_AI_FILES: &[ScaffoldFile] = &[
    (
        "README.md",
        r#"# {{project_name}}

{{project_description}}

A multi-agent AI project. Agent definitions live in
`src/{{package_name}}/agents.py`.
"#,
    ),
    (
        "src/{{package_name}}/agents.py",
        r#""""Agent definitions for {{project_name}}."""

from dataclasses import dataclass


@dataclass
class Agent:
    name: str
    role: str

    def run(self, task: str) -> str:
        return f"{self.name} handling: {task}"
"#,
    ),
];

const DATA_SCIENCE_FILES: &[ScaffoldFile] = &[
    (
        "README.md",
        r#"# {{project_name}}

{{project_description}}

A data pipeline project. The pipeline skeleton lives in
`src/{{package_name}}/pipeline.py`.
"#,
    ),
    (
        "src/{{package_name}}/pipeline.py",
        r#""""Data pipeline skeleton for {{project_name}}."""


def run_pipeline(source: str) -> dict:
    return {"source": source, "rows": 0}
"#,
    ),
];

#[derive(Default)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    pub fn new() -> Self {
        Self
    }

    fn files_for(template: &TemplateDescriptor) -> CoreResult<&'static [ScaffoldFile]> {
        match template.name {
            "python-modern" => Ok(BASE_FILES),
            "python-game-development" => Ok(GAME_DEV_FILES),
            "python-agentic-ai" => Ok(AGENTIC_AI_FILES),
            "python-data-science" => Ok(DATA_SCIENCE_FILES),
            other => Err(CoreError::TemplateNotFound {
                name: other.to_string(),
            }),
        }
    }
}

/// Replace every `{{key}}` occurrence with its value. Unknown placeholders
/// are left in place.
fn substitute(text: &str, data: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in data {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

impl TemplateEngine for BuiltinEngine {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn render(
        &self,
        template: &TemplateDescriptor,
        dest: &Path,
        data: &BTreeMap<String, String>,
        overwrite: bool,
    ) -> CoreResult<AnswerMap> {
        let files = Self::files_for(template)?;
        fs::create_dir_all(dest)?;
        info!(template = template.name, files = files.len(), "rendering builtin scaffold");

        for (rel_template, content_template) in files {
            let rel = substitute(rel_template, data);
            let path = dest.join(&rel);
            if path.exists() && !overwrite {
                return Err(CoreError::Render {
                    template: template.name.to_string(),
                    reason: format!("refusing to overwrite existing file {rel}"),
                });
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, substitute(content_template, data))?;
            debug!(file = rel, "scaffold file written");
        }

        Ok(AnswerMap::from_strings(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use windlass_core::prelude::TemplateCatalog;

    fn demo_data() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("project_name".to_string(), "Star Chart".to_string()),
            ("project_slug".to_string(), "star-chart".to_string()),
            ("package_name".to_string(), "star_chart".to_string()),
            ("project_description".to_string(), "Maps stars".to_string()),
            ("author_name".to_string(), "Jo".to_string()),
            ("author_email".to_string(), "jo@example.com".to_string()),
            ("python_version".to_string(), "3.12".to_string()),
        ])
    }

    #[test]
    fn base_scaffold_has_the_essential_structure() {
        let dir = tempdir().unwrap();
        let catalog = TemplateCatalog::builtin();
        let base = catalog.get("python-modern").unwrap();

        BuiltinEngine::new()
            .render(base, dir.path(), &demo_data(), false)
            .unwrap();

        assert!(dir.path().join("pyproject.toml").is_file());
        assert!(dir.path().join("src/star_chart/__init__.py").is_file());
        assert!(dir.path().join("tests/test_main.py").is_file());

        let pyproject = fs::read_to_string(dir.path().join("pyproject.toml")).unwrap();
        assert!(pyproject.contains("name = \"star-chart\""));
        assert!(pyproject.contains(">=3.12"));
    }

    #[test]
    fn overlay_overwrites_readme_when_allowed() {
        let dir = tempdir().unwrap();
        let catalog = TemplateCatalog::builtin();
        let engine = BuiltinEngine::new();
        let data = demo_data();

        engine
            .render(catalog.get("python-modern").unwrap(), dir.path(), &data, false)
            .unwrap();
        engine
            .render(
                catalog.get("python-game-development").unwrap(),
                dir.path(),
                &data,
                true,
            )
            .unwrap();

        let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.contains("pygame"));
        assert!(dir.path().join("src/star_chart/game.py").is_file());
        // Base files survive the overlay pass.
        assert!(dir.path().join("src/star_chart/main.py").is_file());
    }

    #[test]
    fn without_overwrite_existing_files_are_refused() {
        let dir = tempdir().unwrap();
        let catalog = TemplateCatalog::builtin();
        let engine = BuiltinEngine::new();
        let data = demo_data();

        engine
            .render(catalog.get("python-modern").unwrap(), dir.path(), &data, false)
            .unwrap();
        let err = engine
            .render(catalog.get("python-modern").unwrap(), dir.path(), &data, false)
            .unwrap_err();
        assert!(matches!(err, CoreError::Render { .. }));
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let data = BTreeMap::from([("known".to_string(), "v".to_string())]);
        assert_eq!(
            substitute("{{known}} and {{unknown}}", &data),
            "v and {{unknown}}"
        );
    }
}
