//! Template catalog and the base/overlay inheritance relationship.
//!
//! Templates come in two flavours:
//!
//! - **Base** templates are self-sufficient scaffolds usable standalone.
//! - **Overlay** templates must be layered on top of a base template's
//!   output; their files overwrite same-path files from the base.
//!
//! The catalog is a static table. Resolution never derives anything at
//! runtime beyond lookup; the interesting logic (render base first, then
//! overlay with `overwrite=true`) lives in
//! [`crate::application::RenderService`].

use crate::error::{CoreError, CoreResult};

/// Description of a single template known to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    /// Directory name of the template under the templates root.
    pub name: &'static str,
    /// One-line description for `windlass list`.
    pub description: &'static str,
    /// `true` if the template can be rendered standalone.
    pub is_base: bool,
    /// Name of the base template an overlay extends. Always `None` for
    /// base templates, always `Some` for overlays.
    pub extends: Option<&'static str>,
}

impl TemplateDescriptor {
    /// The base template this descriptor ultimately renders on top of.
    ///
    /// # Errors
    /// `OverlayWithoutBase` if this is an overlay with no `extends` entry
    /// (a catalog bug, but surfaced as a proper error rather than a panic).
    pub fn base_name(&self) -> CoreResult<Option<&'static str>> {
        if self.is_base {
            return Ok(None);
        }
        match self.extends {
            Some(base) => Ok(Some(base)),
            None => Err(CoreError::OverlayWithoutBase {
                name: self.name.to_string(),
            }),
        }
    }
}

/// The static table of templates shipped with the generator.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    entries: Vec<TemplateDescriptor>,
}

impl TemplateCatalog {
    /// The built-in catalog: one base template plus three overlays.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                TemplateDescriptor {
                    name: "python-modern",
                    description: "Generic modern Python project (supports all project types)",
                    is_base: true,
                    extends: None,
                },
                TemplateDescriptor {
                    name: "python-game-development",
                    description: "Game development with Pygame (extends python-modern)",
                    is_base: false,
                    extends: Some("python-modern"),
                },
                TemplateDescriptor {
                    name: "python-agentic-ai",
                    description: "Multi-agent AI systems (extends python-modern)",
                    is_base: false,
                    extends: Some("python-modern"),
                },
                TemplateDescriptor {
                    name: "python-data-science",
                    description: "Data science with Polars and DuckDB (extends python-modern)",
                    is_base: false,
                    extends: Some("python-modern"),
                },
            ],
        }
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> CoreResult<&TemplateDescriptor> {
        self.entries
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| CoreError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// All templates, in catalog order (base first).
    pub fn entries(&self) -> &[TemplateDescriptor] {
        &self.entries
    }

    /// Names only, for error suggestions and completions.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|t| t.name).collect()
    }
}
