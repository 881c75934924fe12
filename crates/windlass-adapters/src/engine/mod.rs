//! Templating engine implementations.

mod builtin;
mod copier;

use std::path::Path;

use tracing::{debug, info};
use windlass_core::prelude::TemplateEngine;

pub use builtin::BuiltinEngine;
pub use copier::CopierCli;

/// Which engine implementation to use for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineChoice {
    /// Use copier when it is on PATH, otherwise fall back to builtin.
    #[default]
    Auto,
    Copier,
    Builtin,
}

/// Materialize the engine for `choice`.
pub fn select_engine(choice: EngineChoice, templates_root: &Path) -> Box<dyn TemplateEngine> {
    match choice {
        EngineChoice::Copier => Box::new(CopierCli::new(templates_root.to_path_buf())),
        EngineChoice::Builtin => Box::new(BuiltinEngine::new()),
        EngineChoice::Auto => {
            if which::which("copier").is_ok() {
                debug!("copier found on PATH");
                Box::new(CopierCli::new(templates_root.to_path_buf()))
            } else {
                info!("copier not found, using builtin scaffolds");
                Box::new(BuiltinEngine::new())
            }
        }
    }
}
