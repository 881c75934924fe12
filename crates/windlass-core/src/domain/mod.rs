//! Domain layer: pure types with no subprocess or network code.

pub mod answers;
pub mod config;
pub mod preset;
pub mod template;

pub use answers::{ANSWERS_FILE, AnswerMap, ENGINE_ANSWERS_FILE};
pub use config::{ProjectConfig, RemoteOptions};
pub use preset::{BASELINE_FRAMEWORKS, INSTALL_ALL_PRESET, IntegrationFocus, resolve_frameworks};
pub use template::{TemplateCatalog, TemplateDescriptor};
