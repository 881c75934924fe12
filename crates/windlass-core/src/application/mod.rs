//! Application services: the pipeline stages, in execution order.

pub mod cleanup;
pub mod installer;
pub mod ports;
pub mod render;
pub mod todos;
pub mod validator;

pub use cleanup::{ArtifactCleaner, CleanupReport};
pub use installer::{InstallSummary, InstallerDispatcher, InstallerRegistry, VENV_DIR};
pub use render::RenderService;
pub use todos::TodoGenerator;
pub use validator::{CheckOutcome, StructureValidator, ValidationReport};
