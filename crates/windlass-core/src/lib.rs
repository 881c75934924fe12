//! Windlass core - the project-generation pipeline.
//!
//! This crate holds the domain model and the application services for the
//! windlass template generator. It follows a ports-and-adapters split:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          windlass-cli (binary)          │
//! │   argument parsing, pipeline driver     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Services             │
//! │  RenderService, InstallerDispatcher,    │
//! │  ArtifactCleaner, StructureValidator,   │
//! │  TodoGenerator                          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Ports (TemplateEngine,                │
//! │   FrameworkInstaller)                   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    windlass-adapters (infrastructure)   │
//! │  CopierCli, BuiltinEngine, GitCli,      │
//! │  RemoteRepoManager, uv installers       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The pipeline itself is strictly sequential:
//! `render → install → cleanup → remote-publish → validate → generate-todos`.
//! Only the installer dispatcher is async, and only so that subprocess
//! invocations can be awaited on a single-threaded runtime - there is no
//! parallelism anywhere in a run.

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ArtifactCleaner, CleanupReport, InstallSummary, InstallerDispatcher, InstallerRegistry,
        RenderService, StructureValidator, TodoGenerator, ValidationReport,
        ports::{FrameworkInstaller, TemplateEngine},
    };
    pub use crate::domain::{
        AnswerMap, IntegrationFocus, ProjectConfig, RemoteOptions, TemplateCatalog,
        TemplateDescriptor,
    };
    pub use crate::error::{CoreError, CoreResult};
}
