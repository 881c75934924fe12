//! Core error types for the generation pipeline.
//!
//! The error taxonomy mirrors the pipeline stages. Variants are split by
//! *recoverability*, which is what the CLI layer keys its exit codes off:
//!
//! | Variant                         | Recoverable? |
//! |---------------------------------|--------------|
//! | `TemplateNotFound`              | no (config)  |
//! | `OverlayWithoutBase`            | no (config)  |
//! | `Render`                        | no           |
//! | `Answers`                       | no           |
//! | `Bootstrap`                     | no           |
//! | `Installer`                     | yes (logged, skipped) |
//! | `Publish`                       | yes (summary reflects it) |
//! | `Io`                            | depends on call-site |

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Root error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested template is not in the catalog.
    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    /// An overlay template does not declare which base it extends.
    #[error("overlay template '{name}' does not declare a base template")]
    OverlayWithoutBase { name: String },

    /// The templating engine failed while rendering a template.
    #[error("rendering template '{template}' failed: {reason}")]
    Render { template: String, reason: String },

    /// The answers sidecar could not be loaded, parsed, or written.
    #[error("answers file error: {reason}")]
    Answers { reason: String },

    /// The package-manager bootstrap failed. Unlike ordinary installer
    /// failures this halts the dispatcher, because every later installer
    /// shells out to the package manager it was supposed to provide.
    #[error("package-manager bootstrap failed: {reason}")]
    Bootstrap { reason: String },

    /// A single framework installer failed. The dispatcher logs this and
    /// continues with the remaining frameworks.
    #[error("installer '{name}' failed: {reason}")]
    Installer { name: String, reason: String },

    /// Remote publishing failed (repo creation, push, or verification).
    #[error("remote publish failed: {reason}")]
    Publish { reason: String },

    /// A directory the pipeline needs does not exist.
    #[error("directory not found: {path}")]
    MissingDirectory { path: PathBuf },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failure for the answers sidecar.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CoreError {
    /// `true` for error classes that must abort the whole run.
    ///
    /// Recoverable classes (per-installer failures, publish failures) are
    /// reported but let the pipeline continue to later stages.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Installer { .. } | Self::Publish { .. } => false,
            Self::TemplateNotFound { .. }
            | Self::OverlayWithoutBase { .. }
            | Self::Render { .. }
            | Self::Answers { .. }
            | Self::Bootstrap { .. }
            | Self::MissingDirectory { .. }
            | Self::Io(_)
            | Self::Yaml(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installer_failure_is_recoverable() {
        let err = CoreError::Installer {
            name: "polars".into(),
            reason: "exit code 1".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn bootstrap_failure_is_fatal() {
        let err = CoreError::Bootstrap {
            reason: "uv not found".into(),
        };
        assert!(err.is_fatal());
    }

    #[test]
    fn publish_failure_is_recoverable() {
        let err = CoreError::Publish {
            reason: "push rejected".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn render_failure_is_fatal() {
        let err = CoreError::Render {
            template: "python-modern".into(),
            reason: "engine exited 1".into(),
        };
        assert!(err.is_fatal());
    }
}
