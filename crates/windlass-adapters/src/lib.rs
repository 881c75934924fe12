//! Infrastructure adapters for the windlass pipeline.
//!
//! Everything here talks to the outside world: subprocesses (`copier`,
//! `git`, `gh`, `uv`), the GitHub REST API, and the filesystem scaffolds of
//! the builtin engine. The core crate only sees these through its ports.

pub mod engine;
pub mod installers;
pub mod process;
pub mod remote;

pub use engine::{BuiltinEngine, CopierCli, EngineChoice, select_engine};
pub use installers::builtin_registry;
pub use remote::{GitCli, PublishOutcome, RemoteRepoManager};
