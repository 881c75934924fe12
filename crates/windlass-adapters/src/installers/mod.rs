//! Framework installers backed by the `uv` package manager.

mod packages;
mod uv;

use windlass_core::prelude::InstallerRegistry;

pub use packages::UvPackageInstaller;
pub use uv::UvBootstrap;

/// The registry shipped with this build: the `uv` bootstrap plus one
/// package installer per supported framework.
pub fn builtin_registry() -> InstallerRegistry {
    let mut registry = InstallerRegistry::new();
    registry.register(Box::new(UvBootstrap::new()));
    registry.register(Box::new(UvPackageInstaller::new(
        "ruff",
        &["ruff>=0.4.0", "mypy>=1.10.0", "pre-commit>=3.7.0"],
    )));
    registry.register(Box::new(UvPackageInstaller::new(
        "pydantic_ai",
        &["pydantic-ai>=0.1.0", "openai>=1.12.0", "pydantic>=2.0"],
    )));
    registry.register(Box::new(UvPackageInstaller::new(
        "crew_ai",
        &[
            "crewai>=0.28.8",
            "crewai-tools>=0.1.6",
            "langchain-community>=0.0.29",
            "python-dotenv>=1.0.0",
        ],
    )));
    registry.register(Box::new(UvPackageInstaller::new(
        "fastapi",
        &[
            "fastapi>=0.104.0",
            "uvicorn[standard]>=0.24.0",
            "pydantic[email]>=2.0",
            "pydantic-settings>=2.0.0",
        ],
    )));
    registry.register(Box::new(UvPackageInstaller::new(
        "polars",
        &["polars[all]>=0.20.0", "pyarrow>=15.0.0", "duckdb>=0.9.0"],
    )));
    registry
}
