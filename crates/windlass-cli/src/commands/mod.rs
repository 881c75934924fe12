//! Command handlers.
//!
//! Each submodule exposes a single `execute` function taking its parsed
//! arguments plus whatever context it needs.  Handlers translate CLI input
//! into core/adapter calls and format the results; no pipeline logic lives
//! here.

pub mod cleanup;
pub mod completions;
pub mod list;
pub mod new;
pub mod validate;
