//! Git and GitHub publishing.

mod git;
mod github;

pub use git::GitCli;
pub use github::{PublishOutcome, RemoteRepoManager};
