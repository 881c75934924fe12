//! GitHub repository creation and the publish flow.
//!
//! Repository creation tries three methods in order: the `gh` CLI when it
//! is installed and authenticated, then the REST API when a token is in
//! the environment, and finally printed manual instructions. The first two
//! yield a repository URL; the manual path ends the publish stage early
//! without failing the run.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use windlass_core::prelude::{CoreResult, ProjectConfig};

use crate::process::{self, poll_until};
use crate::remote::GitCli;

const PUSH_VERIFY_TIMEOUT: Duration = Duration::from_secs(30);
const PUSH_VERIFY_INTERVAL: Duration = Duration::from_secs(2);
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// What the publish stage achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// URL of the repository, when one was created or already existed.
    pub repo_url: Option<String>,
    /// Whether the local history was pushed.
    pub pushed: bool,
    /// Whether the remote was observed to have the pushed commit.
    pub verified: bool,
}

impl PublishOutcome {
    fn manual() -> Self {
        Self {
            repo_url: None,
            pushed: false,
            verified: false,
        }
    }
}

#[derive(Deserialize)]
struct RepoResponse {
    html_url: String,
}

pub struct RemoteRepoManager;

impl RemoteRepoManager {
    pub fn new() -> Self {
        Self
    }

    /// Full publish flow: create the repository, wire up the local clone,
    /// push, and verify the push landed.
    pub fn publish(&self, project_dir: &Path, config: &ProjectConfig) -> CoreResult<PublishOutcome> {
        let repo_name = config.slug();
        let Some(repo_url) = self.create_repository(
            &repo_name,
            &config.project_description,
            config.remote.org.as_deref(),
            config.remote.private,
        )?
        else {
            return Ok(PublishOutcome::manual());
        };

        let git = GitCli::new(project_dir);
        git.init_if_needed()?;
        git.ensure_identity(&config.author_name, &config.author_email)?;
        git.stage_all()?;
        git.commit("Initial project scaffold")?;
        git.set_origin(&clone_url(&repo_url))?;
        let branch = git.push()?;

        let local_head = git.head_commit()?;
        let verified = poll_until(PUSH_VERIFY_TIMEOUT, PUSH_VERIFY_INTERVAL, || {
            git.remote_commit(&branch).as_deref() == Some(local_head.as_str())
        });
        if verified {
            info!(url = repo_url, "push verified on remote");
        } else {
            warn!(url = repo_url, "push not visible on remote within timeout");
        }

        Ok(PublishOutcome {
            repo_url: Some(repo_url),
            pushed: true,
            verified,
        })
    }

    /// Create the repository, returning its URL, or `None` when only
    /// manual instructions could be offered.
    pub fn create_repository(
        &self,
        name: &str,
        description: &str,
        org: Option<&str>,
        private: bool,
    ) -> CoreResult<Option<String>> {
        if let Some(url) = self.try_gh_cli(name, description, org, private) {
            return Ok(Some(url));
        }
        if let Some(url) = self.try_rest_api(name, description, org, private) {
            return Ok(Some(url));
        }
        self.print_manual_instructions(name, description, org, private);
        Ok(None)
    }

    fn try_gh_cli(
        &self,
        name: &str,
        description: &str,
        org: Option<&str>,
        private: bool,
    ) -> Option<String> {
        if which::which("gh").is_err() {
            debug!("gh CLI not on PATH");
            return None;
        }
        let auth = process::run("gh", &["auth", "status"], None).ok()?;
        if !auth.success() {
            debug!("gh CLI not authenticated");
            return None;
        }

        let full_name = qualified_name(name, org);
        let visibility = if private { "--private" } else { "--public" };
        info!(repo = full_name, "creating repository via gh CLI");
        let output = process::run(
            "gh",
            &[
                "repo",
                "create",
                &full_name,
                "--description",
                description,
                visibility,
            ],
            None,
        )
        .ok()?;

        if output.success() {
            // gh prints the new repository's URL on stdout; prefer it over
            // synthesizing one, since only gh knows the owner when no
            // organization was given.
            if let Some(url) = parse_repo_url(&output.stdout) {
                return Some(url);
            }
        }
        if output.success() || output.stderr.to_lowercase().contains("already exists") {
            let owner = match org {
                Some(org) => org.to_string(),
                None => gh_login()?,
            };
            Some(html_url(&owner, name))
        } else {
            debug!(stderr = %output.stderr, "gh repo create failed");
            None
        }
    }

    fn try_rest_api(
        &self,
        name: &str,
        description: &str,
        org: Option<&str>,
        private: bool,
    ) -> Option<String> {
        let token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()?;

        let url = match org {
            Some(org) => format!("https://api.github.com/orgs/{org}/repos"),
            None => "https://api.github.com/user/repos".to_string(),
        };
        info!(endpoint = url, "creating repository via REST API");

        let client = reqwest::blocking::Client::builder()
            .timeout(API_TIMEOUT)
            .user_agent("windlass")
            .build()
            .ok()?;
        let response = client
            .post(&url)
            .bearer_auth(&token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&json!({
                "name": name,
                "description": description,
                "private": private,
                "auto_init": false,
            }))
            .send()
            .ok()?;

        match response.status().as_u16() {
            201 => response.json::<RepoResponse>().ok().map(|r| r.html_url),
            // Unprocessable usually means the repo already exists.  The
            // owner is the token's login when no organization was given.
            422 => {
                let owner = match org {
                    Some(org) => org.to_string(),
                    None => token_login(&client, &token)?,
                };
                Some(html_url(&owner, name))
            }
            status => {
                debug!(status, "REST API repository creation failed");
                None
            }
        }
    }

    fn print_manual_instructions(
        &self,
        name: &str,
        description: &str,
        org: Option<&str>,
        private: bool,
    ) {
        let owner = org.unwrap_or("<your-account>");
        let visibility = if private { "private" } else { "public" };
        warn!("could not create the repository automatically");
        info!("manual setup: create a {visibility} repository named '{name}' under https://github.com/{owner}");
        info!("  description: {description}");
        info!("  then run: git remote add origin {}", clone_url(&format!("https://github.com/{owner}/{name}")));
    }
}

impl Default for RemoteRepoManager {
    fn default() -> Self {
        Self::new()
    }
}

fn qualified_name(name: &str, org: Option<&str>) -> String {
    match org {
        Some(org) => format!("{org}/{name}"),
        None => name.to_string(),
    }
}

/// First `https://github.com/...` line in gh's stdout, if any.
fn parse_repo_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("https://github.com/"))
        .map(|line| line.trim_end_matches('/').to_string())
}

/// Login of the authenticated gh user.
fn gh_login() -> Option<String> {
    let output = process::run("gh", &["api", "user", "--jq", ".login"], None).ok()?;
    if !output.success() {
        debug!(stderr = %output.stderr, "could not resolve the gh login");
        return None;
    }
    let login = output.stdout.trim();
    (!login.is_empty()).then(|| login.to_string())
}

/// Login of the token's user, via `GET /user`.
fn token_login(client: &reqwest::blocking::Client, token: &str) -> Option<String> {
    let user: serde_json::Value = client
        .get("https://api.github.com/user")
        .bearer_auth(token)
        .header("Accept", "application/vnd.github.v3+json")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .send()
        .ok()?
        .json()
        .ok()?;
    user.get("login")?.as_str().map(str::to_string)
}

fn html_url(owner: &str, name: &str) -> String {
    format!("https://github.com/{owner}/{name}")
}

fn clone_url(html_url: &str) -> String {
    format!("{}.git", html_url.trim_end_matches('/'))
}
