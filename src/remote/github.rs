//! Hosted repository listing using the gh CLI

use crate::config::schema::GithubConfig;
use crate::error::{ScoutError, ScoutResult};
use crate::remote::{Privacy, RepoCandidate, RepositoryLister};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

const JSON_FIELDS: &str = "name,owner,url,visibility,description";

/// Lists repositories with `gh repo list`
#[derive(Debug, Clone)]
pub struct GithubCli {
    host: String,
    limit: u32,
}

impl GithubCli {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            host: config.host.clone(),
            limit: config.limit,
        }
    }
}

#[async_trait]
impl RepositoryLister for GithubCli {
    async fn list(&self) -> ScoutResult<Vec<RepoCandidate>> {
        debug!(host = %self.host, limit = self.limit, "Listing repositories via gh CLI");

        let mut cmd = Command::new("gh");
        cmd.args(["repo", "list", "--json", JSON_FIELDS, "--limit"]);
        cmd.arg(self.limit.to_string());

        if self.host != "github.com" {
            cmd.env("GH_HOST", &self.host);
        }

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ScoutError::command_failed("gh repo list", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not logged in") || stderr.contains("gh auth login") {
                return Err(ScoutError::GithubNotAuthenticated);
            }
            return Err(ScoutError::command_exec("gh repo list", stderr.trim()));
        }

        parse_repo_list(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Deserialize)]
struct GhRepo {
    name: String,
    owner: GhOwner,
    url: String,
    visibility: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct GhOwner {
    login: String,
}

fn parse_privacy(visibility: &str) -> Privacy {
    match visibility.to_ascii_lowercase().as_str() {
        "private" => Privacy::Private,
        "internal" => Privacy::Internal,
        _ => Privacy::Public,
    }
}

/// Convert `gh repo list --json` output into candidates
fn parse_repo_list(json: &str) -> ScoutResult<Vec<RepoCandidate>> {
    let repos: Vec<GhRepo> =
        serde_json::from_str(json).map_err(|e| ScoutError::UnexpectedOutput {
            command: "gh repo list".to_string(),
            reason: e.to_string(),
        })?;

    Ok(repos
        .into_iter()
        .map(|repo| RepoCandidate {
            owner: repo.owner.login,
            name: repo.name,
            url: repo.url,
            privacy: parse_privacy(&repo.visibility),
            description: repo.description.unwrap_or_default(),
        })
        .collect())
}
