//! Ref resolution using the git CLI

use crate::error::{ScoutError, ScoutResult};
use crate::remote::{RefResolver, DEFAULT_REF};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Resolves refs with `git ls-remote`
#[derive(Debug, Default, Clone)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RefResolver for GitCli {
    async fn resolve(&self, endpoint: &str, git_ref: &str) -> ScoutResult<String> {
        if endpoint.starts_with('-') || git_ref.starts_with('-') {
            return Err(ScoutError::User(format!(
                "Refusing to pass '{} {}' to git: looks like an option",
                endpoint, git_ref
            )));
        }

        debug!(endpoint, git_ref, "Resolving ref via git ls-remote");

        let output = Command::new("git")
            .args(["ls-remote", endpoint, git_ref])
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ScoutError::command_failed("git ls-remote", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ScoutError::RemoteUnavailable {
                endpoint: endpoint.to_string(),
                reason: if stderr.is_empty() {
                    format!("git ls-remote exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ls_remote(&stdout, git_ref).ok_or_else(|| ScoutError::RefNotFound {
            endpoint: endpoint.to_string(),
            git_ref: git_ref.to_string(),
        })
    }
}

/// Pick the revision for `git_ref` out of `git ls-remote` output.
///
/// Preference: exact `HEAD`, peeled tag, tag, branch, literal name. A
/// fully-qualified ref such as `refs/pull/1/head` falls back to the first
/// line; a short name never does, since git also matches it as a suffix
/// (`main` lists `refs/heads/feature/main`).
pub fn parse_ls_remote(output: &str, git_ref: &str) -> Option<String> {
    let lines: Vec<(&str, &str)> = output
        .lines()
        .filter_map(|line| {
            let (sha, name) = line.split_once('\t')?;
            let sha = sha.trim();
            (!sha.is_empty()).then_some((sha, name.trim()))
        })
        .collect();

    let find = |wanted: &str| {
        lines
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(sha, _)| sha.to_string())
    };

    if git_ref == DEFAULT_REF {
        if let Some(sha) = find(DEFAULT_REF) {
            return Some(sha);
        }
    }

    let candidates = [
        format!("refs/tags/{}^{{}}", git_ref),
        format!("refs/tags/{}", git_ref),
        format!("refs/heads/{}", git_ref),
        git_ref.to_string(),
    ];
    candidates
        .iter()
        .find_map(|wanted| find(wanted))
        .or_else(|| {
            git_ref
                .starts_with("refs/")
                .then(|| lines.first().map(|(sha, _)| sha.to_string()))
                .flatten()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCH: &str = "3f2a9c1e8b7d6a5f4e3d2c1b0a9f8e7d6c5b4a39\trefs/heads/main\n";

    #[test]
    fn parses_branch() {
        assert_eq!(
            parse_ls_remote(BRANCH, "main").as_deref(),
            Some("3f2a9c1e8b7d6a5f4e3d2c1b0a9f8e7d6c5b4a39")
        );
    }

    #[test]
    fn prefers_peeled_tag() {
        let output = "\
1111111111111111111111111111111111111111\trefs/tags/v1.0
2222222222222222222222222222222222222222\trefs/tags/v1.0^{}
";
        assert_eq!(
            parse_ls_remote(output, "v1.0").as_deref(),
            Some("2222222222222222222222222222222222222222")
        );
    }

    #[test]
    fn tag_beats_branch_with_same_name() {
        let output = "\
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\trefs/heads/release
bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\trefs/tags/release
";
        assert_eq!(
            parse_ls_remote(output, "release").as_deref(),
            Some("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
        );
    }

    #[test]
    fn head_exact() {
        let output = "\
cccccccccccccccccccccccccccccccccccccccc\tHEAD
dddddddddddddddddddddddddddddddddddddddd\trefs/remotes/origin/HEAD
";
        assert_eq!(
            parse_ls_remote(output, "HEAD").as_deref(),
            Some("cccccccccccccccccccccccccccccccccccccccc")
        );
    }

    #[test]
    fn short_name_ignores_suffix_matches() {
        let output = "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee\trefs/heads/feature/main\n";
        assert!(parse_ls_remote(output, "main").is_none());
    }

    #[test]
    fn qualified_ref_falls_back_to_first_line() {
        let output = "ffffffffffffffffffffffffffffffffffffffff\trefs/pull/1/merge\n";
        assert_eq!(
            parse_ls_remote(output, "refs/pull/1/head").as_deref(),
            Some("ffffffffffffffffffffffffffffffffffffffff")
        );
    }

    #[test]
    fn empty_output_is_none() {
        assert!(parse_ls_remote("", "main").is_none());
        assert!(parse_ls_remote("\n\n", "main").is_none());
    }
}
