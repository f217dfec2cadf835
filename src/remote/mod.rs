//! Remote lookups behind the caches
//!
//! Two seams, each with a CLI-backed implementation:
//! - [`RefResolver`]: (endpoint, ref) -> revision, via `git ls-remote`
//! - [`RepositoryLister`]: hosted repositories of the caller, via `gh repo list`

mod git;
mod github;

pub use git::{parse_ls_remote, GitCli};
pub use github::GithubCli;

use crate::error::ScoutResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ref used when a dependency does not name one
pub const DEFAULT_REF: &str = "HEAD";

/// Resolves a named ref on a remote to a revision identifier
#[async_trait]
pub trait RefResolver: Send + Sync {
    async fn resolve(&self, endpoint: &str, git_ref: &str) -> ScoutResult<String>;
}

/// Lists hosted repositories visible to the authenticated caller
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    async fn list(&self) -> ScoutResult<Vec<RepoCandidate>>;
}

/// Repository visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
    Internal,
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Internal => "internal",
        };
        write!(f, "{}", name)
    }
}

/// A hosted repository the caller could work with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCandidate {
    pub owner: String,
    pub name: String,
    pub url: String,
    pub privacy: Privacy,
    pub description: String,
}

impl RepoCandidate {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
