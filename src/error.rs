//! Error types for revscout
//!
//! All modules use `ScoutResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for revscout operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Coarse error classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Manifest, lockfile, ref or path absent. Expected and non-fatal.
    NotFound,
    /// External tool or API missing or unauthenticated. Surfaced, never retried.
    Unavailable,
    /// Cancellation signal fired
    Cancelled,
    /// Deadline elapsed
    TimedOut,
    /// A single read failed
    TransientIo,
    /// Malformed input (config, manifest, tool output)
    Invalid,
}

/// All errors that can occur in revscout
#[derive(Error, Debug)]
pub enum ScoutError {
    // Environment errors
    #[error("Required CLI not found: {name}")]
    CliNotFound { name: String },

    #[error("GitHub CLI not authenticated. Run: gh auth login")]
    GithubNotAuthenticated,

    #[error("Remote unavailable: {endpoint}: {reason}")]
    RemoteUnavailable { endpoint: String, reason: String },

    // Lookup errors
    #[error("Ref {git_ref} not found on {endpoint}")]
    RefNotFound { endpoint: String, git_ref: String },

    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Lockfile not found: {0}")]
    LockfileNotFound(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors
    #[error("Invalid manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("Invalid lockfile {path}: {reason}")]
    LockfileInvalid { path: PathBuf, reason: String },

    #[error("Unexpected output from {command}: {reason}")]
    UnexpectedOutput { command: String, reason: String },

    // Interruption
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Operation timed out after {secs}s: {operation}")]
    TimedOut { operation: String, secs: u64 },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl ScoutError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    ///
    /// A spawn failure with `NotFound` means the binary itself is missing,
    /// which is reported as `CliNotFound` so callers see it as unavailable.
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        let command = command.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            return Self::CliNotFound { name };
        }
        Self::CommandFailed { command, source }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RefNotFound { .. }
            | Self::ManifestNotFound(_)
            | Self::LockfileNotFound(_)
            | Self::PathNotFound(_) => ErrorKind::NotFound,
            Self::CliNotFound { .. }
            | Self::GithubNotAuthenticated
            | Self::RemoteUnavailable { .. }
            | Self::CommandFailed { .. }
            | Self::CommandExecution { .. } => ErrorKind::Unavailable,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::TimedOut { .. } => ErrorKind::TimedOut,
            Self::Io { .. } | Self::ConfigDirCreate { .. } => ErrorKind::TransientIo,
            Self::ConfigInvalid { .. }
            | Self::ManifestInvalid { .. }
            | Self::LockfileInvalid { .. }
            | Self::UnexpectedOutput { .. }
            | Self::Json(_)
            | Self::TomlParse(_)
            | Self::TomlSerialize(_)
            | Self::User(_) => ErrorKind::Invalid,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransientIo | ErrorKind::TimedOut)
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::GithubNotAuthenticated => Some("Run: gh auth login"),
            Self::CliNotFound { name } => Some(match name.as_str() {
                "git" => "Install git from https://git-scm.com",
                "gh" => "Install the GitHub CLI from https://cli.github.com",
                _ => "Make sure it is installed and on PATH",
            }),
            Self::LockfileNotFound(_) => Some("Run: cargo generate-lockfile"),
            Self::TimedOut { .. } => Some("Raise scan.timeout_secs or narrow the roots"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScoutError::RefNotFound {
            endpoint: "https://github.com/a/b".to_string(),
            git_ref: "main".to_string(),
        };
        assert!(err.to_string().contains("Ref main not found"));
    }

    #[test]
    fn error_hint() {
        let err = ScoutError::GithubNotAuthenticated;
        assert_eq!(err.hint(), Some("Run: gh auth login"));
    }

    #[test]
    fn error_retryable() {
        let timed_out = ScoutError::TimedOut {
            operation: "scan".to_string(),
            secs: 1,
        };
        assert!(timed_out.is_retryable());
        assert!(!ScoutError::GithubNotAuthenticated.is_retryable());
    }

    #[test]
    fn missing_binary_maps_to_cli_not_found() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ScoutError::command_failed("git ls-remote", source);
        assert!(matches!(err, ScoutError::CliNotFound { ref name } if name == "git"));
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.hint(), Some("Install git from https://git-scm.com"));
    }

    #[test]
    fn cli_not_found_shows_install_line_once() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ScoutError::command_failed("gh repo list", source);
        assert_eq!(err.to_string(), "Required CLI not found: gh");
        assert_eq!(
            err.hint(),
            Some("Install the GitHub CLI from https://cli.github.com")
        );

        let other = ScoutError::CliNotFound {
            name: "cargo".to_string(),
        };
        assert!(!other.to_string().contains("PATH"));
        assert_eq!(other.hint(), Some("Make sure it is installed and on PATH"));
    }

    #[test]
    fn error_kinds() {
        assert_eq!(
            ScoutError::LockfileNotFound("Cargo.lock".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ScoutError::Cancelled("scan".into()).kind(),
            ErrorKind::Cancelled
        );
    }
}
