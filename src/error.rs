//! Error taxonomy for the workflow
//!
//! Every error is terminal: handlers log it and exit with [`WorkflowError::exit_code`].

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The archive build script exited non-zero
    #[error("Could not build test archive: build script exited with status {code}")]
    BuildFailure { code: i32 },

    #[error("Archive directory not found on disk: {0}")]
    MissingArtifactDirectory(PathBuf),

    #[error("Required file not found: {0}")]
    MissingArtifactFile(PathBuf),

    /// The build directory exists but holds no usable public/private pair
    #[error("No matching artifacts in {dir}: {reason}")]
    NoMatchingArtifacts { dir: PathBuf, reason: String },

    #[error("Invalid recipe format: {0}")]
    InvalidRecipeFormat(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Clone of {url} failed with status {code}: expected 0")]
    CloneFailure { url: String, code: i32 },

    /// The recipe runner exited non-zero
    #[error("Recipe runner exited with status {code}")]
    RunnerFailure { code: i32 },

    #[error("Failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to serialize recipe: {0}")]
    Serialize(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WorkflowError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WorkflowError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// Subprocess failures propagate the child's status; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkflowError::BuildFailure { code } | WorkflowError::RunnerFailure { code } => {
                if *code == 0 {
                    1
                } else {
                    *code
                }
            }
            _ => 1,
        }
    }

    /// Error text plus a hint on how to fix it, for terminal output
    pub fn help_message(&self) -> String {
        match self {
            WorkflowError::MissingArtifactDirectory(path) => format!(
                "Error: Directory not found\nPath: {}\n\n\
                Help: Check the --mozilla-bitbar-docker-dir argument, or pass --clone\n\
                to fetch the Docker build definitions first.",
                path.display()
            ),
            WorkflowError::MissingArtifactFile(path) => format!(
                "Error: Required file not found\nPath: {}\n\n\
                Help: Check the path. Archives are produced by build.sh; pass --build\n\
                to run it before patching.",
                path.display()
            ),
            WorkflowError::NoMatchingArtifacts { dir, reason } => format!(
                "Error: No usable artifacts in {}\nReason: {}\n\n\
                Help: The two newest files must include one named \"public\" and one\n\
                without it. Rebuild with --build.",
                dir.display(),
                reason
            ),
            WorkflowError::Spawn { program, source } => format!(
                "Error: Could not start {}: {}\n\n\
                Help: Make sure {} is installed and on PATH.\n\
                Configuration:\n\
                - BITBAR_WORKFLOW_RUNNER (default: mozbitbar)\n\
                - BITBAR_WORKFLOW_SHELL (default: bash)",
                program, source, program
            ),
            WorkflowError::InvalidRecipeFormat(msg) => format!(
                "Error: Invalid recipe format\n{}\n\n\
                Help: A recipe is a YAML list of mappings, each with a string `action`.",
                msg
            ),
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_failure_propagates_status() {
        let err = WorkflowError::BuildFailure { code: 3 };
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Could not build test archive"));
    }

    #[test]
    fn test_runner_failure_never_exits_zero() {
        assert_eq!(WorkflowError::RunnerFailure { code: 0 }.exit_code(), 1);
        assert_eq!(WorkflowError::RunnerFailure { code: 42 }.exit_code(), 42);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let errors = vec![
            WorkflowError::MissingArtifactDirectory(PathBuf::from("/build")),
            WorkflowError::MissingArtifactFile(PathBuf::from("/x.apk")),
            WorkflowError::InvalidRecipeFormat("not a list".to_string()),
            WorkflowError::MissingArgument("--recipe".to_string()),
            WorkflowError::CloneFailure {
                url: "https://example.com/repo.git".to_string(),
                code: 128,
            },
        ];

        for err in errors {
            assert_eq!(err.exit_code(), 1, "{}", err);
        }
    }

    #[test]
    fn test_help_message_names_path() {
        let err = WorkflowError::MissingArtifactDirectory(PathBuf::from("/docker/build"));
        let help = err.help_message();
        assert!(help.contains("/docker/build"));
        assert!(help.contains("--clone"));
    }

    #[test]
    fn test_help_message_fallback() {
        let err = WorkflowError::RunnerFailure { code: 2 };
        assert_eq!(err.help_message(), "Error: Recipe runner exited with status 2");
    }

    #[test]
    fn test_io_helper_keeps_path() {
        let source = io::Error::new(io::ErrorKind::Other, "boom");
        let err = WorkflowError::io("/tmp/recipe.yml", source);
        match err {
            WorkflowError::Io { path, .. } => assert_eq!(path, PathBuf::from("/tmp/recipe.yml")),
            _ => panic!("Expected Io error"),
        }
    }
}
