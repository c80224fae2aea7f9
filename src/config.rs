//! Configuration management for bitbar-workflow
//!
//! Settings are loaded from environment variables with sensible defaults. The
//! resulting [`WorkflowConfig`] is built once in `main` and passed by reference
//! into every phase.
//!
//! # Environment Variables
//!
//! - `BITBAR_WORKFLOW_RUNNER`: Recipe runner program - default: "mozbitbar"
//! - `BITBAR_WORKFLOW_SHELL`: Shell used to run `build.sh` - default: "bash"
//! - `BITBAR_WORKFLOW_RUNNER_REPO`: Git URL of the recipe runner repository
//! - `BITBAR_WORKFLOW_DOCKER_REPO`: Git URL of the Docker build definition repository
//! - `BITBAR_WORKFLOW_CLONE_DIR`: Directory repositories are cloned into - default: current directory
//! - `BITBAR_WORKFLOW_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use bitbar_workflow::WorkflowConfig;
//!
//! let config = WorkflowConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_RUNNER_PROGRAM: &str = "mozbitbar";
const DEFAULT_SHELL: &str = "bash";
const DEFAULT_RUNNER_REPO: &str = "https://github.com/worldomonation/mozbitbar.git";
const DEFAULT_DOCKER_REPO: &str = "https://github.com/bclary/mozilla-bitbar-docker.git";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Directory name the recipe runner repository is cloned into
pub const RUNNER_CLONE_NAME: &str = "mozbitbar";

/// Directory name the Docker build definition repository is cloned into
pub const DOCKER_CLONE_NAME: &str = "mozilla_bitbar_docker";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Runtime configuration for a workflow invocation
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Program that executes a recipe (`<program> --recipe <path>`)
    pub runner_program: String,

    /// Shell used to invoke the archive build script
    pub shell: String,

    /// Git URL of the recipe runner repository
    pub runner_repo: String,

    /// Git URL of the Docker build definition repository
    pub docker_repo: String,

    /// Base directory for cloned repositories
    pub clone_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for WorkflowConfig {
    /// Loads configuration from `BITBAR_WORKFLOW_*` variables, falling back to defaults
    fn default() -> Self {
        let runner_program = env::var("BITBAR_WORKFLOW_RUNNER")
            .unwrap_or_else(|_| DEFAULT_RUNNER_PROGRAM.to_string());

        let shell =
            env::var("BITBAR_WORKFLOW_SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());

        let runner_repo = env::var("BITBAR_WORKFLOW_RUNNER_REPO")
            .unwrap_or_else(|_| DEFAULT_RUNNER_REPO.to_string());

        let docker_repo = env::var("BITBAR_WORKFLOW_DOCKER_REPO")
            .unwrap_or_else(|_| DEFAULT_DOCKER_REPO.to_string());

        let clone_dir = env::var("BITBAR_WORKFLOW_CLONE_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let log_level = env::var("BITBAR_WORKFLOW_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            runner_program,
            shell,
            runner_repo,
            docker_repo,
            clone_dir,
            log_level,
        }
    }
}

impl WorkflowConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a program name or repository URL is empty, or the
    /// log level is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runner_program.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Recipe runner program must not be empty".to_string(),
            ));
        }
        if self.shell.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Shell must not be empty".to_string(),
            ));
        }
        for (name, url) in [
            ("runner repository", &self.runner_repo),
            ("docker repository", &self.docker_repo),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} URL must not be empty",
                    name
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Checkout location of the recipe runner repository
    pub fn runner_clone_path(&self) -> PathBuf {
        self.clone_dir.join(RUNNER_CLONE_NAME)
    }

    /// Checkout location of the Docker build definition repository
    pub fn docker_clone_path(&self) -> PathBuf {
        self.clone_dir.join(DOCKER_CLONE_NAME)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> std::collections::BTreeMap<String, String> {
        let mut map = std::collections::BTreeMap::new();

        map.insert("runner_program".to_string(), self.runner_program.clone());
        map.insert("shell".to_string(), self.shell.clone());
        map.insert("runner_repo".to_string(), self.runner_repo.clone());
        map.insert("docker_repo".to_string(), self.docker_repo.clone());
        map.insert(
            "clone_dir".to_string(),
            self.clone_dir.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Workflow Configuration:")?;
        writeln!(f, "  Runner: {}", self.runner_program)?;
        writeln!(f, "  Shell: {}", self.shell)?;
        writeln!(f, "  Runner Repo: {}", self.runner_repo)?;
        writeln!(f, "  Docker Repo: {}", self.docker_repo)?;
        writeln!(f, "  Clone Dir: {}", self.clone_dir.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

/// Fixed configuration for unit tests, independent of the environment
#[cfg(test)]
pub(crate) fn test_config() -> WorkflowConfig {
    WorkflowConfig {
        runner_program: DEFAULT_RUNNER_PROGRAM.to_string(),
        shell: DEFAULT_SHELL.to_string(),
        runner_repo: DEFAULT_RUNNER_REPO.to_string(),
        docker_repo: DEFAULT_DOCKER_REPO.to_string(),
        clone_dir: PathBuf::from("/work"),
        log_level: DEFAULT_LOG_LEVEL.to_string(),
    }
}
