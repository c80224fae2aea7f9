//! Subprocess boundary
//!
//! Every external tool (git, the build shell, the recipe runner) is launched
//! through [`CommandRunner`], so workflows can be exercised without spawning
//! real processes.

use crate::error::{Result, WorkflowError};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Exit code reported when a child is terminated by a signal
const SIGNALED_EXIT_CODE: i32 = 1;

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs a command to completion and reports its exit code
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Waits for the command and returns its exit code.
    ///
    /// A non-zero code is not an error here; callers decide what it means.
    /// Failing to start the program is.
    async fn run(&self, command: &CommandSpec) -> Result<i32>;
}

/// Spawns real processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        debug!(command = %command, cwd = ?command.current_dir, "Spawning process");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await.map_err(|e| WorkflowError::Spawn {
            program: command.program.clone(),
            source: e,
        })?;

        let code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        debug!(command = %command.program, code, "Process exited");
        Ok(code)
    }
}
