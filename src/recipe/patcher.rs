//! Upload step patching
//!
//! Ensures a recipe carries exactly one `upload_file` step pointing at the build
//! artifacts. An existing step keeps its position and any unrelated arguments;
//! a missing one is inserted before the final two steps, which by convention
//! finalize the run.

use super::types::{Recipe, Step};
use crate::error::{Result, WorkflowError};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const UPLOAD_FILE_ACTION: &str = "upload_file";
pub const APPLICATION_FILENAME: &str = "application_filename";
pub const TEST_FILENAME: &str = "test_filename";

/// Number of trailing steps a new upload step is placed in front of
const TRAILING_STEPS: usize = 2;

/// Position of the first step whose action equals `action`.
///
/// A match at position 0 is `Some(0)`, never a miss.
pub fn find_action_index(recipe: &Recipe, action: &str) -> Option<usize> {
    recipe.steps().iter().position(|step| step.action() == action)
}

/// Artifact paths to write into the upload step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadArtifacts {
    pub application: Option<PathBuf>,
    pub test: Option<PathBuf>,
}

impl UploadArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_application(mut self, path: impl Into<PathBuf>) -> Self {
        self.application = Some(path.into());
        self
    }

    pub fn with_test(mut self, path: impl Into<PathBuf>) -> Self {
        self.test = Some(path.into());
        self
    }

    /// Absolute, existing paths keyed by their argument name.
    ///
    /// # Errors
    ///
    /// `MissingArgument` if no path is set, `MissingArtifactFile` if a path
    /// does not exist.
    pub fn resolve(&self) -> Result<Vec<(&'static str, PathBuf)>> {
        let supplied = [
            (APPLICATION_FILENAME, self.application.as_deref()),
            (TEST_FILENAME, self.test.as_deref()),
        ];

        let mut resolved = Vec::with_capacity(supplied.len());
        for (key, path) in supplied {
            if let Some(path) = path {
                resolved.push((key, absolute_existing(path)?));
            }
        }

        if resolved.is_empty() {
            return Err(WorkflowError::MissingArgument(
                "at least one of the application or test artifact paths".to_string(),
            ));
        }
        Ok(resolved)
    }
}

fn absolute_existing(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| WorkflowError::io(path, e))?
            .join(path)
    };

    if !absolute.exists() {
        return Err(WorkflowError::MissingArtifactFile(absolute));
    }
    Ok(absolute)
}

/// What `patch_upload_step` did to the recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated { index: usize },
    Inserted { index: usize },
}

impl PatchOutcome {
    pub fn index(&self) -> usize {
        match self {
            PatchOutcome::Updated { index } | PatchOutcome::Inserted { index } => *index,
        }
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Updated { index } => write!(f, "updated upload step at {}", index),
            PatchOutcome::Inserted { index } => write!(f, "inserted upload step at {}", index),
        }
    }
}

/// Points the recipe's upload step at the given artifacts.
///
/// Only the supplied argument keys are written. Paths are checked before the
/// recipe is touched, so a failed patch leaves it unchanged.
pub fn patch_upload_step(
    recipe: &mut Recipe,
    artifacts: &UploadArtifacts,
) -> Result<PatchOutcome> {
    let arguments: Vec<(&str, String)> = artifacts
        .resolve()?
        .into_iter()
        .map(|(key, path)| (key, path.to_string_lossy().into_owned()))
        .collect();

    Ok(apply_upload_arguments(recipe, &arguments))
}

fn apply_upload_arguments(recipe: &mut Recipe, arguments: &[(&str, String)]) -> PatchOutcome {
    if let Some(index) = find_action_index(recipe, UPLOAD_FILE_ACTION) {
        debug!(index, "Recipe: upload file action found");
        if let Some(step) = recipe.step_mut(index) {
            for (key, value) in arguments {
                step.set_argument(key, value.as_str());
            }
        }
        return PatchOutcome::Updated { index };
    }

    debug!("Recipe: upload file action not found");
    let step = arguments
        .iter()
        .fold(Step::new(UPLOAD_FILE_ACTION), |step, (key, value)| {
            step.with_argument(key, value.as_str())
        });
    let index = recipe.len().saturating_sub(TRAILING_STEPS);
    recipe.insert(index, step);
    PatchOutcome::Inserted { index }
}
