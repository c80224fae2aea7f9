//! Hand-off to the external recipe runner

use super::runner::{CommandRunner, CommandSpec};
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use std::path::Path;
use tracing::info;

/// Runs `<runner> --recipe <path> <extra_args...>` and waits for it.
pub async fn run_recipe(
    runner: &dyn CommandRunner,
    config: &WorkflowConfig,
    recipe_path: &Path,
    extra_args: &[String],
) -> Result<()> {
    let command = CommandSpec::new(&config.runner_program)
        .arg("--recipe")
        .path_arg(recipe_path)
        .args(extra_args.iter().cloned());

    info!(runner = %config.runner_program, recipe = %recipe_path.display(), "Running recipe");
    let code = runner.run(&command).await?;

    if code != 0 {
        return Err(WorkflowError::RunnerFailure { code });
    }
    Ok(())
}
