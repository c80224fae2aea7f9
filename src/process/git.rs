//! Repository checkout

use super::runner::{CommandRunner, CommandSpec};
use crate::error::{Result, WorkflowError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Clones `url` into `target`, replacing any existing checkout.
pub async fn clone_repository(
    runner: &dyn CommandRunner,
    url: &str,
    target: &Path,
) -> Result<()> {
    if target.exists() {
        debug!(target = %target.display(), "Removing existing checkout");
        fs::remove_dir_all(target).map_err(|e| WorkflowError::io(target, e))?;
    }

    info!(url, target = %target.display(), "Cloning repository");
    let command = CommandSpec::new("git").arg("clone").arg(url).path_arg(target);
    let code = runner.run(&command).await?;

    if code != 0 {
        return Err(WorkflowError::CloneFailure {
            url: url.to_string(),
            code,
        });
    }
    Ok(())
}
