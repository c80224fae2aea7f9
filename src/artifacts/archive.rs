//! Test archive build
//!
//! The Docker build definition directory carries a `build.sh` that writes
//! `build/mozilla-docker-<version>.zip`, where `<version>` is the content of
//! the directory's `version` file.

use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::process::{CommandRunner, CommandSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const BUILD_SCRIPT: &str = "build.sh";
pub const VERSION_FILE: &str = "version";
pub const BUILD_OUTPUT_DIR: &str = "build";
const ARCHIVE_PREFIX: &str = "mozilla-docker-";

/// Runs `<shell> build.sh` from inside `docker_dir`.
pub async fn build_test_archive(
    runner: &dyn CommandRunner,
    config: &WorkflowConfig,
    docker_dir: &Path,
) -> Result<()> {
    if !docker_dir.is_dir() {
        return Err(WorkflowError::MissingArtifactDirectory(
            docker_dir.to_path_buf(),
        ));
    }
    let script = docker_dir.join(BUILD_SCRIPT);
    if !script.is_file() {
        return Err(WorkflowError::MissingArtifactFile(script));
    }

    info!(script = %script.display(), "Building test archive");
    let command = CommandSpec::new(&config.shell)
        .arg(BUILD_SCRIPT)
        .current_dir(docker_dir);
    let code = runner.run(&command).await?;

    if code != 0 {
        error!(code, "Could not build test archive");
        return Err(WorkflowError::BuildFailure { code });
    }
    Ok(())
}

/// Output directory of the build script
pub fn build_output_dir(docker_dir: &Path) -> PathBuf {
    docker_dir.join(BUILD_OUTPUT_DIR)
}

/// Absolute path of the archive for the current `version`.
///
/// # Errors
///
/// `MissingArtifactFile` when the version file or the archive is absent.
pub fn archive_path(docker_dir: &Path) -> Result<PathBuf> {
    let version_path = docker_dir.join(VERSION_FILE);
    if !version_path.is_file() {
        return Err(WorkflowError::MissingArtifactFile(version_path));
    }
    let version = fs::read_to_string(&version_path)
        .map_err(|e| WorkflowError::io(&version_path, e))?;
    let version = version.trim_end();

    let archive_name = format!("{}{}.zip", ARCHIVE_PREFIX, version);
    let archive = build_output_dir(docker_dir).join(archive_name);
    if !archive.is_file() {
        error!(archive = %archive.display(), "Archive not found");
        return Err(WorkflowError::MissingArtifactFile(archive));
    }

    if archive.is_absolute() {
        Ok(archive)
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&archive))
            .map_err(|e| WorkflowError::io(archive, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::process::RecordingRunner;
    use tempfile::TempDir;

    fn docker_dir_with_script() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BUILD_SCRIPT), "#!/bin/bash\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_build_invokes_script_with_shell() {
        let dir = docker_dir_with_script();
        let runner = RecordingRunner::new();

        build_test_archive(&runner, &test_config(), dir.path())
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "bash");
        assert_eq!(calls[0].args, vec![BUILD_SCRIPT]);
        assert_eq!(calls[0].current_dir.as_deref(), Some(dir.path()));
    }

    #[tokio::test]
    async fn test_build_failure_keeps_status() {
        let dir = docker_dir_with_script();
        let runner = RecordingRunner::failing("bash", 5);

        let err = build_test_archive(&runner, &test_config(), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::BuildFailure { code: 5 }));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_build_without_script() {
        let dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let err = build_test_archive(&runner, &test_config(), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::MissingArtifactFile(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_build_without_directory() {
        let dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();

        let err = build_test_archive(&runner, &test_config(), &dir.path().join("absent"))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::MissingArtifactDirectory(_)));
    }

    #[test]
    fn test_archive_path_uses_trimmed_version() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "1.4.2\n").unwrap();
        fs::create_dir(dir.path().join(BUILD_OUTPUT_DIR)).unwrap();
        let expected = dir.path().join("build").join("mozilla-docker-1.4.2.zip");
        fs::write(&expected, b"zip").unwrap();

        assert_eq!(archive_path(dir.path()).unwrap(), expected);
    }

    #[test]
    fn test_archive_path_missing_archive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "1.4.2").unwrap();

        match archive_path(dir.path()).unwrap_err() {
            WorkflowError::MissingArtifactFile(p) => {
                assert!(p.ends_with("build/mozilla-docker-1.4.2.zip"))
            }
            other => panic!("Expected MissingArtifactFile, got {:?}", other),
        }
    }

    #[test]
    fn test_archive_path_missing_version() {
        let dir = TempDir::new().unwrap();

        match archive_path(dir.path()).unwrap_err() {
            WorkflowError::MissingArtifactFile(p) => assert!(p.ends_with(VERSION_FILE)),
            other => panic!("Expected MissingArtifactFile, got {:?}", other),
        }
    }
}
