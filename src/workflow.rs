//! Workflow orchestration
//!
//! Two flows share the same phases and run them strictly one after another:
//!
//! - **run**: build the test archive, point the recipe's upload step at the
//!   application package and the archive, write the result to a temporary
//!   recipe and hand it to the recipe runner.
//! - **image**: optionally clone and build, pick the newest private archive
//!   from the build directory, patch the recipe in place and hand it off.
//!
//! Any error aborts the flow; nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use bitbar_workflow::workflow::{RunOptions, WorkflowService};
//! use bitbar_workflow::WorkflowConfig;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = WorkflowService::new(WorkflowConfig::default());
//! let report = service
//!     .run(&RunOptions {
//!         recipe: PathBuf::from("recipe.yml"),
//!         docker_dir: PathBuf::from("mozilla_bitbar_docker"),
//!         testdroid_apk: PathBuf::from("Testdroid.apk"),
//!         keep_recipe: false,
//!         runner_args: Vec::new(),
//!     })
//!     .await?;
//! println!("{}", report.outcome);
//! # Ok(())
//! # }
//! ```

use crate::artifacts::{archive_path, build_output_dir, build_test_archive, locate_artifacts};
use crate::config::WorkflowConfig;
use crate::error::{Result, WorkflowError};
use crate::process::{clone_repository, run_recipe, CommandRunner, SystemCommandRunner};
use crate::progress::{LoggingHandler, Phase, ProgressEvent, ProgressHandler};
use crate::recipe::{
    load_recipe, patch_upload_step, write_recipe, write_temp_recipe, PatchOutcome, TempRecipe,
    UploadArtifacts,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Inputs of the run flow
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub recipe: PathBuf,
    /// Docker build definition directory containing `build.sh`
    pub docker_dir: PathBuf,
    /// Application package uploaded alongside the test archive
    pub testdroid_apk: PathBuf,
    /// Leave the temporary recipe on disk after the hand-off
    pub keep_recipe: bool,
    /// Passed to the recipe runner unchanged
    pub runner_args: Vec<String>,
}

/// Inputs of the image flow
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub recipe: PathBuf,
    /// Defaults to the configured clone location
    pub docker_dir: Option<PathBuf>,
    pub clone: bool,
    pub build: bool,
    pub runner_args: Vec<String>,
}

/// Summary of a completed flow
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Recipe handed to the runner
    pub recipe_path: PathBuf,
    /// Whether `recipe_path` still exists
    pub recipe_kept: bool,
    pub outcome: PatchOutcome,
    /// Archive written into `test_filename`
    pub test_artifact: PathBuf,
    pub duration: Duration,
}

/// Loads `recipe_path`, patches its upload step and writes the result to
/// `output`, or back over `recipe_path` when `output` is `None`.
pub fn patch_recipe_file(
    recipe_path: &Path,
    artifacts: &UploadArtifacts,
    output: Option<&Path>,
) -> Result<PatchOutcome> {
    let mut recipe = load_recipe(recipe_path)?;
    let outcome = patch_upload_step(&mut recipe, artifacts)?;
    write_recipe(&recipe, output.unwrap_or(recipe_path))?;
    Ok(outcome)
}

pub struct WorkflowService {
    config: WorkflowConfig,
    runner: Arc<dyn CommandRunner>,
    progress: Arc<dyn ProgressHandler>,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService")
            .field("config", &self.config)
            .finish()
    }
}

impl WorkflowService {
    /// Service that spawns real processes and logs progress
    pub fn new(config: WorkflowConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemCommandRunner))
    }

    pub fn with_runner(config: WorkflowConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Build, patch into a temporary recipe, hand off.
    pub async fn run(&self, options: &RunOptions) -> Result<WorkflowReport> {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            workflow: "run".to_string(),
        });

        require_file(&options.recipe)?;
        require_file(&options.testdroid_apk)?;

        let archive = self
            .phase(Phase::Build, async {
                build_test_archive(self.runner.as_ref(), &self.config, &options.docker_dir)
                    .await?;
                archive_path(&options.docker_dir)
            })
            .await?;

        let (temp, outcome) = self
            .phase(Phase::Patch, async {
                patch_into_temp(&options.recipe, &options.testdroid_apk, &archive)
            })
            .await?;

        let (recipe_path, temp) = if options.keep_recipe {
            (temp.keep()?, None)
        } else {
            (temp.path().to_path_buf(), Some(temp))
        };

        self.phase(Phase::Handoff, async {
            run_recipe(
                self.runner.as_ref(),
                &self.config,
                &recipe_path,
                &options.runner_args,
            )
            .await
        })
        .await?;

        if let Some(temp) = temp {
            temp.remove()?;
            debug!(recipe = %recipe_path.display(), "Temporary recipe removed");
        }

        Ok(self.finish(start, recipe_path, options.keep_recipe, outcome, archive))
    }

    /// Optionally clone and build, patch the newest private archive in place, hand off.
    pub async fn image(&self, options: &ImageOptions) -> Result<WorkflowReport> {
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            workflow: "image".to_string(),
        });

        require_file(&options.recipe)?;

        if options.clone {
            self.phase(Phase::Clone, async {
                let runner = self.runner.as_ref();
                clone_repository(
                    runner,
                    &self.config.runner_repo,
                    &self.config.runner_clone_path(),
                )
                .await?;
                clone_repository(
                    runner,
                    &self.config.docker_repo,
                    &self.config.docker_clone_path(),
                )
                .await
            })
            .await?;
        }

        let docker_dir = options
            .docker_dir
            .clone()
            .unwrap_or_else(|| self.config.docker_clone_path());

        if options.build {
            self.phase(Phase::Build, async {
                build_test_archive(self.runner.as_ref(), &self.config, &docker_dir).await
            })
            .await?;
        }

        let selection = self
            .phase(Phase::Locate, async {
                locate_artifacts(&build_output_dir(&docker_dir))
            })
            .await?;
        info!(
            public = %selection.public.display(),
            private = %selection.private.display(),
            "Selected newest artifacts"
        );

        let outcome = self
            .phase(Phase::Patch, async {
                let artifacts = UploadArtifacts::new().with_test(&selection.private);
                patch_recipe_file(&options.recipe, &artifacts, None)
            })
            .await?;
        info!(%outcome, recipe = %options.recipe.display(), "Recipe patched in place");

        self.phase(Phase::Handoff, async {
            run_recipe(
                self.runner.as_ref(),
                &self.config,
                &options.recipe,
                &options.runner_args,
            )
            .await
        })
        .await?;

        Ok(self.finish(
            start,
            options.recipe.clone(),
            true,
            outcome,
            selection.private,
        ))
    }

    async fn phase<T, F>(&self, phase: Phase, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.progress
            .on_progress(&ProgressEvent::PhaseStarted { phase });
        let start = Instant::now();

        match work.await {
            Ok(value) => {
                self.progress.on_progress(&ProgressEvent::PhaseComplete {
                    phase,
                    duration: start.elapsed(),
                });
                Ok(value)
            }
            Err(e) => {
                self.progress.on_progress(&ProgressEvent::Failed {
                    phase,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn finish(
        &self,
        start: Instant,
        recipe_path: PathBuf,
        recipe_kept: bool,
        outcome: PatchOutcome,
        test_artifact: PathBuf,
    ) -> WorkflowReport {
        let duration = start.elapsed();
        self.progress.on_progress(&ProgressEvent::Completed {
            total_time: duration,
        });
        WorkflowReport {
            recipe_path,
            recipe_kept,
            outcome,
            test_artifact,
            duration,
        }
    }
}

fn patch_into_temp(
    recipe_path: &Path,
    application: &Path,
    test: &Path,
) -> Result<(TempRecipe, PatchOutcome)> {
    let mut recipe = load_recipe(recipe_path)?;
    let artifacts = UploadArtifacts::new()
        .with_application(application)
        .with_test(test);
    let outcome = patch_upload_step(&mut recipe, &artifacts)?;
    info!(%outcome, "Recipe patched");
    Ok((write_temp_recipe(&recipe)?, outcome))
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WorkflowError::MissingArtifactFile(path.to_path_buf()))
    }
}
