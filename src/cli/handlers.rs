//! Subcommand handlers
//!
//! Each handler returns the process exit code; `main` passes it to
//! `std::process::exit`.

use super::commands::{ConfigArgs, ImageArgs, LocateArgs, PatchArgs, RunArgs};
use super::output::{describe_patch, OutputFormatter};
use crate::artifacts::locate_artifacts;
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::recipe::UploadArtifacts;
use crate::workflow::{
    patch_recipe_file, ImageOptions, RunOptions, WorkflowReport, WorkflowService,
};
use tracing::{debug, error, info};

pub async fn handle_run(args: &RunArgs, config: &WorkflowConfig, quiet: bool) -> i32 {
    info!("Starting run workflow");

    let options = RunOptions {
        recipe: args.recipe.clone(),
        docker_dir: args.docker_dir.clone(),
        testdroid_apk: args.testdroid_apk.clone(),
        keep_recipe: args.keep_recipe,
        runner_args: args.runner_args.clone(),
    };

    let service = WorkflowService::new(config.clone());
    match service.run(&options).await {
        Ok(report) => {
            print_report(&report, quiet);
            0
        }
        Err(e) => report_failure(&e),
    }
}

pub async fn handle_image(args: &ImageArgs, config: &WorkflowConfig, quiet: bool) -> i32 {
    info!("Starting image workflow");

    let options = ImageOptions {
        recipe: args.recipe.clone(),
        docker_dir: args.docker_dir.clone(),
        clone: args.clone,
        build: args.build,
        runner_args: args.runner_args.clone(),
    };

    let service = WorkflowService::new(config.clone());
    match service.image(&options).await {
        Ok(report) => {
            print_report(&report, quiet);
            0
        }
        Err(e) => report_failure(&e),
    }
}

pub fn handle_patch(args: &PatchArgs, quiet: bool) -> i32 {
    let mut artifacts = UploadArtifacts::new();
    if let Some(application) = &args.application {
        artifacts = artifacts.with_application(application);
    }
    if let Some(test) = &args.test {
        artifacts = artifacts.with_test(test);
    }

    let written_to = args.output.as_deref().unwrap_or(&args.recipe);
    debug!(recipe = %args.recipe.display(), output = %written_to.display(), "Patching recipe");

    match patch_recipe_file(&args.recipe, &artifacts, args.output.as_deref()) {
        Ok(outcome) => {
            if !quiet {
                println!("{}", describe_patch(&outcome, written_to));
            }
            0
        }
        Err(e) => report_failure(&e),
    }
}

pub fn handle_locate(args: &LocateArgs) -> i32 {
    let selection = match locate_artifacts(&args.build_dir) {
        Ok(selection) => selection,
        Err(e) => return report_failure(&e),
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_selection(&selection) {
        Ok(output) => {
            println!("{}", output.trim_end());
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

pub fn handle_config(args: &ConfigArgs, config: &WorkflowConfig) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_config(config) {
        Ok(output) => {
            println!("{}", output.trim_end());
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

fn print_report(report: &WorkflowReport, quiet: bool) {
    info!(
        duration_ms = report.duration.as_millis(),
        recipe = %report.recipe_path.display(),
        "Workflow finished"
    );
    if quiet {
        return;
    }
    println!("\u{2713} Recipe {}", report.outcome);
    println!("  Test artifact: {}", report.test_artifact.display());
    if report.recipe_kept {
        println!("  Recipe: {}", report.recipe_path.display());
    }
}

fn report_failure(err: &WorkflowError) -> i32 {
    error!(error = %err, "Workflow aborted");
    eprintln!("\n{}", err.help_message());
    err.exit_code()
}
