//! bitbar-workflow - recipe preparation for the Bitbar device cloud
//!
//! This library builds the Mozilla Bitbar Docker test archive, rewrites the
//! `upload_file` step of a device recipe so it names the application package
//! and the test archive, and hands the recipe to an external recipe runner.
//!
//! # Core Concepts
//!
//! - **Recipe**: an ordered YAML list of steps, each with an `action` and an
//!   optional `arguments` mapping
//! - **Upload step**: the `upload_file` step whose `application_filename` and
//!   `test_filename` arguments are patched
//! - **Recipe runner**: the external program (`mozbitbar` by default) that
//!   executes a recipe; it is only ever invoked as a subprocess
//!
//! # Example Usage
//!
//! ```no_run
//! use bitbar_workflow::recipe::{load_recipe, patch_upload_step, write_recipe, UploadArtifacts};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), bitbar_workflow::WorkflowError> {
//! let path = Path::new("recipe.yml");
//! let mut recipe = load_recipe(path)?;
//! let artifacts = UploadArtifacts::new()
//!     .with_application("Testdroid.apk")
//!     .with_test("build/mozilla-docker-2.0.1.zip");
//! let outcome = patch_upload_step(&mut recipe, &artifacts)?;
//! write_recipe(&recipe, path)?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`recipe`]: recipe model, upload step patching, YAML persistence
//! - [`artifacts`]: test archive build and artifact selection
//! - [`process`]: subprocess boundary (git, build script, recipe runner)
//! - [`workflow`]: the `run` and `image` flows

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod process;
pub mod progress;
pub mod recipe;
pub mod util;
pub mod workflow;

pub use artifacts::ArtifactSelection;
pub use config::{ConfigError, WorkflowConfig};
pub use error::WorkflowError;
pub use recipe::{PatchOutcome, Recipe, Step, UploadArtifacts};
pub use util::{init_logging, LoggingConfig};
pub use workflow::{ImageOptions, RunOptions, WorkflowReport, WorkflowService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
