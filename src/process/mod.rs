//! External process invocation: git, the archive build shell and the recipe runner

pub mod git;
pub mod recipe_runner;
pub mod recording;
pub mod runner;

pub use git::clone_repository;
pub use recipe_runner::run_recipe;
pub use recording::RecordingRunner;
pub use runner::{CommandRunner, CommandSpec, SystemCommandRunner};
