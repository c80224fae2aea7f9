//! Build artifacts: producing the test archive and finding what a build left behind

pub mod archive;
pub mod locator;

pub use archive::{archive_path, build_output_dir, build_test_archive};
pub use locator::{locate_artifacts, select_artifacts, ArtifactSelection};
