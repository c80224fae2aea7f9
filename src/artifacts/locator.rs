//! Newest public/private artifact selection
//!
//! Archive names embed a timestamp, so a descending lexical sort puts the
//! newest build first. Each build emits a public and a private archive; only
//! the newest two names are considered.

use crate::error::{Result, WorkflowError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PUBLIC_MARKER: &str = "public";

/// Number of newest names that make up one build
const NEWEST_BUILD_SIZE: usize = 2;

/// The public and private archives of the newest build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSelection {
    pub public: PathBuf,
    pub private: PathBuf,
}

/// Picks the newest public and private names.
///
/// Returns `(public, private)`, or a reason when the newest two names are not
/// one public and one private archive.
pub fn select_artifacts<S: AsRef<str>>(
    names: &[S],
) -> std::result::Result<(String, String), String> {
    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    if sorted.len() < NEWEST_BUILD_SIZE {
        return Err(format!(
            "expected at least {} archives, found {}",
            NEWEST_BUILD_SIZE,
            sorted.len()
        ));
    }
    let newest = &sorted[..NEWEST_BUILD_SIZE];

    let public = newest.iter().find(|name| name.contains(PUBLIC_MARKER));
    let private = newest.iter().find(|name| !name.contains(PUBLIC_MARKER));

    match (public, private) {
        (Some(public), Some(private)) => Ok((public.to_string(), private.to_string())),
        (None, _) => Err(format!("no public archive among {:?}", newest)),
        (_, None) => Err(format!("no private archive among {:?}", newest)),
    }
}

/// Selects the newest artifacts from the files in `build_dir`
pub fn locate_artifacts(build_dir: &Path) -> Result<ArtifactSelection> {
    if !build_dir.is_dir() {
        return Err(WorkflowError::MissingArtifactDirectory(
            build_dir.to_path_buf(),
        ));
    }

    let entries = fs::read_dir(build_dir).map_err(|e| WorkflowError::io(build_dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WorkflowError::io(build_dir, e))?;
        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .map_err(|e| WorkflowError::io(entry.path(), e))?;
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!(name = ?name, "Skipping non-UTF-8 file name"),
        }
    }
    debug!(dir = %build_dir.display(), files = names.len(), "Listed build directory");

    let (public, private) =
        select_artifacts(&names).map_err(|reason| WorkflowError::NoMatchingArtifacts {
            dir: build_dir.to_path_buf(),
            reason,
        })?;

    Ok(ArtifactSelection {
        public: build_dir.join(public),
        private: build_dir.join(private),
    })
}
