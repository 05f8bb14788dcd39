use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Returns the workspace root, the parent of the xtask manifest directory.
///
/// # Errors
/// Returns an error if the manifest directory does not have a parent.
pub fn get_project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("Could not find project root from xtask manifest")
}

/// Maps a short crate name to its package name: `engine` becomes `fcm-engine`.
#[must_use]
pub fn normalize_project_name(project: &str) -> String {
    if project == "fcm" || project == "xtask" || project.starts_with("fcm-") {
        project.to_owned()
    } else {
        format!("fcm-{project}")
    }
}
