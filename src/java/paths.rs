#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Workspace paths for a student Java project.
pub struct ProjectPaths {
    /// Root directory of the project workspace.
    root_dir:  PathBuf,
    /// `target/` directory holding compiled classes.
    build_dir: PathBuf,
}

impl ProjectPaths {
    /// Creates the default layout rooted at `root_dir`.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::from_parts(root_dir, None)
    }

    /// Construct paths from an optional build directory override.
    pub fn from_parts(root_dir: PathBuf, build_dir: Option<PathBuf>) -> Self {
        let build_dir = build_dir.unwrap_or_else(|| root_dir.join("target"));
        Self {
            root_dir,
            build_dir,
        }
    }

    /// Root directory for the project.
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_path()
    }

    /// Directory of compiled classes; the candidate root for verification.
    pub fn build_dir(&self) -> &Path {
        self.build_dir.as_path()
    }

    /// Returns these paths with a different build directory.
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}
