//! Workspace detection for a project root.
use crate::config::WorkspaceConfig;
use std::path::{Path, PathBuf};

/// The project a start request runs against.
///
/// Built once per request by [`ProjectContext::detect`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    root: PathBuf,
    is_workspace: bool,
}

impl ProjectContext {
    /// Classify `root` as a workspace or a standalone project.
    ///
    /// Relative roots are made absolute against the current directory.
    /// A root is a workspace when any configured marker file exists and
    /// contains its token. Unreadable marker files count as absent, so an
    /// ambiguous root falls back to standalone.
    #[tracing::instrument(skip(root, config), fields(root = ?root.as_ref()))]
    pub fn detect(root: impl AsRef<Path>, config: &WorkspaceConfig) -> Self {
        let root = std::path::absolute(root.as_ref()).unwrap_or_else(|_| root.as_ref().to_path_buf());

        let is_workspace = config.markers.iter().any(|marker| {
            let path = root.join(&marker.file);
            match std::fs::read_to_string(&path) {
                Ok(content) => content.contains(&marker.token),
                Err(e) => {
                    if path.exists() {
                        tracing::debug!(file = %path.display(), error = %e, "Unreadable workspace marker");
                    }
                    false
                }
            }
        });

        tracing::debug!(is_workspace, "Classified project root");
        Self { root, is_workspace }
    }

    /// Build a context without touching the filesystem
    pub fn new(root: impl Into<PathBuf>, is_workspace: bool) -> Self {
        Self {
            root: root.into(),
            is_workspace,
        }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root is a workspace project
    pub fn is_workspace(&self) -> bool {
        self.is_workspace
    }
}
