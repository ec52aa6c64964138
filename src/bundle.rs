//! Locating a server installation inside a bundles folder.
use crate::error::{Error, Result};
use crate::resolver::{ResolvedServerConfig, ServerType};
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

/// A server directory found inside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInstallation {
    /// Directory whose name starts with the server token
    pub directory: PathBuf,
    /// Server family the directory belongs to
    pub server_type: ServerType,
}

impl ServerInstallation {
    /// Directory holding the start scripts
    pub fn bin_dir(&self) -> PathBuf {
        self.directory.join("bin")
    }

    /// Directory holding the server logs
    pub fn logs_dir(&self) -> PathBuf {
        self.directory.join("logs")
    }
}

/// Find the installation for a resolved server.
///
/// The bundles folder must exist and must not be empty; unsupported server
/// types are refused before any search happens.
///
/// # Errors
///
/// * [`Error::BundleFolderMissingOrEmpty`] when the base directory is absent, unreadable or empty
/// * [`Error::UnsupportedServerType`] when the type is not tomcat, jboss or wildfly
/// * [`Error::ServerDirectoryNotFound`] when no directory carries the token prefix
#[tracing::instrument(skip(resolved), fields(base = %resolved.base_search_dir.display(), server_type = %resolved.server_type))]
pub fn locate_server(resolved: &ResolvedServerConfig) -> Result<ServerInstallation> {
    let base = &resolved.base_search_dir;

    if is_dir_empty(base) {
        tracing::error!("Bundles folder missing or empty");
        return Err(Error::BundleFolderMissingOrEmpty(base.clone()));
    }

    if !resolved.server_type.is_supported() {
        tracing::error!("Unsupported server type");
        return Err(Error::UnsupportedServerType(
            resolved.server_type.as_token().to_string(),
        ));
    }

    match find_prefixed_dir(base, resolved.server_type.as_token()) {
        Some(directory) => {
            tracing::info!(directory = %directory.display(), "Found server installation");
            Ok(ServerInstallation {
                directory,
                server_type: resolved.server_type.clone(),
            })
        }
        None => {
            tracing::error!("No server directory found");
            Err(Error::ServerDirectoryNotFound {
                server_type: resolved.server_type.as_token().to_string(),
                base: base.clone(),
            })
        }
    }
}

/// Whether `dir` has no entries. Missing, unreadable and plain-file paths
/// count as empty.
fn is_dir_empty(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Cannot list bundles folder");
            true
        }
    }
}

/// Depth-first, pre-order search for the first directory named `prefix*`.
///
/// `base` itself is a candidate. Entries are visited in the order the
/// filesystem returns them, so with several matches the winner is
/// platform-dependent. Symlinked directories can match but are not descended.
fn find_prefixed_dir(base: &Path, prefix: &str) -> Option<PathBuf> {
    if matches_prefix(base, prefix) {
        return Some(base.to_path_buf());
    }

    let mut stack: Vec<ReadDir> = Vec::new();
    match fs::read_dir(base) {
        Ok(entries) => stack.push(entries),
        Err(e) => {
            tracing::debug!(dir = %base.display(), error = %e, "Skipping unreadable directory");
            return None;
        }
    }

    while let Some(entries) = stack.last_mut() {
        let Some(entry) = entries.next() else {
            stack.pop();
            continue;
        };
        let Ok(entry) = entry else {
            continue;
        };

        let path = entry.path();
        if matches_prefix(&path, prefix) {
            return Some(path);
        }

        let descend = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if descend {
            match fs::read_dir(&path) {
                Ok(children) => stack.push(children),
                Err(e) => {
                    tracing::debug!(dir = %path.display(), error = %e, "Skipping unreadable directory");
                }
            }
        }
    }

    None
}

fn matches_prefix(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(prefix))
        .unwrap_or(false)
        && path.is_dir()
}
