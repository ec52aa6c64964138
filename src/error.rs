/// Error handling module for App Server Runner.
///
/// This module defines the error types used throughout the library.
/// Classification errors (missing bundle folder, unsupported server type,
/// missing server directory, unrecognized project) and launch failures are
/// terminal for a start request; an interrupted teardown wait is only ever
/// logged.
///
/// # Example
///
/// ```
/// use appserver_runner::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Server started"),
///         Err(Error::BundleFolderMissingOrEmpty(dir)) => {
///             println!("Run 'gradlew initBundle' first ({})", dir.display())
///         }
///         Err(Error::UnsupportedServerType(token)) => println!("{} not supported", token),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the appserver-runner library.
#[derive(Error, Debug)]
pub enum Error {
    /// The bundle search base does not exist or contains nothing.
    ///
    /// This error occurs when:
    /// - The workspace home directory was never initialized
    /// - The standalone parent directory points at an empty folder
    #[error(
        "{} bundles folder does not exist in Liferay Workspace, execute 'gradlew initBundle' in order to create it.",
        .0.display()
    )]
    BundleFolderMissingOrEmpty(PathBuf),

    /// The resolved server type is not one of tomcat, jboss or wildfly.
    ///
    /// An unresolved type (no `app.server.type` anywhere) is reported with
    /// an empty token.
    #[error("{0} not supported")]
    UnsupportedServerType(String),

    /// The search completed without finding a directory prefixed by the token.
    #[error("No {server_type} directory found under {}", .base.display())]
    ServerDirectoryNotFound {
        /// Token that was searched for
        server_type: String,
        /// Directory the search started from
        base: PathBuf,
    },

    /// The standalone property sources could not be used.
    #[error("Please execute this command from a Liferay project: {0}")]
    NotARecognizedProject(#[source] ProjectError),

    /// The operating system refused to start a process.
    #[error("Failed to start {executable}: {source}")]
    ProcessLaunch {
        /// Executable that was being started
        executable: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The teardown wait for a background server was interrupted.
    ///
    /// Never returned from a start request; only logged during teardown.
    #[error("Could not wait for process to end before shutting down: {0}")]
    InterruptedWait(String),

    /// Failed to parse configuration from a file or string.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains unusable values.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Filesystem or process I/O failed outside of spawning.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a directory could not be treated as a standalone project.
///
/// Carried by [`Error::NotARecognizedProject`] so callers can tell missing
/// properties apart from malformed ones.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// No app server property sources exist for the project.
    #[error("no app server properties found")]
    NoPropertySources,

    /// A property source exists but could not be parsed.
    #[error("malformed properties: {0}")]
    Malformed(String),

    /// Reading a property source or resolving the project root failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for appserver-runner operations.
pub type Result<T> = std::result::Result<T, Error>;
