use crate::bundle::ServerInstallation;
use crate::error::{Error, Result};
use crate::resolver::ServerType;
use crate::server::ServerProcess;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the Tomcat console log created before a launch.
pub const CATALINA_OUT: &str = "catalina.out";

/// Caller-selected start flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartOptions {
    /// Start with the remote debugger enabled
    pub debug: bool,
    /// Return once Tomcat has been started instead of running it in the foreground
    pub background: bool,
    /// Follow `catalina.out` after a background start
    pub tail: bool,
}

/// Operating system family that decides script names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux, macOS and other shells that run `.sh` scripts
    Unix,
    /// Windows, which runs `.bat` scripts
    Windows,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Everything needed to spawn one process.
///
/// Built fresh for every launch. `environment` holds overrides that are
/// merged over the inherited environment.
///
/// # Examples
///
/// ```
/// use appserver_runner::bundle::ServerInstallation;
/// use appserver_runner::resolver::ServerType;
/// use appserver_runner::server::{LaunchDescriptor, Platform, StartOptions};
///
/// let installation = ServerInstallation {
///     directory: "/bundles/tomcat-9.0.80".into(),
///     server_type: ServerType::Tomcat,
/// };
/// let options = StartOptions { debug: true, ..StartOptions::default() };
///
/// let descriptor = LaunchDescriptor::for_installation(&installation, &options, Platform::Unix).unwrap();
/// assert_eq!(descriptor.executable, "./catalina.sh");
/// assert_eq!(descriptor.arguments, vec!["jpda", "run"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchDescriptor {
    /// Program to execute, relative to `working_dir` when prefixed with `./`
    pub executable: String,
    /// Arguments in order
    pub arguments: Vec<String>,
    /// Directory the process starts in
    pub working_dir: PathBuf,
    /// Environment overrides
    pub environment: BTreeMap<String, String>,
}

impl LaunchDescriptor {
    /// Build the start invocation for a server installation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedServerType`] for anything other than
    /// tomcat, jboss or wildfly.
    pub fn for_installation(
        installation: &ServerInstallation,
        options: &StartOptions,
        platform: Platform,
    ) -> Result<Self> {
        let working_dir = installation.bin_dir();

        match &installation.server_type {
            ServerType::Tomcat => {
                let executable = match platform {
                    Platform::Unix => "./catalina.sh",
                    Platform::Windows => "catalina.bat",
                };

                let mut arguments = Vec::with_capacity(2);
                if options.debug {
                    arguments.push("jpda".to_string());
                }
                arguments.push(if options.background { "start" } else { "run" }.to_string());

                let environment =
                    BTreeMap::from([("CATALINA_PID".to_string(), "catalina.pid".to_string())]);

                Ok(Self {
                    executable: executable.to_string(),
                    arguments,
                    working_dir,
                    environment,
                })
            }
            ServerType::Jboss | ServerType::Wildfly => {
                let executable = match platform {
                    Platform::Unix => "./standalone.sh",
                    Platform::Windows => "standalone.bat",
                };

                let arguments = if options.debug {
                    vec!["--debug".to_string()]
                } else {
                    Vec::new()
                };

                Ok(Self {
                    executable: executable.to_string(),
                    arguments,
                    working_dir,
                    environment: BTreeMap::new(),
                })
            }
            other => Err(Error::UnsupportedServerType(other.as_token().to_string())),
        }
    }

    /// Program path handed to the OS.
    ///
    /// `./` executables are resolved against the working directory so the
    /// lookup does not depend on the caller's current directory.
    pub fn program(&self) -> PathBuf {
        match self.executable.strip_prefix("./") {
            Some(relative) => self.working_dir.join(relative),
            None => PathBuf::from(&self.executable),
        }
    }
}

/// Make sure `logs/` and `logs/catalina.out` exist under a Tomcat installation.
///
/// Existing entries are left untouched, so repeated launches are harmless.
/// Returns the logs directory.
pub fn prepare_tomcat_logs(installation_dir: &Path) -> Result<PathBuf> {
    let logs_dir = installation_dir.join("logs");
    if !logs_dir.exists() {
        fs::create_dir(&logs_dir)?;
        tracing::debug!(dir = %logs_dir.display(), "Created logs directory");
    }

    let catalina_out = logs_dir.join(CATALINA_OUT);
    if !catalina_out.exists() {
        fs::File::create(&catalina_out)?;
        tracing::debug!(file = %catalina_out.display(), "Created empty catalina.out");
    }

    Ok(logs_dir)
}

/// Prepare and spawn the start script for an installation.
///
/// Does not wait for the process; see [`crate::server::LifecycleManager`].
#[tracing::instrument(skip(installation, options), fields(directory = %installation.directory.display(), server_type = %installation.server_type))]
pub fn launch_server(
    installation: &ServerInstallation,
    options: &StartOptions,
) -> Result<ServerProcess> {
    let descriptor = LaunchDescriptor::for_installation(installation, options, Platform::current())?;

    if installation.server_type == ServerType::Tomcat {
        prepare_tomcat_logs(&installation.directory)?;
    }

    ServerProcess::spawn(&descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn installation(server_type: ServerType) -> ServerInstallation {
        ServerInstallation {
            directory: PathBuf::from("/bundles/server"),
            server_type,
        }
    }

    fn options(debug: bool, background: bool) -> StartOptions {
        StartOptions {
            debug,
            background,
            tail: false,
        }
    }

    #[test]
    fn test_tomcat_start_tokens() {
        let cases = [
            (false, false, vec!["run"]),
            (false, true, vec!["start"]),
            (true, false, vec!["jpda", "run"]),
            (true, true, vec!["jpda", "start"]),
        ];

        for (debug, background, expected) in cases {
            let descriptor = LaunchDescriptor::for_installation(
                &installation(ServerType::Tomcat),
                &options(debug, background),
                Platform::Unix,
            )
            .unwrap();
            assert_eq!(descriptor.arguments, expected, "debug={debug} background={background}");
        }
    }

    #[test]
    fn test_tomcat_windows_descriptor() {
        let descriptor = LaunchDescriptor::for_installation(
            &installation(ServerType::Tomcat),
            &options(false, false),
            Platform::Windows,
        )
        .unwrap();

        assert_eq!(descriptor.executable, "catalina.bat");
        assert_eq!(descriptor.program(), PathBuf::from("catalina.bat"));
        assert_eq!(descriptor.working_dir, PathBuf::from("/bundles/server/bin"));
        assert_eq!(
            descriptor.environment.get("CATALINA_PID").map(String::as_str),
            Some("catalina.pid")
        );
    }

    #[test]
    fn test_wildfly_debug_and_background() {
        let descriptor = LaunchDescriptor::for_installation(
            &installation(ServerType::Wildfly),
            &options(true, true),
            Platform::Unix,
        )
        .unwrap();

        assert_eq!(descriptor.executable, "./standalone.sh");
        assert_eq!(descriptor.arguments, vec!["--debug"]);
        assert!(descriptor.environment.is_empty());
        assert_eq!(
            descriptor.program(),
            PathBuf::from("/bundles/server/bin/standalone.sh")
        );
    }

    #[test]
    fn test_jboss_windows_without_debug() {
        let descriptor = LaunchDescriptor::for_installation(
            &installation(ServerType::Jboss),
            &options(false, false),
            Platform::Windows,
        )
        .unwrap();

        assert_eq!(descriptor.executable, "standalone.bat");
        assert!(descriptor.arguments.is_empty());
    }

    #[test]
    fn test_unsupported_type_is_refused() {
        let result = LaunchDescriptor::for_installation(
            &installation(ServerType::Unsupported("resin".to_string())),
            &options(false, false),
            Platform::Unix,
        );

        assert!(matches!(result, Err(Error::UnsupportedServerType(token)) if token == "resin"));
    }

    #[test]
    fn test_prepare_tomcat_logs_is_idempotent() {
        let dir = tempdir().unwrap();

        let logs = prepare_tomcat_logs(dir.path()).unwrap();
        fs::write(logs.join(CATALINA_OUT), "previous run\n").unwrap();
        let again = prepare_tomcat_logs(dir.path()).unwrap();

        assert_eq!(logs, again);
        assert_eq!(
            fs::read_to_string(again.join(CATALINA_OUT)).unwrap(),
            "previous run\n"
        );
    }
}
