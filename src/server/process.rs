// src/server/process.rs
use crate::error::{Error, Result};
use crate::server::LaunchDescriptor;
use async_process::{Child, Command, Stdio};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a launched process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaunchId(Uuid);

impl LaunchId {
    // Private constructor, only usable within our crate
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a launched process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// Process is running
    Running,
    /// Process exited
    Terminated,
    /// Waiting for the process failed
    Failed,
}

/// How a process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, absent when the process was killed by a signal
    pub code: Option<i32>,
    /// Whether the process reported success
    pub success: bool,
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}

/// A spawned server, tail, or helper process.
///
/// Standard streams are inherited from the caller; nothing is captured.
/// Dropping the handle does not kill the process.
pub struct ServerProcess {
    /// Launch ID
    id: LaunchId,
    /// Executable as written in the descriptor
    executable: String,
    /// Child process
    child: Child,
    /// Process status
    status: ServerStatus,
}

impl ServerProcess {
    /// Spawn the process described by `descriptor` without waiting for it.
    ///
    /// On Windows the program runs through `cmd /C` so `.bat` scripts work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProcessLaunch`] when the OS refuses to start it.
    pub fn spawn(descriptor: &LaunchDescriptor) -> Result<Self> {
        let mut command = if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(descriptor.program());
            command
        } else {
            Command::new(descriptor.program())
        };

        command
            .args(&descriptor.arguments)
            .current_dir(&descriptor.working_dir)
            .envs(&descriptor.environment)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = command.spawn().map_err(|e| {
            tracing::error!(executable = %descriptor.executable, error = %e, "Failed to start process");
            Error::ProcessLaunch {
                executable: descriptor.executable.clone(),
                source: e,
            }
        })?;

        let process = Self {
            id: LaunchId::new(),
            executable: descriptor.executable.clone(),
            child,
            status: ServerStatus::Running,
        };

        tracing::info!(
            launch_id = %process.id,
            pid = process.pid(),
            executable = %process.executable,
            args = ?descriptor.arguments,
            dir = %descriptor.working_dir.display(),
            "Process started"
        );

        Ok(process)
    }

    /// Get the launch ID
    pub fn id(&self) -> LaunchId {
        self.id
    }

    /// Get the OS process ID
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Get the executable name
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Get the process status
    pub fn status(&self) -> ServerStatus {
        self.status
    }

    /// Wait for the process to exit
    pub async fn wait(&mut self) -> Result<ProcessExit> {
        match self.child.status().await {
            Ok(status) => {
                self.status = ServerStatus::Terminated;
                let exit = ProcessExit::from(status);
                tracing::info!(launch_id = %self.id, code = ?exit.code, "Process exited");
                Ok(exit)
            }
            Err(e) => {
                self.status = ServerStatus::Failed;
                Err(Error::Io(e))
            }
        }
    }
}

impl fmt::Debug for ServerProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerProcess")
            .field("id", &self.id)
            .field("pid", &self.pid())
            .field("executable", &self.executable)
            .field("status", &self.status)
            .finish()
    }
}
