use crate::config::TailConfig;
use crate::error::{Error, Result};
use crate::resolver::ServerType;
use crate::server::{CATALINA_OUT, LaunchDescriptor, LaunchId, ProcessExit, ServerProcess, StartOptions};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::task::Poll;

/// How a launched server is waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Wait for the server to exit before returning
    Foreground,
    /// Hand the server to the teardown and optionally follow its log
    Background {
        /// Follow `catalina.out` until the tail process exits
        tail: bool,
    },
}

impl WaitPolicy {
    /// Pick the policy for a server type and start flags.
    ///
    /// Only Tomcat has a background mode; JBoss and WildFly always run in
    /// the foreground.
    pub fn for_launch(server_type: &ServerType, options: &StartOptions) -> Self {
        match server_type {
            ServerType::Tomcat if options.background => Self::Background { tail: options.tail },
            _ => Self::Foreground,
        }
    }
}

/// Terminal result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The server ran in the foreground and exited
    Exited {
        /// Launch ID of the server
        launch_id: LaunchId,
        /// How it exited
        exit: ProcessExit,
    },
    /// The server was started in the background and handed to the teardown
    Detached {
        /// Launch ID of the server
        launch_id: LaunchId,
        /// Exit of the tail process, when one was requested
        tail_exit: Option<ProcessExit>,
    },
}

/// Processes the caller has to wait for before it goes away.
///
/// Background servers are deferred here instead of being waited on inline.
/// The owner runs the teardown on both its normal and its error path.
#[derive(Debug, Default)]
pub struct Teardown {
    deferred: Vec<ServerProcess>,
}

impl Teardown {
    /// Create an empty teardown
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for `process` when the teardown runs
    pub fn defer(&mut self, process: ServerProcess) {
        tracing::debug!(launch_id = %process.id(), "Deferred wait until teardown");
        self.deferred.push(process);
    }

    /// Number of deferred processes
    pub fn len(&self) -> usize {
        self.deferred.len()
    }

    /// Whether nothing is deferred
    pub fn is_empty(&self) -> bool {
        self.deferred.is_empty()
    }

    /// Wait for every deferred process, giving up on Ctrl-C.
    ///
    /// Returns the number of processes that were waited on to completion.
    pub async fn run(self) -> usize {
        self.run_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; never interrupt.
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Wait for every deferred process unless `interrupt` completes first.
    ///
    /// An interruption is logged as a warning and never returned as an error.
    pub async fn run_until<F>(mut self, interrupt: F) -> usize
    where
        F: Future<Output = ()>,
    {
        if self.deferred.is_empty() {
            return 0;
        }

        let pending = self.deferred.len();
        let waits = futures::future::join_all(self.deferred.iter_mut().map(|p| p.wait()));

        tokio::select! {
            results = waits => {
                let mut completed = 0;
                for result in results {
                    match result {
                        Ok(_) => completed += 1,
                        Err(e) => tracing::warn!(error = %e, "Failed waiting for deferred process"),
                    }
                }
                completed
            }
            _ = interrupt => {
                let err = Error::InterruptedWait(format!("{} process(es) still running", pending));
                tracing::warn!(error = %err, "Teardown interrupted");
                0
            }
        }
    }
}

/// Decides how a launched server is waited on.
#[derive(Debug, Clone, Default)]
pub struct LifecycleManager {
    tail: TailConfig,
}

impl LifecycleManager {
    /// Create a lifecycle manager that follows logs with `tail`
    pub fn new(tail: TailConfig) -> Self {
        Self { tail }
    }

    /// Wait on `process` according to `policy`.
    ///
    /// Foreground servers are awaited inline. Background servers are
    /// deferred to `teardown`; with `tail` a companion process follows
    /// `catalina.out` in `logs_dir` and that process is awaited instead,
    /// until it exits or Ctrl-C arrives.
    #[tracing::instrument(skip(self, process, logs_dir, teardown), fields(launch_id = %process.id()))]
    pub async fn govern(
        &self,
        mut process: ServerProcess,
        policy: WaitPolicy,
        logs_dir: &Path,
        teardown: &mut Teardown,
    ) -> Result<LaunchOutcome> {
        let launch_id = process.id();

        match policy {
            WaitPolicy::Foreground => {
                let exit = process.wait().await?;
                Ok(LaunchOutcome::Exited { launch_id, exit })
            }
            WaitPolicy::Background { tail } => {
                teardown.defer(process);

                let tail_exit = if tail {
                    self.follow_log(logs_dir).await?
                } else {
                    None
                };

                Ok(LaunchOutcome::Detached {
                    launch_id,
                    tail_exit,
                })
            }
        }
    }

    /// Follow `catalina.out` until the tail exits or Ctrl-C arrives.
    ///
    /// The Ctrl-C listener is installed before the tail starts, so the
    /// interrupt that ends the tail leaves the caller running and its
    /// teardown still happens. Returns `None` when interrupted.
    async fn follow_log(&self, logs_dir: &Path) -> Result<Option<ProcessExit>> {
        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);

        // The first poll registers the handler.
        let listening = match futures::poll!(interrupt.as_mut()) {
            Poll::Pending => true,
            Poll::Ready(Ok(())) => return Ok(None),
            Poll::Ready(Err(e)) => {
                tracing::warn!(error = %e, "Cannot listen for Ctrl-C while tailing");
                false
            }
        };

        let mut tail_process = ServerProcess::spawn(&self.tail_descriptor(logs_dir))?;
        if !listening {
            return Ok(Some(tail_process.wait().await?));
        }

        let pid = tail_process.pid();
        tokio::select! {
            exit = tail_process.wait() => Ok(Some(exit?)),
            _ = &mut interrupt => {
                tracing::info!(pid, "Stopped following log");
                Ok(None)
            }
        }
    }

    fn tail_descriptor(&self, logs_dir: &Path) -> LaunchDescriptor {
        let mut arguments = self.tail.args.clone();
        arguments.push(CATALINA_OUT.to_string());

        LaunchDescriptor {
            executable: self.tail.command.clone(),
            arguments,
            working_dir: logs_dir.to_path_buf(),
            environment: BTreeMap::from([("CATALINA_PID".to_string(), "catalina.pid".to_string())]),
        }
    }
}
