/*!
 # App Server Runner

 A Rust library for starting the local application server (Tomcat, JBoss or
 WildFly) that belongs to a Liferay workspace or a standalone project.

 ## Overview

 App Server Runner provides functionality to:
 - Tell workspace projects apart from standalone projects
 - Resolve the server type and bundles folder from project properties
 - Locate the server installation inside the bundles folder
 - Launch the platform-specific start script with the right arguments and environment
 - Wait for the server in the foreground, or start Tomcat in the background
   and optionally follow `catalina.out`

 ## Basic Usage

 ```no_run
 use appserver_runner::{Result, ServerStarter};
 use appserver_runner::config::{Properties, StaticPropertySource};
 use appserver_runner::server::StartOptions;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Properties come from the caller's own gradle.properties parsing
     let properties: Properties = [("liferay.workspace.home.dir", "bundles")]
         .into_iter()
         .collect();

     let starter = ServerStarter::new("/work/my-workspace", StaticPropertySource::workspace(properties));

     // Start Tomcat in the background and follow its log
     let options = StartOptions { background: true, tail: true, ..StartOptions::default() };
     let outcome = starter.run(&options).await?;
     println!("Outcome: {:?}", outcome);

     Ok(())
 }
 ```

 ## Features

 - **Project Detection**: Workspace markers are configurable
 - **Resolution**: Workspace and standalone property conventions, including `${project.dir}`
 - **Launching**: `catalina` and `standalone` scripts on Unix and Windows
 - **Lifecycle**: Foreground waits, background starts with a caller-owned teardown, log tailing
 - **Error Handling**: Typed classification errors for the caller to report

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod bundle;
pub mod config;
pub mod error;
pub mod project;
pub mod resolver;
pub mod server;

pub use bundle::ServerInstallation;
pub use config::Config;
pub use error::{Error, Result};
pub use project::ProjectContext;
pub use resolver::{ResolvedServerConfig, ServerType};
pub use server::{LaunchOutcome, StartOptions};

use config::{PropertySource, validate_config};
use server::{LifecycleManager, Teardown, WaitPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolve, locate and start the app server of one project.
///
/// This struct is the main entry point. It owns the [`Teardown`] that
/// background Tomcat starts are deferred to, so callers either use
/// [`ServerStarter::run`] or pair [`ServerStarter::start_server`] with
/// [`ServerStarter::shutdown`].
/// All public methods are instrumented with `tracing` spans.
pub struct ServerStarter {
    /// Project root, as found by the caller
    root: PathBuf,
    /// Configuration
    config: Config,
    /// Where project properties come from
    properties: Arc<dyn PropertySource>,
    /// Processes to wait for before going away
    teardown: Teardown,
}

impl ServerStarter {
    /// Create a starter with the default configuration
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(root, properties), fields(root = ?root.as_ref()))]
    pub fn new(root: impl AsRef<Path>, properties: impl PropertySource + 'static) -> Self {
        tracing::info!("Creating new ServerStarter");
        Self {
            root: root.as_ref().to_path_buf(),
            config: Config::default(),
            properties: Arc::new(properties),
            teardown: Teardown::new(),
        }
    }

    /// Create a starter with a validated configuration
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(root, config, properties), fields(root = ?root.as_ref()))]
    pub fn with_config(
        root: impl AsRef<Path>,
        config: Config,
        properties: impl PropertySource + 'static,
    ) -> Result<Self> {
        validate_config(&config)?;
        tracing::info!("Creating new ServerStarter with custom configuration");
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            config,
            properties: Arc::new(properties),
            teardown: Teardown::new(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of background processes waiting for [`ServerStarter::shutdown`]
    pub fn pending_teardown(&self) -> usize {
        self.teardown.len()
    }

    /// Classify the project root
    pub fn detect_project(&self) -> ProjectContext {
        ProjectContext::detect(&self.root, &self.config.workspace)
    }

    /// Resolve the server type and bundles folder for the project
    ///
    /// Unreadable workspace properties fall back to the workspace defaults;
    /// standalone property failures make the project unrecognized.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn resolve(&self) -> Result<ResolvedServerConfig> {
        let project = self.detect_project();

        if project.is_workspace() {
            let properties = match self.properties.workspace_properties(project.root()).await {
                Ok(properties) => properties,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read workspace properties, using defaults");
                    config::Properties::new()
                }
            };
            Ok(resolver::resolve_workspace(
                &project,
                &properties,
                &self.config.workspace,
            ))
        } else {
            let sources = self
                .properties
                .app_server_properties(project.root())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Not a recognized project");
                    Error::NotARecognizedProject(e)
                })?;
            resolver::resolve_standalone(&project, &sources)
        }
    }

    /// Resolve and locate the server installation for the project
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn locate(&self) -> Result<ServerInstallation> {
        let resolved = self.resolve().await?;
        bundle::locate_server(&resolved)
    }

    /// Start the project's server
    ///
    /// Returns once the foreground server exits, or once a background Tomcat
    /// has been started (and its tail process, if requested, has exited).
    /// Background servers stay registered until [`ServerStarter::shutdown`].
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn start_server(&mut self, options: &StartOptions) -> Result<LaunchOutcome> {
        let installation = self.locate().await?;

        let process = server::launch_server(&installation, options)?;
        let policy = WaitPolicy::for_launch(&installation.server_type, options);
        tracing::debug!(?policy, "Waiting on server");

        let manager = LifecycleManager::new(self.config.tail.clone());
        let outcome = manager
            .govern(process, policy, &installation.logs_dir(), &mut self.teardown)
            .await?;

        tracing::info!(?outcome, "Start request finished");
        Ok(outcome)
    }

    /// Wait for every background server started by this starter
    ///
    /// A Ctrl-C during the wait is logged and ends it early. Returns the
    /// number of processes that exited.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&mut self) -> usize {
        let teardown = std::mem::take(&mut self.teardown);
        if !teardown.is_empty() {
            tracing::info!(pending = teardown.len(), "Waiting for background servers");
        }
        teardown.run().await
    }

    /// Start the server, then run the teardown whether or not the start succeeded
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn run(mut self, options: &StartOptions) -> Result<LaunchOutcome> {
        let result = self.start_server(options).await;
        self.shutdown().await;
        result
    }
}

impl Drop for ServerStarter {
    fn drop(&mut self) {
        if !self.teardown.is_empty() {
            tracing::warn!(
                pending = self.teardown.len(),
                "ServerStarter dropped without shutdown; background servers are not awaited"
            );
        }
    }
}
