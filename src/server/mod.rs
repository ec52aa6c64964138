/// Server launch and lifecycle module for App Server Runner.
///
/// This module turns a located installation into a running process and
/// decides how that process is waited on.
/// All public entry points are instrumented with `tracing` spans.
///
/// # Components
///
/// * `launch` - Start script selection, arguments, environment and Tomcat log scaffolding
/// * `process` - Spawning and awaiting OS processes
/// * `lifecycle` - Foreground/background wait policies, log tailing and teardown
///
/// # Examples
///
/// Choosing how a Tomcat start is waited on:
///
/// ```
/// use appserver_runner::resolver::ServerType;
/// use appserver_runner::server::{StartOptions, WaitPolicy};
///
/// let options = StartOptions { background: true, tail: true, ..StartOptions::default() };
///
/// assert_eq!(
///     WaitPolicy::for_launch(&ServerType::Tomcat, &options),
///     WaitPolicy::Background { tail: true }
/// );
/// assert_eq!(WaitPolicy::for_launch(&ServerType::Wildfly, &options), WaitPolicy::Foreground);
/// ```
///
/// Deferring a background process until teardown:
///
/// ```no_run
/// use appserver_runner::server::{LaunchDescriptor, ServerProcess, Teardown};
/// use std::collections::BTreeMap;
///
/// # #[tokio::main]
/// # async fn main() -> appserver_runner::Result<()> {
/// let descriptor = LaunchDescriptor {
///     executable: "./catalina.sh".to_string(),
///     arguments: vec!["start".to_string()],
///     working_dir: "/bundles/tomcat-9.0.80/bin".into(),
///     environment: BTreeMap::new(),
/// };
///
/// let mut teardown = Teardown::new();
/// teardown.defer(ServerProcess::spawn(&descriptor)?);
///
/// // Later, when the caller shuts down
/// teardown.run().await;
/// # Ok(())
/// # }
/// ```
pub mod launch;
pub mod lifecycle;
mod process;

pub use launch::{
    CATALINA_OUT, LaunchDescriptor, Platform, StartOptions, launch_server, prepare_tomcat_logs,
};
pub use lifecycle::{LaunchOutcome, LifecycleManager, Teardown, WaitPolicy};
pub use process::{LaunchId, ProcessExit, ServerProcess, ServerStatus};
