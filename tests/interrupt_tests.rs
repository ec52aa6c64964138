#![cfg(unix)]
// Runs in its own test binary: the SIGINT sent here is process-wide.

use appserver_runner::ServerStarter;
use appserver_runner::config::{Config, StaticPropertySource, TailConfig};
use appserver_runner::error::Result;
use appserver_runner::server::{LaunchOutcome, StartOptions};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn write_executable(path: &Path, body: &str) -> Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, body)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[tokio::test]
async fn test_ctrl_c_while_tailing_still_runs_teardown() -> Result<()> {
    let dir = tempdir()?;
    let installation = dir.path().join("bundles/tomcat-9.0.80");
    write_executable(
        &installation.join("bin/catalina.sh"),
        "#!/bin/sh\necho \"$@\" >> ../launch.log\n",
    )?;

    // Interrupts the runner the way a terminal Ctrl-C would, then keeps
    // following like `tail -f`.
    let tail = dir.path().join("interrupting-tail.sh");
    write_executable(&tail, "#!/bin/sh\nkill -INT $PPID\nexec sleep 3\n")?;

    let config = Config {
        tail: TailConfig {
            command: tail.to_string_lossy().into_owned(),
            args: Vec::new(),
        },
        ..Config::default()
    };
    let source = StaticPropertySource::standalone(vec![
        [("app.server.parent.dir", "bundles"), ("app.server.type", "tomcat")]
            .into_iter()
            .collect(),
    ]);
    let options = StartOptions {
        debug: false,
        background: true,
        tail: true,
    };

    let started = Instant::now();
    let outcome = ServerStarter::with_config(dir.path(), config, source)?
        .run(&options)
        .await?;

    assert!(matches!(outcome, LaunchOutcome::Detached { tail_exit: None, .. }));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(fs::read_to_string(installation.join("launch.log"))?, "start\n");

    Ok(())
}
