#![cfg(unix)]

use appserver_runner::config::{Config, StaticPropertySource, TailConfig};
use appserver_runner::error::{Error, Result};
use appserver_runner::server::{
    LaunchDescriptor, LaunchOutcome, ServerProcess, ServerStatus, StartOptions, Teardown,
};
use appserver_runner::ServerStarter;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

// Writes a start script that records its arguments and CATALINA_PID next to
// the installation, then exits with `exit_code`.
fn write_script(bin: &Path, name: &str, exit_code: i32) -> Result<()> {
    fs::create_dir_all(bin)?;
    let script = bin.join(name);
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" >> ../launch.log\necho \"pid=$CATALINA_PID\" >> ../launch.log\nexit {exit_code}\n"
        ),
    )?;
    let mut permissions = fs::metadata(&script)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&script, permissions)?;
    Ok(())
}

// A standalone project whose bundles folder holds one server directory.
fn standalone_project(server_dir: &str, script: &str, server_type: &str) -> (TempDir, PathBuf, StaticPropertySource) {
    let dir = tempdir().unwrap();
    let installation = dir.path().join("bundles").join(server_dir);
    write_script(&installation.join("bin"), script, 0).unwrap();

    let source = StaticPropertySource::standalone(vec![
        [
            ("app.server.parent.dir", "bundles"),
            ("app.server.type", server_type),
        ]
        .into_iter()
        .collect(),
    ]);

    (dir, installation, source)
}

fn launch_log(installation: &Path) -> String {
    fs::read_to_string(installation.join("launch.log")).unwrap_or_default()
}

#[tokio::test]
async fn test_tomcat_foreground_run() -> Result<()> {
    let (dir, installation, source) = standalone_project("tomcat-9.0.80", "catalina.sh", "tomcat");

    let outcome = ServerStarter::new(dir.path(), source)
        .run(&StartOptions::default())
        .await?;

    assert!(matches!(outcome, LaunchOutcome::Exited { exit, .. } if exit.success));
    assert_eq!(launch_log(&installation), "run\npid=catalina.pid\n");
    assert!(installation.join("logs/catalina.out").is_file());

    Ok(())
}

#[tokio::test]
async fn test_tomcat_debug_run_twice_reuses_logs() -> Result<()> {
    let (dir, installation, source) = standalone_project("tomcat-9.0.80", "catalina.sh", "tomcat");
    let options = StartOptions {
        debug: true,
        ..StartOptions::default()
    };

    ServerStarter::new(dir.path(), source.clone()).run(&options).await?;
    ServerStarter::new(dir.path(), source).run(&options).await?;

    assert_eq!(
        launch_log(&installation),
        "jpda run\npid=catalina.pid\njpda run\npid=catalina.pid\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_tomcat_background_defers_until_shutdown() -> Result<()> {
    let (dir, installation, source) = standalone_project("tomcat-9.0.80", "catalina.sh", "tomcat");
    let options = StartOptions {
        debug: true,
        background: true,
        tail: false,
    };

    let mut starter = ServerStarter::new(dir.path(), source);
    let outcome = starter.start_server(&options).await?;

    assert!(matches!(outcome, LaunchOutcome::Detached { tail_exit: None, .. }));
    assert_eq!(starter.pending_teardown(), 1);

    assert_eq!(starter.shutdown().await, 1);
    assert_eq!(starter.pending_teardown(), 0);
    assert_eq!(launch_log(&installation), "jpda start\npid=catalina.pid\n");

    Ok(())
}

#[tokio::test]
async fn test_tomcat_background_tail_waits_for_tail_process() -> Result<()> {
    let (dir, installation, source) = standalone_project("tomcat-9.0.80", "catalina.sh", "tomcat");
    fs::create_dir_all(installation.join("logs"))?;
    fs::write(installation.join("logs/catalina.out"), "Server startup in 1234 ms\n")?;

    // `cat` ends on its own, unlike `tail -f`.
    let config = Config {
        tail: TailConfig {
            command: "cat".to_string(),
            args: Vec::new(),
        },
        ..Config::default()
    };
    let options = StartOptions {
        debug: false,
        background: true,
        tail: true,
    };

    let outcome = ServerStarter::with_config(dir.path(), config, source)?
        .run(&options)
        .await?;

    match outcome {
        LaunchOutcome::Detached {
            tail_exit: Some(exit),
            ..
        } => assert!(exit.success),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(launch_log(&installation), "start\npid=catalina.pid\n");

    Ok(())
}

#[tokio::test]
async fn test_wildfly_ignores_background() -> Result<()> {
    let (dir, installation, source) = standalone_project("wildfly-23.0.0", "standalone.sh", "wildfly");
    let options = StartOptions {
        debug: true,
        background: true,
        tail: true,
    };

    let mut starter = ServerStarter::new(dir.path(), source);
    let outcome = starter.start_server(&options).await?;

    assert!(matches!(outcome, LaunchOutcome::Exited { .. }));
    assert_eq!(starter.pending_teardown(), 0);
    assert_eq!(launch_log(&installation), "--debug\npid=\n");
    assert!(!installation.join("logs").exists());

    Ok(())
}

#[tokio::test]
async fn test_missing_start_script_is_launch_failure() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("bundles/jboss-eap-7.4/bin")).unwrap();
    let source = StaticPropertySource::standalone(vec![
        [("app.server.parent.dir", "bundles"), ("app.server.type", "jboss")]
            .into_iter()
            .collect(),
    ]);

    let err = ServerStarter::new(dir.path(), source)
        .run(&StartOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProcessLaunch { executable, .. } if executable == "./standalone.sh"));
}

#[tokio::test]
async fn test_process_wait_reports_exit_code() -> Result<()> {
    let dir = tempdir()?;
    write_script(&dir.path().join("bin"), "fail.sh", 3)?;

    let mut process = ServerProcess::spawn(&LaunchDescriptor {
        executable: "./fail.sh".to_string(),
        arguments: vec!["x".to_string()],
        working_dir: dir.path().join("bin"),
        environment: BTreeMap::new(),
    })?;
    assert_eq!(process.status(), ServerStatus::Running);

    let exit = process.wait().await?;

    assert_eq!(exit.code, Some(3));
    assert!(!exit.success);
    assert_eq!(process.status(), ServerStatus::Terminated);

    Ok(())
}

#[tokio::test]
async fn test_interrupted_teardown_does_not_block() -> Result<()> {
    let dir = tempdir()?;
    let process = ServerProcess::spawn(&LaunchDescriptor {
        executable: "sleep".to_string(),
        arguments: vec!["5".to_string()],
        working_dir: dir.path().to_path_buf(),
        environment: BTreeMap::new(),
    })?;

    let mut teardown = Teardown::new();
    teardown.defer(process);

    let started = Instant::now();
    let completed = teardown.run_until(async {}).await;

    assert_eq!(completed, 0);
    assert!(started.elapsed() < Duration::from_secs(4));

    Ok(())
}
