use appserver_runner::config::{Properties, StaticPropertySource};
use appserver_runner::error::Result;
use appserver_runner::server::StartOptions;
use appserver_runner::{Config, ServerStarter};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // `RUST_LOG=appserver_runner=debug` shows how the bundle was resolved.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .init();

    tracing::info!("Starting start_server demo");

    // Flags a CLI would normally parse
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = StartOptions {
        debug: args.iter().any(|a| a == "--debug"),
        background: args.iter().any(|a| a == "--background"),
        tail: args.iter().any(|a| a == "--tail"),
    };

    let config = match std::env::var("APPSERVER_RUNNER_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::default(),
    };

    // Stand-ins for what a real caller reads from gradle.properties or
    // build.properties.
    let workspace: Properties = [("liferay.workspace.home.dir", "bundles")]
        .into_iter()
        .collect();
    let standalone: Properties = [
        ("app.server.parent.dir", "${project.dir}/bundles"),
        ("app.server.type", "tomcat"),
    ]
    .into_iter()
    .collect();

    let root = std::env::current_dir()?;
    let starter = ServerStarter::with_config(
        &root,
        config,
        StaticPropertySource::new(workspace, vec![standalone]),
    )?;

    println!("Starting server for {}", root.display());
    match starter.run(&options).await {
        Ok(outcome) => println!("Finished: {:?}", outcome),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
