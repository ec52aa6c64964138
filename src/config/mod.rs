//! Configuration module for App Server Runner.
//!
//! This module handles the runner's own settings (workspace defaults,
//! workspace detection markers, log tailing), the already-parsed property
//! maps consumed from projects, and the [`PropertySource`] seam through which
//! those maps are obtained.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use appserver_runner::config::Config;
//!
//! let config = Config::from_file("runner.json").unwrap();
//! println!("Bundles are expected under {}", config.workspace.home_dir);
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use appserver_runner::config::{Config, TailConfig};
//!
//! let config = Config {
//!     tail: TailConfig {
//!         command: "tail".to_string(),
//!         args: vec!["-F".to_string()],
//!     },
//!     ..Config::default()
//! };
//! assert_eq!(config.workspace.home_dir, "bundles");
//! ```
mod parser;
mod properties;
mod source;
pub mod validator;

pub use parser::{Config, TailConfig, WorkspaceConfig, WorkspaceMarker};
pub use properties::{
    APP_SERVER_PARENT_DIR_PROPERTY, APP_SERVER_TYPE_PROPERTY, BUNDLE_ARTIFACT_NAME_PROPERTY,
    LIFERAY_HOME_DIR_PROPERTY, PROJECT_DIR_PLACEHOLDER, Properties,
};
pub use source::{PropertySource, StaticPropertySource};
pub use validator::validate_config;
