use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Liferay home directory, relative to the workspace root.
const DEFAULT_HOME_DIR: &str = "bundles";

/// Default bundle artifact when a workspace does not name one.
const DEFAULT_BUNDLE_ARTIFACT_NAME: &str = "portal-tomcat-bundle";

/// A file whose contents mark a project root as a workspace.
///
/// The marker matches when `file` exists directly under the project root and
/// its text contains `token`.
///
/// # Examples
///
/// ```
/// use appserver_runner::config::WorkspaceMarker;
///
/// let marker = WorkspaceMarker {
///     file: "settings.gradle".to_string(),
///     token: "com.liferay.workspace".to_string(),
/// };
/// assert_eq!(marker.file, "settings.gradle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMarker {
    /// File name relative to the project root.
    pub file: String,
    /// Text that must appear in the file.
    pub token: String,
}

impl WorkspaceMarker {
    fn new(file: &str, token: &str) -> Self {
        Self {
            file: file.to_string(),
            token: token.to_string(),
        }
    }
}

/// Settings that apply to workspace projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    /// Home directory used when `liferay.workspace.home.dir` is absent or blank.
    pub home_dir: String,

    /// Artifact name used when `liferay.workspace.bundle.artifact.name` is
    /// absent or blank.
    pub bundle_artifact_name: String,

    /// Files checked, in order, to recognize a workspace root.
    pub markers: Vec<WorkspaceMarker>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            home_dir: DEFAULT_HOME_DIR.to_string(),
            bundle_artifact_name: DEFAULT_BUNDLE_ARTIFACT_NAME.to_string(),
            markers: vec![
                WorkspaceMarker::new("settings.gradle", "com.liferay.workspace"),
                WorkspaceMarker::new("settings.gradle.kts", "com.liferay.workspace"),
                WorkspaceMarker::new("build.gradle", "com.liferay.workspace"),
                WorkspaceMarker::new("pom.xml", "com.liferay.portal.tools.bundle.support"),
            ],
        }
    }
}

/// Command used to follow `catalina.out` for a background Tomcat.
///
/// The log file name is appended after `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Program to run.
    pub command: String,
    /// Arguments placed before the log file name.
    pub args: Vec<String>,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            command: "tail".to_string(),
            args: vec!["-f".to_string()],
        }
    }
}

/// Main configuration for the App Server Runner.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// # JSON Schema
///
/// ```json
/// {
///   "workspace": {
///     "homeDir": "bundles",
///     "bundleArtifactName": "portal-tomcat-bundle",
///     "markers": [
///       { "file": "settings.gradle", "token": "com.liferay.workspace" }
///     ]
///   },
///   "tail": {
///     "command": "tail",
///     "args": ["-f"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace defaults and detection markers.
    pub workspace: WorkspaceConfig,
    /// Log tailing for background Tomcat starts.
    pub tail: TailConfig,
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
    /// as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON or YAML
    /// * The document does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::parse_from_str(&content),
        }
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON or does not conform
    /// to the expected schema.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Parses a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid YAML or does not conform
    /// to the expected schema.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse YAML config: {}", e)))
    }
}
