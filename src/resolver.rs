//! Server type and bundle directory resolution.
//!
//! Workspace projects name their bundle through `liferay.workspace.*`
//! properties; standalone projects through one or more `app.server.*`
//! property sets. Both paths end in a [`ResolvedServerConfig`].
use crate::config::{
    APP_SERVER_PARENT_DIR_PROPERTY, APP_SERVER_TYPE_PROPERTY, BUNDLE_ARTIFACT_NAME_PROPERTY,
    LIFERAY_HOME_DIR_PROPERTY, PROJECT_DIR_PLACEHOLDER, Properties, WorkspaceConfig,
};
use crate::error::{Error, ProjectError, Result};
use crate::project::ProjectContext;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Application server family
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerType {
    /// Apache Tomcat
    Tomcat,
    /// JBoss EAP
    Jboss,
    /// WildFly
    Wildfly,
    /// A type was configured but is not one this crate can start
    Unsupported(String),
    /// No type was configured at all
    Unresolved,
}

impl ServerType {
    /// Normalize a bundle artifact name to a server type.
    ///
    /// Containment is tested in the order `jboss`, `wildfly`, `tomcat`, so an
    /// artifact mentioning both `jboss` and `tomcat` is a JBoss bundle.
    ///
    /// # Examples
    ///
    /// ```
    /// use appserver_runner::resolver::ServerType;
    ///
    /// assert_eq!(ServerType::from_artifact_name("portal-tomcat-bundle"), ServerType::Tomcat);
    /// assert_eq!(ServerType::from_artifact_name("portal-jboss-tomcat"), ServerType::Jboss);
    /// assert_eq!(
    ///     ServerType::from_artifact_name("glassfish"),
    ///     ServerType::Unsupported("glassfish".to_string())
    /// );
    /// ```
    pub fn from_artifact_name(name: &str) -> Self {
        if name.contains("jboss") {
            Self::Jboss
        } else if name.contains("wildfly") {
            Self::Wildfly
        } else if name.contains("tomcat") {
            Self::Tomcat
        } else {
            Self::Unsupported(name.to_string())
        }
    }

    /// Parse an `app.server.type` value, which must be an exact token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "tomcat" => Self::Tomcat,
            "jboss" => Self::Jboss,
            "wildfly" => Self::Wildfly,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Directory name prefix identifying this server inside a bundle
    pub fn as_token(&self) -> &str {
        match self {
            Self::Tomcat => "tomcat",
            Self::Jboss => "jboss",
            Self::Wildfly => "wildfly",
            Self::Unsupported(raw) => raw,
            Self::Unresolved => "",
        }
    }

    /// Whether this crate knows how to start the server
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Tomcat | Self::Jboss | Self::Wildfly)
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// Where to look for a server and which kind to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServerConfig {
    /// Resolved server family
    pub server_type: ServerType,
    /// Absolute directory the bundle search starts from
    pub base_search_dir: PathBuf,
}

/// Resolve a workspace project's server from its workspace properties.
///
/// Blank or missing properties fall back to the defaults in `config`.
pub fn resolve_workspace(
    project: &ProjectContext,
    properties: &Properties,
    config: &WorkspaceConfig,
) -> ResolvedServerConfig {
    let home_dir = properties
        .get_non_blank(LIFERAY_HOME_DIR_PROPERTY)
        .unwrap_or(config.home_dir.as_str());
    let artifact_name = properties
        .get_non_blank(BUNDLE_ARTIFACT_NAME_PROPERTY)
        .unwrap_or(config.bundle_artifact_name.as_str());

    let server_type = ServerType::from_artifact_name(artifact_name);

    let home_path = Path::new(home_dir);
    let base_search_dir = if home_path.is_absolute() {
        normalize(home_path)
    } else {
        normalize(&project.root().join(home_path))
    };

    tracing::debug!(
        %server_type,
        base = %base_search_dir.display(),
        "Resolved workspace server"
    );

    ResolvedServerConfig {
        server_type,
        base_search_dir,
    }
}

/// Resolve a standalone project's server from its app server property sets.
///
/// Sets are scanned in order and the first non-blank value wins for each of
/// `app.server.parent.dir` and `app.server.type`.
///
/// # Errors
///
/// Returns [`Error::NotARecognizedProject`] when there are no property sets
/// or the project root cannot be canonicalized for `${project.dir}`.
pub fn resolve_standalone(
    project: &ProjectContext,
    sources: &[Properties],
) -> Result<ResolvedServerConfig> {
    if sources.is_empty() {
        return Err(Error::NotARecognizedProject(ProjectError::NoPropertySources));
    }

    let parent_dir = first_non_blank(sources, APP_SERVER_PARENT_DIR_PROPERTY);
    let server_type = first_non_blank(sources, APP_SERVER_TYPE_PROPERTY)
        .map(ServerType::from_token)
        .unwrap_or(ServerType::Unresolved);

    let parent_dir = match parent_dir {
        Some(dir) if dir.contains(PROJECT_DIR_PLACEHOLDER) => {
            let real_root = project
                .root()
                .canonicalize()
                .map_err(|e| Error::NotARecognizedProject(ProjectError::Io(e)))?;
            dir.replace(PROJECT_DIR_PLACEHOLDER, &real_root.to_string_lossy())
        }
        Some(dir) => dir.to_string(),
        None => String::new(),
    };

    let base_search_dir = if is_rooted(&parent_dir) {
        PathBuf::from(&parent_dir)
    } else {
        project.root().join(&parent_dir)
    };

    tracing::debug!(
        %server_type,
        base = %base_search_dir.display(),
        "Resolved standalone server"
    );

    Ok(ResolvedServerConfig {
        server_type,
        base_search_dir,
    })
}

fn first_non_blank<'a>(sources: &'a [Properties], key: &str) -> Option<&'a str> {
    sources.iter().find_map(|props| props.get_non_blank(key))
}

/// Whether a configured path starts at a filesystem root, on any platform.
fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Lexically remove `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
