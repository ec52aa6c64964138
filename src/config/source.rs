use crate::config::Properties;
use crate::error::ProjectError;
use async_trait::async_trait;
use std::path::Path;

/// Supplies the parsed property maps a start request resolves against.
///
/// Locating and parsing `gradle.properties`, `build.properties` and friends
/// belongs to the caller; implementations hand over the resulting maps.
///
/// # Examples
///
/// ```
/// use appserver_runner::config::{Properties, PropertySource, StaticPropertySource};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = StaticPropertySource::standalone(vec![
///     [("app.server.type", "tomcat")].into_iter().collect::<Properties>(),
/// ]);
///
/// let sources = source.app_server_properties(Path::new("/work/project")).await.unwrap();
/// assert_eq!(sources.len(), 1);
/// # }
/// ```
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Properties of a workspace project (its `gradle.properties` equivalent).
    async fn workspace_properties(&self, root: &Path) -> Result<Properties, ProjectError>;

    /// App server property sets of a standalone project, highest precedence first.
    async fn app_server_properties(&self, root: &Path) -> Result<Vec<Properties>, ProjectError>;
}

/// A [`PropertySource`] backed by maps held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPropertySource {
    workspace: Properties,
    app_server: Vec<Properties>,
}

impl StaticPropertySource {
    /// Create a source with the given workspace and app server properties
    pub fn new(workspace: Properties, app_server: Vec<Properties>) -> Self {
        Self {
            workspace,
            app_server,
        }
    }

    /// Create a source that only carries workspace properties
    pub fn workspace(properties: Properties) -> Self {
        Self::new(properties, Vec::new())
    }

    /// Create a source that only carries app server properties
    pub fn standalone(app_server: Vec<Properties>) -> Self {
        Self::new(Properties::new(), app_server)
    }
}

#[async_trait]
impl PropertySource for StaticPropertySource {
    async fn workspace_properties(&self, _root: &Path) -> Result<Properties, ProjectError> {
        Ok(self.workspace.clone())
    }

    async fn app_server_properties(&self, _root: &Path) -> Result<Vec<Properties>, ProjectError> {
        if self.app_server.is_empty() {
            return Err(ProjectError::NoPropertySources);
        }
        Ok(self.app_server.clone())
    }
}
