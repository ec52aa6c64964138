use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Workspace property naming the Liferay home directory.
pub const LIFERAY_HOME_DIR_PROPERTY: &str = "liferay.workspace.home.dir";

/// Workspace property naming the bundle artifact.
pub const BUNDLE_ARTIFACT_NAME_PROPERTY: &str = "liferay.workspace.bundle.artifact.name";

/// Standalone property naming the directory that holds the server bundle.
pub const APP_SERVER_PARENT_DIR_PROPERTY: &str = "app.server.parent.dir";

/// Standalone property naming the server type.
pub const APP_SERVER_TYPE_PROPERTY: &str = "app.server.type";

/// Placeholder in `app.server.parent.dir` replaced by the project's real path.
pub const PROJECT_DIR_PLACEHOLDER: &str = "${project.dir}";

/// An already-parsed set of key/value properties.
///
/// # Examples
///
/// ```
/// use appserver_runner::config::Properties;
///
/// let props: Properties = [("app.server.type", "tomcat"), ("app.server.parent.dir", "  ")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(props.get_non_blank("app.server.type"), Some("tomcat"));
/// assert_eq!(props.get_non_blank("app.server.parent.dir"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, String>);

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a property exactly as stored
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a property, treating empty or whitespace-only values as absent
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no properties
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
