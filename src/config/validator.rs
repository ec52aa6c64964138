use crate::config::{Config, TailConfig, WorkspaceConfig};
use crate::error::{Error, Result};

/// Validates the workspace section
pub fn validate_workspace_config(config: &WorkspaceConfig) -> Result<()> {
    if config.home_dir.trim().is_empty() {
        return Err(Error::ConfigInvalid(
            "Workspace home directory default is empty".to_string(),
        ));
    }

    if config.bundle_artifact_name.trim().is_empty() {
        return Err(Error::ConfigInvalid(
            "Workspace bundle artifact name default is empty".to_string(),
        ));
    }

    for (index, marker) in config.markers.iter().enumerate() {
        if marker.file.trim().is_empty() || marker.token.trim().is_empty() {
            return Err(Error::ConfigInvalid(format!(
                "Workspace marker {} needs both a file and a token",
                index
            )));
        }
    }

    Ok(())
}

/// Validates the tail section
pub fn validate_tail_config(config: &TailConfig) -> Result<()> {
    if config.command.trim().is_empty() {
        return Err(Error::ConfigInvalid("Tail command is empty".to_string()));
    }

    Ok(())
}

/// Full configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workspace_config(&config.workspace)?;
    validate_tail_config(&config.tail)?;

    Ok(())
}
