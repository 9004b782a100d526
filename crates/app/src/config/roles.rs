//! Role Hierarchy Config

use std::path::PathBuf;

use clap::Args;
use pickflow::roles::{RoleHierarchy, RoleHierarchyError};

/// Role hierarchy settings.
#[derive(Debug, Args)]
pub struct RolesConfig {
    /// YAML file with role names and ranks; the built-in table is used when unset
    #[arg(long, env = "ROLE_HIERARCHY_FILE")]
    pub role_hierarchy_file: Option<PathBuf>,
}

impl RolesConfig {
    /// Load the configured hierarchy, falling back to the built-in table.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or fails validation.
    pub fn load(&self) -> Result<RoleHierarchy, RoleHierarchyError> {
        match &self.role_hierarchy_file {
            Some(path) => RoleHierarchy::from_yaml_file(path),
            None => Ok(RoleHierarchy::default()),
        }
    }
}
