//! Backend dependency installation (npm)

use crate::session::SessionCommand;
use spdev_core::prelude::*;
use std::path::Path;

/// Directory whose presence means dependencies were installed
pub const DEFAULT_INSTALL_MARKER: &str = "node_modules";

/// Whether `project_dir` already contains the install marker
pub fn dependencies_installed(project_dir: &Path, marker: &str) -> bool {
    project_dir.join(marker).exists()
}

/// Run the install command (`npm install`) in `project_dir`, blocking until it exits
pub async fn install_dependencies(project_dir: &Path, argv: &[String]) -> Result<()> {
    let command = SessionCommand::from_argv(project_dir, argv)?;
    command
        .run_to_completion()
        .await
        .map_err(|e| Error::dependency_install(e.to_string()))
}
