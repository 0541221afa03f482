//! Tool availability checking for the dev environment
//!
//! Decides which flavor of docker compose to invoke and whether iOS
//! simulators can be listed at all.

use crate::compose::ComposeCommand;

/// Availability of external tools, resolved once per run
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    /// `docker` CLI on PATH
    pub docker: bool,

    /// Standalone `docker-compose` binary on PATH
    pub docker_compose: bool,

    /// `xcrun` on PATH (macOS with Xcode)
    pub xcrun: bool,
}

impl ToolAvailability {
    /// Check tool availability (run once at startup)
    pub fn check() -> Self {
        let availability = Self {
            docker: Self::on_path("docker"),
            docker_compose: Self::on_path("docker-compose"),
            xcrun: Self::on_path("xcrun"),
        };
        tracing::debug!("Tool availability: {:?}", availability);
        availability
    }

    fn on_path(program: &str) -> bool {
        which::which(program)
            .inspect_err(|e| tracing::debug!("{} not found on PATH: {}", program, e))
            .is_ok()
    }

    /// Compose flavor to use: the standalone binary when present, else the
    /// `docker compose` plugin.
    pub fn compose_command(&self) -> ComposeCommand {
        if self.docker_compose || !self.docker {
            ComposeCommand::Standalone
        } else {
            ComposeCommand::Plugin
        }
    }

    /// Get user-friendly message for unavailable iOS tools
    pub fn ios_unavailable_message(&self) -> Option<&'static str> {
        if self.xcrun {
            None
        } else if cfg!(target_os = "macos") {
            Some("Xcode not installed. Install Xcode to manage iOS simulators.")
        } else {
            Some("iOS simulators are only available on macOS.")
        }
    }
}
