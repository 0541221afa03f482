//! Step 3: backend dependencies, the dev server session and its health wait

use crate::config::BackendSettings;
use crate::reporter::Reporter;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_daemon::{dependencies_installed, SessionCommand};
use std::io::Write;
use std::path::Path;

/// How far the health wait got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    /// A probe answered 2xx after this many attempts
    Confirmed { attempts: u32 },
    /// Every attempt failed; the server may still be starting
    Unconfirmed,
}

/// Install dependencies when needed, start the dev server, wait for health
pub async fn start_backend<T, W>(
    toolchain: &T,
    backend_dir: &Path,
    settings: &BackendSettings,
    reporter: &mut Reporter<W>,
) -> Result<BackendStatus>
where
    T: LocalToolchain,
    W: Write,
{
    if !dependencies_installed(backend_dir, &settings.install_marker) {
        reporter.warning(format!(
            "{} missing. Running {}...",
            settings.install_marker,
            settings.install_command.join(" ")
        ));
        toolchain
            .install_dependencies(backend_dir, &settings.install_command)
            .await
            .inspect_err(|e| reporter.error(format!("Error starting the backend: {}", e)))?;
    }

    reporter.info("Starting backend in a new terminal...");
    let command = SessionCommand::from_argv(backend_dir, &settings.run_command)?;
    toolchain
        .spawn_session(&command)
        .inspect_err(|e| reporter.error(format!("Error starting the backend: {}", e)))?;

    reporter.info(format!(
        "Waiting for the backend to start (up to {} seconds)...",
        settings.health_budget().as_secs()
    ));
    let status = wait_for_health(toolchain, settings).await;

    match status {
        BackendStatus::Confirmed { attempts } => {
            debug!("Backend healthy after {} probes", attempts);
            reporter.success(format!("Backend running on {}", origin(&settings.health_url)));
        }
        BackendStatus::Unconfirmed => {
            reporter.warning(
                "Backend started, but the health check has not confirmed it yet (continuing in the background)",
            );
        }
    }
    Ok(status)
}

/// Sleep, then probe, up to `health_attempts` times
async fn wait_for_health<T: LocalToolchain>(
    toolchain: &T,
    settings: &BackendSettings,
) -> BackendStatus {
    for attempt in 1..=settings.health_attempts {
        toolchain.pause(settings.health_interval()).await;
        if toolchain.probe_health(&settings.health_url).await {
            return BackendStatus::Confirmed { attempts: attempt };
        }
        trace!("Health probe {}/{} failed", attempt, settings.health_attempts);
    }
    BackendStatus::Unconfirmed
}

/// `http://localhost:3000/health` -> `http://localhost:3000`
fn origin(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(slash) => &url[..after_scheme + slash],
        None => url,
    }
}
