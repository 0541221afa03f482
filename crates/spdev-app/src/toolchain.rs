//! Seam between the start/stop sequences and the outside world
//!
//! Every external effect the sequences have (subprocesses, sockets, HTTP,
//! sleeping) goes through [`LocalToolchain`]. Production uses
//! [`SystemToolchain`]; tests drive the sequences with a recording fake.

use crate::config::Settings;
use spdev_core::prelude::*;
use spdev_core::{DetectedAddress, ProcessEntry};
use spdev_daemon::{
    AddressProbe, ComposeCommand, HealthProbe, IosSimulator, SessionCommand, SessionSpawner,
    ToolAvailability,
};
use std::path::Path;
use std::time::Duration;

/// External operations used by the start and stop sequences
#[trait_variant::make(Toolchain: Send)]
pub trait LocalToolchain {
    /// Best-effort local address. Never fails.
    async fn detect_address(&self) -> DetectedAddress;

    /// Whether the container runtime answers (`docker ps`)
    async fn container_runtime_available(&self) -> bool;

    async fn compose_up(&self, infra_dir: &Path) -> Result<()>;

    async fn compose_down(&self, infra_dir: &Path) -> Result<()>;

    /// Names of the running containers
    async fn running_containers(&self) -> Result<Vec<String>>;

    /// Run the dependency install command in `project_dir`, blocking
    async fn install_dependencies(&self, project_dir: &Path, argv: &[String]) -> Result<()>;

    /// Start `command` in a new terminal session, detached
    fn spawn_session(&self, command: &SessionCommand) -> Result<()>;

    /// `true` when `url` answers with a 2xx status
    async fn probe_health(&self, url: &str) -> bool;

    async fn list_simulators(&self) -> Result<Vec<IosSimulator>>;

    async fn boot_simulator(&self, udid: &str) -> Result<()>;

    async fn open_simulator_app(&self) -> Result<()>;

    async fn list_processes(&self) -> Result<Vec<ProcessEntry>>;

    async fn terminate(&self, pid: u32) -> Result<()>;

    /// Fixed wait (grace periods, poll interval)
    async fn pause(&self, duration: Duration);
}

/// The real thing: tokio subprocesses, a UDP probe and an HTTP client
pub struct SystemToolchain {
    compose: ComposeCommand,
    address_probe: AddressProbe,
    spawner: Box<dyn SessionSpawner>,
    health: HealthProbe,
    /// Set when `xcrun` is missing; simulator listing is skipped
    ios_unavailable: Option<&'static str>,
}

impl SystemToolchain {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_tools(settings, ToolAvailability::check())
    }

    pub fn with_tools(settings: &Settings, tools: ToolAvailability) -> Result<Self> {
        let ios_unavailable = tools.ios_unavailable_message();
        if let Some(message) = ios_unavailable {
            warn!("{}", message);
        }

        let compose = tools.compose_command();
        let spawner = spdev_daemon::platform_spawner();
        debug!(
            "Compose via '{}', sessions via {}",
            compose.display_name(),
            spawner.name()
        );

        Ok(Self {
            compose,
            address_probe: AddressProbe {
                interface: settings.network.interface.clone(),
                probe_target: settings.network.probe_target.clone(),
            },
            spawner,
            health: HealthProbe::new().context("Failed to set up the backend health probe")?,
            ios_unavailable,
        })
    }
}

impl Toolchain for SystemToolchain {
    async fn detect_address(&self) -> DetectedAddress {
        spdev_daemon::detect_local_address(&self.address_probe).await
    }

    async fn container_runtime_available(&self) -> bool {
        spdev_daemon::is_runtime_available().await
    }

    async fn compose_up(&self, infra_dir: &Path) -> Result<()> {
        spdev_daemon::compose_up(self.compose, infra_dir).await
    }

    async fn compose_down(&self, infra_dir: &Path) -> Result<()> {
        spdev_daemon::compose_down(self.compose, infra_dir).await
    }

    async fn running_containers(&self) -> Result<Vec<String>> {
        spdev_daemon::running_container_names().await
    }

    async fn install_dependencies(&self, project_dir: &Path, argv: &[String]) -> Result<()> {
        spdev_daemon::install_dependencies(project_dir, argv).await
    }

    fn spawn_session(&self, command: &SessionCommand) -> Result<()> {
        info!(
            "Opening {} session: {}",
            self.spawner.name(),
            command.display()
        );
        self.spawner.spawn_detached(command)
    }

    async fn probe_health(&self, url: &str) -> bool {
        self.health.check(url).await
    }

    async fn list_simulators(&self) -> Result<Vec<IosSimulator>> {
        if let Some(message) = self.ios_unavailable {
            return Err(Error::simulator(message));
        }
        spdev_daemon::list_ios_simulators().await
    }

    async fn boot_simulator(&self, udid: &str) -> Result<()> {
        spdev_daemon::boot_simulator(udid).await
    }

    async fn open_simulator_app(&self) -> Result<()> {
        spdev_daemon::open_simulator_app().await
    }

    async fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        spdev_daemon::list_processes().await
    }

    async fn terminate(&self, pid: u32) -> Result<()> {
        spdev_daemon::terminate(pid).await
    }

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
