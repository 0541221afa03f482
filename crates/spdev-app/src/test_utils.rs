//! Test utilities for driving the start/stop sequences
//!
//! [`FakeToolchain`] records every external call in order and answers from
//! canned data. Its `pause` returns immediately.

use crate::config::{PathSettings, ProjectPaths};
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_core::{parse_process_listing, DetectedAddress, ProcessEntry};
use spdev_daemon::{IosSimulator, SessionCommand, SimulatorState};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One recorded toolchain call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DetectAddress,
    RuntimeCheck,
    ComposeUp(PathBuf),
    ComposeDown(PathBuf),
    ListContainers,
    InstallDependencies(Vec<String>),
    /// Rendered command line of the session
    SpawnSession(String),
    ProbeHealth(String),
    ListSimulators,
    BootSimulator(String),
    OpenSimulatorApp,
    ListProcesses,
    Terminate(u32),
    Pause(Duration),
}

/// Recording fake for [`LocalToolchain`]
pub struct FakeToolchain {
    calls: RefCell<Vec<Call>>,
    address: DetectedAddress,
    runtime_available: bool,
    compose_up_fails: bool,
    compose_down_fails: bool,
    containers: Vec<String>,
    install_fails: bool,
    spawn_fails: bool,
    /// Probe number (1-based) from which health checks succeed
    healthy_after: Option<u32>,
    probes: Cell<u32>,
    simulators: Option<Vec<IosSimulator>>,
    simulator_commands_fail: bool,
    processes: Option<Vec<ProcessEntry>>,
    failing_pids: HashSet<u32>,
}

impl Default for FakeToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeToolchain {
    /// Healthy runtime, no containers, health never confirmed, no simulator
    /// or process listing available.
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            address: DetectedAddress::Interface(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 50))),
            runtime_available: true,
            compose_up_fails: false,
            compose_down_fails: false,
            containers: Vec::new(),
            install_fails: false,
            spawn_fails: false,
            healthy_after: None,
            probes: Cell::new(0),
            simulators: None,
            simulator_commands_fail: false,
            processes: None,
            failing_pids: HashSet::new(),
        }
    }

    pub fn with_address(mut self, address: DetectedAddress) -> Self {
        self.address = address;
        self
    }

    pub fn without_container_runtime(mut self) -> Self {
        self.runtime_available = false;
        self
    }

    pub fn with_compose_up_failure(mut self) -> Self {
        self.compose_up_fails = true;
        self
    }

    pub fn with_compose_down_failure(mut self) -> Self {
        self.compose_down_fails = true;
        self
    }

    pub fn with_containers(mut self, names: &[&str]) -> Self {
        self.containers = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_install_failure(mut self) -> Self {
        self.install_fails = true;
        self
    }

    pub fn with_spawn_failure(mut self) -> Self {
        self.spawn_fails = true;
        self
    }

    /// Health probes fail until the `attempt`-th one
    pub fn healthy_after(mut self, attempt: u32) -> Self {
        self.healthy_after = Some(attempt);
        self
    }

    pub fn with_simulators(mut self, simulators: Vec<IosSimulator>) -> Self {
        self.simulators = Some(simulators);
        self
    }

    /// `boot` and `open -a Simulator` fail
    pub fn with_simulator_failures(mut self) -> Self {
        self.simulator_commands_fail = true;
        self
    }

    /// `ps aux` style lines
    pub fn with_processes(mut self, lines: &[&str]) -> Self {
        self.processes = Some(parse_process_listing(&lines.join("\n")));
        self
    }

    pub fn with_failing_pid(mut self, pid: u32) -> Self {
        self.failing_pids.insert(pid);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// PIDs that were signalled successfully
    pub fn terminated(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Terminate(pid) if !self.failing_pids.contains(pid) => Some(*pid),
                _ => None,
            })
            .collect()
    }

    /// Command lines of the sessions that were opened
    pub fn sessions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::SpawnSession(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl LocalToolchain for FakeToolchain {
    async fn detect_address(&self) -> DetectedAddress {
        self.record(Call::DetectAddress);
        self.address.clone()
    }

    async fn container_runtime_available(&self) -> bool {
        self.record(Call::RuntimeCheck);
        self.runtime_available
    }

    async fn compose_up(&self, infra_dir: &Path) -> Result<()> {
        self.record(Call::ComposeUp(infra_dir.to_path_buf()));
        if self.compose_up_fails {
            return Err(Error::compose("'docker-compose up -d' exited with code 1"));
        }
        Ok(())
    }

    async fn compose_down(&self, infra_dir: &Path) -> Result<()> {
        self.record(Call::ComposeDown(infra_dir.to_path_buf()));
        if self.compose_down_fails {
            return Err(Error::compose("'docker-compose down' exited with code 1"));
        }
        Ok(())
    }

    async fn running_containers(&self) -> Result<Vec<String>> {
        self.record(Call::ListContainers);
        Ok(self.containers.clone())
    }

    async fn install_dependencies(&self, _project_dir: &Path, argv: &[String]) -> Result<()> {
        self.record(Call::InstallDependencies(argv.to_vec()));
        if self.install_fails {
            return Err(Error::dependency_install("'npm install' exited with code 1"));
        }
        Ok(())
    }

    fn spawn_session(&self, command: &SessionCommand) -> Result<()> {
        self.record(Call::SpawnSession(command.display()));
        if self.spawn_fails {
            return Err(Error::session("osascript is not available"));
        }
        Ok(())
    }

    async fn probe_health(&self, url: &str) -> bool {
        self.record(Call::ProbeHealth(url.to_string()));
        let attempt = self.probes.get() + 1;
        self.probes.set(attempt);
        self.healthy_after.is_some_and(|n| attempt >= n)
    }

    async fn list_simulators(&self) -> Result<Vec<IosSimulator>> {
        self.record(Call::ListSimulators);
        self.simulators
            .clone()
            .ok_or_else(|| Error::tool_not_found("xcrun"))
    }

    async fn boot_simulator(&self, udid: &str) -> Result<()> {
        self.record(Call::BootSimulator(udid.to_string()));
        if self.simulator_commands_fail {
            return Err(Error::simulator("Failed to boot simulator"));
        }
        Ok(())
    }

    async fn open_simulator_app(&self) -> Result<()> {
        self.record(Call::OpenSimulatorApp);
        if self.simulator_commands_fail {
            return Err(Error::simulator("Failed to open Simulator.app"));
        }
        Ok(())
    }

    async fn list_processes(&self) -> Result<Vec<ProcessEntry>> {
        self.record(Call::ListProcesses);
        self.processes
            .clone()
            .ok_or_else(|| Error::tool_not_found("ps"))
    }

    async fn terminate(&self, pid: u32) -> Result<()> {
        self.record(Call::Terminate(pid));
        if self.failing_pids.contains(&pid) {
            return Err(Error::process_exit(format!("kill {}", pid), Some(1)));
        }
        Ok(())
    }

    async fn pause(&self, duration: Duration) {
        self.record(Call::Pause(duration));
    }
}

/// Creates a test simulator.
///
/// # Arguments
/// * `udid` - Simulator UDID
/// * `name` - Device name, e.g. "iPhone 16 Plus"
/// * `runtime` - Friendly runtime name, e.g. "iOS 26.1"
/// * `state` - Boot state
pub fn test_simulator(
    udid: &str,
    name: &str,
    runtime: &str,
    state: SimulatorState,
) -> IosSimulator {
    IosSimulator {
        udid: udid.to_string(),
        name: name.to_string(),
        runtime: runtime.to_string(),
        state,
    }
}

/// Lay out a project tree under `root` with the default paths.
///
/// The Dart source declares `baseUrl` with `host`. `node_modules` is created
/// when `installed` is set.
pub fn write_project_fixture(
    root: &Path,
    host: &str,
    installed: bool,
) -> std::io::Result<ProjectPaths> {
    let paths = ProjectPaths::resolve(root, &PathSettings::default());
    std::fs::create_dir_all(&paths.infra_dir)?;
    std::fs::create_dir_all(&paths.mobile_dir)?;
    std::fs::create_dir_all(&paths.backend_dir)?;
    if installed {
        std::fs::create_dir_all(paths.backend_dir.join("node_modules"))?;
    }
    if let Some(parent) = paths.api_service_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(
        &paths.api_service_file,
        format!(
            "import 'package:http/http.dart' as http;\n\nclass ApiService {{\n  static const String baseUrl = 'http://{}:3000';\n}}\n",
            host
        ),
    )?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_records_in_order() {
        let fake = FakeToolchain::new().healthy_after(2);

        assert!(!fake.probe_health("http://localhost:3000/health").await);
        assert!(fake.probe_health("http://localhost:3000/health").await);
        fake.pause(Duration::from_secs(1)).await;

        assert_eq!(
            fake.calls(),
            vec![
                Call::ProbeHealth("http://localhost:3000/health".to_string()),
                Call::ProbeHealth("http://localhost:3000/health".to_string()),
                Call::Pause(Duration::from_secs(1)),
            ]
        );
    }

    #[test]
    fn test_project_fixture_layout() {
        let temp = tempfile::tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", false).unwrap();

        assert!(paths.infra_dir.is_dir());
        assert!(!paths.backend_dir.join("node_modules").exists());
        let content = std::fs::read_to_string(&paths.api_service_file).unwrap();
        assert!(content.contains("baseUrl = 'http://10.0.0.5:3000'"));
    }
}
