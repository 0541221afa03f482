//! The start sequence: address, containers, backend, mobile app
//!
//! Steps run strictly in order. A fatal step reports its own failure and the
//! sequence returns [`Error::Aborted`]; the backend step only ever degrades to
//! a warning.

use crate::address::{detect_address, patch_api_service, ConfigPatch};
use crate::backend::{start_backend, BackendStatus};
use crate::config::{ProjectPaths, Settings};
use crate::containers::ContainerStack;
use crate::mobile::{start_mobile, MobileLaunch};
use crate::reporter::{Reporter, ServiceEndpoint};
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_core::DetectedAddress;
use std::io::Write;

const STEP_COUNT: usize = 4;

/// Services reachable once the sequence completes
pub const SERVICE_ENDPOINTS: &[ServiceEndpoint] = &[
    ServiceEndpoint {
        name: "Backend API",
        location: "http://localhost:3000",
    },
    ServiceEndpoint {
        name: "PostgreSQL",
        location: "localhost:5432",
    },
    ServiceEndpoint {
        name: "Adminer",
        location: "http://localhost:8080",
    },
    ServiceEndpoint {
        name: "MQTT",
        location: "localhost:1883",
    },
    ServiceEndpoint {
        name: "Flutter App",
        location: "iPhone Simulator",
    },
];

const STARTUP_NOTES: &[&str] = &[
    "The backend and Flutter run in separate terminals",
    "Press 'r' in the Flutter terminal for hot reload, 'R' for hot restart",
    "Press Ctrl+C in each terminal to stop a service",
    "Run spdev-stop to stop everything",
];

/// What the start sequence did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub address: DetectedAddress,
    pub config: ConfigPatch,
    pub containers: Vec<String>,
    /// `None` when the backend step failed and the sequence continued
    pub backend: Option<BackendStatus>,
    pub mobile: MobileLaunch,
}

impl StartupReport {
    /// UDID the app was launched on, if a preferred simulator was found
    pub fn device(&self) -> Option<&str> {
        self.mobile.device.as_deref()
    }
}

fn step<W: Write>(reporter: &mut Reporter<W>, number: usize, title: &str) {
    // The header already ends with a blank line
    if number > 1 {
        reporter.blank();
    }
    reporter.info(format!("Step {}/{}: {}", number, STEP_COUNT, title));
}

/// Run the whole start sequence
pub async fn run_startup<T, W>(
    toolchain: &T,
    paths: &ProjectPaths,
    settings: &Settings,
    reporter: &mut Reporter<W>,
) -> Result<StartupReport>
where
    T: LocalToolchain,
    W: Write,
{
    reporter.header("SMART PARKING - STARTING ALL SERVICES");
    info!("Project root: {}", paths.root.display());

    step(reporter, 1, "Detecting local IP address...");
    let address = detect_address(toolchain, reporter).await;
    let config = match patch_api_service(&paths.api_service_file, &address.host(), reporter) {
        Ok(config) => config,
        Err(e) => {
            debug!("Config patch failed: {}", e);
            reporter.error("Could not update the IP in the Flutter app");
            return Err(Error::aborted("update mobile configuration"));
        }
    };

    step(reporter, 2, "Checking Docker...");
    let mut stack = ContainerStack::new(&paths.infra_dir, settings.containers.grace_period());
    if stack.check_runtime(toolchain, reporter).await.is_err() {
        return Err(Error::aborted("check container runtime"));
    }
    let containers = match stack.bring_up(toolchain, reporter).await {
        Ok(names) => names,
        Err(e) => {
            debug!("Container stack failed: {}", e);
            reporter.error("Could not start Docker containers");
            return Err(Error::aborted("start containers"));
        }
    };

    step(reporter, 3, "Starting backend...");
    let backend = match start_backend(toolchain, &paths.backend_dir, &settings.backend, reporter)
        .await
    {
        Ok(status) => Some(status),
        Err(e) => {
            warn!("Backend launch failed: {}", e);
            reporter.warning("Backend did not start correctly, continuing...");
            None
        }
    };

    step(reporter, 4, "Starting Flutter...");
    let mobile = match start_mobile(toolchain, &paths.mobile_dir, &settings.mobile, reporter).await
    {
        Ok(launch) => launch,
        Err(e) => {
            debug!("Mobile launch failed: {}", e);
            reporter.error("Could not start the Flutter app");
            return Err(Error::aborted("start mobile app"));
        }
    };

    reporter.header("ALL SERVICES STARTED");
    reporter.services_summary(SERVICE_ENDPOINTS, &address.to_string());
    reporter.blank();
    reporter.notes(STARTUP_NOTES);
    reporter.blank();

    Ok(StartupReport {
        address,
        config,
        containers,
        backend,
        mobile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{write_project_fixture, Call, FakeToolchain};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_full_sequence_order() {
        let temp = tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", true).unwrap();
        let toolchain = FakeToolchain::new()
            .with_containers(&["postgres"])
            .healthy_after(1);
        let mut reporter = Reporter::new(Vec::new(), false);

        let report = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap();

        assert_eq!(report.backend, Some(BackendStatus::Confirmed { attempts: 1 }));
        assert_eq!(report.device(), None);
        assert_eq!(
            toolchain.sessions(),
            vec!["npm run start:dev".to_string(), "flutter run".to_string()]
        );

        let calls = toolchain.calls();
        let position = |wanted: &Call| calls.iter().position(|c| c == wanted).unwrap();
        assert!(position(&Call::DetectAddress) < position(&Call::RuntimeCheck));
        assert!(position(&Call::ListContainers) < position(&Call::ListSimulators));

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let steps: Vec<&str> = output.lines().filter(|l| l.contains("Step ")).collect();
        assert_eq!(
            steps,
            vec![
                "ℹ Step 1/4: Detecting local IP address...",
                "ℹ Step 2/4: Checking Docker...",
                "ℹ Step 3/4: Starting backend...",
                "ℹ Step 4/4: Starting Flutter...",
            ]
        );
        assert!(output.contains("ALL SERVICES STARTED"));
        assert!(output.contains("  • Adminer: http://localhost:8080"));
        assert!(!output.contains("\n\n\n"));
    }

    #[tokio::test]
    async fn test_missing_declaration_continues() {
        let temp = tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", true).unwrap();
        std::fs::write(
            &paths.api_service_file,
            "static const String baseUrl = 'http://api.example.com';\n",
        )
        .unwrap();
        let toolchain = FakeToolchain::new();
        let mut reporter = Reporter::new(Vec::new(), false);

        let report = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap();

        assert_eq!(report.config, ConfigPatch::DeclarationMissing);
        assert!(toolchain.calls().contains(&Call::RuntimeCheck));
        assert_eq!(
            std::fs::read_to_string(&paths.api_service_file).unwrap(),
            "static const String baseUrl = 'http://api.example.com';\n"
        );
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("⚠ No baseUrl declaration found in api_service.dart"));
        assert!(output.contains("ALL SERVICES STARTED"));
    }

    #[tokio::test]
    async fn test_missing_config_aborts_before_docker() {
        let temp = tempdir().unwrap();
        let paths = ProjectPaths::resolve(temp.path(), &Default::default());
        let toolchain = FakeToolchain::new();
        let mut reporter = Reporter::new(Vec::new(), false);

        let err = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Aborted { .. }));
        assert_eq!(toolchain.calls(), vec![Call::DetectAddress]);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("✗ Could not update the IP in the Flutter app"));
    }

    #[tokio::test]
    async fn test_compose_failure_aborts() {
        let temp = tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", true).unwrap();
        let toolchain = FakeToolchain::new().with_compose_up_failure();
        let mut reporter = Reporter::new(Vec::new(), false);

        let err = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Aborted { .. }));
        assert!(toolchain.sessions().is_empty());
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("✗ Could not start Docker containers"));
    }

    #[tokio::test]
    async fn test_backend_failure_continues_to_mobile() {
        let temp = tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", false).unwrap();
        let toolchain = FakeToolchain::new().with_install_failure();
        let mut reporter = Reporter::new(Vec::new(), false);

        let report = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap();

        assert_eq!(report.backend, None);
        assert_eq!(toolchain.sessions(), vec!["flutter run".to_string()]);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("⚠ Backend did not start correctly, continuing..."));
    }

    #[tokio::test]
    async fn test_mobile_spawn_failure_aborts() {
        let temp = tempdir().unwrap();
        let paths = write_project_fixture(temp.path(), "10.0.0.5", true).unwrap();
        let toolchain = FakeToolchain::new().with_spawn_failure();
        let mut reporter = Reporter::new(Vec::new(), false);

        let err = run_startup(&toolchain, &paths, &Settings::default(), &mut reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Aborted { .. }));
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("✗ Could not start the Flutter app"));
        assert!(!output.contains("ALL SERVICES STARTED"));
    }
}
