//! Configuration types for the dev launcher
//!
//! Every field defaults to the values the Smart Parking repository layout
//! uses, so an absent `.spdev/config.toml` means "stock setup".

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Launcher settings (.spdev/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub containers: ContainerSettings,

    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub mobile: MobileSettings,

    #[serde(default)]
    pub shutdown: ShutdownSettings,
}

/// Repository layout, relative to the project root
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    /// Directory holding the docker compose file
    pub infra_dir: PathBuf,
    /// NestJS backend
    pub backend_dir: PathBuf,
    /// Flutter app
    pub mobile_dir: PathBuf,
    /// Dart source declaring `baseUrl`
    pub api_service_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            infra_dir: PathBuf::from("infra"),
            backend_dir: PathBuf::from("apps/api"),
            mobile_dir: PathBuf::from("apps/mobile"),
            api_service_file: PathBuf::from("apps/mobile/lib/services/api_service.dart"),
        }
    }
}

/// Local address detection
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Interface queried with `ipconfig getifaddr`
    pub interface: String,
    /// `ip:port` the fallback UDP socket connects to
    pub probe_target: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            interface: "en0".to_string(),
            probe_target: "8.8.8.8:80".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Fixed wait after `compose up` before listing containers
    pub grace_period_secs: u64,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            grace_period_secs: 5,
        }
    }
}

impl ContainerSettings {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Directory inside the backend whose presence means "installed"
    pub install_marker: String,
    pub install_command: Vec<String>,
    pub run_command: Vec<String>,
    pub health_url: String,
    /// Number of health probes before giving up
    pub health_attempts: u32,
    /// Wait before each probe
    pub health_interval_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            install_marker: "node_modules".to_string(),
            install_command: vec!["npm".to_string(), "install".to_string()],
            run_command: vec![
                "npm".to_string(),
                "run".to_string(),
                "start:dev".to_string(),
            ],
            health_url: "http://localhost:3000/health".to_string(),
            health_attempts: 20,
            health_interval_ms: 1000,
        }
    }
}

impl BackendSettings {
    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms)
    }

    /// Upper bound of the health wait, for the status line
    pub fn health_budget(&self) -> Duration {
        self.health_interval().saturating_mul(self.health_attempts)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MobileSettings {
    /// Friendly simctl runtime name
    pub preferred_runtime: String,
    /// Substring of the simulator name
    pub preferred_model: String,
    /// Fixed wait after booting or opening the simulator
    pub boot_grace_period_secs: u64,
    /// `-d <udid>` is appended when a preferred simulator is found
    pub run_command: Vec<String>,
}

impl Default for MobileSettings {
    fn default() -> Self {
        Self {
            preferred_runtime: "iOS 26.1".to_string(),
            preferred_model: "iPhone 16 Plus".to_string(),
            boot_grace_period_secs: 5,
            run_command: vec!["flutter".to_string(), "run".to_string()],
        }
    }
}

impl MobileSettings {
    pub fn boot_grace_period(&self) -> Duration {
        Duration::from_secs(self.boot_grace_period_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownSettings {
    /// Token a backend command line must contain to be stopped
    pub project_keyword: String,
}

impl Default for ShutdownSettings {
    fn default() -> Self {
        Self {
            project_keyword: "smart-parking".to_string(),
        }
    }
}

/// Absolute locations derived from the project root and [`PathSettings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub infra_dir: PathBuf,
    pub backend_dir: PathBuf,
    pub mobile_dir: PathBuf,
    pub api_service_file: PathBuf,
}

impl ProjectPaths {
    pub fn resolve(root: &Path, paths: &PathSettings) -> Self {
        Self {
            root: root.to_path_buf(),
            infra_dir: root.join(&paths.infra_dir),
            backend_dir: root.join(&paths.backend_dir),
            mobile_dir: root.join(&paths.mobile_dir),
            api_service_file: root.join(&paths.api_service_file),
        }
    }
}
