//! iOS simulator discovery and boot using xcrun simctl
//!
//! Lists simulators with `xcrun simctl list devices --json`, picks the
//! preferred runtime/model pair, boots it and brings Simulator.app forward.

use serde::Deserialize;
use spdev_core::prelude::*;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;

/// An iOS simulator known to simctl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IosSimulator {
    pub udid: String,
    pub name: String,
    pub runtime: String, // e.g., "iOS 26.1"
    pub state: SimulatorState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    Shutdown,
    Booted,
    Booting,
    Unknown,
}

impl From<&str> for SimulatorState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "shutdown" => SimulatorState::Shutdown,
            "booted" => SimulatorState::Booted,
            "booting" => SimulatorState::Booting,
            _ => SimulatorState::Unknown,
        }
    }
}

/// Runtime and model the launcher prefers to run the app on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePreference {
    /// Friendly runtime name, e.g. "iOS 26.1"
    pub runtime: String,
    /// Substring of the device name, e.g. "iPhone 16 Plus"
    pub model: String,
}

impl Default for DevicePreference {
    fn default() -> Self {
        Self {
            runtime: "iOS 26.1".to_string(),
            model: "iPhone 16 Plus".to_string(),
        }
    }
}

/// JSON output from `xcrun simctl list devices --json`
#[derive(Debug, Deserialize)]
struct SimctlOutput {
    devices: HashMap<String, Vec<SimctlDevice>>,
}

#[derive(Debug, Deserialize)]
struct SimctlDevice {
    udid: String,
    name: String,
    state: String,
    #[serde(rename = "isAvailable")]
    is_available: Option<bool>,
}

/// List all available iOS simulators, newest runtime first
pub async fn list_ios_simulators() -> Result<Vec<IosSimulator>> {
    let output = Command::new("xcrun")
        .args(["simctl", "list", "devices", "--json"])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::spawn("xcrun", e))?;

    if !output.status.success() {
        return Err(Error::simulator("xcrun simctl returned error"));
    }

    parse_simctl_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse simctl's device listing
pub fn parse_simctl_output(json: &str) -> Result<Vec<IosSimulator>> {
    let parsed: SimctlOutput = serde_json::from_str(json)
        .map_err(|e| Error::protocol(format!("Failed to parse simctl output: {}", e)))?;

    let mut simulators = Vec::new();

    for (runtime_key, devices) in parsed.devices {
        let runtime = parse_runtime_name(&runtime_key);

        for device in devices {
            if device.is_available == Some(false) {
                continue;
            }

            simulators.push(IosSimulator {
                udid: device.udid,
                name: device.name,
                runtime: runtime.clone(),
                state: SimulatorState::from(device.state.as_str()),
            });
        }
    }

    // Sort by runtime (newest first), then by name
    simulators.sort_by(|a, b| b.runtime.cmp(&a.runtime).then_with(|| a.name.cmp(&b.name)));

    Ok(simulators)
}

/// Parse runtime identifier to friendly name
/// "com.apple.CoreSimulator.SimRuntime.iOS-26-1" -> "iOS 26.1"
fn parse_runtime_name(identifier: &str) -> String {
    if let Some(suffix) = identifier.strip_prefix("com.apple.CoreSimulator.SimRuntime.") {
        if let Some((os_name, version)) = suffix.split_once('-') {
            format!("{} {}", os_name, version.replace('-', "."))
        } else {
            suffix.to_string()
        }
    } else {
        identifier.to_string()
    }
}

/// First simulator on the preferred runtime whose name contains the preferred model
pub fn find_preferred<'a>(
    simulators: &'a [IosSimulator],
    preference: &DevicePreference,
) -> Option<&'a IosSimulator> {
    simulators
        .iter()
        .find(|s| s.runtime == preference.runtime && s.name.contains(&preference.model))
}

/// Whether any listed simulator is booted
pub fn any_booted(simulators: &[IosSimulator]) -> bool {
    simulators.iter().any(|s| s.state == SimulatorState::Booted)
}

/// Boot an iOS simulator by UDID without waiting for it to finish booting
pub async fn boot_simulator(udid: &str) -> Result<()> {
    let output = Command::new("xcrun")
        .args(["simctl", "boot", udid])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::spawn("xcrun", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // "Unable to boot device in current state: Booted" is not an error
        if !stderr.contains("Booted") {
            return Err(Error::simulator(format!(
                "Failed to boot simulator: {}",
                stderr.trim()
            )));
        }
    }

    Ok(())
}

/// Bring Simulator.app to the foreground (starting the default device if none runs)
pub async fn open_simulator_app() -> Result<()> {
    let status = Command::new("open")
        .args(["-a", "Simulator"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| Error::spawn("open", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::simulator(format!(
            "open -a Simulator exited with code {:?}",
            status.code()
        )))
    }
}
