//! Step 4: pick and boot a simulator, then run the Flutter app in a new terminal

use crate::config::MobileSettings;
use crate::reporter::Reporter;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_daemon::{
    any_booted, find_preferred, DevicePreference, IosSimulator, SessionCommand, SimulatorState,
};
use std::io::Write;
use std::path::Path;

/// Result of a successful mobile launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileLaunch {
    /// UDID passed to `flutter run -d`, when a preferred simulator was found
    pub device: Option<String>,
}

pub async fn start_mobile<T, W>(
    toolchain: &T,
    mobile_dir: &Path,
    settings: &MobileSettings,
    reporter: &mut Reporter<W>,
) -> Result<MobileLaunch>
where
    T: LocalToolchain,
    W: Write,
{
    let preference = DevicePreference {
        runtime: settings.preferred_runtime.clone(),
        model: settings.preferred_model.clone(),
    };

    let simulators = toolchain.list_simulators().await.unwrap_or_else(|e| {
        debug!("Simulator listing failed, treating as empty: {}", e);
        Vec::new()
    });

    let device = match find_preferred(&simulators, &preference) {
        Some(simulator) => {
            reporter.success(format!(
                "Found {} simulator: {} ({})",
                preference.runtime, simulator.name, simulator.udid
            ));
            boot_preferred(toolchain, simulator, settings, reporter).await;
            Some(simulator.udid.clone())
        }
        None => {
            reporter.warning(format!(
                "No {} simulator found, using the default simulator...",
                preference.runtime
            ));
            open_default(toolchain, &simulators, settings, reporter).await;
            None
        }
    };

    reporter.info("Starting Flutter app in a new terminal...");
    let mut command = SessionCommand::from_argv(mobile_dir, &settings.run_command)?;
    if let Some(udid) = &device {
        command = command.args(["-d", udid.as_str()]);
    }
    toolchain
        .spawn_session(&command)
        .inspect_err(|e| reporter.error(format!("Error starting Flutter: {}", e)))?;

    reporter.success("Flutter app started in a new terminal");
    Ok(MobileLaunch { device })
}

/// Boot the chosen device unless it already runs. Failures are only logged.
async fn boot_preferred<T, W>(
    toolchain: &T,
    simulator: &IosSimulator,
    settings: &MobileSettings,
    reporter: &mut Reporter<W>,
) where
    T: LocalToolchain,
    W: Write,
{
    if simulator.state == SimulatorState::Booted {
        debug!("{} already booted", simulator.udid);
        return;
    }

    reporter.info(format!("Booting {} simulator...", settings.preferred_runtime));
    if let Err(e) = toolchain.boot_simulator(&simulator.udid).await {
        debug!("Boot of {} ignored: {}", simulator.udid, e);
    }
    if let Err(e) = toolchain.open_simulator_app().await {
        debug!("Opening Simulator.app ignored: {}", e);
    }
    toolchain.pause(settings.boot_grace_period()).await;
}

async fn open_default<T, W>(
    toolchain: &T,
    simulators: &[IosSimulator],
    settings: &MobileSettings,
    reporter: &mut Reporter<W>,
) where
    T: LocalToolchain,
    W: Write,
{
    if any_booted(simulators) {
        return;
    }

    reporter.info("Starting iOS Simulator...");
    if let Err(e) = toolchain.open_simulator_app().await {
        debug!("Opening Simulator.app ignored: {}", e);
    }
    toolchain.pause(settings.boot_grace_period()).await;
}
