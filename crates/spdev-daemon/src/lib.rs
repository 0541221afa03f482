//! # spdev-daemon - External Tool Plumbing
//!
//! Runs the programs the dev environment is made of: docker and docker
//! compose, npm, simctl, terminal automation, `ps` and `kill`. Every function
//! here is a thin, typed wrapper around one external invocation.
//!
//! Depends on [`spdev_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Network
//! - [`detect_local_address()`] - Interface query with UDP socket fallback
//!
//! ### Containers
//! - [`is_runtime_available()`], [`compose_up()`], [`compose_down()`],
//!   [`running_container_names()`]
//!
//! ### Backend
//! - [`install_dependencies()`] - Blocking `npm install`
//! - [`HealthProbe`] - HTTP 2xx check with a short timeout
//!
//! ### Simulators
//! - [`list_ios_simulators()`], [`find_preferred()`], [`boot_simulator()`],
//!   [`open_simulator_app()`]
//!
//! ### Sessions
//! - [`SessionSpawner`] - Start a command detached in a new terminal session
//! - [`TerminalAutomation`] (AppleScript) and [`NewConsole`] (`cmd /c start`)
//!
//! ### Processes
//! - [`list_processes()`], [`terminate()`]

pub mod compose;
pub mod health;
pub mod network;
pub mod package_manager;
pub mod processes;
pub mod session;
pub mod simulators;
pub mod tool_availability;

pub use compose::{
    compose_down, compose_up, is_runtime_available, parse_container_names,
    running_container_names, ComposeCommand,
};
pub use health::{HealthProbe, PROBE_TIMEOUT};
pub use network::{detect_local_address, AddressProbe};
pub use package_manager::{dependencies_installed, install_dependencies, DEFAULT_INSTALL_MARKER};
pub use processes::{list_processes, terminate};
pub use session::{platform_spawner, NewConsole, SessionCommand, SessionSpawner, TerminalAutomation};
pub use simulators::{
    any_booted, boot_simulator, find_preferred, list_ios_simulators, open_simulator_app,
    parse_simctl_output, DevicePreference, IosSimulator, SimulatorState,
};
pub use tool_availability::ToolAvailability;
