//! # spdev-app - Start/Stop Orchestration
//!
//! Sequences the dev environment: detect the local address and patch the
//! mobile app's `baseUrl`, bring up the container stack, start the backend and
//! wait for its health check, boot a simulator and run the Flutter app. The
//! stop sequence tears the same pieces down.
//!
//! ## Public API
//!
//! ### Sequences
//! - [`run_startup()`] / [`StartupReport`]
//! - [`run_shutdown()`] / [`ShutdownReport`]
//! - [`run_until_interrupted()`] / [`Outcome`] - Ctrl+C handling and exit codes
//!
//! ### External effects
//! - [`LocalToolchain`] / [`Toolchain`] - Seam for every subprocess, socket and sleep
//! - [`SystemToolchain`] - Production implementation
//!
//! ### Configuration
//! - [`config::load_settings()`] - `.spdev/config.toml` with defaults
//! - [`config::ProjectPaths`] - Absolute locations inside the project
//!
//! ### Output
//! - [`Reporter`] - Colored status lines mirrored to the log

pub mod address;
pub mod backend;
pub mod config;
pub mod containers;
pub mod mobile;
pub mod reporter;
pub mod runner;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod terminator;
pub mod toolchain;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use address::ConfigPatch;
pub use backend::BackendStatus;
pub use config::{load_settings, ProjectPaths, Settings};
pub use containers::{ContainerStack, RuntimeState};
pub use mobile::MobileLaunch;
pub use reporter::{Reporter, ServiceEndpoint};
pub use runner::{run_until_interrupted, Outcome};
pub use shutdown::{run_shutdown, ShutdownReport};
pub use signals::wait_for_interrupt;
pub use startup::{run_startup, StartupReport, SERVICE_ENDPOINTS};
pub use terminator::terminate_matching;
pub use toolchain::{LocalToolchain, SystemToolchain, Toolchain};
