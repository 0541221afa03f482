//! Step 2: container runtime check and the compose stack

use crate::reporter::Reporter;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Container runtime as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeState {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

/// The compose stack in the infra directory
#[derive(Debug, Clone)]
pub struct ContainerStack {
    infra_dir: PathBuf,
    grace_period: Duration,
    runtime: RuntimeState,
}

impl ContainerStack {
    pub fn new(infra_dir: impl Into<PathBuf>, grace_period: Duration) -> Self {
        Self {
            infra_dir: infra_dir.into(),
            grace_period,
            runtime: RuntimeState::Unknown,
        }
    }

    pub fn runtime(&self) -> RuntimeState {
        self.runtime
    }

    /// Ask the runtime whether it is up. Reports the outcome either way.
    pub async fn check_runtime<T, W>(
        &mut self,
        toolchain: &T,
        reporter: &mut Reporter<W>,
    ) -> Result<()>
    where
        T: LocalToolchain,
        W: Write,
    {
        if toolchain.container_runtime_available().await {
            self.runtime = RuntimeState::Available;
            reporter.success("Docker is available");
            Ok(())
        } else {
            self.runtime = RuntimeState::Unavailable;
            reporter.error("Docker is not running or not installed!");
            reporter.info("Please start Docker Desktop and try again.");
            Err(Error::ContainerRuntimeUnavailable)
        }
    }

    /// `compose up -d`, the grace period, then the running container names
    pub async fn bring_up<T, W>(
        &self,
        toolchain: &T,
        reporter: &mut Reporter<W>,
    ) -> Result<Vec<String>>
    where
        T: LocalToolchain,
        W: Write,
    {
        if self.runtime != RuntimeState::Available {
            return Err(Error::ContainerRuntimeUnavailable);
        }

        reporter.info("Starting Docker containers...");
        toolchain
            .compose_up(&self.infra_dir)
            .await
            .inspect_err(|e| reporter.error(format!("Error starting Docker: {}", e)))?;

        reporter.info(format!(
            "Waiting for the containers to start ({} seconds)...",
            self.grace_period.as_secs()
        ));
        toolchain.pause(self.grace_period).await;

        let names = toolchain.running_containers().await.inspect_err(|e| {
            reporter.error(format!("Could not list running containers: {}", e))
        })?;
        reporter.success(format!("Docker containers running: {}", names.join(", ")));
        Ok(names)
    }

    /// `compose down`. Failures are reported, never propagated.
    pub async fn bring_down<T, W>(&self, toolchain: &T, reporter: &mut Reporter<W>) -> bool
    where
        T: LocalToolchain,
        W: Write,
    {
        reporter.info("Stopping Docker containers...");
        match toolchain.compose_down(&self.infra_dir).await {
            Ok(()) => {
                reporter.success("Docker containers stopped");
                true
            }
            Err(e) => {
                reporter.error(format!("Error stopping Docker: {}", e));
                false
            }
        }
    }
}
