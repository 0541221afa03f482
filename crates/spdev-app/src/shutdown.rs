//! The stop sequence: containers down, then backend and Flutter processes
//!
//! Every step runs regardless of how the previous one went.

use crate::config::{ProjectPaths, Settings};
use crate::containers::ContainerStack;
use crate::reporter::Reporter;
use crate::terminator::terminate_matching;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_core::{ProcessKind, ProcessMatcher};
use std::io::Write;

const SHUTDOWN_NOTES: &[&str] = &[
    "The iOS simulator keeps running; close it manually if needed",
    "Terminal windows opened by spdev-start stay open",
];

/// What the stop sequence did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub containers_stopped: bool,
    /// `None` when the process listing failed
    pub backend_stopped: Option<usize>,
    pub mobile_stopped: Option<usize>,
}

pub async fn run_shutdown<T, W>(
    toolchain: &T,
    paths: &ProjectPaths,
    settings: &Settings,
    reporter: &mut Reporter<W>,
) -> ShutdownReport
where
    T: LocalToolchain,
    W: Write,
{
    reporter.header("SMART PARKING - STOPPING ALL SERVICES");

    let stack = ContainerStack::new(&paths.infra_dir, settings.containers.grace_period());
    let containers_stopped = stack.bring_down(toolchain, reporter).await;

    let mut stopped = [None, None];
    for (slot, kind) in stopped
        .iter_mut()
        .zip([ProcessKind::Backend, ProcessKind::Mobile])
    {
        reporter.blank();
        let matcher = ProcessMatcher::for_kind(kind, &settings.shutdown.project_keyword);
        *slot = terminate_matching(toolchain, &matcher, reporter)
            .await
            .inspect_err(|e| debug!("{} shutdown skipped: {}", kind.service_name(), e))
            .ok();
    }
    let [backend_stopped, mobile_stopped] = stopped;

    reporter.header("ALL SERVICES STOPPED");
    reporter.notes(SHUTDOWN_NOTES);
    reporter.blank();

    ShutdownReport {
        containers_stopped,
        backend_stopped,
        mobile_stopped,
    }
}
