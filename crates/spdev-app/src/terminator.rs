//! Stop processes found by scanning the process listing

use crate::reporter::Reporter;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_core::ProcessMatcher;
use std::io::Write;

/// Signal every listed process `matcher` accepts.
///
/// Returns how many matched processes were signalled, whether or not their
/// `kill` succeeded. Only a failing listing is an error.
pub async fn terminate_matching<T, W>(
    toolchain: &T,
    matcher: &ProcessMatcher,
    reporter: &mut Reporter<W>,
) -> Result<usize>
where
    T: LocalToolchain,
    W: Write,
{
    let service = matcher.kind.service_name();
    reporter.info(format!("Stopping {}...", service));

    let entries = toolchain.list_processes().await.inspect_err(|e| {
        reporter.error(format!("Error stopping {}: {}", service, e));
    })?;

    let mut signalled = 0;
    let mut failed = 0;
    for entry in entries.iter().filter(|e| matcher.matches(&e.line)) {
        let Some(pid) = entry.pid else {
            debug!("No PID in matched line: {}", entry.line);
            continue;
        };
        signalled += 1;
        if let Err(e) = toolchain.terminate(pid).await {
            warn!("kill {} failed: {}", pid, e);
            failed += 1;
        }
    }

    if failed > 0 {
        reporter.warning(format!(
            "Could not signal {} of {} {} processes",
            failed, signalled, service
        ));
    }
    if signalled > 0 {
        reporter.success(format!("{} stopped ({} processes)", service, signalled));
    } else {
        reporter.info(format!(
            "No active {} processes found",
            matcher.kind.runtime_name()
        ));
    }
    Ok(signalled)
}
