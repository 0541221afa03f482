//! OS process listing and termination

use spdev_core::prelude::*;
use spdev_core::{parse_process_listing, ProcessEntry};
use std::process::Stdio;
use tokio::process::Command;

/// All processes with their command lines (`ps aux`)
pub async fn list_processes() -> Result<Vec<ProcessEntry>> {
    let output = Command::new("ps")
        .arg("aux")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::spawn("ps", e))?;

    if !output.status.success() {
        return Err(Error::process_exit("ps aux", output.status.code()));
    }

    Ok(parse_process_listing(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// Send SIGTERM to `pid` (`kill <pid>`)
pub async fn terminate(pid: u32) -> Result<()> {
    let status = Command::new("kill")
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| Error::spawn("kill", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::process_exit(format!("kill {}", pid), status.code()))
    }
}
