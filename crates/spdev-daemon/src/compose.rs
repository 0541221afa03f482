//! Docker runtime and docker compose control

use spdev_core::prelude::*;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// How docker compose is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeCommand {
    /// `docker-compose ...`
    Standalone,
    /// `docker compose ...`
    Plugin,
}

impl ComposeCommand {
    pub fn program(&self) -> &'static str {
        match self {
            ComposeCommand::Standalone => "docker-compose",
            ComposeCommand::Plugin => "docker",
        }
    }

    pub fn base_args(&self) -> &'static [&'static str] {
        match self {
            ComposeCommand::Standalone => &[],
            ComposeCommand::Plugin => &["compose"],
        }
    }

    /// How the command reads to an operator
    pub fn display_name(&self) -> &'static str {
        match self {
            ComposeCommand::Standalone => "docker-compose",
            ComposeCommand::Plugin => "docker compose",
        }
    }

    async fn run(&self, infra_dir: &Path, args: &[&str]) -> Result<()> {
        let command_line = format!("{} {}", self.display_name(), args.join(" "));
        info!("Running {} in {}", command_line, infra_dir.display());

        // Output is inherited so the operator sees compose progress
        let status = Command::new(self.program())
            .args(self.base_args())
            .args(args)
            .current_dir(infra_dir)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::spawn(self.program(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::compose(format!(
                "'{}' exited with code {:?}",
                command_line,
                status.code()
            )))
        }
    }
}

/// Check whether the docker daemon answers (`docker ps`)
pub async fn is_runtime_available() -> bool {
    Command::new("docker")
        .arg("ps")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .inspect_err(|e| debug!("docker ps failed to run: {}", e))
        .unwrap_or(false)
}

/// `up -d` for the stack defined in `infra_dir`
pub async fn compose_up(compose: ComposeCommand, infra_dir: &Path) -> Result<()> {
    compose.run(infra_dir, &["up", "-d"]).await
}

/// `down` for the stack defined in `infra_dir`
pub async fn compose_down(compose: ComposeCommand, infra_dir: &Path) -> Result<()> {
    compose.run(infra_dir, &["down"]).await
}

/// Names of running containers (`docker ps --format {{.Names}}`)
pub async fn running_container_names() -> Result<Vec<String>> {
    let output = Command::new("docker")
        .args(["ps", "--format", "{{.Names}}"])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::spawn("docker", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::compose(format!("docker ps failed: {}", stderr.trim())));
    }

    Ok(parse_container_names(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// One container name per line
pub fn parse_container_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
