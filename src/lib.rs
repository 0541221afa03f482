//! Smart Parking dev launcher
//!
//! Library side of the `spdev-start` and `spdev-stop` binaries. The binaries
//! parse [`Args`] and hand over to [`run`], which sets up error reporting and
//! logging, loads `.spdev/config.toml` and drives the matching sequence.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use spdev_app::{
    load_settings, run_shutdown, run_startup, run_until_interrupted, wait_for_interrupt,
    LocalToolchain, Outcome, ProjectPaths, Reporter, Settings, SystemToolchain,
};
use spdev_core::prelude::*;

/// Command-line arguments shared by both binaries
#[derive(Parser, Debug)]
#[command(version, about = "Smart Parking local development environment", long_about = None)]
pub struct Args {
    /// Repository root (defaults to the current directory)
    #[arg(value_name = "PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,
}

/// Which sequence a binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Start,
    Stop,
}

impl EntryPoint {
    pub fn binary_name(&self) -> &'static str {
        match self {
            EntryPoint::Start => "spdev-start",
            EntryPoint::Stop => "spdev-stop",
        }
    }
}

/// Absolute project root from the optional argument
pub fn resolve_project_root(project_root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match project_root {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(dunce::canonicalize(&root)?)
}

/// Run the sequence for `entry` against `toolchain`
pub async fn run_sequence<T, W>(
    entry: EntryPoint,
    toolchain: &T,
    paths: &ProjectPaths,
    settings: &Settings,
    reporter: &mut Reporter<W>,
) -> Result<()>
where
    T: LocalToolchain,
    W: Write,
{
    match entry {
        EntryPoint::Start => {
            let report = run_startup(toolchain, paths, settings, reporter).await?;
            info!(
                "Startup finished: address={}, containers={}, backend={:?}, device={:?}",
                report.address,
                report.containers.len(),
                report.backend,
                report.device()
            );
        }
        EntryPoint::Stop => {
            let report = run_shutdown(toolchain, paths, settings, reporter).await;
            info!("Shutdown finished: {:?}", report);
        }
    }
    Ok(())
}

/// Entry point for both binaries. Returns the process exit code.
pub async fn run(entry: EntryPoint, args: Args) -> i32 {
    let mut reporter = Reporter::stdout();

    let outcome = match prepare(entry, args) {
        Ok((root, settings, toolchain)) => {
            info!("Project root: {}", root.display());
            let paths = ProjectPaths::resolve(&root, &settings.paths);
            run_until_interrupted(
                run_sequence(entry, &toolchain, &paths, &settings, &mut reporter),
                wait_for_interrupt(),
            )
            .await
        }
        Err(e) => Outcome::Failed(e),
    };

    outcome.report(&mut reporter);
    if let Outcome::Failed(e) = &outcome {
        error!("Application error: {:?}", e);
    }
    info!("{} exiting with code {}", entry.binary_name(), outcome.exit_code());
    outcome.exit_code()
}

fn prepare(entry: EntryPoint, args: Args) -> Result<(PathBuf, Settings, SystemToolchain)> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    spdev_core::logging::init(entry.binary_name())?;

    let root = resolve_project_root(args.project_root)?;
    let settings = load_settings(&root);
    let toolchain = SystemToolchain::new(&settings)?;
    Ok((root, settings, toolchain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_without_root() {
        let args = Args::try_parse_from(["spdev-start"]).unwrap();
        assert!(args.project_root.is_none());
    }

    #[test]
    fn test_args_with_root() {
        let args = Args::try_parse_from(["spdev-stop", "/tmp/smart-parking"]).unwrap();
        assert_eq!(args.project_root, Some(PathBuf::from("/tmp/smart-parking")));
    }

    #[test]
    fn test_args_reject_unknown_flags() {
        assert!(Args::try_parse_from(["spdev-start", "--verbose"]).is_err());
    }

    #[test]
    fn test_resolve_missing_root_fails() {
        let result = resolve_project_root(Some(PathBuf::from("/definitely/not/here/spdev")));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_binary_names() {
        assert_eq!(EntryPoint::Start.binary_name(), "spdev-start");
        assert_eq!(EntryPoint::Stop.binary_name(), "spdev-stop");
    }
}
