//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Mobile Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Mobile configuration file not found: {path}")]
    ConfigFileMissing { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Container Stack Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Docker is not running or not installed")]
    ContainerRuntimeUnavailable,

    #[error("Container orchestration error: {message}")]
    Compose { message: String },

    // ─────────────────────────────────────────────────────────────
    // External Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("'{tool}' not found. Ensure it is installed and in your PATH.")]
    ToolNotFound { tool: String },

    #[error("Process error: {message}")]
    Process { message: String },

    #[error("Failed to spawn '{program}': {reason}")]
    ProcessSpawn { program: String, reason: String },

    #[error("'{command}' exited with code: {code:?}")]
    ProcessExit { command: String, code: Option<i32> },

    #[error("Dependency install failed: {message}")]
    DependencyInstall { message: String },

    #[error("Failed to open a new terminal session: {message}")]
    Session { message: String },

    #[error("Simulator error: {message}")]
    Simulator { message: String },

    #[error("Unexpected tool output: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Sequence Control
    // ─────────────────────────────────────────────────────────────
    /// A fatal step already reported its failure to the operator.
    #[error("Aborted at step: {step}")]
    Aborted { step: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn config_file_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConfigFileMissing { path: path.into() }
    }

    pub fn compose(message: impl Into<String>) -> Self {
        Self::Compose {
            message: message.into(),
        }
    }

    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
        }
    }

    /// Map a spawn failure, distinguishing a missing binary from other IO errors.
    pub fn spawn(program: impl Into<String>, err: std::io::Error) -> Self {
        let program = program.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound { tool: program }
        } else {
            Self::ProcessSpawn {
                program,
                reason: err.to_string(),
            }
        }
    }

    pub fn process_exit(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::ProcessExit {
            command: command.into(),
            code,
        }
    }

    pub fn dependency_install(message: impl Into<String>) -> Self {
        Self::DependencyInstall {
            message: message.into(),
        }
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    pub fn simulator(message: impl Into<String>) -> Self {
        Self::Simulator {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn aborted(step: impl Into<String>) -> Self {
        Self::Aborted { step: step.into() }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::ContainerRuntimeUnavailable;
        assert!(err.to_string().contains("Docker"));

        let err = Error::config_file_missing("/repo/apps/mobile/api_service.dart");
        assert!(err.to_string().contains("/repo/apps/mobile/api_service.dart"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_spawn_not_found_maps_to_tool_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::spawn("docker-compose", io_err);
        assert!(matches!(err, Error::ToolNotFound { ref tool } if tool == "docker-compose"));
    }

    #[test]
    fn test_spawn_other_error_keeps_reason() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::spawn("osascript", io_err);
        assert!(matches!(err, Error::ProcessSpawn { .. }));
        assert!(err.to_string().contains("osascript"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_context_keeps_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = result.context("Reading api_service.dart").unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        let result: Result<()> = Err(Error::compose("up failed"));
        let err = result
            .with_context(|| format!("Starting stack in {}", "/repo/infra"))
            .unwrap_err();
        assert!(matches!(err, Error::Compose { .. }));
    }

    #[test]
    fn test_process_exit_display() {
        let err = Error::process_exit("docker-compose up -d", Some(2));
        assert_eq!(
            err.to_string(),
            "'docker-compose up -d' exited with code: Some(2)"
        );
    }
}
