//! Spawning commands in a new, independent terminal session
//!
//! The launcher hands a command to a terminal and forgets about it: no handle
//! is kept and the child outlives the launcher. How the terminal is opened is
//! platform specific and hidden behind [`SessionSpawner`].

use spdev_core::prelude::*;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// `CREATE_NEW_CONSOLE` process creation flag
#[cfg(windows)]
const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

/// A command to run inside a new terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCommand {
    pub working_dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl SessionCommand {
    pub fn new(working_dir: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build from an argv-style list (`["npm", "run", "start:dev"]`)
    pub fn from_argv(working_dir: impl Into<PathBuf>, argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::process("Empty command"))?;
        Ok(Self::new(working_dir, program.clone()).args(args.iter().cloned()))
    }

    /// `program arg1 arg2`, for status lines
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// POSIX shell line that changes into the working directory and runs the command
    pub fn shell_line(&self) -> String {
        let mut line = format!(
            "cd {} && {}",
            shell_quote(&self.working_dir.to_string_lossy()),
            shell_quote(&self.program)
        );
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }

    /// Run to completion in the working directory, output inherited
    pub async fn run_to_completion(&self) -> Result<()> {
        info!("Running {} in {}", self.display(), self.working_dir.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::spawn(&self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::process_exit(self.display(), status.code()))
        }
    }
}

/// Quote a word for a POSIX shell when it contains anything unusual
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Escape text for an AppleScript string literal
fn applescript_escape(text: &str) -> String {
    text.replace('\\', r"\\").replace('"', "\\\"")
}

/// Capability to start a command in a new terminal session, detached
pub trait SessionSpawner: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Start `command` in a new session. Returns once the request is handed off.
    fn spawn_detached(&self, command: &SessionCommand) -> Result<()>;
}

/// Opens a tab in a macOS terminal application through AppleScript
#[derive(Debug, Clone)]
pub struct TerminalAutomation {
    /// Scriptable terminal application
    pub application: String,
}

impl Default for TerminalAutomation {
    fn default() -> Self {
        Self {
            application: "Terminal".to_string(),
        }
    }
}

impl TerminalAutomation {
    pub fn script(&self, command: &SessionCommand) -> String {
        format!(
            "tell application \"{}\"\n    activate\n    do script \"{}\"\nend tell\n",
            applescript_escape(&self.application),
            applescript_escape(&command.shell_line())
        )
    }
}

impl SessionSpawner for TerminalAutomation {
    fn name(&self) -> &'static str {
        "terminal-automation"
    }

    fn spawn_detached(&self, command: &SessionCommand) -> Result<()> {
        debug!("osascript for: {}", command.shell_line());
        let child = Command::new("osascript")
            .arg("-e")
            .arg(self.script(command))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::session(Error::spawn("osascript", e).to_string()))?;
        detach(child, "osascript");
        Ok(())
    }
}

/// Starts the command in a new console window (`cmd /c start`)
#[derive(Debug, Clone, Default)]
pub struct NewConsole;

impl NewConsole {
    fn command(&self, command: &SessionCommand) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.args(["/c", "start"])
            .arg(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null());
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NEW_CONSOLE);
        cmd
    }
}

impl SessionSpawner for NewConsole {
    fn name(&self) -> &'static str {
        "new-console"
    }

    fn spawn_detached(&self, command: &SessionCommand) -> Result<()> {
        let child = self
            .command(command)
            .spawn()
            .map_err(|e| Error::session(Error::spawn("cmd", e).to_string()))?;
        detach(child, "cmd");
        Ok(())
    }
}

/// Spawner for the current platform
pub fn platform_spawner() -> Box<dyn SessionSpawner> {
    if cfg!(windows) {
        Box::new(NewConsole)
    } else {
        Box::new(TerminalAutomation::default())
    }
}

/// Reap the child in the background so it never lingers as a zombie while the
/// launcher is alive. Nobody waits on the result.
fn detach(mut child: Child, label: &'static str) {
    let pid = child.id();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => debug!("{} (pid {:?}) exited: {:?}", label, pid, status),
            Err(e) => debug!("{} (pid {:?}) wait failed: {}", label, pid, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_command() -> SessionCommand {
        SessionCommand::new("/Users/dev/smart-parking/apps/api", "npm").args(["run", "start:dev"])
    }

    #[test]
    fn test_display() {
        assert_eq!(backend_command().display(), "npm run start:dev");
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["flutter".to_string(), "run".to_string()];
        let cmd = SessionCommand::from_argv("/tmp", &argv).unwrap();
        assert_eq!(cmd.program, "flutter");
        assert_eq!(cmd.args, vec!["run"]);
        assert!(SessionCommand::from_argv("/tmp", &[]).is_err());
    }

    #[test]
    fn test_shell_line_plain() {
        assert_eq!(
            backend_command().shell_line(),
            "cd /Users/dev/smart-parking/apps/api && npm run start:dev"
        );
    }

    #[test]
    fn test_shell_line_quotes_spaces_and_quotes() {
        let cmd = SessionCommand::new("/Users/dev/My Projects/it's here", "flutter").arg("run");
        assert_eq!(
            cmd.shell_line(),
            r"cd '/Users/dev/My Projects/it'\''s here' && flutter run"
        );
    }

    #[test]
    fn test_applescript_script() {
        let script = TerminalAutomation::default().script(&backend_command());
        assert!(script.starts_with("tell application \"Terminal\"\n"));
        assert!(script.contains("    activate\n"));
        assert!(script
            .contains("do script \"cd /Users/dev/smart-parking/apps/api && npm run start:dev\""));
        assert!(script.ends_with("end tell\n"));
    }

    #[test]
    fn test_applescript_escapes_quotes() {
        let cmd = SessionCommand::new("/tmp", "echo").arg("say \"hi\"");
        let script = TerminalAutomation::default().script(&cmd);
        // shell single-quotes the arg, AppleScript escapes the double quotes
        assert!(script.contains(r#"echo 'say \"hi\"'"#));
    }

    #[test]
    fn test_platform_spawner_name() {
        let spawner = platform_spawner();
        if cfg!(windows) {
            assert_eq!(spawner.name(), "new-console");
        } else {
            assert_eq!(spawner.name(), "terminal-automation");
        }
    }
}
