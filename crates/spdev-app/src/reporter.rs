//! Console status lines for the operator
//!
//! Every line is also mirrored to the log file at a matching level. Console
//! write errors are ignored: a closed stdout must not abort a half-finished
//! start sequence.

use crossterm::style::Stylize;
use std::io::{self, IsTerminal, Stdout, Write};

const RULE_WIDTH: usize = 60;

/// A service the operator can reach once everything is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub name: &'static str,
    pub location: &'static str,
}

/// Writes severity-marked status lines and section headers
pub struct Reporter<W: Write = Stdout> {
    out: W,
    colored: bool,
}

impl Reporter<Stdout> {
    /// Reporter on stdout, colored when stdout is a terminal and `NO_COLOR` is unset
    pub fn stdout() -> Self {
        let out = io::stdout();
        let colored = colors_enabled(out.is_terminal());
        Self::new(out, colored)
    }
}

/// Color policy given whether the output is a terminal
pub fn colors_enabled(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").is_none()
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, colored: bool) -> Self {
        Self { out, colored }
    }

    /// Borrow the underlying writer (tests read captured output through this)
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }

    /// Blank line, a rule, the centered title, another rule, blank line
    pub fn header(&mut self, title: &str) {
        tracing::info!("== {} ==", title);
        let rule = "=".repeat(RULE_WIDTH);
        let centered = format!("{:^width$}", title, width = RULE_WIDTH);
        self.write_line("");
        for text in [&rule, &centered, &rule] {
            let line = if self.colored {
                text.as_str().magenta().bold().to_string()
            } else {
                text.to_string()
            };
            self.write_line(&line);
        }
        self.write_line("");
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);
        let line = format!("✓ {}", message);
        let line = if self.colored {
            line.green().to_string()
        } else {
            line
        };
        self.write_line(&line);
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);
        let line = format!("ℹ {}", message);
        let line = if self.colored { line.cyan().to_string() } else { line };
        self.write_line(&line);
    }

    pub fn warning(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::warn!("{}", message);
        let line = format!("⚠ {}", message);
        let line = if self.colored {
            line.yellow().to_string()
        } else {
            line
        };
        self.write_line(&line);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::error!("{}", message);
        let line = format!("✗ {}", message);
        let line = if self.colored { line.red().to_string() } else { line };
        self.write_line(&line);
    }

    pub fn blank(&mut self) {
        self.write_line("");
    }

    /// "Available services:" with one bullet per endpoint, then the detected address
    pub fn services_summary(&mut self, endpoints: &[ServiceEndpoint], address: &str) {
        let label = if self.colored {
            "Available services:".green().to_string()
        } else {
            "Available services:".to_string()
        };
        self.write_line(&label);
        for endpoint in endpoints {
            self.write_line(&format!("  • {}: {}", endpoint.name, endpoint.location));
        }
        self.write_line("");
        let ip_line = format!("Detected IP: {}", address);
        let ip_line = if self.colored {
            ip_line.cyan().to_string()
        } else {
            ip_line
        };
        self.write_line(&ip_line);
    }

    /// Operator notes block: a yellow label and dash-prefixed lines
    pub fn notes(&mut self, lines: &[&str]) {
        let label = if self.colored {
            "Notes:".yellow().to_string()
        } else {
            "Notes:".to_string()
        };
        self.write_line(&label);
        for line in lines {
            self.write_line(&format!("  - {}", line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn captured(reporter: &Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.output().clone()).unwrap()
    }

    #[test]
    fn test_severity_markers() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.success("Docker is available");
        reporter.info("Starting Docker containers...");
        reporter.warning("Backend did not start correctly, continuing...");
        reporter.error("Could not start the Flutter app");

        assert_eq!(
            captured(&reporter),
            "✓ Docker is available\n\
             ℹ Starting Docker containers...\n\
             ⚠ Backend did not start correctly, continuing...\n\
             ✗ Could not start the Flutter app\n"
        );
    }

    #[test]
    fn test_header_is_centered_between_rules() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.header("STOP");

        let output = captured(&reporter);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2].trim(), "STOP");
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[3], "=".repeat(60));
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.header("START");
        reporter.success("ok");
        reporter.notes(&["one"]);
        assert!(!captured(&reporter).contains('\u{1b}'));
    }

    #[test]
    fn test_colored_output_has_escape_codes() {
        let mut reporter = Reporter::new(Vec::new(), true);
        reporter.error("boom");
        let output = captured(&reporter);
        assert!(output.contains('\u{1b}'));
        assert!(output.contains("✗ boom"));
    }

    #[test]
    fn test_services_summary_and_notes() {
        let mut reporter = Reporter::new(Vec::new(), false);
        let endpoints = [ServiceEndpoint {
            name: "MQTT",
            location: "localhost:1883",
        }];
        reporter.services_summary(&endpoints, "192.168.1.50");
        reporter.notes(&["Press 'r' for hot reload"]);

        assert_eq!(
            captured(&reporter),
            "Available services:\n  • MQTT: localhost:1883\n\nDetected IP: 192.168.1.50\nNotes:\n  - Press 'r' for hot reload\n"
        );
    }

    #[test]
    #[serial]
    fn test_colors_enabled_respects_no_color() {
        std::env::remove_var("NO_COLOR");
        assert!(colors_enabled(true));
        assert!(!colors_enabled(false));

        std::env::set_var("NO_COLOR", "1");
        assert!(!colors_enabled(true));
        std::env::remove_var("NO_COLOR");
    }
}
