//! Command-line heuristics used to find dev processes at shutdown
//!
//! Processes are not tracked by PID; the stop sequence scans the process
//! listing and matches each line against a predicate per [`ProcessKind`].
//! This can both miss renamed processes and catch unrelated ones that happen
//! to share the keywords.

/// Which dev process family a matcher targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    /// The NestJS backend (`node ... smart-parking ...`)
    Backend,
    /// The Flutter tool (`flutter run`, `dart ... flutter_tools`)
    Mobile,
}

impl ProcessKind {
    /// Name of the service, used in status lines
    pub fn service_name(&self) -> &'static str {
        match self {
            ProcessKind::Backend => "Backend",
            ProcessKind::Mobile => "Flutter",
        }
    }

    /// Name of the runtime, used in "not found" lines
    pub fn runtime_name(&self) -> &'static str {
        match self {
            ProcessKind::Backend => "Node.js",
            ProcessKind::Mobile => "Flutter",
        }
    }
}

/// A set of alternative substrings; any one satisfies the group
#[derive(Debug, Clone)]
pub struct TokenGroup {
    alternatives: Vec<String>,
    case_insensitive: bool,
}

impl TokenGroup {
    pub fn any_of<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: tokens.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Match against the lowercased line. Tokens must be lowercase.
    pub fn ignore_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    fn matches(&self, line: &str, lowered: &str) -> bool {
        let haystack = if self.case_insensitive { lowered } else { line };
        self.alternatives.iter().any(|t| haystack.contains(t.as_str()))
    }
}

/// Conjunction of token groups, tagged with the process kind it finds
#[derive(Debug, Clone)]
pub struct ProcessMatcher {
    pub kind: ProcessKind,
    groups: Vec<TokenGroup>,
}

impl ProcessMatcher {
    pub fn new(kind: ProcessKind, groups: Vec<TokenGroup>) -> Self {
        Self { kind, groups }
    }

    /// `node` (any case) together with the project keyword (exact case)
    pub fn backend(project_keyword: &str) -> Self {
        Self::new(
            ProcessKind::Backend,
            vec![
                TokenGroup::any_of(["node"]).ignore_case(),
                TokenGroup::any_of([project_keyword]),
            ],
        )
    }

    /// `flutter` (any case) together with `run` or `dart`
    pub fn mobile() -> Self {
        Self::new(
            ProcessKind::Mobile,
            vec![
                TokenGroup::any_of(["flutter"]).ignore_case(),
                TokenGroup::any_of(["run", "dart"]),
            ],
        )
    }

    pub fn for_kind(kind: ProcessKind, project_keyword: &str) -> Self {
        match kind {
            ProcessKind::Backend => Self::backend(project_keyword),
            ProcessKind::Mobile => Self::mobile(),
        }
    }

    pub fn matches(&self, command_line: &str) -> bool {
        let lowered = command_line.to_lowercase();
        self.groups
            .iter()
            .all(|group| group.matches(command_line, &lowered))
    }
}

/// One line of the OS process listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    /// PID from the second column, if it parsed
    pub pid: Option<u32>,
    /// The full listing line, used for matching
    pub line: String,
}

impl ProcessEntry {
    /// Parse a `ps aux` style line (`USER PID %CPU ... COMMAND`)
    pub fn from_listing_line(line: &str) -> Self {
        let pid = line
            .split_whitespace()
            .nth(1)
            .and_then(|col| col.parse().ok());
        Self {
            pid,
            line: line.to_string(),
        }
    }
}

/// Parse a whole `ps aux` listing, skipping blank lines
pub fn parse_process_listing(output: &str) -> Vec<ProcessEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ProcessEntry::from_listing_line)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORD: &str = "smart-parking";

    #[test]
    fn test_backend_matches_node_with_keyword() {
        let matcher = ProcessMatcher::backend(KEYWORD);
        assert!(matcher.matches(
            "dev  4242  0.3  1.1 node /Users/dev/smart-parking/apps/api/node_modules/.bin/nest start --watch"
        ));
        assert!(matcher.matches("dev 1 0.0 0.0 /usr/local/bin/Node smart-parking/dist/main.js"));
    }

    #[test]
    fn test_backend_requires_keyword() {
        let matcher = ProcessMatcher::backend(KEYWORD);
        assert!(!matcher.matches("dev  4243  0.0  0.2 node /Users/dev/other-app/server.js"));
        assert!(!matcher.matches("dev  4244  0.0  0.2 python smart-parking/tools/seed.py"));
    }

    #[test]
    fn test_backend_keyword_is_case_sensitive() {
        let matcher = ProcessMatcher::backend(KEYWORD);
        assert!(!matcher.matches("dev 1 0.0 0.0 node /Users/dev/Smart-Parking/main.js"));
    }

    #[test]
    fn test_mobile_matches_flutter_run_and_dart() {
        let matcher = ProcessMatcher::mobile();
        assert!(matcher.matches("dev 900 1.0 2.0 /opt/flutter/bin/flutter run -d ABC-123"));
        assert!(matcher.matches(
            "dev 901 1.0 2.0 /opt/flutter/bin/cache/dart-sdk/bin/dart flutter_tools.snapshot"
        ));
        assert!(matcher.matches("dev 902 0.0 0.0 Flutter run"));
    }

    #[test]
    fn test_mobile_requires_subcommand_token() {
        let matcher = ProcessMatcher::mobile();
        assert!(!matcher.matches("dev 903 0.0 0.0 /opt/flutter/bin/flutter doctor"));
        assert!(!matcher.matches("dev 904 0.0 0.0 dart analyze"));
    }

    #[test]
    fn test_for_kind() {
        assert_eq!(
            ProcessMatcher::for_kind(ProcessKind::Backend, KEYWORD).kind,
            ProcessKind::Backend
        );
        assert_eq!(
            ProcessMatcher::for_kind(ProcessKind::Mobile, KEYWORD).kind,
            ProcessKind::Mobile
        );
    }

    #[test]
    fn test_parse_process_listing() {
        let output = "USER PID %CPU %MEM VSZ RSS TT STAT STARTED TIME COMMAND\n\
                      dev 4242 0.3 1.1 123 456 s001 S+ 10:00AM 0:01.00 node main.js\n\
                      \n";
        let entries = parse_process_listing(output);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pid, None);
        assert_eq!(entries[1].pid, Some(4242));
        assert!(entries[1].line.ends_with("node main.js"));
    }

    #[test]
    fn test_service_and_runtime_names() {
        assert_eq!(ProcessKind::Backend.service_name(), "Backend");
        assert_eq!(ProcessKind::Backend.runtime_name(), "Node.js");
        assert_eq!(ProcessKind::Mobile.service_name(), "Flutter");
    }
}
