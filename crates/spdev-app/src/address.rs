//! Step 1: detect the local address and point the mobile app at it

use crate::reporter::Reporter;
use crate::toolchain::LocalToolchain;
use spdev_core::prelude::*;
use spdev_core::{base_url, current_host, patch_base_url, DetectedAddress, PatchOutcome};
use std::io::Write;
use std::path::Path;

/// What happened to the mobile configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPatch {
    /// The declaration was rewritten; holds the previous host
    Updated { previous: Option<String> },
    /// The declaration already pointed at the address
    AlreadyCorrect,
    /// No `baseUrl` declaration to rewrite; the file is left as is
    DeclarationMissing,
}

/// Detect the address and report it. A fallback is reported as a warning.
pub async fn detect_address<T, W>(toolchain: &T, reporter: &mut Reporter<W>) -> DetectedAddress
where
    T: LocalToolchain,
    W: Write,
{
    let address = toolchain.detect_address().await;
    if let Some(reason) = address.fallback_reason() {
        reporter.warning(format!("Could not detect IP automatically: {}", reason));
    }
    reporter.success(format!("Detected IP: {}", address));
    address
}

/// Rewrite the `baseUrl` host in `file` to `address`
pub fn patch_api_service<W: Write>(
    file: &Path,
    address: &str,
    reporter: &mut Reporter<W>,
) -> Result<ConfigPatch> {
    if !file.exists() {
        reporter.error(format!("File not found: {}", file.display()));
        return Err(Error::config_file_missing(file));
    }

    let content = std::fs::read_to_string(file)
        .inspect_err(|e| reporter.error(format!("Could not read {}: {}", file.display(), e)))
        .with_context(|| format!("Reading {}", file.display()))?;

    match patch_base_url(&content, address) {
        PatchOutcome::Updated(patched) => {
            let previous = current_host(&content).map(str::to_string);
            std::fs::write(file, patched).inspect_err(|e| {
                reporter.error(format!("Could not write {}: {}", file.display(), e));
            })?;
            debug!("baseUrl host {:?} -> {}", previous, base_url(address));
            reporter.success(format!("IP updated in {}: {}", file_label(file), address));
            Ok(ConfigPatch::Updated { previous })
        }
        PatchOutcome::Unchanged => {
            reporter.success("IP is already set correctly");
            Ok(ConfigPatch::AlreadyCorrect)
        }
        PatchOutcome::NotFound => {
            warn!("No baseUrl declaration in {}", file.display());
            reporter.warning(format!(
                "No baseUrl declaration found in {}, leaving it unchanged",
                file_label(file)
            ));
            Ok(ConfigPatch::DeclarationMissing)
        }
    }
}

fn file_label(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DART_SOURCE: &str = "class ApiService {\n  static const String baseUrl = 'http://10.0.0.5:3000';\n  final client = http.Client();\n}\n";

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_patch_updates_host() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("api_service.dart");
        std::fs::write(&file, DART_SOURCE).unwrap();

        let mut reporter = Reporter::new(Vec::new(), false);
        let patch = patch_api_service(&file, "192.168.1.50", &mut reporter).unwrap();

        assert_eq!(
            patch,
            ConfigPatch::Updated {
                previous: Some("10.0.0.5".to_string())
            }
        );
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("baseUrl = 'http://192.168.1.50:3000'"));
        assert!(output(reporter).contains("IP updated in api_service.dart: 192.168.1.50"));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("api_service.dart");
        std::fs::write(&file, DART_SOURCE).unwrap();

        let mut reporter = Reporter::new(Vec::new(), false);
        patch_api_service(&file, "192.168.1.50", &mut reporter).unwrap();
        let first = std::fs::read_to_string(&file).unwrap();

        let mut reporter = Reporter::new(Vec::new(), false);
        let patch = patch_api_service(&file, "192.168.1.50", &mut reporter).unwrap();

        assert_eq!(patch, ConfigPatch::AlreadyCorrect);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), first);
        assert!(output(reporter).contains("IP is already set correctly"));
    }

    #[test]
    fn test_patch_missing_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("missing.dart");

        let mut reporter = Reporter::new(Vec::new(), false);
        let err = patch_api_service(&file, "10.0.0.1", &mut reporter).unwrap_err();

        assert!(matches!(err, Error::ConfigFileMissing { .. }));
        assert!(output(reporter).contains("File not found:"));
    }

    #[test]
    fn test_patch_without_declaration_leaves_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("api_service.dart");
        std::fs::write(&file, "class ApiService {}\n").unwrap();

        let mut reporter = Reporter::new(Vec::new(), false);
        let patch = patch_api_service(&file, "10.0.0.1", &mut reporter).unwrap();

        assert_eq!(patch, ConfigPatch::DeclarationMissing);
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "class ApiService {}\n"
        );
        assert!(output(reporter)
            .contains("⚠ No baseUrl declaration found in api_service.dart, leaving it unchanged"));
    }

    #[test]
    fn test_patch_recovers_from_localhost_fallback() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("api_service.dart");
        std::fs::write(
            &file,
            "static const String baseUrl = 'http://localhost:3000';\n",
        )
        .unwrap();

        let mut reporter = Reporter::new(Vec::new(), false);
        patch_api_service(&file, "fe80::1", &mut reporter).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "static const String baseUrl = 'http://[fe80::1]:3000';\n"
        );
    }
}
