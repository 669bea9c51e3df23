//! Source file collection
//!
//! Walks a root directory through the injected [`FileSystem`] and collects
//! the source corpus shared by the extractor, the symbol indexer and the
//! code-search tool.

use crate::config::AuditConfig;
use crate::fs::{FileSystem, FileType};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal scan failures, checked before any work begins
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A scanned source file, path relative to the scan root
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

/// Collected corpus plus non-fatal warnings recorded along the way
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<String>,
}

/// Deterministic directory walker with an include/exclude filter and a file
/// cap. Directory entries are visited in name order, so repeated scans of an
/// unchanged tree yield the same sequence. Visited canonical paths are
/// tracked so symlink cycles terminate.
pub struct FileScanner {
    file_system: Arc<dyn FileSystem>,
    include_exts: Vec<String>,
    exclude_dirs: Vec<String>,
    max_files: usize,
}

impl FileScanner {
    pub fn new(file_system: Arc<dyn FileSystem>, config: &AuditConfig) -> Self {
        let include_exts = config
            .include_exts
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        Self {
            file_system,
            include_exts,
            exclude_dirs: config.exclude_dirs.clone(),
            max_files: config.max_files,
        }
    }

    /// Collects matching files under `root`.
    ///
    /// Unreadable files or directories are skipped with a recorded warning;
    /// only a missing or non-directory root is fatal.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        if !self.file_system.exists(root) {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        if !self.file_system.is_dir(root) {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        info!(root = %root.display(), "scanning directory");

        let mut outcome = ScanOutcome::default();
        let mut visited = HashSet::new();
        let mut truncated = false;
        self.walk(root, root, &mut visited, &mut outcome, &mut truncated);

        if truncated {
            let note = format!(
                "file cap reached ({}), remaining files skipped",
                self.max_files
            );
            warn!("{}", note);
            outcome.warnings.push(note);
        }

        info!(
            files = outcome.files.len(),
            warnings = outcome.warnings.len(),
            "scan complete"
        );
        Ok(outcome)
    }

    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        visited: &mut HashSet<PathBuf>,
        outcome: &mut ScanOutcome,
        truncated: &mut bool,
    ) {
        let canonical = match self.file_system.canonicalize(dir) {
            Ok(path) => path,
            Err(e) => {
                let note = format!("skipping {}: {}", dir.display(), e);
                warn!("{}", note);
                outcome.warnings.push(note);
                return;
            }
        };
        if !visited.insert(canonical) {
            debug!(dir = %dir.display(), "already visited, skipping");
            return;
        }

        let mut entries = match self.file_system.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let note = format!("unreadable directory {}: {}", dir.display(), e);
                warn!("{}", note);
                outcome.warnings.push(note);
                return;
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        for entry in entries {
            // Only flag truncation when the cap actually cuts entries off
            if outcome.files.len() >= self.max_files {
                *truncated = true;
                return;
            }

            match entry.file_type {
                FileType::Directory => {
                    if self.exclude_dirs.iter().any(|d| d == &entry.name) {
                        debug!(dir = %entry.path.display(), "excluded directory");
                        continue;
                    }
                    self.walk(root, &entry.path, visited, outcome, truncated);
                }
                FileType::File => {
                    if !self.matches_extension(&entry.path) {
                        continue;
                    }
                    match self.file_system.read_to_string(&entry.path) {
                        Ok(content) => {
                            let rel = entry
                                .path
                                .strip_prefix(root)
                                .unwrap_or(&entry.path)
                                .to_string_lossy()
                                .to_string();
                            outcome.files.push(SourceFile { path: rel, content });
                        }
                        Err(e) => {
                            let note =
                                format!("unreadable file {}: {}", entry.path.display(), e);
                            warn!("{}", note);
                            outcome.warnings.push(note);
                        }
                    }
                }
                // Broken link: nothing to read
                FileType::Symlink => {
                    debug!(path = %entry.path.display(), "skipping dangling symlink");
                }
            }
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.include_exts.iter().any(|inc| inc == &ext)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn scanner_with(fs: Arc<dyn FileSystem>, config: AuditConfig) -> FileScanner {
        FileScanner::new(fs, &config)
    }

    fn mock_project() -> Arc<MockFileSystem> {
        let fs = MockFileSystem::new();
        fs.add_file("src/app.js", "fetch('/api/users')");
        fs.add_file("src/api.ts", "const API_BASE = '/api';");
        fs.add_file("src/styles.css", "body {}");
        fs.add_file("node_modules/lib/index.js", "fetch('/api/ignored')");
        fs.add_file("README.md", "# readme");
        Arc::new(fs)
    }

    #[test]
    fn test_scan_filters_by_extension_and_exclusion() {
        let fs = mock_project();
        let scanner = scanner_with(fs.clone(), AuditConfig::default());

        let outcome = scanner.scan(fs.root()).unwrap();
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["src/api.ts", "src/app.js"]);
    }

    #[test]
    fn test_scan_order_is_name_sorted() {
        let fs = MockFileSystem::new();
        fs.add_file("b.js", "b");
        fs.add_file("a.js", "a");
        fs.add_file("c.js", "c");
        let fs = Arc::new(fs);
        let scanner = scanner_with(fs.clone(), AuditConfig::default());

        let outcome = scanner.scan(fs.root()).unwrap();
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let scanner = scanner_with(fs, AuditConfig::default());

        let err = scanner.scan(Path::new("/mock/nope")).unwrap_err();
        assert!(matches!(err, ScanError::PathNotFound(_)));
    }

    #[test]
    fn test_scan_file_root_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("app.js", "x");
        let fs = Arc::new(fs);
        let scanner = scanner_with(fs, AuditConfig::default());

        let err = scanner.scan(Path::new("/mock/app.js")).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_scan_cap_truncates_in_stable_order() {
        let fs = MockFileSystem::new();
        for name in ["a.js", "b.js", "c.js", "d.js", "e.js"] {
            fs.add_file(name, "content");
        }
        let fs = Arc::new(fs);
        let scanner = scanner_with(fs.clone(), AuditConfig::default().with_max_files(3));

        let outcome = scanner.scan(fs.root()).unwrap();
        let paths: Vec<&str> = outcome.files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["a.js", "b.js", "c.js"]);
        assert!(outcome.warnings.iter().any(|w| w.contains("file cap")));
    }

    #[test]
    fn test_exactly_cap_files_does_not_warn() {
        let fs = MockFileSystem::new();
        for name in ["a.js", "b.js", "c.js"] {
            fs.add_file(name, "content");
        }
        let fs = Arc::new(fs);
        let scanner = scanner_with(fs.clone(), AuditConfig::default().with_max_files(3));

        let outcome = scanner.scan(fs.root()).unwrap();

        assert_eq!(outcome.files.len(), 3);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_dotted_include_exts_accepted() {
        let fs = MockFileSystem::new();
        fs.add_file("app.js", "x");
        let fs = Arc::new(fs);
        let config =
            AuditConfig::default().with_include_exts(vec![".js".to_string(), ".TS".to_string()]);
        let scanner = scanner_with(fs.clone(), config);

        let outcome = scanner.scan(fs.root()).unwrap();
        assert_eq!(outcome.files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        use crate::fs::RealFileSystem;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let base = temp.path();
        std::fs::create_dir(base.join("sub")).unwrap();
        std::fs::write(base.join("sub/app.js"), "fetch('/api/x')").unwrap();
        std::os::unix::fs::symlink(base, base.join("sub/loop")).unwrap();

        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
        let scanner = scanner_with(fs, AuditConfig::default());

        let outcome = scanner.scan(base).unwrap();
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].path.ends_with("app.js"));
    }
}
