use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing a crate's source tree.
///
/// The `FileScanner` recursively walks the source root to find all Rust source files and
/// derives the module path each file contributes (`orders/events.rs` becomes
/// `orders::events`). It automatically skips `target` and hidden directories.
///
/// # Example
///
/// ```no_run
/// use kafka_docs_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-service/src"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// A Rust source file together with the module path it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Module path relative to the crate root, empty for `lib.rs` / `main.rs`
    pub module_path: String,
}

/// Result of directory scanning operation.
pub struct ScanResult {
    /// All discovered `.rs` files, ordered by path
    pub rust_files: Vec<SourceFile>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified source root.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues.
    /// Files are returned sorted by path so that every pass sees the same order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceRootNotFound`] if the root is not an existing directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            return Err(Error::SourceRootNotFound(self.root_path.clone()));
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        let module_path = module_path_for(&self.root_path, path);
                        debug!("Found source file {} (module '{}')", path.display(), module_path);
                        rust_files.push(SourceFile {
                            path: path.to_path_buf(),
                            module_path,
                        });
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        rust_files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

/// Derives the module path of a source file relative to the crate root.
///
/// `lib.rs` and `main.rs` at the root map to the crate root (empty path),
/// `mod.rs` maps to its directory, any other file to its directory plus stem.
pub fn module_path_for(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_crate_root = segments.is_empty() && (stem == "lib" || stem == "main");
    if !is_crate_root && stem != "mod" {
        segments.push(stem);
    }

    segments.join("::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn module_paths(result: &ScanResult) -> Vec<&str> {
        result
            .rust_files
            .iter()
            .map(|f| f.module_path.as_str())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("lib.rs"), "pub mod listeners;").unwrap();
        fs::write(root.join("listeners.rs"), "pub struct L;").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 2);
        assert!(result.warnings.is_empty());
        assert_eq!(module_paths(&result), vec!["", "listeners"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.rust_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_missing_root() {
        let scanner = FileScanner::new(PathBuf::from("/nonexistent/source/root"));
        let result = scanner.scan();

        assert!(matches!(result, Err(Error::SourceRootNotFound(_))));
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("kafka/listeners")).unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("kafka/mod.rs"), "pub mod listeners;").unwrap();
        fs::write(root.join("kafka/listeners/orders.rs"), "pub struct O;").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        let mut paths = module_paths(&result);
        paths.sort();
        assert_eq!(paths, vec!["", "kafka", "kafka::listeners::orders"]);
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("lib.rs"), "").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.rust_files.len(), 1);
        assert_eq!(
            result.rust_files[0].path.file_name().unwrap().to_string_lossy(),
            "lib.rs"
        );
    }

    #[test]
    fn test_module_path_for() {
        let root = Path::new("/app/src");

        assert_eq!(module_path_for(root, Path::new("/app/src/lib.rs")), "");
        assert_eq!(module_path_for(root, Path::new("/app/src/main.rs")), "");
        assert_eq!(module_path_for(root, Path::new("/app/src/dto.rs")), "dto");
        assert_eq!(module_path_for(root, Path::new("/app/src/dto/mod.rs")), "dto");
        assert_eq!(
            module_path_for(root, Path::new("/app/src/dto/orders/main.rs")),
            "dto::orders::main"
        );
    }
}
