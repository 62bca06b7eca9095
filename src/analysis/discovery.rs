//! Module document discovery.
//!
//! Walks a project directory and collects every file that looks like a
//! module declaration, ready to be fed to [`super::analyze`].

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::parser::ModuleSource;

/// File name suffix of module documents.
pub const DEFAULT_MODULE_SUFFIX: &str = ".module.ts";

/// Directories that never contain project modules.
const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage"];

/// Errors that can occur during discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Project root does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("Project root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Collects all module documents below `root`.
///
/// Files are returned in sorted path order so repeated runs see the same
/// input. Unreadable files and walk errors are logged and skipped.
pub fn discover_modules(root: &Path, suffix: &str) -> DiscoveryResult<Vec<ModuleSource>> {
    if !root.exists() {
        return Err(DiscoveryError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let mut sources = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(suffix));
        if !matches {
            continue;
        }

        let path = entry.path();
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "discovered module document");
                sources.push(ModuleSource::new(path.display().to_string(), text));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read module document")
            }
        }
    }

    Ok(sources)
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.') || IGNORED_DIRS.contains(&s))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_discovers_module_files_sorted() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/users/users.module.ts", "users");
        write(tmp.path(), "src/app.module.ts", "app");
        write(tmp.path(), "src/app.service.ts", "service");

        let sources = discover_modules(tmp.path(), DEFAULT_MODULE_SUFFIX).unwrap();
        let texts: Vec<&str> = sources.iter().map(|s| s.text.as_str()).collect();

        assert_eq!(texts, vec!["app", "users"]);
        assert!(sources[0].path.ends_with("app.module.ts"));
    }

    #[test]
    fn test_skips_ignored_directories() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "node_modules/lib/lib.module.ts", "vendored");
        write(tmp.path(), "dist/app.module.ts", "built");
        write(tmp.path(), ".cache/app.module.ts", "hidden");
        write(tmp.path(), "src/app.module.ts", "app");

        let sources = discover_modules(tmp.path(), DEFAULT_MODULE_SUFFIX).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].text, "app");
    }

    #[test]
    fn test_custom_suffix() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.module.js", "js");
        write(tmp.path(), "b.module.ts", "ts");

        let sources = discover_modules(tmp.path(), ".module.js").unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].text, "js");
    }

    #[test]
    fn test_missing_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            discover_modules(&missing, DEFAULT_MODULE_SUFFIX),
            Err(DiscoveryError::MissingRoot(_))
        ));
    }

    #[test]
    fn test_root_is_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "file.txt", "x");
        assert!(matches!(
            discover_modules(&tmp.path().join("file.txt"), DEFAULT_MODULE_SUFFIX),
            Err(DiscoveryError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_empty_project() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_modules(tmp.path(), DEFAULT_MODULE_SUFFIX)
            .unwrap()
            .is_empty());
    }
}
