//! Resolution of the external bundler executable
//!
//! Lookup order:
//! - an explicitly configured bundler (a path, or a name looked up on PATH)
//! - `node_modules/.bin/<bundler>` in the project root or any ancestor
//! - `<bundler>` on PATH

use std::fmt;
use std::path::{Path, PathBuf};

/// Bundler used when nothing is configured
pub const DEFAULT_BUNDLER: &str = "esbuild";

/// Directory holding package binaries inside `node_modules`
pub const NODE_BIN_DIR: &str = ".bin";

/// npm writes `.cmd` shims on Windows
#[cfg(windows)]
const BIN_SUFFIXES: &[&str] = &[".cmd", ".exe", ""];
#[cfg(not(windows))]
const BIN_SUFFIXES: &[&str] = &[""];

/// Error type for bundler path resolution
#[derive(Debug, Clone)]
pub enum BundlerPathError {
    /// A configured bundler path does not point to a file
    ConfiguredNotFound(PathBuf),
    /// Nothing matched in `node_modules/.bin` or on PATH
    NotFound { name: String, searched: Vec<PathBuf> },
}

impl fmt::Display for BundlerPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundlerPathError::ConfiguredNotFound(path) => {
                write!(f, "Configured bundler not found: {}", path.display())
            }
            BundlerPathError::NotFound { name, searched } => {
                write!(f, "Bundler '{}' not found in node_modules or PATH", name)?;
                if !searched.is_empty() {
                    let dirs: Vec<String> =
                        searched.iter().map(|p| p.display().to_string()).collect();
                    write!(f, " (searched: {})", dirs.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BundlerPathError {}

/// Resolve the bundler executable for a project
///
/// # Arguments
///
/// * `configured` - Optional configured bundler, either a path or a bare name
/// * `project_root` - Directory whose `node_modules/.bin` is searched first
pub fn resolve_bundler(
    configured: Option<&str>,
    project_root: &Path,
) -> Result<PathBuf, BundlerPathError> {
    let name = match configured {
        Some(value) if looks_like_path(value) => {
            let candidate = project_root.join(value);
            return if candidate.is_file() {
                Ok(candidate)
            } else {
                Err(BundlerPathError::ConfiguredNotFound(candidate))
            };
        }
        Some(value) => value,
        None => DEFAULT_BUNDLER,
    };

    let mut searched = Vec::new();
    for dir in project_root.ancestors() {
        let bin_dir = dir.join("node_modules").join(NODE_BIN_DIR);
        if let Some(found) = find_in_bin_dir(&bin_dir, name) {
            return Ok(found);
        }
        searched.push(bin_dir);
    }

    which::which(name).map_err(|_| BundlerPathError::NotFound {
        name: name.to_string(),
        searched,
    })
}

fn looks_like_path(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn find_in_bin_dir(bin_dir: &Path, name: &str) -> Option<PathBuf> {
    if !bin_dir.is_dir() {
        return None;
    }
    BIN_SUFFIXES
        .iter()
        .map(|suffix| bin_dir.join(format!("{}{}", name, suffix)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_project_with_bin(name: &str) -> Option<TempDir> {
        let temp_dir = TempDir::new().ok()?;
        let bin_dir = temp_dir.path().join("node_modules").join(NODE_BIN_DIR);
        fs::create_dir_all(&bin_dir).ok()?;
        #[cfg(windows)]
        fs::write(bin_dir.join(format!("{}.cmd", name)), "").ok()?;
        #[cfg(not(windows))]
        fs::write(bin_dir.join(name), "").ok()?;
        Some(temp_dir)
    }

    #[test]
    fn test_resolves_local_node_modules_bin() {
        let Some(project) = create_project_with_bin(DEFAULT_BUNDLER) else {
            return;
        };
        let result = resolve_bundler(None, project.path());
        assert!(result.is_ok_and(|p| p.starts_with(project.path().join("node_modules"))));
    }

    #[test]
    fn test_resolves_from_ancestor_directory() {
        let Some(project) = create_project_with_bin(DEFAULT_BUNDLER) else {
            return;
        };
        let nested = project.path().join("packages").join("lib");
        if fs::create_dir_all(&nested).is_err() {
            return;
        }
        let result = resolve_bundler(None, &nested);
        assert!(result.is_ok_and(|p| p.starts_with(project.path())));
    }

    #[test]
    fn test_configured_path_must_exist() {
        let Ok(project) = TempDir::new() else {
            return;
        };
        let result = resolve_bundler(Some("tools/missing-bundler"), project.path());
        assert!(matches!(
            result,
            Err(BundlerPathError::ConfiguredNotFound(_))
        ));
    }

    #[test]
    fn test_configured_path_relative_to_project() {
        let Ok(project) = TempDir::new() else {
            return;
        };
        let tools = project.path().join("tools");
        if fs::create_dir_all(&tools).is_err() || fs::write(tools.join("bundle"), "").is_err() {
            return;
        }
        let result = resolve_bundler(Some("tools/bundle"), project.path());
        assert!(result.is_ok_and(|p| p.ends_with("tools/bundle")));
    }

    #[test]
    fn test_unknown_bundler_reports_searched_dirs() {
        let Ok(project) = TempDir::new() else {
            return;
        };
        let result = resolve_bundler(Some("distpack-no-such-bundler-12345"), project.path());
        match result {
            Err(BundlerPathError::NotFound { name, searched }) => {
                assert_eq!(name, "distpack-no-such-bundler-12345");
                assert!(!searched.is_empty());
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
