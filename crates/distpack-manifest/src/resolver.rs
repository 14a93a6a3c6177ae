use crate::descriptor::PackageDescriptor;
use crate::errors::ResolutionError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const NODE_MODULES: &str = "node_modules";
const PACKAGE_JSON: &str = "package.json";

/// One `node_modules` entry, optionally under an `@scope/` directory.
///
/// Case is not restricted: legacy packages such as `JSONStream` predate the
/// lowercase rule. Segments may not start with `.` and may not contain path
/// separators, so a name never escapes its `node_modules` root.
static PACKAGE_NAME_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(?:@[^/\\\s.][^/\\\s]*/)?[^/\\\s.@][^/\\\s]*$").ok()
});

/// Check that `name` can be looked up inside a `node_modules` directory
pub fn validate_package_name(name: &str) -> Result<(), ResolutionError> {
    let matches = PACKAGE_NAME_RE
        .as_ref()
        .is_some_and(|re| re.is_match(name));
    if name.len() <= 214 && matches {
        Ok(())
    } else {
        Err(ResolutionError::InvalidName(name.to_string()))
    }
}

/// A located package: its directory and parsed descriptor
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub dir: PathBuf,
    pub descriptor: PackageDescriptor,
}

impl ResolvedPackage {
    /// Absolute path of the package's entry module.
    ///
    /// Extensionless targets are tried as `<target>.js` and
    /// `<target>/index.js`, like Node's CommonJS loader.
    pub fn entry_path(&self) -> Result<PathBuf, ResolutionError> {
        let relative = self.descriptor.entry_point();
        let base = self.dir.join(relative.trim_start_matches("./"));

        let candidates = [
            base.clone(),
            PathBuf::from(format!("{}.js", base.display())),
            base.join("index.js"),
        ];
        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ResolutionError::EntryNotFound {
                package: self.descriptor.name.clone(),
                candidate: base,
            })
    }
}

/// Locates installed packages in `node_modules` directories.
///
/// Roots are searched in order: `<base>/node_modules`, the `node_modules` of
/// every ancestor of `base`, then any extra roots.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    roots: Vec<PathBuf>,
}

impl PackageResolver {
    pub fn new(base_dir: &Path) -> Self {
        let roots = base_dir
            .ancestors()
            .map(|dir| dir.join(NODE_MODULES))
            .collect();
        PackageResolver { roots }
    }

    /// Append extra `node_modules` directories searched after the ancestors
    pub fn with_extra_roots<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.roots.extend(extra);
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Find the directory of an installed package
    pub fn locate(&self, package: &str) -> Result<PathBuf, ResolutionError> {
        validate_package_name(package)?;

        for root in &self.roots {
            let dir = root.join(package);
            if dir.join(PACKAGE_JSON).is_file() {
                debug!("Resolved '{}' to {:?}", package, dir);
                return Ok(dir);
            }
        }

        Err(ResolutionError::NotFound {
            package: package.to_string(),
            searched: self.roots.clone(),
        })
    }

    /// Locate a package and parse its own `package.json`
    pub fn resolve(&self, package: &str) -> Result<ResolvedPackage, ResolutionError> {
        let dir = self.locate(package)?;
        let descriptor = read_descriptor(&dir.join(PACKAGE_JSON))?;
        Ok(ResolvedPackage { dir, descriptor })
    }

    /// Parse the descriptor of an installed package
    pub fn read_descriptor(&self, package: &str) -> Result<PackageDescriptor, ResolutionError> {
        Ok(self.resolve(package)?.descriptor)
    }
}

fn read_descriptor(path: &Path) -> Result<PackageDescriptor, ResolutionError> {
    let content = fs::read_to_string(path).map_err(|source| ResolutionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ResolutionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn install(root: &Path, name: &str, manifest: &str) -> Option<PathBuf> {
        let dir = root.join(NODE_MODULES).join(name);
        fs::create_dir_all(&dir).ok()?;
        fs::write(dir.join(PACKAGE_JSON), manifest).ok()?;
        Some(dir)
    }

    #[test]
    fn test_validate_package_name() {
        assert!(validate_package_name("foo").is_ok());
        assert!(validate_package_name("@mdx-js/mdx").is_ok());
        assert!(validate_package_name("lodash.merge").is_ok());
        assert!(validate_package_name("JSONStream").is_ok());
        assert!(validate_package_name("@Azure/Core").is_ok());
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name("..").is_err());
        assert!(validate_package_name("../etc").is_err());
        assert!(validate_package_name(".hidden").is_err());
        assert!(validate_package_name("/etc/passwd").is_err());
        assert!(validate_package_name("@scope/").is_err());
        assert!(validate_package_name("@scope/..").is_err());
        assert!(validate_package_name("@scope").is_err());
        assert!(validate_package_name("a/b").is_err());
        assert!(validate_package_name("@a/b/c").is_err());
        assert!(validate_package_name("a\\b").is_err());
    }

    #[test]
    fn test_resolve_legacy_uppercase_package() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let manifest = r#"{"name":"JSONStream","version":"1.3.5","license":"(MIT OR Apache-2.0)"}"#;
        assert!(install(temp_dir.path(), "JSONStream", manifest).is_some());

        let resolver = PackageResolver::new(temp_dir.path());
        let descriptor = resolver
            .read_descriptor("JSONStream")
            .unwrap_or_else(|e| panic!("JSONStream should resolve: {e}"));
        assert_eq!(descriptor.name, "JSONStream");
        assert_eq!(descriptor.version, "1.3.5");
    }

    #[test]
    fn test_resolve_scoped_package() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let manifest = r#"{"name":"@mdx-js/mdx","version":"1.6.22","license":"MIT"}"#;
        if install(temp_dir.path(), "@mdx-js/mdx", manifest).is_none() {
            return;
        }

        let resolver = PackageResolver::new(temp_dir.path());
        let resolved = resolver.resolve("@mdx-js/mdx");
        assert!(resolved.is_ok());
        let Ok(resolved) = resolved else {
            return;
        };
        assert_eq!(resolved.descriptor.version, "1.6.22");
        assert!(resolved.dir.ends_with("node_modules/@mdx-js/mdx"));
    }

    #[test]
    fn test_resolve_walks_ancestors_then_extra_roots() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let nested = temp_dir.path().join("packages").join("app");
        let vendor = temp_dir.path().join("vendor");
        if fs::create_dir_all(&nested).is_err() {
            return;
        }
        if install(temp_dir.path(), "near", r#"{"name":"near","version":"1.0.0"}"#).is_none()
            || install(&vendor, "far", r#"{"name":"far","version":"2.0.0"}"#).is_none()
        {
            return;
        }

        let resolver =
            PackageResolver::new(&nested).with_extra_roots([vendor.join(NODE_MODULES)]);
        assert!(resolver
            .read_descriptor("near")
            .is_ok_and(|d| d.version == "1.0.0"));
        assert!(resolver
            .read_descriptor("far")
            .is_ok_and(|d| d.version == "2.0.0"));
    }

    #[test]
    fn test_missing_package_is_not_found() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let resolver = PackageResolver::new(temp_dir.path());
        match resolver.resolve("not-installed") {
            Err(ResolutionError::NotFound { package, searched }) => {
                assert_eq!(package, "not-installed");
                assert_eq!(searched.len(), resolver.roots().len());
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_manifest_is_parse_error() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        if install(temp_dir.path(), "broken", "{ not json").is_none() {
            return;
        }
        let resolver = PackageResolver::new(temp_dir.path());
        assert!(matches!(
            resolver.resolve("broken"),
            Err(ResolutionError::Parse { .. })
        ));
    }

    #[test]
    fn test_entry_path_candidates() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let Some(dir) = install(
            temp_dir.path(),
            "lib-pkg",
            r#"{"name":"lib-pkg","version":"0.1.0","main":"./lib"}"#,
        ) else {
            return;
        };
        let resolver = PackageResolver::new(temp_dir.path());
        let Ok(resolved) = resolver.resolve("lib-pkg") else {
            return;
        };

        assert!(matches!(
            resolved.entry_path(),
            Err(ResolutionError::EntryNotFound { .. })
        ));

        if fs::create_dir_all(dir.join("lib")).is_err()
            || fs::write(dir.join("lib").join("index.js"), "module.exports = 1;").is_err()
        {
            return;
        }
        assert!(resolved
            .entry_path()
            .is_ok_and(|p| p.ends_with("lib-pkg/lib/index.js")));
    }
}
