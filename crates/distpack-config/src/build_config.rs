use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "DISTPACK_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "distpack.toml";

const DEFAULT_OUT_DIR: &str = "dist";
const DEFAULT_FILENAME: &str = "index.js";
const DEFAULT_PLATFORM: &str = "node";
const DEFAULT_FORMAT: &str = "cjs";
const DEFAULT_TARGETS: &[&str] = &["node12"];

/// Supported keys for `config get` / `config set`
pub const KEYS: &[&str] = &[
    "package",
    "name",
    "out-dir",
    "filename",
    "bundler",
    "minify",
    "targets",
    "platform",
    "format",
    "node-modules",
];

/// Project build configuration stored in `distpack.toml`
///
/// Every key is optional. Accessors fall back to the defaults used for
/// packaging a library as a single CommonJS file for Node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Installed npm package to bundle (e.g. `@mdx-js/mdx`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Name written into the generated `package.json` (defaults to `package`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Bundler executable (path or name on PATH)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Extra `node_modules` directories searched after the project ancestors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_modules: Option<Vec<String>>,
}

impl BuildConfig {
    /// Resolve the config file path.
    ///
    /// `DISTPACK_CONFIG` wins when set and non-empty, otherwise
    /// `./distpack.toml`.
    pub fn path() -> PathBuf {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the resolved path; a missing file yields the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(BuildConfig::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "package" => self.package.clone(),
            "name" => self.name.clone(),
            "out-dir" => self.out_dir.clone(),
            "filename" => self.filename.clone(),
            "bundler" => self.bundler.clone(),
            "minify" => self.minify.map(|m| m.to_string()),
            "targets" => self.targets.as_ref().map(|t| t.join(",")),
            "platform" => self.platform.clone(),
            "format" => self.format.clone(),
            "node-modules" => self.node_modules.as_ref().map(|n| n.join(",")),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Set a key from its textual form. List keys take comma separated values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "package" => self.package = Some(value.to_string()),
            "name" => self.name = Some(value.to_string()),
            "out-dir" => self.out_dir = Some(value.to_string()),
            "filename" => self.filename = Some(value.to_string()),
            "bundler" => self.bundler = Some(value.to_string()),
            "minify" => {
                let parsed = value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
                self.minify = Some(parsed);
            }
            "targets" => self.targets = Some(split_list(value)),
            "platform" => self.platform = Some(value.to_string()),
            "format" => self.format = Some(value.to_string()),
            "node-modules" => self.node_modules = Some(split_list(value)),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == BuildConfig::default()
    }

    /// Key/value pairs that are explicitly set, in `KEYS` order
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| match self.get(key) {
                Ok(Some(value)) => Some((*key, value)),
                _ => None,
            })
            .collect()
    }

    /// Name for the generated manifest: explicit `name`, else `package`.
    /// Blank values count as unset.
    pub fn output_name(&self) -> Option<&str> {
        let non_blank = |value: &&str| !value.trim().is_empty();
        self.name
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.package.as_deref().filter(non_blank))
    }

    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(self.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR))
    }

    pub fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(DEFAULT_FILENAME)
    }

    pub fn minify(&self) -> bool {
        self.minify.unwrap_or(true)
    }

    pub fn targets(&self) -> Vec<String> {
        match &self.targets {
            Some(targets) if !targets.is_empty() => targets.clone(),
            _ => DEFAULT_TARGETS.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    pub fn platform(&self) -> &str {
        self.platform.as_deref().unwrap_or(DEFAULT_PLATFORM)
    }

    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    pub fn node_modules(&self) -> Vec<PathBuf> {
        self.node_modules
            .iter()
            .flatten()
            .map(PathBuf::from)
            .collect()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert!(config.is_empty());
        assert_eq!(config.out_dir(), PathBuf::from("dist"));
        assert_eq!(config.filename(), "index.js");
        assert!(config.minify());
        assert_eq!(config.targets(), vec!["node12".to_string()]);
        assert_eq!(config.platform(), "node");
        assert_eq!(config.format(), "cjs");
        assert_eq!(config.output_name(), None);
    }

    #[test]
    fn test_output_name_falls_back_to_package() {
        let mut config = BuildConfig {
            package: Some("@mdx-js/mdx".to_string()),
            ..Default::default()
        };
        assert_eq!(config.output_name(), Some("@mdx-js/mdx"));
        config.name = Some("mdx-bundle".to_string());
        assert_eq!(config.output_name(), Some("mdx-bundle"));
        config.name = Some(String::new());
        assert_eq!(config.output_name(), Some("@mdx-js/mdx"));
        config.name = Some("  ".to_string());
        config.package = None;
        assert_eq!(config.output_name(), None);
    }

    #[test]
    fn test_set_and_get_keys() {
        let mut config = BuildConfig::default();
        assert!(config.set("targets", "node12, es2015").is_ok());
        assert!(config.set("minify", "false").is_ok());
        assert!(config.set("out-dir", "build").is_ok());

        assert_eq!(
            config.get("targets").ok().flatten().as_deref(),
            Some("node12,es2015")
        );
        assert!(!config.minify());
        assert_eq!(config.out_dir(), PathBuf::from("build"));
        assert_eq!(
            config.values_iter(),
            vec![
                ("out-dir", "build".to_string()),
                ("minify", "false".to_string()),
                ("targets", "node12,es2015".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_bool() {
        let mut config = BuildConfig::default();
        assert!(matches!(
            config.set("colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("minify", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip_uses_kebab_case() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("distpack.toml");
        let config = BuildConfig {
            package: Some("foo".to_string()),
            out_dir: Some("out".to_string()),
            node_modules: Some(vec!["vendor/node_modules".to_string()]),
            ..Default::default()
        };
        assert!(config.save_to(&path).is_ok());

        let raw = fs::read_to_string(&path).unwrap_or_default();
        assert!(raw.contains("out-dir = \"out\""));
        assert!(raw.contains("node-modules"));

        let loaded = BuildConfig::load_from(&path);
        assert!(loaded.is_ok_and(|c| c == config));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let loaded = BuildConfig::load_from(Path::new("/tmp/distpack_missing_12345.toml"));
        assert!(loaded.is_ok_and(|c| c.is_empty()));
    }
}
