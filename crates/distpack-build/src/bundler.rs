//! Primary compilation, delegated to an external bundler

use crate::assets::{AssetCollection, RawSource};
use crate::errors::BuildError;
use distpack_config::resolve_bundler;
use distpack_logger as logger;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use walkdir::WalkDir;

/// What the bundler is asked to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Entry module of the package being bundled
    pub entry: PathBuf,
    /// Output file name, relative to the output directory
    pub filename: String,
    pub minify: bool,
    pub targets: Vec<String>,
    pub platform: String,
    pub format: String,
}

impl BundleRequest {
    /// esbuild-compatible command line writing to `outfile`.
    ///
    /// Legal comments are dropped so no extra license files are produced, and
    /// `process.env` references are left untouched.
    pub fn to_args(&self, outfile: &Path) -> Vec<String> {
        let mut args = vec![self.entry.display().to_string(), "--bundle".to_string()];
        if self.minify {
            args.push("--minify".to_string());
        }
        args.push(format!("--platform={}", self.platform));
        if !self.targets.is_empty() {
            args.push(format!("--target={}", self.targets.join(",")));
        }
        args.push(format!("--format={}", self.format));
        args.push("--legal-comments=none".to_string());
        args.push("--log-level=warning".to_string());
        args.push(format!("--outfile={}", outfile.display()));
        args
    }
}

/// Performs primary compilation and returns the produced assets
pub trait Bundler {
    fn name(&self) -> &str;

    fn bundle(&self, request: &BundleRequest) -> Result<AssetCollection, BuildError>;
}

/// Runs a bundler executable into a staging directory and reads back the
/// files it wrote.
#[derive(Debug, Clone)]
pub struct ExternalBundler {
    program: PathBuf,
    working_dir: PathBuf,
    name: String,
}

impl ExternalBundler {
    pub fn new(program: PathBuf, working_dir: PathBuf) -> Self {
        let name = program
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| program.display().to_string());
        ExternalBundler {
            program,
            working_dir,
            name,
        }
    }

    /// Find the bundler executable for `project_root` (see `resolve_bundler`)
    pub fn discover(configured: Option<&str>, project_root: &Path) -> Result<Self, BuildError> {
        let program = resolve_bundler(configured, project_root)?;
        debug!("Using bundler at {:?}", program);
        Ok(Self::new(program, project_root.to_path_buf()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Bundler for ExternalBundler {
    fn name(&self) -> &str {
        &self.name
    }

    fn bundle(&self, request: &BundleRequest) -> Result<AssetCollection, BuildError> {
        let staging = tempfile::Builder::new()
            .prefix("distpack-")
            .tempdir()
            .map_err(|e| BuildError::io(std::env::temp_dir(), e))?;
        let outfile = staging.path().join(&request.filename);
        let args = request.to_args(&outfile);

        logger::step(&format!("{} {}", self.program.display(), args.join(" ")));

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| BuildError::BundlerSpawn {
                program: self.program.clone(),
                source,
            })?;

        logger::capture_output(&self.name, &output);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let diagnostics = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(BuildError::Compilation {
                bundler: self.name.clone(),
                code: output.status.code(),
                diagnostics,
            });
        }

        let assets = collect_output(staging.path())?;
        if assets.is_empty() {
            return Err(BuildError::EmptyOutput(self.name.clone()));
        }
        Ok(assets)
    }
}

/// Load every file under `dir` as an asset named by its relative path
pub(crate) fn collect_output(dir: &Path) -> Result<AssetCollection, BuildError> {
    let mut assets = AssetCollection::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            BuildError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let bytes = fs::read(entry.path()).map_err(|e| BuildError::io(entry.path(), e))?;

        debug!("Collected asset '{}' ({} bytes)", name, bytes.len());
        assets.insert(name, RawSource::from_bytes(bytes));
    }

    Ok(assets)
}
