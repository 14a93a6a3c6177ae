use crate::assets::AssetCollection;
use crate::bundler::{BundleRequest, Bundler};
use crate::compilation::Compilation;
use crate::errors::BuildError;
use crate::hooks::CompilerHooks;
use crate::plugins::Plugin;
use distpack_config::BuildConfig;
use distpack_logger as logger;
use distpack_manifest::PackageResolver;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Fully resolved settings for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Directory node_modules lookups and relative paths start from
    pub project_root: PathBuf,
    /// Installed package to bundle
    pub package: String,
    /// `name` of the generated manifest
    pub output_name: String,
    pub out_dir: PathBuf,
    pub filename: String,
    pub minify: bool,
    pub targets: Vec<String>,
    pub platform: String,
    pub format: String,
    pub extra_node_modules: Vec<PathBuf>,
}

impl BuildOptions {
    pub fn from_config(config: &BuildConfig, project_root: &Path) -> Result<Self, BuildError> {
        let package = config
            .package
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or(BuildError::MissingPackage)?;
        let output_name = config.output_name().unwrap_or(&package).to_string();

        Ok(BuildOptions {
            project_root: project_root.to_path_buf(),
            output_name,
            out_dir: project_root.join(config.out_dir()),
            filename: config.filename().to_string(),
            minify: config.minify(),
            targets: config.targets(),
            platform: config.platform().to_string(),
            format: config.format().to_string(),
            extra_node_modules: config
                .node_modules()
                .into_iter()
                .map(|p| project_root.join(p))
                .collect(),
            package,
        })
    }

    /// Resolver over the project's ancestors plus configured extra roots
    pub fn resolver(&self) -> PackageResolver {
        PackageResolver::new(&self.project_root)
            .with_extra_roots(self.extra_node_modules.iter().cloned())
    }

    fn bundle_request(&self, entry: PathBuf) -> BundleRequest {
        BundleRequest {
            entry,
            filename: self.filename.clone(),
            minify: self.minify,
            targets: self.targets.clone(),
            platform: self.platform.clone(),
            format: self.format.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmittedAsset {
    pub name: String,
    pub size: usize,
}

/// Summary of a successful build
#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    pub package: String,
    pub bundler: String,
    pub out_dir: PathBuf,
    pub assets: Vec<EmittedAsset>,
    pub elapsed_ms: u64,
}

impl BuildStats {
    pub fn total_size(&self) -> usize {
        self.assets.iter().map(|a| a.size).sum()
    }
}

/// Drives one build: clean, make, bundle, process assets, emit.
pub struct Compiler {
    options: BuildOptions,
    bundler: Box<dyn Bundler>,
    hooks: CompilerHooks,
    plugin_names: Vec<String>,
}

impl Compiler {
    pub fn new(options: BuildOptions, bundler: Box<dyn Bundler>) -> Self {
        Compiler {
            options,
            bundler,
            hooks: CompilerHooks::default(),
            plugin_names: Vec::new(),
        }
    }

    /// Apply a plugin; its taps stay registered for every later run
    pub fn with_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        debug!("Applying plugin {}", plugin.name());
        plugin.apply(&mut self.hooks);
        self.plugin_names.push(plugin.name().to_string());
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn plugin_names(&self) -> &[String] {
        &self.plugin_names
    }

    /// Run a full build.
    ///
    /// The previous output directory is removed first. Nothing is written
    /// unless every stage succeeds, so a failed build leaves no output.
    pub fn run(&self) -> Result<BuildStats, BuildError> {
        let started = Instant::now();
        let options = &self.options;

        clean_output_dir(&options.out_dir, &options.project_root)?;

        let mut compilation = Compilation::new();
        self.hooks.make.call(&mut compilation)?;

        let resolved = options.resolver().resolve(&options.package)?;
        let entry = resolved.entry_path()?;
        logger::step(&format!(
            "Bundling {} {} from {}",
            options.package,
            resolved.descriptor.version,
            entry.display()
        ));

        let primary = self.bundler.bundle(&options.bundle_request(entry))?;
        info!(
            "{} produced {} asset(s) for {}",
            self.bundler.name(),
            primary.len(),
            options.package
        );
        compilation.assets.extend(primary);

        compilation.process_assets()?;

        let assets = emit_assets(&compilation.assets, &options.out_dir)?;
        Ok(BuildStats {
            package: options.package.clone(),
            bundler: self.bundler.name().to_string(),
            out_dir: options.out_dir.clone(),
            assets,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

fn clean_output_dir(out_dir: &Path, project_root: &Path) -> Result<(), BuildError> {
    if contains_project(out_dir, project_root) {
        return Err(BuildError::UnsafeOutputDir(out_dir.to_path_buf()));
    }
    if out_dir.exists() {
        debug!("Removing previous output {:?}", out_dir);
        fs::remove_dir_all(out_dir).map_err(|e| BuildError::io(out_dir, e))?;
    }
    Ok(())
}

/// Whether removing `out_dir` would also remove `project_root`.
///
/// Compared both lexically and, when the paths exist, after resolving
/// symlinks, so `..` segments cannot point the output at an ancestor.
fn contains_project(out_dir: &Path, project_root: &Path) -> bool {
    if normalize(project_root).starts_with(normalize(out_dir)) {
        return true;
    }
    match (fs::canonicalize(out_dir), fs::canonicalize(project_root)) {
        (Ok(out_dir), Ok(project_root)) => project_root.starts_with(out_dir),
        _ => false,
    }
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn emit_assets(assets: &AssetCollection, out_dir: &Path) -> Result<Vec<EmittedAsset>, BuildError> {
    let result = write_assets(assets, out_dir);
    if result.is_err() && out_dir.exists() {
        // Never leave a half-written output directory behind
        let _ = fs::remove_dir_all(out_dir);
    }
    result
}

fn write_assets(assets: &AssetCollection, out_dir: &Path) -> Result<Vec<EmittedAsset>, BuildError> {
    fs::create_dir_all(out_dir).map_err(|e| BuildError::io(out_dir, e))?;

    let mut emitted = Vec::with_capacity(assets.len());
    for (name, source) in assets.iter() {
        let path = out_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&path, source.source()).map_err(|e| BuildError::io(&path, e))?;
        logger::step(&format!("Emitted {} ({} bytes)", path.display(), source.size()));
        emitted.push(EmittedAsset {
            name: name.to_string(),
            size: source.size(),
        });
    }
    Ok(emitted)
}
