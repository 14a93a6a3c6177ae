use crate::common::{format_size, project_root};
use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use distpack_build::{
    BuildOptions, BuildStats, Compiler, ExternalBundler, GeneratePackageJsonPlugin,
};
use distpack_config::BuildConfig;

/// Bundle an installed package into the output directory
#[derive(Args, Debug, Clone, Default)]
pub struct BuildCommand {
    /// Installed package to bundle (overrides `package` in distpack.toml)
    pub package: Option<String>,

    /// Name written into the generated package.json
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory (default: dist)
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Bundler executable (path or name on PATH)
    #[arg(long)]
    pub bundler: Option<String>,

    /// Keep the output unminified
    #[arg(long)]
    pub no_minify: bool,

    /// Target environment, repeatable (e.g. --target node12 --target es2017)
    #[arg(long = "target")]
    pub targets: Vec<String>,

    /// Print build stats as JSON
    #[arg(long)]
    pub json: bool,
}

impl BuildCommand {
    /// Command-line values take precedence over distpack.toml
    pub fn apply_overrides(&self, config: &mut BuildConfig) {
        if let Some(package) = &self.package {
            config.package = Some(package.clone());
        }
        if let Some(name) = &self.name {
            config.name = Some(name.clone());
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = Some(out_dir.clone());
        }
        if let Some(bundler) = &self.bundler {
            config.bundler = Some(bundler.clone());
        }
        if self.no_minify {
            config.minify = Some(false);
        }
        if !self.targets.is_empty() {
            config.targets = Some(self.targets.clone());
        }
    }
}

pub fn handle_build(cmd: BuildCommand, _opts: &GlobalOpts) -> Result<()> {
    let config_path = BuildConfig::path();
    logger::debug(&format!("Reading config from: {}", config_path.display()));
    let mut config = BuildConfig::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    cmd.apply_overrides(&mut config);

    let root = project_root().context("Failed to determine working directory")?;
    let options = BuildOptions::from_config(&config, &root)?;
    let bundler = ExternalBundler::discover(config.bundler.as_deref(), &root)?;
    logger::debug(&format!("Bundler: {}", bundler.program().display()));

    let plugin = GeneratePackageJsonPlugin::new(
        options.package.clone(),
        options.output_name.clone(),
        options.resolver(),
    );
    let package = options.package.clone();
    let compiler = Compiler::new(options, Box::new(bundler)).with_plugin(plugin);

    logger::spinner_start(&format!("Building {}", package));
    match compiler.run() {
        Ok(stats) => {
            logger::spinner_success(&format!(
                "Built {} in {} ms",
                stats.package, stats.elapsed_ms
            ));
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
            Ok(())
        }
        Err(e) => {
            logger::spinner_error(&format!("Failed to build {}", package));
            Err(e.into())
        }
    }
}

fn print_stats(stats: &BuildStats) {
    for asset in &stats.assets {
        println!(
            "asset {} {}",
            asset.name.green().bold(),
            format_size(asset.size).dimmed()
        );
    }
    println!(
        "{} {} compiled by {} into {} ({})",
        "✔".green(),
        stats.package.bold(),
        stats.bundler,
        stats.out_dir.display(),
        format_size(stats.total_size())
    );
}
