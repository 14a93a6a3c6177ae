use crate::common::project_root;
use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use distpack_build::plugins::synthesize_manifest;
use distpack_config::BuildConfig;
use distpack_manifest::PackageResolver;

/// Print the package.json a build would generate, without bundling
#[derive(Args, Debug, Clone)]
pub struct ManifestCommand {
    /// Installed package to describe (overrides `package` in distpack.toml)
    pub package: Option<String>,

    /// Name written into the manifest (default: the package name)
    #[arg(long)]
    pub name: Option<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn handle_manifest(cmd: ManifestCommand, _opts: &GlobalOpts) -> Result<()> {
    let config = BuildConfig::load().context("Failed to load config")?;

    let package = cmd
        .package
        .or_else(|| config.package.clone())
        .filter(|p| !p.trim().is_empty())
        .context("No package given and no `package` set in distpack.toml")?;
    let name = cmd
        .name
        .or_else(|| config.name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| package.clone());

    let root = project_root().context("Failed to determine working directory")?;
    let extra_roots = config.node_modules().into_iter().map(|p| root.join(p));
    let resolver = PackageResolver::new(&root).with_extra_roots(extra_roots);

    logger::debug(&format!("Resolving {} from {}", package, root.display()));
    let manifest = synthesize_manifest(&resolver, &package, &name)?;

    let json = if cmd.pretty {
        serde_json::to_string_pretty(&manifest)?
    } else {
        manifest.to_json()?
    };
    println!("{}", json);
    Ok(())
}
