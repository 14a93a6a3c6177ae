//! Generates a `package.json` next to the bundled output.
//!
//! The manifest describes the bundled dependency: the configured name, plus
//! `version`, `license` and `author` read from the dependency's own
//! `package.json` at the time assets are processed.

use crate::assets::{AssetCollection, RawSource};
use crate::compilation::Compilation;
use crate::errors::BuildError;
use crate::hooks::{AssetStage, CompilerHooks};
use crate::plugins::Plugin;
use distpack_logger as logger;
use distpack_manifest::{PackageResolver, ResolutionError, SynthesizedManifest, MANIFEST_ASSET};
use tracing::debug;

const PLUGIN_NAME: &str = "GeneratePackageJsonManifest";

#[derive(Debug, Clone)]
struct ManifestTarget {
    package: String,
    output_name: String,
    resolver: PackageResolver,
}

/// Adds `package.json` at [`AssetStage::Additions`]
#[derive(Debug, Clone)]
pub struct GeneratePackageJsonPlugin {
    target: ManifestTarget,
}

impl GeneratePackageJsonPlugin {
    /// `package` is the installed dependency to describe; `output_name` is the
    /// `name` written into the generated manifest.
    pub fn new(
        package: impl Into<String>,
        output_name: impl Into<String>,
        resolver: PackageResolver,
    ) -> Self {
        GeneratePackageJsonPlugin {
            target: ManifestTarget {
                package: package.into(),
                output_name: output_name.into(),
                resolver,
            },
        }
    }
}

impl Plugin for GeneratePackageJsonPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn apply(&self, hooks: &mut CompilerHooks) {
        let target = self.target.clone();
        hooks.make.tap(PLUGIN_NAME, move |compilation: &mut Compilation| {
            let target = target.clone();
            compilation.hooks.process_assets.tap(
                PLUGIN_NAME,
                AssetStage::Additions,
                move |assets| emit_manifest(&target, assets),
            );
            Ok(())
        });
    }
}

fn emit_manifest(target: &ManifestTarget, assets: &mut AssetCollection) -> Result<(), BuildError> {
    let manifest = synthesize_manifest(&target.resolver, &target.package, &target.output_name)?;
    let json = manifest.to_json()?;

    if assets
        .insert(MANIFEST_ASSET, RawSource::from(json))
        .is_some()
    {
        debug!("Replaced existing {} asset", MANIFEST_ASSET);
    }
    logger::debug(&format!(
        "Generated {} for {} {}",
        MANIFEST_ASSET, target.package, manifest.version
    ));
    Ok(())
}

/// Build the manifest for an installed `package`, published as `output_name`
pub fn synthesize_manifest(
    resolver: &PackageResolver,
    package: &str,
    output_name: &str,
) -> Result<SynthesizedManifest, ResolutionError> {
    let descriptor = resolver.read_descriptor(package)?;
    Ok(SynthesizedManifest::from_descriptor(output_name, &descriptor))
}
