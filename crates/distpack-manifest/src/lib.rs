//! Package descriptor resolution and manifest synthesis
//!
//! This crate reads the `package.json` of an installed npm dependency and
//! derives the compact manifest that is shipped next to a bundled build.
//!
//! Resolution follows the Node layout: `node_modules/<name>/package.json` in
//! the base directory and each of its ancestors, then any extra roots.

pub mod descriptor;
pub mod errors;
pub mod resolver;
pub mod synthesized;

pub use descriptor::PackageDescriptor;
pub use errors::ResolutionError;
pub use resolver::{validate_package_name, PackageResolver, ResolvedPackage};
pub use synthesized::{SynthesizedManifest, MANIFEST_ASSET};
