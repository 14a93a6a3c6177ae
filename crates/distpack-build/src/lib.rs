//! distpack build pipeline
//!
//! A [`Compiler`] hands primary compilation to an external [`Bundler`], then
//! lets plugins add or rewrite assets before anything is written to disk.
//!
//! Plugins register in two steps: a `make` tap fires once per compilation and
//! may register `process_assets` taps, which run in [`AssetStage`] order over
//! the mutable [`AssetCollection`]. If any step fails the output directory is
//! left absent.

pub mod assets;
pub mod bundler;
pub mod compilation;
pub mod compiler;
pub mod errors;
pub mod hooks;
pub mod plugins;

pub use assets::{AssetCollection, RawSource};
pub use bundler::{BundleRequest, Bundler, ExternalBundler};
pub use compilation::Compilation;
pub use compiler::{BuildOptions, BuildStats, Compiler, EmittedAsset};
pub use errors::BuildError;
pub use hooks::{AssetStage, CompilationHooks, CompilerHooks, StagedHook, SyncHook};
pub use plugins::{GeneratePackageJsonPlugin, Plugin};
