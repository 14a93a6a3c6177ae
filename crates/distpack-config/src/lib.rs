//! Build configuration for distpack
//!
//! This crate owns the `distpack.toml` project file and the discovery of the
//! external bundler executable. It is shared by the build pipeline and the
//! CLI so neither has to know where values come from.

pub mod build_config;
pub mod bundler_paths;
pub mod errors;

pub use build_config::{BuildConfig, CONFIG_ENV, DEFAULT_CONFIG_FILE};
pub use bundler_paths::{resolve_bundler, BundlerPathError, DEFAULT_BUNDLER, NODE_BIN_DIR};
pub use errors::ConfigError;
