//! Build plugins
//!
//! A plugin is applied once when it is added to a `Compiler`. It registers
//! closures on the compiler hooks and keeps no per-build state itself.

use crate::hooks::CompilerHooks;

pub mod package_json;

pub use package_json::{synthesize_manifest, GeneratePackageJsonPlugin};

pub trait Plugin {
    fn name(&self) -> &str;

    fn apply(&self, hooks: &mut CompilerHooks);
}
