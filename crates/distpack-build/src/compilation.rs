use crate::assets::AssetCollection;
use crate::hooks::CompilationHooks;

/// State of one build pass: its assets and the taps registered for it.
///
/// A fresh compilation is created by every `Compiler::run`, so nothing leaks
/// from one build into the next.
#[derive(Default)]
pub struct Compilation {
    pub assets: AssetCollection,
    pub hooks: CompilationHooks,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the `process_assets` taps over this compilation's assets
    pub(crate) fn process_assets(&mut self) -> Result<(), crate::errors::BuildError> {
        self.hooks.process_assets.call(&mut self.assets)
    }
}
