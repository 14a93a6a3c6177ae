//! Hook registries for the build pipeline
//!
//! Taps are plain closures. A failing tap stops the hook and its error is
//! returned to the caller; remaining taps do not run.

use crate::assets::AssetCollection;
use crate::compilation::Compilation;
use crate::errors::BuildError;
use tracing::{debug, trace};

type Callback<T> = Box<dyn Fn(&mut T) -> Result<(), BuildError>>;

/// Phases of asset processing, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetStage {
    /// Add assets that are not derived from existing ones
    Additional,
    /// Basic preprocessing of existing assets
    PreProcess,
    /// Derive new assets from existing ones
    Derived,
    /// Add additive files such as manifests next to compiled output
    Additions,
    Optimize,
    OptimizeSize,
    DevTooling,
    /// Create summaries of the final assets
    Summarize,
    /// Reporting only; assets must not change
    Report,
}

/// Hook whose taps run in registration order
pub struct SyncHook<T> {
    taps: Vec<(String, Callback<T>)>,
}

impl<T> Default for SyncHook<T> {
    fn default() -> Self {
        SyncHook { taps: Vec::new() }
    }
}

impl<T> SyncHook<T> {
    pub fn tap<F>(&mut self, name: &str, callback: F)
    where
        F: Fn(&mut T) -> Result<(), BuildError> + 'static,
    {
        debug!("Registered tap '{}'", name);
        self.taps.push((name.to_string(), Box::new(callback)));
    }

    pub fn call(&self, arg: &mut T) -> Result<(), BuildError> {
        for (name, callback) in &self.taps {
            trace!("Calling tap '{}'", name);
            callback(arg)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

struct StagedTap<T> {
    name: String,
    stage: AssetStage,
    callback: Callback<T>,
}

/// Hook whose taps run by ascending [`AssetStage`], registration order within a stage
pub struct StagedHook<T> {
    taps: Vec<StagedTap<T>>,
}

impl<T> Default for StagedHook<T> {
    fn default() -> Self {
        StagedHook { taps: Vec::new() }
    }
}

impl<T> StagedHook<T> {
    pub fn tap<F>(&mut self, name: &str, stage: AssetStage, callback: F)
    where
        F: Fn(&mut T) -> Result<(), BuildError> + 'static,
    {
        debug!("Registered tap '{}' at stage {:?}", name, stage);
        let position = self
            .taps
            .iter()
            .position(|tap| tap.stage > stage)
            .unwrap_or(self.taps.len());
        self.taps.insert(
            position,
            StagedTap {
                name: name.to_string(),
                stage,
                callback: Box::new(callback),
            },
        );
    }

    pub fn call(&self, arg: &mut T) -> Result<(), BuildError> {
        for tap in &self.taps {
            trace!("Calling tap '{}' ({:?})", tap.name, tap.stage);
            (tap.callback)(arg)?;
        }
        Ok(())
    }

    /// Tap names in execution order
    pub fn tap_names(&self) -> Vec<&str> {
        self.taps.iter().map(|tap| tap.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Hooks owned by the compiler, registered once when plugins are applied
#[derive(Default)]
pub struct CompilerHooks {
    /// Fired once per compilation, before primary compilation starts
    pub make: SyncHook<Compilation>,
}

/// Hooks owned by a single compilation
#[derive(Default)]
pub struct CompilationHooks {
    /// Fired once after the bundler's output is loaded, before emission
    pub process_assets: StagedHook<AssetCollection>,
}
