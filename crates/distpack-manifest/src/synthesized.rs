use crate::descriptor::PackageDescriptor;
use serde::Serialize;
use serde_json::Value;

/// Asset key of the generated manifest in a build's output
pub const MANIFEST_ASSET: &str = "package.json";

/// Companion `package.json` published next to a bundled package.
///
/// Absent `license` and `author` are omitted from the JSON instead of being
/// written as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SynthesizedManifest {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
}

impl SynthesizedManifest {
    /// Derive the manifest for `descriptor`, published under `name`
    pub fn from_descriptor(name: &str, descriptor: &PackageDescriptor) -> Self {
        SynthesizedManifest {
            name: name.to_string(),
            version: descriptor.version.clone(),
            license: descriptor.effective_license().map(str::to_string),
            author: descriptor.author.clone(),
        }
    }

    /// Compact JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
