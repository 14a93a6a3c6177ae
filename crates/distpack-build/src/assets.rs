use std::collections::BTreeMap;

/// Raw bytes of one output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSource {
    bytes: Vec<u8>,
}

impl RawSource {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        RawSource { bytes }
    }

    pub fn source(&self) -> &[u8] {
        &self.bytes
    }

    /// Contents as UTF-8 text, if valid
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl From<String> for RawSource {
    fn from(text: String) -> Self {
        RawSource::from_bytes(text.into_bytes())
    }
}

impl From<&str> for RawSource {
    fn from(text: &str) -> Self {
        RawSource::from_bytes(text.as_bytes().to_vec())
    }
}

/// Output files of one compilation, keyed by path relative to the output
/// directory (always `/`-separated). Iteration is in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCollection {
    assets: BTreeMap<String, RawSource>,
}

impl AssetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, source: RawSource) -> Option<RawSource> {
        self.assets.insert(name.into(), source)
    }

    pub fn get(&self, name: &str) -> Option<&RawSource> {
        self.assets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawSource)> {
        self.assets.iter().map(|(name, source)| (name.as_str(), source))
    }

    /// Merge another collection in; entries from `other` win on conflict
    pub fn extend(&mut self, other: AssetCollection) {
        self.assets.extend(other.assets);
    }
}
