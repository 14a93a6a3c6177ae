//! Typed view of an installed package's `package.json`
//!
//! Only the fields distpack consumes are modeled; everything else in the file
//! is ignored on deserialization.

use serde::Deserialize;
use serde_json::Value;

/// Entry-point conditions honored for a CommonJS Node build, in priority order
const EXPORT_CONDITIONS: &[&str] = &["require", "node", "default"];

/// Read-only metadata of one installed dependency
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    /// SPDX expression, or the legacy `{type, url}` object
    #[serde(default)]
    pub license: Option<Value>,
    /// Deprecated `licenses` field still found in older packages, usually an
    /// array of `{type, url}` objects
    #[serde(default)]
    pub licenses: Option<Value>,
    /// String (`"Jane Doe <jane@example.com>"`) or person object, kept verbatim
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub exports: Option<Value>,
}

impl PackageDescriptor {
    /// License to publish for this package.
    ///
    /// The direct `license` field wins; otherwise the first entry of
    /// `licenses`. Empty strings and unrecognized shapes count as absent.
    pub fn effective_license(&self) -> Option<&str> {
        self.license
            .as_ref()
            .and_then(license_type)
            .or_else(|| {
                self.licenses.as_ref().and_then(|licenses| match licenses {
                    Value::Array(entries) => entries.first().and_then(license_type),
                    other => license_type(other),
                })
            })
    }

    /// Relative entry point for a CommonJS consumer.
    ///
    /// `exports` is consulted first (root `"."` entry, then the `require`,
    /// `node` and `default` conditions), then `main`, then `index.js`.
    pub fn entry_point(&self) -> String {
        self.exports
            .as_ref()
            .and_then(export_target)
            .or_else(|| self.main.clone().filter(|m| !m.is_empty()))
            .unwrap_or_else(|| "index.js".to_string())
    }
}

/// `"MIT"` or `{"type": "MIT", ...}`
fn license_type(value: &Value) -> Option<&str> {
    let kind = match value {
        Value::String(spdx) => spdx.as_str(),
        Value::Object(map) => map.get("type")?.as_str()?,
        _ => return None,
    };
    Some(kind).filter(|k| !k.is_empty())
}

fn export_target(exports: &Value) -> Option<String> {
    match exports {
        Value::String(target) => Some(target.clone()),
        Value::Array(alternatives) => alternatives.iter().find_map(export_target),
        Value::Object(map) => {
            if let Some(root) = map.get(".") {
                return export_target(root);
            }
            // Subpath-only maps without "." do not expose the package root
            if map.keys().any(|key| key.starts_with('.')) {
                return None;
            }
            EXPORT_CONDITIONS
                .iter()
                .filter_map(|condition| map.get(*condition))
                .find_map(export_target)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> PackageDescriptor {
        serde_json::from_value(value).unwrap_or_else(|e| panic!("invalid descriptor: {e}"))
    }

    #[test]
    fn test_direct_license_preferred() {
        let desc = descriptor(json!({
            "name": "foo",
            "version": "1.0.0",
            "license": "MIT",
            "licenses": [{"type": "GPL-2.0"}]
        }));
        assert_eq!(desc.effective_license(), Some("MIT"));
    }

    #[test]
    fn test_legacy_licenses_array_fallback() {
        let desc = descriptor(json!({
            "name": "foo",
            "version": "1.0.0",
            "licenses": [
                {"type": "Apache-2.0", "url": "https://example.com/LICENSE"},
                {"type": "MIT"}
            ]
        }));
        assert_eq!(desc.effective_license(), Some("Apache-2.0"));
    }

    #[test]
    fn test_legacy_license_object_and_empty_string() {
        let object = descriptor(json!({
            "name": "foo",
            "version": "1.0.0",
            "license": {"type": "BSD-3-Clause", "url": "https://example.com"}
        }));
        assert_eq!(object.effective_license(), Some("BSD-3-Clause"));

        let empty = descriptor(json!({
            "name": "foo",
            "version": "1.0.0",
            "license": "",
            "licenses": [{"type": "ISC"}]
        }));
        assert_eq!(empty.effective_license(), Some("ISC"));
    }

    #[test]
    fn test_single_object_licenses_field() {
        let desc = descriptor(json!({
            "name": "oldpkg",
            "version": "0.1.0",
            "licenses": {"type": "MIT", "url": "x"}
        }));
        assert_eq!(desc.effective_license(), Some("MIT"));

        let plain = descriptor(json!({"name": "oldpkg", "version": "0.1.0", "licenses": ["BSD"]}));
        assert_eq!(plain.effective_license(), Some("BSD"));
    }

    #[test]
    fn test_unexpected_license_shapes_are_ignored() {
        let desc = descriptor(json!({
            "name": "odd",
            "version": "1.0.0",
            "license": 42,
            "licenses": [{"type": null}, {"type": "MIT"}]
        }));
        assert_eq!(desc.effective_license(), None);

        let nested = descriptor(json!({
            "name": "odd",
            "version": "1.0.0",
            "license": {"name": "MIT"},
            "licenses": true
        }));
        assert_eq!(nested.effective_license(), None);
    }

    #[test]
    fn test_no_license_information() {
        let desc = descriptor(json!({"name": "foo", "version": "1.0.0"}));
        assert_eq!(desc.effective_license(), None);
        assert_eq!(desc.author, None);
    }

    #[test]
    fn test_entry_point_resolution_order() {
        let plain = descriptor(json!({"name": "a", "version": "1.0.0"}));
        assert_eq!(plain.entry_point(), "index.js");

        let main = descriptor(json!({"name": "a", "version": "1.0.0", "main": "lib/a.js"}));
        assert_eq!(main.entry_point(), "lib/a.js");

        let string_exports = descriptor(json!({
            "name": "a", "version": "1.0.0", "main": "lib/a.js", "exports": "./dist/a.cjs"
        }));
        assert_eq!(string_exports.entry_point(), "./dist/a.cjs");

        let conditional = descriptor(json!({
            "name": "a",
            "version": "1.0.0",
            "exports": {
                ".": {"import": "./index.mjs", "require": "./index.cjs"},
                "./package.json": "./package.json"
            }
        }));
        assert_eq!(conditional.entry_point(), "./index.cjs");

        let nested = descriptor(json!({
            "name": "a",
            "version": "1.0.0",
            "exports": {"node": {"import": "./n.mjs", "default": "./n.js"}, "default": "./b.js"}
        }));
        assert_eq!(nested.entry_point(), "./n.js");
    }

    #[test]
    fn test_subpath_only_exports_fall_back_to_main() {
        let desc = descriptor(json!({
            "name": "a",
            "version": "1.0.0",
            "main": "main.js",
            "exports": {"./feature": "./feature.js"}
        }));
        assert_eq!(desc.entry_point(), "main.js");
    }
}
