//! Transform options.
//!
//! Every flag defaults to `false`. The struct deserializes from camelCase keys
//! so it can be loaded from a config file as well as built in code.

use serde::Deserialize;

/// Options controlling how an OpenAPI document is transformed into TypeScript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Allow arbitrary extra keys on every object that doesn't forbid them.
    pub additional_properties: bool,
    /// Sort object keys and parameters alphabetically instead of document order.
    pub alphabetize: bool,
    /// Treat properties that have a `default` as required (outside request inputs).
    pub default_non_nullable: bool,
    /// Type empty objects as `Record<string, unknown>` instead of `Record<string, never>`.
    pub empty_objects_unknown: bool,
    /// Hoist enums to named TypeScript enums.
    #[serde(rename = "enum")]
    pub enums: bool,
    /// Hoist enum values to exported const arrays.
    pub enum_values: bool,
    /// Reuse a single declaration for structurally identical enums.
    pub dedupe_enums: bool,
    /// Drop deprecated properties, parameters and operations.
    pub exclude_deprecated: bool,
    /// Render sections as `type` aliases instead of interfaces (rendering only).
    pub export_type: bool,
    /// Mark every member, array and tuple readonly.
    pub immutable: bool,
    /// Key templated paths by template literal types (`/users/${string}`).
    pub path_params_as_types: bool,
    /// Model `minItems`/`maxItems` with bounded tuples.
    pub array_length: bool,
    /// When a schema has no `required` list, treat all of its properties as required.
    pub properties_required_by_default: bool,
    /// Export a top-level alias for every component (`SchemaFoo`, `ResponseBar`, ...).
    pub root_types: bool,
    /// Do not log resolution warnings (they are still returned).
    pub silent: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_off() {
        let options: TransformOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn test_camel_case_keys() {
        let options: TransformOptions = serde_json::from_value(json!({
            "enum": true,
            "dedupeEnums": true,
            "pathParamsAsTypes": true,
            "arrayLength": true
        }))
        .unwrap();
        assert!(options.enums);
        assert!(options.dedupe_enums);
        assert!(options.path_params_as_types);
        assert!(options.array_length);
        assert!(!options.immutable);
    }
}
