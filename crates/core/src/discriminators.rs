//! Whole-document discriminator pre-pass.
//!
//! Pass 1 records every `discriminator.propertyName` by the pointer of the
//! node declaring it. Pass 2 copies discriminators onto the parents of
//! `oneOf`/`anyOf`/`allOf` members, so a subtype that `allOf`s its base
//! inherits the base's discriminator without re-resolving refs later.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::Discriminator;
use crate::resolver::{canonical_ref, create_ref};

const COMPOSITION_KEYS: [&str; 3] = ["oneOf", "anyOf", "allOf"];

/// Discriminators keyed by canonical node pointer.
#[derive(Debug, Clone, Default)]
pub struct DiscriminatorMap {
    objects: HashMap<String, Discriminator>,
    handled: HashSet<String>,
}

impl DiscriminatorMap {
    /// Run both passes over the raw document.
    pub fn scan(document: &Value) -> Self {
        let mut objects = HashMap::new();

        walk(document, &mut Vec::new(), &mut |node, path| {
            if let Some(discriminator) = own_discriminator(node) {
                objects.insert(create_ref(path), discriminator);
            }
        });

        walk(document, &mut Vec::new(), &mut |node, path| {
            for key in COMPOSITION_KEYS {
                let Some(Value::Array(items)) = node.get(key) else {
                    continue;
                };
                for item in items {
                    let inherited = match item.get("$ref").and_then(Value::as_str) {
                        Some(reference) => canonical_ref(reference)
                            .and_then(|target| objects.get(&target).cloned()),
                        None => item.as_object().and_then(own_discriminator),
                    };
                    if let Some(discriminator) = inherited {
                        objects.insert(create_ref(path), discriminator);
                    }
                }
            }
        });

        debug!(count = objects.len(), "Scanned discriminators.");
        Self {
            objects,
            handled: HashSet::new(),
        }
    }

    /// Discriminator attributed to a node pointer or a `$ref`.
    pub fn get(&self, path: &str) -> Option<&Discriminator> {
        let key = canonical_ref(path)?;
        self.objects.get(&key)
    }

    /// Whether the discriminant literal was already injected for this pointer.
    pub fn is_handled(&self, path: &str) -> bool {
        canonical_ref(path).is_some_and(|key| self.handled.contains(&key))
    }

    /// Record that the discriminant literal has been injected at `path`.
    pub fn mark_handled(&mut self, path: &str) {
        if let Some(key) = canonical_ref(path) {
            self.handled.insert(key);
        }
    }

    /// Number of nodes with a discriminator.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// No discriminators anywhere in the document.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn own_discriminator(node: &Map<String, Value>) -> Option<Discriminator> {
    let value = node.get("discriminator")?;
    value.get("propertyName")?.as_str()?;
    Discriminator::deserialize(value).ok()
}

fn walk<F>(value: &Value, path: &mut Vec<String>, visit: &mut F)
where
    F: FnMut(&Map<String, Value>, &[String]),
{
    match value {
        Value::Object(map) => {
            visit(map, path);
            for (key, child) in map {
                path.push(key.clone());
                walk(child, path, visit);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push(i.to_string());
                walk(child, path, visit);
                path.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pets() -> Value {
        json!({
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "required": ["petType"],
                        "properties": { "petType": { "type": "string" } },
                        "discriminator": { "propertyName": "petType" }
                    },
                    "Cat": {
                        "allOf": [
                            { "$ref": "#/components/schemas/Pet" },
                            { "type": "object", "properties": { "meows": { "type": "boolean" } } }
                        ]
                    },
                    "Plain": { "type": "string" }
                }
            }
        })
    }

    #[test]
    fn test_declared_discriminator_is_recorded() {
        let map = DiscriminatorMap::scan(&pets());
        assert_eq!(
            map.get("#/components/schemas/Pet").unwrap().property_name,
            "petType"
        );
        assert!(map.get("#/components/schemas/Plain").is_none());
    }

    #[test]
    fn test_discriminator_propagates_through_all_of_ref() {
        let map = DiscriminatorMap::scan(&pets());
        assert_eq!(
            map.get("#/components/schemas/Cat").unwrap().property_name,
            "petType"
        );
    }

    #[test]
    fn test_inline_member_discriminator_propagates() {
        let doc = json!({
            "components": {
                "schemas": {
                    "Wrapper": {
                        "anyOf": [
                            { "type": "object", "discriminator": { "propertyName": "kind" } }
                        ]
                    }
                }
            }
        });
        let map = DiscriminatorMap::scan(&doc);
        assert_eq!(
            map.get("#/components/schemas/Wrapper").unwrap().property_name,
            "kind"
        );
        assert!(map.get("#/components/schemas/Wrapper/anyOf/0").is_some());
    }

    #[test]
    fn test_handled_marks() {
        let mut map = DiscriminatorMap::scan(&pets());
        assert!(!map.is_handled("#/components/schemas/Cat"));
        map.mark_handled("#/components/schemas/Cat");
        assert!(map.is_handled("#/components/schemas/Cat"));
    }

    #[test]
    fn test_discriminator_without_property_name_is_ignored() {
        let doc = json!({ "a": { "discriminator": { "mapping": {} } } });
        assert!(DiscriminatorMap::scan(&doc).is_empty());
    }
}
