//! OpenAPI document structs for serde deserialization.
//!
//! This module defines the subset of the OpenAPI 3.x object model that the
//! transformer walks. Maps are `IndexMap`s so document order survives.
//!
//! The transformer keeps the raw `serde_json::Value` next to this typed view:
//! `$ref` targets are looked up in the raw tree and deserialized on demand.

// Fields carry their OpenAPI names; the OpenAPI specification documents them
#![allow(missing_docs)]

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{self, DeserializeOwned, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::error::TransformError;

/// HTTP methods a Path Item may declare, in emission order.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Root OpenAPI document.
#[derive(Debug, Default, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub paths: IndexMap<String, MaybeRef<PathItem>>,
    #[serde(default)]
    pub webhooks: IndexMap<String, MaybeRef<PathItem>>,
    #[serde(default)]
    pub components: Components,
    #[serde(rename = "$defs", default)]
    pub defs: IndexMap<String, Schema>,
}

impl OpenApiDocument {
    /// Deserialize the typed view of an in-memory document.
    pub fn from_value(value: &Value) -> Result<Self, TransformError> {
        serde_path_to_error::deserialize(value).map_err(|err| {
            let path = err.path().to_string();
            TransformError::InvalidDocument {
                path,
                source: err.into_inner(),
            }
        })
    }
}

/// Either a `$ref` or an inline object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaybeRef<T> {
    Ref(String),
    Item(T),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for MaybeRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Some(reference) = value.get("$ref").and_then(Value::as_str) {
            return Ok(MaybeRef::Ref(reference.to_string()));
        }
        serde_path_to_error::deserialize(&value)
            .map(MaybeRef::Item)
            .map_err(|err| {
                let path = err.path().to_string();
                let inner = err.into_inner();
                if path == "." {
                    de::Error::custom(inner)
                } else {
                    de::Error::custom(format!("{path}: {inner}"))
                }
            })
    }
}

/// Reusable objects. Every section defaults to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Components {
    pub schemas: IndexMap<String, Schema>,
    pub responses: IndexMap<String, MaybeRef<Response>>,
    pub parameters: IndexMap<String, MaybeRef<Parameter>>,
    pub request_bodies: IndexMap<String, MaybeRef<RequestBody>>,
    pub headers: IndexMap<String, MaybeRef<Header>>,
    pub path_items: IndexMap<String, MaybeRef<PathItem>>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Path-level parameters shared by all operations.
    #[serde(default)]
    pub parameters: Vec<MaybeRef<Parameter>>,
    pub get: Option<MaybeRef<Operation>>,
    pub put: Option<MaybeRef<Operation>>,
    pub post: Option<MaybeRef<Operation>>,
    pub delete: Option<MaybeRef<Operation>>,
    pub options: Option<MaybeRef<Operation>>,
    pub head: Option<MaybeRef<Operation>>,
    pub patch: Option<MaybeRef<Operation>>,
    pub trace: Option<MaybeRef<Operation>>,
}

impl PathItem {
    /// Look up the operation for a lowercase method name.
    pub fn operation(&self, method: &str) -> Option<&MaybeRef<Operation>> {
        match method {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            "trace" => self.trace.as_ref(),
            _ => None,
        }
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<MaybeRef<Parameter>>,
    pub request_body: Option<MaybeRef<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, MaybeRef<Response>>,
}

/// Where a parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    /// Emission order of parameter groups.
    pub const ALL: [ParameterLocation; 4] = [
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Path,
        ParameterLocation::Cookie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A parameter (query, header, path or cookie).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub deprecated: bool,
    pub description: Option<String>,
    pub schema: Option<Schema>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MaybeRef<MediaType>>,
}

/// A response definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, MaybeRef<Header>>,
    #[serde(default)]
    pub content: IndexMap<String, MaybeRef<MediaType>>,
}

/// A response header definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub deprecated: bool,
    pub schema: Option<Schema>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// A JSON Schema: either a boolean schema or a Schema Object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// `true` accepts anything, `false` accepts nothing.
    Bool(bool),
    Object(Box<SchemaObject>),
}

impl Schema {
    /// The Schema Object, if this is not a boolean schema.
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Schema::Object(object) => Some(object),
            Schema::Bool(_) => None,
        }
    }

    pub fn ref_path(&self) -> Option<&str> {
        self.as_object().and_then(|o| o.ref_path.as_deref())
    }
}

impl From<SchemaObject> for Schema {
    fn from(object: SchemaObject) -> Self {
        Schema::Object(Box::new(object))
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = Schema;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a Schema Object or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Schema, E> {
                Ok(Schema::Bool(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Schema, A::Error> {
                SchemaObject::deserialize(MapAccessDeserializer::new(map)).map(Schema::from)
            }
        }

        deserializer.deserialize_any(SchemaVisitor)
    }
}

/// JSON Schema object as used in OpenAPI 3.0 and 3.1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaObject {
    /// A single type name or, in 3.1, a list of them.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema. Sibling keywords are ignored for typing.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    pub properties: Option<IndexMap<String, Schema>>,
    pub required: Option<Vec<String>>,
    pub additional_properties: Option<Schema>,
    #[serde(rename = "$defs")]
    pub defs: Option<IndexMap<String, Schema>>,

    pub items: Option<Items>,
    pub prefix_items: Option<Vec<Schema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(rename = "const")]
    pub const_value: Option<Value>,

    pub all_of: Option<Vec<Schema>>,
    pub any_of: Option<Vec<Schema>>,
    pub one_of: Option<Vec<Schema>>,
    pub discriminator: Option<Discriminator>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,
    pub default: Option<Value>,
    pub deprecated: Option<bool>,
    pub read_only: Option<bool>,

    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub example: Option<Value>,

    #[serde(rename = "x-enum-varnames", alias = "x-enumNames")]
    pub x_enum_varnames: Option<Vec<String>>,
    #[serde(rename = "x-enum-descriptions", alias = "x-enumDescriptions")]
    pub x_enum_descriptions: Option<Vec<String>>,
}

impl SchemaObject {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated == Some(true)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r == key))
    }

    /// True when `type` is exactly the given single type name.
    pub fn has_type(&self, name: &str) -> bool {
        matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == name)
    }

    /// True when `type` names `null`, either alone or in a list.
    pub fn type_includes_null(&self) -> bool {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => t == "null",
            Some(SchemaType::Multiple(types)) => types.iter().any(|t| t == "null"),
            None => false,
        }
    }
}

/// Schema type can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// `items` is a schema, or (legacy tuple form) a list of schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemsVisitor(PhantomData<Items>);

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = Items;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a Schema Object, a boolean or a list of schemas")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Items, E> {
                Ok(Items::Single(Box::new(Schema::Bool(v))))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Items, A::Error> {
                Schema::deserialize(MapAccessDeserializer::new(map))
                    .map(|schema| Items::Single(Box::new(schema)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Items, A::Error> {
                Vec::<Schema>::deserialize(SeqAccessDeserializer::new(seq)).map(Items::Tuple)
            }
        }

        deserializer.deserialize_any(ItemsVisitor(PhantomData))
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The property name that contains the discriminator value.
    pub property_name: String,
    /// Optional mapping from discriminator values to schema refs (or bare schema names).
    pub mapping: Option<IndexMap<String, String>>,
}
