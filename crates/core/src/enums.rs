//! Enum extraction.
//!
//! An enum schema is either inlined as a union of literals or hoisted to a
//! named footer declaration. A TypeScript `enum` replaces the site with a
//! reference; a `const` values array sits alongside the inline union.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::ast::{TsEnumMember, TsLiteral, TsProp, TsType, TsTypeDef, TypeDefKind};
use crate::context::TransformContext;
use crate::document::SchemaObject;
use crate::resolver::parse_ref;
use crate::utils::{capitalize_first, pascal_case, sanitize_ts_identifier};

/// Hoisted enum declarations of one document, keyed by their canonical member list.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    by_key: HashMap<String, String>,
    names: HashSet<String>,
}

impl EnumRegistry {
    /// Name already declared for this member list.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Reserve a declaration name, suffixing it when taken, and remember it under `key`.
    pub fn register(&mut self, key: String, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 2;
        while self.names.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        self.names.insert(name.clone());
        self.by_key.insert(key, name.clone());
        name
    }

    /// Number of declaration names handed out.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A non-empty `enum` on a schema that is not shaped as an object.
pub fn is_enum_schema(schema: &SchemaObject) -> bool {
    schema.enum_values.as_ref().is_some_and(|v| !v.is_empty())
        && !schema.has_type("object")
        && schema.properties.is_none()
        && schema.additional_properties.is_none()
}

fn is_literal_compatible(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Null)
}

/// Type for an enum schema: an inline literal union, or a reference to a
/// hoisted TypeScript `enum` when the `enum` option is set.
pub fn transform_enum(schema: &SchemaObject, path: &str, ctx: &mut TransformContext<'_>) -> TsType {
    let values = schema.enum_values.as_deref().unwrap_or_default();
    let add_null =
        (schema.is_nullable() || schema.type_includes_null()) && !schema.has_default();
    let literal_only = values.iter().all(is_literal_compatible);

    if ctx.options.enums && literal_only {
        return hoist_ts_enum(schema, values, path, add_null, ctx);
    }

    let members = TsType::union(values.iter().map(json_to_type));

    if ctx.options.enum_values && literal_only {
        hoist_values_array(&members, values, path, ctx);
    }

    if add_null {
        TsType::nullable(members)
    } else {
        members
    }
}

fn hoist_ts_enum(
    schema: &SchemaObject,
    values: &[Value],
    path: &str,
    add_null: bool,
    ctx: &mut TransformContext<'_>,
) -> TsType {
    let has_null = values.iter().any(Value::is_null);
    let non_null: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return TsType::NULL;
    }

    let key = registry_key("enum", &non_null);
    let existing = if ctx.options.dedupe_enums {
        ctx.enums.lookup(&key).map(str::to_string)
    } else {
        None
    };
    let name = match existing {
        Some(name) => name,
        None => {
            let name = ctx.enums.register(key, &enum_name(path));
            ctx.push_footer(TsTypeDef {
                name: name.clone(),
                kind: TypeDefKind::Enum {
                    members: enum_members(schema, values),
                },
                doc: None,
            });
            name
        }
    };

    let site = TsType::reference([name]);
    if has_null || add_null {
        TsType::nullable(site)
    } else {
        site
    }
}

fn hoist_values_array(members: &TsType, values: &[Value], path: &str, ctx: &mut TransformContext<'_>) {
    let literals: Vec<TsLiteral> = values.iter().filter_map(json_to_literal).collect();
    let key = registry_key("values", values);
    if ctx.options.dedupe_enums && ctx.enums.lookup(&key).is_some() {
        return;
    }
    let name = ctx.enums.register(key, &format!("{}Values", enum_name(path)));
    let element = match members {
        TsType::Union(items) => TsType::union(items.iter().filter(|t| **t != TsType::NULL).cloned()),
        other => other.clone(),
    };
    ctx.push_footer(TsTypeDef {
        name,
        kind: TypeDefKind::ConstArray {
            element,
            values: literals,
        },
        doc: None,
    });
}

fn enum_members(schema: &SchemaObject, values: &[Value]) -> Vec<TsEnumMember> {
    let mut used = HashSet::new();
    let mut members = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let Some(literal) = json_to_literal(value) else {
            continue;
        };
        let explicit = schema
            .x_enum_varnames
            .as_ref()
            .and_then(|names| names.get(i))
            .filter(|name| !name.is_empty());
        let mut name = match explicit {
            Some(name) => sanitize_ts_identifier(name),
            None => member_name(value),
        };
        if !used.insert(name.clone()) {
            name = format!("{name}_{i}");
            used.insert(name.clone());
        }
        let description = schema
            .x_enum_descriptions
            .as_ref()
            .and_then(|d| d.get(i))
            .filter(|d| !d.is_empty())
            .cloned();
        members.push(TsEnumMember {
            name,
            value: literal,
            description,
        });
    }
    members
}

/// Declaration name from a schema pointer, dropping the `components/schemas`
/// prefix and `properties` segments.
pub fn enum_name(path: &str) -> String {
    let pointer = parse_ref(path).pointer;
    let skip = if pointer.starts_with(&["components".to_string(), "schemas".to_string()]) {
        2
    } else {
        0
    };
    let joined = pointer[skip..]
        .iter()
        .filter(|segment| segment.as_str() != "properties")
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/");
    let name = pascal_case(&joined);
    if name.is_empty() {
        "Enum".to_string()
    } else {
        name
    }
}

fn member_name(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            let text = n.to_string().replace('-', "Minus").replace(['.', '+'], "_");
            format!("Value{text}")
        }
        Value::String(s) if s.is_empty() => "Empty".to_string(),
        Value::String(s) => {
            let mut name: String = s
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
                .collect();
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                name = format!("Value{name}");
            }
            name
        }
        Value::Bool(b) => capitalize_first(&b.to_string()),
        _ => "Value".to_string(),
    }
}

fn registry_key<V: serde::Serialize>(kind: &str, values: &[V]) -> String {
    let members = serde_json::to_string(values).unwrap_or_default();
    format!("{kind}:{members}")
}

/// Literal for a scalar JSON value; `None` for null, arrays and objects.
pub fn json_to_literal(value: &Value) -> Option<TsLiteral> {
    match value {
        Value::String(s) => Some(TsLiteral::String(s.clone())),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => TsLiteral::Int(i),
            None => TsLiteral::Number(n.as_f64().unwrap_or_default()),
        }),
        Value::Bool(b) => Some(TsLiteral::Bool(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Exact type of a JSON value (`const`, enum members).
pub fn json_to_type(value: &Value) -> TsType {
    match value {
        Value::Null => TsType::NULL,
        Value::Array(items) => TsType::tuple(items.iter().map(json_to_type).collect(), false),
        Value::Object(map) => TsType::object(
            map.iter()
                .map(|(key, value)| TsProp::new(key.clone(), json_to_type(value)))
                .collect(),
        ),
        scalar => json_to_literal(scalar).map_or(TsType::UNKNOWN, TsType::Literal),
    }
}
