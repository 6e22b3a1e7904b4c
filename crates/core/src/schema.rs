//! Schema Object → TypeScript type expression.
//!
//! Every node is first classified into a [`SchemaKind`]; composite nodes then
//! derive their own [`CoreShape`] (primitive, array, polymorphic or object)
//! which the composition pipeline combines with `allOf`/`anyOf`/`oneOf`.

use serde_json::Value;

use crate::ast::{TsDoc, TsPrimitive, TsProp, TsType};
use crate::composition;
use crate::context::TransformContext;
use crate::document::{Discriminator, Items, Schema, SchemaObject, SchemaType};
use crate::enums;
use crate::error::TransformError;
use crate::resolver::{join_ref, parse_ref};

/// Above this many tuple members, length bounds degrade to a plain array.
const MAX_BOUNDED_TUPLE_SIZE: u64 = 30;

/// Pointer segments below which a `default` does not guarantee presence.
const REQUEST_INPUT_SEGMENTS: [&str; 3] = ["parameters", "requestBody", "requestBodies"];

/// Result of transforming one node, including a hook's request to make the
/// owning property optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    /// Derived (or hook-supplied) type
    pub ty: TsType,
    /// A hook asked for the owning property to be optional
    pub force_optional: bool,
}

/// Classification of a node, first match wins.
#[derive(Debug, Clone, Copy)]
enum SchemaKind<'s> {
    /// `false`
    Never,
    /// `true`
    Any,
    Ref(&'s str),
    Const(&'s Value),
    Enum(&'s SchemaObject),
    Composite(&'s SchemaObject),
}

impl<'s> SchemaKind<'s> {
    fn of(schema: &'s Schema) -> Self {
        let object = match schema {
            Schema::Bool(false) => return SchemaKind::Never,
            Schema::Bool(true) => return SchemaKind::Any,
            Schema::Object(object) => object.as_ref(),
        };
        if let Some(reference) = &object.ref_path {
            SchemaKind::Ref(reference)
        } else if let Some(value) = &object.const_value {
            SchemaKind::Const(value)
        } else if enums::is_enum_schema(object) {
            SchemaKind::Enum(object)
        } else {
            SchemaKind::Composite(object)
        }
    }
}

/// What a composite node contributes before composition keywords are applied.
#[derive(Debug, Clone, Copy)]
enum CoreShape<'s> {
    Primitive(TsPrimitive),
    Array,
    Polymorphic(&'s [String]),
    Object,
}

impl<'s> CoreShape<'s> {
    fn of(object: &'s SchemaObject) -> Self {
        match &object.schema_type {
            Some(SchemaType::Single(t)) => match t.as_str() {
                "null" => CoreShape::Primitive(TsPrimitive::Null),
                "string" => CoreShape::Primitive(TsPrimitive::String),
                "number" | "integer" => CoreShape::Primitive(TsPrimitive::Number),
                "boolean" => CoreShape::Primitive(TsPrimitive::Boolean),
                "array" => CoreShape::Array,
                _ => CoreShape::Object,
            },
            Some(SchemaType::Multiple(types)) => CoreShape::Polymorphic(types),
            None if object.items.is_some() || object.prefix_items.is_some() => CoreShape::Array,
            None => CoreShape::Object,
        }
    }
}

/// Transform a schema at a document location.
pub fn transform_schema(
    schema: &Schema,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<TsType, TransformError> {
    transform_node(schema, path, ctx).map(|t| t.ty)
}

/// Transform a schema, running the `transform` and `post_transform` hooks.
pub fn transform_node(
    schema: &Schema,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<Transformed, TransformError> {
    let hooks = ctx.hooks;
    if let Some(replacement) = hooks.transform(schema, &ctx.hook_context(path)) {
        let (ty, force_optional) = replacement.into_parts();
        return Ok(Transformed { ty, force_optional });
    }

    let ty = derive(schema, path, ctx)?;
    let ty = hooks.post_transform(ty, &ctx.hook_context(path));
    Ok(Transformed {
        ty,
        force_optional: false,
    })
}

fn derive(schema: &Schema, path: &str, ctx: &mut TransformContext<'_>) -> Result<TsType, TransformError> {
    match SchemaKind::of(schema) {
        SchemaKind::Never => Ok(TsType::NEVER),
        SchemaKind::Any => Ok(TsType::UNKNOWN),
        SchemaKind::Ref(reference) => transform_ref(reference, path, ctx),
        SchemaKind::Const(value) => Ok(enums::json_to_type(value)),
        SchemaKind::Enum(object) => Ok(enums::transform_enum(object, path, ctx)),
        SchemaKind::Composite(object) => {
            let core = transform_core(object, path, ctx)?;
            composition::combine(object, path, core, ctx)
        }
    }
}

/// A `$ref` becomes a reference to the named type; a dangling one degrades to `unknown`.
pub fn transform_ref(
    reference: &str,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<TsType, TransformError> {
    let parsed = parse_ref(reference);
    if parsed.external.is_none() && parsed.pointer.is_empty() {
        return Err(TransformError::InvalidRef {
            path: path.to_string(),
            reference: reference.to_string(),
        });
    }
    if let Err(err) = ctx.resolver.resolve_value(reference) {
        ctx.warn(path, err.to_string());
        return Ok(TsType::UNKNOWN);
    }
    Ok(ref_type(&parsed.pointer))
}

/// `components["schemas"]["Foo"]`; nested `properties` segments are skipped.
pub fn ref_type(pointer: &[String]) -> TsType {
    TsType::Ref(
        pointer
            .iter()
            .enumerate()
            .filter(|(i, segment)| *i == 0 || segment.as_str() != "properties")
            .map(|(_, segment)| segment.clone())
            .collect(),
    )
}

fn transform_core(
    object: &SchemaObject,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<Option<TsType>, TransformError> {
    match CoreShape::of(object) {
        CoreShape::Primitive(primitive) => Ok(Some(TsType::Primitive(primitive))),
        CoreShape::Array => transform_array(object, path, ctx).map(Some),
        CoreShape::Polymorphic(types) => transform_polymorphic(object, types, path, ctx).map(Some),
        CoreShape::Object => transform_object(object, path, ctx),
    }
}

// =============================================================================
// Arrays
// =============================================================================

fn transform_array(
    object: &SchemaObject,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<TsType, TransformError> {
    let readonly = ctx.options.immutable;

    if let Some(prefix) = &object.prefix_items {
        let prefix_path = join_ref(path, "prefixItems");
        let mut elements = Vec::with_capacity(prefix.len());
        for (i, item) in prefix.iter().enumerate() {
            elements.push(transform_schema(item, &join_ref(&prefix_path, &i.to_string()), ctx)?);
        }
        let rest = match &object.items {
            Some(Items::Single(items)) if **items != Schema::Bool(false) => Some(Box::new(
                transform_schema(items, &join_ref(path, "items"), ctx)?,
            )),
            _ => None,
        };
        return Ok(TsType::Tuple {
            elements,
            rest,
            readonly,
        });
    }

    let element = match &object.items {
        Some(Items::Tuple(items)) => {
            let items_path = join_ref(path, "items");
            let mut elements = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                elements.push(transform_schema(item, &join_ref(&items_path, &i.to_string()), ctx)?);
            }
            return Ok(TsType::tuple(elements, readonly));
        }
        Some(Items::Single(items)) => transform_schema(items, &join_ref(path, "items"), ctx)?,
        None => TsType::UNKNOWN,
    };

    if ctx.options.array_length
        && let Some(bounded) = bounded_tuple(&element, object.min_items, object.max_items, readonly)
    {
        return Ok(bounded);
    }
    Ok(TsType::array(element, readonly))
}

/// Tuple forms for `minItems`/`maxItems`, or `None` when unbounded or too large.
fn bounded_tuple(element: &TsType, min: Option<u64>, max: Option<u64>, readonly: bool) -> Option<TsType> {
    let min = min.unwrap_or(0);
    if min == 0 && max.is_none() {
        return None;
    }
    let estimate = match max {
        Some(max) if max < min => return None,
        Some(max) => tuple_union_size(min, max)?,
        None => min,
    };
    if estimate >= MAX_BOUNDED_TUPLE_SIZE {
        return None;
    }

    let repeat = |len: u64| vec![element.clone(); len as usize];
    Some(match max {
        Some(max) if max == min => TsType::tuple(repeat(min), readonly),
        Some(max) => TsType::union((min..=max).map(|len| TsType::tuple(repeat(len), readonly))),
        None => TsType::Tuple {
            elements: repeat(min),
            rest: Some(Box::new(element.clone())),
            readonly,
        },
    })
}

/// Total element count across the tuples `min..=max`; `None` on overflow.
fn tuple_union_size(min: u64, max: u64) -> Option<u64> {
    let upper = max.checked_mul(max.checked_add(1)?)?;
    let lower = min.checked_mul(min.saturating_sub(1))?;
    Some(upper.checked_sub(lower)? / 2)
}

// =============================================================================
// Polymorphic `type: [...]`
// =============================================================================

fn transform_polymorphic(
    object: &SchemaObject,
    types: &[String],
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<TsType, TransformError> {
    let mut branches = Vec::with_capacity(types.len());
    for t in types {
        if t == "null" {
            if !object.has_default() {
                branches.push(TsType::NULL);
            }
            continue;
        }
        let covered_by_one_of = object.one_of.as_ref().is_some_and(|one_of| {
            one_of
                .iter()
                .any(|branch| branch.as_object().is_some_and(|b| b.has_type(t)))
        });
        if covered_by_one_of {
            continue;
        }
        let narrowed = SchemaObject {
            schema_type: Some(SchemaType::Single(t.clone())),
            all_of: None,
            any_of: None,
            one_of: None,
            ..object.clone()
        };
        branches.push(transform_schema(&Schema::from(narrowed), path, ctx)?);
    }
    Ok(TsType::union(branches))
}

// =============================================================================
// Objects
// =============================================================================

fn transform_object(
    object: &SchemaObject,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<Option<TsType>, TransformError> {
    let options = ctx.options;
    let hooks = ctx.hooks;
    let mut props = Vec::new();

    let injected = inject_discriminator(object, path, ctx);
    if let Some(prop) = &injected {
        props.push(prop.clone());
    }

    if let Some(properties) = &object.properties {
        let properties_path = join_ref(path, "properties");
        let mut entries: Vec<(&String, &Schema)> = properties.iter().collect();
        if options.alphabetize {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }

        for (key, property) in entries {
            if injected.as_ref().is_some_and(|p| p.name == *key) {
                continue;
            }
            let property_path = join_ref(&properties_path, key);
            if options.exclude_deprecated && is_deprecated(property, ctx) {
                continue;
            }

            let Transformed { ty, force_optional } = transform_node(property, &property_path, ctx)?;
            let required = is_property_required(object, key, property, path, ctx);
            let read_only = property.as_object().is_some_and(|p| p.read_only == Some(true));
            let prop = TsProp::new(key.clone(), ty)
                .optional(force_optional || !required)
                .readonly(options.immutable || read_only)
                .doc(schema_doc(property));
            props.push(hooks.transform_property(prop, property, &ctx.hook_context(&property_path)));
        }
    }

    if let Some(defs) = &object.defs {
        let defs_path = join_ref(path, "$defs");
        let mut members = Vec::with_capacity(defs.len());
        for (name, def) in defs {
            let ty = transform_schema(def, &join_ref(&defs_path, name), ctx)?;
            members.push(
                TsProp::new(name.clone(), ty)
                    .readonly(options.immutable)
                    .doc(schema_doc(def)),
            );
        }
        props.push(TsProp::new("$defs", TsType::object(members)).readonly(options.immutable));
    }

    let index_value = match &object.additional_properties {
        Some(Schema::Bool(false)) => None,
        Some(Schema::Bool(true)) => Some(TsType::UNKNOWN),
        Some(Schema::Object(extra)) if **extra == SchemaObject::default() => Some(TsType::UNKNOWN),
        Some(extra) => Some(transform_schema(extra, &join_ref(path, "additionalProperties"), ctx)?),
        None if options.additional_properties && is_object_like(object) => Some(TsType::UNKNOWN),
        None => None,
    };

    let declared = (!props.is_empty()).then(|| TsType::object(props));
    let index = index_value.map(|value| TsType::record(value, options.immutable));

    Ok(match (declared, index) {
        (Some(declared), Some(index)) => Some(TsType::intersection([declared, index])),
        (declared, index) => declared.or(index),
    })
}

fn is_object_like(object: &SchemaObject) -> bool {
    object.has_type("object") || object.properties.is_some()
}

/// Literal discriminant property for a composed subtype, marking its path handled.
fn inject_discriminator(
    object: &SchemaObject,
    path: &str,
    ctx: &mut TransformContext<'_>,
) -> Option<TsProp> {
    if object.discriminator.is_some() || (object.all_of.is_none() && object.any_of.is_none()) {
        return None;
    }
    if ctx.discriminators.is_handled(path) {
        return None;
    }
    let discriminator = ctx.discriminators.get(path)?.clone();
    let value = discriminator_value(&discriminator, path);
    ctx.discriminators.mark_handled(path);
    Some(
        TsProp::new(discriminator.property_name, TsType::string_literal(value))
            .readonly(ctx.options.immutable),
    )
}

/// The mapping key that points at `path`, else the schema's own name.
fn discriminator_value(discriminator: &Discriminator, path: &str) -> String {
    let pointer = parse_ref(path).pointer;
    let own_name = pointer.last().cloned().unwrap_or_default();
    let Some(mapping) = &discriminator.mapping else {
        return own_name;
    };
    mapping
        .iter()
        .find(|(_, target)| {
            if target.contains('#') {
                parse_ref(target).pointer == pointer
            } else {
                **target == own_name
            }
        })
        .map_or(own_name, |(key, _)| key.clone())
}

fn is_deprecated(property: &Schema, ctx: &TransformContext<'_>) -> bool {
    match property.ref_path() {
        Some(reference) => ctx
            .peek_schema(reference)
            .is_some_and(|s| s.as_object().is_some_and(SchemaObject::is_deprecated)),
        None => property.as_object().is_some_and(SchemaObject::is_deprecated),
    }
}

fn is_property_required(
    parent: &SchemaObject,
    key: &str,
    property: &Schema,
    path: &str,
    ctx: &TransformContext<'_>,
) -> bool {
    if parent.is_required(key) {
        return true;
    }
    if parent.required.is_none() && ctx.options.properties_required_by_default {
        return true;
    }
    ctx.options.default_non_nullable
        && property.as_object().is_some_and(SchemaObject::has_default)
        && !is_request_input(path)
}

fn is_request_input(path: &str) -> bool {
    parse_ref(path)
        .pointer
        .iter()
        .any(|segment| REQUEST_INPUT_SEGMENTS.contains(&segment.as_str()))
}

/// JSDoc metadata carried by an inline schema.
pub fn schema_doc(schema: &Schema) -> Option<TsDoc> {
    let object = schema.as_object()?;
    if object.ref_path.is_some() {
        return None;
    }
    let doc = TsDoc {
        title: object.title.clone(),
        description: object.description.clone(),
        deprecated: object.is_deprecated(),
        default: object.default.as_ref().map(Value::to_string),
        format: object.format.clone(),
        example: object.example.as_ref().map(Value::to_string),
    };
    (!doc.is_empty()).then_some(doc)
}
