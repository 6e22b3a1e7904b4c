//! `allOf` / `anyOf` / `oneOf` algebra.
//!
//! [`combine`] folds a node's core shape with its composition keywords in a
//! fixed order: core & allOf, then | anyOf, then oneOf (plain union when every
//! branch is primitive, intersection-with-union otherwise), then the empty
//! fallback and finally `| null`.

use crate::ast::TsType;
use crate::context::TransformContext;
use crate::document::{Schema, SchemaObject};
use crate::error::TransformError;
use crate::resolver::join_ref;
use crate::schema::transform_schema;

/// Fold `core` (the node's own shape, if any) with its composition keywords.
pub fn combine(
    object: &SchemaObject,
    path: &str,
    core: Option<TsType>,
    ctx: &mut TransformContext<'_>,
) -> Result<TsType, TransformError> {
    let mut final_type = core;

    if let Some(all_of) = &object.all_of {
        let parent_required = object.required.as_deref().unwrap_or_default();
        let items = collect_all_of(all_of, parent_required, &join_ref(path, "allOf"), ctx)?;
        if !items.is_empty() {
            final_type = Some(TsType::intersection(final_type.into_iter().chain(items)));
        }
    }

    if let Some(any_of) = &object.any_of {
        let items = collect_union(any_of, &join_ref(path, "anyOf"), ctx)?;
        if !items.is_empty() {
            final_type = Some(TsType::union(final_type.into_iter().chain(items)));
        }
    }

    let one_of_items = match &object.one_of {
        Some(one_of) => Some(collect_union(one_of, &join_ref(path, "oneOf"), ctx)?),
        None => match legacy_enum_variants(object, path)? {
            Some(variants) => Some(collect_union(&variants, &join_ref(path, "enum"), ctx)?),
            None => None,
        },
    };
    if let Some(items) = one_of_items.filter(|items| !items.is_empty()) {
        final_type = Some(if items.iter().all(TsType::is_primitive) {
            TsType::union(final_type.into_iter().chain(items))
        } else {
            TsType::intersection(final_type.into_iter().chain([TsType::union(items)]))
        });
    }

    let ty = final_type.unwrap_or_else(|| empty_fallback(object, ctx));

    if object.is_nullable() && !object.has_default() && !ty.is_unknown() {
        Ok(TsType::nullable(ty))
    } else {
        Ok(ty)
    }
}

fn empty_fallback(object: &SchemaObject, ctx: &TransformContext<'_>) -> TsType {
    if object.schema_type.is_none() {
        return TsType::UNKNOWN;
    }
    let value = if ctx.options.empty_objects_unknown {
        TsType::UNKNOWN
    } else {
        TsType::NEVER
    };
    TsType::record(value, ctx.options.immutable)
}

/// Sub-schemas listed in the `enum` of an object-typed schema, treated as `oneOf`.
fn legacy_enum_variants(object: &SchemaObject, path: &str) -> Result<Option<Vec<Schema>>, TransformError> {
    let Some(values) = &object.enum_values else {
        return Ok(None);
    };
    if !object.has_type("object") || values.is_empty() {
        return Ok(None);
    }
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value::<Schema>(value.clone()).map_err(|err| {
                TransformError::invalid_schema(
                    &join_ref(&join_ref(path, "enum"), &i.to_string()),
                    format!("expected Schema Object: {err}"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// `allOf` members. Refs get `WithRequired` for parent-required keys they leave
/// optional; inline members inherit the parent's `required`. Members carrying a
/// discriminator omit the discriminant, which the composing node injects.
pub fn collect_all_of(
    items: &[Schema],
    parent_required: &[String],
    base: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<Vec<TsType>, TransformError> {
    let mut output = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = join_ref(base, &i.to_string());

        let (ty, discriminator) = match item {
            Schema::Object(inline) if inline.ref_path.is_none() => {
                let mut merged = inline.as_ref().clone();
                if !parent_required.is_empty() {
                    let mut required = parent_required.to_vec();
                    for key in merged.required.iter().flatten() {
                        if !required.contains(key) {
                            required.push(key.clone());
                        }
                    }
                    merged.required = Some(required);
                }
                let discriminator = merged.discriminator.as_ref().map(|d| d.property_name.clone());
                (transform_schema(&Schema::from(merged), &item_path, ctx)?, discriminator)
            }
            Schema::Object(referenced) => {
                let reference = referenced.ref_path.as_deref().unwrap_or_default();
                let mut ty = transform_schema(item, &item_path, ctx)?;
                let keys = missing_required(reference, parent_required, ctx);
                if !keys.is_empty() {
                    ctx.ensure_with_required_helper();
                    ty = TsType::with_required(ty, keys);
                }
                let discriminator = ctx
                    .discriminators
                    .get(reference)
                    .map(|d| d.property_name.clone());
                (ty, discriminator)
            }
            Schema::Bool(_) => (transform_schema(item, &item_path, ctx)?, None),
        };

        output.push(match discriminator {
            Some(property) => TsType::omit(ty, [property]),
            None => ty,
        });
    }
    Ok(output)
}

/// Parent-required keys that the referenced schema declares but leaves optional.
fn missing_required(reference: &str, parent_required: &[String], ctx: &TransformContext<'_>) -> Vec<String> {
    if parent_required.is_empty() || ctx.discriminators.is_handled(reference) {
        return Vec::new();
    }
    let Some(target) = ctx.peek_schema(reference) else {
        return Vec::new();
    };
    let Some(properties) = target.as_object().and_then(|o| o.properties.as_ref()) else {
        return Vec::new();
    };
    parent_required
        .iter()
        .filter(|key| properties.contains_key(*key))
        .filter(|key| !target.as_object().is_some_and(|o| o.is_required(key)))
        .cloned()
        .collect()
}

/// `anyOf` / `oneOf` members: independent alternatives, transformed as-is.
pub fn collect_union(
    items: &[Schema],
    base: &str,
    ctx: &mut TransformContext<'_>,
) -> Result<Vec<TsType>, TransformError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| transform_schema(item, &join_ref(base, &i.to_string()), ctx))
        .collect()
}
