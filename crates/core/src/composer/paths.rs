//! Path items and the `paths` / `webhooks` sections.

use indexmap::IndexMap;

use super::{Composer, text_doc};
use crate::ast::{TemplatePart, TsIndex, TsObject, TsType};
use crate::document::{HTTP_METHODS, MaybeRef, Parameter, ParameterLocation, PathItem, Schema};
use crate::error::TransformError;
use crate::resolver::join_ref;
use crate::schema::transform_ref;

impl Composer<'_> {
    /// One member per path (or webhook). Templated paths become template-literal
    /// index signatures under `pathParamsAsTypes`.
    pub(super) fn paths_section(
        &mut self,
        items: &IndexMap<String, MaybeRef<PathItem>>,
        base: &str,
        templated_keys: bool,
    ) -> Result<TsObject, TransformError> {
        let mut object = TsObject::default();
        for (url, item) in self.ordered(items) {
            let item_path = join_ref(base, url);
            let ty = self.maybe_ref(item, &item_path, |this, item| this.path_item(item, &item_path))?;

            if templated_keys && self.ctx.options.path_params_as_types && url.contains('{') {
                let params = self.path_parameters(item);
                object.index.push(TsIndex {
                    key_name: "path".to_string(),
                    key: path_template(url, &params),
                    value: ty,
                    readonly: self.ctx.options.immutable,
                });
                continue;
            }

            let doc = match item {
                MaybeRef::Item(item) => text_doc(item.summary.as_ref(), item.description.as_ref(), false),
                MaybeRef::Ref(_) => None,
            };
            object.props.push(self.member(url.clone(), ty).doc(doc));
        }
        Ok(object)
    }

    /// `{ parameters, get, put, ... }` with every method present.
    pub(super) fn path_item(&mut self, item: &PathItem, path: &str) -> Result<TsType, TransformError> {
        let parameters_path = join_ref(path, "parameters");
        let shared = self.resolve_parameters(&item.parameters, &parameters_path);
        let groups = self.parameter_groups(&shared)?;
        let mut props = vec![self.member("parameters", groups)];

        for method in HTTP_METHODS {
            let method_path = join_ref(path, method);
            let prop = match item.operation(method) {
                None => self.member(method, TsType::NEVER).optional(true),
                Some(MaybeRef::Ref(reference)) => {
                    let ty = transform_ref(reference, &method_path, &mut self.ctx)?;
                    self.member(method, ty)
                }
                Some(MaybeRef::Item(operation)) => {
                    if self.ctx.options.exclude_deprecated && operation.deprecated {
                        self.member(method, TsType::NEVER).optional(true)
                    } else {
                        let ty = self.operation(operation, &shared, &method_path)?;
                        let doc = text_doc(
                            operation.summary.as_ref(),
                            operation.description.as_ref(),
                            operation.deprecated,
                        );
                        let ty = self.hoist_operation(operation.operation_id.as_deref(), ty, doc.clone(), &method_path);
                        self.member(method, ty).doc(doc)
                    }
                }
            };
            props.push(prop);
        }

        Ok(TsType::object(props))
    }

    /// Path parameters declared anywhere on a path item, for template keys.
    /// Unresolvable refs were already reported while transforming the item.
    fn path_parameters(&self, item: &MaybeRef<PathItem>) -> Vec<Parameter> {
        let resolver = self.ctx.resolver;
        let item = match item {
            MaybeRef::Item(item) => item.clone(),
            MaybeRef::Ref(reference) => match resolver.resolve::<PathItem>(reference) {
                Ok(item) => item,
                Err(_) => return Vec::new(),
            },
        };
        let declared = |list: &[MaybeRef<Parameter>]| -> Vec<Parameter> {
            list.iter()
                .filter_map(|param| match param {
                    MaybeRef::Item(param) => Some(param.clone()),
                    MaybeRef::Ref(reference) => resolver.resolve(reference).ok(),
                })
                .collect()
        };
        let mut params = declared(&item.parameters);
        for method in HTTP_METHODS {
            if let Some(MaybeRef::Item(operation)) = item.operation(method) {
                params.extend(declared(&operation.parameters));
            }
        }
        params.retain(|param| param.location == ParameterLocation::Path);
        params
    }
}

/// `/users/{id}` → `` `/users/${number}` `` using each path parameter's schema type.
fn path_template(url: &str, params: &[Parameter]) -> TsType {
    let mut parts = Vec::new();
    let mut rest = url;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            parts.push(TemplatePart::Static(rest[..open].to_string()));
        }
        let name = &rest[open + 1..close];
        let ty = params
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.schema.as_ref())
            .and_then(Schema::as_object)
            .map_or(TsType::STRING, |schema| {
                if schema.has_type("integer") || schema.has_type("number") {
                    TsType::NUMBER
                } else if schema.has_type("boolean") {
                    TsType::BOOLEAN
                } else {
                    TsType::STRING
                }
            });
        parts.push(TemplatePart::Type(ty));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Static(rest.to_string()));
    }
    TsType::Template(parts)
}
