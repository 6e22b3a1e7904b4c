//! The `components` section and `rootTypes` aliases.

use indexmap::IndexMap;

use super::{Composer, object_or_never, text_doc};
use crate::ast::{TsObject, TsType, TsTypeDef, TypeDefKind};
use crate::document::{Components, MaybeRef};
use crate::error::TransformError;
use crate::resolver::join_ref;
use crate::schema::{schema_doc, transform_schema};
use crate::utils::pascal_case;

/// Component kinds in emission order, with their `rootTypes` alias prefix.
const COMPONENT_KINDS: [(&str, &str); 6] = [
    ("schemas", "Schema"),
    ("responses", "Response"),
    ("parameters", "Parameter"),
    ("requestBodies", "RequestBody"),
    ("headers", "Header"),
    ("pathItems", "PathItem"),
];

impl Composer<'_> {
    /// All six component kinds, `never` for the empty ones.
    pub(super) fn components_section(&mut self, components: &Components) -> Result<TsObject, TransformError> {
        let mut schemas = Vec::with_capacity(components.schemas.len());
        for (name, schema) in self.ordered(&components.schemas) {
            let ty = transform_schema(schema, &join_ref("#/components/schemas", name), &mut self.ctx)?;
            schemas.push(self.member(name.clone(), ty).doc(schema_doc(schema)));
        }

        let mut responses = Vec::with_capacity(components.responses.len());
        for (name, response) in self.ordered(&components.responses) {
            let path = join_ref("#/components/responses", name);
            let ty = self.maybe_ref(response, &path, |this, r| this.response(r, &path))?;
            let doc = match response {
                MaybeRef::Item(r) => text_doc(None, r.description.as_ref(), false),
                MaybeRef::Ref(_) => None,
            };
            responses.push(self.member(name.clone(), ty).doc(doc));
        }

        let mut parameters = Vec::with_capacity(components.parameters.len());
        for (name, parameter) in self.ordered(&components.parameters) {
            let path = join_ref("#/components/parameters", name);
            let ty = self.maybe_ref(parameter, &path, |this, p| this.parameter_type(p, &path))?;
            let doc = match parameter {
                MaybeRef::Item(p) => text_doc(None, p.description.as_ref(), p.deprecated),
                MaybeRef::Ref(_) => None,
            };
            parameters.push(self.member(name.clone(), ty).doc(doc));
        }

        let mut request_bodies = Vec::with_capacity(components.request_bodies.len());
        for (name, body) in self.ordered(&components.request_bodies) {
            let path = join_ref("#/components/requestBodies", name);
            let ty = self.maybe_ref(body, &path, |this, b| this.request_body(b, &path))?;
            request_bodies.push(self.member(name.clone(), ty));
        }

        let mut headers = Vec::with_capacity(components.headers.len());
        for (name, header) in self.ordered(&components.headers) {
            let path = join_ref("#/components/headers", name);
            let ty = self.maybe_ref(header, &path, |this, h| this.header(h, &path))?;
            headers.push(self.member(name.clone(), ty));
        }

        let mut path_items = Vec::with_capacity(components.path_items.len());
        for (name, item) in self.ordered(&components.path_items) {
            let path = join_ref("#/components/pathItems", name);
            let ty = self.maybe_ref(item, &path, |this, i| this.path_item(i, &path))?;
            path_items.push(self.member(name.clone(), ty));
        }

        let sections = [schemas, responses, parameters, request_bodies, headers, path_items];
        let props = COMPONENT_KINDS
            .into_iter()
            .zip(sections)
            .map(|((kind, _), members)| self.member(kind, object_or_never(members)))
            .collect();
        Ok(TsObject {
            props,
            index: Vec::new(),
        })
    }

    /// `SchemaFoo = components["schemas"]["Foo"]` for every component.
    pub(super) fn root_types(&mut self, components: &Components) {
        let names: [Vec<&String>; 6] = [
            keys(&components.schemas),
            keys(&components.responses),
            keys(&components.parameters),
            keys(&components.request_bodies),
            keys(&components.headers),
            keys(&components.path_items),
        ];
        for ((kind, prefix), names) in COMPONENT_KINDS.into_iter().zip(names) {
            for name in names {
                self.ctx.push_footer(TsTypeDef {
                    name: format!("{prefix}{}", pascal_case(name)),
                    kind: TypeDefKind::TypeAlias {
                        ty: TsType::reference(["components", kind, name.as_str()]),
                    },
                    doc: None,
                });
            }
        }
    }
}

fn keys<T>(map: &IndexMap<String, T>) -> Vec<&String> {
    map.keys().collect()
}
