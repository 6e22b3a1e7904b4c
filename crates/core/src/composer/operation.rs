//! Operations, parameters, request bodies, responses and headers.

use indexmap::IndexMap;

use super::{Composer, object_or_never, text_doc};
use crate::ast::{TsDoc, TsIndex, TsObject, TsType};
use crate::document::{
    Header, MaybeRef, MediaType, Operation, Parameter, ParameterLocation, RequestBody, Response,
};
use crate::error::TransformError;
use crate::resolver::join_ref;
use crate::schema::{transform_ref, transform_schema};

/// A parameter with the facts needed for grouping, plus where its type comes from.
#[derive(Debug, Clone)]
pub(super) struct ResolvedParameter {
    pub(super) param: Parameter,
    /// Set when the parameter was declared through a `$ref`.
    pub(super) reference: Option<String>,
    pub(super) path: String,
}

impl Composer<'_> {
    /// Resolve a parameter list. Dangling refs are reported and dropped.
    pub(super) fn resolve_parameters(
        &mut self,
        list: &[MaybeRef<Parameter>],
        base: &str,
    ) -> Vec<ResolvedParameter> {
        let mut resolved = Vec::with_capacity(list.len());
        for (i, entry) in list.iter().enumerate() {
            let path = join_ref(base, &i.to_string());
            match entry {
                MaybeRef::Item(param) => resolved.push(ResolvedParameter {
                    param: param.clone(),
                    reference: None,
                    path,
                }),
                MaybeRef::Ref(reference) => {
                    if let Some(param) = self.ctx.resolve::<Parameter>(reference, &path) {
                        resolved.push(ResolvedParameter {
                            param,
                            reference: Some(reference.clone()),
                            path,
                        });
                    }
                }
            }
        }
        resolved
    }

    /// `{ query, header, path, cookie }`, always all four.
    pub(super) fn parameter_groups(
        &mut self,
        params: &[ResolvedParameter],
    ) -> Result<TsType, TransformError> {
        let mut groups = Vec::with_capacity(ParameterLocation::ALL.len());
        for location in ParameterLocation::ALL {
            let mut members: Vec<&ResolvedParameter> = params
                .iter()
                .filter(|p| p.param.location == location)
                .filter(|p| !(self.ctx.options.exclude_deprecated && p.param.deprecated))
                .collect();
            if self.ctx.options.alphabetize {
                members.sort_by(|a, b| a.param.name.cmp(&b.param.name));
            }

            let mut props = Vec::with_capacity(members.len());
            for resolved in &members {
                let ty = match &resolved.reference {
                    Some(reference) => transform_ref(reference, &resolved.path, &mut self.ctx)?,
                    None => self.parameter_type(&resolved.param, &resolved.path)?,
                };
                let required = location == ParameterLocation::Path || resolved.param.required;
                let doc = text_doc(None, resolved.param.description.as_ref(), resolved.param.deprecated);
                props.push(
                    self.member(resolved.param.name.clone(), ty)
                        .optional(!required)
                        .doc(doc),
                );
            }

            let optional = props.iter().all(|p| p.optional);
            groups.push(
                self.member(location.as_str(), object_or_never(props))
                    .optional(optional),
            );
        }
        Ok(TsType::object(groups))
    }

    /// Type of the value a parameter carries.
    pub(super) fn parameter_type(&mut self, param: &Parameter, path: &str) -> Result<TsType, TransformError> {
        if let Some(schema) = &param.schema {
            return transform_schema(schema, &join_ref(path, "schema"), &mut self.ctx);
        }
        let content_path = join_ref(path, "content");
        match param.content.first() {
            Some((media, media_type)) => self.media_type(media_type, &join_ref(&content_path, media)),
            None => Ok(TsType::UNKNOWN),
        }
    }

    /// `{ parameters, requestBody, responses }`. Operation-level parameters
    /// replace path-level ones with the same location and name.
    pub(super) fn operation(
        &mut self,
        operation: &Operation,
        shared: &[ResolvedParameter],
        path: &str,
    ) -> Result<TsType, TransformError> {
        let parameters_path = join_ref(path, "parameters");
        let own = self.resolve_parameters(&operation.parameters, &parameters_path);
        let mut merged: Vec<ResolvedParameter> = shared.to_vec();
        for param in own {
            let existing = merged.iter_mut().find(|p| {
                p.param.location == param.param.location && p.param.name == param.param.name
            });
            match existing {
                Some(slot) => *slot = param,
                None => merged.push(param),
            }
        }
        let groups = self.parameter_groups(&merged)?;
        let mut props = vec![self.member("parameters", groups)];

        let body_path = join_ref(path, "requestBody");
        props.push(match &operation.request_body {
            None => self.member("requestBody", TsType::NEVER).optional(true),
            Some(MaybeRef::Ref(reference)) => {
                let required = self
                    .ctx
                    .resolver
                    .resolve::<RequestBody>(reference)
                    .is_ok_and(|body| body.required);
                let ty = transform_ref(reference, &body_path, &mut self.ctx)?;
                self.member("requestBody", ty).optional(!required)
            }
            Some(MaybeRef::Item(body)) => {
                let ty = self.request_body(body, &body_path)?;
                let doc = text_doc(None, body.description.as_ref(), false);
                self.member("requestBody", ty).optional(!body.required).doc(doc)
            }
        });

        let responses_path = join_ref(path, "responses");
        let mut responses = Vec::with_capacity(operation.responses.len());
        for (code, response) in self.ordered(&operation.responses) {
            let response_path = join_ref(&responses_path, code);
            let ty = self.maybe_ref(response, &response_path, |this, r| this.response(r, &response_path))?;
            let doc = match response {
                MaybeRef::Item(r) => text_doc(None, r.description.as_ref(), false),
                MaybeRef::Ref(_) => None,
            };
            responses.push(self.member(code.clone(), ty).doc(doc));
        }
        props.push(self.member("responses", TsType::object(responses)));

        Ok(TsType::object(props))
    }

    /// Move an operation with an `operationId` into the `operations` section and
    /// reference it. The first declaration of an id wins.
    pub(super) fn hoist_operation(
        &mut self,
        operation_id: Option<&str>,
        ty: TsType,
        doc: Option<TsDoc>,
        path: &str,
    ) -> TsType {
        let Some(id) = operation_id else {
            return ty;
        };
        if !self.operation_ids.insert(id.to_string()) {
            self.ctx.warn(path, format!("duplicate operationId `{id}`, keeping the first declaration"));
            return ty;
        }
        let prop = self.member(id, ty).doc(doc);
        self.operations.push(prop);
        TsType::reference(["operations", id])
    }

    /// `{ content: { <media type>: T } }`
    pub(super) fn request_body(&mut self, body: &RequestBody, path: &str) -> Result<TsType, TransformError> {
        let content_path = join_ref(path, "content");
        let content = if body.content.is_empty() {
            TsType::record(TsType::UNKNOWN, self.ctx.options.immutable)
        } else {
            self.content(&body.content, &content_path)?
        };
        Ok(TsType::object(vec![self.member("content", content)]))
    }

    /// `{ headers: { ...; [name: string]: unknown }, content }`
    pub(super) fn response(&mut self, response: &Response, path: &str) -> Result<TsType, TransformError> {
        let headers_path = join_ref(path, "headers");
        let mut headers = TsObject::default();
        for (name, header) in self.ordered(&response.headers) {
            let header_path = join_ref(&headers_path, name);
            let (ty, required, doc) = match header {
                MaybeRef::Ref(reference) => {
                    let required = self
                        .ctx
                        .resolver
                        .resolve::<Header>(reference)
                        .is_ok_and(|h| h.required);
                    (transform_ref(reference, &header_path, &mut self.ctx)?, required, None)
                }
                MaybeRef::Item(header) => {
                    if self.ctx.options.exclude_deprecated && header.deprecated {
                        continue;
                    }
                    let doc = text_doc(None, header.description.as_ref(), header.deprecated);
                    (self.header(header, &header_path)?, header.required, doc)
                }
            };
            headers
                .props
                .push(self.member(name.clone(), ty).optional(!required).doc(doc));
        }
        headers.index.push(TsIndex {
            key_name: "name".to_string(),
            key: TsType::STRING,
            value: TsType::UNKNOWN,
            readonly: self.ctx.options.immutable,
        });

        let mut props = vec![self.member("headers", TsType::Object(headers))];
        if response.content.is_empty() {
            props.push(self.member("content", TsType::NEVER).optional(true));
        } else {
            let content = self.content(&response.content, &join_ref(path, "content"))?;
            props.push(self.member("content", content));
        }
        Ok(TsType::object(props))
    }

    /// Header value type: its schema, else its first media type, else `unknown`.
    pub(super) fn header(&mut self, header: &Header, path: &str) -> Result<TsType, TransformError> {
        if let Some(schema) = &header.schema {
            return transform_schema(schema, &join_ref(path, "schema"), &mut self.ctx);
        }
        match header.content.first() {
            Some((media, media_type)) => {
                self.media_type(media_type, &join_ref(&join_ref(path, "content"), media))
            }
            None => Ok(TsType::UNKNOWN),
        }
    }

    fn content(
        &mut self,
        content: &IndexMap<String, MaybeRef<MediaType>>,
        path: &str,
    ) -> Result<TsType, TransformError> {
        let mut props = Vec::with_capacity(content.len());
        for (media, media_type) in self.ordered(content) {
            let media_path = join_ref(path, media);
            let ty = self.maybe_ref(media_type, &media_path, |this, m| this.media_type(m, &media_path))?;
            props.push(self.member(media.clone(), ty));
        }
        Ok(TsType::object(props))
    }

    fn media_type(&mut self, media_type: &MediaType, path: &str) -> Result<TsType, TransformError> {
        match &media_type.schema {
            Some(schema) => transform_schema(schema, &join_ref(path, "schema"), &mut self.ctx),
            None => Ok(TsType::UNKNOWN),
        }
    }
}
