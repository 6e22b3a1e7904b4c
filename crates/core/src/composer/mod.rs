//! Document-level assembly.
//!
//! The composer walks `paths`, `webhooks`, `components` and `$defs` in that
//! order, calls the schema transformer at every schema-bearing node and
//! collects operations with an `operationId` into their own section.

mod components;
mod operation;
mod paths;

use std::collections::HashSet;
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::ast::{TsDoc, TsObject, TsProp, TsType};
use crate::context::TransformContext;
use crate::document::{MaybeRef, OpenApiDocument, Schema};
use crate::error::TransformError;
use crate::hooks::TransformHooks;
use crate::options::TransformOptions;
use crate::resolver::join_ref;
use crate::schema::{schema_doc, transform_ref, transform_schema};
use crate::TransformOutput;

/// Transform a whole bundled OpenAPI document.
pub fn transform_document(
    document: &Value,
    options: &TransformOptions,
    hooks: &dyn TransformHooks,
) -> Result<TransformOutput, TransformError> {
    let start = Instant::now();
    let typed = OpenApiDocument::from_value(document)?;
    let mut composer = Composer::new(TransformContext::new(document, options, hooks));

    let paths = composer.paths_section(&typed.paths, "#/paths", true)?;
    debug!(section = "paths", count = typed.paths.len(), "Section transformed.");
    let webhooks = composer.paths_section(&typed.webhooks, "#/webhooks", false)?;
    debug!(section = "webhooks", count = typed.webhooks.len(), "Section transformed.");
    let components = composer.components_section(&typed.components)?;
    debug!(section = "components", "Section transformed.");
    let defs = composer.defs_section(&typed.defs)?;
    if options.root_types {
        composer.root_types(&typed.components);
    }

    let Composer {
        ctx, operations, ..
    } = composer;
    let enums = ctx.enums.len();
    let (footer, warnings) = ctx.into_parts();

    info!(
        operations = operations.len(),
        enums,
        declarations = footer.len(),
        warnings = warnings.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Transformed OpenAPI document."
    );

    Ok(TransformOutput {
        paths,
        webhooks,
        components,
        defs,
        operations: TsObject {
            props: operations,
            index: Vec::new(),
        },
        footer,
        warnings,
        export_type: options.export_type,
    })
}

/// Walks the document sections with one shared context.
struct Composer<'a> {
    ctx: TransformContext<'a>,
    operations: Vec<TsProp>,
    operation_ids: HashSet<String>,
}

impl<'a> Composer<'a> {
    fn new(ctx: TransformContext<'a>) -> Self {
        Self {
            ctx,
            operations: Vec::new(),
            operation_ids: HashSet::new(),
        }
    }

    /// Member with the document-wide readonly flag applied.
    fn member(&self, name: impl Into<String>, ty: TsType) -> TsProp {
        TsProp::new(name, ty).readonly(self.ctx.options.immutable)
    }

    /// Map entries in document order, or sorted when `alphabetize` is set.
    fn ordered<'m, T>(&self, map: &'m IndexMap<String, T>) -> Vec<(&'m String, &'m T)> {
        let mut entries: Vec<_> = map.iter().collect();
        if self.ctx.options.alphabetize {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        entries
    }

    /// `$ref` → reference type, inline → `transform`.
    fn maybe_ref<T>(
        &mut self,
        value: &MaybeRef<T>,
        path: &str,
        transform: impl FnOnce(&mut Self, &T) -> Result<TsType, TransformError>,
    ) -> Result<TsType, TransformError> {
        match value {
            MaybeRef::Ref(reference) => transform_ref(reference, path, &mut self.ctx),
            MaybeRef::Item(item) => transform(self, item),
        }
    }

    fn defs_section(&mut self, defs: &IndexMap<String, Schema>) -> Result<TsObject, TransformError> {
        let mut props = Vec::with_capacity(defs.len());
        for (name, schema) in self.ordered(defs) {
            let ty = transform_schema(schema, &join_ref("#/$defs", name), &mut self.ctx)?;
            props.push(self.member(name.clone(), ty).doc(schema_doc(schema)));
        }
        Ok(TsObject {
            props,
            index: Vec::new(),
        })
    }
}

/// Object type, or `never` when there are no members.
fn object_or_never(props: Vec<TsProp>) -> TsType {
    if props.is_empty() {
        TsType::NEVER
    } else {
        TsType::object(props)
    }
}

fn text_doc(summary: Option<&String>, description: Option<&String>, deprecated: bool) -> Option<TsDoc> {
    let doc = TsDoc {
        title: summary.cloned(),
        description: description.cloned(),
        deprecated,
        ..TsDoc::default()
    };
    (!doc.is_empty()).then_some(doc)
}
