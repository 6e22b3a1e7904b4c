//! OpenAPI 3.x schemas to TypeScript types.
//!
//! [`transform_document`] turns a bundled OpenAPI document into a TypeScript
//! type-expression tree per top-level section plus hoisted declarations.
//! [`generate`] renders that tree to source text with the [`Emit`] trait.

pub mod ast;
mod composer;
pub mod composition;
pub mod context;
pub mod discriminators;
pub mod document;
pub mod emit;
pub mod enums;
pub mod error;
pub mod hooks;
pub mod options;
pub mod resolver;
pub mod schema;
pub mod utils;

use serde_json::Value;

pub use ast::{TsObject, TsType, TsTypeDef};
pub use composer::transform_document;
pub use emit::Emit;
pub use error::{ResolveError, TransformError, TransformWarning};
pub use hooks::{HookContext, NoopHooks, TransformHooks, TransformOverride};
pub use options::TransformOptions;

/// Result of transforming one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    /// One member per path (or path template).
    pub paths: TsObject,
    /// One member per webhook name.
    pub webhooks: TsObject,
    /// Always carries the six component kinds.
    pub components: TsObject,
    /// Root-level `$defs`.
    pub defs: TsObject,
    /// Operations hoisted by `operationId`.
    pub operations: TsObject,
    /// Hoisted enums, const arrays and helper aliases, in creation order.
    pub footer: Vec<TsTypeDef>,
    /// Non-fatal problems, also logged unless the `silent` option is set.
    pub warnings: Vec<TransformWarning>,
    /// Render sections as type aliases instead of interfaces.
    pub export_type: bool,
}

/// Transform a document and render it to TypeScript source.
pub fn generate(
    document: &Value,
    options: &TransformOptions,
    hooks: &dyn TransformHooks,
) -> Result<String, TransformError> {
    transform_document(document, options, hooks).map(|output| output.emit())
}
