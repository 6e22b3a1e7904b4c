//! User-supplied override points.
//!
//! Every method has an identity/no-op default, so the transformer calls the
//! hooks unconditionally and [`NoopHooks`] is the "nothing configured" case.

use crate::ast::{TsProp, TsType};
use crate::document::Schema;
use crate::options::TransformOptions;

/// What a hook sees about the current node.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// JSON pointer of the node being transformed.
    pub path: &'a str,
    /// Options of the running transform.
    pub options: &'a TransformOptions,
}

/// Replacement produced by [`TransformHooks::transform`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOverride {
    /// Use this type instead of the derived one.
    Type(TsType),
    /// Use this type, and mark the owning property optional when `optional` is set.
    Property {
        /// Replacement type
        ty: TsType,
        /// Force the owning property optional
        optional: bool,
    },
}

impl TransformOverride {
    /// `(type, force optional)`.
    pub fn into_parts(self) -> (TsType, bool) {
        match self {
            TransformOverride::Type(ty) => (ty, false),
            TransformOverride::Property { ty, optional } => (ty, optional),
        }
    }
}

/// Override points called during a transform.
pub trait TransformHooks {
    /// Called before a schema is transformed. Returning `Some` skips the
    /// built-in derivation for that node.
    fn transform(&self, _schema: &Schema, _ctx: &HookContext<'_>) -> Option<TransformOverride> {
        None
    }

    /// Called with the fully derived type of every schema.
    fn post_transform(&self, ty: TsType, _ctx: &HookContext<'_>) -> TsType {
        ty
    }

    /// Called for every object property after its type and flags are known.
    fn transform_property(&self, prop: TsProp, _schema: &Schema, _ctx: &HookContext<'_>) -> TsProp {
        prop
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl TransformHooks for NoopHooks {}
