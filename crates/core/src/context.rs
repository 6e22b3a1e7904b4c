//! Per-document transform state.
//!
//! A [`TransformContext`] is created by the top-level transform call, threaded
//! by `&mut` through every recursive step and consumed at the end. It owns the
//! only mutable side channels the transformer writes to: hoisted footer
//! declarations, the enum registry, discriminator "handled" marks and warnings.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ast::{TsTypeDef, TypeDefKind, WITH_REQUIRED};
use crate::discriminators::DiscriminatorMap;
use crate::document::Schema;
use crate::enums::EnumRegistry;
use crate::error::TransformWarning;
use crate::hooks::{HookContext, TransformHooks};
use crate::options::TransformOptions;
use crate::resolver::Resolver;

/// State shared by every step of one document transform.
pub struct TransformContext<'a> {
    /// Options of the running transform.
    pub options: &'a TransformOptions,
    /// User overrides, [`NoopHooks`](crate::hooks::NoopHooks) when none are set.
    pub hooks: &'a dyn TransformHooks,
    /// Same-document `$ref` lookups.
    pub resolver: Resolver<'a>,
    /// Discriminators found by the pre-scan.
    pub discriminators: DiscriminatorMap,
    /// Hoisted enum names by member list.
    pub enums: EnumRegistry,
    footer: Vec<TsTypeDef>,
    warnings: Vec<TransformWarning>,
    with_required_declared: bool,
}

impl fmt::Debug for TransformContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext")
            .field("options", self.options)
            .field("discriminators", &self.discriminators.len())
            .field("footer", &self.footer.len())
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}

impl<'a> TransformContext<'a> {
    /// Fresh state for `document`, running the discriminator scan up front.
    pub fn new(
        document: &'a Value,
        options: &'a TransformOptions,
        hooks: &'a dyn TransformHooks,
    ) -> Self {
        Self {
            options,
            hooks,
            resolver: Resolver::new(document),
            discriminators: DiscriminatorMap::scan(document),
            enums: EnumRegistry::default(),
            footer: Vec::new(),
            warnings: Vec::new(),
            with_required_declared: false,
        }
    }

    /// View handed to hooks for the node at `path`.
    pub fn hook_context<'p>(&self, path: &'p str) -> HookContext<'p>
    where
        'a: 'p,
    {
        HookContext {
            path,
            options: self.options,
        }
    }

    /// Record a non-fatal problem. Logged unless `silent` is set.
    pub fn warn(&mut self, path: &str, message: impl Into<String>) {
        let message = message.into();
        if !self.options.silent {
            warn!(path = %path, "{message}");
        }
        self.warnings.push(TransformWarning {
            path: path.to_string(),
            message,
        });
    }

    /// Resolve and deserialize a `$ref`, degrading to `None` with a warning.
    pub fn resolve<T: DeserializeOwned>(&mut self, reference: &str, at: &str) -> Option<T> {
        match self.resolver.resolve(reference) {
            Ok(value) => Some(value),
            Err(err) => {
                self.warn(at, err.to_string());
                None
            }
        }
    }

    /// Resolve a schema `$ref` without recording anything on failure.
    pub fn peek_schema(&self, reference: &str) -> Option<Schema> {
        self.resolver.resolve(reference).ok()
    }

    /// Append a hoisted declaration.
    pub fn push_footer(&mut self, def: TsTypeDef) {
        debug!(name = %def.name, "Hoisting declaration.");
        self.footer.push(def);
    }

    /// Declare the `WithRequired` helper once per document.
    pub fn ensure_with_required_helper(&mut self) {
        if self.with_required_declared {
            return;
        }
        self.with_required_declared = true;
        self.push_footer(TsTypeDef {
            name: WITH_REQUIRED.to_string(),
            kind: TypeDefKind::WithRequiredHelper,
            doc: None,
        });
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[TransformWarning] {
        &self.warnings
    }

    /// `(footer, warnings)`, in creation order.
    pub fn into_parts(self) -> (Vec<TsTypeDef>, Vec<TransformWarning>) {
        (self.footer, self.warnings)
    }
}
