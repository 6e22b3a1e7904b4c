//! `$ref` parsing and same-document resolution.
//!
//! References resolve to stable pointer keys (`#/components/schemas/Foo`), not
//! live object pointers, so chained references are cycle-checked with a
//! visited set of keys.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResolveError;

/// A `$ref` split into its external part and decoded pointer segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRef {
    /// Document part before `#`; `None` for same-document references.
    pub external: Option<String>,
    /// Decoded segments after the `#`.
    pub pointer: Vec<String>,
}

/// Split a `$ref` into `{external, pointer segments}`.
pub fn parse_ref(reference: &str) -> ParsedRef {
    let (external, fragment) = split_ref(reference);
    let pointer = fragment
        .split('/')
        .skip(1)
        .map(unescape_segment)
        .collect();
    ParsedRef {
        external: (!external.is_empty()).then(|| external.to_string()),
        pointer,
    }
}

/// `(document, fragment)` halves of a `$ref`; the fragment keeps its leading `/`.
fn split_ref(reference: &str) -> (&str, &str) {
    reference.split_once('#').unwrap_or((reference, ""))
}

/// Decode one JSON pointer segment (`~1` → `/`, `~0` → `~`).
fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Encode one JSON pointer segment.
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Build a `#/a/b` reference from raw segments.
pub fn create_ref<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::from("#");
    for segment in segments {
        out.push('/');
        out.push_str(&escape_segment(segment.as_ref()));
    }
    out
}

/// Append one raw segment to an existing pointer.
pub fn join_ref(base: &str, segment: &str) -> String {
    format!("{base}/{}", escape_segment(segment))
}

/// Re-encode a same-document `$ref` so equivalent spellings compare equal.
pub fn canonical_ref(reference: &str) -> Option<String> {
    let parsed = parse_ref(reference);
    if parsed.external.is_some() {
        return None;
    }
    Some(create_ref(&parsed.pointer))
}

/// Resolves same-document references against the raw document tree.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    document: &'a Value,
}

impl<'a> Resolver<'a> {
    /// Resolver over a whole document.
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    /// Find the node a `$ref` points at, following chained refs.
    pub fn resolve_value(&self, reference: &str) -> Result<&'a Value, ResolveError> {
        let mut visited = HashSet::new();
        let mut current = reference.to_string();
        loop {
            let (external, fragment) = split_ref(&current);
            if !external.is_empty() {
                return Err(ResolveError::External(current));
            }
            let key = create_ref(&parse_ref(&current).pointer);
            if !visited.insert(key) {
                return Err(ResolveError::Circular(reference.to_string()));
            }
            let node = self
                .document
                .pointer(fragment)
                .ok_or_else(|| ResolveError::NotFound(current.clone()))?;
            match node.get("$ref").and_then(Value::as_str) {
                Some(next) => current = next.to_string(),
                None => return Ok(node),
            }
        }
    }

    /// Resolve and deserialize the target into `T`.
    pub fn resolve<T: DeserializeOwned>(&self, reference: &str) -> Result<T, ResolveError> {
        let node = self.resolve_value(reference)?;
        T::deserialize(node).map_err(|err| ResolveError::Deserialize {
            reference: reference.to_string(),
            message: err.to_string(),
        })
    }
}
