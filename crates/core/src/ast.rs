//! TypeScript type-expression AST.
//!
//! This module defines the closed set of type expressions the transformer
//! produces, plus the footer declarations (hoisted enums, const arrays,
//! helper aliases). The tree is self-describing: rendering it never needs
//! another schema lookup.

/// TypeScript type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, unknown, never, undefined
    Primitive(TsPrimitive),
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Reference to a named type by path: `components["schemas"]["Foo"]`, or a
    /// single-segment hoisted name such as `Status`.
    Ref(Vec<String>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Tuple type: [A, B, ...C[]]
    Tuple {
        /// Fixed positions
        elements: Vec<TsType>,
        /// Element type of the trailing `...rest[]`
        rest: Option<Box<TsType>>,
        /// `readonly [..]`
        readonly: bool,
    },
    /// Array type: T[]
    Array {
        /// Element type
        element: Box<TsType>,
        /// `readonly T[]`
        readonly: bool,
    },
    /// Object type: { foo: string; bar?: number; [key: string]: unknown }
    Object(TsObject),
    /// Generic application: Omit<T, "kind">, WithRequired<T, "a" | "b">
    Generic {
        /// Generic name (`Omit`, `Record`, ...)
        name: String,
        /// Type arguments in order
        args: Vec<TsType>,
    },
    /// Template literal type: `/users/${string}`
    Template(Vec<TemplatePart>),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Never,
    Undefined,
}

/// TypeScript literal values. `null` is always [`TsPrimitive::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    /// `"foo"`
    String(String),
    /// Non-integral number: `1.5`
    Number(f64),
    /// Integer: `42`
    Int(i64),
    /// `true` / `false`
    Bool(bool),
}

/// Object type body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsObject {
    /// Named members in output order
    pub props: Vec<TsProp>,
    /// Index signatures, rendered after the members
    pub index: Vec<TsIndex>,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Unquoted member name
    pub name: String,
    /// Member type
    pub ty: TsType,
    /// `name?:`
    pub optional: bool,
    /// `readonly name:`
    pub readonly: bool,
    /// JSDoc rendered above the member
    pub doc: Option<TsDoc>,
}

impl TsProp {
    /// Required, mutable, undocumented member.
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
            doc: None,
        }
    }

    /// Set the `?` marker.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set the `readonly` modifier.
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Attach documentation.
    pub fn doc(mut self, doc: Option<TsDoc>) -> Self {
        self.doc = doc;
        self
    }
}

/// Index signature: `[key_name: key]: value`
#[derive(Debug, Clone, PartialEq)]
pub struct TsIndex {
    /// Binding name inside the brackets
    pub key_name: String,
    /// Key type: `string` or a template literal
    pub key: TsType,
    /// Value type
    pub value: TsType,
    /// `readonly [..]: value`
    pub readonly: bool,
}

/// Template literal part
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text
    Static(String),
    /// `${T}` placeholder
    Type(TsType),
}

/// Documentation carried to JSDoc comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TsDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Default value as JSON text
    pub default: Option<String>,
    pub format: Option<String>,
    /// Example value as JSON text
    pub example: Option<String>,
}

impl TsDoc {
    /// Nothing to render.
    pub fn is_empty(&self) -> bool {
        *self == TsDoc::default()
    }
}

#[allow(missing_docs)]
impl TsType {
    pub const STRING: TsType = TsType::Primitive(TsPrimitive::String);
    pub const NUMBER: TsType = TsType::Primitive(TsPrimitive::Number);
    pub const BOOLEAN: TsType = TsType::Primitive(TsPrimitive::Boolean);
    pub const NULL: TsType = TsType::Primitive(TsPrimitive::Null);
    pub const UNKNOWN: TsType = TsType::Primitive(TsPrimitive::Unknown);
    pub const NEVER: TsType = TsType::Primitive(TsPrimitive::Never);
    pub const UNDEFINED: TsType = TsType::Primitive(TsPrimitive::Undefined);

    /// Build a union. Nested unions are flattened, duplicates and `never`
    /// members are dropped; zero members give `never`, one gives itself.
    pub fn union(types: impl IntoIterator<Item = TsType>) -> TsType {
        let mut members: Vec<TsType> = Vec::new();
        for ty in types {
            match ty {
                TsType::Union(inner) => {
                    for t in inner {
                        push_unique(&mut members, t);
                    }
                }
                other => push_unique(&mut members, other),
            }
        }
        if members.len() > 1 {
            members.retain(|t| *t != TsType::NEVER);
        }
        collapse(members, TsType::Union)
    }

    /// Build an intersection. Nested intersections are flattened and duplicates
    /// dropped; zero members give `never`, one gives itself.
    pub fn intersection(types: impl IntoIterator<Item = TsType>) -> TsType {
        let mut members: Vec<TsType> = Vec::new();
        for ty in types {
            match ty {
                TsType::Intersection(inner) => {
                    for t in inner {
                        push_unique(&mut members, t);
                    }
                }
                other => push_unique(&mut members, other),
            }
        }
        collapse(members, TsType::Intersection)
    }

    /// `T | null`
    pub fn nullable(ty: TsType) -> TsType {
        TsType::union([ty, TsType::NULL])
    }

    /// `"value"`
    pub fn string_literal(value: impl Into<String>) -> TsType {
        TsType::Literal(TsLiteral::String(value.into()))
    }

    /// Named reference from path segments.
    pub fn reference<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> TsType {
        TsType::Ref(segments.into_iter().map(Into::into).collect())
    }

    /// Object type without index signatures.
    pub fn object(props: Vec<TsProp>) -> TsType {
        TsType::Object(TsObject {
            props,
            index: Vec::new(),
        })
    }

    /// `{ [key: string]: value }`
    pub fn record(value: TsType, readonly: bool) -> TsType {
        TsType::Object(TsObject {
            props: Vec::new(),
            index: vec![TsIndex {
                key_name: "key".to_string(),
                key: TsType::STRING,
                value,
                readonly,
            }],
        })
    }

    /// `T[]`, or `readonly T[]`.
    pub fn array(element: TsType, readonly: bool) -> TsType {
        TsType::Array {
            element: Box::new(element),
            readonly,
        }
    }

    /// Fixed-length tuple.
    pub fn tuple(elements: Vec<TsType>, readonly: bool) -> TsType {
        TsType::Tuple {
            elements,
            rest: None,
            readonly,
        }
    }

    /// `Omit<T, "a" | "b">`
    pub fn omit<S: Into<String>>(ty: TsType, keys: impl IntoIterator<Item = S>) -> TsType {
        TsType::Generic {
            name: "Omit".to_string(),
            args: vec![ty, keys_union(keys)],
        }
    }

    /// `WithRequired<T, "a" | "b">`
    pub fn with_required<S: Into<String>>(ty: TsType, keys: impl IntoIterator<Item = S>) -> TsType {
        TsType::Generic {
            name: WITH_REQUIRED.to_string(),
            args: vec![ty, keys_union(keys)],
        }
    }

    /// True for primitives and literals (the "oneOf of primitives" test).
    pub fn is_primitive(&self) -> bool {
        matches!(self, TsType::Primitive(_) | TsType::Literal(_))
    }

    /// Exactly `unknown`.
    pub fn is_unknown(&self) -> bool {
        *self == TsType::UNKNOWN
    }

    /// Object type with no members and no index signatures.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, TsType::Object(o) if o.props.is_empty() && o.index.is_empty())
    }
}

/// Name of the helper alias that marks keys as required.
pub const WITH_REQUIRED: &str = "WithRequired";

fn keys_union<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> TsType {
    TsType::union(keys.into_iter().map(TsType::string_literal))
}

fn push_unique(members: &mut Vec<TsType>, ty: TsType) {
    if !members.contains(&ty) {
        members.push(ty);
    }
}

fn collapse(mut members: Vec<TsType>, wrap: fn(Vec<TsType>) -> TsType) -> TsType {
    match members.len() {
        0 => TsType::NEVER,
        1 => members.pop().unwrap_or(TsType::NEVER),
        _ => wrap(members),
    }
}

// =============================================================================
// Footer declarations
// =============================================================================

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// type Foo = ...
    TypeAlias {
        /// Aliased type
        ty: TsType,
    },
    /// enum Foo { A = "a", B = "b" }
    Enum {
        /// Members in declaration order
        members: Vec<TsEnumMember>,
    },
    /// const FooValues: ReadonlyArray<element> = [...]
    ConstArray {
        /// Element type of the `ReadonlyArray`
        element: TsType,
        /// Array contents in order
        values: Vec<TsLiteral>,
    },
    /// type WithRequired<T, K extends keyof T> = T & { [P in K]-?: T[P] };
    WithRequiredHelper,
}

/// Enum member
#[derive(Debug, Clone, PartialEq)]
pub struct TsEnumMember {
    /// Member identifier
    pub name: String,
    /// Initializer
    pub value: TsLiteral,
    /// Rendered as a JSDoc line above the member
    pub description: Option<String>,
}

/// Hoisted declaration emitted after the document sections.
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Declared name
    pub name: String,
    /// What is declared
    pub kind: TypeDefKind,
    /// JSDoc above the declaration
    pub doc: Option<TsDoc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_union_collapses() {
        assert_eq!(TsType::union([]), TsType::NEVER);
        assert_eq!(TsType::union([TsType::STRING]), TsType::STRING);
        assert_eq!(
            TsType::union([TsType::STRING, TsType::STRING]),
            TsType::STRING
        );
    }

    #[test]
    fn test_intersection_collapses() {
        assert_eq!(TsType::intersection([]), TsType::NEVER);
        let obj = TsType::object(vec![TsProp::new("a", TsType::STRING)]);
        assert_eq!(TsType::intersection([obj.clone()]), obj);
    }

    #[test]
    fn test_union_flattens_and_dedupes() {
        let inner = TsType::union([TsType::STRING, TsType::NUMBER]);
        let outer = TsType::union([inner, TsType::NUMBER, TsType::NULL]);
        assert_eq!(
            outer,
            TsType::Union(vec![TsType::STRING, TsType::NUMBER, TsType::NULL])
        );
    }

    #[test]
    fn test_union_drops_never() {
        assert_eq!(
            TsType::union([TsType::NEVER, TsType::BOOLEAN]),
            TsType::BOOLEAN
        );
        assert_eq!(TsType::union([TsType::NEVER, TsType::NEVER]), TsType::NEVER);
    }

    #[test]
    fn test_nullable() {
        assert_eq!(
            TsType::nullable(TsType::STRING),
            TsType::Union(vec![TsType::STRING, TsType::NULL])
        );
        assert_eq!(TsType::nullable(TsType::NULL), TsType::NULL);
    }

    #[test]
    fn test_omit_shape() {
        let ty = TsType::omit(TsType::reference(["Base"]), ["kind"]);
        assert_eq!(
            ty,
            TsType::Generic {
                name: "Omit".to_string(),
                args: vec![TsType::Ref(vec!["Base".to_string()]), TsType::string_literal("kind")],
            }
        );
    }

    #[test]
    fn test_is_primitive() {
        assert!(TsType::STRING.is_primitive());
        assert!(TsType::string_literal("a").is_primitive());
        assert!(!TsType::reference(["A"]).is_primitive());
        assert!(!TsType::object(Vec::new()).is_primitive());
    }
}
