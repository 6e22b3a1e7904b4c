//! TypeScript code emission via the Emit trait.
//!
//! Rendering is a pure function of the AST: every node carries what it needs,
//! so nothing here looks back at the document.

use crate::TransformOutput;
use crate::ast::{
    TemplatePart, TsDoc, TsEnumMember, TsIndex, TsLiteral, TsObject, TsPrimitive, TsProp, TsType,
    TsTypeDef, TypeDefKind,
};
use crate::utils::{quote, quote_if_needed};

const INDENT: &str = "    ";

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Never => "never".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => quote(s),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        emit_type(self, 0)
    }
}

fn emit_type(ty: &TsType, depth: usize) -> String {
    match ty {
        TsType::Primitive(p) => p.emit(),
        TsType::Literal(lit) => lit.emit(),
        TsType::Ref(segments) => emit_ref(segments),
        TsType::Union(types) => types
            .iter()
            .map(|t| emit_type(t, depth))
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::Intersection(types) => types
            .iter()
            .map(|t| {
                let s = emit_type(t, depth);
                // Unions bind looser than intersections
                if matches!(t, TsType::Union(_)) {
                    format!("({s})")
                } else {
                    s
                }
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TsType::Array { element, readonly } => {
            let prefix = if *readonly { "readonly " } else { "" };
            format!("{prefix}{}[]", emit_element(element, depth))
        }
        TsType::Tuple {
            elements,
            rest,
            readonly,
        } => {
            let mut parts: Vec<String> = elements.iter().map(|t| emit_type(t, depth)).collect();
            if let Some(rest) = rest {
                parts.push(format!("...{}[]", emit_element(rest, depth)));
            }
            let prefix = if *readonly { "readonly " } else { "" };
            format!("{prefix}[{}]", parts.join(", "))
        }
        TsType::Object(object) => emit_object(object, depth),
        TsType::Generic { name, args } => {
            let args = args.iter().map(|t| emit_type(t, depth)).collect::<Vec<_>>();
            format!("{name}<{}>", args.join(", "))
        }
        TsType::Template(parts) => {
            let content: String = parts
                .iter()
                .map(|p| match p {
                    TemplatePart::Static(s) => escape_template(s),
                    TemplatePart::Type(t) => format!("${{{}}}", emit_type(t, depth)),
                })
                .collect();
            format!("`{content}`")
        }
    }
}

/// Array element, parenthesized when `[]` would bind to the wrong operand.
fn emit_element(element: &TsType, depth: usize) -> String {
    let s = emit_type(element, depth);
    let needs_parens = match element {
        TsType::Union(_) | TsType::Intersection(_) => true,
        TsType::Array { readonly, .. } | TsType::Tuple { readonly, .. } => *readonly,
        _ => false,
    };
    if needs_parens { format!("({s})") } else { s }
}

/// `components["schemas"]["Foo"]`, or a bare name for hoisted declarations.
fn emit_ref(segments: &[String]) -> String {
    let Some((head, rest)) = segments.split_first() else {
        return "unknown".to_string();
    };
    let mut out = head.clone();
    for segment in rest {
        out.push('[');
        out.push_str(&quote(segment));
        out.push(']');
    }
    out
}

fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

fn emit_object(object: &TsObject, depth: usize) -> String {
    if object.props.is_empty() && object.index.is_empty() {
        return "Record<string, never>".to_string();
    }
    let mut out = String::from("{\n");
    for prop in &object.props {
        out.push_str(&emit_prop(prop, depth + 1));
    }
    for index in &object.index {
        out.push_str(&emit_index(index, depth + 1));
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
    out
}

fn emit_prop(prop: &TsProp, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    let mut out = String::new();
    if let Some(doc) = &prop.doc {
        out.push_str(&emit_doc(doc, &indent));
    }
    let readonly = if prop.readonly { "readonly " } else { "" };
    let optional = if prop.optional { "?" } else { "" };
    out.push_str(&format!(
        "{indent}{readonly}{}{optional}: {};\n",
        property_key(&prop.name),
        emit_type(&prop.ty, depth)
    ));
    out
}

fn emit_index(index: &TsIndex, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    let readonly = if index.readonly { "readonly " } else { "" };
    format!(
        "{indent}{readonly}[{}: {}]: {};\n",
        index.key_name,
        emit_type(&index.key, depth),
        emit_type(&index.value, depth)
    )
}

/// Property key: identifiers and canonical integers stay bare (`200`), the rest is quoted.
fn property_key(name: &str) -> String {
    let canonical_int = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    if canonical_int {
        name.to_string()
    } else {
        quote_if_needed(name)
    }
}

// =============================================================================
// JSDoc
// =============================================================================

fn emit_doc(doc: &TsDoc, indent: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    if let Some(title) = &doc.title {
        lines.extend(title.lines().map(str::to_string));
    }
    if let Some(description) = &doc.description {
        let mut desc = description.lines();
        if let Some(first) = desc.next() {
            lines.push(format!("@description {first}"));
            lines.extend(desc.map(str::to_string));
        }
    }
    if doc.deprecated {
        lines.push("@deprecated".to_string());
    }
    if let Some(default) = &doc.default {
        lines.push(format!("@default {default}"));
    }
    if let Some(format) = &doc.format {
        lines.push(format!("Format: {format}"));
    }
    if let Some(example) = &doc.example {
        lines.push(format!("@example {example}"));
    }
    let lines: Vec<String> = lines.iter().map(|l| l.trim_end().replace("*/", "*\\/")).collect();

    match lines.as_slice() {
        [] => String::new(),
        [single] => format!("{indent}/** {single} */\n"),
        many => {
            let mut out = format!("{indent}/**\n");
            for line in many {
                if line.is_empty() {
                    out.push_str(&format!("{indent} *\n"));
                } else {
                    out.push_str(&format!("{indent} * {line}\n"));
                }
            }
            out.push_str(&format!("{indent} */\n"));
            out
        }
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = self.doc.as_ref().map(|d| emit_doc(d, "")).unwrap_or_default();
        match &self.kind {
            TypeDefKind::TypeAlias { ty } => {
                output.push_str(&format!("export type {} = {};\n", self.name, ty.emit()));
            }
            TypeDefKind::Enum { members } => {
                output.push_str(&format!("export enum {} {{\n", self.name));
                for member in members {
                    output.push_str(&emit_enum_member(member));
                }
                output.push_str("}\n");
            }
            TypeDefKind::ConstArray { element, values } => {
                let values = values.iter().map(Emit::emit).collect::<Vec<_>>();
                output.push_str(&format!(
                    "export const {}: ReadonlyArray<{}> = [{}];\n",
                    self.name,
                    element.emit(),
                    values.join(", ")
                ));
            }
            TypeDefKind::WithRequiredHelper => {
                output.push_str(&format!(
                    "type {}<T, K extends keyof T> = T & {{ [P in K]-?: T[P] }};\n",
                    self.name
                ));
            }
        }
        output
    }
}

fn emit_enum_member(member: &TsEnumMember) -> String {
    let mut out = String::new();
    if let Some(description) = &member.description {
        let doc = TsDoc {
            description: Some(description.clone()),
            ..TsDoc::default()
        };
        out.push_str(&emit_doc(&doc, INDENT));
    }
    out.push_str(&format!(
        "{INDENT}{} = {},\n",
        quote_if_needed(&member.name),
        member.value.emit()
    ));
    out
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TransformOutput {
    fn emit(&self) -> String {
        let sections = [
            ("paths", &self.paths),
            ("webhooks", &self.webhooks),
            ("components", &self.components),
            ("$defs", &self.defs),
            ("operations", &self.operations),
        ];

        let mut output = String::new();
        for (name, body) in sections {
            if body.props.is_empty() && body.index.is_empty() {
                output.push_str(&format!("export type {name} = Record<string, never>;\n"));
            } else if self.export_type {
                output.push_str(&format!("export type {name} = {};\n", emit_object(body, 0)));
            } else {
                output.push_str(&format!("export interface {name} {}\n", emit_object(body, 0)));
            }
            output.push('\n');
        }

        for def in &self.footer {
            output.push_str(&def.emit());
            output.push('\n');
        }

        output
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ast::WITH_REQUIRED;

    #[test]
    fn test_emit_primitive() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Never.emit(), "never");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Number(1.5).emit(), "1.5");
        assert_eq!(TsLiteral::Int(-3).emit(), "-3");
        assert_eq!(TsLiteral::Bool(false).emit(), "false");
    }

    #[test]
    fn test_emit_ref() {
        let ty = TsType::reference(["components", "schemas", "Pet Store"]);
        assert_eq!(ty.emit(), "components[\"schemas\"][\"Pet Store\"]");
        assert_eq!(TsType::reference(["Status"]).emit(), "Status");
    }

    #[test]
    fn test_emit_union_array() {
        let ty = TsType::array(TsType::nullable(TsType::STRING), false);
        assert_eq!(ty.emit(), "(string | null)[]");
        let ty = TsType::array(TsType::STRING, true);
        assert_eq!(ty.emit(), "readonly string[]");
    }

    #[test]
    fn test_emit_intersection_wraps_union() {
        let ty = TsType::intersection([
            TsType::reference(["A"]),
            TsType::union([TsType::reference(["B"]), TsType::reference(["C"])]),
        ]);
        assert_eq!(ty.emit(), "A & (B | C)");
    }

    #[test]
    fn test_emit_tuple() {
        let ty = TsType::Tuple {
            elements: vec![TsType::STRING, TsType::NUMBER],
            rest: Some(Box::new(TsType::BOOLEAN)),
            readonly: true,
        };
        assert_eq!(ty.emit(), "readonly [string, number, ...boolean[]]");
    }

    #[test]
    fn test_emit_generic() {
        let ty = TsType::with_required(TsType::reference(["A"]), ["id", "name"]);
        assert_eq!(ty.emit(), "WithRequired<A, \"id\" | \"name\">");
    }

    #[test]
    fn test_emit_template() {
        let ty = TsType::Template(vec![
            TemplatePart::Static("/users/".into()),
            TemplatePart::Type(TsType::NUMBER),
        ]);
        assert_eq!(ty.emit(), "`/users/${number}`");
    }

    #[test]
    fn test_emit_object() {
        let ty = TsType::object(vec![
            TsProp::new("id", TsType::NUMBER),
            TsProp::new("display-name", TsType::STRING).optional(true),
            TsProp::new("200", TsType::NEVER).readonly(true),
        ]);
        assert_eq!(
            ty.emit(),
            "{\n    id: number;\n    \"display-name\"?: string;\n    readonly 200: never;\n}"
        );
    }

    #[test]
    fn test_emit_nested_object_indents() {
        let inner = TsType::record(TsType::UNKNOWN, true);
        let ty = TsType::object(vec![TsProp::new("meta", inner)]);
        assert_eq!(
            ty.emit(),
            "{\n    meta: {\n        readonly [key: string]: unknown;\n    };\n}"
        );
    }

    #[test]
    fn test_emit_empty_object() {
        assert_eq!(TsType::object(Vec::new()).emit(), "Record<string, never>");
    }

    #[test]
    fn test_emit_doc() {
        let doc = TsDoc {
            description: Some("The id".into()),
            ..TsDoc::default()
        };
        let ty = TsType::object(vec![TsProp::new("id", TsType::STRING).doc(Some(doc))]);
        assert_eq!(ty.emit(), "{\n    /** @description The id */\n    id: string;\n}");

        let doc = TsDoc {
            title: Some("Pet".into()),
            deprecated: true,
            default: Some("\"cat\"".into()),
            ..TsDoc::default()
        };
        assert_eq!(
            emit_doc(&doc, ""),
            "/**\n * Pet\n * @deprecated\n * @default \"cat\"\n */\n"
        );
    }

    #[test]
    fn test_emit_doc_escapes_comment_end() {
        let doc = TsDoc {
            description: Some("a */ b".into()),
            ..TsDoc::default()
        };
        assert_eq!(emit_doc(&doc, ""), "/** @description a *\\/ b */\n");
    }

    #[test]
    fn test_emit_enum() {
        let def = TsTypeDef {
            name: "Status".into(),
            kind: TypeDefKind::Enum {
                members: vec![
                    TsEnumMember {
                        name: "Active".into(),
                        value: TsLiteral::String("active".into()),
                        description: Some("In use".into()),
                    },
                    TsEnumMember {
                        name: "Value1".into(),
                        value: TsLiteral::Int(1),
                        description: None,
                    },
                ],
            },
            doc: None,
        };
        assert_eq!(
            def.emit(),
            "export enum Status {\n    /** @description In use */\n    Active = \"active\",\n    Value1 = 1,\n}\n"
        );
    }

    #[test]
    fn test_emit_const_array() {
        let def = TsTypeDef {
            name: "StatusValues".into(),
            kind: TypeDefKind::ConstArray {
                element: TsType::union([TsType::string_literal("a"), TsType::string_literal("b")]),
                values: vec![TsLiteral::String("a".into()), TsLiteral::String("b".into())],
            },
            doc: None,
        };
        assert_eq!(
            def.emit(),
            "export const StatusValues: ReadonlyArray<\"a\" | \"b\"> = [\"a\", \"b\"];\n"
        );
    }

    #[test]
    fn test_emit_with_required_helper() {
        let def = TsTypeDef {
            name: WITH_REQUIRED.into(),
            kind: TypeDefKind::WithRequiredHelper,
            doc: None,
        };
        assert_eq!(
            def.emit(),
            "type WithRequired<T, K extends keyof T> = T & { [P in K]-?: T[P] };\n"
        );
    }

    #[test]
    fn test_emit_output_sections() {
        let output = TransformOutput {
            paths: TsObject {
                props: vec![TsProp::new("/health", TsType::UNKNOWN)],
                index: Vec::new(),
            },
            ..TransformOutput::default()
        };
        let text = output.emit();
        assert!(text.starts_with("export interface paths {\n    \"/health\": unknown;\n}\n"));
        assert!(text.contains("export type webhooks = Record<string, never>;"));
        assert!(text.contains("export type $defs = Record<string, never>;"));

        let output = TransformOutput {
            export_type: true,
            ..output
        };
        assert!(output.emit().starts_with("export type paths = {\n"));
    }
}
