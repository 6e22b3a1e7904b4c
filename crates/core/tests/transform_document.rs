//! End-to-end tests: whole documents through `transform_document` and the emitter.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use oapi_ts_core::ast::{TemplatePart, TsProp, TypeDefKind};
use oapi_ts_core::{
    Emit, NoopHooks, TransformError, TransformOptions, TransformOutput, TsObject, TsType,
    generate, transform_document,
};
use serde_json::{Value, json};

fn petstore() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": { "title": "Pets", "version": "1" },
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "parameters": [
                        { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "All pets",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Pet" }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
                        }
                    },
                    "responses": { "201": { "description": "Created" } }
                }
            },
            "/pets/{petId}": {
                "parameters": [
                    { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }
                ],
                "get": {
                    "operationId": "getPet",
                    "responses": {
                        "200": {
                            "description": "A pet",
                            "headers": {
                                "X-Rate-Limit": { "required": true, "schema": { "type": "integer" } }
                            },
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string", "description": "Display name" }
                    }
                }
            }
        }
    })
}

fn run(doc: &Value, options: &TransformOptions) -> TransformOutput {
    transform_document(doc, options, &NoopHooks).unwrap()
}

fn prop<'a>(object: &'a TsObject, name: &str) -> &'a TsProp {
    object
        .props
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("missing member `{name}`"))
}

fn member<'a>(ty: &'a TsType, name: &str) -> &'a TsProp {
    match ty {
        TsType::Object(object) => prop(object, name),
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn test_petstore_sections() {
    let output = run(&petstore(), &TransformOptions::default());

    let pets = prop(&output.paths, "/pets");
    assert_eq!(
        member(&pets.ty, "get").ty,
        TsType::reference(["operations", "listPets"])
    );
    let post = member(&pets.ty, "post");
    assert!(matches!(post.ty, TsType::Object(_)));
    assert!(!member(&post.ty, "requestBody").optional);

    let delete = member(&pets.ty, "delete");
    assert!(delete.optional);
    assert_eq!(delete.ty, TsType::NEVER);

    assert_eq!(output.operations.props.len(), 2);
    assert!(output.warnings.is_empty());
    assert!(output.webhooks.props.is_empty());
}

#[test]
fn test_components_always_has_six_kinds() {
    let output = run(&json!({ "openapi": "3.1.0" }), &TransformOptions::default());
    let kinds: Vec<&str> = output.components.props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        kinds,
        ["schemas", "responses", "parameters", "requestBodies", "headers", "pathItems"]
    );
    assert!(output.components.props.iter().all(|p| p.ty == TsType::NEVER));
}

#[test]
fn test_path_level_parameters_are_shared() {
    let output = run(&petstore(), &TransformOptions::default());
    let get_pet = prop(&output.operations, "getPet");
    let parameters = member(&get_pet.ty, "parameters");

    let path = member(&parameters.ty, "path");
    assert!(!path.optional);
    let pet_id = member(&path.ty, "petId");
    assert_eq!(pet_id.ty, TsType::NUMBER);
    assert!(!pet_id.optional);

    let query = member(&parameters.ty, "query");
    assert!(query.optional);
    assert_eq!(query.ty, TsType::NEVER);
}

#[test]
fn test_optional_query_group() {
    let output = run(&petstore(), &TransformOptions::default());
    let list = prop(&output.operations, "listPets");
    let query = member(&member(&list.ty, "parameters").ty, "query");
    assert!(query.optional);
    assert!(member(&query.ty, "limit").optional);
}

#[test]
fn test_operation_parameter_overrides_path_level() {
    let doc = json!({
        "paths": {
            "/items/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                ],
                "get": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                    ],
                    "responses": {}
                }
            }
        }
    });
    let output = run(&doc, &TransformOptions::default());
    let item = prop(&output.paths, "/items/{id}");
    let get = member(&item.ty, "get");
    let path = member(&member(&get.ty, "parameters").ty, "path");
    assert_eq!(member(&path.ty, "id").ty, TsType::NUMBER);
}

#[test]
fn test_duplicate_operation_id_warns() {
    let doc = json!({
        "paths": {
            "/a": { "get": { "operationId": "same", "responses": {} } },
            "/b": { "get": { "operationId": "same", "responses": {} } }
        }
    });
    let options = TransformOptions {
        silent: true,
        ..TransformOptions::default()
    };
    let output = run(&doc, &options);

    assert_eq!(output.operations.props.len(), 1);
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].message.contains("duplicate operationId"));
    assert_eq!(output.warnings[0].path, "#/paths/~1b/get");

    let b = prop(&output.paths, "/b");
    assert!(matches!(member(&b.ty, "get").ty, TsType::Object(_)));
}

#[test]
fn test_path_params_as_types() {
    let options = TransformOptions {
        path_params_as_types: true,
        ..TransformOptions::default()
    };
    let output = run(&petstore(), &options);

    assert!(output.paths.props.iter().any(|p| p.name == "/pets"));
    assert_eq!(output.paths.index.len(), 1);
    assert_eq!(
        output.paths.index[0].key,
        TsType::Template(vec![
            TemplatePart::Static("/pets/".into()),
            TemplatePart::Type(TsType::NUMBER),
        ])
    );
    assert!(output.emit().contains("[path: `/pets/${number}`]: {"));
}

#[test]
fn test_root_types() {
    let options = TransformOptions {
        root_types: true,
        ..TransformOptions::default()
    };
    let output = run(&petstore(), &options);
    let alias = output.footer.iter().find(|d| d.name == "SchemaPet").unwrap();
    assert_eq!(
        alias.kind,
        TypeDefKind::TypeAlias {
            ty: TsType::reference(["components", "schemas", "Pet"])
        }
    );
    assert!(output.emit().contains("export type SchemaPet = components[\"schemas\"][\"Pet\"];"));
}

#[test]
fn test_webhooks() {
    let doc = json!({
        "webhooks": {
            "newPet": {
                "post": {
                    "requestBody": {
                        "content": {
                            "application/json": { "schema": { "type": "object" } }
                        }
                    },
                    "responses": { "200": { "description": "ok" } }
                }
            }
        }
    });
    let output = run(&doc, &TransformOptions::default());
    let hook = prop(&output.webhooks, "newPet");
    let post = member(&hook.ty, "post");
    assert!(member(&post.ty, "requestBody").optional);
}

#[test]
fn test_dangling_ref_degrades_to_unknown() {
    let doc = json!({
        "components": {
            "schemas": {
                "Owner": {
                    "type": "object",
                    "properties": { "pet": { "$ref": "#/components/schemas/Missing" } }
                }
            }
        }
    });
    let options = TransformOptions {
        silent: true,
        ..TransformOptions::default()
    };
    let output = run(&doc, &options);
    let schemas = prop(&output.components, "schemas");
    let owner = member(&schemas.ty, "Owner");
    assert_eq!(member(&owner.ty, "pet").ty, TsType::UNKNOWN);
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(
        output.warnings[0].path,
        "#/components/schemas/Owner/properties/pet"
    );
}

#[test]
fn test_exclude_deprecated_operation() {
    let doc = json!({
        "paths": {
            "/old": { "get": { "deprecated": true, "operationId": "old", "responses": {} } }
        }
    });
    let options = TransformOptions {
        exclude_deprecated: true,
        ..TransformOptions::default()
    };
    let output = run(&doc, &options);
    let old = prop(&output.paths, "/old");
    let get = member(&old.ty, "get");
    assert!(get.optional);
    assert_eq!(get.ty, TsType::NEVER);
    assert!(output.operations.props.is_empty());
}

#[test]
fn test_properties_array_is_fatal() {
    let doc = json!({
        "components": {
            "schemas": {
                "Broken": { "type": "object", "properties": [{ "name": "id" }] }
            }
        }
    });
    let err = transform_document(&doc, &TransformOptions::default(), &NoopHooks).unwrap_err();
    assert!(matches!(err, TransformError::InvalidDocument { .. }));
}

#[test]
fn test_legacy_enum_with_invalid_member_is_fatal() {
    let doc = json!({
        "components": {
            "schemas": {
                "Shape": { "type": "object", "enum": [{ "type": "string" }, 5] }
            }
        }
    });
    let err = transform_document(&doc, &TransformOptions::default(), &NoopHooks).unwrap_err();
    match err {
        TransformError::InvalidSchema { path, .. } => {
            assert_eq!(path, "#/components/schemas/Shape/enum/1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rendered_operation() {
    let text = generate(&petstore(), &TransformOptions::default(), &NoopHooks).unwrap();

    assert!(text.contains("export interface paths {"));
    assert!(text.contains("        get: operations[\"listPets\"];"));
    assert!(text.contains("export interface operations {"));
    assert!(text.contains("            /** @description A pet */\n            200: {"));
    assert!(text.contains("\"X-Rate-Limit\": number;"));
    assert!(text.contains("[name: string]: unknown;"));
    assert!(text.contains("\"application/json\": components[\"schemas\"][\"Pet\"][];"));
    assert!(text.contains("content?: never;"));
    assert!(text.contains("export type webhooks = Record<string, never>;"));
    assert!(text.contains("/** @description Display name */\n            name?: string;"));
}

#[test]
fn test_rendered_immutable_export_type() {
    let options = TransformOptions {
        immutable: true,
        export_type: true,
        ..TransformOptions::default()
    };
    let text = generate(&petstore(), &options, &NoopHooks).unwrap();
    assert!(text.contains("export type components = {"));
    assert!(text.contains("readonly id: number;"));
    assert!(text.contains("readonly [name: string]: unknown;"));
    assert!(text.contains("readonly components[\"schemas\"][\"Pet\"][]"));
}
