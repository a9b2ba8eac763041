use zodgen_core::parse;
use zodgen_core::parse::schema::{SchemaOrRef, SchemaType, TypeSet};

const USERS: &str = include_str!("fixtures/users.yaml");
const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

#[test]
fn parse_users_yaml() {
    let spec = parse::from_yaml(USERS).expect("should parse users.yaml");
    assert_eq!(spec.openapi, "3.1.0");
    assert_eq!(spec.info.title, "Users API");

    let paths = spec.paths.as_ref().expect("should have paths");
    let post = paths["/users"].post.as_ref().expect("should have POST");
    assert_eq!(post.operation_id.as_deref(), Some("user.create"));
    assert!(post.responses.contains_key("201"));
}

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.openapi, "3.0.3");
    assert_eq!(spec.paths.as_ref().map(|p| p.len()), Some(2));

    let components = spec.components.as_ref().expect("should have components");
    assert_eq!(components.schemas.len(), 6);
    assert!(components.responses.contains_key("ErrorResponse"));
}

#[test]
fn parse_json_document() {
    let json = r##"{
        "openapi": "3.1.0",
        "info": { "title": "Json", "version": "1" },
        "components": {
            "schemas": {
                "Id": { "type": "string", "format": "uuid" }
            }
        }
    }"##;
    let spec = parse::from_json(json).expect("should parse JSON");
    assert!(spec.paths.is_none());
    let components = spec.components.unwrap();
    match &components.schemas["Id"] {
        SchemaOrRef::Schema(s) => assert_eq!(s.format.as_deref(), Some("uuid")),
        _ => panic!("expected inline schema"),
    }
}

#[test]
fn unknown_type_token_is_tolerated() {
    let yaml = r#"
components:
  schemas:
    Upload:
      type: file
"#;
    let spec = parse::from_yaml(yaml).expect("unknown type tokens must not fail parsing");
    match &spec.components.unwrap().schemas["Upload"] {
        SchemaOrRef::Schema(s) => {
            assert_eq!(s.schema_type, Some(TypeSet::Single(SchemaType::Unknown)));
        }
        _ => panic!("expected inline schema"),
    }
}

#[test]
fn missing_info_is_tolerated() {
    let spec = parse::from_yaml("paths: {}\n").unwrap();
    assert!(spec.info.title.is_empty());
    assert!(spec.paths.unwrap().is_empty());
}

#[test]
fn invalid_yaml_is_an_error() {
    assert!(parse::from_yaml("paths: [unclosed").is_err());
}
