use zodgen_core::ir::{AdditionalPolicy, CompositionKind, HttpMethod, SchemaNode};
use zodgen_core::parse;
use zodgen_core::transform;

const USERS: &str = include_str!("fixtures/users.yaml");
const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const CYCLIC: &str = include_str!("fixtures/cyclic.yaml");

#[test]
fn transform_users() {
    let spec = parse::from_yaml(USERS).unwrap();
    let ir = transform::transform(&spec).unwrap();

    assert_eq!(ir.info.title, "Users API");
    assert_eq!(ir.components.len(), 1);

    let user = &ir.components["User"];
    match &user.node {
        SchemaNode::Object(obj) => {
            let keys: Vec<&str> = obj.properties.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["id", "email"]);
            assert!(obj.is_required("id"));
            assert!(!obj.is_required("email"));
        }
        other => panic!("User should be an object, got {other:?}"),
    }

    assert_eq!(ir.operations.len(), 1);
    let op = &ir.operations[0];
    assert_eq!(op.operation_id, "user.create");
    assert_eq!(op.method, HttpMethod::Post);
    assert_eq!(op.path, "/users");
    assert_eq!(op.request_body, Some(SchemaNode::Ref("User".to_string())));
    assert!(matches!(op.responses["201"].body, Some(SchemaNode::Object(_))));
}

#[test]
fn transform_petstore_components() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let ir = transform::transform(&spec).unwrap();

    let names: Vec<&str> = ir.components.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["Pet", "NewPet", "PetStatus", "Category", "Tag", "Error"]
    );

    let pet = &ir.components["Pet"];
    assert_eq!(pet.description.as_deref(), Some("A pet in the store"));
    match &pet.node {
        SchemaNode::Object(obj) => {
            assert_eq!(obj.additional_properties, AdditionalPolicy::Forbidden);
            assert!(matches!(obj.properties["birthday"], SchemaNode::Nullable(_)));
            assert_eq!(obj.properties["status"], SchemaNode::Ref("PetStatus".to_string()));
        }
        other => panic!("Pet should be an object, got {other:?}"),
    }

    match &ir.components["NewPet"].node {
        SchemaNode::Composition(c) => {
            assert_eq!(c.kind, CompositionKind::AllOf);
            assert_eq!(c.members.len(), 2);
        }
        other => panic!("NewPet should be an allOf, got {other:?}"),
    }
}

#[test]
fn transform_petstore_operations() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let ir = transform::transform(&spec).unwrap();

    let ids: Vec<&str> = ir
        .operations
        .iter()
        .map(|op| op.operation_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["listPets", "createPet", "getPet", "deletePet", "updatePet"]
    );

    let list = &ir.operations[0];
    assert_eq!(list.summary.as_deref(), Some("List all pets"));
    assert_eq!(
        list.responses["default"].body,
        Some(SchemaNode::Ref("Error".to_string()))
    );

    let delete = &ir.operations[3];
    assert!(delete.request_body.is_none());
    assert!(delete.responses["204"].body.is_none());
}

#[test]
fn transform_cyclic_keeps_references() {
    let spec = parse::from_yaml(CYCLIC).unwrap();
    let ir = transform::transform(&spec).unwrap();

    match &ir.components["TreeNode"].node {
        SchemaNode::Object(obj) => match &obj.properties["children"] {
            SchemaNode::Array(arr) => {
                assert_eq!(
                    arr.items.as_deref(),
                    Some(&SchemaNode::Ref("TreeNode".to_string()))
                );
            }
            other => panic!("children should be an array, got {other:?}"),
        },
        other => panic!("TreeNode should be an object, got {other:?}"),
    }
    assert_eq!(ir.operations.len(), 2);
}
