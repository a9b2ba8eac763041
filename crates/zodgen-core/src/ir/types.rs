use indexmap::IndexMap;

use super::operations::OperationRecord;
use super::schemas::SchemaNode;

/// A fully lowered, generator-ready view of an OpenAPI document.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    pub components: ComponentTable,
    pub operations: Vec<OperationRecord>,
}

/// API metadata.
#[derive(Debug, Clone, Default)]
pub struct IrInfo {
    pub title: String,
    pub version: String,
}

/// Named component shapes in document order.
pub type ComponentTable = IndexMap<String, Component>;

/// A named, reusable shape from `components.schemas`.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub description: Option<String>,
    pub node: SchemaNode,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
}
