use indexmap::IndexMap;

/// One node of a schema tree, lowered to a single effective shape.
///
/// Lowering resolves keyword precedence once, so consumers can `match`
/// exhaustively instead of probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to a named component shape.
    Ref(String),
    Composition(Composition),
    String(StringSchema),
    Number(NumberSchema),
    Boolean,
    Null,
    /// `const`, or an `enum` without a usable `type`.
    Literal(Vec<serde_json::Value>),
    Array(ArraySchema),
    Object(ObjectSchema),
    /// `nullable: true`, or a `[T, "null"]` type list.
    Nullable(Box<SchemaNode>),
    /// Missing or unrecognized type information.
    Unknown,
}

/// How the members of a composition combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionKind {
    AllOf,
    OneOf,
    AnyOf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub kind: CompositionKind,
    pub members: Vec<SchemaNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringSchema {
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub enum_values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberSchema {
    pub integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub enum_values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    pub items: Option<Box<SchemaNode>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
    pub additional_properties: AdditionalPolicy,
}

impl ObjectSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

/// What an object does with keys it does not declare.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalPolicy {
    /// The document says nothing.
    #[default]
    Unspecified,
    /// `additionalProperties: false`
    Forbidden,
    /// `additionalProperties: true`
    Unrestricted,
    /// `additionalProperties: { ... }`
    Typed(Box<SchemaNode>),
}
