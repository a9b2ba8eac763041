use indexmap::IndexMap;
use serde::Deserialize;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Any type token this generator does not recognize.
    #[serde(other)]
    Unknown,
}

/// `type: string` or `type: [string, "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A `$ref` or an inline schema.
///
/// A `$ref` wins over any sibling keywords: serde matches the `Ref` variant
/// first and ignores the rest of the map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// The subset of JSON Schema keywords zodgen reads. Everything else is ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,
    pub format: Option<String>,
    pub description: Option<String>,
    /// OpenAPI 3.0 only; 3.1 documents use a `null` type instead.
    pub nullable: Option<bool>,

    pub properties: IndexMap<String, SchemaOrRef>,
    pub required: Vec<String>,
    pub additional_properties: Option<AdditionalProperties>,
    pub items: Option<Box<SchemaOrRef>>,

    pub all_of: Vec<SchemaOrRef>,
    pub one_of: Vec<SchemaOrRef>,
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(rename = "const")]
    pub const_value: Option<serde_json::Value>,

    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<ExclusiveBound>,
    pub exclusive_maximum: Option<ExclusiveBound>,

    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,

    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

/// `exclusiveMinimum` / `exclusiveMaximum`: a boolean modifier of
/// `minimum` / `maximum` in OpenAPI 3.0, a bound of its own in 3.1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}
