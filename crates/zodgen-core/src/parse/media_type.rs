use serde::Deserialize;

use super::schema::SchemaOrRef;

/// A media type object. Only the body schema is compiled.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}
