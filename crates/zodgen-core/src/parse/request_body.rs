use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    /// Keyed by media type, e.g. `application/json`.
    pub content: IndexMap<String, MediaType>,
}

/// `$ref` to `#/components/requestBodies/..`, or an inline body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}
