use indexmap::IndexMap;
use serde::Deserialize;

use super::media_type::MediaType;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

/// `$ref` to `#/components/responses/..`, or an inline response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
