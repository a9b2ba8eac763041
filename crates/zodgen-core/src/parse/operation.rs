use indexmap::IndexMap;
use serde::Deserialize;

use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub request_body: Option<RequestBodyOrRef>,
    /// Keyed by status code, in document order.
    pub responses: IndexMap<String, ResponseOrRef>,
}

/// One entry of the `paths` table. Methods are visited in the order declared here.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub summary: Option<String>,
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub trace: Option<Operation>,
}
