use indexmap::IndexMap;
use serde::Deserialize;

use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;

/// The reusable tables zodgen resolves references against.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Components {
    pub schemas: IndexMap<String, SchemaOrRef>,
    pub responses: IndexMap<String, ResponseOrRef>,
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,
}
