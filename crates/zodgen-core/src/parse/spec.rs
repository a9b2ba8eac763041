use indexmap::IndexMap;
use serde::Deserialize;

use super::components::Components;
use super::operation::PathItem;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    pub version: String,
}

/// Top-level OpenAPI 3.x document.
///
/// Only the parts zodgen compiles are modelled; everything else in the
/// document is ignored. `paths` and `components` stay optional so that a
/// missing table can be told apart from an empty one.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OpenApiSpec {
    pub openapi: String,
    pub info: Info,
    pub paths: Option<IndexMap<String, PathItem>>,
    pub components: Option<Components>,
}
