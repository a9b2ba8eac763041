use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::NamingStrategy;
use crate::error::{ParseError, ResolveError, TransformError};
use crate::ir::*;
use crate::parse::components::Components;
use crate::parse::media_type::MediaType;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::route_to_name;
use super::schema_resolver::{lower_component, lower_schema_or_ref, ref_name};

/// Options controlling how the transform phase names operations.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub naming_strategy: NamingStrategy,
    pub aliases: IndexMap<String, String>,
}

/// Transform a parsed OpenAPI document into the IR.
pub fn transform(spec: &OpenApiSpec) -> Result<IrSpec, TransformError> {
    transform_with_options(spec, &TransformOptions::default())
}

/// Transform with explicit naming options.
pub fn transform_with_options(
    spec: &OpenApiSpec,
    options: &TransformOptions,
) -> Result<IrSpec, TransformError> {
    if spec.paths.is_none() && spec.components.is_none() {
        return Err(ParseError::MissingField("paths or components".to_string()).into());
    }

    // Phase 1: Lower component schemas
    let components = resolve_components(spec.components.as_ref());

    // Phase 2: Collect operation records, merged by operationId
    let operations = resolve_operations(spec, options);

    let info = IrInfo {
        title: spec.info.title.clone(),
        version: spec.info.version.clone(),
    };

    debug!(
        "lowered {} components and {} operations",
        components.len(),
        operations.len()
    );

    Ok(IrSpec {
        info,
        components,
        operations,
    })
}

fn resolve_components(components: Option<&Components>) -> ComponentTable {
    components
        .map(|c| {
            c.schemas
                .iter()
                .map(|(name, schema)| (name.clone(), lower_component(name, schema)))
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_operations(spec: &OpenApiSpec, options: &TransformOptions) -> Vec<OperationRecord> {
    let mut records: IndexMap<String, OperationRecord> = IndexMap::new();
    let components = spec.components.as_ref();

    for (path, item) in spec.paths.iter().flatten() {
        for (method, op) in operations_of(item) {
            let id = operation_name(method, path, op, options);
            let request_body = op
                .request_body
                .as_ref()
                .and_then(|body| request_body_schema(body, components));
            let responses = resolve_responses(&op.responses, components);

            match records.get_mut(&id) {
                Some(existing) => {
                    debug!("merging {} {} into operation {id}", method.as_str(), path);
                    if request_body.is_some() {
                        existing.request_body = request_body;
                    }
                    existing.responses.extend(responses);
                }
                None => {
                    let summary = op.summary.clone().or_else(|| item.summary.clone());
                    records.insert(
                        id.clone(),
                        OperationRecord {
                            operation_id: id,
                            summary,
                            method,
                            path: path.clone(),
                            request_body,
                            responses,
                        },
                    );
                }
            }
        }
    }

    records.into_values().collect()
}

fn operations_of(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, &item.get),
        (HttpMethod::Post, &item.post),
        (HttpMethod::Put, &item.put),
        (HttpMethod::Delete, &item.delete),
        (HttpMethod::Patch, &item.patch),
        (HttpMethod::Options, &item.options),
        (HttpMethod::Head, &item.head),
        (HttpMethod::Trace, &item.trace),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
}

fn operation_name(
    method: HttpMethod,
    path: &str,
    op: &Operation,
    options: &TransformOptions,
) -> String {
    let raw_name = match options.naming_strategy {
        NamingStrategy::UseOperationId => op
            .operation_id
            .clone()
            .unwrap_or_else(|| route_to_name(method.as_str(), path)),
        NamingStrategy::UseRouteBased => route_to_name(method.as_str(), path),
    };

    options.aliases.get(&raw_name).cloned().unwrap_or(raw_name)
}

fn resolve_responses(
    responses: &IndexMap<String, ResponseOrRef>,
    components: Option<&Components>,
) -> IndexMap<String, ResponseRecord> {
    responses
        .iter()
        .map(|(status, resp)| {
            // An unresolvable reference still declares the status, just without a body
            let record = match lookup_response(resp, components) {
                Some(response) => ResponseRecord {
                    description: response.description.clone(),
                    body: body_schema(&response.content),
                },
                None => ResponseRecord {
                    description: String::new(),
                    body: None,
                },
            };
            (status.clone(), record)
        })
        .collect()
}

fn request_body_schema(
    body: &RequestBodyOrRef,
    components: Option<&Components>,
) -> Option<SchemaNode> {
    match body {
        RequestBodyOrRef::RequestBody(rb) => body_schema(&rb.content),
        RequestBodyOrRef::Ref { ref_path } => {
            let name = section_name(ref_path, "requestBodies")?;
            match components.and_then(|c| c.request_bodies.get(name)) {
                Some(RequestBodyOrRef::RequestBody(rb)) => body_schema(&rb.content),
                _ => {
                    warn!("{}", ResolveError::UnresolvedRef(ref_path.clone()));
                    None
                }
            }
        }
    }
}

fn lookup_response<'a>(
    resp: &'a ResponseOrRef,
    components: Option<&'a Components>,
) -> Option<&'a Response> {
    match resp {
        ResponseOrRef::Response(r) => Some(r),
        ResponseOrRef::Ref { ref_path } => {
            let name = section_name(ref_path, "responses")?;
            match components.and_then(|c| c.responses.get(name)) {
                Some(ResponseOrRef::Response(r)) => Some(r),
                _ => {
                    warn!("{}", ResolveError::UnresolvedRef(ref_path.clone()));
                    None
                }
            }
        }
    }
}

/// Prefer `application/json`, fall back to the first declared media type.
fn body_schema(content: &IndexMap<String, MediaType>) -> Option<SchemaNode> {
    let media = content.get("application/json").or_else(|| content.values().next())?;
    media.schema.as_ref().map(lower_schema_or_ref)
}

/// Extract `Name` from `#/components/<section>/Name`.
fn section_name<'a>(ref_path: &'a str, section: &str) -> Option<&'a str> {
    let expected = format!("#/components/{section}/");
    if ref_path.starts_with(&expected) {
        Some(ref_name(ref_path))
    } else {
        warn!("{}", ResolveError::InvalidRefFormat(ref_path.to_string()));
        None
    }
}
