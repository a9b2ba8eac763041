use indexmap::IndexMap;

use super::schemas::SchemaNode;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// Everything known about one operationId, merged across path entries.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub operation_id: String,
    pub summary: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub request_body: Option<SchemaNode>,
    pub responses: IndexMap<String, ResponseRecord>,
}

/// A response keyed by status code (`"200"`, `"4XX"`, `"default"`).
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub description: String,
    pub body: Option<SchemaNode>,
}
