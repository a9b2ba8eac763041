use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
    }
}

/// Turn a shape name into a sentence-cased label: `UserProfile` → `User profile`.
pub fn human_label(name: &str) -> String {
    let words = sanitize_identifier(name).to_snake_case().replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive a camelCase operation name from HTTP method + path, for operations
/// that carry no operationId.
///
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `POST /users/{userId}/messages` → `createUsersMessages`
pub fn route_to_name(method: &str, path: &str) -> String {
    let mut resources: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        ends_with_param = segment.starts_with('{') && segment.ends_with('}');
        if !ends_with_param {
            resources.push(segment);
        }
    }

    let verb = match method.to_uppercase().as_str() {
        "GET" if ends_with_param => "get".to_string(),
        "GET" => "list".to_string(),
        "POST" => "create".to_string(),
        "PUT" => "update".to_string(),
        other => other.to_lowercase(),
    };

    let last = resources.len().saturating_sub(1);
    let subject: String = resources
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && ends_with_param {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{verb}{subject}")
}

/// Naive singularization for the trailing resource of a single-item route.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies").filter(|s| !s.is_empty()) {
        format!("{stem}y")
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.len() > 1 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Collapse runs of non-alphanumeric characters into single underscores.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}
