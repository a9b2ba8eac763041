use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use zodgen_core::ir::{
    AdditionalPolicy, ArraySchema, ComponentTable, Composition, CompositionKind, NumberSchema,
    ObjectSchema, SchemaNode, StringSchema,
};

use crate::dependency_graph::{CycleGroups, DependencyGraph};

const ANY: &str = "z.any()";

/// Words a `const` binding cannot use, plus the `z` import itself.
const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    "z",
];

/// Converts `SchemaNode` trees into Zod expression strings.
///
/// References are emitted in one of three forms:
/// - a bare identifier, recording `owner -> target` in the dependency graph;
/// - `z.lazy(() => Target)` when the target is already on the path stack, or
///   shares a reference cycle with the owner;
/// - the target's own expression, expanded in place, when converting inline.
///
/// Only non-inline conversions record edges. Lazily referenced targets are
/// remembered so callers that expand shapes in place can still import them.
pub struct TypeConverter<'a> {
    components: &'a ComponentTable,
    graph: &'a mut DependencyGraph,
    cycles: Option<&'a CycleGroups>,
    bindings: IndexMap<String, String>,
    deferred: IndexSet<String>,
}

impl<'a> TypeConverter<'a> {
    pub fn new(components: &'a ComponentTable, graph: &'a mut DependencyGraph) -> Self {
        Self {
            components,
            graph,
            cycles: None,
            bindings: IndexMap::new(),
            deferred: IndexSet::new(),
        }
    }

    /// Reference members of the same cycle group lazily, whichever is
    /// generated first.
    pub fn with_cycles(mut self, cycles: &'a CycleGroups) -> Self {
        self.cycles = Some(cycles);
        self
    }

    /// Refer to the listed shapes through local aliases instead of
    /// [`js_identifier`].
    pub fn with_bindings(mut self, bindings: IndexMap<String, String>) -> Self {
        self.bindings = bindings;
        self
    }

    /// The local name `target` is referenced by.
    pub fn binding(&self, target: &str) -> String {
        self.bindings
            .get(target)
            .cloned()
            .unwrap_or_else(|| js_identifier(target))
    }

    /// Convert `node` into a Zod expression.
    ///
    /// `path` lists the shapes currently being expanded and is restored before
    /// returning. `owner` is the shape edges are recorded against; empty means
    /// none.
    pub fn convert(
        &mut self,
        node: Option<&SchemaNode>,
        path: &mut Vec<String>,
        owner: &str,
        inline: bool,
    ) -> String {
        let Some(node) = node else {
            return ANY.to_string();
        };

        match node {
            SchemaNode::Ref(target) => self.convert_ref(target, path, owner, inline),
            SchemaNode::Composition(composition) => {
                self.convert_composition(composition, path, owner, inline)
            }
            SchemaNode::String(s) => convert_string(s),
            SchemaNode::Number(n) => convert_number(n),
            SchemaNode::Boolean => "z.boolean()".to_string(),
            SchemaNode::Null => "z.null()".to_string(),
            SchemaNode::Literal(values) => literal_union(values),
            SchemaNode::Array(array) => self.convert_array(array, path, owner, inline),
            SchemaNode::Object(object) => self.convert_object(object, path, owner, inline),
            SchemaNode::Nullable(inner) => {
                let expr = self.convert(Some(inner.as_ref()), path, owner, inline);
                format!("{expr}.nullable()")
            }
            SchemaNode::Unknown => ANY.to_string(),
        }
    }

    /// Targets emitted as `z.lazy(..)`, in first-seen order.
    pub fn into_deferred(self) -> IndexSet<String> {
        self.deferred
    }

    fn convert_ref(
        &mut self,
        target: &str,
        path: &mut Vec<String>,
        owner: &str,
        inline: bool,
    ) -> String {
        let cyclic = !inline && self.cycles.is_some_and(|c| c.shared(owner, target));
        if cyclic || path.iter().any(|p| p == target) {
            self.deferred.insert(target.to_string());
            if target != owner {
                self.record(owner, target, inline);
            }
            return format!("z.lazy(() => {})", self.binding(target));
        }

        let components = self.components;
        if inline {
            if let Some(component) = components.get(target) {
                path.push(target.to_string());
                let expr = self.convert(Some(&component.node), path, target, true);
                path.pop();
                return expr;
            }
        }

        self.record(owner, target, inline);
        self.binding(target)
    }

    fn record(&mut self, owner: &str, target: &str, inline: bool) {
        if !inline && !owner.is_empty() {
            self.graph.record(owner, target);
        }
    }

    fn convert_composition(
        &mut self,
        composition: &Composition,
        path: &mut Vec<String>,
        owner: &str,
        inline: bool,
    ) -> String {
        let members: Vec<String> = composition
            .members
            .iter()
            .map(|member| self.convert(Some(member), path, owner, inline))
            .collect();

        match composition.kind {
            CompositionKind::AllOf => members
                .into_iter()
                .reduce(|acc, member| format!("z.intersection({acc}, {member})"))
                .unwrap_or_else(|| ANY.to_string()),
            CompositionKind::OneOf | CompositionKind::AnyOf => union_of(members),
        }
    }

    fn convert_array(
        &mut self,
        array: &ArraySchema,
        path: &mut Vec<String>,
        owner: &str,
        inline: bool,
    ) -> String {
        let items = self.convert(array.items.as_deref(), path, owner, inline);
        let mut expr = format!("z.array({items})");
        if let Some(min) = array.min_items {
            expr.push_str(&format!(".min({min})"));
        }
        if let Some(max) = array.max_items {
            expr.push_str(&format!(".max({max})"));
        }
        expr
    }

    fn convert_object(
        &mut self,
        object: &ObjectSchema,
        path: &mut Vec<String>,
        owner: &str,
        inline: bool,
    ) -> String {
        if object.properties.is_empty() {
            return match &object.additional_properties {
                AdditionalPolicy::Typed(values) => {
                    let values = self.convert(Some(values.as_ref()), path, owner, inline);
                    format!("z.record(z.string(), {values})")
                }
                _ => "z.record(z.string(), z.unknown())".to_string(),
            };
        }

        let fields: Vec<String> = object
            .properties
            .iter()
            .map(|(name, prop)| {
                let mut expr = self.convert(Some(prop), path, owner, inline);
                if !object.is_required(name) {
                    expr.push_str(".optional()");
                }
                format!("{}: {expr}", property_key(name))
            })
            .collect();

        let mut expr = format!("z.object({{ {} }})", fields.join(", "));
        match &object.additional_properties {
            AdditionalPolicy::Unspecified => {}
            AdditionalPolicy::Forbidden => expr.push_str(".strict()"),
            AdditionalPolicy::Unrestricted => expr.push_str(".passthrough()"),
            AdditionalPolicy::Typed(values) => {
                let values = self.convert(Some(values.as_ref()), path, owner, inline);
                expr.push_str(&format!(".catchall({values})"));
            }
        }
        expr
    }
}

fn convert_string(s: &StringSchema) -> String {
    if !s.enum_values.is_empty() {
        return enum_expression(&s.enum_values);
    }

    let mut expr = "z.string()".to_string();
    if let Some(check) = s.format.as_deref().and_then(format_check) {
        expr.push_str(check);
    }
    if let Some(pattern) = &s.pattern {
        expr.push_str(&format!(".regex(new RegExp({}))", js_string(pattern)));
    }
    if let Some(min) = s.min_length {
        expr.push_str(&format!(".min({min})"));
    }
    if let Some(max) = s.max_length {
        expr.push_str(&format!(".max({max})"));
    }
    expr
}

fn format_check(format: &str) -> Option<&'static str> {
    match format {
        "date-time" => Some(".datetime()"),
        "date" => Some(".date()"),
        "email" => Some(".email()"),
        "uuid" => Some(".uuid()"),
        "uri" | "url" => Some(".url()"),
        _ => None,
    }
}

fn convert_number(n: &NumberSchema) -> String {
    if !n.enum_values.is_empty() {
        return literal_union(&n.enum_values);
    }

    let mut expr = "z.number()".to_string();
    if n.integer {
        expr.push_str(".int()");
    }
    let bounds = [
        ("min", n.minimum),
        ("max", n.maximum),
        ("gt", n.exclusive_minimum),
        ("lt", n.exclusive_maximum),
    ];
    for (check, bound) in bounds {
        if let Some(value) = bound {
            expr.push_str(&format!(".{check}({value})"));
        }
    }
    expr
}

/// `z.enum([..])` when every value is a string, a literal union otherwise.
fn enum_expression(values: &[Value]) -> String {
    let strings: Option<Vec<&str>> = values.iter().map(Value::as_str).collect();
    match strings {
        Some(strings) => {
            let quoted: Vec<String> = strings.into_iter().map(js_string).collect();
            format!("z.enum([{}])", quoted.join(", "))
        }
        None => literal_union(values),
    }
}

fn literal_union(values: &[Value]) -> String {
    let literals = values
        .iter()
        .map(|value| match value {
            Value::Null => "z.null()".to_string(),
            Value::Array(_) | Value::Object(_) => ANY.to_string(),
            scalar => format!("z.literal({scalar})"),
        })
        .collect();
    union_of(literals)
}

/// `z.union` needs at least two members.
fn union_of(mut members: Vec<String>) -> String {
    match members.len() {
        0 => ANY.to_string(),
        1 => members.remove(0),
        _ => format!("z.union([{}])", members.join(", ")),
    }
}

/// A JSON string literal, which is also a valid JavaScript string literal.
fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

fn property_key(name: &str) -> String {
    if is_js_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// Replace characters that cannot appear in a JavaScript identifier with `_`.
pub fn sanitize_chars(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The binding a component shape is declared and imported under.
///
/// `Pet` stays `Pet`; `pet.v2-input` becomes `pet_v2_input`.
/// Reserved words get a trailing `_`: `class` becomes `class_`.
pub fn js_identifier(name: &str) -> String {
    let sanitized = sanitize_chars(name);
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{sanitized}")
    } else if RESERVED.contains(&sanitized.as_str()) {
        format!("{sanitized}_")
    } else {
        sanitized
    }
}

/// Short description of a node, used in JSDoc property listings.
pub fn type_label(node: &SchemaNode) -> String {
    match node {
        SchemaNode::Ref(name) => name.clone(),
        SchemaNode::Composition(c) => match c.kind {
            CompositionKind::AllOf => "intersection".to_string(),
            CompositionKind::OneOf | CompositionKind::AnyOf => "union".to_string(),
        },
        SchemaNode::String(s) if !s.enum_values.is_empty() => "enum".to_string(),
        SchemaNode::String(_) => "string".to_string(),
        SchemaNode::Number(n) if n.integer => "integer".to_string(),
        SchemaNode::Number(_) => "number".to_string(),
        SchemaNode::Boolean => "boolean".to_string(),
        SchemaNode::Null => "null".to_string(),
        SchemaNode::Literal(_) => "literal".to_string(),
        SchemaNode::Array(a) => match a.items.as_deref() {
            Some(items) => format!("array of {}", type_label(items)),
            None => "array".to_string(),
        },
        SchemaNode::Object(_) => "object".to_string(),
        SchemaNode::Nullable(inner) => format!("{} | null", type_label(inner)),
        SchemaNode::Unknown => "unknown".to_string(),
    }
}
