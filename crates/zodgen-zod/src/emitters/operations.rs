use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use minijinja::{Environment, context};
use zodgen_core::GeneratedFile;
use zodgen_core::config::OutputOptions;
use zodgen_core::ir::{ComponentTable, IrSpec, OperationRecord, SchemaNode};
use zodgen_core::transform::name_normalizer::normalize_name;

use super::{component_specifier, jsdoc_block, jsdoc_line, path_segment, text_lines};
use crate::dependency_graph::{DependencyGraph, collect_refs};
use crate::error::GeneratorError;
use crate::type_mapper::{TypeConverter, js_identifier, sanitize_chars};

/// Emit one `schema` module per operation record.
pub fn emit_operations(
    ir: &IrSpec,
    options: &OutputOptions,
    env: &Environment<'static>,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    ir.operations
        .iter()
        .zip(operation_groups(ir, options))
        .map(|(op, group)| emit_operation(op, &group, &ir.components, options, env))
        .collect()
}

/// The directory each operation is written to, in operation order.
///
/// Ids are made into single path segments, then suffixed with `_` until they
/// clash neither with each other nor with the components directory or the
/// index module.
pub fn operation_groups(ir: &IrSpec, options: &OutputOptions) -> Vec<String> {
    let mut taken = IndexSet::from([
        options.components_dir.clone(),
        format!("index.{}", options.extension),
    ]);
    ir.operations
        .iter()
        .map(|op| {
            let mut group = path_segment(&op.operation_id);
            while taken.contains(&group) {
                group.push('_');
            }
            if group != op.operation_id {
                warn!("operation {} is written to {group}", op.operation_id);
            }
            taken.insert(group.clone());
            group
        })
        .collect()
}

/// Assemble the request and response validators of a single operation,
/// written to the `group` directory.
pub fn emit_operation(
    op: &OperationRecord,
    group: &str,
    components: &ComponentTable,
    options: &OutputOptions,
    env: &Environment<'static>,
) -> Result<GeneratedFile, GeneratorError> {
    let mut locals: IndexSet<String> = op
        .responses
        .keys()
        .map(|status| response_name(status))
        .collect();
    if op.request_body.is_some() {
        locals.insert("Request".to_string());
    }
    let bindings = import_aliases(components, &locals);

    // Operation shapes are never referenced by anything, so edges go nowhere.
    let mut scratch = DependencyGraph::new();
    let mut converter =
        TypeConverter::new(components, &mut scratch).with_bindings(bindings.clone());
    let mut referenced = IndexSet::new();
    let mut shapes = Vec::new();

    if let Some(body) = &op.request_body {
        collect_refs(body, &mut referenced);
        shapes.push(context! {
            name => "Request",
            doc => None::<String>,
            expression => request_expression(&mut converter, body),
        });
    }

    for (status, response) in &op.responses {
        if let Some(body) = &response.body {
            collect_refs(body, &mut referenced);
        }
        let doc = options.jsdoc.then(|| {
            if response.description.trim().is_empty() {
                jsdoc_line(status)
            } else {
                jsdoc_line(&format!("{status}: {}", response.description))
            }
        });
        shapes.push(context! {
            name => response_name(status),
            doc => doc,
            expression => response_expression(&mut converter, response.body.as_ref()),
        });
    }

    referenced.extend(converter.into_deferred());
    let prefix = format!("../{}", options.components_dir);
    let imports: Vec<minijinja::Value> = referenced
        .iter()
        .filter(|name| components.contains_key(name.as_str()))
        .map(|name| {
            context! {
                name => js_identifier(name),
                local => bindings.get(name.as_str()).cloned(),
                specifier => component_specifier(&prefix, name, options),
            }
        })
        .collect();

    let doc = options.jsdoc.then(|| jsdoc_block(&header_lines(op)));
    let tmpl = env.get_template("operation.ts.j2")?;
    let content = tmpl.render(context! {
        zod_module => options.zod_module.clone(),
        imports => imports,
        doc => doc,
        shapes => shapes,
    })?;

    let file = GeneratedFile {
        group: Some(group.to_string()),
        file_name: format!("{}.{}", options.operation_file, options.extension),
        content,
    };
    debug!("generated {}", file.path());
    Ok(file)
}

/// A direct reference aliases the component; anything else is expanded in place.
fn request_expression(converter: &mut TypeConverter<'_>, body: &SchemaNode) -> String {
    match body {
        SchemaNode::Ref(target) => converter.binding(target),
        _ => converter.convert(Some(body), &mut Vec::new(), "", true),
    }
}

/// Like requests, except object bodies keep their property references as
/// named imports instead of expanding them.
fn response_expression(converter: &mut TypeConverter<'_>, body: Option<&SchemaNode>) -> String {
    match body {
        Some(SchemaNode::Ref(target)) => converter.binding(target),
        Some(object @ SchemaNode::Object(_)) => {
            converter.convert(Some(object), &mut Vec::new(), "", false)
        }
        other => converter.convert(other, &mut Vec::new(), "", true),
    }
}

/// Local aliases for components whose binding collides with one of the
/// operation's own shape names: `Request` is imported as `Request_`.
fn import_aliases(
    components: &ComponentTable,
    locals: &IndexSet<String>,
) -> IndexMap<String, String> {
    let identifiers: IndexSet<String> = components.keys().map(|n| js_identifier(n)).collect();
    let mut aliases = IndexMap::new();
    for name in components.keys() {
        let identifier = js_identifier(name);
        if !locals.contains(&identifier) {
            continue;
        }
        let mut alias = format!("{identifier}_");
        while locals.contains(&alias) || identifiers.contains(&alias) {
            alias.push('_');
        }
        aliases.insert(name.clone(), alias);
    }
    aliases
}

/// `"201"` → `Response201`, `"default"` → `ResponseDefault`.
fn response_name(status: &str) -> String {
    if status.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Response{}", sanitize_chars(status))
    } else {
        format!("Response{}", normalize_name(status).pascal_case)
    }
}

fn header_lines(op: &OperationRecord) -> Vec<String> {
    let mut lines = op
        .summary
        .as_deref()
        .map(text_lines)
        .unwrap_or_default();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("operationId: {}", op.operation_id));
    lines.push(format!("{} {}", op.method.as_str(), op.path));
    lines
}
