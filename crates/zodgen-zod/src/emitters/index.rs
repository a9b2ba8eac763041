use indexmap::IndexSet;
use minijinja::{Environment, context};
use zodgen_core::GeneratedFile;
use zodgen_core::config::OutputOptions;
use zodgen_core::ir::IrSpec;
use zodgen_core::transform::name_normalizer::normalize_name;

use super::component_specifier;
use super::operations::operation_groups;
use crate::error::GeneratorError;

/// Emit the `index` barrel: every component flat, every operation under a
/// camelCase namespace.
pub fn emit_index(
    ir: &IrSpec,
    options: &OutputOptions,
    env: &Environment<'static>,
) -> Result<GeneratedFile, GeneratorError> {
    let prefix = format!("./{}", options.components_dir);
    let components: IndexSet<String> = ir
        .components
        .keys()
        .map(|name| component_specifier(&prefix, name, options))
        .collect();
    let mut namespaces = IndexSet::new();
    let operations: Vec<minijinja::Value> = ir
        .operations
        .iter()
        .zip(operation_groups(ir, options))
        .map(|(op, group)| {
            let mut namespace = normalize_name(&op.operation_id).camel_case;
            while !namespaces.insert(namespace.clone()) {
                namespace.push('_');
            }
            context! {
                namespace => namespace,
                specifier => format!(
                    "./{group}/{}{}",
                    options.operation_file, options.import_extension
                ),
            }
        })
        .collect();

    let tmpl = env.get_template("index.ts.j2")?;
    let content = tmpl.render(context! {
        components => components,
        operations => operations,
    })?;

    Ok(GeneratedFile {
        group: None,
        file_name: format!("index.{}", options.extension),
        content,
    })
}
