use indexmap::IndexSet;
use log::{info, warn};
use zodgen_core::config::OutputOptions;
use zodgen_core::ir::IrSpec;
use zodgen_core::{CodeGenerator, GeneratedFile};

use crate::dependency_graph::DependencyGraph;
use crate::emitters;
use crate::emitters::components::ComponentEmitter;
use crate::error::GeneratorError;

/// Zod validator generator.
pub struct ZodGenerator;

/// Output of one compilation run.
#[derive(Debug)]
pub struct Compilation {
    /// Component modules in document order, then operation modules, then the index.
    pub files: Vec<GeneratedFile>,
    /// Direct references between component shapes.
    pub dependencies: DependencyGraph,
}

/// Compile every component and operation of `ir` into Zod modules.
pub fn compile(ir: &IrSpec, options: &OutputOptions) -> Result<Compilation, GeneratorError> {
    let env = emitters::environment()?;

    let (mut files, dependencies) =
        ComponentEmitter::new(&ir.components, options, &env).emit_all()?;
    let component_count = files.len();

    files.extend(emitters::operations::emit_operations(ir, options, &env)?);
    if options.index {
        files.push(emitters::index::emit_index(ir, options, &env)?);
    }

    let mut paths = IndexSet::new();
    files.retain(|file| {
        let unique = paths.insert(file.path());
        if !unique {
            warn!("{} is generated more than once; keeping the first", file.path());
        }
        unique
    });

    info!(
        "compiled {} component and {} operation modules",
        component_count,
        ir.operations.len()
    );

    Ok(Compilation {
        files,
        dependencies,
    })
}

impl CodeGenerator for ZodGenerator {
    type Config = OutputOptions;
    type Error = GeneratorError;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &OutputOptions,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        compile(ir, config).map(|compilation| compilation.files)
    }
}
