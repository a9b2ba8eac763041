use indexmap::IndexMap;
use log::{debug, warn};
use minijinja::{Environment, context};
use zodgen_core::GeneratedFile;
use zodgen_core::config::OutputOptions;
use zodgen_core::error::ResolveError;
use zodgen_core::ir::{Component, ComponentTable, SchemaNode};
use zodgen_core::transform::name_normalizer::human_label;

use super::{component_specifier, jsdoc_block, path_segment, text_lines};
use crate::dependency_graph::{CycleGroups, DependencyGraph};
use crate::error::GeneratorError;
use crate::type_mapper::{TypeConverter, js_identifier, type_label};

/// Generates one module per component shape, each exactly once.
///
/// Dependencies are generated before the shape that imports them. Members
/// of one reference cycle always refer to each other lazily, so the modules
/// load in any order and come out the same whichever is generated first.
/// The chain of shapes currently being generated doubles as the converter's
/// path stack.
pub struct ComponentEmitter<'a> {
    components: &'a ComponentTable,
    options: &'a OutputOptions,
    env: &'a Environment<'static>,
    cycles: CycleGroups,
    graph: DependencyGraph,
    cache: IndexMap<String, GeneratedFile>,
    expanding: Vec<String>,
}

impl<'a> ComponentEmitter<'a> {
    pub fn new(
        components: &'a ComponentTable,
        options: &'a OutputOptions,
        env: &'a Environment<'static>,
    ) -> Self {
        Self {
            components,
            options,
            env,
            cycles: DependencyGraph::from_components(components).cycle_groups(),
            graph: DependencyGraph::new(),
            cache: IndexMap::new(),
            expanding: Vec::new(),
        }
    }

    /// Generate every component, returning the modules in document order
    /// along with the dependency graph discovered on the way.
    pub fn emit_all(mut self) -> Result<(Vec<GeneratedFile>, DependencyGraph), GeneratorError> {
        let components = self.components;
        let mut files = Vec::with_capacity(components.len());
        for name in components.keys() {
            if let Some(file) = self.generate(name)? {
                files.push(file);
            }
        }
        Ok((files, self.graph))
    }

    /// Generate the module for `name`, or return the cached one.
    ///
    /// Returns `None` when `name` is unknown or is already being generated
    /// further up the chain.
    pub fn generate(&mut self, name: &str) -> Result<Option<GeneratedFile>, GeneratorError> {
        if let Some(file) = self.cache.get(name) {
            return Ok(Some(file.clone()));
        }

        if self.expanding.iter().any(|n| n == name) {
            let mut chain = self.expanding.clone();
            chain.push(name.to_string());
            warn!("{}", ResolveError::CircularRef(chain));
            return Ok(None);
        }

        let components = self.components;
        let Some(component) = components.get(name) else {
            warn!("{}", ResolveError::UnresolvedRef(name.to_string()));
            return Ok(None);
        };

        self.expanding.push(name.to_string());
        let expression = TypeConverter::new(components, &mut self.graph)
            .with_cycles(&self.cycles)
            .convert(Some(&component.node), &mut self.expanding, name, false);

        let mut imports = Vec::new();
        for dependency in self.graph.dependencies_of(name) {
            if components.contains_key(&dependency) {
                self.generate(&dependency)?;
                imports.push(dependency);
            } else {
                warn!("{name} references unknown shape {dependency}; no import emitted");
            }
        }
        self.expanding.pop();

        let file = self.render(component, &expression, &imports)?;
        debug!("generated {}", file.path());
        self.cache.insert(name.to_string(), file.clone());
        Ok(Some(file))
    }

    fn render(
        &self,
        component: &Component,
        expression: &str,
        imports: &[String],
    ) -> Result<GeneratedFile, GeneratorError> {
        let tmpl = self.env.get_template("component.ts.j2")?;

        let imports: Vec<minijinja::Value> = imports
            .iter()
            .map(|dependency| {
                context! {
                    name => js_identifier(dependency),
                    specifier => component_specifier(".", dependency, self.options),
                }
            })
            .collect();
        let doc = self.options.jsdoc.then(|| jsdoc_block(&header_lines(component)));

        let content = tmpl.render(context! {
            zod_module => self.options.zod_module.clone(),
            imports => imports,
            doc => doc,
            name => js_identifier(&component.name),
            expression => expression,
        })?;

        Ok(GeneratedFile {
            group: Some(self.options.components_dir.clone()),
            file_name: format!(
                "{}.{}",
                path_segment(&component.name),
                self.options.extension
            ),
            content,
        })
    }
}

/// Description (or a label derived from the name), then one line per property.
fn header_lines(component: &Component) -> Vec<String> {
    let mut lines = match component.description.as_deref().map(str::trim) {
        Some(description) if !description.is_empty() => text_lines(description),
        _ => vec![human_label(&component.name)],
    };

    let object = match &component.node {
        SchemaNode::Object(object) => Some(object),
        SchemaNode::Nullable(inner) => match inner.as_ref() {
            SchemaNode::Object(object) => Some(object),
            _ => None,
        },
        _ => None,
    };
    if let Some(object) = object.filter(|o| !o.properties.is_empty()) {
        lines.push(String::new());
        for (property, node) in &object.properties {
            let presence = if object.is_required(property) {
                "required"
            } else {
                "optional"
            };
            lines.push(format!("- {property} ({presence}): {}", type_label(node)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use zodgen_core::{parse, transform};

    use super::*;
    use crate::emitters::environment;

    fn components(yaml: &str) -> ComponentTable {
        transform::transform(&parse::from_yaml(yaml).unwrap())
            .unwrap()
            .components
    }

    const LINKED: &str = r##"
components:
  schemas:
    Order:
      type: object
      required: [pet]
      properties:
        pet:
          $ref: "#/components/schemas/Pet"
    Pet:
      description: A pet for sale
      type: object
      required: [name]
      properties:
        name:
          type: string
        tag:
          $ref: "#/components/schemas/Tag"
    Tag:
      type: string
    Node:
      type: object
      properties:
        next:
          $ref: "#/components/schemas/Node"
    Broken:
      type: object
      properties:
        ghost:
          $ref: "#/components/schemas/Ghost"
"##;

    #[test]
    fn emits_each_component_once_in_document_order() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let (files, graph) = ComponentEmitter::new(&table, &options, &env)
            .emit_all()
            .unwrap();

        let paths: Vec<String> = files.iter().map(GeneratedFile::path).collect();
        assert_eq!(
            paths,
            vec![
                "_components/Order.ts",
                "_components/Pet.ts",
                "_components/Tag.ts",
                "_components/Node.ts",
                "_components/Broken.ts",
            ]
        );
        assert_eq!(graph.dependencies_of("Order"), vec!["Pet"]);
        assert_eq!(graph.dependencies_of("Pet"), vec!["Tag"]);
        assert!(graph.dependencies_of("Node").is_empty());
    }

    #[test]
    fn imports_direct_dependencies() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let (files, _) = ComponentEmitter::new(&table, &options, &env)
            .emit_all()
            .unwrap();

        let pet = &files[1].content;
        assert!(pet.starts_with("import { z } from \"zod\";\nimport { Tag } from \"./Tag\";\n"));
        assert!(pet.contains(" * A pet for sale\n"));
        assert!(pet.contains(" * - name (required): string\n"));
        assert!(pet.contains(" * - tag (optional): Tag\n"));
        assert!(pet.contains("export const Pet = z.object({ name: z.string(), tag: Tag.optional() });"));
        assert!(pet.ends_with("export type Pet = z.infer<typeof Pet>;\n"));
    }

    #[test]
    fn self_reference_is_lazy_and_not_imported() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let (files, _) = ComponentEmitter::new(&table, &options, &env)
            .emit_all()
            .unwrap();

        let node = &files[3].content;
        assert!(!node.contains("import { Node }"));
        assert!(node.contains("next: z.lazy(() => Node).optional()"));
    }

    const MUTUAL: &str = r##"
components:
  schemas:
    Author:
      type: object
      properties:
        books:
          type: array
          items:
            $ref: "#/components/schemas/Book"
    Book:
      type: object
      required: [author]
      properties:
        author:
          $ref: "#/components/schemas/Author"
        series:
          $ref: "#/components/schemas/Series"
    Series:
      type: object
      properties:
        first:
          $ref: "#/components/schemas/Book"
"##;

    #[test]
    fn cycle_members_are_lazy_whichever_is_generated_first() {
        let table = components(MUTUAL);
        let env = environment().unwrap();
        let options = OutputOptions::default();

        let mut forward = ComponentEmitter::new(&table, &options, &env);
        let author = forward.generate("Author").unwrap().unwrap();
        let book = forward.generate("Book").unwrap().unwrap();
        let series = forward.generate("Series").unwrap().unwrap();

        let mut backward = ComponentEmitter::new(&table, &options, &env);
        assert_eq!(backward.generate("Series").unwrap().unwrap(), series);
        assert_eq!(backward.generate("Book").unwrap().unwrap(), book);
        assert_eq!(backward.generate("Author").unwrap().unwrap(), author);

        assert!(author.content.contains("books: z.array(z.lazy(() => Book)).optional()"));
        assert!(book.content.contains(
            "z.object({ author: z.lazy(() => Author), series: z.lazy(() => Series).optional() })"
        ));
        assert!(series.content.contains("first: z.lazy(() => Book).optional()"));
        assert!(book.content.contains("import { Author } from \"./Author\";"));
    }

    #[test]
    fn reserved_and_path_like_names_are_made_safe() {
        let table = components(
            r##"
components:
  schemas:
    class:
      type: string
    v1/Pet:
      type: object
      properties:
        kind:
          $ref: "#/components/schemas/class"
"##,
        );
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let (files, _) = ComponentEmitter::new(&table, &options, &env)
            .emit_all()
            .unwrap();
        assert_eq!(files[0].path(), "_components/class.ts");
        assert!(files[0].content.contains("export const class_ = z.string();"));
        assert!(files[0].content.contains("export type class_ = z.infer<typeof class_>;"));
        assert_eq!(files[1].path(), "_components/v1_Pet.ts");
        assert!(files[1].content.contains("import { class_ } from \"./class\";"));
        assert!(files[1].content.contains("export const v1_Pet = z.object({ kind: class_.optional() });"));
    }

    #[test]
    fn unknown_dependency_is_referenced_without_import() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let (files, _) = ComponentEmitter::new(&table, &options, &env)
            .emit_all()
            .unwrap();

        let broken = &files[4].content;
        assert!(broken.contains("ghost: Ghost.optional()"));
        assert!(!broken.contains("import { Ghost }"));
    }

    #[test]
    fn generate_is_memoized() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let mut emitter = ComponentEmitter::new(&table, &options, &env);

        let first = emitter.generate("Order").unwrap().unwrap();
        let second = emitter.generate("Order").unwrap().unwrap();
        assert_eq!(first, second);
        assert!(emitter.generate("Missing").unwrap().is_none());
    }

    #[test]
    fn header_falls_back_to_label_and_respects_jsdoc_flag() {
        let table = components(LINKED);
        let env = environment().unwrap();
        let options = OutputOptions::default();
        let mut emitter = ComponentEmitter::new(&table, &options, &env);
        let tag = emitter.generate("Tag").unwrap().unwrap();
        assert!(tag.content.contains("/**\n * Tag\n */\nexport const Tag = z.string();"));

        let options = OutputOptions {
            jsdoc: false,
            zod_module: "zod/v4".to_string(),
            ..Default::default()
        };
        let mut emitter = ComponentEmitter::new(&table, &options, &env);
        let tag = emitter.generate("Tag").unwrap().unwrap();
        assert_eq!(
            tag.content,
            "import { z } from \"zod/v4\";\n\nexport const Tag = z.string();\n\nexport type Tag = z.infer<typeof Tag>;\n"
        );
    }
}
