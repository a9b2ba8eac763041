pub mod components;
pub mod index;
pub mod operations;

use minijinja::Environment;
use zodgen_core::config::OutputOptions;

use crate::error::GeneratorError;

/// Build the template environment shared by every emitter.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template(
        "component.ts.j2",
        include_str!("../../templates/component.ts.j2"),
    )?;
    env.add_template(
        "operation.ts.j2",
        include_str!("../../templates/operation.ts.j2"),
    )?;
    env.add_template("index.ts.j2", include_str!("../../templates/index.ts.j2"))?;
    Ok(env)
}

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

/// Render a multi-line JSDoc block. Empty lines become bare ` *` separators.
pub(crate) fn jsdoc_block(lines: &[String]) -> String {
    let mut out = String::from("/**\n");
    for line in lines {
        let line = escape_jsdoc(line.trim_end());
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(&format!(" * {line}\n"));
        }
    }
    out.push_str(" */");
    out
}

/// Render a single-line JSDoc comment, collapsing any whitespace runs.
pub(crate) fn jsdoc_line(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("/** {} */", escape_jsdoc(&text))
}

/// Relative module specifier of a component module.
///
/// - `prefix = "."` → `"./Pet"`
/// - `prefix = "../_components"` → `"../_components/Pet"`
pub(crate) fn component_specifier(prefix: &str, name: &str, options: &OutputOptions) -> String {
    format!("{prefix}/{}{}", path_segment(name), options.import_extension)
}

/// A name usable as exactly one path segment under the output directory.
///
/// Separators and control characters become `_`, as do the dots of `.`
/// and `..`; an empty name becomes `_`.
pub(crate) fn path_segment(name: &str) -> String {
    let segment: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | ':') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if segment.chars().all(|c| c == '.') {
        "_".repeat(segment.len().max(1))
    } else {
        segment
    }
}

/// Split free text into JSDoc lines.
pub(crate) fn text_lines(text: &str) -> Vec<String> {
    text.trim().lines().map(|l| l.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_loads_templates() {
        let env = environment().unwrap();
        assert!(env.get_template("component.ts.j2").is_ok());
        assert!(env.get_template("operation.ts.j2").is_ok());
        assert!(env.get_template("index.ts.j2").is_ok());
    }

    #[test]
    fn jsdoc_block_escapes_terminators() {
        let block = jsdoc_block(&[
            "Closes */ early".to_string(),
            String::new(),
            "- id (required): string".to_string(),
        ]);
        assert_eq!(
            block,
            "/**\n * Closes *\\/ early\n *\n * - id (required): string\n */"
        );
    }

    #[test]
    fn jsdoc_line_collapses_whitespace() {
        assert_eq!(jsdoc_line("201:  Created\n user"), "/** 201: Created user */");
    }

    #[test]
    fn specifiers_carry_import_extension() {
        let options = OutputOptions {
            import_extension: ".js".to_string(),
            ..Default::default()
        };
        assert_eq!(
            component_specifier("../_components", "Pet", &options),
            "../_components/Pet.js"
        );
        assert_eq!(
            component_specifier(".", "Pet", &OutputOptions::default()),
            "./Pet"
        );
        assert_eq!(
            component_specifier(".", "v1/Pet", &OutputOptions::default()),
            "./v1_Pet"
        );
    }

    #[test]
    fn path_segments_stay_inside_their_directory() {
        assert_eq!(path_segment("user.create"), "user.create");
        assert_eq!(path_segment("../escape"), ".._escape");
        assert_eq!(path_segment("a/b\\c:d"), "a_b_c_d");
        assert_eq!(path_segment(".."), "__");
        assert_eq!(path_segment("."), "_");
        assert_eq!(path_segment(""), "_");
        assert_eq!(path_segment("tab\there"), "tab_here");
    }
}
