use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level project configuration loaded from `.zodgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZodgenConfig {
    pub input: String,
    pub output: String,
    pub naming: NamingConfig,
    pub output_options: OutputOptions,
}

impl Default for ZodgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/generated".to_string(),
            naming: NamingConfig::default(),
            output_options: OutputOptions::default(),
        }
    }
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from resolved operation name (operationId or route-derived) to custom group name.
    pub aliases: IndexMap<String, String>,
}

/// How operation names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    UseOperationId,
    UseRouteBased,
}

/// Where and how generated modules are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Group directory for component modules. Keep it distinct from every operationId.
    pub components_dir: String,
    /// File stem of each operation module.
    pub operation_file: String,
    /// Extension of generated files.
    pub extension: String,
    /// Suffix appended to relative import specifiers, e.g. `.js`.
    pub import_extension: String,
    /// Module specifier `z` is imported from.
    pub zod_module: String,
    pub jsdoc: bool,
    /// Generate an `index` barrel re-exporting every module.
    pub index: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            components_dir: "_components".to_string(),
            operation_file: "schema".to_string(),
            extension: "ts".to_string(),
            import_extension: String::new(),
            zod_module: "zod".to_string(),
            jsdoc: true,
            index: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".zodgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ZodgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: ZodgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# zodgen configuration
input: openapi.yaml
output: src/generated

naming:
  strategy: use_operation_id  # use_operation_id | use_route_based
  aliases: {}
    # user.create: createUser   # operationId -> custom group name

output_options:
  components_dir: _components  # group directory for component schemas
  operation_file: schema       # <operationId>/schema.ts
  extension: ts
  import_extension: ""         # ".js" for node16/nodenext module resolution
  zod_module: zod
  jsdoc: true
  index: true                  # generate index.ts barrel exports
"#
}
