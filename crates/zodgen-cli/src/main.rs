use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use zodgen_core::GeneratedFile;
use zodgen_core::config::{self, CONFIG_FILE_NAME, ZodgenConfig};
use zodgen_core::ir::IrSpec;
use zodgen_core::parse;
use zodgen_core::transform::{self, TransformOptions};
use zodgen_zod::type_mapper::type_label;
use zodgen_zod::{DependencyGraph, compile};

#[derive(Parser)]
#[command(name = "zodgen", about = "OpenAPI 3.x to Zod validator compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Zod modules from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect components, operations and reference cycles of an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new zodgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "zodgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ZodgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_spec(path: &Path, cfg: &ZodgenConfig) -> Result<IrSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    let options = TransformOptions {
        naming_strategy: cfg.naming.strategy,
        aliases: cfg.naming.aliases.clone(),
    };

    let ir = transform::transform_with_options(&parsed, &options)
        .with_context(|| format!("failed to lower {}", path.display()))?;
    Ok(ir)
}

/// Write generated files to disk under the given base directory.
///
/// Refuses any file whose path would leave `base`.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let relative = file.path();
        if !Path::new(&relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("refusing to write {relative} outside {}", base.display());
        }
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));

    let ir = load_spec(&input, &cfg)?;
    let compilation = compile(&ir, &cfg.output_options)?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &compilation.files)?;

    let cycles = compilation.dependencies.find_cycles();
    if !cycles.is_empty() {
        eprintln!(
            "  note: {} reference cycle(s) emitted with z.lazy; run `zodgen inspect` for details",
            cycles.len()
        );
    }

    eprintln!(
        "Generated {} files ({} components, {} operations) in {}",
        compilation.files.len(),
        ir.components.len(),
        ir.operations.len(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = load_spec(&input, &cfg)?;
    let compilation = compile(&ir, &cfg.output_options)?;

    let summary = build_inspect_summary(&ir, &compilation.dependencies);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrSpec, graph: &DependencyGraph) -> serde_json::Value {
    let components: Vec<serde_json::Value> = ir
        .components
        .values()
        .map(|c| {
            serde_json::json!({
                "name": c.name,
                "kind": type_label(&c.node),
                "dependencies": graph.dependencies_of(&c.name),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.operation_id,
                "method": op.method.as_str(),
                "path": op.path,
                "request": op.request_body.is_some(),
                "responses": op.responses.keys().collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "components": components,
        "operations": operations,
        "cycles": graph.find_cycles(),
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
