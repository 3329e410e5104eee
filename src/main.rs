//! Outbind CLI - validate and render binding manifests

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use outbind::{FixSuggestion, FunctionDefinition, Manifest, OutbindError};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "outbind")]
#[command(about = "Output-binding configuration for command functions")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a manifest and report each function's binding
    Validate {
        /// Path to the manifest YAML file
        file: PathBuf,
    },

    /// Apply a manifest and print the resulting descriptors
    Render {
        /// Path to the manifest YAML file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Validate { file } => validate_manifest(&file),
        Commands::Render { file, format } => render_manifest(&file, format),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e
            .downcast_ref::<OutbindError>()
            .and_then(|err| err.fix_suggestion())
        {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load(file: &Path) -> Result<Vec<FunctionDefinition>> {
    let manifest = Manifest::from_file(file)
        .with_context(|| format!("Failed to load manifest {}", file.display()))?;
    Ok(manifest.apply()?)
}

fn validate_manifest(file: &Path) -> Result<()> {
    let definitions = load(file)?;

    println!("{} Manifest '{}' is valid", "✓".green(), file.display());
    for definition in &definitions {
        println!(
            "  {} -> {}",
            definition.command_name(),
            definition.output_binding.to_string().cyan()
        );
    }

    Ok(())
}

fn render_manifest(file: &Path, format: Format) -> Result<()> {
    let definitions = load(file)?;

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&definitions)
            .context("Failed to render descriptors as JSON")?,
        Format::Yaml => serde_yaml::to_string(&definitions)
            .context("Failed to render descriptors as YAML")?,
    };
    println!("{}", rendered);

    Ok(())
}
