//! aztec CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use aztec::config::AztecConfig;
use aztec::generate::ArtifactKind;
use aztec::observability::{self, ObservabilityConfig};
use aztec::pipeline::CrudPipeline;
use aztec_cli_lib::{
    parse_layers, InspectCommand, MakeArtifactCommand, MakeCrudCommand, MakeModuleCommand, PublishStubsCommand,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aztec")]
#[command(version)]
#[command(about = "Layered CRUD generation for modular PHP projects", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user and ./aztec.toml configs)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never prompt; keep existing files unless --force is given
    #[arg(short = 'n', long, global = true)]
    no_interaction: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate layered CRUD for a module model
    MakeCrud {
        /// Module name
        module: String,
        /// Model name
        model: String,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
        /// Comma-separated list of layers to generate (e.g. controller,requests,resource)
        #[arg(long, value_name = "LAYERS")]
        only: Option<String>,
    },
    /// Create a new module
    MakeModule {
        /// The name of the module
        name: String,
        /// Overwrite an existing module without asking
        #[arg(long)]
        force: bool,
    },
    /// Create a single bare class inside a module
    Make {
        /// What to create: model, controller, request or resource
        kind: ArtifactKind,
        /// Module name
        module: String,
        /// Class name, optionally with a sub-path (e.g. Admin/PostController)
        name: String,
        /// Replace the class if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Print the discovered model spec as JSON
    Inspect {
        /// Module name
        module: String,
        /// Model name
        model: String,
    },
    /// Copy the default stubs into a directory for customization
    PublishStubs {
        /// Destination (defaults to `stubs_path`, then stubs/aztec)
        dir: Option<PathBuf>,
        /// Replace stubs that were already published
        #[arg(long)]
        force: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<AztecConfig> {
    match path {
        Some(path) => AztecConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => AztecConfig::load().context("Failed to load configuration"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(&ObservabilityConfig::new("aztec").with_json(cli.json_logs));

    let config = load_config(cli.config.as_deref())?;
    let interactive = !cli.no_interaction;

    match cli.command {
        Commands::MakeCrud {
            module,
            model,
            force,
            only,
        } => {
            let only = only.as_deref().map(parse_layers).transpose()?;
            let pipeline = CrudPipeline::new(config);
            let report = MakeCrudCommand::new(module, model)
                .force(force)
                .only(only)
                .interactive(interactive)
                .execute(&pipeline)?;
            let failed = report.failures().count();
            if failed > 0 {
                bail!("{failed} layer(s) failed");
            }
        }
        Commands::MakeModule { name, force } => {
            MakeModuleCommand::new(name)
                .force(force)
                .interactive(interactive)
                .execute(&config)?;
        }
        Commands::Make {
            kind,
            module,
            name,
            force,
        } => {
            MakeArtifactCommand::new(kind, module, name).force(force).execute(&config)?;
        }
        Commands::Inspect { module, model } => {
            InspectCommand::new(module, model).execute(&CrudPipeline::new(config))?;
        }
        Commands::PublishStubs { dir, force } => {
            PublishStubsCommand::new(dir).force(force).execute(&config)?;
        }
    }

    Ok(())
}
