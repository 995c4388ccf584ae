//! CLI command definitions and dispatch.

pub mod blocks;
pub mod plan;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stevedore_common::config::load_specification;
use stevedore_common::types::Specification;
use stevedore_manifest::BlockRegistry;
use stevedore_manifest::instruction::Instruction;

/// Stevedore — block-overridable container build-manifest generator.
#[derive(Parser, Debug)]
#[command(name = "stv", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a manifest from a specification file.
    Render(render::RenderArgs),
    /// Show each block's instruction count without writing a manifest.
    Plan(plan::PlanArgs),
    /// List the blocks in output order.
    Blocks(blocks::BlocksArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => render::execute(args),
        Command::Plan(args) => plan::execute(args),
        Command::Blocks(args) => blocks::execute(args),
    }
}

/// Specification input shared by `render` and `plan`.
#[derive(Args, Debug)]
pub struct SpecArgs {
    /// Path to the specification file (YAML or JSON).
    #[arg(default_value = "stevedore.yaml")]
    pub file: PathBuf,

    /// Enable cache mounts and the frontend directive.
    #[arg(long, env = "STV_BUILDKIT")]
    pub buildkit: bool,

    /// Omit the generated-file banner.
    #[arg(long)]
    pub no_header: bool,

    /// Build-frontend identifier for the directive line.
    #[arg(long, env = "STV_FRONTEND")]
    pub frontend: Option<String>,

    /// Replace a block with the contents of a file.
    #[arg(long = "override", value_name = "BLOCK=FILE")]
    pub overrides: Vec<String>,
}

impl SpecArgs {
    /// Loads the specification, applies flag overrides, and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the specification or an override file cannot be
    /// read, or an override names an unknown or repeated block.
    pub fn load(&self) -> anyhow::Result<(Specification, BlockRegistry)> {
        let mut spec = load_specification(&self.file)?;
        if self.buildkit {
            spec.enable_buildkit = Some(true);
        }
        if self.no_header {
            spec.emit_header = Some(false);
        }
        if let Some(frontend) = &self.frontend {
            spec.frontend = Some(frontend.clone());
        }

        let overrides = self
            .overrides
            .iter()
            .map(|raw| parse_override(raw))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let registry = if overrides.is_empty() {
            BlockRegistry::new()
        } else {
            BlockRegistry::with_named_overrides(overrides)?
        };
        Ok((spec, registry))
    }
}

/// Parses `BLOCK=FILE` and reads the replacement instructions from `FILE`.
fn parse_override(raw: &str) -> anyhow::Result<(String, Vec<Instruction>)> {
    let (block, file) = raw
        .split_once('=')
        .with_context(|| format!("override must be BLOCK=FILE, got {raw:?}"))?;
    let instructions = read_override(Path::new(file))?;
    Ok((block.to_owned(), instructions))
}

/// Reads an override file as one pre-rendered instruction unit.
fn read_override(path: &Path) -> anyhow::Result<Vec<Instruction>> {
    tracing::info!(path = %path.display(), "reading block override");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read override {}", path.display()))?;
    let content = content.trim_end();
    if content.is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![Instruction::Raw(content.to_owned())])
    }
}
