//! `stv plan` — Show what each block would emit without writing a manifest.

use clap::Args;

use super::SpecArgs;
use crate::output;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Specification input and render flags.
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Print every instruction with its block as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `plan` command.
///
/// # Errors
///
/// Returns an error if the specification is invalid.
pub fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let (spec, registry) = args.spec.load()?;
    let manifest = stevedore_manifest::generate_with(&spec, &registry)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&manifest.records())?);
        return Ok(());
    }

    println!("Manifest plan for: {}", args.spec.file.display());
    println!("{}", output::RULE);
    println!();
    for line in output::block_summary(&manifest) {
        println!("  {line}");
    }
    println!();
    println!("  {} instruction(s) in total.", manifest.steps().len());
    println!("  digest: {}", manifest.digest());
    Ok(())
}
