//! `stv render` — Render a build manifest from a specification file.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use stevedore_common::types::Sha256Hash;

use super::SpecArgs;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Specification input and render flags.
    #[command(flatten)]
    pub spec: SpecArgs,

    /// Write the manifest to this file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also print the manifest's content digest.
    #[arg(long)]
    pub digest: bool,

    /// Fail without writing anything unless the manifest has this digest.
    #[arg(long, value_name = "SHA256")]
    pub expect_digest: Option<Sha256Hash>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if the specification is invalid, the digest differs
/// from `--expect-digest`, or the output file cannot be written.
pub fn execute(args: RenderArgs) -> anyhow::Result<()> {
    let (spec, registry) = args.spec.load()?;
    let manifest = stevedore_manifest::generate_with(&spec, &registry)?;
    let text = manifest.render();

    if let Some(expected) = &args.expect_digest {
        let actual = manifest.digest();
        if actual != *expected {
            anyhow::bail!("manifest digest mismatch: expected {expected}, rendered {actual}");
        }
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "manifest written");
            if args.digest {
                println!("{}", manifest.digest());
            }
        }
        None => {
            print!("{text}");
            if args.digest {
                eprintln!("{}", manifest.digest());
            }
        }
    }
    Ok(())
}
