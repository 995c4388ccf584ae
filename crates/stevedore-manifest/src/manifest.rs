//! The rendered manifest and the top-level generation entry points.

use std::fmt;

use stevedore_common::error::Result;
use stevedore_common::types::{Sha256Hash, Specification};

use crate::block::{BlockId, BlockRegistry};
use crate::composer;
use crate::context;
use crate::digest::digest_text;
use crate::emitter::{self, EmitOptions};
use crate::instruction::{Instruction, InstructionRecord, TaggedInstruction};

/// A fully composed manifest, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    options: EmitOptions,
    steps: Vec<TaggedInstruction>,
    replaced: Vec<BlockId>,
}

impl Manifest {
    /// Every instruction, tagged with its block, in output order.
    #[must_use]
    pub fn steps(&self) -> &[TaggedInstruction] {
        &self.steps
    }

    /// The instructions produced by one block.
    pub fn block(&self, id: BlockId) -> impl Iterator<Item = &Instruction> {
        self.steps
            .iter()
            .filter(move |step| step.block == id)
            .map(|step| &step.instruction)
    }

    /// Blocks whose content was supplied by the caller.
    #[must_use]
    pub fn replaced_blocks(&self) -> &[BlockId] {
        &self.replaced
    }

    /// Preamble policy the manifest renders with.
    #[must_use]
    pub const fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Serializable records of every instruction.
    #[must_use]
    pub fn records(&self) -> Vec<InstructionRecord> {
        self.steps.iter().map(InstructionRecord::from).collect()
    }

    /// Renders the manifest text.
    #[must_use]
    pub fn render(&self) -> String {
        emitter::emit(&self.options, &self.steps)
    }

    /// SHA-256 of the rendered text.
    #[must_use]
    pub fn digest(&self) -> Sha256Hash {
        digest_text(&self.render())
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Generates a manifest with the standard blocks.
///
/// # Errors
///
/// Returns an error if the specification is missing a required field or
/// holds a value that cannot be rendered.
pub fn generate(spec: &Specification) -> Result<Manifest> {
    generate_with(spec, BlockRegistry::standard())
}

/// Generates a manifest using the blocks in `registry`.
///
/// # Errors
///
/// Returns an error if the specification cannot be resolved or a block
/// fails. Nothing is produced on error.
pub fn generate_with(spec: &Specification, registry: &BlockRegistry) -> Result<Manifest> {
    let ctx = context::resolve(spec)?;
    tracing::info!(base_image = %ctx.base_image, buildkit = ctx.enable_buildkit, "generating manifest");
    let steps = composer::compose(&ctx, registry)?;
    let replaced = registry
        .iter()
        .filter(|(_, body)| body.is_replaced())
        .map(|(id, _)| id)
        .collect();
    Ok(Manifest {
        options: EmitOptions::from_context(&ctx),
        steps,
        replaced,
    })
}

/// Generates and renders a manifest with the standard blocks.
///
/// # Errors
///
/// See [`generate`].
pub fn render(spec: &Specification) -> Result<String> {
    generate(spec).map(|manifest| manifest.render())
}

#[cfg(test)]
mod tests {
    use stevedore_common::error::StevedoreError;

    use super::*;
    use crate::blocks::fixture;

    #[test]
    fn missing_field_produces_no_manifest() {
        let mut spec = fixture::spec();
        spec.port = None;
        assert!(matches!(
            generate(&spec),
            Err(StevedoreError::MissingField { field: "port" })
        ));
    }

    #[test]
    fn block_view_filters_by_origin() {
        let manifest = generate(&fixture::spec()).expect("generate");
        let exposed: Vec<_> = manifest
            .block(BlockId::Entrypoint)
            .filter(|i| i.keyword() == Some("EXPOSE"))
            .map(ToString::to_string)
            .collect();
        assert_eq!(exposed, vec!["EXPOSE 3000", "EXPOSE 3001"]);
    }

    #[test]
    fn replaced_blocks_are_reported() {
        let registry =
            BlockRegistry::with_overrides([(BlockId::User, Vec::new())]).expect("registry");
        let manifest = generate_with(&fixture::spec(), &registry).expect("generate");
        assert_eq!(manifest.replaced_blocks(), [BlockId::User]);
    }

    #[test]
    fn digest_matches_rendered_text() {
        let manifest = generate(&fixture::spec()).expect("generate");
        assert_eq!(manifest.digest(), digest_text(&manifest.to_string()));
    }
}
