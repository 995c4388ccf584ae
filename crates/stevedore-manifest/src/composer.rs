//! Composition of blocks into one instruction sequence.
//!
//! Paths are expanded once per render into [`ExpandedPaths`] and handed to
//! every block alongside the context. Blocks run strictly in
//! [`BlockId::ALL`] order; their output is tagged with the block id.

use stevedore_common::error::Result;

use crate::block::{BlockId, BlockRegistry};
use crate::context::RenderContext;
use crate::instruction::TaggedInstruction;
use crate::paths::ExpandedPaths;

/// Everything a block reads while rendering.
#[derive(Debug, Clone, Copy)]
pub struct BlockScope<'a> {
    /// Resolved bindings.
    pub ctx: &'a RenderContext,
    /// Absolute paths derived from the bindings.
    pub paths: &'a ExpandedPaths,
}

/// Runs every block of `registry` against `ctx` and concatenates the output.
///
/// # Errors
///
/// Returns the first error raised by a block. No partial sequence is
/// returned.
pub fn compose(ctx: &RenderContext, registry: &BlockRegistry) -> Result<Vec<TaggedInstruction>> {
    let paths = ExpandedPaths::from_context(ctx);
    let scope = BlockScope {
        ctx,
        paths: &paths,
    };

    let mut sequence = Vec::new();
    for id in BlockId::ALL {
        let instructions = registry.execute(id, &scope)?;
        tracing::debug!(
            block = %id,
            count = instructions.len(),
            replaced = registry.get(id).is_replaced(),
            "composed block"
        );
        sequence.extend(
            instructions
                .into_iter()
                .map(|instruction| TaggedInstruction {
                    block: id,
                    instruction,
                }),
        );
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use stevedore_common::types::Specification;

    use super::*;
    use crate::context::resolve;
    use crate::instruction::Instruction;

    fn context() -> RenderContext {
        resolve(&Specification {
            base_image: Some("debian:12".into()),
            user: Some("bento".into()),
            uid: Some(1034),
            install_path: Some("/home/bento/bento".into()),
            home_dir: Some("/home/bento".into()),
            python_version: Some("3.11".into()),
            port: Some(3000),
            ..Specification::default()
        })
        .expect("resolve")
    }

    fn block_sequence(steps: &[TaggedInstruction]) -> Vec<BlockId> {
        let mut blocks: Vec<BlockId> = steps.iter().map(|s| s.block).collect();
        blocks.dedup();
        blocks
    }

    #[test]
    fn blocks_appear_in_fixed_order() {
        let steps = compose(&context(), BlockRegistry::standard()).expect("compose");
        assert_eq!(block_sequence(&steps), BlockId::ALL.to_vec());
    }

    #[test]
    fn override_keeps_position() {
        let registry = BlockRegistry::with_overrides([(
            BlockId::BaseImage,
            vec![Instruction::Raw("FROM scratch".into())],
        )])
        .expect("registry");
        let steps = compose(&context(), &registry).expect("compose");
        assert_eq!(steps[0].instruction.to_string(), "FROM scratch");
        assert_eq!(steps[0].block, BlockId::BaseImage);
        assert_eq!(block_sequence(&steps), BlockId::ALL.to_vec());
    }

    #[test]
    fn empty_override_drops_block_output_only() {
        let registry =
            BlockRegistry::with_overrides([(BlockId::EnvVars, Vec::new())]).expect("registry");
        let steps = compose(&context(), &registry).expect("compose");
        assert_eq!(
            block_sequence(&steps),
            vec![
                BlockId::BaseImage,
                BlockId::User,
                BlockId::Components,
                BlockId::Entrypoint
            ]
        );
    }
}
