//! The block registry.
//!
//! A manifest is made of five named blocks in a fixed order. Each block can
//! be replaced wholesale; replacement never moves it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use stevedore_common::error::{Result, StevedoreError};

use crate::blocks;
use crate::composer::BlockScope;
use crate::instruction::Instruction;

/// Identifier of one block. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockId {
    /// Base image and locale defaults.
    BaseImage,
    /// Service user creation.
    User,
    /// Build arguments and environment variables.
    EnvVars,
    /// Dependency installation and application payload.
    Components,
    /// Ports, privilege drop, and entrypoint.
    Entrypoint,
}

impl BlockId {
    /// Every block, in output order.
    pub const ALL: [Self; 5] = [
        Self::BaseImage,
        Self::User,
        Self::EnvVars,
        Self::Components,
        Self::Entrypoint,
    ];

    /// Canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BaseImage => "BASE_IMAGE",
            Self::User => "USER",
            Self::EnvVars => "ENV_VARS",
            Self::Components => "COMPONENTS",
            Self::Entrypoint => "ENTRYPOINT",
        }
    }

    /// Zero-based position in the output.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockId {
    type Err = StevedoreError;

    /// Accepts the canonical name in any case, with `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| StevedoreError::UnknownBlock { name: s.to_owned() })
    }
}

/// Function that produces a block's instructions from the render scope.
pub type BlockFn = fn(&BlockScope<'_>) -> Result<Vec<Instruction>>;

/// What a block emits.
#[derive(Clone)]
pub enum BlockBody {
    /// The generator's own instructions for the block.
    Standard(BlockFn),
    /// Caller-supplied instructions, emitted as given.
    Replaced(Vec<Instruction>),
}

impl BlockBody {
    /// Whether the block was replaced by the caller.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

impl fmt::Debug for BlockBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(_) => f.write_str("Standard"),
            Self::Replaced(instructions) => f.debug_tuple("Replaced").field(instructions).finish(),
        }
    }
}

/// The five blocks, one body each, held in output order.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    bodies: [BlockBody; 5],
}

impl BlockRegistry {
    /// A registry with the generator's own instructions for every block.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: BlockId::ALL.map(|id| BlockBody::Standard(blocks::standard(id))),
        }
    }

    /// The shared, process-wide standard registry.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<BlockRegistry> = OnceLock::new();
        STANDARD.get_or_init(Self::new)
    }

    /// A standard registry with the given blocks replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::DuplicateBlock`] if one block is replaced
    /// more than once.
    pub fn with_overrides<I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (BlockId, Vec<Instruction>)>,
    {
        let mut unique = BTreeMap::new();
        for (id, instructions) in overrides {
            if unique.insert(id, instructions).is_some() {
                return Err(StevedoreError::DuplicateBlock {
                    block: id.name().to_owned(),
                });
            }
        }

        let mut registry = Self::new();
        for (id, instructions) in unique {
            tracing::debug!(block = %id, count = instructions.len(), "overriding block");
            registry.bodies[id.position()] = BlockBody::Replaced(instructions);
        }
        Ok(registry)
    }

    /// Like [`Self::with_overrides`], with blocks named by text.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::UnknownBlock`] for an unrecognised name and
    /// [`StevedoreError::DuplicateBlock`] if two names denote one block.
    pub fn with_named_overrides<I, S>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Instruction>)>,
        S: AsRef<str>,
    {
        let parsed = overrides
            .into_iter()
            .map(|(name, instructions)| {
                name.as_ref()
                    .parse::<BlockId>()
                    .map(|id| (id, instructions))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_overrides(parsed)
    }

    /// The body registered for `id`.
    #[must_use]
    pub fn get(&self, id: BlockId) -> &BlockBody {
        &self.bodies[id.position()]
    }

    /// Every block with its body, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockBody)> {
        BlockId::ALL.into_iter().zip(self.bodies.iter())
    }

    /// Produces the instructions for one block.
    ///
    /// # Errors
    ///
    /// Returns an error if a standard block cannot render the scope.
    pub fn execute(&self, id: BlockId, scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
        match self.get(id) {
            BlockBody::Standard(render) => render(scope),
            BlockBody::Replaced(instructions) => Ok(instructions.clone()),
        }
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_order_is_fixed() {
        let names: Vec<_> = BlockId::ALL.iter().map(|id| id.name()).collect();
        assert_eq!(
            names,
            vec!["BASE_IMAGE", "USER", "ENV_VARS", "COMPONENTS", "ENTRYPOINT"]
        );
        assert!(BlockId::BaseImage < BlockId::Entrypoint);
    }

    #[test]
    fn names_parse_loosely() {
        assert_eq!("env-vars".parse::<BlockId>().expect("parse"), BlockId::EnvVars);
        assert_eq!("ENTRYPOINT".parse::<BlockId>().expect("parse"), BlockId::Entrypoint);
        assert_eq!(" user ".parse::<BlockId>().expect("parse"), BlockId::User);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "HEALTHCHECK".parse::<BlockId>().expect_err("unknown");
        assert!(matches!(err, StevedoreError::UnknownBlock { .. }));
    }

    #[test]
    fn standard_registry_has_no_overrides() {
        assert!(BlockRegistry::standard().iter().all(|(_, body)| !body.is_replaced()));
    }

    #[test]
    fn override_replaces_only_its_block() {
        let registry = BlockRegistry::with_overrides([(
            BlockId::User,
            vec![Instruction::Raw("USER nobody".into())],
        )])
        .expect("valid");
        let replaced: Vec<_> = registry
            .iter()
            .filter(|(_, body)| body.is_replaced())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(replaced, vec![BlockId::User]);
    }

    #[test]
    fn duplicate_override_is_rejected() {
        let result = BlockRegistry::with_overrides([
            (BlockId::User, Vec::new()),
            (BlockId::User, Vec::new()),
        ]);
        match result {
            Err(StevedoreError::DuplicateBlock { block }) => assert_eq!(block, "USER"),
            other => panic!("expected DuplicateBlock, got {other:?}"),
        }
    }

    #[test]
    fn named_overrides_detect_aliases() {
        let result = BlockRegistry::with_named_overrides([
            ("env_vars", Vec::new()),
            ("ENV-VARS", Vec::new()),
        ]);
        assert!(matches!(result, Err(StevedoreError::DuplicateBlock { .. })));
    }

    #[test]
    fn iteration_follows_block_order() {
        let ids: Vec<_> = BlockRegistry::new().iter().map(|(id, _)| id).collect();
        assert_eq!(ids, BlockId::ALL.to_vec());
    }
}
