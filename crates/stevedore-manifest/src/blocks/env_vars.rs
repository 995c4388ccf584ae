//! ENV_VARS: build arguments mirrored into the runtime environment.

use stevedore_common::constants::{ENV_CACHE_DIR, ENV_CONTAINERIZED, ENV_HOME, ENV_INSTALL_PATH};
use stevedore_common::error::Result;

use crate::composer::BlockScope;
use crate::instruction::Instruction;

/// Renders the ENV_VARS block.
///
/// # Errors
///
/// Never fails; the signature matches [`crate::block::BlockFn`].
pub fn render(scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
    let paths = scope.paths;
    let fixed = [
        (ENV_INSTALL_PATH, Some(paths.install.as_str())),
        (ENV_HOME, Some(paths.home.as_str())),
        (ENV_CACHE_DIR, Some(paths.cache_dir.as_str())),
        (ENV_CONTAINERIZED, Some("true")),
    ];
    let declared = scope
        .ctx
        .envs
        .iter()
        .map(|env| (env.name.as_str(), env.value.as_deref()));

    Ok(fixed
        .into_iter()
        .chain(declared)
        .flat_map(|(name, default)| Instruction::declare(name, default))
        .collect())
}
