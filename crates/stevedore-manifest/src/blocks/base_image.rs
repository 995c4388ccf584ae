//! BASE_IMAGE: the base image, labels, and locale defaults.

use stevedore_common::constants::{BASE_STAGE, LOCALE_ENV};
use stevedore_common::error::Result;

use crate::composer::BlockScope;
use crate::instruction::Instruction;

/// Renders the BASE_IMAGE block.
///
/// # Errors
///
/// Never fails; the signature matches [`crate::block::BlockFn`].
pub fn render(scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
    let ctx = scope.ctx;
    let mut out = vec![Instruction::From {
        image: ctx.base_image.clone(),
        stage: Some(BASE_STAGE.to_owned()),
    }];
    out.extend(ctx.labels.iter().map(|(key, value)| Instruction::label(key, value)));
    out.extend(LOCALE_ENV.iter().map(|(name, value)| Instruction::env(name, value)));
    out.push(Instruction::User("root".to_owned()));
    Ok(out)
}
