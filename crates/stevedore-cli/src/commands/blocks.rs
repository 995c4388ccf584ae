//! `stv blocks` — List the overridable blocks in output order.

use clap::Args;
use stevedore_manifest::BlockId;

/// Arguments for the `blocks` command.
#[derive(Args, Debug)]
pub struct BlocksArgs {}

/// Executes the `blocks` command.
///
/// # Errors
///
/// This command does not fail.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(_args: BlocksArgs) -> anyhow::Result<()> {
    for id in BlockId::ALL {
        println!("{:>2}. {id}", id.position() + 1);
    }
    Ok(())
}
