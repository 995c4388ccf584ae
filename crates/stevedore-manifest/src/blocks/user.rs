//! USER: creates the service account.
//!
//! The single RUN is a no-op when the account already exists, prefers
//! `useradd`/`groupadd`, falls back to busybox `adduser`/`addgroup`, and
//! exits non-zero when neither toolchain is installed.

use stevedore_common::error::Result;

use crate::composer::BlockScope;
use crate::instruction::Instruction;
use crate::shell::ShellCommand;

/// Builds the account-creation command.
#[must_use]
pub fn create_user_command(user: &str, uid: u32, gid: u32, home: &str) -> ShellCommand {
    ShellCommand::new("if id -u")
        .arg(user)
        .literal(">/dev/null 2>&1; then :")
        .literal("; elif command -v useradd >/dev/null 2>&1; then groupadd -g")
        .arg(gid)
        .literal("-o")
        .arg(user)
        .literal("&& useradd -m -d")
        .arg(home)
        .literal("-u")
        .arg(uid)
        .literal("-g")
        .arg(gid)
        .literal("-o -r")
        .arg(user)
        .literal("; elif command -v adduser >/dev/null 2>&1; then addgroup -g")
        .arg(gid)
        .arg(user)
        .literal("&& adduser -D -h")
        .arg(home)
        .literal("-u")
        .arg(uid)
        .literal("-G")
        .arg(user)
        .arg(user)
        .literal("; else echo 'no supported user-management tool found' >&2 && exit 1")
        .literal("; fi")
}

/// Renders the USER block.
///
/// # Errors
///
/// Never fails; the signature matches [`crate::block::BlockFn`].
pub fn render(scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
    let ctx = scope.ctx;
    Ok(vec![Instruction::run(create_user_command(
        &ctx.user,
        ctx.uid,
        ctx.gid,
        &scope.paths.home,
    ))])
}
