//! COMPONENTS: support assets, dependencies, and the application payload.
//!
//! Layers run from least to most frequently changing: support assets and
//! system packages first, the application payload last.

use stevedore_common::constants::{
    BOOTSTRAP_TOOL, ENV_PATH, ENV_VIRTUAL_ENV, INSTALLER_ENV, PYTHON_ASSETS_DIR,
    SUPPORT_ASSETS_DIR, SYSTEM_PACKAGE_CACHE_DIR,
};
use stevedore_common::error::Result;

use crate::composer::BlockScope;
use crate::instruction::Instruction;
use crate::macros::{CacheMount, conditional_run, conditional_run_with};
use crate::shell::{ShellCommand, quote};

/// Renders the COMPONENTS block.
///
/// # Errors
///
/// Returns an error if a cache mount cannot be built.
pub fn render(scope: &BlockScope<'_>) -> Result<Vec<Instruction>> {
    let ctx = scope.ctx;
    let paths = scope.paths;
    let owner = format!("{0}:{0}", ctx.user);
    let mut out = Vec::new();

    out.push(Instruction::run(
        ShellCommand::new("mkdir -p")
            .arg(&paths.install)
            .and(ShellCommand::new("chown -R").arg(&owner).arg(&paths.install)),
    ));
    out.push(Instruction::workdir(&paths.install));
    out.push(Instruction::copy_owned(
        &owner,
        &format!("./{SUPPORT_ASSETS_DIR}"),
        &format!("./{SUPPORT_ASSETS_DIR}/"),
    ));

    if !ctx.system_packages.is_empty() {
        let cache = CacheMount::new(SYSTEM_PACKAGE_CACHE_DIR)?;
        out.push(conditional_run_with(
            ctx.enable_buildkit,
            &cache,
            system_packages_command(&ctx.system_packages),
        ));
    }

    out.extend(
        ctx.pre_install
            .iter()
            .map(|command| Instruction::run(ShellCommand::verbatim(command.clone()))),
    );

    out.push(Instruction::run(bootstrap_command()));
    out.push(Instruction::run(
        ShellCommand::assign("UV_PYTHON_INSTALL_DIR", &paths.python_install)
            .literal("uv venv --python")
            .arg(&ctx.python_version)
            .arg(&paths.venv)
            .and(ShellCommand::new("chown -R").arg(&owner).arg(&paths.venv)),
    ));
    out.push(Instruction::env(ENV_VIRTUAL_ENV, &paths.venv));
    out.extend(
        INSTALLER_ENV
            .iter()
            .map(|(name, value)| Instruction::env(name, value)),
    );
    out.push(Instruction::Env {
        name: ENV_PATH.to_owned(),
        value: format!("{}:${{PATH}}", quote(&paths.venv_bin)),
    });

    for package in &ctx.preheat {
        if is_valid_preheat(package) {
            out.push(conditional_run(ctx.enable_buildkit, preheat_command(package)));
        } else {
            tracing::warn!(package = %package.escape_debug(), "skipping invalid preheat entry");
        }
    }

    out.push(Instruction::copy_owned(
        &owner,
        &format!("./{PYTHON_ASSETS_DIR}"),
        &format!("./{PYTHON_ASSETS_DIR}/"),
    ));
    out.push(conditional_run(
        ctx.enable_buildkit,
        ShellCommand::new("uv pip install -r").arg(&paths.requirements),
    ));

    out.extend(
        ctx.post_install
            .iter()
            .map(|command| Instruction::run(ShellCommand::verbatim(command.clone()))),
    );

    out.push(Instruction::copy_owned(&owner, ".", "./"));
    Ok(out)
}

/// Installs the bootstrap tool only when it is not already on `PATH`.
#[must_use]
pub fn bootstrap_command() -> ShellCommand {
    ShellCommand::new("command -v")
        .arg(BOOTSTRAP_TOOL)
        .literal(">/dev/null 2>&1")
        .or(ShellCommand::new("pip install").arg(BOOTSTRAP_TOOL))
}

/// Best-effort install of one package. Failure is reported, never fatal.
#[must_use]
pub fn preheat_command(package: &str) -> ShellCommand {
    ShellCommand::new("uv pip install").arg(package).or(
        ShellCommand::new("echo 'preheat failed, continuing:'")
            .arg(package)
            .literal(">&2"),
    )
}

/// Whether a preheat entry can be rendered as a package argument.
#[must_use]
pub fn is_valid_preheat(package: &str) -> bool {
    !package.trim().is_empty()
        && !package.starts_with('-')
        && !package.chars().any(char::is_control)
}

/// Installs OS packages with `apt-get`, falling back to `apk`.
#[must_use]
pub fn system_packages_command(packages: &[String]) -> ShellCommand {
    ShellCommand::new(
        "if command -v apt-get >/dev/null 2>&1; then apt-get update && apt-get install -y --no-install-recommends",
    )
    .args(packages)
    .literal("&& rm -rf /var/lib/apt/lists/*")
    .literal("; elif command -v apk >/dev/null 2>&1; then apk add --no-cache")
    .args(packages)
    .literal("; else echo 'no supported package manager found' >&2 && exit 1")
    .literal("; fi")
}
