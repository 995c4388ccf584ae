//! Path expansion.
//!
//! Symbolic locations (a root plus a relative suffix) are joined into
//! absolute paths exactly once per render, in [`ExpandedPaths::from_context`].

use stevedore_common::constants::{
    CACHE_DIR_SUFFIX, ENTRYPOINT_SCRIPT, PYTHON_INSTALL_DIR, REQUIREMENTS_FILE, VENV_DIR,
};

use crate::context::RenderContext;

/// Joins `relative` onto `root`, normalising the separator between them.
///
/// A leading `./` or `/` on `relative` is dropped, as are trailing slashes
/// on `root`.
#[must_use]
pub fn expand(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = relative.trim_start_matches("./").trim_start_matches('/');
    match (root.is_empty(), relative.is_empty()) {
        (true, true) => "/".to_owned(),
        (false, true) => root.to_owned(),
        _ => format!("{root}/{relative}"),
    }
}

/// Every absolute path the blocks interpolate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedPaths {
    /// Installation root.
    pub install: String,
    /// Home directory of the service user.
    pub home: String,
    /// Derived cache directory.
    pub cache_dir: String,
    /// Virtual environment root.
    pub venv: String,
    /// Executables directory inside the virtual environment.
    pub venv_bin: String,
    /// Directory holding managed interpreter installs.
    pub python_install: String,
    /// Dependency manifest.
    pub requirements: String,
    /// Entrypoint script.
    pub entrypoint: String,
}

impl ExpandedPaths {
    /// Expands all paths from the resolved context.
    #[must_use]
    pub fn from_context(ctx: &RenderContext) -> Self {
        let install = expand(&ctx.install_path, "");
        let home = expand(&ctx.home_dir, "");
        Self {
            cache_dir: expand(&install, CACHE_DIR_SUFFIX),
            venv: expand(&home, VENV_DIR),
            venv_bin: expand(&expand(&home, VENV_DIR), "bin"),
            python_install: expand(&home, PYTHON_INSTALL_DIR),
            requirements: expand(&install, REQUIREMENTS_FILE),
            entrypoint: expand(&install, ENTRYPOINT_SCRIPT),
            install,
            home,
        }
    }
}
