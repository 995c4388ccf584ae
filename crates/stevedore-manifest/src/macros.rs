//! Reusable instruction fragments.
//!
//! [`conditional_run`] is the one place that decides between the plain RUN
//! form and the cache-mount form understood by newer build frontends.

use std::fmt;

use stevedore_common::constants::PACKAGE_CACHE_DIR;
use stevedore_common::error::{Result, StevedoreError};

use crate::instruction::Instruction;
use crate::shell::ShellCommand;

/// A persistent build cache mounted at `target`.
///
/// Its [`Display`](fmt::Display) output is the canonical cache-mount
/// directive. `Instruction::Run` renders its mount through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheMount {
    target: String,
}

impl CacheMount {
    /// Creates a cache mount. The target is not checked for existence.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is empty.
    pub fn new(target: impl Into<String>) -> Result<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(StevedoreError::invalid(
                "cache mount",
                "target path must not be empty",
            ));
        }
        Ok(Self { target })
    }

    /// The package-manager download cache.
    #[must_use]
    pub fn package_cache() -> Self {
        Self {
            target: PACKAGE_CACHE_DIR.to_owned(),
        }
    }

    /// Mount target path.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for CacheMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--mount=type=cache,target={},mode=0777", self.target)
    }
}

/// Returns the cache-mount directive for `path`.
///
/// A thin wrapper over [`CacheMount::new`] and its `Display` form, for
/// callers assembling an override by hand.
///
/// # Errors
///
/// Returns an error if `path` is empty.
pub fn mount_cache(path: &str) -> Result<String> {
    Ok(CacheMount::new(path)?.to_string())
}

/// RUN `body`, with the package cache mounted when `enable_buildkit` is set.
#[must_use]
pub fn conditional_run(enable_buildkit: bool, body: ShellCommand) -> Instruction {
    conditional_run_with(enable_buildkit, &CacheMount::package_cache(), body)
}

/// RUN `body`, with `cache` mounted when `enable_buildkit` is set.
#[must_use]
pub fn conditional_run_with(
    enable_buildkit: bool,
    cache: &CacheMount,
    body: ShellCommand,
) -> Instruction {
    Instruction::Run {
        cache: enable_buildkit.then(|| cache.clone()),
        command: body.into_string(),
    }
}
