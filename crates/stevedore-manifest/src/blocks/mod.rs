//! The generator's own instructions for each block.
//!
//! Each submodule exposes a `render` function with the [`BlockFn`]
//! signature. Callers building an override can call these directly and
//! extend the result.

pub mod base_image;
pub mod components;
pub mod entrypoint;
pub mod env_vars;
pub mod user;

use crate::block::{BlockFn, BlockId};

/// The standard renderer for `id`.
#[must_use]
pub fn standard(id: BlockId) -> BlockFn {
    match id {
        BlockId::BaseImage => base_image::render,
        BlockId::User => user::render,
        BlockId::EnvVars => env_vars::render,
        BlockId::Components => components::render,
        BlockId::Entrypoint => entrypoint::render,
    }
}
