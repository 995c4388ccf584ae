//! # stevedore-manifest
//!
//! Generates container build manifests from a [`Specification`].
//!
//! A render runs in four stages:
//! - **Context**: the specification is resolved into a [`RenderContext`],
//!   applying defaults and rejecting unusable values.
//! - **Blocks**: five named blocks, each independently replaceable, produce
//!   structured [`Instruction`]s in a fixed order.
//! - **Composer**: paths are expanded once, blocks are run, and their output
//!   is concatenated with each instruction tagged by its block.
//! - **Emitter**: the sequence is rendered to text behind the optional
//!   frontend directive and banner.
//!
//! Values interpolated into shell commands are quoted by [`shell::quote`];
//! [`shell::ShellCommand`] is the only way blocks build RUN bodies.
//!
//! # Example
//!
//! ```rust
//! use stevedore_common::types::Specification;
//!
//! let spec = Specification {
//!     base_image: Some("debian:12".into()),
//!     user: Some("bento".into()),
//!     uid: Some(1034),
//!     install_path: Some("/home/bento/bento".into()),
//!     home_dir: Some("/home/bento".into()),
//!     python_version: Some("3.11".into()),
//!     port: Some(3000),
//!     ..Specification::default()
//! };
//! let text = stevedore_manifest::render(&spec).expect("valid specification");
//! assert!(text.contains("FROM debian:12 AS base-container"));
//! ```
//!
//! [`Specification`]: stevedore_common::types::Specification
//! [`RenderContext`]: context::RenderContext
//! [`Instruction`]: instruction::Instruction

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod block;
pub mod blocks;
pub mod composer;
pub mod context;
pub mod digest;
pub mod emitter;
pub mod instruction;
pub mod macros;
pub mod manifest;
pub mod paths;
pub mod shell;

pub use block::{BlockId, BlockRegistry};
pub use manifest::{Manifest, generate, generate_with, render};
