//! # stevedore-common
//!
//! Shared types, error definitions, specification loading, and constants
//! used across the entire Stevedore workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the input model that the manifest generator
//! consumes.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
