//! Dependency declarations.
//!
//! Dependencies are declared in the `[deps]` table of `stagebuild.toml`. This
//! module parses their sources and resolves local (`path:`) dependencies to
//! the configuration files the lock staleness check watches. Fetchable
//! (`git:`) dependencies are recorded but never inspected here; their lock
//! state belongs to the fetch subsystem.
//!
//! # Modules
//!
//! - [`source`] - URL parsing for dependency sources
//! - [`resolve`] - Turning declarations into [`DependencyRecord`]s

pub mod resolve;
pub mod source;
mod types;

pub use resolve::{DepsError, resolve_deps};
pub use types::*;
