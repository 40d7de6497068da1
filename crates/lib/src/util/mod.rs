//! Shared utilities.
//!
//! Common utilities used across the crate including modification-time
//! helpers and test helpers.

pub mod mtime;

#[cfg(test)]
pub mod testutil;
