//! stagebuild-lib: Core types and logic for stagebuild
//!
//! This crate provides the staleness-aware stage orchestrator:
//! - `StageRegistry`: named stages, resolved in caller order
//! - `LockManifest`: timestamp file refreshed when local dependencies change
//! - `Pipeline`: runs stages in order and aggregates their outcomes
//! - `ConsolidationGate`: post-processing that only runs after real work
//! - `Project`: wires a `stagebuild.toml` into a ready-to-run pipeline

pub mod config;
pub mod consts;
pub mod deps;
pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod project;
pub mod stage;
pub mod util;
