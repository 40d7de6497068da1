//! CLI integration tests.
//!
//! Fixture stages are written for `/bin/sh`.

#![cfg(unix)]

mod common;
mod compile_tests;
mod stages_tests;
mod status_tests;
