//! Common utilities for the Wren style engine.
//!
//! This crate provides shared infrastructure used by the other Wren crates:
//! - **Warning System** - de-duplicated, colored terminal diagnostics

pub mod warning;
