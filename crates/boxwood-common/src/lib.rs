//! Common utilities for the Boxwood layout engine.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Warning System** - deduplicated reports of unsupported input

pub mod warning;
