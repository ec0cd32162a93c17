//! Common utilities for the sift markup toolkit.
//!
//! This crate provides shared infrastructure used by the tree, parser and
//! selector crates:
//! - **Warning System** - deduplicated, colored notices for input the
//!   toolkit accepts but does not understand

pub mod warning;

pub use warning::{clear_warnings, warn_once, warning_count};
