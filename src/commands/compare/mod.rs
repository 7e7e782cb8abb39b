//! Two-package commands
//!
//! - `status`: per-part status of the merged part tree
//! - `diff`: line-level differences of changed parts

pub mod diff;
pub mod status;
