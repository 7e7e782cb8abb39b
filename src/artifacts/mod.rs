//! Building blocks of part inspection and comparison
//!
//! - `core`: output plumbing (pager, color choice)
//! - `diff`: LCS line diff, hunks and side-by-side rows
//! - `status`: per-part status across two packages
//! - `tree`: hierarchical view over part paths
//! - `view`: rendering boundary for single parts and comparisons
//! - `xml`: canonical XML rendering and token highlighting

pub mod core;
pub mod diff;
pub mod status;
pub mod tree;
pub mod view;
pub mod xml;
