//! Single-package commands
//!
//! - `tree`: list the parts of a package as a directory tree
//! - `show`: print one part in canonical form

pub mod show;
pub mod tree;
