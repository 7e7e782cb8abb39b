//! Command implementations, as operations on a `Session`
//!
//! - `viewer`: commands that look at a single package (tree, show)
//! - `compare`: commands that compare the two loaded packages (status, diff)

pub mod compare;
pub mod viewer;
