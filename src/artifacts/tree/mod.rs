//! Part path trees
//!
//! - `path_tree`: builds a directory/file hierarchy from flat part paths

pub mod path_tree;
