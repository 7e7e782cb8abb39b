//! Per-part comparison status
//!
//! - `part_status`: status classification, diff filter and the tree-wide aggregator

pub mod part_status;
