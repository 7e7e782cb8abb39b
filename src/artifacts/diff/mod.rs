//! Line-level diffing of canonical parts
//!
//! - `line_diff`: LCS edit scripts and their counts
//! - `hunk`: grouping of an edit script into unified-diff hunks
//! - `side_by_side`: paired rows for two-pane rendering

pub mod hunk;
pub mod line_diff;
pub mod side_by_side;
