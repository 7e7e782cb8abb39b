//! Rendering boundary between the comparison engine and the CLI
//!
//! - `part_view`: a single canonical part with highlighting
//! - `comparison_view`: two aligned panes of a part comparison

pub mod comparison_view;
pub mod part_view;
