//! XML part processing
//!
//! - `canonical`: deterministic re-indentation used for display and comparison
//! - `highlight`: token classification for HTML and terminal rendering

pub mod canonical;
pub mod highlight;
