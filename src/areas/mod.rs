//! Loaded packages and the session that holds them
//!
//! - `package`: archive ingestion and the admission filter
//! - `session`: the two package slots and the command output writer

pub mod package;
pub mod session;
