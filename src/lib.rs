//! Inspect and compare the XML parts of Office document packages
//!
//! - `areas`: loaded packages and the two-slot session that owns them
//! - `artifacts`: path trees, XML canonicalization, highlighting, diffing and part status
//! - `commands`: the viewer and compare operations exposed by the CLI

use clap::ValueEnum;

pub mod areas;
pub mod artifacts;
pub mod commands;

/// How a part body is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain canonical text, colored when the output supports it
    #[default]
    Text,
    /// Classified HTML with `xml-*` span markers
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}
