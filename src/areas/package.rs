//! A loaded Office package and the rules for admitting one
//!
//! Only the text parts that matter for comparison are kept: entries whose
//! name ends in `.xml` or `.rels`. Everything else in the archive (media,
//! fonts, thumbnails) is skipped.

use crate::artifacts::status::part_status::PartSource;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

pub const SUPPORTED_EXTENSIONS: phf::Set<&'static str> = phf::phf_set! {
    "docx", "xlsx", "pptx", "dotx", "xltx", "potx",
};

const PART_SUFFIXES: [&str; 2] = [".xml", ".rels"];
// upper bound on the preallocation taken from a zip entry header
const MAX_SIZE_HINT: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("{name}: unsupported file type, expected one of .docx, .xlsx, .pptx, .dotx, .xltx, .potx")]
    UnsupportedExtension { name: String },
    #[error("{name}: cannot read file: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: not a valid package archive: {source}")]
    InvalidArchive {
        name: String,
        #[source]
        source: ZipError,
    },
    #[error("{name}: loading was interrupted: {source}")]
    Interrupted {
        name: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Whether `name` carries one of the Office package extensions
pub fn is_supported_package(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    parts: BTreeMap<String, String>,
}

impl Package {
    pub fn new(name: impl Into<String>, parts: BTreeMap<String, String>) -> Self {
        Package {
            name: name.into(),
            parts,
        }
    }

    /// Read and decode the package at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, IngestionError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if !is_supported_package(&name) {
            return Err(IngestionError::UnsupportedExtension { name });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| IngestionError::Unreadable {
                name: name.clone(),
                source,
            })?;
        tracing::debug!(package = %name, size = bytes.len(), "read package");

        let task_name = name.clone();
        tokio::task::spawn_blocking(move || Package::from_archive(task_name, Bytes::from(bytes)))
            .await
            .map_err(|source| IngestionError::Interrupted { name, source })?
    }

    /// Decode an in-memory archive, keeping its XML and relationship parts
    pub fn from_archive(name: impl Into<String>, bytes: Bytes) -> Result<Self, IngestionError> {
        let name = name.into();
        let invalid = |source| IngestionError::InvalidArchive {
            name: name.clone(),
            source,
        };

        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(invalid)?;
        let mut parts = BTreeMap::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(invalid)?;
            if entry.is_dir() || !is_part_name(entry.name()) {
                continue;
            }

            let path = entry.name().to_string();
            let hint = usize::try_from(entry.size()).unwrap_or(usize::MAX);
            let mut content = Vec::with_capacity(hint.min(MAX_SIZE_HINT));
            entry
                .read_to_end(&mut content)
                .map_err(|err| invalid(ZipError::Io(err)))?;

            parts.insert(path, String::from_utf8_lossy(&content).into_owned());
        }

        tracing::info!(package = %name, parts = parts.len(), "loaded package");
        Ok(Package { name, parts })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &BTreeMap<String, String> {
        &self.parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// `<name> (<n> XML parts)`
    pub fn summary(&self) -> String {
        format!("{} ({} XML parts)", self.name, self.parts.len())
    }
}

impl PartSource for Package {
    fn part_paths(&self) -> impl Iterator<Item = &str> {
        self.parts.part_paths()
    }

    fn part(&self, path: &str) -> Option<&str> {
        self.parts.part(path)
    }
}

fn is_part_name(name: &str) -> bool {
    PART_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
