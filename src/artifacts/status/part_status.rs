use crate::artifacts::tree::path_tree::PathTreeNode;
use crate::artifacts::xml::canonical::canonicalize;
use bitflags::bitflags;
use colored::Colorize;
use std::collections::{BTreeMap, HashMap};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const ADDED = 0b0001;
        const REMOVED = 0b0010;
        const MODIFIED = 0b0100;
        const UNCHANGED = 0b1000;
    }
}

impl DiffFilter {
    /// Parse a `git diff --diff-filter` style selector such as `AMD`
    ///
    /// `U` selects unchanged parts, which `--name-status` never lists.
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::REMOVED,
                'M' => filter |= Self::MODIFIED,
                'U' => filter |= Self::UNCHANGED,
                _ => return None,
            }
        }

        Some(filter)
    }

    pub fn changes() -> Self {
        Self::ADDED | Self::REMOVED | Self::MODIFIED
    }
}

/// How two present parts are judged equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonMode {
    /// Compare canonical renderings, ignoring formatting-only differences
    #[default]
    Canonical,
    /// Compare the raw text byte for byte
    Raw,
}

impl ComparisonMode {
    pub fn same_content(&self, left: &str, right: &str) -> bool {
        match self {
            ComparisonMode::Raw => left == right,
            ComparisonMode::Canonical => left == right || canonicalize(left) == canonicalize(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartStatus {
    Unchanged,
    Modified,
    AddedInSecond,
    RemovedFromSecond,
}

impl PartStatus {
    pub fn from_contents(
        left: Option<&str>,
        right: Option<&str>,
        mode: ComparisonMode,
    ) -> Option<Self> {
        match (left, right) {
            (None, None) => None,
            (Some(_), None) => Some(PartStatus::RemovedFromSecond),
            (None, Some(_)) => Some(PartStatus::AddedInSecond),
            (Some(left), Some(right)) if mode.same_content(left, right) => {
                Some(PartStatus::Unchanged)
            }
            (Some(_), Some(_)) => Some(PartStatus::Modified),
        }
    }

    /// Tree label; unchanged parts carry none
    pub fn label(&self) -> Option<&'static str> {
        match self {
            PartStatus::Unchanged => None,
            PartStatus::Modified => Some("Modified"),
            PartStatus::AddedInSecond => Some("Added"),
            PartStatus::RemovedFromSecond => Some("Removed"),
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            PartStatus::Unchanged => ' ',
            PartStatus::Modified => 'M',
            PartStatus::AddedInSecond => 'A',
            PartStatus::RemovedFromSecond => 'D',
        }
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            PartStatus::Unchanged => filter.contains(DiffFilter::UNCHANGED),
            PartStatus::Modified => filter.contains(DiffFilter::MODIFIED),
            PartStatus::AddedInSecond => filter.contains(DiffFilter::ADDED),
            PartStatus::RemovedFromSecond => filter.contains(DiffFilter::REMOVED),
        }
    }

    pub fn is_changed(&self) -> bool {
        *self != PartStatus::Unchanged
    }

    /// `name` decorated the way the comparison tree shows it
    pub fn decorate(&self, name: &str) -> String {
        match self.label() {
            None => name.to_string(),
            Some(label) => {
                let text = format!("{name} ({label})");
                match self {
                    PartStatus::Modified => text.yellow().to_string(),
                    PartStatus::AddedInSecond => text.green().to_string(),
                    PartStatus::RemovedFromSecond => text.red().strikethrough().to_string(),
                    PartStatus::Unchanged => text,
                }
            }
        }
    }
}

impl std::fmt::Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label().unwrap_or("Unchanged"))
    }
}

/// Anything that can list its parts and hand out their text
pub trait PartSource {
    fn part_paths(&self) -> impl Iterator<Item = &str>;
    fn part(&self, path: &str) -> Option<&str>;
}

impl PartSource for BTreeMap<String, String> {
    fn part_paths(&self) -> impl Iterator<Item = &str> {
        self.keys().map(String::as_str)
    }

    fn part(&self, path: &str) -> Option<&str> {
        self.get(path).map(String::as_str)
    }
}

impl PartSource for HashMap<String, String> {
    fn part_paths(&self) -> impl Iterator<Item = &str> {
        self.keys().map(String::as_str)
    }

    fn part(&self, path: &str) -> Option<&str> {
        self.get(path).map(String::as_str)
    }
}

pub type StatusMap = BTreeMap<String, PartStatus>;

/// Classify every leaf of the merged part tree of `left` and `right`
pub fn aggregate<L, R>(left: &L, right: &R, mode: ComparisonMode) -> StatusMap
where
    L: PartSource,
    R: PartSource,
{
    let tree = PathTreeNode::build(left.part_paths().chain(right.part_paths()));

    tree.leaves()
        .into_iter()
        .filter_map(|path| {
            PartStatus::from_contents(left.part(path), right.part(path), mode)
                .map(|status| (path.to_string(), status))
        })
        .collect()
}
