//! Longest-common-subsequence line diff
//!
//! The edit script is reconstructed from a full `(m+1) x (n+1)` LCS table by
//! walking back from the bottom-right corner. When both predecessors carry the
//! same LCS length the walk moves up (a deletion), so a swapped pair of lines
//! always renders as insert-then-delete in forward order.
//!
//! Time and memory are `O(m*n)`; callers bound the input size.

use derive_new::new;
use std::fmt::Display;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

/// One classified line of an edit script
pub type LineDiffEntry = Edit<String>;

impl<T> Edit<T> {
    pub fn kind(&self) -> EditKind {
        match self {
            Edit::Delete { .. } => EditKind::Delete,
            Edit::Insert { .. } => EditKind::Insert,
            Edit::Equal { .. } => EditKind::Equal,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value } | Edit::Insert { value } | Edit::Equal { value } => value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Edit<U> {
        match self {
            Edit::Delete { value } => Edit::Delete { value: f(value) },
            Edit::Insert { value } => Edit::Insert { value: f(value) },
            Edit::Equal { value } => Edit::Equal { value: f(value) },
        }
    }
}

impl<T> Edit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        match self {
            Edit::Delete { value } => format!("-{}", value.clone().into()),
            Edit::Insert { value } => format!("+{}", value.clone().into()),
            Edit::Equal { value } => format!(" {}", value.clone().into()),
        }
    }
}

impl<T> Display for Edit<T>
where
    T: Clone + Into<String>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Inserted and deleted line counts of an edit script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn from_edits<T>(edits: &[Edit<T>]) -> Self {
        edits
            .iter()
            .fold(DiffStats::default(), |mut stats, edit| {
                match edit.kind() {
                    EditKind::Insert => stats.added += 1,
                    EditKind::Delete => stats.removed += 1,
                    EditKind::Equal => {}
                }
                stats
            })
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl AddAssign for DiffStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.removed += other.removed;
    }
}

impl Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{}", self.added, self.removed)
    }
}

pub trait DiffAlgorithm<'d, T> {
    type Table;
    type EditPath;
    type EditScript;
    type Output;

    fn compute_table(&self) -> Self::Table;
    fn backtrack(&self) -> Self::EditPath;
    fn diff(&self) -> Self::EditScript;
    fn format_diff(&self) -> Self::Output
    where
        T: Clone + Into<String>,
        Self::EditScript: AsRef<[Edit<T>]>,
        Self::Output: From<String>,
    {
        let edits = self.diff();
        let formatted = edits
            .as_ref()
            .iter()
            .map(|edit| edit.as_string())
            .collect::<Vec<_>>()
            .join("\n");
        formatted.into()
    }
}

/// Row-major LCS length table with `rows x cols` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    fn new(rows: usize, cols: usize) -> Self {
        LcsTable {
            cols,
            cells: vec![0; rows * cols],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: u32) {
        self.cells[i * self.cols + j] = value;
    }

    /// Length of the longest common subsequence of the full inputs
    pub fn lcs_len(&self) -> u32 {
        self.cells.last().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LcsDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> DiffAlgorithm<'d, T> for LcsDiff<'d, T> {
    type Table = LcsTable;
    // (prev_i, prev_j, i, j), in forward order
    type EditPath = Vec<(usize, usize, usize, usize)>;
    type EditScript = Vec<Edit<T>>;
    type Output = String;

    fn compute_table(&self) -> Self::Table {
        let (m, n) = (self.a.len(), self.b.len());
        let mut table = LcsTable::new(m + 1, n + 1);

        for i in 1..=m {
            for j in 1..=n {
                let value = if self.a[i - 1] == self.b[j - 1] {
                    table.get(i - 1, j - 1) + 1
                } else {
                    table.get(i - 1, j).max(table.get(i, j - 1))
                };
                table.set(i, j, value);
            }
        }

        table
    }

    fn backtrack(&self) -> Self::EditPath {
        let table = self.compute_table();
        let (mut i, mut j) = (self.a.len(), self.b.len());
        let mut edit_path = Vec::with_capacity(i + j);

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && self.a[i - 1] == self.b[j - 1] {
                edit_path.push((i - 1, j - 1, i, j));
                i -= 1;
                j -= 1;
            } else if i > 0 && (j == 0 || table.get(i - 1, j) >= table.get(i, j - 1)) {
                edit_path.push((i - 1, j, i, j));
                i -= 1;
            } else {
                edit_path.push((i, j - 1, i, j));
                j -= 1;
            }
        }

        edit_path.reverse();
        edit_path
    }

    fn diff(&self) -> Self::EditScript {
        self.backtrack()
            .into_iter()
            .map(|(prev_i, prev_j, i, j)| {
                if i == prev_i {
                    Edit::Insert {
                        value: self.b[prev_j].clone(),
                    }
                } else if j == prev_j {
                    Edit::Delete {
                        value: self.a[prev_i].clone(),
                    }
                } else {
                    Edit::Equal {
                        value: self.a[prev_i].clone(),
                    }
                }
            })
            .collect()
    }
}

/// Diff two line sequences, returning the edit script and its counts
pub fn diff_lines<S: AsRef<str>>(left: &[S], right: &[S]) -> (Vec<LineDiffEntry>, DiffStats) {
    let left = left.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
    let right = right.iter().map(AsRef::as_ref).collect::<Vec<&str>>();

    let edits = LcsDiff::new(&left, &right)
        .diff()
        .into_iter()
        .map(|edit| edit.map(str::to_string))
        .collect::<Vec<_>>();
    let stats = DiffStats::from_edits(&edits);

    (edits, stats)
}
