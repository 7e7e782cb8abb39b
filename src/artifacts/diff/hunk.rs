//! Grouping of an edit script into unified-diff hunks

use crate::artifacts::diff::line_diff::{Edit, EditKind};

pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    a_start: usize,
    a_size: usize,
    b_start: usize,
    b_size: usize,
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Split `edits` into hunks keeping `context` unchanged lines around
    /// every change; hunks whose context would touch are merged
    pub fn build(edits: &[Edit<T>], context: usize) -> Vec<Hunk<T>> {
        let changes = edits
            .iter()
            .enumerate()
            .filter(|(_, edit)| edit.kind() != EditKind::Equal)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let mut ranges = Vec::<(usize, usize)>::new();
        for index in changes {
            let start = index.saturating_sub(context);
            let end = index.saturating_add(context).min(edits.len() - 1);

            match ranges.last_mut() {
                Some((_, last_end)) if start <= last_end.saturating_add(1) => *last_end = end,
                _ => ranges.push((start, end)),
            }
        }

        // (lines of a, lines of b) consumed before each edit
        let mut offsets = Vec::with_capacity(edits.len());
        let (mut a_seen, mut b_seen) = (0, 0);
        for edit in edits {
            offsets.push((a_seen, b_seen));
            match edit.kind() {
                EditKind::Equal => {
                    a_seen += 1;
                    b_seen += 1;
                }
                EditKind::Delete => a_seen += 1,
                EditKind::Insert => b_seen += 1,
            }
        }

        ranges
            .into_iter()
            .map(|(start, end)| {
                let slice = &edits[start..=end];
                let a_size = slice
                    .iter()
                    .filter(|edit| edit.kind() != EditKind::Insert)
                    .count();
                let b_size = slice
                    .iter()
                    .filter(|edit| edit.kind() != EditKind::Delete)
                    .count();
                let (a_before, b_before) = offsets[start];

                Hunk {
                    a_start: if a_size == 0 { a_before } else { a_before + 1 },
                    a_size,
                    b_start: if b_size == 0 { b_before } else { b_before + 1 },
                    b_size,
                    edits: slice.to_vec(),
                }
            })
            .collect()
    }
}

impl<T> Hunk<T> {
    pub fn a_start(&self) -> usize {
        self.a_start
    }

    pub fn a_size(&self) -> usize {
        self.a_size
    }

    pub fn b_start(&self) -> usize {
        self.b_start
    }

    pub fn b_size(&self) -> usize {
        self.b_size
    }

    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start, self.a_size, self.b_start, self.b_size
        )
    }
}
