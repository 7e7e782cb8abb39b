//! Paired left/right rows for a two-pane rendering of an edit script
//!
//! Equal lines appear on both sides, deletions only on the left and
//! insertions only on the right. Line numbers count positions in the
//! respective input, not in the edit script.

use crate::artifacts::diff::line_diff::{Edit, EditKind};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct NumberedLine<'l> {
    pub number: usize,
    pub text: &'l str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBySideRow<'l> {
    pub kind: EditKind,
    pub left: Option<NumberedLine<'l>>,
    pub right: Option<NumberedLine<'l>>,
}

pub fn side_by_side<T: AsRef<str>>(edits: &[Edit<T>]) -> Vec<SideBySideRow<'_>> {
    let (mut left_number, mut right_number) = (1, 1);

    edits
        .iter()
        .map(|edit| {
            let text = edit.value().as_ref();
            let kind = edit.kind();
            let (left, right) = match kind {
                EditKind::Equal => {
                    let row = (
                        Some(NumberedLine::new(left_number, text)),
                        Some(NumberedLine::new(right_number, text)),
                    );
                    left_number += 1;
                    right_number += 1;
                    row
                }
                EditKind::Delete => {
                    let row = (Some(NumberedLine::new(left_number, text)), None);
                    left_number += 1;
                    row
                }
                EditKind::Insert => {
                    let row = (None, Some(NumberedLine::new(right_number, text)));
                    right_number += 1;
                    row
                }
            };

            SideBySideRow { kind, left, right }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::diff::line_diff::diff_lines;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn numbers(rows: &[SideBySideRow]) -> Vec<(Option<usize>, Option<usize>)> {
        rows.iter()
            .map(|row| {
                (
                    row.left.as_ref().map(|line| line.number),
                    row.right.as_ref().map(|line| line.number),
                )
            })
            .collect()
    }

    #[rstest]
    fn counters_advance_independently() {
        let (edits, _) = diff_lines(&["a", "b", "c"], &["a", "x", "y", "c"]);
        let rows = side_by_side(&edits);

        assert_eq!(
            numbers(&rows),
            vec![
                (Some(1), Some(1)),
                (None, Some(2)),
                (None, Some(3)),
                (Some(2), None),
                (Some(3), Some(4)),
            ]
        );
    }

    #[rstest]
    fn equal_rows_show_the_same_text() {
        let (edits, _) = diff_lines(&["same"], &["same"]);
        let rows = side_by_side(&edits);

        assert_eq!(
            rows,
            vec![SideBySideRow {
                kind: EditKind::Equal,
                left: Some(NumberedLine::new(1, "same")),
                right: Some(NumberedLine::new(1, "same")),
            }]
        );
    }

    #[rstest]
    fn deletions_leave_a_right_placeholder() {
        let (edits, _) = diff_lines(&["gone"], &[]);
        let rows = side_by_side(&edits);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, EditKind::Delete);
        assert_eq!(rows[0].left, Some(NumberedLine::new(1, "gone")));
        assert_eq!(rows[0].right, None);
    }
}
