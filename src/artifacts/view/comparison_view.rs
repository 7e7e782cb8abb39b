//! Two-pane rendering of a part comparison
//!
//! Both panes have one row per edit so they line up when shown next to each
//! other. Rows that exist on only one side get a blank placeholder on the
//! other.

use crate::artifacts::diff::line_diff::{DiffStats, EditKind, LineDiffEntry};
use crate::artifacts::diff::side_by_side::{NumberedLine, SideBySideRow, side_by_side};
use crate::artifacts::xml::highlight::Highlighter;
use colored::Colorize;
use std::fmt::Write;

const PLACEHOLDER_HTML: &str =
    "<div class=\"diff-line diff-placeholder\"><span class=\"diff-line-number\"></span>&nbsp;</div>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub left_body: String,
    pub right_body: String,
    pub stats: DiffStats,
}

impl ComparisonView {
    pub fn html(edits: &[LineDiffEntry], stats: DiffStats, highlighter: &Highlighter) -> Self {
        let mut left_body = String::new();
        let mut right_body = String::new();

        for row in side_by_side(edits) {
            let (left_class, right_class) = match row.kind {
                EditKind::Equal => ("diff-line", "diff-line"),
                EditKind::Delete => ("diff-line diff-removed", ""),
                EditKind::Insert => ("", "diff-line diff-added"),
            };

            left_body.push_str(&html_cell(row.left.as_ref(), left_class, highlighter));
            left_body.push('\n');
            right_body.push_str(&html_cell(row.right.as_ref(), right_class, highlighter));
            right_body.push('\n');
        }

        ComparisonView {
            left_body,
            right_body,
            stats,
        }
    }
}

fn html_cell(line: Option<&NumberedLine>, class: &str, highlighter: &Highlighter) -> String {
    match line {
        Some(line) => format!(
            "<div class=\"{class}\"><span class=\"diff-line-number\">{}</span>{}</div>",
            line.number,
            highlighter.classify(line.text)
        ),
        None => PLACEHOLDER_HTML.to_string(),
    }
}

/// Terminal side-by-side table, each pane clipped to `width` characters
pub fn side_by_side_text(edits: &[LineDiffEntry], width: usize) -> String {
    let mut out = String::new();

    for SideBySideRow { kind, left, right } in side_by_side(edits) {
        let left_cell = text_cell(left.as_ref(), width);
        let right_cell = text_cell(right.as_ref(), width);
        let (marker, left_cell, right_cell) = match kind {
            EditKind::Equal => (' ', left_cell.normal(), right_cell.normal()),
            EditKind::Delete => ('<', left_cell.red(), right_cell.normal()),
            EditKind::Insert => ('>', left_cell.normal(), right_cell.green()),
        };

        // writing into a String cannot fail
        let _ = writeln!(out, "{left_cell} {marker} {right_cell}");
    }

    out
}

fn text_cell(line: Option<&NumberedLine>, width: usize) -> String {
    let text = match line {
        Some(line) => format!("{:>5} {}", line.number, line.text),
        None => String::new(),
    };

    let clipped = text.chars().take(width).collect::<String>();
    format!("{clipped:<width$}")
}
