use crate::areas::package::Package;
use crate::areas::session::Session;
use crate::artifacts::diff::hunk::Hunk;
use crate::artifacts::diff::line_diff::{DiffStats, Edit, LineDiffEntry, diff_lines};
use crate::artifacts::status::part_status::{ComparisonMode, PartSource, aggregate};
use crate::artifacts::view::comparison_view::{ComparisonView, side_by_side_text};
use crate::artifacts::xml::canonical::try_canonicalize;
use crate::artifacts::xml::highlight::Highlighter;
use crate::commands::viewer::show::MALFORMED_NOTE;
use colored::Colorize;
use derive_new::new;

pub const DEFAULT_MAX_LINES: usize = 10_000;
const PANE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffLayout {
    #[default]
    Unified,
    SideBySide,
    Html,
}

#[derive(Debug, Clone, new)]
pub struct DiffOptions {
    /// Parts to diff; all changed parts when empty
    pub parts: Vec<String>,
    pub layout: DiffLayout,
    pub stat_only: bool,
    pub context: usize,
    pub max_lines: usize,
    pub mode: ComparisonMode,
}

/// One side of a part comparison, prepared for line diffing
struct DiffSide {
    text: String,
    well_formed: bool,
}

impl DiffSide {
    fn prepare(package: &Package, path: &str, mode: ComparisonMode) -> Self {
        let Some(raw) = package.part(path) else {
            return DiffSide {
                text: String::new(),
                well_formed: true,
            };
        };

        match mode {
            ComparisonMode::Raw => DiffSide {
                text: raw.to_string(),
                well_formed: true,
            },
            ComparisonMode::Canonical => match try_canonicalize(raw) {
                Ok(text) => DiffSide {
                    text,
                    well_formed: true,
                },
                Err(err) => {
                    tracing::debug!(part = path, package = package.name(), "diffing raw text: {err}");
                    DiffSide {
                        text: raw.to_string(),
                        well_formed: false,
                    }
                }
            },
        }
    }

    fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

impl Session {
    pub fn compare_diff(&self, opts: &DiffOptions) -> anyhow::Result<()> {
        let (first, second) = self
            .pair()
            .ok_or_else(|| anyhow::anyhow!("two packages are needed for a comparison"))?;

        let targets = if opts.parts.is_empty() {
            aggregate(first, second, opts.mode)
                .into_iter()
                .filter(|(_, status)| status.is_changed())
                .map(|(path, _)| path)
                .collect::<Vec<_>>()
        } else {
            for part in &opts.parts {
                if first.part(part).is_none() && second.part(part).is_none() {
                    anyhow::bail!("part '{part}' not found in either package");
                }
            }
            opts.parts.clone()
        };

        let highlighter = Highlighter::new()?;
        let mut total = DiffStats::default();
        let mut diffed = 0;

        for path in &targets {
            let left = DiffSide::prepare(first, path, opts.mode);
            let right = DiffSide::prepare(second, path, opts.mode);
            let (left_lines, right_lines) = (left.lines(), right.lines());

            let longest = left_lines.len().max(right_lines.len());
            if longest > opts.max_lines {
                tracing::warn!(part = %path, lines = longest, limit = opts.max_lines, "part too large to diff");
                writeln!(
                    self.writer(),
                    "{}",
                    format!(
                        "{path}: too large to diff ({longest} lines, limit {})",
                        opts.max_lines
                    )
                    .yellow()
                )?;
                continue;
            }

            let (edits, stats) = diff_lines(&left_lines, &right_lines);
            total += stats;
            diffed += 1;

            if opts.stat_only {
                writeln!(self.writer(), "{path} | {}", self.paint_stats(stats))?;
                continue;
            }

            writeln!(self.writer(), "{}", format!("diff --part {path}").bold())?;
            if !(left.well_formed && right.well_formed) {
                writeln!(self.writer(), "{}", MALFORMED_NOTE.yellow())?;
            }
            writeln!(self.writer(), "{}", self.paint_stats(stats))?;

            match opts.layout {
                DiffLayout::Unified => {
                    for hunk in Hunk::build(&edits, opts.context) {
                        self.print_diff_hunk(&hunk)?;
                    }
                }
                DiffLayout::SideBySide => {
                    write!(self.writer(), "{}", side_by_side_text(&edits, PANE_WIDTH))?;
                }
                DiffLayout::Html => {
                    let view = ComparisonView::html(&edits, stats, &highlighter);
                    self.print_comparison_view(&view)?;
                }
            }
        }

        if opts.stat_only {
            writeln!(
                self.writer(),
                "{diffed} part{} changed, {}",
                if diffed == 1 { "" } else { "s" },
                self.paint_stats(total)
            )?;
        }

        Ok(())
    }

    fn paint_stats(&self, stats: DiffStats) -> String {
        format!(
            "{} {}",
            format!("+{}", stats.added).green(),
            format!("-{}", stats.removed).red()
        )
    }

    fn print_diff_hunk(&self, hunk: &Hunk<String>) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", hunk.header().cyan())?;

        for edit in hunk.edits() {
            writeln!(self.writer(), "{}", paint_edit(edit))?;
        }

        Ok(())
    }

    fn print_comparison_view(&self, view: &ComparisonView) -> anyhow::Result<()> {
        let mut writer = self.writer();
        writeln!(writer, "<div class=\"diff-pane diff-left\">")?;
        write!(writer, "{}", view.left_body)?;
        writeln!(writer, "</div>")?;
        writeln!(writer, "<div class=\"diff-pane diff-right\">")?;
        write!(writer, "{}", view.right_body)?;
        writeln!(writer, "</div>")?;

        Ok(())
    }
}

fn paint_edit(edit: &LineDiffEntry) -> String {
    match edit {
        Edit::Delete { .. } => edit.as_string().red().to_string(),
        Edit::Insert { .. } => edit.as_string().green().to_string(),
        Edit::Equal { .. } => edit.as_string(),
    }
}
