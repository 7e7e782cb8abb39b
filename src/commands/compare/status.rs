use crate::areas::session::Session;
use crate::artifacts::status::part_status::{ComparisonMode, DiffFilter, aggregate};
use crate::artifacts::tree::path_tree::PathTreeNode;
use colored::Colorize;
use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct StatusOptions {
    pub name_status: bool,
    pub filter: DiffFilter,
    pub mode: ComparisonMode,
}

impl Session {
    pub fn compare_status(&self, opts: &StatusOptions) -> anyhow::Result<()> {
        let (first, second) = self
            .pair()
            .ok_or_else(|| anyhow::anyhow!("two packages are needed for a comparison"))?;

        let statuses = aggregate(first, second, opts.mode);
        tracing::debug!(
            parts = statuses.len(),
            changed = statuses.values().filter(|status| status.is_changed()).count(),
            "compared packages"
        );

        if opts.name_status {
            let mut writer = self.writer();
            for (path, status) in statuses
                .iter()
                .filter(|(_, status)| status.is_changed() && status.matches_filter(opts.filter))
            {
                writeln!(writer, "{}\t{}", status.status_char(), path)?;
            }
            return Ok(());
        }

        if let Some(summary) = self.summary() {
            writeln!(self.writer(), "{}", summary.bold())?;
        }

        let visible = statuses
            .iter()
            .filter(|(_, status)| status.matches_filter(opts.filter))
            .map(|(path, _)| path.as_str())
            .collect::<Vec<_>>();
        let tree = PathTreeNode::build(statuses.keys().map(String::as_str));

        self.write_tree(&tree, |node| {
            let path = node.full_path();
            match statuses.get(path) {
                Some(status) if node.is_leaf() && visible.iter().any(|shown| *shown == path) => {
                    Some(status.decorate(node.name()))
                }
                _ if contains_visible(path, &visible) => {
                    Some(format!("{}/", node.name()).blue().to_string())
                }
                _ => None,
            }
        })
    }
}

fn contains_visible(dir: &str, visible: &[&str]) -> bool {
    visible.iter().any(|path| {
        path.strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}
