use crate::areas::session::{Session, SlotId};
use crate::artifacts::status::part_status::PartSource;
use crate::artifacts::tree::path_tree::PathTreeNode;
use colored::Colorize;

const INDENT: &str = "  ";

impl Session {
    pub fn tree(&self) -> anyhow::Result<()> {
        let package = self
            .package(SlotId::First)
            .ok_or_else(|| anyhow::anyhow!("no package loaded"))?;

        writeln!(self.writer(), "{}", package.summary().bold())?;

        let tree = PathTreeNode::build(package.part_paths());
        self.write_tree(&tree, |node| {
            if node.is_leaf() {
                Some(node.name().to_string())
            } else {
                Some(format!("{}/", node.name()).blue().to_string())
            }
        })
    }

    /// Print `tree` depth-first with one indent per level; nodes labelled
    /// `None` are skipped
    pub(crate) fn write_tree<F>(&self, tree: &PathTreeNode, mut label: F) -> anyhow::Result<()>
    where
        F: FnMut(&PathTreeNode) -> Option<String>,
    {
        let mut lines = Vec::new();
        tree.walk(&mut |node, depth| {
            if let Some(text) = label(node) {
                lines.push(format!("{}{}", INDENT.repeat(depth), text));
            }
        });

        let mut writer = self.writer();
        for line in lines {
            writeln!(writer, "{line}")?;
        }

        Ok(())
    }
}
