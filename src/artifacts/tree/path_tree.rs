//! Hierarchical view over flat part paths
//!
//! Package parts are stored under slash-delimited names such as
//! `word/_rels/document.xml.rels`. The tree built here turns those names into
//! directory and file nodes so they can be listed and compared level by level.
//!
//! Children are kept in an unordered map; every traversal sorts them by exact
//! byte-wise name comparison so the rendered order never depends on insertion
//! order.

use std::collections::HashMap;

const SEPARATOR: char = '/';

/// One path segment of a part tree
///
/// A node is a leaf when it terminated at least one input path. When two paths
/// collide at a name boundary (`a` and `a/b`) the node stays a leaf and still
/// carries its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTreeNode {
    name: String,
    full_path: String,
    is_leaf: bool,
    children: HashMap<String, PathTreeNode>,
}

impl PathTreeNode {
    /// Build a tree from a set of part paths
    ///
    /// The returned node is a virtual root with an empty name and path. Empty
    /// input yields a root without children.
    pub fn build<'p>(paths: impl IntoIterator<Item = &'p str>) -> Self {
        let mut root = Self::default();

        for path in paths {
            let segments = path.split(SEPARATOR).collect::<Vec<_>>();
            root.add_path(&segments, 0);
        }

        root
    }

    fn add_path(&mut self, segments: &[&str], depth: usize) {
        let Some((segment, rest)) = segments.split_first() else {
            return;
        };

        let full_path = if self.full_path.is_empty() && depth == 0 {
            segment.to_string()
        } else {
            format!("{}{}{}", self.full_path, SEPARATOR, segment)
        };

        let child = self
            .children
            .entry(segment.to_string())
            .or_insert_with(|| PathTreeNode {
                name: segment.to_string(),
                full_path,
                is_leaf: false,
                children: HashMap::new(),
            });

        if rest.is_empty() {
            child.is_leaf = true;
        } else {
            child.add_path(rest, depth + 1);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && !self.is_leaf
    }

    /// Children in rendered order (case-sensitive, byte-wise by name)
    pub fn sorted_children(&self) -> Vec<&PathTreeNode> {
        let mut children = self.children.values().collect::<Vec<_>>();
        children.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        children
    }

    /// Follow `path` segment by segment from this node
    pub fn find(&self, path: &str) -> Option<&PathTreeNode> {
        path.split(SEPARATOR)
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Visit every node below this one depth-first, parents before children
    ///
    /// The callback receives the node and its depth, starting at 0 for the
    /// direct children of this node.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a PathTreeNode, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<'a, F>(&'a self, depth: usize, visit: &mut F)
    where
        F: FnMut(&'a PathTreeNode, usize),
    {
        for child in self.sorted_children() {
            visit(child, depth);
            child.walk_at(depth + 1, visit);
        }
    }

    /// Full paths of every leaf in rendered order
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.walk(&mut |node, _| {
            if node.is_leaf {
                leaves.push(node.full_path.as_str());
            }
        });
        leaves
    }
}
