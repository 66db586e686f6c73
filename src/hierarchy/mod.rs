//! Containment hierarchy rebuilt from parent references.
//!
//! Output order is fixed: epic trees by first-seen root, then external epic
//! placeholders by first reference, then standalone items by first appearance.

mod resolver;

pub use resolver::resolve;

use crate::model::Issue;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub issue: Issue,
    /// Children in first-seen input order.
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(issue: Issue) -> Self {
        Self {
            issue,
            children: Vec::new(),
        }
    }

    /// Number of issues in this subtree, the node itself included.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Pre-order walk yielding each node with its depth relative to this one.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &HierarchyNode)> {
        let mut stack = vec![(0, self)];
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }
}

// Children are moved onto a heap stack so deep chains do not recurse on drop.
impl Drop for HierarchyNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Synthetic epic standing in for a parent key missing from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEpic {
    pub key: String,
    pub children: Vec<HierarchyNode>,
}

impl ExternalEpic {
    pub fn new(key: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            children: Vec::new(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub trees: Vec<HierarchyNode>,
    pub external_epics: IndexMap<String, ExternalEpic>,
    pub standalone: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Number of real issues placed anywhere in the hierarchy.
    pub fn issue_count(&self) -> usize {
        let trees = self.trees.iter().map(HierarchyNode::subtree_size).sum::<usize>();
        let external = self
            .external_epics
            .values()
            .flat_map(|epic| epic.children.iter())
            .map(HierarchyNode::subtree_size)
            .sum::<usize>();
        let standalone = self.standalone.iter().map(HierarchyNode::subtree_size).sum::<usize>();
        trees + external + standalone
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty() && self.external_epics.is_empty() && self.standalone.is_empty()
    }
}
