//! Read-only tree projection of the registry
//!
//! Built on demand for inspection; never the system of record.

use super::registry::HierarchyRegistry;
use super::types::{AgentId, AgentRecord, AgentStatus};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// A node in the projected hierarchy
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    /// Agent id (the root node carries the sentinel id)
    pub id: AgentId,
    /// Persona label
    pub label: String,
    /// Registered depth
    pub depth: u32,
    /// Status, `None` for the root sentinel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    /// Child nodes ordered by creation time
    pub children: Vec<TreeNode>,
}

/// Hierarchy snapshot rooted at the root sentinel
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyTree {
    /// The root sentinel with its descendants
    pub root: TreeNode,
    /// Records whose parent was already purged
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detached: Vec<TreeNode>,
}

impl HierarchyTree {
    /// Project the registry into a tree
    #[must_use]
    pub fn build(registry: &HierarchyRegistry) -> Self {
        let mut by_parent: BTreeMap<&AgentId, Vec<&AgentRecord>> = BTreeMap::new();
        for record in registry.records() {
            by_parent.entry(&record.parent_id).or_default().push(record);
        }
        for children in by_parent.values_mut() {
            children.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        }

        let root_id = AgentId::root();
        let root = TreeNode {
            id: root_id.clone(),
            label: "root".to_string(),
            depth: 0,
            status: None,
            children: Self::children_of(&root_id, &by_parent),
        };

        let known: HashSet<&AgentId> = registry.records().map(|r| &r.id).collect();
        let mut detached = Vec::new();
        for (parent, records) in &by_parent {
            if parent.is_root() || known.contains(parent) {
                continue;
            }
            for record in records {
                detached.push(Self::node(record, &by_parent));
            }
        }

        Self { root, detached }
    }

    fn children_of(
        id: &AgentId,
        by_parent: &BTreeMap<&AgentId, Vec<&AgentRecord>>,
    ) -> Vec<TreeNode> {
        by_parent
            .get(id)
            .map(|records| records.iter().map(|r| Self::node(r, by_parent)).collect())
            .unwrap_or_default()
    }

    fn node(record: &AgentRecord, by_parent: &BTreeMap<&AgentId, Vec<&AgentRecord>>) -> TreeNode {
        TreeNode {
            id: record.id.clone(),
            label: record.label.clone(),
            depth: record.depth,
            status: Some(record.status),
            children: Self::children_of(&record.id, by_parent),
        }
    }

    /// Number of agent nodes (excluding the root sentinel)
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            node.children.iter().map(|c| 1 + count(c)).sum()
        }
        count(&self.root) + self.detached.iter().map(|n| 1 + count(n)).sum::<usize>()
    }

    /// Render as an indented text tree
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("root\n");
        Self::render_children(&self.root.children, "", &mut out);
        if !self.detached.is_empty() {
            out.push_str("(detached)\n");
            Self::render_children(&self.detached, "", &mut out);
        }
        out
    }

    fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            let branch = if last { "└─ " } else { "├─ " };
            let status = child.status.map(|s| s.to_string()).unwrap_or_default();
            out.push_str(&format!(
                "{}{}{} [{}] depth={} {}\n",
                prefix, branch, child.id, child.label, child.depth, status
            ));
            let next = format!("{}{}", prefix, if last { "   " } else { "│  " });
            Self::render_children(&child.children, &next, out);
        }
    }
}
