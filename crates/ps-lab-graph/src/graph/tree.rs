//! Render-side view of a hierarchy
//!
//! `VisualTree` flattens a `Node` into an index arena in breadth-first order,
//! assigning every node a stable `NodeKey`. Per-node UI state (expanded flag,
//! previous screen position) lives in a separate `NodeStateTable` keyed by
//! `NodeKey`, so the hierarchy itself is never mutated by interaction.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use egui::Pos2;
use ps_lab_types::{Node, NodeData, NodeKind};

// =============================================================================
// NODE KEY
// =============================================================================

/// Identity of a rendered node across updates
///
/// The node id when present, otherwise `"{name}-{depth}-{index}"` where
/// `index` is the node's position in breadth-first traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn derive(node: &Node, depth: usize, index: usize) -> Self {
        match node.id() {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self(format!("{}-{}-{}", node.name(), depth, index)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// VISUAL TREE
// =============================================================================

#[derive(Debug, Clone)]
pub struct VisualNode {
    pub key: NodeKey,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
    pub kind: NodeKind,
    pub data: NodeData,
    /// "Label (Name)" or just the name
    pub label: String,
}

impl VisualNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena of visual nodes; index 0 is the root
#[derive(Debug, Clone)]
pub struct VisualTree {
    nodes: Vec<VisualNode>,
    index: HashMap<NodeKey, usize>,
}

impl VisualTree {
    pub fn from_node(root: &Node) -> Self {
        let mut nodes: Vec<VisualNode> = Vec::with_capacity(root.subtree_len());
        let mut index = HashMap::with_capacity(root.subtree_len());
        let mut queue: VecDeque<(&Node, Option<usize>, usize)> = VecDeque::new();
        queue.push_back((root, None, 0));

        while let Some((node, parent, depth)) = queue.pop_front() {
            let position = nodes.len();
            let key = NodeKey::derive(node, depth, position);
            if index.contains_key(&key) {
                tracing::warn!(key = %key, "duplicate node key, later node unreachable by key");
            } else {
                index.insert(key.clone(), position);
            }

            nodes.push(VisualNode {
                key,
                parent,
                children: Vec::new(),
                depth,
                kind: node.kind(),
                data: node.data().clone(),
                label: node.display_label(),
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(position);
            }
            for child in node.children() {
                queue.push_back((child, Some(position), depth + 1));
            }
        }

        Self { nodes, index }
    }

    pub const ROOT: usize = 0;

    pub fn root(&self) -> &VisualNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, index: usize) -> Option<&VisualNode> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, key: &NodeKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &NodeKey) -> Option<&VisualNode> {
        self.index_of(key).and_then(|i| self.nodes.get(i))
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes.iter()
    }

    /// Children shown under `index` given the current expansion state
    pub fn visible_children<'a>(&'a self, index: usize, states: &NodeStateTable) -> &'a [usize] {
        match self.nodes.get(index) {
            Some(node) if states.is_expanded(&node.key) => &node.children,
            _ => &[],
        }
    }

    /// Visible node indices in pre-order (parents before children)
    pub fn visible_order(&self, states: &NodeStateTable) -> Vec<usize> {
        let mut order = Vec::new();
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![Self::ROOT];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.visible_children(index, states).iter().rev());
        }
        order
    }

    /// True when the node has children that are currently collapsed
    pub fn has_hidden_children(&self, index: usize, states: &NodeStateTable) -> bool {
        self.nodes
            .get(index)
            .is_some_and(|node| node.has_children() && !states.is_expanded(&node.key))
    }
}

// =============================================================================
// NODE STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeState {
    pub expanded: bool,
    /// Layout position from the last render pass
    pub previous: Option<Pos2>,
}

/// Interaction state keyed by node identity
#[derive(Debug, Clone, Default)]
pub struct NodeStateTable {
    states: HashMap<NodeKey, NodeState>,
}

impl NodeStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a freshly loaded tree: root expanded, everything below collapsed.
    ///
    /// Previous positions of keys that survive are kept; keys no longer in
    /// the tree are dropped.
    pub fn reset_for(&mut self, tree: &VisualTree) {
        self.states.retain(|key, _| tree.contains(key));
        for node in tree.iter() {
            self.states.entry(node.key.clone()).or_default().expanded = node.depth == 0;
        }
    }

    pub fn get(&self, key: &NodeKey) -> Option<&NodeState> {
        self.states.get(key)
    }

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.states.get(key).is_some_and(|s| s.expanded)
    }

    pub fn set_expanded(&mut self, key: &NodeKey, expanded: bool) {
        self.states.entry(key.clone()).or_default().expanded = expanded;
    }

    /// Flip and return the new expanded flag
    pub fn toggle(&mut self, key: &NodeKey) -> bool {
        let state = self.states.entry(key.clone()).or_default();
        state.expanded = !state.expanded;
        state.expanded
    }

    pub fn previous(&self, key: &NodeKey) -> Option<Pos2> {
        self.states.get(key).and_then(|s| s.previous)
    }

    pub fn remember(&mut self, key: &NodeKey, position: Pos2) {
        self.states.entry(key.clone()).or_default().previous = Some(position);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ps_lab_types::BranchKind;

    fn sample() -> Node {
        Node::root(
            "Org",
            vec![
                Node::branch(
                    BranchKind::Groups,
                    vec![Node::group(
                        "G1",
                        "Sales",
                        vec![Node::permission_set("A", "A"), Node::permission_set("B", "B")],
                    )],
                ),
                Node::branch(BranchKind::Standalone, vec![Node::permission_set("C", "C")]),
            ],
        )
    }

    fn keys(tree: &VisualTree, order: &[usize]) -> Vec<String> {
        order
            .iter()
            .filter_map(|&i| tree.node(i))
            .map(|n| n.key.to_string())
            .collect()
    }

    #[test]
    fn test_keys_use_id_or_breadth_first_fallback() {
        let tree = VisualTree::from_node(&sample());
        let all: Vec<String> = tree.iter().map(|n| n.key.to_string()).collect();
        assert_eq!(
            all,
            vec![
                "Org-0-0",
                "Permission Set Groups-1-1",
                "Standalone Permission Sets-1-2",
                "G1",
                "C",
                "A",
                "B",
            ]
        );
    }

    #[test]
    fn test_keys_are_stable_across_rebuilds() {
        let first = VisualTree::from_node(&sample());
        let second = VisualTree::from_node(&sample());
        let a: Vec<&NodeKey> = first.iter().map(|n| &n.key).collect();
        let b: Vec<&NodeKey> = second.iter().map(|n| &n.key).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_expands_only_root() {
        let tree = VisualTree::from_node(&sample());
        let mut states = NodeStateTable::new();
        states.reset_for(&tree);

        let visible = tree.visible_order(&states);
        assert_eq!(
            keys(&tree, &visible),
            vec![
                "Org-0-0",
                "Permission Set Groups-1-1",
                "Standalone Permission Sets-1-2",
            ]
        );
        assert!(tree.has_hidden_children(1, &states));
        assert!(!tree.has_hidden_children(VisualTree::ROOT, &states));
    }

    #[test]
    fn test_visible_order_is_preorder() {
        let tree = VisualTree::from_node(&sample());
        let mut states = NodeStateTable::new();
        states.reset_for(&tree);
        for node in tree.iter() {
            states.set_expanded(&node.key, true);
        }
        let visible = tree.visible_order(&states);
        assert_eq!(
            keys(&tree, &visible),
            vec![
                "Org-0-0",
                "Permission Set Groups-1-1",
                "G1",
                "A",
                "B",
                "Standalone Permission Sets-1-2",
                "C",
            ]
        );
    }

    #[test]
    fn test_reset_keeps_positions_and_drops_stale_keys() {
        let tree = VisualTree::from_node(&sample());
        let mut states = NodeStateTable::new();
        states.reset_for(&tree);
        states.remember(&NodeKey::from("G1"), Pos2::new(5.0, 6.0));
        states.remember(&NodeKey::from("gone"), Pos2::new(1.0, 1.0));
        states.set_expanded(&NodeKey::from("G1"), true);

        states.reset_for(&tree);

        assert_eq!(states.previous(&NodeKey::from("G1")), Some(Pos2::new(5.0, 6.0)));
        assert!(!states.is_expanded(&NodeKey::from("G1")));
        assert!(states.get(&NodeKey::from("gone")).is_none());
    }

    #[test]
    fn test_toggle() {
        let mut states = NodeStateTable::new();
        let key = NodeKey::from("X");
        assert!(states.toggle(&key));
        assert!(!states.toggle(&key));
    }
}
