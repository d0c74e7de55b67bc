//! Id collection and lookup over hierarchical node collections
//!
//! Both the classified [`Node`] tree and the raw detection entries nest
//! through `children`, so the walkers are written once against [`IdNode`].
//! Inputs are anything iterable over node references: a slice, a
//! `&DetectionResult`, or `std::iter::once(&root)` for a single node.

use std::collections::BTreeSet;

use ps_lab_types::{Node, RawNode};

/// A node that may carry an identifying id and owns ordered children
pub trait IdNode: Sized {
    fn node_id(&self) -> Option<&str>;
    fn node_children(&self) -> &[Self];
}

impl IdNode for Node {
    fn node_id(&self) -> Option<&str> {
        self.id()
    }

    fn node_children(&self) -> &[Self] {
        self.children()
    }
}

impl IdNode for RawNode {
    fn node_id(&self) -> Option<&str> {
        self.identifying_id()
    }

    fn node_children(&self) -> &[Self] {
        &self.children
    }
}

/// Every non-empty identifying id reachable from `nodes`
pub fn collect_ids<'a, N, I>(nodes: I) -> BTreeSet<String>
where
    N: IdNode + 'a,
    I: IntoIterator<Item = &'a N>,
{
    let mut ids = BTreeSet::new();
    for node in nodes {
        collect_into(node, &mut ids);
    }
    ids
}

fn collect_into<N: IdNode>(node: &N, ids: &mut BTreeSet<String>) {
    if let Some(id) = node.node_id().filter(|id| !id.is_empty()) {
        ids.insert(id.to_string());
    }
    for child in node.node_children() {
        collect_into(child, ids);
    }
}

/// Depth-first (pre-order) search; the first node carrying `id` wins
pub fn find_by_id<'a, N, I>(nodes: I, id: &str) -> Option<&'a N>
where
    N: IdNode + 'a,
    I: IntoIterator<Item = &'a N>,
{
    nodes.into_iter().find_map(|node| find_recursive(node, id))
}

fn find_recursive<'a, N: IdNode>(node: &'a N, id: &str) -> Option<&'a N> {
    if node.node_id() == Some(id) {
        return Some(node);
    }
    node.node_children()
        .iter()
        .find_map(|child| find_recursive(child, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_lab_types::{BranchKind, DetectionResult};

    fn sample_tree() -> Node {
        Node::root(
            "root",
            vec![
                Node::branch(
                    BranchKind::Groups,
                    vec![Node::group(
                        "G1",
                        "Group One",
                        vec![Node::permission_set("A", "A"), Node::permission_set("B", "B")],
                    )],
                ),
                Node::branch(
                    BranchKind::Standalone,
                    vec![Node::permission_set("C", "C")],
                ),
            ],
        )
    }

    #[test]
    fn test_collect_ids_single_node() {
        let ids = collect_ids(std::iter::once(&sample_tree()));
        let expected: BTreeSet<String> =
            ["G1", "A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_collect_ids_slice_matches_single() {
        let tree = sample_tree();
        assert_eq!(
            collect_ids(tree.children()),
            collect_ids(std::iter::once(&tree))
        );
    }

    #[test]
    fn test_collect_ids_nested_detection() {
        let detection = DetectionResult::new(vec![RawNode::detected("X", ["G"])
            .with_children(vec![
                RawNode::detected("Y", Vec::<String>::new()),
                RawNode::named("no-id"),
            ])]);
        let ids = collect_ids(&detection);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("X") && ids.contains("Y"));
    }

    #[test]
    fn test_collect_ids_skips_empty_ids() {
        let mut raw = RawNode::named("blank");
        raw.id = Some(String::new());
        assert!(collect_ids(std::iter::once(&raw)).is_empty());
    }

    #[test]
    fn test_find_by_id_depth_first() {
        let tree = sample_tree();
        let found = find_by_id(std::iter::once(&tree), "B").unwrap();
        assert_eq!(found.name(), "B");
        assert!(find_by_id(std::iter::once(&tree), "missing").is_none());
    }

    #[test]
    fn test_find_by_id_first_match_in_traversal_order() {
        let entries = vec![
            RawNode::named("outer").with_children(vec![RawNode::detected("dup", ["first"])]),
            RawNode::detected("dup", ["second"]),
        ];
        let found = find_by_id(&entries, "dup").unwrap();
        assert_eq!(found.included_in.as_deref(), Some(&["first".to_string()][..]));
    }
}
