//! Pruning policy for the "Permission Set Groups" branch

use std::collections::BTreeSet;

use ps_lab_types::{FilterPayload, HighlightedIds, Node, NodeKind, PermissionType};
use tracing::debug;

/// Keep only groups with at least one detected child, and only those children.
///
/// A group-search payload with explicit names narrows the candidate groups
/// to those names first. Returns `None` when no group survives.
pub(super) fn filter_groups_branch(
    branch: &Node,
    detected_ids: &BTreeSet<String>,
    payload: &FilterPayload,
    highlighted: &mut HighlightedIds,
) -> Option<Node> {
    let target_names = if payload.is_type(PermissionType::PermissionSetGroup) {
        payload.target_names()
    } else {
        None
    };

    let surviving: Vec<Node> = branch
        .children()
        .iter()
        .filter(|group| group.kind() == NodeKind::Group)
        .filter(|group| {
            target_names
                .as_ref()
                .map_or(true, |names| names.iter().any(|name| *name == group.name()))
        })
        .filter_map(|group| prune_group(group, detected_ids, highlighted))
        .collect();

    debug!(
        candidates = branch.children().len(),
        surviving = surviving.len(),
        "filtered groups branch"
    );

    if surviving.is_empty() {
        None
    } else {
        Some(branch.leaf_copy().with_children(surviving))
    }
}

fn prune_group(
    group: &Node,
    detected_ids: &BTreeSet<String>,
    highlighted: &mut HighlightedIds,
) -> Option<Node> {
    let matching: Vec<Node> = group
        .children()
        .iter()
        .filter(|ps| ps.id().is_some_and(|id| detected_ids.contains(id)))
        .cloned()
        .collect();

    if matching.is_empty() {
        return None;
    }

    if let Some(id) = group.id() {
        highlighted.insert(id.to_string());
    }
    highlighted.extend(matching.iter().filter_map(Node::id).map(str::to_string));

    Some(group.leaf_copy().with_children(matching))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_lab_types::BranchKind;

    fn groups_branch() -> Node {
        Node::branch(
            BranchKind::Groups,
            vec![
                Node::group(
                    "G1",
                    "Sales",
                    vec![
                        Node::permission_set("A", "A"),
                        Node::permission_set("B", "B"),
                        Node::permission_set("D", "D"),
                    ],
                ),
                Node::group("G2", "Service", vec![Node::permission_set("E", "E")]),
            ],
        )
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_matching_children_in_order() {
        let mut highlighted = HighlightedIds::new();
        let branch = filter_groups_branch(
            &groups_branch(),
            &ids(&["D", "A"]),
            &FilterPayload::default(),
            &mut highlighted,
        )
        .unwrap();

        assert_eq!(branch.children().len(), 1);
        let kept: Vec<&str> = branch.children()[0]
            .children()
            .iter()
            .map(Node::name)
            .collect();
        assert_eq!(kept, vec!["A", "D"]);
        assert_eq!(highlighted, ids(&["G1", "A", "D"]));
    }

    #[test]
    fn test_named_group_search_restricts_candidates() {
        let mut highlighted = HighlightedIds::new();
        let branch = filter_groups_branch(
            &groups_branch(),
            &ids(&["A", "E"]),
            &FilterPayload::groups(Some("Service")),
            &mut highlighted,
        )
        .unwrap();

        assert_eq!(branch.children().len(), 1);
        assert_eq!(branch.children()[0].name(), "Service");
        assert_eq!(highlighted, ids(&["G2", "E"]));
    }

    #[test]
    fn test_names_ignored_for_other_permission_types() {
        let mut highlighted = HighlightedIds::new();
        let branch = filter_groups_branch(
            &groups_branch(),
            &ids(&["A", "E"]),
            &FilterPayload::permission_sets(Some("Service")),
            &mut highlighted,
        )
        .unwrap();
        assert_eq!(branch.children().len(), 2);
    }

    #[test]
    fn test_no_match_drops_branch() {
        let mut highlighted = HighlightedIds::new();
        let branch = filter_groups_branch(
            &groups_branch(),
            &ids(&["Z"]),
            &FilterPayload::default(),
            &mut highlighted,
        );
        assert!(branch.is_none());
        assert!(highlighted.is_empty());
    }
}
