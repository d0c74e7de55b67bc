//! Pruning policy for the "Standalone Permission Sets" branch
//!
//! A standalone permission set only surfaces when it was matched directly:
//! its detection entry must have an empty (or absent) `includedIn`. A set
//! that was only reachable through some group belongs under that group.

use ps_lab_types::{
    DetectionResult, FilterPayload, HighlightedIds, Node, NodeKind, PermissionType,
};
use tracing::debug;

use super::ids::find_by_id;

/// Keep the directly-matched standalone permission sets, copied as leaves.
///
/// A permission-set search with explicit names only considers those names.
/// Returns `None` when nothing survives.
pub(super) fn filter_standalone_branch(
    branch: &Node,
    detection: &DetectionResult,
    payload: &FilterPayload,
    highlighted: &mut HighlightedIds,
) -> Option<Node> {
    let target_names = if payload.is_type(PermissionType::PermissionSet) {
        payload.target_names()
    } else {
        None
    };

    let surviving: Vec<Node> = branch
        .children()
        .iter()
        .filter(|ps| ps.kind() == NodeKind::PermissionSet)
        .filter(|ps| {
            target_names
                .as_ref()
                .map_or(true, |names| names.iter().any(|name| *name == ps.name()))
        })
        .filter(|ps| is_direct_match(ps, detection))
        .map(Node::leaf_copy)
        .collect();

    highlighted.extend(surviving.iter().filter_map(Node::id).map(str::to_string));

    debug!(
        named = target_names.is_some(),
        surviving = surviving.len(),
        "filtered standalone branch"
    );

    if surviving.is_empty() {
        None
    } else {
        Some(branch.leaf_copy().with_children(surviving))
    }
}

fn is_direct_match(ps: &Node, detection: &DetectionResult) -> bool {
    ps.id()
        .and_then(|id| find_by_id(detection, id))
        .is_some_and(|entry| entry.is_directly_matched())
}
