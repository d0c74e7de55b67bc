//! Hierarchy Filter
//!
//! Prunes the full permission-set hierarchy down to the nodes relevant to a
//! detection result and its query payload.
//!
//! # Architecture
//!
//! ```text
//! Node (full hierarchy, never mutated)
//!        │
//!        ├──► groups::filter_groups_branch      ──┐
//!        │                                        ├──► new Root ──► FilterOutcome
//!        └──► standalone::filter_standalone_branch┘        (+ highlighted ids)
//! ```
//!
//! Each branch policy copies what it keeps, so the caller's tree can be used
//! as the baseline for any number of later, narrower filter calls.

mod groups;
pub mod ids;
mod standalone;

use serde::Serialize;
use tracing::debug;

use ps_lab_types::{
    BranchKind, DetectionResult, FilterPayload, HighlightedIds, Node, PermissionType,
};

pub use ids::{collect_ids, find_by_id, IdNode};

/// Result of a filter pass
///
/// `filtered_tree` is `None` when nothing matched; the highlighted set is
/// returned either way.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome {
    pub filtered_tree: Option<Node>,
    pub highlighted_ids: HighlightedIds,
}

impl FilterOutcome {
    /// "Nothing to show"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_results(&self) -> bool {
        self.filtered_tree
            .as_ref()
            .is_some_and(|tree| !tree.children().is_empty())
    }
}

/// Prune `hierarchy` to the nodes relevant to `detection` under `payload`.
///
/// Never fails: an absent hierarchy or an empty detection result yields
/// [`FilterOutcome::empty`].
pub fn filter(
    hierarchy: Option<&Node>,
    detection: &DetectionResult,
    payload: &FilterPayload,
) -> FilterOutcome {
    let Some(hierarchy) = hierarchy else {
        debug!("no hierarchy to filter");
        return FilterOutcome::empty();
    };
    if detection.is_empty() {
        debug!("empty detection result, nothing to show");
        return FilterOutcome::empty();
    }

    let detected_ids = collect_ids(detection);
    let mut highlighted_ids = HighlightedIds::new();
    let mut branches = Vec::with_capacity(2);

    if let Some(branch) = hierarchy.branch_of(BranchKind::Groups) {
        if let Some(filtered) =
            groups::filter_groups_branch(branch, &detected_ids, payload, &mut highlighted_ids)
        {
            branches.push(filtered);
        }
    }

    // Group searches never surface standalone results
    if !payload.is_type(PermissionType::PermissionSetGroup) {
        if let Some(branch) = hierarchy.branch_of(BranchKind::Standalone) {
            if let Some(filtered) = standalone::filter_standalone_branch(
                branch,
                detection,
                payload,
                &mut highlighted_ids,
            ) {
                branches.push(filtered);
            }
        }
    }

    debug!(
        detected = detected_ids.len(),
        branches = branches.len(),
        highlighted = highlighted_ids.len(),
        permission_type = payload.permission_type.map(|t| t.as_str()),
        "hierarchy filtered"
    );

    let filtered_tree = if branches.is_empty() {
        None
    } else {
        Some(hierarchy.leaf_copy().with_children(branches))
    };

    FilterOutcome {
        filtered_tree,
        highlighted_ids,
    }
}
