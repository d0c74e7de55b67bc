//! PS-Lab - Permission-Set Hierarchy Lab
//!
//! Filters an organization's permission-set containment hierarchy against a
//! detection result and drives an incrementally re-rendered tree view of it.
//!
//! ## Architecture
//! Backend JSON -> `ps_lab_types::Node` -> `hierarchy_filter::filter`
//! -> `visualizer::HierarchyVisualizer` -> `ps_lab_graph::HierarchyTreeWidget`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ps_lab::{filter, DetectionResult, FilterPayload, Node};
//!
//! let hierarchy: Node = serde_json::from_str(r#"{"name": "Org", "children": []}"#).unwrap();
//! let detection = DetectionResult::default();
//! let outcome = filter(Some(&hierarchy), &detection, &FilterPayload::default());
//! assert!(outcome.filtered_tree.is_none());
//! ```

// Core error handling
pub mod error;

// Pruning of the hierarchy against detection results
pub mod hierarchy_filter;

// Host controller around the tree widget
pub mod visualizer;

pub use error::{reduce_errors, PsLabError, PsLabResult};
pub use hierarchy_filter::{collect_ids, filter, find_by_id, FilterOutcome};
pub use visualizer::{
    DetectionEvent, ExpansionState, HierarchyVisualizer, Notification, NotificationVariant,
};

// Shared wire types
pub use ps_lab_types::{
    BranchKind, DetectionResult, FilterPayload, HighlightedIds, Node, NodeKind, PermissionType,
    RawNode,
};

// Tree widget
pub use ps_lab_graph::{HierarchyTreeWidget, NodeKey, TreeEvent, TreeSettings};
