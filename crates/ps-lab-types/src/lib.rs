//! Shared Hierarchy Types for PS-Lab
//!
//! This crate is the SINGLE SOURCE OF TRUTH for every shape that crosses the
//! backend boundary: the permission-set containment hierarchy, detection
//! results and the query payload.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────────┐        ┌──────────────────┐
//! │  Backend query   │ ──────► │  HierarchyFilter │ ─────► │  Tree renderer   │
//! │  service         │         │  (ps-lab)        │        │  (ps-lab-graph)  │
//! └──────────────────┘         └──────────────────┘        └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Wire shapes (`RawNode`) are camelCase and lenient: absent children are empty
//! 2. Node kind is decided once, at construction time (`Node::from_raw`)
//! 3. No behavior beyond construction helpers and accessors

pub mod detection;
pub mod hierarchy;
pub mod payload;

pub use detection::{DetectionResult, HighlightedIds};
pub use hierarchy::{
    BranchKind, IdField, Node, NodeData, NodeKind, NodeMetadata, RawNode, GROUPS_BRANCH_NAME,
    STANDALONE_BRANCH_NAME,
};
pub use payload::{FilterPayload, ParsePermissionTypeError, PermissionType};
