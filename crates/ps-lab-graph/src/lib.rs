//! PS-Lab Hierarchy Tree Widget
//!
//! This crate contains ONLY the tree widget - no filtering, no app shell.
//! The widget is driven by the `ps-lab` visualizer, which owns the hierarchy
//! data and decides what to show.

pub mod graph;

pub use graph::{
    global_settings,
    wrap_label,
    // Text measurement
    ApproxTextMeasure,
    BreadthExtent,
    ConfigError,
    // Core widget
    HierarchyTreeWidget,
    KeyDiff,
    // Identity & state
    NodeKey,
    NodeStateTable,
    RenderDiff,
    Scene,
    TextMeasure,
    TooltipContent,
    TooltipState,
    TreeEvent,
    TreeLayout,
    // Settings
    TreeSettings,
    ViewBox,
    VisualTree,
};
