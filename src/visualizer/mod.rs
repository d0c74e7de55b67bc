//! Hierarchy Visualizer
//!
//! Host-side controller around [`HierarchyTreeWidget`]. It owns the three
//! hierarchies a session juggles and decides what the widget shows:
//!
//! ```text
//! original   - full hierarchy as loaded, never modified
//! contextual - baseline set by an unscoped detection (e.g. a user search)
//! current    - what the widget is showing right now
//! ```
//!
//! Detection results arrive as [`DetectionEvent`]s. Each one is filtered
//! against the contextual hierarchy (or the original when there is none) and
//! pushed into the widget fully expanded.

mod notifications;

pub use notifications::{Notification, NotificationQueue, NotificationVariant};

use egui::Vec2;
use serde::Deserialize;
use tracing::{debug, info};

use ps_lab_graph::{HierarchyTreeWidget, TreeEvent, TreeSettings};
use ps_lab_types::{DetectionResult, FilterPayload, HighlightedIds, Node, RawNode};

use crate::error::reduce_errors;
use crate::hierarchy_filter::{collect_ids, filter};

/// Scroll offset past which the scroll-to-top affordance appears
pub const SCROLL_BUTTON_THRESHOLD: f32 = 300.0;

const NO_MATCHES_MESSAGE: &str = "No matching items found for the applied filter.";

/// Whether the last bulk action expanded or collapsed the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Expanded,
}

/// A detection response paired with the query that produced it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub permission_sets: DetectionResult,
    #[serde(default)]
    pub payload: FilterPayload,
}

impl DetectionEvent {
    pub fn new(permission_sets: DetectionResult, payload: FilterPayload) -> Self {
        Self {
            permission_sets,
            payload,
        }
    }
}

pub struct HierarchyVisualizer {
    settings: TreeSettings,
    original: Option<Node>,
    contextual: Option<Node>,
    current: Option<Node>,
    chart: Option<HierarchyTreeWidget>,
    expansion: ExpansionState,
    loading: bool,
    show_scroll_button: bool,
    scroll_to_top_requested: bool,
    notifications: NotificationQueue,
}

impl Default for HierarchyVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyVisualizer {
    pub fn new() -> Self {
        Self::with_settings(ps_lab_graph::global_settings().clone())
    }

    pub fn with_settings(settings: TreeSettings) -> Self {
        Self {
            settings,
            original: None,
            contextual: None,
            current: None,
            chart: None,
            expansion: ExpansionState::Collapsed,
            loading: true,
            show_scroll_button: false,
            scroll_to_top_requested: false,
            notifications: NotificationQueue::default(),
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Accept the result of the hierarchy request.
    ///
    /// `Ok(None)` and `Err(_)` leave the visualizer without data and record
    /// an error notification.
    pub fn load<E: std::fmt::Display>(&mut self, result: Result<Option<Node>, E>) {
        self.loading = false;
        match result {
            Ok(Some(hierarchy)) => {
                info!(nodes = hierarchy.subtree_len(), "hierarchy loaded");
                self.original = Some(hierarchy.clone());
                self.current = Some(hierarchy.clone());
                if let Some(chart) = self.chart.as_mut() {
                    chart.update(hierarchy, HighlightedIds::new());
                }
            }
            Ok(None) => self
                .notifications
                .push(Notification::error("Data Error", "No hierarchy data returned.")),
            Err(error) => self.notifications.push(Notification::error(
                "Initialization Failed",
                reduce_errors([error]),
            )),
        }
    }

    /// Create the chart for a surface of `dimensions` once data is present.
    ///
    /// Returns `true` when the chart was created by this call.
    pub fn attach(&mut self, dimensions: Vec2) -> bool {
        if self.chart.is_some() {
            return false;
        }
        let Some(current) = self.current.clone() else {
            return false;
        };
        let mut chart = HierarchyTreeWidget::with_settings(self.settings.clone());
        chart.initialize(dimensions, current);
        self.chart = Some(chart);
        true
    }

    // =========================================================================
    // USER ACTIONS
    // =========================================================================

    pub fn toggle_expansion(&mut self) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        self.expansion = match self.expansion {
            ExpansionState::Collapsed => {
                chart.expand_all();
                ExpansionState::Expanded
            }
            ExpansionState::Expanded => {
                chart.collapse_all();
                ExpansionState::Collapsed
            }
        };
    }

    pub fn toggle_button_label(&self) -> &'static str {
        match self.expansion {
            ExpansionState::Collapsed => "Expand All",
            ExpansionState::Expanded => "Collapse All",
        }
    }

    /// Show the part of the hierarchy a detection response is about
    pub fn handle_detection(&mut self, event: DetectionEvent) {
        let DetectionEvent {
            permission_sets,
            payload,
        } = event;
        if self.original.is_none() {
            debug!("detection ignored: no hierarchy loaded");
            return;
        }

        let (filtered, highlighted) = if payload.is_empty() {
            // Unscoped detection: the response itself becomes the baseline
            let highlighted = collect_ids(&permission_sets);
            let contextual = self.detection_tree(permission_sets);
            self.contextual = Some(contextual.clone());
            (Some(contextual), highlighted)
        } else {
            let base = self.contextual.as_ref().or(self.original.as_ref());
            let outcome = filter(base, &permission_sets, &payload);
            (outcome.filtered_tree, outcome.highlighted_ids)
        };

        match filtered.filter(Node::has_children) {
            Some(tree) => {
                self.current = Some(tree.clone());
                if let Some(chart) = self.chart.as_mut() {
                    chart.update(tree, highlighted);
                    chart.expand_all();
                }
                self.expansion = ExpansionState::Expanded;
            }
            None => {
                self.notifications
                    .push(Notification::info("Info", NO_MATCHES_MESSAGE));
                let empty = self.empty_hierarchy();
                self.current = Some(empty.clone());
                if let Some(chart) = self.chart.as_mut() {
                    chart.update(empty, HighlightedIds::new());
                }
            }
        }
    }

    /// Forget the contextual baseline; later detections filter the original
    pub fn clear_context(&mut self) {
        self.contextual = None;
    }

    /// Show the full original hierarchy again
    pub fn reset_filters(&mut self) {
        let Some(original) = self.original.clone() else {
            return;
        };
        self.current = Some(original.clone());
        if let Some(chart) = self.chart.as_mut() {
            chart.update(original, HighlightedIds::new());
        }
        self.expansion = ExpansionState::Collapsed;
        self.notifications.push(Notification::info(
            "Info",
            "Filters Reset. Displaying full hierarchy.",
        ));
    }

    /// The original root with no children (an unnamed root before loading)
    pub fn empty_hierarchy(&self) -> Node {
        self.original
            .as_ref()
            .map(Node::leaf_copy)
            .unwrap_or_else(|| Node::root("", Vec::new()))
    }

    /// Scroll position of the hosting container changed
    pub fn handle_scroll(&mut self, scroll_top: f32) {
        if let Some(chart) = self.chart.as_mut() {
            chart.hide_tooltip();
        }
        self.show_scroll_button = scroll_top > SCROLL_BUTTON_THRESHOLD;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_to_top_requested = true;
        self.show_scroll_button = false;
    }

    /// Whether a scroll-to-top was requested since the last call
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top_requested)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn take_tree_events(&mut self) -> Vec<TreeEvent> {
        self.chart
            .as_mut()
            .map(HierarchyTreeWidget::take_events)
            .unwrap_or_default()
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn original(&self) -> Option<&Node> {
        self.original.as_ref()
    }

    pub fn contextual(&self) -> Option<&Node> {
        self.contextual.as_ref()
    }

    pub fn current(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    pub fn chart(&self) -> Option<&HierarchyTreeWidget> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut HierarchyTreeWidget> {
        self.chart.as_mut()
    }

    pub fn expansion(&self) -> ExpansionState {
        self.expansion
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn show_scroll_button(&self) -> bool {
        self.show_scroll_button
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    /// Single entry: that entry is the root. Several: a copy of the original
    /// root holds them.
    fn detection_tree(&self, permission_sets: DetectionResult) -> Node {
        let mut entries = permission_sets.into_entries();
        if entries.len() == 1 {
            if let Some(entry) = entries.pop() {
                return Node::from_raw(entry);
            }
        }
        let root_name = self
            .original
            .as_ref()
            .map(|root| root.name().to_string())
            .unwrap_or_default();
        Node::from_raw(RawNode::named(root_name).with_children(entries))
    }

    // =========================================================================
    // EGUI
    // =========================================================================

    /// Toolbar plus the scrollable chart
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        if self.loading {
            ui.centered_and_justified(|ui| ui.spinner());
            return;
        }

        ui.horizontal(|ui| {
            let enabled = self.chart.is_some();
            if ui
                .add_enabled(enabled, egui::Button::new(self.toggle_button_label()))
                .clicked()
            {
                self.toggle_expansion();
            }
            if ui
                .add_enabled(self.original.is_some(), egui::Button::new("Reset"))
                .clicked()
            {
                self.reset_filters();
            }
            if self.show_scroll_button && ui.button("Scroll to Top").clicked() {
                self.scroll_to_top();
            }
        });
        ui.separator();

        if self.chart.is_none() {
            self.attach(ui.available_size());
        }

        let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
        if self.take_scroll_to_top() {
            area = area.vertical_scroll_offset(0.0);
        }
        let output = area.show(ui, |ui| match self.chart.as_mut() {
            Some(chart) => {
                chart.ui(ui);
            }
            None => {
                ui.label("No hierarchy loaded");
            }
        });

        let scroll_top = output.state.offset.y;
        let was_shown = self.show_scroll_button;
        if (scroll_top > SCROLL_BUTTON_THRESHOLD) != was_shown {
            self.handle_scroll(scroll_top);
        }
    }
}
