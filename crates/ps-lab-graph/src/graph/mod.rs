//! Incremental hierarchy tree widget
//!
//! Renders a permission hierarchy as a collapsible, left-to-right tidy tree
//! and animates every change instead of redrawing from scratch.
//!
//! # Architecture
//!
//! ```text
//! Node (from the filter / host)
//!        │
//!        ▼
//! VisualTree (BFS arena + NodeKey identity) ◄── NodeStateTable (expanded, prev pos)
//!        │
//!        ▼
//! TreeLayout (tidy contour layout, breadth extent)
//!        │
//!        ├──► Scene::apply (enter / update / exit → tweens)
//!        ├──► AnimatedViewBox (surface height + origin)
//!        └──► SpatialIndex (hit testing)
//!                    │
//!                    ▼
//!              TreePainter (links, nodes, wrapped labels, tooltip)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut tree = HierarchyTreeWidget::new();
//! tree.initialize(egui::vec2(928.0, 600.0), hierarchy);
//! tree.update(filtered, highlighted_ids);
//! tree.expand_all();
//! tree.ui(ui);
//! for event in tree.take_events() { /* ... */ }
//! ```

pub mod animation;
pub mod colors;
pub mod config;
pub mod diff;
pub mod layout;
pub mod render;
pub mod scene;
pub mod spatial;
pub mod text_wrap;
pub mod tooltip;
pub mod tree;
pub mod viewport;

pub use config::{global_settings, ConfigError, TreeSettings};
pub use diff::{KeyDiff, RenderDiff};
pub use layout::{BreadthExtent, TreeLayout};
pub use scene::Scene;
pub use text_wrap::{wrap_label, ApproxTextMeasure, TextMeasure};
pub use tooltip::{TooltipContent, TooltipState};
pub use tree::{NodeKey, NodeStateTable, VisualTree};
pub use viewport::ViewBox;

use egui::{Pos2, Sense, Vec2};
use ps_lab_types::{HighlightedIds, Node};
use tracing::{debug, info};

use render::TreePainter;
use scene::RenderPass;
use spatial::{SpatialIndex, SpatialNode};
use viewport::{AnimatedViewBox, ScreenTransform};

/// Interaction the host may observe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A node was clicked and its expansion toggled
    NodeClicked {
        key: NodeKey,
        id: Option<String>,
        /// Expansion state after the click
        expanded: bool,
    },
}

pub struct HierarchyTreeWidget {
    settings: TreeSettings,
    container_width: f32,
    /// Depth-axis distance between levels; known once initialized
    depth_spacing: Option<f32>,
    tree: Option<VisualTree>,
    states: NodeStateTable,
    highlighted: HighlightedIds,
    layout: TreeLayout,
    scene: Scene,
    view_box: AnimatedViewBox,
    spatial: SpatialIndex,
    tooltip: TooltipState,
    events: Vec<TreeEvent>,
    last_diff: Option<RenderDiff>,
}

impl Default for HierarchyTreeWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTreeWidget {
    pub fn new() -> Self {
        Self::with_settings(global_settings().clone())
    }

    pub fn with_settings(settings: TreeSettings) -> Self {
        let container_width = settings.fallback_width;
        let view_box = ViewBox::fit(BreadthExtent::default(), container_width, &settings.margin);
        Self {
            settings,
            container_width,
            depth_spacing: None,
            tree: None,
            states: NodeStateTable::new(),
            highlighted: HighlightedIds::new(),
            layout: TreeLayout::default(),
            scene: Scene::new(),
            view_box: AnimatedViewBox::new(view_box),
            spatial: SpatialIndex::new(),
            tooltip: TooltipState::default(),
            events: Vec::new(),
            last_diff: None,
        }
    }

    // =========================================================================
    // HOST OPERATIONS
    // =========================================================================

    /// Size the drawing surface and render `tree` for the first time.
    ///
    /// A zero width falls back to the configured default width.
    pub fn initialize(&mut self, dimensions: Vec2, tree: Node) {
        self.container_width = if dimensions.x > 0.0 {
            dimensions.x
        } else {
            self.settings.fallback_width
        };
        let depth_spacing = self.settings.depth_spacing_for(dimensions.x);
        self.depth_spacing = Some(depth_spacing);
        self.scene.clear();
        self.view_box = AnimatedViewBox::new(ViewBox::fit(
            BreadthExtent::default(),
            self.container_width,
            &self.settings.margin,
        ));

        info!(
            width = self.container_width,
            depth_spacing, "initializing hierarchy tree"
        );
        self.update(tree, HighlightedIds::new());
    }

    /// Replace the working tree and highlighted set.
    ///
    /// Collapse state resets: only the root's direct children are shown.
    /// Nodes whose identity survives animate from where they were.
    pub fn update(&mut self, tree: Node, highlighted: HighlightedIds) {
        let visual = VisualTree::from_node(&tree);
        self.states.reset_for(&visual);
        if let Some(key) = &self.tooltip.node {
            if !visual.contains(key) {
                self.tooltip.hide();
            }
        }
        debug!(
            nodes = visual.len(),
            highlighted = highlighted.len(),
            "hierarchy tree updated"
        );
        self.highlighted = highlighted;
        self.tree = Some(visual);
        self.render(VisualTree::ROOT);
    }

    /// Expand every node
    pub fn expand_all(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        for node in tree.iter().filter(|n| n.has_children()) {
            self.states.set_expanded(&node.key, true);
        }
        self.render(VisualTree::ROOT);
    }

    /// Collapse every node below the root; the root's own state is left as is
    pub fn collapse_all(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        for node in tree.iter().filter(|n| n.depth > 0 && n.has_children()) {
            self.states.set_expanded(&node.key, false);
        }
        self.render(VisualTree::ROOT);
    }

    /// Toggle one node and re-render with it as the transition source.
    ///
    /// Returns `false` when `key` is not in the current tree.
    pub fn click(&mut self, key: &NodeKey) -> bool {
        let Some((index, id)) = self
            .tree
            .as_ref()
            .and_then(|tree| tree.index_of(key).zip(tree.get(key)))
            .map(|(index, node)| (index, node.data.id.clone()))
        else {
            return false;
        };

        let expanded = self.states.toggle(key);
        debug!(key = %key, expanded, "node toggled");
        self.events.push(TreeEvent::NodeClicked {
            key: key.clone(),
            id,
            expanded,
        });
        self.render(index);
        true
    }

    /// Show the tooltip for `key` near `pointer`, or hide it.
    ///
    /// `pointer` is relative to the visible container of height
    /// `container_height`; `scroll` is the container's scroll offset.
    pub fn hover(
        &mut self,
        key: Option<&NodeKey>,
        pointer: Pos2,
        container_height: f32,
        scroll: Vec2,
    ) {
        let content = key.and_then(|key| {
            let node = self.tree.as_ref()?.get(key)?;
            TooltipContent::for_node(node.kind, &node.data).map(|c| (key.clone(), c))
        });
        match content {
            Some((key, content)) => {
                let size = content.estimated_size(&self.settings.tooltip);
                let position = tooltip::place_tooltip(
                    pointer,
                    size,
                    container_height,
                    scroll,
                    &self.settings.tooltip,
                );
                self.tooltip.show(key, content, position);
            }
            None => self.tooltip.hide(),
        }
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip.hide();
    }

    /// Advance transitions by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.scene.tick(dt);
        self.view_box.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.scene.is_animating() || self.view_box.is_animating()
    }

    /// Drain interaction events since the last call
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn is_initialized(&self) -> bool {
        self.depth_spacing.is_some()
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Keys of the currently visible nodes, pre-order
    pub fn visible_keys(&self) -> Vec<NodeKey> {
        let Some(tree) = self.tree.as_ref() else {
            return Vec::new();
        };
        tree.visible_order(&self.states)
            .into_iter()
            .filter_map(|i| tree.node(i).map(|n| n.key.clone()))
            .collect()
    }

    /// `None` when `key` is not in the current tree
    pub fn is_expanded(&self, key: &NodeKey) -> Option<bool> {
        let tree = self.tree.as_ref()?;
        tree.contains(key).then(|| self.states.is_expanded(key))
    }

    /// Layout target of a visible node
    pub fn node_position(&self, key: &NodeKey) -> Option<Pos2> {
        let index = self.tree.as_ref()?.index_of(key)?;
        self.layout.position(index)
    }

    /// View box the surface is transitioning toward
    pub fn view_box(&self) -> ViewBox {
        self.view_box.target()
    }

    pub fn depth_spacing(&self) -> Option<f32> {
        self.depth_spacing
    }

    pub fn highlighted(&self) -> &HighlightedIds {
        &self.highlighted
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn last_diff(&self) -> Option<&RenderDiff> {
        self.last_diff.as_ref()
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    // =========================================================================
    // RENDER PASS
    // =========================================================================

    fn render(&mut self, source: usize) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        let depth_spacing = self
            .depth_spacing
            .unwrap_or_else(|| self.settings.depth_spacing_for(0.0));
        let duration = self.settings.transition_secs();

        let visible = tree.visible_order(&self.states);
        let layout = TreeLayout::compute(tree, &self.states, self.settings.node_spacing, depth_spacing);

        let diff = self.scene.apply(&RenderPass {
            tree,
            visible: &visible,
            layout: &layout,
            states: &self.states,
            highlighted: &self.highlighted,
            source,
            duration,
        });

        for &index in &visible {
            if let (Some(node), Some(position)) = (tree.node(index), layout.position(index)) {
                self.states.remember(&node.key, position);
            }
        }

        let radius = self.settings.node.highlight_radius;
        self.spatial.rebuild(visible.iter().filter_map(|&index| {
            let node = tree.node(index)?;
            Some(SpatialNode::new(node.key.clone(), layout.position(index)?, radius))
        }));

        self.view_box.retarget(
            ViewBox::fit(layout.extent(), self.container_width, &self.settings.margin),
            duration,
        );

        debug!(
            visible = visible.len(),
            entered = diff.nodes.entered.len(),
            exited = diff.nodes.exited.len(),
            "hierarchy tree rendered"
        );

        self.layout = layout;
        self.last_diff = Some(diff);
    }

    fn hit_key(&self, world: Pos2) -> Option<NodeKey> {
        self.spatial
            .hit_test(world, self.settings.node.hit_radius)
            .map(|node| node.key.clone())
    }

    // =========================================================================
    // EGUI
    // =========================================================================

    /// Draw the tree and handle hover/click
    pub fn ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        if self.tree.is_none() {
            return ui
                .centered_and_justified(|ui| ui.label("No hierarchy loaded"))
                .inner;
        }

        let dt = ui.input(|i| i.stable_dt);
        self.tick(dt);

        let view_box = self.view_box.get();
        let desired = Vec2::new(ui.available_width(), view_box.height);
        let (response, painter) = ui.allocate_painter(desired, Sense::click());
        let transform = ScreenTransform::new(response.rect, &view_box, &self.settings);
        let clip = ui.clip_rect();

        match response.hover_pos() {
            Some(pointer) => {
                let hit = self.hit_key(transform.to_world(pointer));
                if hit.is_some() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let visible_pointer = (pointer - clip.min).to_pos2();
                let scroll = clip.min - response.rect.min;
                self.hover(hit.as_ref(), visible_pointer, clip.height(), scroll);
            }
            None => self.hide_tooltip(),
        }

        if response.clicked() {
            if let Some(key) = response
                .interact_pointer_pos()
                .and_then(|pointer| self.hit_key(transform.to_world(pointer)))
            {
                self.click(&key);
            }
        }

        let wrap_width = self.settings.wrap.width_for(self.depth_spacing);
        let tree_painter = TreePainter::new(&painter, transform, &self.settings, wrap_width);
        tree_painter.paint_scene(&self.scene);
        if let Some(content) = &self.tooltip.content {
            tree_painter.paint_tooltip(response.rect.min + self.tooltip.position.to_vec2(), content);
        }

        if self.is_animating() {
            ui.ctx().request_repaint();
        }
        response
    }
}
