//! Retained sprites for the rendered tree
//!
//! A `Scene` holds one sprite per rendered node and per rendered link, keyed
//! by `NodeKey`. Each render pass reconciles the sprites against the newly
//! visible set:
//!
//! - **enter**: created at the parent's previous position (or the source's),
//!   fading in while moving to the new position
//! - **update**: retargeted from wherever it currently is
//! - **exit**: moved toward the source's new position while fading out, then
//!   dropped once its transition finishes
//!
//! Links are keyed by their child node and follow the same rules.

use std::collections::{HashMap, HashSet};

use egui::Pos2;
use ps_lab_types::HighlightedIds;

use super::animation::{TweenF32, TweenPos2};
use super::diff::{KeyDiff, RenderDiff};
use super::layout::TreeLayout;
use super::tree::{NodeKey, NodeStateTable, VisualTree};

/// Visual style resolved for one node in one pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeStyle {
    pub highlighted: bool,
    pub has_hidden_children: bool,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct NodeSprite {
    pub key: NodeKey,
    pub position: TweenPos2,
    pub opacity: TweenF32,
    pub style: NodeStyle,
    pub exiting: bool,
}

impl NodeSprite {
    pub fn is_animating(&self) -> bool {
        self.position.is_animating() || self.opacity.is_animating()
    }
}

#[derive(Debug, Clone)]
pub struct LinkSprite {
    /// Key of the child endpoint
    pub key: NodeKey,
    pub source: TweenPos2,
    pub target: TweenPos2,
    pub exiting: bool,
}

impl LinkSprite {
    pub fn is_animating(&self) -> bool {
        self.source.is_animating() || self.target.is_animating()
    }
}

/// Inputs for one reconciliation pass
pub struct RenderPass<'a> {
    pub tree: &'a VisualTree,
    /// Visible node indices, pre-order
    pub visible: &'a [usize],
    pub layout: &'a TreeLayout,
    /// State before this pass's positions are recorded
    pub states: &'a NodeStateTable,
    pub highlighted: &'a HighlightedIds,
    /// Node whose change triggered the pass
    pub source: usize,
    pub duration: f32,
}

impl RenderPass<'_> {
    fn position(&self, index: usize) -> Pos2 {
        self.layout.position(index).unwrap_or(Pos2::ZERO)
    }

    fn source_previous(&self) -> Pos2 {
        self.tree
            .node(self.source)
            .and_then(|node| self.states.previous(&node.key))
            .unwrap_or_else(|| self.source_current())
    }

    fn source_current(&self) -> Pos2 {
        self.layout
            .position(self.source)
            .or_else(|| self.layout.position(VisualTree::ROOT))
            .unwrap_or(Pos2::ZERO)
    }

    /// Where an entering node or link starts
    fn enter_origin(&self, index: usize) -> Pos2 {
        self.tree
            .node(index)
            .and_then(|node| node.parent)
            .and_then(|parent| self.tree.node(parent))
            .and_then(|parent| self.states.previous(&parent.key))
            .unwrap_or_else(|| self.source_previous())
    }

    fn style(&self, index: usize) -> NodeStyle {
        let Some(node) = self.tree.node(index) else {
            return NodeStyle::default();
        };
        NodeStyle {
            highlighted: node
                .data
                .id
                .as_ref()
                .is_some_and(|id| self.highlighted.contains(id)),
            has_hidden_children: self.tree.has_hidden_children(index, self.states),
            label: node.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: HashMap<NodeKey, NodeSprite>,
    links: HashMap<NodeKey, LinkSprite>,
    /// Draw order of live (non-exiting) nodes, pre-order
    order: Vec<NodeKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile sprites with a new layout
    pub fn apply(&mut self, pass: &RenderPass<'_>) -> RenderDiff {
        let duration = pass.duration;
        let source_current = pass.source_current();

        let current: Vec<(usize, &NodeKey)> = pass
            .visible
            .iter()
            .filter_map(|&i| pass.tree.node(i).map(|n| (i, &n.key)))
            .collect();

        // Sprites still fading out are matched too, so a node that returns
        // mid-exit resumes from where it is
        let rendered_nodes: HashSet<NodeKey> = self.nodes.keys().cloned().collect();
        let rendered_links: HashSet<NodeKey> = self.links.keys().cloned().collect();

        let node_diff = KeyDiff::compute(&rendered_nodes, current.iter().map(|(_, k)| *k));
        let link_diff = KeyDiff::compute(
            &rendered_links,
            current
                .iter()
                .filter(|(i, _)| *i != VisualTree::ROOT)
                .map(|(_, k)| *k),
        );

        // Nodes: enter + update
        for &(index, key) in &current {
            let target = pass.position(index);
            let style = pass.style(index);
            match self.nodes.get_mut(key) {
                Some(sprite) => {
                    sprite.position.retarget(target, duration);
                    sprite.opacity.retarget(1.0, duration);
                    sprite.style = style;
                    sprite.exiting = false;
                }
                None => {
                    let mut position = TweenPos2::new(pass.enter_origin(index));
                    position.retarget(target, duration);
                    let mut opacity = TweenF32::new(0.0);
                    opacity.retarget(1.0, duration);
                    self.nodes.insert(
                        key.clone(),
                        NodeSprite {
                            key: key.clone(),
                            position,
                            opacity,
                            style,
                            exiting: false,
                        },
                    );
                }
            }
        }

        // Links: enter + update (a link follows its two endpoints)
        for &(index, key) in current.iter().filter(|(i, _)| *i != VisualTree::ROOT) {
            let Some(parent) = pass.tree.node(index).and_then(|n| n.parent) else {
                continue;
            };
            let source = pass.position(parent);
            let target = pass.position(index);
            match self.links.get_mut(key) {
                Some(link) => {
                    link.source.retarget(source, duration);
                    link.target.retarget(target, duration);
                    link.exiting = false;
                }
                None => {
                    let origin = pass.enter_origin(index);
                    let mut link = LinkSprite {
                        key: key.clone(),
                        source: TweenPos2::new(origin),
                        target: TweenPos2::new(origin),
                        exiting: false,
                    };
                    link.source.retarget(source, duration);
                    link.target.retarget(target, duration);
                    self.links.insert(key.clone(), link);
                }
            }
        }

        // Exits collapse into the source's new position
        for key in &node_diff.exited {
            if let Some(sprite) = self.nodes.get_mut(key) {
                sprite.position.retarget(source_current, duration);
                sprite.opacity.retarget(0.0, duration);
                sprite.exiting = true;
            }
        }
        for key in &link_diff.exited {
            if let Some(link) = self.links.get_mut(key) {
                link.source.retarget(source_current, duration);
                link.target.retarget(source_current, duration);
                link.exiting = true;
            }
        }

        self.order = current.iter().map(|(_, k)| (*k).clone()).collect();
        self.prune();

        RenderDiff {
            nodes: node_diff,
            links: link_diff,
        }
    }

    /// Advance every transition by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for sprite in self.nodes.values_mut() {
            sprite.position.tick(dt);
            sprite.opacity.tick(dt);
        }
        for link in self.links.values_mut() {
            link.source.tick(dt);
            link.target.tick(dt);
        }
        self.prune();
    }

    /// Drop exiting sprites whose transition has finished
    fn prune(&mut self) {
        self.nodes.retain(|_, s| !(s.exiting && !s.is_animating()));
        self.links.retain(|_, l| !(l.exiting && !l.is_animating()));
    }

    pub fn is_animating(&self) -> bool {
        self.nodes.values().any(NodeSprite::is_animating)
            || self.links.values().any(LinkSprite::is_animating)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&NodeSprite> {
        self.nodes.get(key)
    }

    pub fn link(&self, key: &NodeKey) -> Option<&LinkSprite> {
        self.links.get(key)
    }

    /// Exiting sprites first, then live ones in tree order
    pub fn nodes_in_draw_order(&self) -> impl Iterator<Item = &NodeSprite> {
        let exiting = self.nodes.values().filter(|s| s.exiting);
        let live = self.order.iter().filter_map(|k| self.nodes.get(k));
        exiting.chain(live)
    }

    pub fn links(&self) -> impl Iterator<Item = &LinkSprite> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.order.clear();
    }
}
