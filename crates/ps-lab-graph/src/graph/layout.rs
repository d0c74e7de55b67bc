//! Tidy tree layout
//!
//! Places the visible part of a `VisualTree` on a fixed grid: depth maps to
//! the x axis (`depth * depth_spacing`), breadth to the y axis. Subtrees are
//! packed left to right by comparing their per-level contours, and every
//! parent is centred over its first and last visible child.
//!
//! Adjacent siblings are `node_spacing` apart; adjacent nodes with different
//! parents (cousins) are `2 * node_spacing` apart.

use egui::Pos2;

use super::tree::{NodeStateTable, VisualTree};

/// Per-level `(leftmost, rightmost)` breadth of a subtree, relative to its root
type Contour = Vec<(f32, f32)>;

/// Breadth-axis bounds of the visible nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreadthExtent {
    pub top: f32,
    pub bottom: f32,
}

impl BreadthExtent {
    pub fn at(value: f32) -> Self {
        Self {
            top: value,
            bottom: value,
        }
    }

    pub fn include(&mut self, value: f32) {
        self.top = self.top.min(value);
        self.bottom = self.bottom.max(value);
    }

    pub fn span(&self) -> f32 {
        self.bottom - self.top
    }
}

impl Default for BreadthExtent {
    fn default() -> Self {
        Self::at(0.0)
    }
}

/// Target positions for one render pass
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    positions: Vec<Option<Pos2>>,
    extent: BreadthExtent,
}

impl TreeLayout {
    pub fn compute(
        tree: &VisualTree,
        states: &NodeStateTable,
        node_spacing: f32,
        depth_spacing: f32,
    ) -> Self {
        if tree.is_empty() {
            return Self::default();
        }

        let mut offsets = vec![0.0_f32; tree.len()];
        place(tree, states, VisualTree::ROOT, node_spacing, &mut offsets);

        let mut positions: Vec<Option<Pos2>> = vec![None; tree.len()];
        let mut extent = BreadthExtent::default();
        for index in tree.visible_order(states) {
            let Some(node) = tree.node(index) else {
                continue;
            };
            let breadth = node
                .parent
                .and_then(|parent| positions[parent])
                .map_or(0.0, |parent| parent.y + offsets[index]);
            positions[index] = Some(Pos2::new(node.depth as f32 * depth_spacing, breadth));
            extent.include(breadth);
        }

        Self { positions, extent }
    }

    /// Position of a visible node (`None` when hidden)
    pub fn position(&self, index: usize) -> Option<Pos2> {
        self.positions.get(index).copied().flatten()
    }

    pub fn extent(&self) -> BreadthExtent {
        self.extent
    }
}

fn separation(level: usize, node_spacing: f32) -> f32 {
    if level == 0 {
        node_spacing
    } else {
        2.0 * node_spacing
    }
}

/// Lay out the subtree under `index`, writing each visible child's breadth
/// offset (relative to its parent) into `offsets`.
fn place(
    tree: &VisualTree,
    states: &NodeStateTable,
    index: usize,
    node_spacing: f32,
    offsets: &mut [f32],
) -> Contour {
    let children = tree.visible_children(index, states);
    if children.is_empty() {
        return vec![(0.0, 0.0)];
    }

    let mut merged: Contour = Vec::new();
    let mut shifts: Vec<(usize, f32)> = Vec::with_capacity(children.len());

    for &child in children {
        let contour = place(tree, states, child, node_spacing, offsets);

        let shift = if merged.is_empty() {
            0.0
        } else {
            contour
                .iter()
                .zip(merged.iter())
                .enumerate()
                .map(|(level, (&(left, _), &(_, right)))| {
                    right + separation(level, node_spacing) - left
                })
                .fold(f32::NEG_INFINITY, f32::max)
        };

        for (level, &(left, right)) in contour.iter().enumerate() {
            match merged.get_mut(level) {
                Some(slot) => slot.1 = right + shift,
                None => merged.push((left + shift, right + shift)),
            }
        }
        shifts.push((child, shift));
    }

    let first = shifts.first().map_or(0.0, |&(_, s)| s);
    let last = shifts.last().map_or(0.0, |&(_, s)| s);
    let mid = (first + last) / 2.0;
    for (child, shift) in shifts {
        offsets[child] = shift - mid;
    }

    let mut contour = Vec::with_capacity(merged.len() + 1);
    contour.push((0.0, 0.0));
    contour.extend(merged.into_iter().map(|(l, r)| (l - mid, r - mid)));
    contour
}
