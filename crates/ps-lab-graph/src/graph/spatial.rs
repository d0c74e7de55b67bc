//! Spatial index for click/hover hit testing
//!
//! R-tree (via `rstar`) over the laid-out node glyphs, in world coordinates.
//! Rebuilt after every render pass.

use egui::Pos2;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::tree::NodeKey;

/// Index entry for one visible node
#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub key: NodeKey,
    bounds: AABB<[f32; 2]>,
    pub center: [f32; 2],
    pub radius: f32,
}

impl SpatialNode {
    pub fn new(key: NodeKey, center: Pos2, radius: f32) -> Self {
        let center = [center.x, center.y];
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        Self {
            key,
            bounds,
            center,
            radius,
        }
    }

    /// Distance from `point` to the glyph edge (0 inside)
    fn edge_distance(&self, point: [f32; 2]) -> f32 {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        ((dx * dx + dy * dy).sqrt() - self.radius).max(0.0)
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let d = self.edge_distance(*point);
        d * d
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the indexed nodes
    pub fn rebuild(&mut self, nodes: impl Iterator<Item = SpatialNode>) {
        let nodes: Vec<_> = nodes.collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.count = 0;
    }

    /// Closest node whose glyph edge is within `threshold` of `point`
    pub fn hit_test(&self, point: Pos2, threshold: f32) -> Option<&SpatialNode> {
        let point = [point.x, point.y];
        let search_bounds = AABB::from_corners(
            [point[0] - threshold, point[1] - threshold],
            [point[0] + threshold, point[1] + threshold],
        );

        self.tree
            .locate_in_envelope_intersecting(&search_bounds)
            .min_by(|a, b| a.edge_distance(point).total_cmp(&b.edge_distance(point)))
            .filter(|node| node.edge_distance(point) <= threshold)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> Vec<SpatialNode> {
        (0..count)
            .map(|i| {
                let x = (i % 10) as f32 * 100.0;
                let y = (i / 10) as f32 * 25.0;
                SpatialNode::new(NodeKey::from(format!("n{i}").as_str()), Pos2::new(x, y), 3.0)
            })
            .collect()
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(index.hit_test(Pos2::ZERO, 10.0).is_none());
    }

    #[test]
    fn test_hit_and_miss() {
        let mut index = SpatialIndex::new();
        index.rebuild(grid(30).into_iter());
        assert_eq!(index.len(), 30);

        let hit = index.hit_test(Pos2::new(101.0, 26.0), 8.0).unwrap();
        assert_eq!(hit.key.as_str(), "n11");

        assert!(index.hit_test(Pos2::new(50.0, 12.0), 8.0).is_none());
    }

    #[test]
    fn test_closest_wins() {
        let mut index = SpatialIndex::new();
        index.rebuild(
            vec![
                SpatialNode::new("a".into(), Pos2::new(0.0, 0.0), 3.0),
                SpatialNode::new("b".into(), Pos2::new(0.0, 10.0), 3.0),
            ]
            .into_iter(),
        );
        let hit = index.hit_test(Pos2::new(0.0, 7.0), 8.0).unwrap();
        assert_eq!(hit.key.as_str(), "b");
    }

    #[test]
    fn test_clear() {
        let mut index = SpatialIndex::new();
        index.rebuild(grid(5).into_iter());
        index.clear();
        assert!(index.is_empty());
        assert!(index.hit_test(Pos2::ZERO, 8.0).is_none());
    }
}
