//! Reference frame tree mapping nested coordinate systems to display space.

use crate::geom::{Extent, Rect};
use crate::transform::Transform;

/// Handle to a frame owned by a [`FrameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

#[derive(Debug, Clone)]
struct FrameNode {
    parent: Option<FrameId>,
    to_parent: Transform,
}

/// Tree of reference frames.
///
/// Each frame stores only its transform into the parent frame. The transform
/// into the root is composed lazily on every read, so updating a parent is
/// visible to all descendants on their next read without a propagation pass.
#[derive(Debug, Clone, Default)]
pub struct FrameTree {
    nodes: Vec<FrameNode>,
}

impl FrameTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root frame whose transform maps its coordinates to display space.
    pub fn add_root(&mut self, to_parent: Transform) -> FrameId {
        self.insert(None, to_parent)
    }

    /// Add a child frame with an explicit transform into its parent.
    pub fn add_child(&mut self, parent: FrameId, to_parent: Transform) -> FrameId {
        self.insert(Some(parent), to_parent)
    }

    /// Add a child frame whose unit square maps onto a rectangle of the parent.
    pub fn add_child_from_rect(&mut self, parent: FrameId, rect: &Rect) -> FrameId {
        self.add_child(parent, Transform::unit_to_rect(rect))
    }

    /// Add a child frame mapping a rectangle of the parent onto its unit square.
    pub fn add_child_from_rect_reverse(&mut self, parent: FrameId, rect: &Rect) -> FrameId {
        self.add_child(parent, Transform::rect_to_unit(rect))
    }

    /// Add a child frame whose unit square maps onto an extent of the parent.
    pub fn add_child_from_extent(&mut self, parent: FrameId, extent: &Extent) -> FrameId {
        self.add_child(parent, Transform::unit_to_extent(extent))
    }

    /// Add a child frame mapping an extent of the parent onto its unit square.
    pub fn add_child_from_extent_reverse(&mut self, parent: FrameId, extent: &Extent) -> FrameId {
        self.add_child(parent, Transform::extent_to_unit(extent))
    }

    /// Replace a frame's transform into its parent.
    pub fn set_to_parent(&mut self, id: FrameId, to_parent: Transform) {
        self.nodes[id.0].to_parent = to_parent;
    }

    /// Access a frame's parent.
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.nodes[id.0].parent
    }

    /// Access a frame's transform into its parent.
    pub fn to_parent(&self, id: FrameId) -> Transform {
        self.nodes[id.0].to_parent
    }

    /// Compose a frame's transform into the root, walking the parent chain.
    pub fn to_root(&self, id: FrameId) -> Transform {
        let mut transform = self.nodes[id.0].to_parent;
        let mut parent = self.nodes[id.0].parent;
        while let Some(id) = parent {
            let node = &self.nodes[id.0];
            transform = Transform::compose(node.to_parent, transform);
            parent = node.parent;
        }
        transform
    }

    /// Number of frames in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree has no frames.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, parent: Option<FrameId>, to_parent: Transform) -> FrameId {
        let id = FrameId(self.nodes.len());
        self.nodes.push(FrameNode { parent, to_parent });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use approx::assert_relative_eq;

    #[test]
    fn root_to_root_is_its_own_transform() {
        let mut frames = FrameTree::new();
        let rect = Rect::new(0.0, 100.0, 100.0, -100.0);
        let root = frames.add_root(Transform::unit_to_rect(&rect));
        let mapped = frames.to_root(root).apply(Point::new(0.0, 0.0));
        assert_eq!(mapped, Point::new(0.0, 100.0));
    }

    #[test]
    fn chain_composes_child_then_parent() {
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::from_scale_offset(10.0, 10.0, 0.0, 0.0));
        let child = frames.add_child_from_rect(root, &Rect::new(0.5, 0.5, 0.5, 0.5));
        // Child unit point (1, 1) -> parent (1, 1) -> root (10, 10).
        let mapped = frames.to_root(child).apply(Point::new(1.0, 1.0));
        assert_relative_eq!(mapped.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(mapped.y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn reverse_child_inverts_forward_child() {
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let rect = Rect::new(2.0, 4.0, 8.0, 16.0);
        let forward = frames.add_child_from_rect(root, &rect);
        let reverse = frames.add_child_from_rect_reverse(forward, &rect);
        // Round trip through both children is the identity.
        let point = Point::new(3.0, 5.0);
        let mapped = frames.to_root(reverse).apply(point);
        assert_relative_eq!(mapped.x, point.x, epsilon = 1e-12);
        assert_relative_eq!(mapped.y, point.y, epsilon = 1e-12);
    }

    #[test]
    fn extent_child_maps_unit_square_to_extent() {
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let extent = Extent::from_bounds(0.0, 4.0, -2.0, 2.0);
        let child = frames.add_child_from_extent(root, &extent);
        let mapped = frames.to_root(child).apply(Point::new(0.5, 0.0));
        assert_eq!(mapped, Point::new(2.0, -2.0));
    }

    #[test]
    fn reparent_transform_visible_on_next_read() {
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let child = frames.add_child(root, Transform::IDENTITY);
        let before = frames.to_root(child).apply(Point::new(1.0, 1.0));
        assert_eq!(before, Point::new(1.0, 1.0));
        frames.set_to_parent(root, Transform::from_scale_offset(2.0, 2.0, 0.0, 0.0));
        let after = frames.to_root(child).apply(Point::new(1.0, 1.0));
        assert_eq!(after, Point::new(2.0, 2.0));
    }
}
