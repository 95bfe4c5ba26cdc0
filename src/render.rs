//! Vector rendering surface interface and an in-memory scene implementation.
//!
//! The plotting engine draws through [`VectorSurface`], a retained surface of
//! grouped primitives addressed by [`NodeId`]. Backends implement the trait
//! directly; [`VectorScene`] is the crate's own implementation, used by tests
//! and by backends that prefer to walk a scene tree.

use indexmap::IndexMap;

use crate::geom::{Point, Rect, Vec2};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0.0, 0.5, 0.0, 1.0);
    /// Opaque purple.
    pub const PURPLE: Self = Self::new(0.5, 0.0, 0.5, 1.0);
    /// Opaque brown.
    pub const BROWN: Self = Self::new(0.647, 0.165, 0.165, 1.0);
    /// Opaque orange.
    pub const ORANGE: Self = Self::new(1.0, 0.647, 0.0, 1.0);
}

/// Default stroke palette, assigned to datasets in registration order.
pub const PALETTE: [Color; 6] = [
    Color::BLUE,
    Color::RED,
    Color::GREEN,
    Color::PURPLE,
    Color::BROWN,
    Color::ORANGE,
];

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashPattern {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Dash segments three stroke widths long.
    Dashed,
    /// Dash segments one stroke width long.
    Dotted,
}

impl DashPattern {
    /// On/off segment lengths for a given stroke width, if dashed.
    pub fn segments(self, width: f32) -> Option<[f32; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some([3.0 * width, width]),
            Self::Dotted => Some([width, width]),
        }
    }
}

/// Line stroke styling.
///
/// Widths are expressed in root display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
    /// Dash pattern.
    pub dash: DashPattern,
}

impl LineStyle {
    /// Replace the stroke color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0.3,
            opacity: 1.0,
            dash: DashPattern::Solid,
        }
    }
}

/// Marker shape for per-point markers.
///
/// Shapes are compositions of the surface's primitive set: a square is one
/// rectangle, a cross is two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Square marker.
    Square,
    /// Upright cross marker.
    Cross,
}

/// Marker styling for per-point markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Marker size in root display units.
    pub size: f32,
    /// Marker shape.
    pub shape: MarkerShape,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 1.0,
            shape: MarkerShape::Square,
        }
    }
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::new(0.0, 0.0, 0.0, 0.0),
            stroke: Color::BLACK,
            stroke_width: 0.3,
        }
    }
}

/// Text styling.
///
/// The anchor gives the fraction of the rendered bounding box that should
/// land on the requested position, so `(0.5, 0.5)` centers the text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in root display units.
    pub size: f32,
    /// Rotation in degrees, clockwise in display space.
    pub rotation: f32,
    /// Anchor fractions of the bounding box.
    pub anchor: Vec2,
}

impl TextStyle {
    /// Replace the anchor fractions.
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 2.5,
            rotation: 0.0,
            anchor: Vec2::new(0.5, 0.5),
        }
    }
}

/// Handle to a node created by a [`VectorSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// The raw id value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Retained vector-drawing surface with grouped primitives.
///
/// All coordinates are root display coordinates. Handles stay valid until the
/// node is removed or its parent group is cleared.
pub trait VectorSurface {
    /// Create a named grouping node, at the top level when `parent` is `None`.
    fn create_group(&mut self, parent: Option<NodeId>, name: &str) -> NodeId;
    /// Remove all children of a group, keeping the group itself.
    fn clear_children(&mut self, group: NodeId);
    /// Remove a node and everything below it.
    fn remove(&mut self, id: NodeId);
    /// Draw a line segment.
    fn draw_line(&mut self, parent: NodeId, start: Point, end: Point, style: &LineStyle) -> NodeId;
    /// Start an empty polyline that can grow point by point.
    fn begin_polyline(&mut self, parent: NodeId, style: &LineStyle) -> NodeId;
    /// Append a vertex to a polyline.
    fn push_polyline_point(&mut self, polyline: NodeId, point: Point);
    /// Replace a polyline vertex by index.
    fn set_polyline_point(&mut self, polyline: NodeId, index: usize, point: Point);
    /// Draw a rectangle.
    fn draw_rect(&mut self, parent: NodeId, rect: Rect, style: &RectStyle) -> NodeId;
    /// Draw text at a position.
    fn draw_text(&mut self, parent: NodeId, position: Point, content: &str, style: &TextStyle)
    -> NodeId;
    /// Bounding rect of rendered text, if the node is text.
    fn text_bounds(&self, id: NodeId) -> Option<Rect>;
    /// Move rendered text to a new position.
    fn set_text_position(&mut self, id: NodeId, position: Point);
}

/// Draw text and shift it so the style's anchor fraction of the rendered
/// bounding box lands on `position`.
pub fn place_text(
    surface: &mut dyn VectorSurface,
    parent: NodeId,
    position: Point,
    content: &str,
    style: &TextStyle,
) -> NodeId {
    let id = surface.draw_text(parent, position, content, style);
    if let Some(bounds) = surface.text_bounds(id) {
        let anchor = Point::new(
            bounds.pos.x + bounds.size.x * style.anchor.x,
            bounds.pos.y + bounds.size.y * style.anchor.y,
        );
        let shifted = Point::new(
            position.x + (position.x - anchor.x),
            position.y + (position.y - anchor.y),
        );
        surface.set_text_position(id, shifted);
    }
    id
}

/// One node of a [`VectorScene`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePrimitive {
    /// Named grouping node.
    Group {
        /// Group name.
        name: String,
        /// Child nodes in creation order.
        children: Vec<NodeId>,
    },
    /// Line segment.
    Line {
        /// Segment start.
        start: Point,
        /// Segment end.
        end: Point,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Polyline with mutable vertices.
    Polyline {
        /// Vertices in draw order.
        points: Vec<Point>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Rectangle.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Styling.
        style: RectStyle,
    },
    /// Text run.
    Text {
        /// Baseline-left position.
        position: Point,
        /// Content.
        content: String,
        /// Styling.
        style: TextStyle,
    },
}

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<NodeId>,
    item: ScenePrimitive,
}

/// In-memory [`VectorSurface`] implementation.
///
/// Node ids are minted by the scene instance. Text bounds are estimated from
/// glyph counts; precise metrics belong to real backends.
#[derive(Debug, Clone, Default)]
pub struct VectorScene {
    nodes: IndexMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl VectorScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access a node's primitive.
    pub fn get(&self, id: NodeId) -> Option<&ScenePrimitive> {
        self.nodes.get(&id).map(|node| &node.item)
    }

    /// Children of a group, empty for non-groups.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(&id).map(|node| &node.item) {
            Some(ScenePrimitive::Group { children, .. }) => children,
            _ => &[],
        }
    }

    /// Top-level nodes in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Find the first group with the given name, in creation order.
    pub fn find_group(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find_map(|(id, node)| match &node.item {
            ScenePrimitive::Group { name: n, .. } if n == name => Some(*id),
            _ => None,
        })
    }

    /// All nodes below a node, depth first in creation order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn mint(&mut self, parent: Option<NodeId>, item: ScenePrimitive) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode { parent, item });
        match parent {
            Some(parent) => {
                if let Some(SceneNode {
                    item: ScenePrimitive::Group { children, .. },
                    ..
                }) = self.nodes.get_mut(&parent)
                {
                    children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            stack.extend_from_slice(self.children(id));
            self.nodes.shift_remove(&id);
        }
    }
}

impl VectorSurface for VectorScene {
    fn create_group(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        self.mint(
            parent,
            ScenePrimitive::Group {
                name: name.to_string(),
                children: Vec::new(),
            },
        )
    }

    fn clear_children(&mut self, group: NodeId) {
        let children = self.children(group).to_vec();
        for child in children {
            self.drop_subtree(child);
        }
        if let Some(SceneNode {
            item: ScenePrimitive::Group { children, .. },
            ..
        }) = self.nodes.get_mut(&group)
        {
            children.clear();
        }
    }

    fn remove(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|node| node.parent);
        match parent {
            Some(parent) => {
                if let Some(SceneNode {
                    item: ScenePrimitive::Group { children, .. },
                    ..
                }) = self.nodes.get_mut(&parent)
                {
                    children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
        self.drop_subtree(id);
    }

    fn draw_line(&mut self, parent: NodeId, start: Point, end: Point, style: &LineStyle) -> NodeId {
        self.mint(
            Some(parent),
            ScenePrimitive::Line {
                start,
                end,
                style: *style,
            },
        )
    }

    fn begin_polyline(&mut self, parent: NodeId, style: &LineStyle) -> NodeId {
        self.mint(
            Some(parent),
            ScenePrimitive::Polyline {
                points: Vec::new(),
                style: *style,
            },
        )
    }

    fn push_polyline_point(&mut self, polyline: NodeId, point: Point) {
        if let Some(SceneNode {
            item: ScenePrimitive::Polyline { points, .. },
            ..
        }) = self.nodes.get_mut(&polyline)
        {
            points.push(point);
        }
    }

    fn set_polyline_point(&mut self, polyline: NodeId, index: usize, point: Point) {
        if let Some(SceneNode {
            item: ScenePrimitive::Polyline { points, .. },
            ..
        }) = self.nodes.get_mut(&polyline)
            && let Some(slot) = points.get_mut(index)
        {
            *slot = point;
        }
    }

    fn draw_rect(&mut self, parent: NodeId, rect: Rect, style: &RectStyle) -> NodeId {
        self.mint(Some(parent), ScenePrimitive::Rect { rect, style: *style })
    }

    fn draw_text(
        &mut self,
        parent: NodeId,
        position: Point,
        content: &str,
        style: &TextStyle,
    ) -> NodeId {
        self.mint(
            Some(parent),
            ScenePrimitive::Text {
                position,
                content: content.to_string(),
                style: style.clone(),
            },
        )
    }

    fn text_bounds(&self, id: NodeId) -> Option<Rect> {
        match self.get(id)? {
            ScenePrimitive::Text {
                position,
                content,
                style,
            } => {
                let size = style.size as f64;
                let width = 0.6 * size * content.chars().count() as f64;
                Some(Rect::new(position.x, position.y - 0.8 * size, width, size))
            }
            _ => None,
        }
    }

    fn set_text_position(&mut self, id: NodeId, new_position: Point) {
        if let Some(SceneNode {
            item: ScenePrimitive::Text { position, .. },
            ..
        }) = self.nodes.get_mut(&id)
        {
            *position = new_position;
        }
    }
}
