//! Plot-type artists: strategies that turn a point stream into vector geometry.
//!
//! Artists receive points in their data area's coordinates together with the
//! area's to-root transform and append primitives incrementally. A call draws
//! only the newest point; redrawing history is the owner's job, done by
//! clearing the artist and replaying the dataset.

use std::fmt;

use crate::geom::{Point, Rect};
use crate::render::{
    Color, DashPattern, LineStyle, MarkerShape, MarkerStyle, NodeId, RectStyle, VectorSurface,
};
use crate::transform::Transform;

/// Incremental rendering strategy for one dataset.
pub trait PlotArtist: fmt::Debug {
    /// Create this artist's group under `parent`.
    fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId, name: &str);
    /// Set the fallback color used where the config leaves colors unset.
    fn set_default_color(&mut self, color: Color);
    /// Extend the geometry with one more point.
    fn draw(&mut self, surface: &mut dyn VectorSurface, point: Point, to_root: Transform);
    /// Drop drawn geometry and re-arm first-point handling.
    fn clear(&mut self, surface: &mut dyn VectorSurface);
    /// Remove this artist's group and everything in it.
    fn detach(&mut self, surface: &mut dyn VectorSurface);
}

/// Per-point marker configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerConfig {
    /// Marker color; `None` takes the artist's default color.
    pub color: Option<Color>,
    /// Marker size in root display units.
    pub size: f32,
    /// Marker shape.
    pub shape: MarkerShape,
}

impl MarkerConfig {
    fn style(&self, default_color: Color) -> MarkerStyle {
        MarkerStyle {
            color: self.color.unwrap_or(default_color),
            size: self.size,
            shape: self.shape,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            color: None,
            size: 1.0,
            shape: MarkerShape::Square,
        }
    }
}

/// Line artist configuration.
///
/// Defaults: unset color (taken from the owning area's palette), width `0.3`,
/// full opacity, solid stroke, square markers at every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineArtistConfig {
    /// Stroke color; `None` takes the artist's default color.
    pub color: Option<Color>,
    /// Stroke width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
    /// Dash pattern.
    pub dash: DashPattern,
    /// Per-point marker, drawn at every vertex when set.
    pub marker: Option<MarkerConfig>,
}

impl LineArtistConfig {
    fn line_style(&self, default_color: Color) -> LineStyle {
        LineStyle {
            color: self.color.unwrap_or(default_color),
            width: self.width,
            opacity: self.opacity,
            dash: self.dash,
        }
    }
}

impl Default for LineArtistConfig {
    fn default() -> Self {
        Self {
            color: None,
            width: 0.3,
            opacity: 1.0,
            dash: DashPattern::Solid,
            marker: Some(MarkerConfig::default()),
        }
    }
}

/// Open polyline with one vertex per point, plus optional per-point markers.
#[derive(Debug)]
pub struct LineArtist {
    config: LineArtistConfig,
    default_color: Color,
    group: Option<NodeId>,
    markers: Option<NodeId>,
    polyline: Option<NodeId>,
}

impl LineArtist {
    /// Create a line artist with default configuration.
    pub fn new() -> Self {
        Self::with_config(LineArtistConfig::default())
    }

    /// Create a line artist with an explicit configuration.
    pub fn with_config(config: LineArtistConfig) -> Self {
        Self {
            config,
            default_color: Color::BLACK,
            group: None,
            markers: None,
            polyline: None,
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &LineArtistConfig {
        &self.config
    }
}

impl Default for LineArtist {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotArtist for LineArtist {
    fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId, name: &str) {
        let group = surface.create_group(Some(parent), name);
        self.markers = Some(surface.create_group(Some(group), "markers"));
        self.group = Some(group);
        self.polyline = None;
    }

    fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
    }

    fn draw(&mut self, surface: &mut dyn VectorSurface, point: Point, to_root: Transform) {
        let Some(group) = self.group else {
            panic!("line artist drawn before attach");
        };
        let display = to_root.apply(point);
        let polyline = match self.polyline {
            Some(id) => id,
            None => {
                let style = self.config.line_style(self.default_color);
                let id = surface.begin_polyline(group, &style);
                self.polyline = Some(id);
                id
            }
        };
        surface.push_polyline_point(polyline, display);
        if let Some(marker) = self.config.marker
            && let Some(markers) = self.markers
        {
            draw_marker(surface, markers, display, &marker.style(self.default_color));
        }
    }

    fn clear(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(polyline) = self.polyline.take() {
            surface.remove(polyline);
        }
        if let Some(markers) = self.markers {
            surface.clear_children(markers);
        }
    }

    fn detach(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(group) = self.group.take() {
            surface.remove(group);
        }
        self.markers = None;
        self.polyline = None;
    }
}

/// Step artist configuration.
///
/// Defaults: riser at the previous point (`step_pos` 0), no end extension,
/// unset color, width `0.3`, full opacity, solid stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepArtistConfig {
    /// Riser position between consecutive x values: 0 places it at the
    /// previous point's x, 1 at the current point's x, 0.5 midway.
    pub step_pos: f64,
    /// Stretch the first horizontal segment left by the complementary
    /// step fraction of the first gap.
    pub extend_left: bool,
    /// Keep a horizontal segment running past the newest point by the step
    /// fraction of the latest gap.
    pub extend_right: bool,
    /// Stroke color; `None` takes the artist's default color.
    pub color: Option<Color>,
    /// Stroke width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
    /// Dash pattern.
    pub dash: DashPattern,
}

impl StepArtistConfig {
    fn line_style(&self, default_color: Color) -> LineStyle {
        LineStyle {
            color: self.color.unwrap_or(default_color),
            width: self.width,
            opacity: self.opacity,
            dash: self.dash,
        }
    }
}

impl Default for StepArtistConfig {
    fn default() -> Self {
        Self {
            step_pos: 0.0,
            extend_left: false,
            extend_right: false,
            color: None,
            width: 0.3,
            opacity: 1.0,
            dash: DashPattern::Solid,
        }
    }
}

/// Stepped polyline: horizontal runs joined by vertical risers.
///
/// Corners are computed from the raw input points, so the step position
/// stays meaningful whatever the to-root transform does to the geometry;
/// only emitted vertices pass through the transform.
#[derive(Debug)]
pub struct StepArtist {
    config: StepArtistConfig,
    default_color: Color,
    group: Option<NodeId>,
    polyline: Option<NodeId>,
    previous: Option<Point>,
    vertices: usize,
    adjust_first: bool,
}

impl StepArtist {
    /// Create a step artist with default configuration.
    pub fn new() -> Self {
        Self::with_config(StepArtistConfig::default())
    }

    /// Create a step artist with an explicit configuration.
    pub fn with_config(config: StepArtistConfig) -> Self {
        Self {
            config,
            default_color: Color::BLACK,
            group: None,
            polyline: None,
            previous: None,
            vertices: 0,
            adjust_first: false,
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &StepArtistConfig {
        &self.config
    }

    fn ensure_polyline(&mut self, surface: &mut dyn VectorSurface, group: NodeId) -> NodeId {
        match self.polyline {
            Some(id) => id,
            None => {
                let style = self.config.line_style(self.default_color);
                let id = surface.begin_polyline(group, &style);
                self.polyline = Some(id);
                self.vertices = 0;
                id
            }
        }
    }

    fn push_vertex(&mut self, surface: &mut dyn VectorSurface, polyline: NodeId, display: Point) {
        surface.push_polyline_point(polyline, display);
        self.vertices += 1;
    }
}

impl Default for StepArtist {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotArtist for StepArtist {
    fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId, name: &str) {
        self.group = Some(surface.create_group(Some(parent), name));
        self.polyline = None;
        self.previous = None;
        self.vertices = 0;
        self.adjust_first = false;
    }

    fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
    }

    fn draw(&mut self, surface: &mut dyn VectorSurface, point: Point, to_root: Transform) {
        let Some(group) = self.group else {
            panic!("step artist drawn before attach");
        };
        let polyline = self.ensure_polyline(surface, group);
        match self.previous {
            None => {
                self.push_vertex(surface, polyline, to_root.apply(point));
                if self.config.extend_right {
                    // Placeholder for the running segment, repositioned on
                    // the next point.
                    self.push_vertex(surface, polyline, to_root.apply(point));
                }
                self.previous = Some(point);
                self.adjust_first = true;
            }
            Some(prev) => {
                let gap = point.x - prev.x;
                let corner_x = prev.x + self.config.step_pos * gap;
                if self.config.extend_left && self.adjust_first {
                    let start_x = prev.x - (1.0 - self.config.step_pos) * gap;
                    let start = to_root.apply(Point::new(start_x, prev.y));
                    surface.set_polyline_point(polyline, 0, start);
                    self.adjust_first = false;
                }
                if self.config.extend_right {
                    let moved = to_root.apply(Point::new(corner_x, prev.y));
                    surface.set_polyline_point(polyline, self.vertices - 1, moved);
                    self.push_vertex(surface, polyline, to_root.apply(Point::new(corner_x, point.y)));
                    let overhang = Point::new(point.x + self.config.step_pos * gap, point.y);
                    self.push_vertex(surface, polyline, to_root.apply(overhang));
                } else {
                    self.push_vertex(surface, polyline, to_root.apply(Point::new(corner_x, prev.y)));
                    self.push_vertex(surface, polyline, to_root.apply(Point::new(corner_x, point.y)));
                }
                self.previous = Some(point);
            }
        }
    }

    fn clear(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(polyline) = self.polyline.take() {
            surface.remove(polyline);
        }
        self.previous = None;
        self.vertices = 0;
        self.adjust_first = false;
    }

    fn detach(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(group) = self.group.take() {
            surface.remove(group);
        }
        self.polyline = None;
        self.previous = None;
        self.vertices = 0;
        self.adjust_first = false;
    }
}

/// Vertical-line artist configuration.
///
/// Defaults: unset color, width `0.3`, full opacity, solid stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VlineArtistConfig {
    /// Stroke color; `None` takes the artist's default color.
    pub color: Option<Color>,
    /// Stroke width.
    pub width: f32,
    /// Stroke opacity.
    pub opacity: f32,
    /// Dash pattern.
    pub dash: DashPattern,
}

impl VlineArtistConfig {
    fn line_style(&self, default_color: Color) -> LineStyle {
        LineStyle {
            color: self.color.unwrap_or(default_color),
            width: self.width,
            opacity: self.opacity,
            dash: self.dash,
        }
    }
}

impl Default for VlineArtistConfig {
    fn default() -> Self {
        Self {
            color: None,
            width: 0.3,
            opacity: 1.0,
            dash: DashPattern::Solid,
        }
    }
}

/// Full-height vertical marker at each point's x.
///
/// Only the x component of the input is used; the line spans the unit
/// height of the owning area, mapped through the to-root transform. Pair
/// with a capacity-1 ring dataset when exactly one marker should survive
/// a redraw.
#[derive(Debug)]
pub struct VlineArtist {
    config: VlineArtistConfig,
    default_color: Color,
    group: Option<NodeId>,
}

impl VlineArtist {
    /// Create a vertical-line artist with default configuration.
    pub fn new() -> Self {
        Self::with_config(VlineArtistConfig::default())
    }

    /// Create a vertical-line artist with an explicit configuration.
    pub fn with_config(config: VlineArtistConfig) -> Self {
        Self {
            config,
            default_color: Color::BLACK,
            group: None,
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &VlineArtistConfig {
        &self.config
    }
}

impl Default for VlineArtist {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotArtist for VlineArtist {
    fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId, name: &str) {
        self.group = Some(surface.create_group(Some(parent), name));
    }

    fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
    }

    fn draw(&mut self, surface: &mut dyn VectorSurface, point: Point, to_root: Transform) {
        let Some(group) = self.group else {
            panic!("vline artist drawn before attach");
        };
        let bottom = to_root.apply(Point::new(point.x, 0.0));
        let top = to_root.apply(Point::new(point.x, 1.0));
        surface.draw_line(group, bottom, top, &self.config.line_style(self.default_color));
    }

    fn clear(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(group) = self.group {
            surface.clear_children(group);
        }
    }

    fn detach(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(group) = self.group.take() {
            surface.remove(group);
        }
    }
}

fn draw_marker(
    surface: &mut dyn VectorSurface,
    parent: NodeId,
    at: Point,
    style: &MarkerStyle,
) {
    let size = style.size as f64;
    let half = size / 2.0;
    match style.shape {
        MarkerShape::Square => {
            let rect = Rect::new(at.x - half, at.y - half, size, size);
            let rect_style = RectStyle {
                fill: style.color,
                stroke: style.color,
                stroke_width: 0.0,
            };
            surface.draw_rect(parent, rect, &rect_style);
        }
        MarkerShape::Cross => {
            let stroke = LineStyle {
                color: style.color,
                width: 0.2 * style.size,
                opacity: 1.0,
                dash: DashPattern::Solid,
            };
            surface.draw_line(parent, Point::new(at.x - half, at.y), Point::new(at.x + half, at.y), &stroke);
            surface.draw_line(parent, Point::new(at.x, at.y - half), Point::new(at.x, at.y + half), &stroke);
        }
    }
}
