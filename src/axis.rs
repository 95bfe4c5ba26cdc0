//! Axis geometry: line, label, ticks, and tick labels for one dimension.
//!
//! An axis recomputes its geometry in stages. Each stage queues a matching
//! redraw, so "geometry changed" stays separate from "must repaint":
//! [`Axis::redraw`] repaints only the stages whose geometry moved, while
//! [`Axis::draw`] repaints everything unconditionally.

use crate::geom::{Dim, Point, Rect, Vec2};
use crate::render::{LineStyle, NodeId, TextStyle, VectorSurface, place_text};
use crate::scale::NonlinearScale;
use crate::transform::Transform;

/// Number of ticks along an axis, endpoints included.
const N_TICKS: usize = 7;
/// Tick length, in containing-rect units.
const TICK_LENGTH: f64 = 0.02;
/// Label offset perpendicular to the axis line.
const LABEL_OFFSET: f64 = 0.12;
/// Tick-label offset past the tick end, as a fraction of the tick length.
const TICK_LABEL_OFFSET: f64 = 0.1;
/// Significant figures in tick labels.
const TICK_SIG_FIGS: usize = 3;
/// Tick values are snapped to the nearest multiple of this before formatting.
const TICK_ROUND_TO: f64 = 1e-12;

/// Format a value to a number of significant figures, first snapping it to
/// the nearest `round_to` to suppress float noise in tick values.
pub fn format_sig_figs(value: f64, sig_figs: usize, round_to: f64) -> String {
    let value = if round_to != 0.0 && value.is_finite() {
        (value / round_to).round() * round_to
    } else {
        value
    };
    if value == 0.0 {
        return format!("{:.*}", sig_figs.saturating_sub(1), 0.0);
    }
    if !value.is_finite() {
        return format!("{value}");
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= sig_figs as i32 {
        format!("{:.*e}", sig_figs.saturating_sub(1), value)
    } else {
        let decimals = (sig_figs as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.decimals$}")
    }
}

/// Repaint stages queued by the geometry recomputation methods.
#[derive(Debug, Clone, Copy, Default)]
struct RedrawQueue {
    line: bool,
    label: bool,
    ticks: bool,
    tick_labels: bool,
}

impl RedrawQueue {
    fn all() -> Self {
        Self {
            line: true,
            label: true,
            ticks: true,
            tick_labels: true,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Visual representation of one dimension of an axes set.
///
/// The axis lives in the coordinates of its data area's unit square; its
/// containing rect is a strip adjacent to that square. The unit→data
/// transform is only used to compute tick label values.
#[derive(Debug)]
pub struct Axis {
    dim: Dim,
    name: String,
    containing_rect: Rect,
    pos_in_rect: f64,
    from_data: Transform,
    to_root: Transform,
    nonlinear: NonlinearScale,

    line: [Point; 2],
    label_pos: Point,
    label_rotation: f32,
    ticks: Vec<[Point; 2]>,
    tick_label_positions: Vec<Point>,
    tick_label_anchor: Vec2,
    tick_labels: Vec<String>,
    pending: RedrawQueue,

    group: Option<NodeId>,
    line_group: Option<NodeId>,
    label_group: Option<NodeId>,
    tick_group: Option<NodeId>,
    tick_label_group: Option<NodeId>,
}

impl Axis {
    /// Create an axis for one dimension.
    ///
    /// `pos_in_rect` places the axis line within the containing rect along
    /// the perpendicular dimension: 1 puts it against the data area for an
    /// axis drawn on the low side, 0 for one drawn on the high side.
    pub fn new(
        dim: Dim,
        name: impl Into<String>,
        containing_rect: Rect,
        pos_in_rect: f64,
        from_data: Transform,
        nonlinear: NonlinearScale,
    ) -> Self {
        Self {
            dim,
            name: name.into(),
            containing_rect,
            pos_in_rect,
            from_data,
            to_root: Transform::IDENTITY,
            nonlinear,
            line: [Point::new(0.0, 0.0); 2],
            label_pos: Point::new(0.0, 0.0),
            label_rotation: (dim.index() as f32) * 270.0,
            ticks: Vec::new(),
            tick_label_positions: Vec::new(),
            tick_label_anchor: Vec2::new(0.5, 0.5),
            tick_labels: Vec::new(),
            pending: RedrawQueue::default(),
            group: None,
            line_group: None,
            label_group: None,
            tick_group: None,
            tick_label_group: None,
        }
    }

    /// Access the axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the dimension this axis represents.
    pub fn dim(&self) -> Dim {
        self.dim
    }

    /// Current tick label texts, in tick order.
    pub fn tick_labels(&self) -> &[String] {
        &self.tick_labels
    }

    /// Create this axis's scene groups under `parent`.
    pub fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId) {
        let group = surface.create_group(Some(parent), &format!("axis-{}", self.name));
        self.line_group = Some(surface.create_group(Some(group), "line"));
        self.label_group = Some(surface.create_group(Some(group), "label"));
        self.tick_group = Some(surface.create_group(Some(group), "ticks"));
        self.tick_label_group = Some(surface.create_group(Some(group), "tick-labels"));
        self.group = Some(group);
    }

    /// Remove this axis's scene groups.
    pub fn detach(&mut self, surface: &mut dyn VectorSurface) {
        if let Some(group) = self.group.take() {
            surface.remove(group);
        }
        self.line_group = None;
        self.label_group = None;
        self.tick_group = None;
        self.tick_label_group = None;
    }

    /// Recompute all geometry stages.
    pub fn calc(&mut self) {
        self.calc_line();
    }

    /// Replace the containing rect and recompute dependent geometry.
    pub fn update_containing_rect(&mut self, rect: Rect, surface: &mut dyn VectorSurface) {
        self.containing_rect = rect;
        self.calc_line();
        self.redraw(surface);
    }

    /// Replace the to-root transform; everything on screen moves, so a full
    /// repaint is queued and executed.
    pub fn update_root_transform(&mut self, to_root: Transform, surface: &mut dyn VectorSurface) {
        self.to_root = to_root;
        self.pending = RedrawQueue::all();
        self.redraw(surface);
    }

    /// Replace the unit→data transform and refresh tick label values.
    ///
    /// Only the labels depend on the data transform; the line, ticks, and
    /// label anchor stay where they are.
    pub fn update_from_data_transform(
        &mut self,
        from_data: Transform,
        surface: &mut dyn VectorSurface,
    ) {
        self.from_data = from_data;
        self.calc_tick_labels();
        self.redraw(surface);
    }

    /// Store a new unit→data transform without recomputing anything.
    ///
    /// Used for dimensions whose extent did not change: the value is kept
    /// consistent without paying for a tick-label recompute.
    pub fn set_from_data_transform(&mut self, from_data: Transform) {
        self.from_data = from_data;
    }

    /// Execute and clear all queued repaint stages.
    pub fn redraw(&mut self, surface: &mut dyn VectorSurface) {
        let pending = self.pending;
        self.pending.clear();
        if pending.line {
            self.draw_line(surface);
        }
        if pending.label {
            self.draw_label(surface);
        }
        if pending.ticks {
            self.draw_ticks(surface);
        }
        if pending.tick_labels {
            self.draw_tick_labels(surface);
        }
    }

    /// Repaint every stage unconditionally and clear the queue.
    pub fn draw(&mut self, surface: &mut dyn VectorSurface) {
        self.draw_line(surface);
        self.draw_label(surface);
        self.draw_ticks(surface);
        self.draw_tick_labels(surface);
        self.pending.clear();
    }

    // Direction in which ticks and the label extend from the line: away from
    // the data area, which sits on the high side when pos_in_rect <= 0.5.
    fn offset_direction(&self) -> f64 {
        if self.pos_in_rect <= 0.5 { 1.0 } else { -1.0 }
    }

    fn calc_line(&mut self) {
        let rect = self.containing_rect;
        let mut frac = Point::new(self.pos_in_rect, self.pos_in_rect);
        frac.set(self.dim, 0.0);
        let start = rect.pos + Vec2::new(frac.x * rect.size.x, frac.y * rect.size.y);
        self.line = [start, start + self.dim.unit()];
        self.pending.line = true;

        self.calc_label();
        self.calc_ticks();
    }

    fn calc_label(&mut self) {
        let delta = self.dim.other().unit() * (self.offset_direction() * LABEL_OFFSET);
        self.label_pos = Point::lerp(self.line[0], self.line[1], 0.5) + delta;
        self.pending.label = true;
    }

    fn calc_ticks(&mut self) {
        let displacement = self.dim.other().unit() * (self.offset_direction() * TICK_LENGTH);
        self.ticks = (0..N_TICKS)
            .map(|i| {
                let t = i as f64 / (N_TICKS - 1) as f64;
                let start = Point::lerp(self.line[0], self.line[1], t);
                [start, start + displacement]
            })
            .collect();
        self.pending.ticks = true;

        self.calc_tick_label_positions();
        self.calc_tick_labels();
    }

    fn calc_tick_label_positions(&mut self) {
        // Display y is flipped relative to figure y, so the vertical anchor
        // fraction stays 0 and only the horizontal one follows the position.
        let mut anchor = Vec2::new(self.pos_in_rect, 0.0);
        match self.dim {
            Dim::X => anchor.x = 0.5,
            Dim::Y => anchor.y = 0.5,
        }
        self.tick_label_anchor = anchor;
        self.tick_label_positions = self
            .ticks
            .iter()
            .map(|[start, end]| *start + (*end - *start) * (1.0 + TICK_LABEL_OFFSET))
            .collect();
        self.pending.tick_labels = true;
    }

    fn calc_tick_labels(&mut self) {
        self.tick_labels = self
            .ticks
            .iter()
            .map(|[start, _]| {
                let value = self.from_data.apply(self.nonlinear.invert(*start));
                format_sig_figs(value.get(self.dim), TICK_SIG_FIGS, TICK_ROUND_TO)
            })
            .collect();
        self.pending.tick_labels = true;
    }

    fn draw_line(&mut self, surface: &mut dyn VectorSurface) {
        let Some(group) = self.line_group else {
            panic!("axis drawn before attach");
        };
        surface.clear_children(group);
        surface.draw_line(
            group,
            self.to_root.apply(self.line[0]),
            self.to_root.apply(self.line[1]),
            &LineStyle::default(),
        );
    }

    fn draw_label(&mut self, surface: &mut dyn VectorSurface) {
        let Some(group) = self.label_group else {
            panic!("axis drawn before attach");
        };
        surface.clear_children(group);
        let style = TextStyle {
            rotation: self.label_rotation,
            ..TextStyle::default()
        };
        place_text(
            surface,
            group,
            self.to_root.apply(self.label_pos),
            &self.name,
            &style,
        );
    }

    fn draw_ticks(&mut self, surface: &mut dyn VectorSurface) {
        let Some(group) = self.tick_group else {
            panic!("axis drawn before attach");
        };
        surface.clear_children(group);
        let style = LineStyle {
            width: 0.2,
            ..LineStyle::default()
        };
        for [start, end] in &self.ticks {
            surface.draw_line(
                group,
                self.to_root.apply(*start),
                self.to_root.apply(*end),
                &style,
            );
        }
    }

    fn draw_tick_labels(&mut self, surface: &mut dyn VectorSurface) {
        let Some(group) = self.tick_label_group else {
            panic!("axis drawn before attach");
        };
        surface.clear_children(group);
        let style = TextStyle::default().with_anchor(self.tick_label_anchor);
        for (position, label) in self.tick_label_positions.iter().zip(&self.tick_labels) {
            place_text(surface, group, self.to_root.apply(*position), label, &style);
        }
    }
}
