//! Auto-resizing axes sets: extent state and the incremental-draw algorithm.

use tracing::{debug, trace};

use crate::area::DataArea;
use crate::axis::Axis;
use crate::dataset::DataStore;
use crate::figure::ChartError;
use crate::frame::FrameTree;
use crate::geom::{Dim, Extent, Rect};
use crate::render::{NodeId, VectorSurface};
use crate::scale::NonlinearScale;
use crate::transform::Transform;

/// Relative epsilon padding applied to a degenerate extent dimension, in
/// units of machine epsilon, so the derived transform stays full rank. The
/// padding scales with the value's magnitude; an absolute pad would round
/// away for values whose ulp exceeds it.
const DEGENERACY_NUDGE: f64 = 50.0 * f64::EPSILON;

/// Thickness of the default axis strip adjacent to the data area.
const AXIS_STRIP_THICKNESS: f64 = 0.1;

/// Construction options for an [`AxesSet`].
#[derive(Debug, Clone)]
pub struct AxesOptions {
    /// Per-dimension position of the axis relative to the data area's unit
    /// square: 0 draws on the low side, 1 on the high side. `None` hides
    /// that dimension's axis.
    pub axis_positions: [Option<f64>; 2],
    /// Per-dimension axis names; `None` falls back to `axis-0`/`axis-1`.
    pub axis_names: [Option<String>; 2],
    /// Per-dimension autoresize override. When `None`, a dimension
    /// autoresizes exactly when its requested extent range is unset.
    pub autoresize: Option<[bool; 2]>,
    /// Nonlinear display scale shared by the axes and their datasets.
    pub nonlinear: NonlinearScale,
}

impl AxesOptions {
    /// Name both axes.
    pub fn with_axis_names(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.axis_names = [Some(x.into()), Some(y.into())];
        self
    }

    /// Set both axis positions; `None` hides that axis.
    pub fn with_axis_positions(mut self, x: Option<f64>, y: Option<f64>) -> Self {
        self.axis_positions = [x, y];
        self
    }

    /// Force the per-dimension autoresize flags.
    pub fn with_autoresize(mut self, x: bool, y: bool) -> Self {
        self.autoresize = Some([x, y]);
        self
    }

    /// Set the nonlinear display scale.
    pub fn with_nonlinear(mut self, nonlinear: NonlinearScale) -> Self {
        self.nonlinear = nonlinear;
        self
    }
}

impl Default for AxesOptions {
    fn default() -> Self {
        Self {
            axis_positions: [Some(0.0), Some(0.0)],
            axis_names: [None, None],
            autoresize: None,
            nonlinear: NonlinearScale::Identity,
        }
    }
}

/// One data coordinate system: the current extent, the derived unit→data
/// transform, the visual axes, and the set of dataset names drawn through it.
///
/// The axes set holds the name of the [`DataArea`] it renders into, but not
/// the area itself; callers pass the area alongside the surface so several
/// axes sets can share one area.
#[derive(Debug)]
pub struct AxesSet {
    name: String,
    extent: Extent,
    original_extent: Extent,
    autoresize: [bool; 2],
    axis_positions: [Option<f64>; 2],
    nonlinear: NonlinearScale,
    from_data: Transform,
    axes: Vec<Axis>,
    registered: Vec<String>,
    area_name: String,
    group: Option<NodeId>,
}

impl AxesSet {
    /// Create an axes set over an extent.
    ///
    /// Unset (NaN) extent ranges mark their dimension autoresize unless the
    /// options override the flags explicitly.
    pub fn new(
        name: impl Into<String>,
        extent: Extent,
        area_name: impl Into<String>,
        options: AxesOptions,
    ) -> Self {
        let name = name.into();
        let autoresize = options
            .autoresize
            .unwrap_or([extent.x.is_unset(), extent.y.is_unset()]);
        let from_data = Transform::unit_to_extent(&extent);
        let axes = Dim::ALL
            .iter()
            .map(|&dim| {
                let position = options.axis_positions[dim.index()].unwrap_or(0.0);
                let axis_name = options.axis_names[dim.index()]
                    .clone()
                    .unwrap_or_else(|| format!("axis-{}", dim.index()));
                Axis::new(
                    dim,
                    axis_name,
                    default_containing_rect(dim, position),
                    1.0 - position,
                    from_data,
                    options.nonlinear,
                )
            })
            .collect();
        Self {
            name,
            extent,
            original_extent: extent,
            autoresize,
            axis_positions: options.axis_positions,
            nonlinear: options.nonlinear,
            from_data,
            axes,
            registered: Vec::new(),
            area_name: area_name.into(),
            group: None,
        }
    }

    /// Access the axes-set name, which doubles as its dataset cursor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the data area this axes set renders into.
    pub fn area_name(&self) -> &str {
        &self.area_name
    }

    /// The current extent in data coordinates.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The current unit→data transform.
    pub fn from_data_transform(&self) -> Transform {
        self.from_data
    }

    /// Per-dimension autoresize flags.
    pub fn autoresize(&self) -> [bool; 2] {
        self.autoresize
    }

    /// Names of the datasets this axes set is responsible for.
    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    /// Access one visual axis.
    pub fn axis(&self, dim: Dim) -> &Axis {
        &self.axes[dim.index()]
    }

    /// Create this axes set's scene group and its visible axes' groups.
    pub fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId) {
        let group = surface.create_group(Some(parent), &format!("axes-{}", self.name));
        for (axis, position) in self.axes.iter_mut().zip(self.axis_positions) {
            if position.is_some() {
                axis.attach(surface, group);
            }
        }
        self.group = Some(group);
    }

    /// Recompute and repaint every visible axis against the area's frame.
    pub fn draw(
        &mut self,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
        area: &DataArea,
    ) {
        let to_root = frames.to_root(area.frame());
        for (axis, position) in self.axes.iter_mut().zip(self.axis_positions) {
            if position.is_some() {
                axis.calc();
                axis.update_root_transform(to_root, surface);
            }
        }
    }

    /// Register a dataset, installing the area's default artist for it.
    pub fn register_dataset(
        &mut self,
        dataset: &str,
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
    ) {
        if !self.registered.iter().any(|name| name == dataset) {
            self.registered.push(dataset.to_string());
        }
        area.register_dataset(dataset, self.from_data.invert(), self.nonlinear, surface);
    }

    /// Deregister a dataset and drop its binding from the area.
    pub fn deregister_dataset(
        &mut self,
        dataset: &str,
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
    ) {
        self.registered.retain(|name| name != dataset);
        area.remove_dataset(dataset, surface);
    }

    /// Replace the extent, rebuilding the axes and every registered dataset
    /// transform.
    pub fn set_extent(
        &mut self,
        extent: Extent,
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) {
        self.extent = extent;
        self.from_data = Transform::unit_to_extent(&extent);
        for axis in &mut self.axes {
            axis.set_from_data_transform(self.from_data);
        }
        self.draw(surface, frames, area);
        for dataset in &self.registered {
            area.set_dataset_transform(dataset, self.from_data.invert(), self.nonlinear);
        }
    }

    /// Restore the extent the axes set was constructed with.
    pub fn reset(
        &mut self,
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) {
        self.set_extent(self.original_extent, area, surface, frames);
    }

    /// Drain a dataset's unread points, growing the extent where autoresize
    /// allows, and draw them through the area.
    ///
    /// Returns `true` when a resize occurred: all previously drawn geometry
    /// for this axes set's datasets has been cleared and the caller must
    /// replay every registered dataset through the now-current transform.
    /// Points arriving after a resize within the same batch are consumed but
    /// not drawn incrementally, since the replay covers them.
    pub fn draw_dataset(
        &mut self,
        store: &mut DataStore,
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<bool, ChartError> {
        let dataset = store.name().to_string();
        let mut resized = false;
        loop {
            let Some(point) = store.drain_new(&self.name).next() else {
                break;
            };
            let mut changed = [false; 2];
            for dim in Dim::ALL {
                if !self.autoresize[dim.index()] {
                    continue;
                }
                let range = self.extent.get_mut(dim);
                if range.widen_to(point.get(dim)) {
                    changed[dim.index()] = true;
                    if range.min == range.max {
                        let nudge = DEGENERACY_NUDGE * range.min.abs().max(1.0);
                        range.min -= nudge;
                        range.max += nudge;
                    }
                }
            }
            if changed.iter().any(|&c| c) {
                resized = true;
                self.update_when_extent_changed(changed, area, surface);
            }
            if !resized {
                trace!(axes = %self.name, dataset = %dataset, ?point, "drawing point");
                area.draw_data(&dataset, point, surface, frames)?;
            }
        }
        Ok(resized)
    }

    // Extent changed: rederive the transform, refresh the affected axes, and
    // clear every registered dataset's drawn geometry so the caller replays.
    fn update_when_extent_changed(
        &mut self,
        changed: [bool; 2],
        area: &mut DataArea,
        surface: &mut dyn VectorSurface,
    ) {
        self.from_data = Transform::unit_to_extent(&self.extent);
        assert!(
            !self.from_data.is_rank_deficient(),
            "axes {}: unit-to-data transform lost rank after extent update",
            self.name
        );
        assert!(
            self.from_data.is_finite(),
            "axes {}: unit-to-data transform has non-finite entries",
            self.name
        );
        debug!(axes = %self.name, extent = ?self.extent, ?changed, "extent resized");

        for (axis, &dim_changed) in self.axes.iter_mut().zip(&changed) {
            if dim_changed && self.axis_positions[axis.dim().index()].is_some() {
                axis.update_from_data_transform(self.from_data, surface);
            } else {
                axis.set_from_data_transform(self.from_data);
            }
        }
        for dataset in &self.registered {
            area.set_dataset_transform(dataset, self.from_data.invert(), self.nonlinear);
            // Drawn geometry is stale under the new transform.
            area.clear_dataset(dataset, surface);
        }
    }
}

// Default strip for an axis: full length along its own dimension, a thin
// band on the chosen side of the data area in the other.
fn default_containing_rect(dim: Dim, position: f64) -> Rect {
    let along = dim.unit();
    let across = dim.other().unit();
    let size = along + across * AXIS_STRIP_THICKNESS;
    let mut pos = across * position;
    if position < 0.5 {
        pos = pos + across * -AXIS_STRIP_THICKNESS;
    }
    Rect::new(pos.x, pos.y, size.x, size.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameTree;
    use crate::geom::Point;
    use crate::render::VectorScene;
    use approx::assert_relative_eq;

    fn fixture() -> (VectorScene, FrameTree, DataArea, AxesSet) {
        let mut scene = VectorScene::new();
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let area_frame = frames.add_child_from_rect(root, &Rect::new(0.1, 0.1, 0.8, 0.8));
        let top = scene.create_group(None, "plot");
        let mut area = DataArea::new("area", area_frame);
        area.attach(&mut scene, top);
        let mut axes = AxesSet::new(
            "axes",
            Extent::from_bounds(0.0, 1.0, 0.0, 1.0),
            "area",
            AxesOptions::default().with_autoresize(true, true),
        );
        axes.attach(&mut scene, top);
        axes.draw(&mut scene, &frames, &area);
        (scene, frames, area, axes)
    }

    fn feed(
        axes: &mut AxesSet,
        store: &mut DataStore,
        area: &mut DataArea,
        scene: &mut VectorScene,
        frames: &FrameTree,
        point: Point,
    ) -> bool {
        store.push(point);
        axes.draw_dataset(store, area, scene, frames).unwrap()
    }

    #[test]
    fn points_inside_the_extent_do_not_resize() {
        let (mut scene, frames, mut area, mut axes) = fixture();
        let mut store = DataStore::unbounded("series");
        axes.register_dataset("series", &mut area, &mut scene);
        for point in [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.5, 0.2)] {
            assert!(!feed(&mut axes, &mut store, &mut area, &mut scene, &frames, point));
        }
        assert_eq!(axes.extent(), Extent::from_bounds(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn exceeding_the_extent_resizes_once_and_requests_replay() {
        let (mut scene, frames, mut area, mut axes) = fixture();
        let mut store = DataStore::unbounded("series");
        axes.register_dataset("series", &mut area, &mut scene);
        assert!(!feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(0.0, 0.0)));
        assert!(!feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(1.0, 1.0)));
        assert!(feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(2.0, 4.0)));
        let extent = axes.extent();
        assert!(extent.x.min <= 0.0 && extent.x.max >= 2.0);
        assert!(extent.y.min <= 0.0 && extent.y.max >= 4.0);
    }

    #[test]
    fn extent_never_shrinks_under_autoresize() {
        let (mut scene, frames, mut area, mut axes) = fixture();
        let mut store = DataStore::unbounded("series");
        axes.register_dataset("series", &mut area, &mut scene);
        feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(5.0, -3.0));
        let grown = axes.extent();
        feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(0.5, 0.5));
        assert_eq!(axes.extent(), grown);
    }

    #[test]
    fn unset_extent_adopts_the_first_point_with_a_nudge() {
        let mut scene = VectorScene::new();
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let area_frame = frames.add_child_from_rect(root, &Rect::new(0.0, 0.0, 1.0, 1.0));
        let top = scene.create_group(None, "plot");
        let mut area = DataArea::new("area", area_frame);
        area.attach(&mut scene, top);
        let mut axes = AxesSet::new("axes", Extent::unset(), "area", AxesOptions::default());
        assert_eq!(axes.autoresize(), [true, true]);
        axes.attach(&mut scene, top);
        axes.draw(&mut scene, &frames, &area);
        axes.register_dataset("series", &mut area, &mut scene);

        let mut store = DataStore::unbounded("series");
        store.push(Point::new(3.0, 7.0));
        assert!(axes.draw_dataset(&mut store, &mut area, &mut scene, &frames).unwrap());
        let extent = axes.extent();
        assert!(extent.is_finite());
        assert!(extent.x.min < 3.0 && 3.0 < extent.x.max);
        assert!(extent.y.min < 7.0 && 7.0 < extent.y.max);
        assert!(axes.from_data_transform().is_finite());
        assert!(!axes.from_data_transform().is_rank_deficient());
    }

    #[test]
    fn large_adopted_values_still_produce_a_full_rank_transform() {
        let mut scene = VectorScene::new();
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let area_frame = frames.add_child_from_rect(root, &Rect::new(0.0, 0.0, 1.0, 1.0));
        let top = scene.create_group(None, "plot");
        let mut area = DataArea::new("area", area_frame);
        area.attach(&mut scene, top);
        let mut axes = AxesSet::new("axes", Extent::unset(), "area", AxesOptions::default());
        axes.attach(&mut scene, top);
        axes.draw(&mut scene, &frames, &area);
        axes.register_dataset("series", &mut area, &mut scene);

        // The ulp of 5000 dwarfs an absolute 50-epsilon pad; the nudge has
        // to scale with the value or the extent stays zero-width.
        let mut store = DataStore::unbounded("series");
        store.push(Point::new(0.5, 5000.0));
        assert!(axes.draw_dataset(&mut store, &mut area, &mut scene, &frames).unwrap());
        let extent = axes.extent();
        assert!(extent.is_finite());
        assert!(extent.y.min < 5000.0 && 5000.0 < extent.y.max);
        assert!(!axes.from_data_transform().is_rank_deficient());
        assert!(axes.from_data_transform().is_finite());
    }

    #[test]
    fn resize_refreshes_tick_labels_of_changed_dimensions() {
        let (mut scene, frames, mut area, mut axes) = fixture();
        let mut store = DataStore::unbounded("series");
        axes.register_dataset("series", &mut area, &mut scene);
        feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(10.0, 0.5));
        let labels = axes.axis(Dim::X).tick_labels();
        assert_eq!(labels.last().map(String::as_str), Some("10.0"));
        // The y extent was untouched.
        let labels = axes.axis(Dim::Y).tick_labels();
        assert_eq!(labels.last().map(String::as_str), Some("1.00"));
    }

    #[test]
    fn reset_restores_the_original_extent() {
        let (mut scene, frames, mut area, mut axes) = fixture();
        let mut store = DataStore::unbounded("series");
        axes.register_dataset("series", &mut area, &mut scene);
        feed(&mut axes, &mut store, &mut area, &mut scene, &frames, Point::new(9.0, 9.0));
        axes.reset(&mut area, &mut scene, &frames);
        assert_eq!(axes.extent(), Extent::from_bounds(0.0, 1.0, 0.0, 1.0));
        let scale = axes.from_data_transform().scale();
        assert_relative_eq!(scale.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(scale.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn hidden_axes_are_not_drawn() {
        let mut scene = VectorScene::new();
        let mut frames = FrameTree::new();
        let root = frames.add_root(Transform::IDENTITY);
        let area_frame = frames.add_child_from_rect(root, &Rect::new(0.0, 0.0, 1.0, 1.0));
        let top = scene.create_group(None, "plot");
        let mut area = DataArea::new("area", area_frame);
        area.attach(&mut scene, top);
        let mut axes = AxesSet::new(
            "right",
            Extent::unset(),
            "area",
            AxesOptions::default().with_axis_positions(None, Some(1.0)),
        );
        axes.attach(&mut scene, top);
        axes.draw(&mut scene, &frames, &area);
        assert!(scene.find_group("axis-axis-0").is_none());
        assert!(scene.find_group("axis-axis-1").is_some());
    }
}
