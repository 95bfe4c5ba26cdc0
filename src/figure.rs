//! Plot-area and figure containers routing named-dataset operations.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::area::DataArea;
use crate::artist::PlotArtist;
use crate::axes::{AxesOptions, AxesSet};
use crate::dataset::DataStore;
use crate::frame::{FrameId, FrameTree};
use crate::geom::{Extent, Point, Rect, Vec2};
use crate::render::{NodeId, TextStyle, VectorSurface, place_text};

/// Misuse of the name-keyed container APIs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    /// No plot area with this name.
    #[error("unknown plot area {0:?}")]
    UnknownPlotArea(String),
    /// A plot area with this name already exists.
    #[error("plot area {0:?} already exists")]
    DuplicatePlotArea(String),
    /// No data area with this name.
    #[error("unknown data area {0:?}")]
    UnknownDataArea(String),
    /// A data area with this name already exists.
    #[error("data area {0:?} already exists")]
    DuplicateDataArea(String),
    /// No axes set with this name.
    #[error("unknown axes set {0:?}")]
    UnknownAxes(String),
    /// An axes set with this name already exists.
    #[error("axes set {0:?} already exists")]
    DuplicateAxes(String),
    /// No dataset with this name.
    #[error("unknown dataset {0:?}")]
    UnknownDataset(String),
    /// A dataset with this name already exists.
    #[error("dataset {0:?} already exists")]
    DuplicateDataset(String),
    /// An axes set was added to a plot area with no data area to render into.
    #[error("plot area {0:?} has no data area")]
    NoDataArea(String),
}

/// One plot: a frame, a scene group, and insertion-ordered registries of
/// data areas, axes sets, and datasets, plus the axes-for-dataset fan-out.
#[derive(Debug)]
pub struct PlotArea {
    name: String,
    frame: FrameId,
    group: Option<NodeId>,
    data_areas: IndexMap<String, DataArea>,
    axes: IndexMap<String, AxesSet>,
    datasets: IndexMap<String, DataStore>,
    axes_for_dataset: IndexMap<String, Vec<String>>,
}

impl PlotArea {
    fn new(name: impl Into<String>, frame: FrameId) -> Self {
        Self {
            name: name.into(),
            frame,
            group: None,
            data_areas: IndexMap::new(),
            axes: IndexMap::new(),
            datasets: IndexMap::new(),
            axes_for_dataset: IndexMap::new(),
        }
    }

    /// Access the plot-area name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access an axes set by name.
    pub fn axes(&self, name: &str) -> Result<&AxesSet, ChartError> {
        self.axes
            .get(name)
            .ok_or_else(|| ChartError::UnknownAxes(name.to_string()))
    }

    /// Access a dataset store by name.
    pub fn dataset(&self, name: &str) -> Result<&DataStore, ChartError> {
        self.datasets
            .get(name)
            .ok_or_else(|| ChartError::UnknownDataset(name.to_string()))
    }

    /// Dataset names in registration order.
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    fn attach(&mut self, surface: &mut dyn VectorSurface, frames: &FrameTree, parent: NodeId) {
        let group = surface.create_group(Some(parent), &format!("plot-{}", self.name));
        // Plot title sits centered above the frame's unit square.
        let position = frames.to_root(self.frame).apply(Point::new(0.5, 1.0));
        let style = TextStyle::default().with_anchor(Vec2::new(0.5, 0.0));
        place_text(surface, group, position, &self.name, &style);
        self.group = Some(group);
    }

    fn add_data_area_from_rect(
        &mut self,
        name: &str,
        rect: Rect,
        surface: &mut dyn VectorSurface,
        frames: &mut FrameTree,
    ) -> Result<(), ChartError> {
        if self.data_areas.contains_key(name) {
            return Err(ChartError::DuplicateDataArea(name.to_string()));
        }
        let Some(group) = self.group else {
            panic!("plot area used before attach");
        };
        let frame = frames.add_child_from_rect(self.frame, &rect);
        let mut area = DataArea::new(name, frame);
        area.attach(surface, group);
        self.data_areas.insert(name.to_string(), area);
        Ok(())
    }

    fn add_axes_from_extent(
        &mut self,
        name: &str,
        extent: Extent,
        options: AxesOptions,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        if self.axes.contains_key(name) {
            return Err(ChartError::DuplicateAxes(name.to_string()));
        }
        let Some(group) = self.group else {
            panic!("plot area used before attach");
        };
        // Axes render into the first data area unless told otherwise.
        let area = self
            .data_areas
            .values_mut()
            .next()
            .ok_or_else(|| ChartError::NoDataArea(self.name.clone()))?;
        let mut axes = AxesSet::new(name, extent, area.name().to_string(), options);
        axes.attach(surface, group);
        axes.draw(surface, frames, area);
        self.axes.insert(name.to_string(), axes);
        Ok(())
    }

    fn add_dataset(
        &mut self,
        axes_name: &str,
        store: DataStore,
        surface: &mut dyn VectorSurface,
    ) -> Result<(), ChartError> {
        let dataset = store.name().to_string();
        if self.datasets.contains_key(&dataset) {
            return Err(ChartError::DuplicateDataset(dataset));
        }
        let axes = self
            .axes
            .get_mut(axes_name)
            .ok_or_else(|| ChartError::UnknownAxes(axes_name.to_string()))?;
        let area = self
            .data_areas
            .get_mut(axes.area_name())
            .ok_or_else(|| ChartError::UnknownDataArea(axes.area_name().to_string()))?;
        axes.register_dataset(&dataset, area, surface);
        self.axes_for_dataset
            .entry(dataset.clone())
            .or_default()
            .push(axes_name.to_string());
        self.datasets.insert(dataset, store);
        Ok(())
    }

    fn set_artist(
        &mut self,
        dataset: &str,
        artist: Box<dyn PlotArtist>,
        surface: &mut dyn VectorSurface,
    ) -> Result<(), ChartError> {
        let axes_name = self
            .axes_for_dataset
            .get(dataset)
            .and_then(|names| names.first())
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?;
        let axes = self
            .axes
            .get(axes_name)
            .ok_or_else(|| ChartError::UnknownAxes(axes_name.clone()))?;
        let area = self
            .data_areas
            .get_mut(axes.area_name())
            .ok_or_else(|| ChartError::UnknownDataArea(axes.area_name().to_string()))?;
        area.set_artist(dataset, artist, surface)
    }

    fn append_to_dataset(
        &mut self,
        dataset: &str,
        point: Point,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        self.datasets
            .get_mut(dataset)
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?
            .push(point);
        self.draw_new_data(dataset, surface, frames)
    }

    fn set_dataset(
        &mut self,
        dataset: &str,
        points: Vec<Point>,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        self.datasets
            .get_mut(dataset)
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?
            .set(points);
        self.draw_new_data(dataset, surface, frames)
    }

    fn replace_dataset(
        &mut self,
        dataset: &str,
        points: Vec<Point>,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        let store = self
            .datasets
            .get_mut(dataset)
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?;
        store.clear();
        store.set(points);
        let axes_names = self.axes_names_for(dataset)?;
        for axes_name in &axes_names {
            let axes = self
                .axes
                .get_mut(axes_name)
                .ok_or_else(|| ChartError::UnknownAxes(axes_name.clone()))?;
            let area = self
                .data_areas
                .get_mut(axes.area_name())
                .ok_or_else(|| ChartError::UnknownDataArea(axes.area_name().to_string()))?;
            area.clear_dataset(dataset, surface);
        }
        self.draw_new_data(dataset, surface, frames)
    }

    fn clear(
        &mut self,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        for store in self.datasets.values_mut() {
            store.clear();
        }
        for area in self.data_areas.values_mut() {
            area.clear_all(surface);
        }
        let axes_names: Vec<String> = self.axes.keys().cloned().collect();
        for name in axes_names {
            let Some(axes) = self.axes.get_mut(&name) else {
                continue;
            };
            let area = self
                .data_areas
                .get_mut(axes.area_name())
                .ok_or_else(|| ChartError::UnknownDataArea(axes.area_name().to_string()))?;
            axes.reset(area, surface, frames);
        }
        Ok(())
    }

    fn axes_names_for(&self, dataset: &str) -> Result<Vec<String>, ChartError> {
        self.axes_for_dataset
            .get(dataset)
            .cloned()
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))
    }

    // Drain the dataset's unread points through every axes set registered for
    // it, replaying all of an axes set's datasets when a resize occurred.
    fn draw_new_data(
        &mut self,
        dataset: &str,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        let axes_names = self.axes_names_for(dataset)?;
        for axes_name in &axes_names {
            let axes = self
                .axes
                .get_mut(axes_name)
                .ok_or_else(|| ChartError::UnknownAxes(axes_name.clone()))?;
            let area = self
                .data_areas
                .get_mut(axes.area_name())
                .ok_or_else(|| ChartError::UnknownDataArea(axes.area_name().to_string()))?;
            let store = self
                .datasets
                .get_mut(dataset)
                .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?;
            let resized = axes.draw_dataset(store, area, surface, frames)?;
            if resized {
                let replay = axes.registered().to_vec();
                debug!(
                    plot = %self.name,
                    axes = %axes_name,
                    datasets = replay.len(),
                    "extent resized, replaying datasets"
                );
                // A replayed dataset can widen the extent again, clearing
                // what earlier passes drew. Extents only grow, so repeating
                // until a pass stays resize-free terminates.
                loop {
                    let mut resized_again = false;
                    for name in &replay {
                        let store = self
                            .datasets
                            .get_mut(name)
                            .ok_or_else(|| ChartError::UnknownDataset(name.clone()))?;
                        store.reset_cursor(axes.name());
                        resized_again |= axes.draw_dataset(store, area, surface, frames)?;
                    }
                    if !resized_again {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Figure geometry and annotation options.
#[derive(Debug, Clone, Default)]
pub struct FigureConfig {
    /// Width and height in figure units; defaults to 6 x 4.
    pub shape: Option<Vec2>,
    /// Figure title.
    pub title: Option<String>,
    /// Figure caption.
    pub caption: Option<String>,
}

impl FigureConfig {
    /// Set the figure shape.
    pub fn with_shape(mut self, shape: Vec2) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the figure title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the figure caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Top-level container: the rendering surface, the frame tree, and the
/// named plot areas.
///
/// The root frame maps the figure's unit square to display coordinates with
/// y flipped, so figure coordinates grow upward while display coordinates
/// grow downward. The scale is chosen so the larger figure dimension spans
/// 100 display units.
#[derive(Debug)]
pub struct Figure<S: VectorSurface> {
    surface: S,
    frames: FrameTree,
    root: FrameId,
    group: NodeId,
    scale: f64,
    title: Option<String>,
    caption: Option<String>,
    plot_areas: IndexMap<String, PlotArea>,
}

impl<S: VectorSurface> Figure<S> {
    /// Create a figure with default geometry.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, FigureConfig::default())
    }

    /// Create a figure from explicit options.
    pub fn with_config(mut surface: S, config: FigureConfig) -> Self {
        let shape = config.shape.unwrap_or(Vec2::new(6.0, 4.0));
        let scale = 100.0 / shape.x.abs().max(shape.y.abs());
        let display_rect = Rect::new(0.0, scale * shape.y, scale * shape.x, -scale * shape.y);
        let mut frames = FrameTree::new();
        let root = frames.add_root(crate::transform::Transform::unit_to_rect(&display_rect));
        let group = surface.create_group(None, "figure");
        Self {
            surface,
            frames,
            root,
            group,
            scale,
            title: config.title,
            caption: config.caption,
            plot_areas: IndexMap::new(),
        }
    }

    /// Display units per figure unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Access the figure title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replace the figure title.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Access the figure caption.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Replace the figure caption.
    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    /// Access the rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Access the frame tree.
    pub fn frames(&self) -> &FrameTree {
        &self.frames
    }

    /// Access a plot area by name.
    pub fn plot_area(&self, name: &str) -> Result<&PlotArea, ChartError> {
        self.plot_areas
            .get(name)
            .ok_or_else(|| ChartError::UnknownPlotArea(name.to_string()))
    }

    /// Add a plot area whose unit square covers a rectangle of the figure.
    pub fn add_plot_area_from_rect(&mut self, name: &str, rect: Rect) -> Result<(), ChartError> {
        if self.plot_areas.contains_key(name) {
            return Err(ChartError::DuplicatePlotArea(name.to_string()));
        }
        let frame = self.frames.add_child_from_rect(self.root, &rect);
        let mut plot = PlotArea::new(name, frame);
        plot.attach(&mut self.surface, &self.frames, self.group);
        self.plot_areas.insert(name.to_string(), plot);
        Ok(())
    }

    /// Add a data area to a plot area.
    pub fn add_data_area_from_rect(
        &mut self,
        plot: &str,
        name: &str,
        rect: Rect,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .add_data_area_from_rect(name, rect, &mut self.surface, &mut self.frames)
    }

    /// Add an axes set over an extent to a plot area.
    pub fn add_axes_from_extent(
        &mut self,
        plot: &str,
        name: &str,
        extent: Extent,
        options: AxesOptions,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .add_axes_from_extent(name, extent, options, &mut self.surface, &self.frames)
    }

    /// Register an existing store with an axes set of a plot area.
    pub fn add_dataset(
        &mut self,
        plot: &str,
        axes: &str,
        store: DataStore,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .add_dataset(axes, store, &mut self.surface)
    }

    /// Create and register an unbounded dataset with an axes set.
    pub fn new_dataset(&mut self, plot: &str, axes: &str, name: &str) -> Result<(), ChartError> {
        self.add_dataset(plot, axes, DataStore::unbounded(name))
    }

    /// Replace the artist bound to a dataset.
    pub fn set_artist(
        &mut self,
        plot: &str,
        dataset: &str,
        artist: Box<dyn PlotArtist>,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .set_artist(dataset, artist, &mut self.surface)
    }

    /// Append one point to a dataset and draw whatever is new.
    pub fn append_to_dataset(
        &mut self,
        plot: &str,
        dataset: &str,
        point: Point,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .append_to_dataset(dataset, point, &mut self.surface, &self.frames)
    }

    /// Replace a dataset's backing store and draw whatever is new.
    ///
    /// Cursors are left alone, so consumers past the new length see nothing
    /// until the store regrows. Use [`Figure::replace_dataset`] to start the
    /// drawn geometry over as well.
    pub fn set_dataset(
        &mut self,
        plot: &str,
        dataset: &str,
        points: Vec<Point>,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .set_dataset(dataset, points, &mut self.surface, &self.frames)
    }

    /// Replace a dataset's contents wholesale: storage, cursors, and drawn
    /// geometry all start over, then the new points are drawn.
    pub fn replace_dataset(
        &mut self,
        plot: &str,
        dataset: &str,
        points: Vec<Point>,
    ) -> Result<(), ChartError> {
        self.plot_areas
            .get_mut(plot)
            .ok_or_else(|| ChartError::UnknownPlotArea(plot.to_string()))?
            .replace_dataset(dataset, points, &mut self.surface, &self.frames)
    }

    /// Clear every plot area: datasets, drawn geometry, and extents.
    pub fn clear_all(&mut self) -> Result<(), ChartError> {
        let names: Vec<String> = self.plot_areas.keys().cloned().collect();
        for name in names {
            let Some(plot) = self.plot_areas.get_mut(&name) else {
                continue;
            };
            plot.clear(&mut self.surface, &self.frames)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artist::VlineArtist;
    use crate::render::{ScenePrimitive, VectorScene};

    fn stopping_figure() -> Figure<VectorScene> {
        let mut figure = Figure::new(VectorScene::new());
        figure
            .add_plot_area_from_rect("stopping", Rect::new(0.05, 0.05, 0.9, 0.9))
            .unwrap();
        figure
            .add_data_area_from_rect("stopping", "data", Rect::new(0.1, 0.1, 0.8, 0.8))
            .unwrap();
        figure
            .add_axes_from_extent(
                "stopping",
                "axes",
                Extent::from_bounds(0.0, 1.0, 0.0, 1.0),
                AxesOptions::default().with_autoresize(true, true),
            )
            .unwrap();
        figure.new_dataset("stopping", "axes", "series").unwrap();
        figure
    }

    fn series_polyline(figure: &Figure<VectorScene>) -> Vec<Point> {
        let scene = figure.surface();
        let group = scene.find_group("area-data").unwrap();
        scene
            .descendants(group)
            .into_iter()
            .find_map(|id| match scene.get(id) {
                Some(ScenePrimitive::Polyline { points, .. }) => Some(points.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn scale_maps_larger_dimension_to_hundred_units() {
        let figure = Figure::with_config(
            VectorScene::new(),
            FigureConfig::default().with_shape(Vec2::new(8.0, 4.0)),
        );
        assert_eq!(figure.scale(), 12.5);
    }

    #[test]
    fn third_point_triggers_one_resize_and_full_replay() {
        let mut figure = stopping_figure();
        figure
            .append_to_dataset("stopping", "series", Point::new(0.0, 0.0))
            .unwrap();
        figure
            .append_to_dataset("stopping", "series", Point::new(1.0, 1.0))
            .unwrap();
        let extent = figure
            .plot_area("stopping")
            .unwrap()
            .axes("axes")
            .unwrap()
            .extent();
        assert_eq!(extent, Extent::from_bounds(0.0, 1.0, 0.0, 1.0));
        assert_eq!(series_polyline(&figure).len(), 2);

        figure
            .append_to_dataset("stopping", "series", Point::new(2.0, 4.0))
            .unwrap();
        let extent = figure
            .plot_area("stopping")
            .unwrap()
            .axes("axes")
            .unwrap()
            .extent();
        assert!(extent.x.min <= 0.0 && extent.x.max >= 2.0);
        assert!(extent.y.min <= 0.0 && extent.y.max >= 4.0);
        // The replay rebuilt the polyline from scratch with all three points.
        assert_eq!(series_polyline(&figure).len(), 3);
    }

    #[test]
    fn replay_repeats_when_a_replayed_dataset_resizes_again() {
        let mut figure = stopping_figure();
        figure
            .append_to_dataset("stopping", "series", Point::new(0.0, 0.0))
            .unwrap();
        figure
            .append_to_dataset("stopping", "series", Point::new(1.0, 1.0))
            .unwrap();
        // A pre-populated store whose point lies far outside the extent:
        // replaying it widens the extent a second time mid-replay.
        let mut wide = DataStore::unbounded("wide");
        wide.push(Point::new(50.0, 50.0));
        figure.add_dataset("stopping", "axes", wide).unwrap();
        figure
            .append_to_dataset("stopping", "series", Point::new(2.0, 4.0))
            .unwrap();
        let extent = figure
            .plot_area("stopping")
            .unwrap()
            .axes("axes")
            .unwrap()
            .extent();
        assert!(extent.x.max >= 50.0 && extent.y.max >= 50.0);
        // The second replay pass restored the series cleared by the first.
        assert_eq!(series_polyline(&figure).len(), 3);
    }

    #[test]
    fn second_axes_set_tracks_its_own_datasets() {
        let mut figure = stopping_figure();
        figure
            .add_axes_from_extent(
                "stopping",
                "right",
                Extent::unset(),
                AxesOptions::default().with_axis_positions(None, Some(1.0)),
            )
            .unwrap();
        figure.new_dataset("stopping", "right", "threshold").unwrap();
        figure
            .append_to_dataset("stopping", "threshold", Point::new(0.0, 0.8))
            .unwrap();
        figure
            .append_to_dataset("stopping", "series", Point::new(0.5, 0.5))
            .unwrap();
        let plot = figure.plot_area("stopping").unwrap();
        assert_eq!(plot.dataset("series").unwrap().len(), 1);
        assert_eq!(plot.dataset("threshold").unwrap().len(), 1);
    }

    #[test]
    fn ring_dataset_keeps_one_marker_per_replace() {
        let mut figure = stopping_figure();
        figure
            .add_dataset("stopping", "axes", DataStore::ring("marker", 1))
            .unwrap();
        figure
            .set_artist("stopping", "marker", Box::new(VlineArtist::new()))
            .unwrap();
        figure
            .replace_dataset("stopping", "marker", vec![Point::new(5.0, 0.0)])
            .unwrap();
        figure
            .replace_dataset("stopping", "marker", vec![Point::new(9.0, 0.0)])
            .unwrap();
        let plot = figure.plot_area("stopping").unwrap();
        // Only the latest value is retained by the capacity-1 ring.
        assert_eq!(plot.dataset("marker").unwrap().len(), 1);
        let mut points: Vec<Point> = Vec::new();
        let scene = figure.surface();
        let group = scene.find_group("marker").unwrap();
        for id in scene.descendants(group) {
            if let Some(ScenePrimitive::Line { start, .. }) = scene.get(id) {
                points.push(*start);
            }
        }
        assert_eq!(points.len(), 1, "exactly one threshold marker line");
    }

    #[test]
    fn clear_resets_extents_and_geometry() {
        let mut figure = stopping_figure();
        figure
            .append_to_dataset("stopping", "series", Point::new(10.0, -5.0))
            .unwrap();
        figure.clear_all().unwrap();
        let plot = figure.plot_area("stopping").unwrap();
        assert_eq!(
            plot.axes("axes").unwrap().extent(),
            Extent::from_bounds(0.0, 1.0, 0.0, 1.0)
        );
        assert!(plot.dataset("series").unwrap().is_empty());
        assert!(series_polyline(&figure).is_empty());
        // The figure keeps working after a clear.
        figure
            .append_to_dataset("stopping", "series", Point::new(0.5, 0.5))
            .unwrap();
        assert_eq!(series_polyline(&figure).len(), 1);
    }

    #[test]
    fn duplicate_and_unknown_names_are_rejected() {
        let mut figure = stopping_figure();
        assert_eq!(
            figure.add_plot_area_from_rect("stopping", Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(ChartError::DuplicatePlotArea("stopping".to_string()))
        );
        assert_eq!(
            figure.new_dataset("stopping", "axes", "series"),
            Err(ChartError::DuplicateDataset("series".to_string()))
        );
        assert_eq!(
            figure.append_to_dataset("missing", "series", Point::new(0.0, 0.0)),
            Err(ChartError::UnknownPlotArea("missing".to_string()))
        );
        assert_eq!(
            figure.append_to_dataset("stopping", "missing", Point::new(0.0, 0.0)),
            Err(ChartError::UnknownDataset("missing".to_string()))
        );
    }
}
