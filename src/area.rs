//! Data areas: the rectangular display region datasets are drawn into.

use indexmap::IndexMap;

use crate::artist::{LineArtist, PlotArtist};
use crate::figure::ChartError;
use crate::frame::{FrameId, FrameTree};
use crate::geom::Point;
use crate::render::{NodeId, PALETTE, VectorSurface};
use crate::scale::NonlinearScale;
use crate::transform::Transform;

/// A rectangular drawing region with one reference frame, holding a
/// data→unit transform, a nonlinear display stage, and an artist per
/// registered dataset.
///
/// For each incoming point the area applies the dataset's affine transform,
/// warps the result through the nonlinear scale, and hands the display-space
/// point plus the frame's to-root transform to the dataset's artist.
#[derive(Debug)]
pub struct DataArea {
    name: String,
    frame: FrameId,
    group: Option<NodeId>,
    transforms: IndexMap<String, Transform>,
    nonlinears: IndexMap<String, NonlinearScale>,
    artists: IndexMap<String, Box<dyn PlotArtist>>,
    // Counts artists ever bound, driving default palette assignment.
    n_artists: usize,
}

impl DataArea {
    /// Create a data area drawing into the given frame.
    pub fn new(name: impl Into<String>, frame: FrameId) -> Self {
        Self {
            name: name.into(),
            frame,
            group: None,
            transforms: IndexMap::new(),
            nonlinears: IndexMap::new(),
            artists: IndexMap::new(),
            n_artists: 0,
        }
    }

    /// Access the area name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frame whose unit square this area draws into.
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Names of the datasets bound to this area.
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.artists.keys().map(String::as_str)
    }

    /// Create this area's scene group under `parent`.
    pub fn attach(&mut self, surface: &mut dyn VectorSurface, parent: NodeId) {
        self.group = Some(surface.create_group(Some(parent), &format!("area-{}", self.name)));
    }

    /// Store the affine and nonlinear stages for a dataset.
    pub fn set_dataset_transform(
        &mut self,
        dataset: &str,
        to_unit: Transform,
        nonlinear: NonlinearScale,
    ) {
        self.transforms.insert(dataset.to_string(), to_unit);
        self.nonlinears.insert(dataset.to_string(), nonlinear);
    }

    /// The stored data→unit transform for a dataset.
    pub fn dataset_transform(&self, dataset: &str) -> Option<Transform> {
        self.transforms.get(dataset).copied()
    }

    /// Bind a dataset, creating a default line artist if none is bound yet.
    pub fn register_dataset(
        &mut self,
        dataset: &str,
        to_unit: Transform,
        nonlinear: NonlinearScale,
        surface: &mut dyn VectorSurface,
    ) {
        self.set_dataset_transform(dataset, to_unit, nonlinear);
        if !self.artists.contains_key(dataset) {
            self.bind_artist(dataset, Box::new(LineArtist::new()), surface);
        }
    }

    /// Replace the artist bound to a dataset.
    ///
    /// The previous artist's geometry is removed. The new artist takes the
    /// next palette color as its default, like a fresh registration would.
    pub fn set_artist(
        &mut self,
        dataset: &str,
        artist: Box<dyn PlotArtist>,
        surface: &mut dyn VectorSurface,
    ) -> Result<(), ChartError> {
        if !self.transforms.contains_key(dataset) {
            return Err(ChartError::UnknownDataset(dataset.to_string()));
        }
        if let Some(mut old) = self.artists.shift_remove(dataset) {
            old.detach(surface);
        }
        self.bind_artist(dataset, artist, surface);
        Ok(())
    }

    /// Run one point through the transform pipeline and draw it.
    pub fn draw_data(
        &mut self,
        dataset: &str,
        point: Point,
        surface: &mut dyn VectorSurface,
        frames: &FrameTree,
    ) -> Result<(), ChartError> {
        let to_unit = self
            .transforms
            .get(dataset)
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?;
        let nonlinear = self.nonlinears.get(dataset).copied().unwrap_or_default();
        let artist = self
            .artists
            .get_mut(dataset)
            .ok_or_else(|| ChartError::UnknownDataset(dataset.to_string()))?;
        let warped = nonlinear.apply(to_unit.apply(point));
        artist.draw(surface, warped, frames.to_root(self.frame));
        Ok(())
    }

    /// Clear a dataset's drawn geometry, keeping its bindings.
    ///
    /// Unknown names are a no-op; a clear has nothing to remove.
    pub fn clear_dataset(&mut self, dataset: &str, surface: &mut dyn VectorSurface) {
        if let Some(artist) = self.artists.get_mut(dataset) {
            artist.clear(surface);
        }
    }

    /// Clear every bound dataset's drawn geometry.
    pub fn clear_all(&mut self, surface: &mut dyn VectorSurface) {
        for artist in self.artists.values_mut() {
            artist.clear(surface);
        }
    }

    /// Drop a dataset's transform and artist, detaching its geometry.
    pub fn remove_dataset(&mut self, dataset: &str, surface: &mut dyn VectorSurface) {
        self.transforms.shift_remove(dataset);
        self.nonlinears.shift_remove(dataset);
        if let Some(mut artist) = self.artists.shift_remove(dataset) {
            artist.detach(surface);
        }
    }

    fn bind_artist(
        &mut self,
        dataset: &str,
        mut artist: Box<dyn PlotArtist>,
        surface: &mut dyn VectorSurface,
    ) {
        let Some(group) = self.group else {
            panic!("data area used before attach");
        };
        self.n_artists += 1;
        artist.set_default_color(PALETTE[self.n_artists % PALETTE.len()]);
        artist.attach(surface, group, dataset);
        self.artists.insert(dataset.to_string(), artist);
    }
}
