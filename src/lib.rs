//! iterplot draws the live progress charts of an iterative image
//! deconvolution: auto-resizing axes over named datasets, incremental
//! artists, and a reference-frame tree mapping everything onto a retained
//! vector surface.

#![forbid(unsafe_code)]

pub mod area;
pub mod artist;
pub mod axes;
pub mod axis;
pub mod dataset;
pub mod figure;
pub mod frame;
pub mod geom;
pub mod params;
pub mod progress;
pub mod render;
pub mod scale;
pub mod transform;

pub use area::DataArea;
pub use artist::{
    LineArtist, LineArtistConfig, MarkerConfig, PlotArtist, StepArtist, StepArtistConfig,
    VlineArtist, VlineArtistConfig,
};
pub use axes::{AxesOptions, AxesSet};
pub use axis::Axis;
pub use dataset::{DataStore, Dataset, RingDataset};
pub use figure::{ChartError, Figure, FigureConfig, PlotArea};
pub use frame::{FrameId, FrameTree};
pub use geom::{Dim, Extent, Point, Range, Rect, Vec2};
pub use params::{ParamError, ParamSchema, ParamSet, ParamSpec, ParamType, ParamValue, deconv_schema};
pub use progress::{
    DeconvService, HISTOGRAM_BINS, IterationArrays, IterationSample, IterationSink, NullSink,
    ProgressCharts, Raster, RunError, RunOutputs, histogram,
};
pub use render::{
    Color, DashPattern, LineStyle, MarkerShape, MarkerStyle, NodeId, PALETTE, RectStyle,
    ScenePrimitive, TextStyle, VectorScene, VectorSurface,
};
pub use scale::{DEFAULT_PSEUDO_LOG_BASE, NonlinearScale};
pub use transform::Transform;
