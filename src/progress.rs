//! Deconvolution service contract and the standard progress-chart set.
//!
//! The compute side is opaque to the plotting engine: a [`DeconvService`]
//! drives an [`IterationSink`] once per reported iteration, handing it the
//! scalar stopping statistics and borrowed views of the working arrays.
//! [`ProgressCharts`] is the standard sink, owning the five figures the tool
//! shows while a run is in flight.

use thiserror::Error;
use tracing::warn;

use crate::artist::{StepArtist, VlineArtist};
use crate::axes::AxesOptions;
use crate::dataset::DataStore;
use crate::figure::{ChartError, Figure, FigureConfig};
use crate::geom::{Extent, Point, Rect};
use crate::params::{ParamError, ParamSet};
use crate::render::VectorSurface;
use crate::scale::NonlinearScale;

/// Number of bins in the per-iteration histograms.
pub const HISTOGRAM_BINS: usize = 100;

/// Scalar statistics reported once per iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSample {
    /// Iteration index, starting at zero.
    pub iteration: usize,
    /// Max-absolute residual divided by the max-absolute of the input.
    pub fabs_frac: f64,
    /// Residual rms divided by the rms of the input.
    pub rms_frac: f64,
    /// Pixel-selection threshold used this iteration.
    pub threshold: f64,
}

/// Borrowed views of the working arrays, valid for one callback.
#[derive(Debug, Clone, Copy)]
pub struct IterationArrays<'a> {
    /// Residual image samples.
    pub residual: &'a [f64],
    /// Accumulated component samples.
    pub components: &'a [f64],
    /// Samples selected above the threshold this iteration.
    pub selected_pixels: &'a [f64],
    /// Selected pixels convolved with the point-spread function.
    pub current_convolved: &'a [f64],
}

/// A rectangular sample array.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Width in samples.
    pub width: usize,
    /// Height in samples.
    pub height: usize,
    /// Row-major samples, `width * height` long.
    pub samples: Vec<f64>,
}

impl Raster {
    /// Create a raster from row-major samples.
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> Self {
        assert_eq!(samples.len(), width * height, "raster shape mismatch");
        Self {
            width,
            height,
            samples,
        }
    }
}

/// Final products of a deconvolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutputs {
    /// Restored image.
    pub clean_map: Raster,
    /// Residual left after the last iteration.
    pub residual: Raster,
}

/// Deconvolution run failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configured parameters were rejected.
    #[error(transparent)]
    Params(#[from] ParamError),
    /// The input rasters are unusable (shape mismatch, empty, non-finite).
    #[error("bad input: {0}")]
    BadInput(String),
}

/// Observer driven once per reported iteration.
pub trait IterationSink {
    /// Record one iteration's statistics and working arrays.
    fn on_iteration(&mut self, sample: &IterationSample, arrays: &IterationArrays<'_>);
}

/// A sink that drops everything, for runs nobody is watching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl IterationSink for NullSink {
    fn on_iteration(&mut self, _sample: &IterationSample, _arrays: &IterationArrays<'_>) {}
}

/// Contract between the plotting engine and a deconvolution implementation.
pub trait DeconvService {
    /// Validate and adopt a parameter set for subsequent runs.
    fn configure(&mut self, params: &ParamSet) -> Result<(), ParamError>;

    /// Run the algorithm, reporting each iteration to the sink.
    fn run(
        &mut self,
        science: &Raster,
        psf: &Raster,
        sink: &mut dyn IterationSink,
    ) -> Result<RunOutputs, RunError>;
}

/// Histogram of a sample array as `(left_edge, count)` pairs.
///
/// Bin edges span the data with half an average sample spacing of padding on
/// each side, matching what the counts would look like for evenly spread
/// input. Non-finite samples are skipped. Empty input or zero bins yield an
/// empty histogram.
pub fn histogram(samples: &[f64], n_bins: usize) -> Vec<Point> {
    let mut data: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if data.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    data.sort_unstable_by(f64::total_cmp);
    let min = data[0];
    let max = data[data.len() - 1];
    let av_delta = (max - min) / data.len() as f64;
    let lo = min - av_delta / 2.0;
    let hi = max + av_delta / 2.0;
    let step = if n_bins > 1 {
        (hi - lo) / (n_bins - 1) as f64
    } else {
        0.0
    };
    let edges: Vec<f64> = (0..n_bins).map(|i| lo + step * i as f64).collect();
    let mut counts = vec![0u32; n_bins];
    let mut bin = 0;
    for value in data {
        while bin + 1 < n_bins && edges[bin] < value {
            bin += 1;
        }
        counts[bin] += 1;
    }
    edges
        .into_iter()
        .zip(counts)
        .map(|(edge, count)| Point::new(edge, count as f64))
        .collect()
}

/// The five standard progress figures, fed through [`IterationSink`].
///
/// Every figure gets its own surface so backends can host them in separate
/// panels. Dataset and plot-area names follow the tool's fixed wiring; the
/// routing methods on [`Figure`] do the rest.
#[derive(Debug)]
pub struct ProgressCharts<S: VectorSurface> {
    stopping: Figure<S>,
    residual: Figure<S>,
    components: Figure<S>,
    selected: Figure<S>,
    convolved: Figure<S>,
}

impl<S: VectorSurface> ProgressCharts<S> {
    /// Build the five figures, drawing a fresh surface from the factory for
    /// each.
    pub fn new(mut make_surface: impl FnMut() -> S) -> Result<Self, ChartError> {
        let mut stopping = Figure::with_config(
            make_surface(),
            FigureConfig::default()
                .with_title("Stopping Criteria and Threshold for each Iteration"),
        );
        stopping.add_plot_area_from_rect("stopping_criteria", Rect::new(0.05, 0.05, 0.9, 0.9))?;
        stopping.add_data_area_from_rect(
            "stopping_criteria",
            "stopping_criteria_data_area",
            Rect::new(0.1, 0.1, 0.8, 0.8),
        )?;
        stopping.add_axes_from_extent(
            "stopping_criteria",
            "stopping_criteria_axes",
            Extent::unset(),
            AxesOptions::default()
                .with_axis_names("iteration", "fabs (red) and rms (green) value"),
        )?;
        stopping.add_axes_from_extent(
            "stopping_criteria",
            "stopping_criteria_axes_2",
            Extent::unset(),
            AxesOptions::default()
                .with_axis_positions(None, Some(1.0))
                .with_axis_names("iteration", "threshold (purple) value"),
        )?;
        stopping.new_dataset("stopping_criteria", "stopping_criteria_axes", "fabs_record")?;
        stopping.new_dataset("stopping_criteria", "stopping_criteria_axes", "rms_record")?;
        stopping.new_dataset(
            "stopping_criteria",
            "stopping_criteria_axes_2",
            "threshold_record",
        )?;

        let mut residual = histogram_figure(
            make_surface(),
            "residual_histogram",
            "residual_histogram_data_area",
            "residual_histogram_axes",
            "residual_histogram_data",
            "Histogram of Residual at current Iteration",
            "value (vertical line is the current step's threshold value)",
        )?;
        residual.add_dataset(
            "residual_histogram",
            "residual_histogram_axes",
            DataStore::ring("threshold_line_data", 1),
        )?;
        residual.set_artist(
            "residual_histogram",
            "threshold_line_data",
            Box::new(VlineArtist::new()),
        )?;

        let components = histogram_figure(
            make_surface(),
            "component_histogram",
            "component_data_area",
            "component_axes",
            "component_data",
            "Histogram of Components at current Iteration",
            "value",
        )?;
        let selected = histogram_figure(
            make_surface(),
            "selected_pixels_histogram",
            "sp_data_area",
            "sp_axes",
            "selected_pixels_data",
            "Histogram of selected pixels at current Iteration",
            "value",
        )?;
        let convolved = histogram_figure(
            make_surface(),
            "current_convolved_histogram",
            "cc_data_area",
            "cc_axes",
            "current_convolved_data",
            "Histogram of the selected pixels convolved with the PSF",
            "value",
        )?;

        Ok(Self {
            stopping,
            residual,
            components,
            selected,
            convolved,
        })
    }

    /// The stopping-criteria figure.
    pub fn stopping_figure(&self) -> &Figure<S> {
        &self.stopping
    }

    /// The residual-histogram figure.
    pub fn residual_figure(&self) -> &Figure<S> {
        &self.residual
    }

    /// The component-histogram figure.
    pub fn components_figure(&self) -> &Figure<S> {
        &self.components
    }

    /// The selected-pixels-histogram figure.
    pub fn selected_figure(&self) -> &Figure<S> {
        &self.selected
    }

    /// The convolved-model-histogram figure.
    pub fn convolved_figure(&self) -> &Figure<S> {
        &self.convolved
    }

    /// Route one iteration's data into the figures.
    ///
    /// The stopping series grow by one point each; the histogram datasets
    /// and the threshold marker are replaced wholesale.
    pub fn record_iteration(
        &mut self,
        sample: &IterationSample,
        arrays: &IterationArrays<'_>,
    ) -> Result<(), ChartError> {
        let iter = sample.iteration as f64;
        self.stopping.append_to_dataset(
            "stopping_criteria",
            "fabs_record",
            Point::new(iter, sample.fabs_frac),
        )?;
        self.stopping.append_to_dataset(
            "stopping_criteria",
            "rms_record",
            Point::new(iter, sample.rms_frac),
        )?;
        self.stopping.append_to_dataset(
            "stopping_criteria",
            "threshold_record",
            Point::new(iter, sample.threshold),
        )?;

        self.residual.replace_dataset(
            "residual_histogram",
            "residual_histogram_data",
            histogram(arrays.residual, HISTOGRAM_BINS),
        )?;
        self.residual.replace_dataset(
            "residual_histogram",
            "threshold_line_data",
            vec![Point::new(sample.threshold, 0.0)],
        )?;
        self.components.replace_dataset(
            "component_histogram",
            "component_data",
            histogram(arrays.components, HISTOGRAM_BINS),
        )?;
        self.selected.replace_dataset(
            "selected_pixels_histogram",
            "selected_pixels_data",
            histogram(arrays.selected_pixels, HISTOGRAM_BINS),
        )?;
        self.convolved.replace_dataset(
            "current_convolved_histogram",
            "current_convolved_data",
            histogram(arrays.current_convolved, HISTOGRAM_BINS),
        )?;
        Ok(())
    }

    /// Reset every figure ahead of a new run.
    pub fn clear_all(&mut self) -> Result<(), ChartError> {
        self.stopping.clear_all()?;
        self.residual.clear_all()?;
        self.components.clear_all()?;
        self.selected.clear_all()?;
        self.convolved.clear_all()?;
        Ok(())
    }
}

impl<S: VectorSurface> IterationSink for ProgressCharts<S> {
    fn on_iteration(&mut self, sample: &IterationSample, arrays: &IterationArrays<'_>) {
        // The wiring is fixed at construction, so routing cannot fail for
        // well-formed input; a failure here only costs one update.
        if let Err(err) = self.record_iteration(sample, arrays) {
            warn!(%err, iteration = sample.iteration, "dropping progress update");
        }
    }
}

fn histogram_figure<S: VectorSurface>(
    surface: S,
    plot: &str,
    area: &str,
    axes: &str,
    dataset: &str,
    title: &str,
    x_axis_name: &str,
) -> Result<Figure<S>, ChartError> {
    let mut figure = Figure::with_config(surface, FigureConfig::default().with_title(title));
    figure.add_plot_area_from_rect(plot, Rect::new(0.05, 0.05, 0.9, 0.9))?;
    figure.add_data_area_from_rect(plot, area, Rect::new(0.1, 0.1, 0.8, 0.8))?;
    figure.add_axes_from_extent(
        plot,
        axes,
        Extent::unset(),
        AxesOptions::default()
            .with_axis_names(x_axis_name, "count")
            .with_nonlinear(NonlinearScale::pseudo_log()),
    )?;
    figure.new_dataset(plot, axes, dataset)?;
    figure.set_artist(plot, dataset, Box::new(StepArtist::new()))?;
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VectorScene;

    fn charts() -> ProgressCharts<VectorScene> {
        ProgressCharts::new(VectorScene::new).unwrap()
    }

    fn sample(iteration: usize) -> IterationSample {
        IterationSample {
            iteration,
            fabs_frac: 1.0 / (iteration + 1) as f64,
            rms_frac: 0.8 / (iteration + 1) as f64,
            threshold: 0.5,
        }
    }

    fn arrays(data: &[f64]) -> IterationArrays<'_> {
        IterationArrays {
            residual: data,
            components: data,
            selected_pixels: data,
            current_convolved: data,
        }
    }

    #[test]
    fn histogram_counts_every_finite_sample() {
        let samples = [0.0, 1.0, 2.0, 3.0, f64::NAN];
        let points = histogram(&samples, 8);
        assert_eq!(points.len(), 8);
        let total: f64 = points.iter().map(|p| p.y).sum();
        assert_eq!(total, 4.0);
        // Edges pad half an average spacing beyond the data.
        assert!(points[0].x < 0.0);
        assert!(points[7].x > 3.0);
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn histogram_of_identical_values_lands_in_one_bin() {
        let points = histogram(&[5.0; 3], 10);
        assert_eq!(points.len(), 10);
        assert!(points.iter().all(|p| p.x.is_finite()));
        let total: f64 = points.iter().map(|p| p.y).sum();
        assert_eq!(total, 3.0);
        assert_eq!(points.iter().filter(|p| p.y > 0.0).count(), 1);
    }

    #[test]
    fn histogram_of_nothing_is_empty() {
        assert!(histogram(&[], 100).is_empty());
        assert!(histogram(&[1.0, 2.0], 0).is_empty());
        assert!(histogram(&[f64::INFINITY], 100).is_empty());
    }

    #[test]
    fn stopping_series_grow_one_point_per_iteration() {
        let mut charts = charts();
        let data = [0.0, 0.5, 1.0, 2.0];
        charts.on_iteration(&sample(0), &arrays(&data));
        charts.on_iteration(&sample(1), &arrays(&data));
        let plot = charts.stopping_figure().plot_area("stopping_criteria").unwrap();
        assert_eq!(plot.dataset("fabs_record").unwrap().len(), 2);
        assert_eq!(plot.dataset("rms_record").unwrap().len(), 2);
        assert_eq!(plot.dataset("threshold_record").unwrap().len(), 2);
    }

    #[test]
    fn histograms_are_replaced_not_appended() {
        let mut charts = charts();
        let data = [0.0, 0.5, 1.0, 2.0];
        charts.on_iteration(&sample(0), &arrays(&data));
        charts.on_iteration(&sample(1), &arrays(&data));
        let plot = charts
            .residual_figure()
            .plot_area("residual_histogram")
            .unwrap();
        assert_eq!(
            plot.dataset("residual_histogram_data").unwrap().len(),
            HISTOGRAM_BINS
        );
        // Capacity-1 ring keeps a single threshold marker.
        assert_eq!(plot.dataset("threshold_line_data").unwrap().len(), 1);
        let plot = charts
            .components_figure()
            .plot_area("component_histogram")
            .unwrap();
        assert_eq!(plot.dataset("component_data").unwrap().len(), HISTOGRAM_BINS);
    }

    #[test]
    fn un_normalized_sample_values_chart_cleanly() {
        let mut charts = charts();
        // A sky level around 1000 puts every bin edge far from zero.
        let data: Vec<f64> = (0..300).map(|i| 1000.0 + i as f64).collect();
        charts.on_iteration(&sample(0), &arrays(&data));
        let plot = charts
            .residual_figure()
            .plot_area("residual_histogram")
            .unwrap();
        assert_eq!(
            plot.dataset("residual_histogram_data").unwrap().len(),
            HISTOGRAM_BINS
        );
        let extent = plot.axes("residual_histogram_axes").unwrap().extent();
        assert!(extent.is_finite());
        assert!(extent.x.min < 1000.0 && extent.x.max > 1299.0);
    }

    #[test]
    fn both_stopping_axes_track_the_iteration_count() {
        let mut charts = charts();
        let data = [0.0, 1.0];
        for i in 0..3 {
            charts.on_iteration(&sample(i), &arrays(&data));
        }
        let plot = charts.stopping_figure().plot_area("stopping_criteria").unwrap();
        let left = plot.axes("stopping_criteria_axes").unwrap().extent();
        let right = plot.axes("stopping_criteria_axes_2").unwrap().extent();
        assert!(left.x.max >= 2.0);
        assert!(right.x.max >= 2.0);
        // The threshold series never moved, so the right y extent stays tight.
        assert!(right.y.min <= 0.5 && 0.5 <= right.y.max);
    }

    #[test]
    fn clear_all_empties_every_figure() {
        let mut charts = charts();
        let data = [0.0, 0.5, 1.0];
        charts.on_iteration(&sample(0), &arrays(&data));
        charts.clear_all().unwrap();
        let plot = charts.stopping_figure().plot_area("stopping_criteria").unwrap();
        assert!(plot.dataset("fabs_record").unwrap().is_empty());
        let plot = charts
            .selected_figure()
            .plot_area("selected_pixels_histogram")
            .unwrap();
        assert!(plot.dataset("selected_pixels_data").unwrap().is_empty());
        // Recording resumes cleanly after a reset.
        charts.on_iteration(&sample(0), &arrays(&data));
        let plot = charts.stopping_figure().plot_area("stopping_criteria").unwrap();
        assert_eq!(plot.dataset("fabs_record").unwrap().len(), 1);
    }
}
