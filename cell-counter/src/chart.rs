use crate::{
    cell_detection::{Histogram, MassHistograms, Real},
    error::{WriteError, WriteResult},
    writer::{COARSE_HISTOGRAM_FILE, FINE_HISTOGRAM_FILE, OutputDirectory},
};
use plotters::{
    chart::{ChartBuilder, ChartContext},
    coord::{Shift, types::RangedCoordf64},
    prelude::{Cartesian2d, DrawingArea, IntoDrawingArea, Rectangle, SVGBackend},
    series::LineSeries,
    style::{BLUE, Color, IntoFont, RED, WHITE},
};
use std::{fmt::Display, path::Path};
use tracing::instrument;

const CHART_SIZE: (u32, u32) = (1280, 720);

type MyDrawingArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type MyChartContext<'a> =
    ChartContext<'a, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Clone, Copy, Debug)]
pub(crate) enum ChartStyle {
    Bar,
    Line,
}

/// Plot ranges: mass along x, bin count along y.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    mass: (Real, Real),
    count: Real,
}

impl Bounds {
    fn from_histogram(histogram: &Histogram) -> Self {
        let first = histogram.bins().first().map(|bin| bin.edge).unwrap_or_default();
        let last = histogram
            .bins()
            .last()
            .map(|bin| bin.edge + histogram.width())
            .unwrap_or_default();
        let mass = if last > first {
            (first, last)
        } else {
            (first - 0.5, first + 0.5)
        };
        Self {
            mass,
            count: (histogram.max_count() as Real * 1.1).max(1.0),
        }
    }
}

fn render_error<E: Display>(path: &Path) -> impl FnOnce(E) -> WriteError {
    move |error| WriteError::Chart {
        error: error.to_string(),
        path: path.to_owned(),
    }
}

trait MyBuilder<'a>: Sized {
    fn build_histogram_graph(
        root: &MyDrawingArea<'a>,
        title: &str,
        bounds: Bounds,
    ) -> Result<Self, String>;
    fn draw_bars(&mut self, histogram: &Histogram) -> Result<(), String>;
    fn draw_line(&mut self, histogram: &Histogram) -> Result<(), String>;
}

impl<'a> MyBuilder<'a> for MyChartContext<'a> {
    #[instrument(skip_all, level = "debug")]
    fn build_histogram_graph(
        root: &MyDrawingArea<'a>,
        title: &str,
        bounds: Bounds,
    ) -> Result<MyChartContext<'a>, String> {
        let mut chart = ChartBuilder::on(root)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .margin(10)
            .caption(title, ("sans-serif", 40.0).into_font())
            .build_cartesian_2d(bounds.mass.0..bounds.mass.1, 0.0..bounds.count)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Element mass")
            .y_desc("Count")
            .x_label_formatter(&|x| format!("{:.3e}", x))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()
            .map_err(|e| e.to_string())?;

        Ok(chart)
    }

    #[instrument(skip_all, level = "debug")]
    fn draw_bars(&mut self, histogram: &Histogram) -> Result<(), String> {
        let width = histogram.width();
        let bars = histogram.bins().iter().map(|bin| {
            Rectangle::new(
                [(bin.edge, 0.0), (bin.edge + width, bin.count as Real)],
                BLUE.mix(0.7).filled(),
            )
        });
        self.draw_series(bars).map_err(|e| e.to_string())?;
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn draw_line(&mut self, histogram: &Histogram) -> Result<(), String> {
        let half_width = histogram.width() / 2.0;
        let points = histogram
            .bins()
            .iter()
            .map(|bin| (bin.edge + half_width, bin.count as Real));
        self.draw_series(LineSeries::new(points, &RED))
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[instrument(skip_all, fields(path = %path.display()))]
pub(crate) fn save_histogram_svg(
    histogram: &Histogram,
    style: ChartStyle,
    title: &str,
    path: &Path,
) -> WriteResult<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(path))?;

    let mut chart = MyChartContext::build_histogram_graph(
        &root,
        title,
        Bounds::from_histogram(histogram),
    )
    .map_err(render_error(path))?;

    match style {
        ChartStyle::Bar => chart.draw_bars(histogram),
        ChartStyle::Line => chart.draw_line(histogram),
    }
    .map_err(render_error(path))?;

    root.present().map_err(render_error(path))?;
    Ok(())
}

/// Renders the coarse histogram as a bar chart and the fine one as a line chart.
pub(crate) fn save_mass_charts(
    directory: &OutputDirectory,
    histograms: &MassHistograms,
) -> WriteResult<()> {
    save_histogram_svg(
        &histograms.coarse,
        ChartStyle::Bar,
        "Element mass, 100 bins",
        &directory.file(&format!("{COARSE_HISTOGRAM_FILE}.svg")),
    )?;
    save_histogram_svg(
        &histograms.fine,
        ChartStyle::Line,
        "Element mass, 1000 bins",
        &directory.file(&format!("{FINE_HISTOGRAM_FILE}.svg")),
    )
}
