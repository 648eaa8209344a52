//! Plot lead zone data for a task using a plotting backend
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::pipeline::TaskReport;
use crate::zone::weight_curve;
use crate::Error;
mod tui;
pub use self::tui::TerminalPlotter;

/// How the points of a series are joined when drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeriesStyle {
    Line,
    Points,
}

/// A vector of (x, y) coordinate pairs and a name
#[derive(Debug)]
pub struct DataSeries<'a> {
    name: &'a str,
    data: &'a [(f64, f64)],
    style: SeriesStyle,
}

impl<'a> DataSeries<'a> {
    pub fn new(name: &'a str, data: &'a [(f64, f64)]) -> Self {
        DataSeries {
            name,
            data,
            style: SeriesStyle::Line,
        }
    }

    /// Series of unconnected markers
    pub fn points(name: &'a str, data: &'a [(f64, f64)]) -> Self {
        DataSeries {
            name,
            data,
            style: SeriesStyle::Points,
        }
    }

    pub fn style(&self) -> SeriesStyle {
        self.style
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn data(&self) -> &'a [(f64, f64)] {
        self.data
    }
}

impl<'a> IntoIterator for &DataSeries<'a> {
    type Item = (f64, f64);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (f64, f64)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter().copied()
    }
}

/// Defines the labels and data series of one plot
#[derive(Debug)]
pub struct Plot<'a> {
    title: String,
    x_axis: String,
    y_axis: String,
    series: Vec<DataSeries<'a>>,
}

impl<'a> Plot<'a> {
    pub fn new(title: String, x_axis: String, y_axis: String) -> Self {
        Plot {
            series: Vec::new(),
            x_axis,
            y_axis,
            title,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x(&self) -> &str {
        &self.x_axis
    }

    pub fn y(&self) -> &str {
        &self.y_axis
    }

    pub fn series(&self) -> &[DataSeries<'a>] {
        &self.series
    }

    pub fn add_series(&mut self, data: DataSeries<'a>) {
        self.series.push(data);
    }
}

/// trait that defines how to plot a set of data series
pub trait DataPlottingService {
    /// Draw a plot of data to display to the user
    fn plot(&self, plots: &[&Plot]) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

pub fn new_plotting_visualization_handler(
    config: &ServiceConfig,
) -> Result<Box<dyn DataPlottingService>, Error> {
    match config.handler() {
        "tui" => Ok(Box::new(TerminalPlotter::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no plotting visualization handler exists for: {}",
            config.handler()
        ))),
    }
}

/// Series needed to draw the weight curve of a task with its lead zone
#[derive(Debug)]
pub struct LeadZoneSeries {
    pub weights: Vec<(f64, f64)>,
    /// vertical lines at the zone bounds
    pub zone_start: Vec<(f64, f64)>,
    pub zone_end: Vec<(f64, f64)>,
    /// turnpoints placed on the x axis at their cumulative distance
    pub turnpoints: Vec<(f64, f64)>,
}

impl LeadZoneSeries {
    pub fn from_report(report: &TaskReport, samples: usize) -> Result<Self, Error> {
        let weights = weight_curve(report.total_distance, samples)?;
        let peak = weights.iter().map(|(_, w)| *w).fold(0.0, f64::max);
        let vertical = |x: f64| vec![(x, 0.0), (x, peak)];
        Ok(LeadZoneSeries {
            zone_start: vertical(report.zone.start_km),
            zone_end: vertical(report.zone.end_km),
            turnpoints: report
                .cumulative_distances()
                .into_iter()
                .map(|x| (x, 0.0))
                .collect(),
            weights,
        })
    }

    pub fn plot(&self, title: String) -> Plot<'_> {
        let mut plot = Plot::new(title, "Distance [km]".to_string(), "Weight".to_string());
        plot.add_series(DataSeries::new("weight", &self.weights));
        plot.add_series(DataSeries::new("zone start", &self.zone_start));
        plot.add_series(DataSeries::new("zone end", &self.zone_end));
        plot.add_series(DataSeries::points("turnpoints", &self.turnpoints));
        plot
    }
}
