//! Define the plot subcommand
use super::read_payload;
use crate::config::Config;
use crate::pipeline::TaskPipeline;
use crate::services::plotting::LeadZoneSeries;
use std::path::PathBuf;
use structopt::StructOpt;

/// Plot the weighting curve over the task with the lead zone bounds
#[derive(Debug, StructOpt)]
pub struct PlotOpts {
    /// File containing a decoded QR payload, GPX or task JSON, stdin is used if not provided
    #[structopt(name = "PATH", parse(from_os_str))]
    path: Option<PathBuf>,
    /// Number of points used to draw the curve
    #[structopt(short, long, default_value = "200")]
    samples: usize,
}

pub fn plot_command(config: Config, opts: PlotOpts) -> Result<(), Box<dyn std::error::Error>> {
    let plotter = config.get_plotting_visualization_handler()?;
    let pipeline = TaskPipeline::new(config.lead_zone().clone())?;

    let path = opts.path.unwrap_or_else(|| PathBuf::from("-"));
    let report = pipeline.process_bytes(&read_payload(&path)?)?;
    let series = LeadZoneSeries::from_report(&report, opts.samples)?;
    let title = format!(
        "{} turnpoints, {:.1} km, lead zone ({}) {}",
        report.task.len(),
        report.total_distance,
        report.zone_strategy,
        report.zone
    );
    let plot = series.plot(title);
    plotter.plot(&[&plot])?;

    Ok(())
}
