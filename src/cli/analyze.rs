//! Define the analyze subcommand
use super::read_payload;
use crate::config::Config;
use crate::pipeline::{TaskPipeline, TaskReport};
use crate::Error;
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use structopt::StructOpt;

/// Compute segment distances and the lead zone of one or more task payloads
#[derive(Debug, StructOpt)]
pub struct AnalyzeOpts {
    /// Files containing a decoded QR payload, GPX or task JSON ("-" or nothing reads stdin)
    #[structopt(name = "PATHS", parse(from_os_str))]
    paths: Vec<PathBuf>,
    /// Print the result as JSON instead of text
    #[structopt(long)]
    json: bool,
}

/// Implementation of the `analyze` subcommand
pub fn analyze_command(
    config: Config,
    opts: AnalyzeOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = TaskPipeline::new(config.lead_zone().clone())?;
    let paths = if opts.paths.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        opts.paths
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0;
    for path in &paths {
        let result = read_payload(path).and_then(|bytes| pipeline.process_bytes(&bytes));
        match result {
            Ok(report) => {
                info!("Processed task payload: {:?}", path);
                if opts.json {
                    serde_json::to_writer_pretty(&mut out, &report)?;
                    writeln!(out)?;
                } else {
                    if paths.len() > 1 {
                        writeln!(out, "{}", path.display())?;
                    }
                    write_report(&mut out, &report)?;
                }
            }
            // a single payload is a hard error, with several we report and keep going
            Err(e) if paths.len() == 1 => return Err(Box::new(e)),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(Box::new(Error::Other(format!(
            "{} of {} task payloads could not be processed",
            failures,
            paths.len()
        ))));
    }
    Ok(())
}

/// Human readable listing of a processed task
pub fn write_report<W: Write>(out: &mut W, report: &TaskReport) -> io::Result<()> {
    writeln!(
        out,
        "Parsed {} turnpoints from {}",
        report.task.len(),
        report.task.source()
    )?;
    let cumulative = report.cumulative_distances();
    for (i, tp) in report.task.iter().enumerate() {
        writeln!(
            out,
            "{:3}. {} — {:.6}, {:.6} ({:.2} km)",
            i + 1,
            tp.name(),
            tp.latitude(),
            tp.longitude(),
            cumulative[i]
        )?;
    }
    for (i, km) in report.segments.iter().enumerate() {
        writeln!(out, "     leg {:2} -> {:2}: {:8.2} km", i + 1, i + 2, km)?;
    }
    writeln!(out, "Total distance: {:.2} km", report.total_distance)?;
    writeln!(
        out,
        "Lead zone ({}): {}",
        report.zone_strategy, report.zone
    )?;
    Ok(())
}
