//! Define the application's command line interface
use crate::config::Config;
use crate::Error;
use simplelog::LevelFilter;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

mod analyze;
use analyze::{analyze_command, AnalyzeOpts};
mod plot;
use plot::{plot_command, PlotOpts};
mod weights;
use weights::{weights_command, WeightsOpts};

/// Compute task distance and the leading points zone of competition tasks
#[derive(Debug, StructOpt)]
#[structopt(name = "lead-zone")]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Configuration file to use instead of the default location
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Command to run
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Load the config file given on the command line or the one in the default location
    pub fn load_config(&self) -> Result<Config, Error> {
        match &self.config {
            Some(path) => Config::load_path(path, true),
            None => match crate::config_file() {
                Some(path) => Config::load_path(&path, false),
                None => Ok(Config::default()),
            },
        }
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Compute segment distances and the lead zone of task files
    #[structopt(name = "analyze")]
    Analyze(AnalyzeOpts),
    /// Draw the weighting curve and lead zone of a task in the terminal
    #[structopt(name = "plot")]
    Plot(PlotOpts),
    /// Show both lead zone policies for a given task distance
    #[structopt(name = "weights")]
    Weights(WeightsOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Analyze(opts) => analyze_command(config, opts),
            Command::Plot(opts) => plot_command(config, opts),
            Command::Weights(opts) => weights_command(config, opts),
        }
    }
}

/// Read a payload from a file, "-" reads standard input
fn read_payload(path: &Path) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    if path == Path::new("-") {
        io::stdin().read_to_end(&mut buf)?;
    } else {
        File::open(path)?.read_to_end(&mut buf)?;
    }
    Ok(buf)
}
