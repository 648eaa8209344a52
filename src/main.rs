use log::{debug, error};
use simplelog::{Config as LogConfig, TermLogger, TerminalMode};
use structopt::StructOpt;
use xc_lead_zone::cli::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();

    // logging isn't set up yet, so config errors go straight to stderr
    let config = match opt.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load configuration: {}", e);
            return Err(Box::new(e));
        }
    };
    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(level_filter, LogConfig::default(), TerminalMode::Mixed)?;
    debug!("Logging initialized at level {}", level_filter);

    // execute the subcommand
    opt.execute_subcommand(config).map_err(|e| {
        error!("{}", e);
        e
    })
}
