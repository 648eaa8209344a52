//! Define the weights subcommand
use crate::config::Config;
use crate::zone::{weight_curve, ZoneStrategy};
use crate::Error;
use structopt::StructOpt;

/// Show the lead zone both policies produce for a task distance
#[derive(Debug, StructOpt)]
pub struct WeightsOpts {
    /// Task distance in kilometers
    #[structopt(short, long)]
    distance: f64,
    /// Number of samples for the curve based zone, defaults to the configured value
    #[structopt(short, long)]
    samples: Option<usize>,
    /// Number of rows in the printed weight table
    #[structopt(short, long, default_value = "10")]
    rows: usize,
}

pub fn weights_command(
    config: Config,
    opts: WeightsOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = config.lead_zone().clone();
    if let Some(samples) = opts.samples {
        params.samples = samples;
    }
    params.validate()?;
    if opts.rows < 2 {
        return Err(Box::new(Error::InvalidParameter(
            "at least 2 table rows are required".to_string(),
        )));
    }

    for strategy in &[ZoneStrategy::CurveBased, ZoneStrategy::FixedFraction] {
        let zone = strategy.evaluate(opts.distance, &params)?;
        println!("{:>15} zone: {}", strategy.to_string(), zone);
    }

    println!("{:>10}  {:>8}", "km", "weight");
    for (x, w) in weight_curve(opts.distance, opts.rows)? {
        println!("{:10.2}  {:8.4}", x, w);
    }
    Ok(())
}
