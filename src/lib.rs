//! Compute the distance and leading points zone of paragliding competition tasks.
//!
//! A task arrives as a text payload, either decoded from an XCTrack QR code or read from a task
//! file. [`TaskPipeline`] turns it into turnpoints, measures the route and places the lead zone.
use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod distance;
mod error;
pub use error::Error;
pub mod extract;
pub mod gps;
pub mod pipeline;
pub use pipeline::{TaskPipeline, TaskReport};
pub mod services;
pub mod task;
pub use task::{Task, TaskSource};
pub mod zone;
pub use zone::{LeadZone, ZoneParameters, ZoneStrategy};

static APP_DIR_NAME: &str = "lead-zone";
static CONFIG_FILE_NAME: &str = "config.yml";

/// Directory holding the application configuration, if the platform has one
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME))
}

/// Default location of the configuration file
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}
