//! Turn raw task payloads into an ordered list of turnpoints
//!
//! Each supported encoding is a [`TaskExtractor`]. Extractors are tried in a fixed priority order
//! (GPX route, GPX waypoints, task JSON) and the first one that recognizes the payload handles it.
use crate::gps::Turnpoint;
use crate::task::{Task, TaskSource};
use crate::Error;
use log::{debug, trace};

mod gpx;
pub use gpx::{GpxRouteExtractor, GpxWaypointExtractor};
mod xctsk;
pub use xctsk::TaskJsonExtractor;

/// Marker GPX producers emit, case sensitive
pub static GPX_MARKER: &str = "<gpx";

/// trait that defines how one task encoding is recognized and read
pub trait TaskExtractor {
    /// Provenance recorded on tasks this extractor produces
    fn source(&self) -> TaskSource;

    /// Return true if this extractor should handle the payload
    fn matches(&self, payload: &str) -> bool;

    /// Read turnpoints in race order, low level parse errors must be mapped into `Error`
    fn extract(&self, payload: &str) -> Result<Vec<Turnpoint>, Error>;
}

/// All extractors in the order they are consulted
pub fn default_extractors() -> Vec<Box<dyn TaskExtractor>> {
    vec![
        Box::new(GpxRouteExtractor),
        Box::new(GpxWaypointExtractor),
        Box::new(TaskJsonExtractor),
    ]
}

/// Build a task from the payload using the first matching extractor
pub fn extract_task(extractors: &[Box<dyn TaskExtractor>], payload: &str) -> Result<Task, Error> {
    for extractor in extractors {
        if !extractor.matches(payload) {
            trace!("Payload is not {}", extractor.source());
            continue;
        }
        debug!("Reading payload as {}", extractor.source());
        let turnpoints = extractor.extract(payload)?;
        return Task::new(extractor.source(), turnpoints);
    }
    Err(Error::UnrecognizedFormat)
}
