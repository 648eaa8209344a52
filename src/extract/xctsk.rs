//! Read XCTrack task JSON (xctsk) documents
use super::{TaskExtractor, GPX_MARKER};
use crate::gps::{Turnpoint, TurnpointKind};
use crate::task::TaskSource;
use crate::Error;
use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct XcTask {
    turnpoints: Vec<XcTurnpoint>,
}

#[derive(Debug, Deserialize)]
struct XcTurnpoint {
    waypoint: XcWaypoint,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XcWaypoint {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    alt_smoothed: Option<f64>,
    #[serde(default)]
    description: Option<String>,
}

impl XcTurnpoint {
    fn into_turnpoint(self, index: usize) -> Result<Turnpoint, Error> {
        let wp = self.waypoint;
        let mut turnpoint = Turnpoint::new(wp.name.as_deref().unwrap_or(""), wp.lat, wp.lon)?;
        turnpoint.set_kind(match self.kind.as_deref() {
            None => None,
            Some("TAKEOFF") => Some(TurnpointKind::Takeoff),
            Some("SSS") => Some(TurnpointKind::Sss),
            Some("ESS") => Some(TurnpointKind::Ess),
            Some(other) => {
                warn!("Ignoring unknown type {:?} on turnpoint {}", other, index + 1);
                None
            }
        });
        turnpoint.set_radius(self.radius);
        turnpoint.set_altitude(wp.alt_smoothed);
        turnpoint.set_description(wp.description.filter(|d| !d.trim().is_empty()));
        Ok(turnpoint)
    }
}

/// Task JSON with a `turnpoints` array of `{"waypoint": {"lat", "lon", "name"}}` objects
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskJsonExtractor;

impl TaskExtractor for TaskJsonExtractor {
    fn source(&self) -> TaskSource {
        TaskSource::TaskJson
    }

    fn matches(&self, payload: &str) -> bool {
        if payload.contains(GPX_MARKER) {
            return false;
        }
        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(value) => value.is_object(),
            Err(e) => {
                debug!("Payload is not JSON: {}", e);
                false
            }
        }
    }

    fn extract(&self, payload: &str) -> Result<Vec<Turnpoint>, Error> {
        let task: XcTask =
            serde_json::from_str(payload).map_err(|e| Error::MalformedTask(e.to_string()))?;
        debug!("Parsed {} turnpoints from task JSON", task.turnpoints.len());
        task.turnpoints
            .into_iter()
            .enumerate()
            .map(|(i, tp)| tp.into_turnpoint(i))
            .collect()
    }
}
