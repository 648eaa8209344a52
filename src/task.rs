//! Competition task made of ordered turnpoints
use crate::gps::Turnpoint;
use crate::Error;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Which encoding a task was extracted from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    /// `rtept` elements of a GPX document
    GpxRoute,
    /// `wpt` elements of a GPX document
    GpxWaypoints,
    /// XCTrack style task JSON (xctsk)
    TaskJson,
}

impl fmt::Display for TaskSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSource::GpxRoute => write!(f, "GPX route"),
            TaskSource::GpxWaypoints => write!(f, "GPX waypoints"),
            TaskSource::TaskJson => write!(f, "task JSON"),
        }
    }
}

/// Turnpoints in race order, always at least two of them
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Task {
    source: TaskSource,
    turnpoints: Vec<Turnpoint>,
}

impl Task {
    pub fn new(source: TaskSource, turnpoints: Vec<Turnpoint>) -> Result<Self, Error> {
        if turnpoints.len() < 2 {
            return Err(Error::InsufficientPoints(turnpoints.len()));
        }
        Ok(Task { source, turnpoints })
    }

    pub fn source(&self) -> TaskSource {
        self.source
    }

    pub fn turnpoints(&self) -> &[Turnpoint] {
        &self.turnpoints
    }
}

impl Deref for Task {
    type Target = [Turnpoint];

    fn deref(&self) -> &Self::Target {
        &self.turnpoints
    }
}
