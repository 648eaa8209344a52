//! Module with GPS specific structures
use crate::Error;
use geo::Point;
use serde::Serialize;

/// Name used when a task file does not provide one for a turnpoint
pub static UNKNOWN_NAME: &str = "N/A";

/// Role a turnpoint plays in the race, only known for task JSON sources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnpointKind {
    Takeoff,
    Sss,
    Ess,
}

/// A named geographic checkpoint of the race route
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Turnpoint {
    name: String,
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<TurnpointKind>,
    /// cylinder radius in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    /// elevation in meters if available
    #[serde(skip_serializing_if = "Option::is_none")]
    altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Turnpoint {
    /// Create a turnpoint, validating the coordinates are finite and in range.
    ///
    /// A blank name is replaced by [`UNKNOWN_NAME`].
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::MalformedTask(format!(
                "latitude out of range: {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::MalformedTask(format!(
                "longitude out of range: {}",
                longitude
            )));
        }
        let name = name.trim();
        Ok(Turnpoint {
            name: if name.is_empty() {
                UNKNOWN_NAME.to_string()
            } else {
                name.to_string()
            },
            latitude,
            longitude,
            kind: None,
            radius: None,
            altitude: None,
            description: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn kind(&self) -> Option<TurnpointKind> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Option<TurnpointKind>) {
        self.kind = kind;
    }

    /// Return cylinder radius in meters (if defined)
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn set_radius(&mut self, radius: Option<f64>) {
        self.radius = radius;
    }

    /// Return elevation in meters (if defined)
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn set_altitude(&mut self, altitude: Option<f64>) {
        self.altitude = altitude;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Position as a geo point, x is longitude and y is latitude
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}
