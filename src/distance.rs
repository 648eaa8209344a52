//! Geodesic distances along the task route
use crate::gps::Turnpoint;
use geo::GeodesicDistance;
use log::warn;
use serde::Serialize;

/// Per segment and total distances of a task, in kilometers
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskDistances {
    segments: Vec<f64>,
    total: f64,
}

impl TaskDistances {
    /// Distance of each leg, `segments()[i]` is from turnpoint i to i + 1
    pub fn segments(&self) -> &[f64] {
        &self.segments
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Distance flown when reaching each turnpoint, starting at 0
    pub fn cumulative(&self) -> Vec<f64> {
        cumulative_km(&self.segments)
    }

    /// Consume the distances returning the segments and the total
    pub fn into_parts(self) -> (Vec<f64>, f64) {
        (self.segments, self.total)
    }
}

/// Running sum of segment lengths with a leading 0
pub fn cumulative_km(segments: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    let mut out = Vec::with_capacity(segments.len() + 1);
    out.push(sum);
    for seg in segments {
        sum += seg;
        out.push(sum);
    }
    out
}

/// Ellipsoidal (WGS84) distance between two turnpoints in kilometers
pub fn geodesic_km(from: &Turnpoint, to: &Turnpoint) -> f64 {
    from.point().geodesic_distance(&to.point()) / 1000.0
}

/// Measure consecutive legs in race order
pub fn task_distances(turnpoints: &[Turnpoint]) -> TaskDistances {
    let segments: Vec<f64> = turnpoints
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let km = geodesic_km(&pair[0], &pair[1]);
            if km == 0.0 {
                warn!(
                    "Turnpoints {} ({}) and {} ({}) coincide",
                    i + 1,
                    pair[0].name(),
                    i + 2,
                    pair[1].name()
                );
            }
            km
        })
        .collect();
    let total = segments.iter().sum();
    TaskDistances { segments, total }
}
