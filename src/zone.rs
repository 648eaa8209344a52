//! Locate the leading points zone of a task
//!
//! Two independent policies exist. The curve based zone samples a weighting function over the task
//! distance and keeps the range where the weight is close to its maximum. The fixed fraction zone
//! is a plain proportion of the task distance. Which one applies depends on where the task came
//! from, see [`ZoneStrategy::for_source`].
use crate::task::TaskSource;
use crate::Error;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suppresses weight right after the start, `r` is the relative position in [0, 1]
pub fn rising(r: f64) -> f64 {
    (1.0 - 10f64.powf(-9.0 * r)).powi(5)
}

/// Suppresses weight close to goal
pub fn falling(r: f64) -> f64 {
    (1.0 - 10f64.powf(-3.0 * (1.0 - r))).powi(2)
}

/// Leading weight at relative position `r`
pub fn weight(r: f64) -> f64 {
    rising(r) * falling(r)
}

/// Distance range where leading is rewarded the most
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LeadZone {
    pub start_km: f64,
    pub end_km: f64,
}

impl LeadZone {
    pub fn length_km(&self) -> f64 {
        self.end_km - self.start_km
    }
}

impl fmt::Display for LeadZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km - {:.2} km", self.start_km, self.end_km)
    }
}

/// Tunables of both zone policies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneParameters {
    /// uniform samples taken over [0, D], both ends included
    pub samples: usize,
    /// fraction of the maximum weight a sample needs to be part of the zone
    pub threshold_ratio: f64,
    pub fixed_start_fraction: f64,
    pub fixed_end_fraction: f64,
}

impl Default for ZoneParameters {
    fn default() -> Self {
        ZoneParameters {
            samples: 1000,
            threshold_ratio: 0.98,
            fixed_start_fraction: 0.2,
            fixed_end_fraction: 0.6,
        }
    }
}

impl ZoneParameters {
    pub fn validate(&self) -> Result<(), Error> {
        if self.samples < 2 {
            return Err(Error::InvalidParameter(format!(
                "lead_zone.samples must be at least 2, got {}",
                self.samples
            )));
        }
        check_threshold(self.threshold_ratio)?;
        let (start, end) = (self.fixed_start_fraction, self.fixed_end_fraction);
        if !(0.0 <= start && start <= end && end <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "lead_zone fixed fractions must satisfy 0 <= start <= end <= 1, got {} and {}",
                start, end
            )));
        }
        Ok(())
    }
}

/// Policy used to place the lead zone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStrategy {
    CurveBased,
    FixedFraction,
}

impl ZoneStrategy {
    /// Task JSON uses the fixed fraction rule, GPX sources use the weighting curve
    pub fn for_source(source: TaskSource) -> Self {
        match source {
            TaskSource::TaskJson => ZoneStrategy::FixedFraction,
            TaskSource::GpxRoute | TaskSource::GpxWaypoints => ZoneStrategy::CurveBased,
        }
    }

    pub fn evaluate(&self, total_km: f64, params: &ZoneParameters) -> Result<LeadZone, Error> {
        match self {
            ZoneStrategy::CurveBased => {
                curve_based_zone(total_km, params.samples, params.threshold_ratio)
            }
            ZoneStrategy::FixedFraction => fixed_fraction_zone(
                total_km,
                params.fixed_start_fraction,
                params.fixed_end_fraction,
            ),
        }
    }
}

impl fmt::Display for ZoneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneStrategy::CurveBased => write!(f, "curve based"),
            ZoneStrategy::FixedFraction => write!(f, "fixed fraction"),
        }
    }
}

fn check_distance(total_km: f64) -> Result<(), Error> {
    if total_km.is_finite() && total_km > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "task distance must be positive, got {}",
            total_km
        )))
    }
}

fn check_threshold(threshold_ratio: f64) -> Result<(), Error> {
    if threshold_ratio > 0.0 && threshold_ratio <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "lead_zone.threshold_ratio must be in (0, 1], got {}",
            threshold_ratio
        )))
    }
}

/// Sample the weighting function at `samples` evenly spaced distances in [0, D]
pub fn weight_curve(total_km: f64, samples: usize) -> Result<Vec<(f64, f64)>, Error> {
    check_distance(total_km)?;
    if samples < 2 {
        return Err(Error::InvalidParameter(format!(
            "at least 2 samples are required, got {}",
            samples
        )));
    }
    let step = total_km / (samples - 1) as f64;
    Ok((0..samples)
        .map(|i| {
            // pin the last sample to D so it isn't lost to rounding
            let x = if i == samples - 1 {
                total_km
            } else {
                i as f64 * step
            };
            (x, weight(x / total_km))
        })
        .collect())
}

/// Zone where the sampled weight is at least `threshold_ratio` of its maximum.
///
/// Reports the smallest and largest qualifying sample, samples in between are not required to
/// qualify as well.
pub fn curve_based_zone(
    total_km: f64,
    samples: usize,
    threshold_ratio: f64,
) -> Result<LeadZone, Error> {
    check_threshold(threshold_ratio)?;
    let curve = weight_curve(total_km, samples)?;
    let w_max = curve.iter().map(|(_, w)| *w).fold(0.0, f64::max);
    let threshold = threshold_ratio * w_max;

    let mut qualifying = curve.iter().filter(|(_, w)| *w >= threshold).map(|(x, _)| *x);
    let first = qualifying.next().unwrap_or(0.0);
    let (start_km, end_km) = qualifying.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
    debug!(
        "Curve zone for {:.3} km: max weight {:.4}, zone {:.3}-{:.3} km",
        total_km, w_max, start_km, end_km
    );
    Ok(LeadZone { start_km, end_km })
}

/// Zone spanning fixed fractions of the task distance
pub fn fixed_fraction_zone(
    total_km: f64,
    start_fraction: f64,
    end_fraction: f64,
) -> Result<LeadZone, Error> {
    check_distance(total_km)?;
    Ok(LeadZone {
        start_km: start_fraction * total_km,
        end_km: end_fraction * total_km,
    })
}
