//! Run a raw task payload through extraction, distance and lead zone computation
use crate::distance::{cumulative_km, task_distances};
use crate::extract::{default_extractors, extract_task, TaskExtractor};
use crate::task::Task;
use crate::zone::{LeadZone, ZoneParameters, ZoneStrategy};
use crate::Error;
use log::{debug, info, trace};
use serde::Serialize;

/// Everything a renderer needs to display a processed task
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskReport {
    pub task: Task,
    pub segments: Vec<f64>,
    pub total_distance: f64,
    pub zone: LeadZone,
    pub zone_strategy: ZoneStrategy,
}

impl TaskReport {
    /// Distance flown when reaching each turnpoint, starting at 0
    pub fn cumulative_distances(&self) -> Vec<f64> {
        cumulative_km(&self.segments)
    }
}

/// Stateless processing pipeline, a single instance can serve any number of payloads
pub struct TaskPipeline {
    extractors: Vec<Box<dyn TaskExtractor>>,
    params: ZoneParameters,
}

impl TaskPipeline {
    /// Create a pipeline with the default extractors
    pub fn new(params: ZoneParameters) -> Result<Self, Error> {
        Self::with_extractors(default_extractors(), params)
    }

    /// Create a pipeline consulting `extractors` in the given order
    pub fn with_extractors(
        extractors: Vec<Box<dyn TaskExtractor>>,
        params: ZoneParameters,
    ) -> Result<Self, Error> {
        params.validate()?;
        Ok(TaskPipeline { extractors, params })
    }

    pub fn parameters(&self) -> &ZoneParameters {
        &self.params
    }

    /// Process one decoded payload, `None` or a blank string means nothing was decoded.
    ///
    /// A leading byte order mark is ignored.
    pub fn process(&self, payload: Option<&str>) -> Result<TaskReport, Error> {
        let payload = match payload.map(|p| p.trim_start_matches('\u{feff}').trim()) {
            Some(p) if !p.is_empty() => p,
            _ => return Err(Error::NoQrDetected),
        };
        trace!("Processing payload of {} bytes", payload.len());

        let task = extract_task(&self.extractors, payload)?;
        info!("Parsed {} turnpoints from {}", task.len(), task.source());

        let distances = task_distances(&task);
        debug!(
            "Task distance {:.3} km over {} segments",
            distances.total(),
            distances.segments().len()
        );
        // all turnpoints coincide, which leaves a single distinct location
        if distances.total() <= 0.0 {
            return Err(Error::InsufficientPoints(1));
        }

        let zone_strategy = ZoneStrategy::for_source(task.source());
        let zone = zone_strategy.evaluate(distances.total(), &self.params)?;
        info!("Lead zone ({}): {}", zone_strategy, zone);

        let (segments, total_distance) = distances.into_parts();
        Ok(TaskReport {
            task,
            segments,
            total_distance,
            zone,
            zone_strategy,
        })
    }

    /// Process raw bytes from a file or decoder, they must be valid UTF-8
    pub fn process_bytes(&self, payload: &[u8]) -> Result<TaskReport, Error> {
        match std::str::from_utf8(payload) {
            Ok(text) => self.process(Some(text)),
            Err(e) => {
                debug!("Payload is not valid UTF-8: {}", e);
                Err(Error::UnrecognizedFormat)
            }
        }
    }
}

impl Default for TaskPipeline {
    fn default() -> Self {
        TaskPipeline {
            extractors: default_extractors(),
            params: ZoneParameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::geodesic_km;
    use crate::gps::Turnpoint;
    use crate::task::TaskSource;

    static GPX_ROUTE: &str = r#"<gpx><rtept lat="46.0" lon="8.0"><name>A</name></rtept><rtept lat="46.1" lon="8.1"><name>B</name></rtept></gpx>"#;
    static TASK_JSON: &str = r#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0,"name":"A"}},{"waypoint":{"lat":46.1,"lon":8.1,"name":"B"}}]}"#;

    fn expected_km() -> f64 {
        geodesic_km(
            &Turnpoint::new("A", 46.0, 8.0).unwrap(),
            &Turnpoint::new("B", 46.1, 8.1).unwrap(),
        )
    }

    #[test]
    fn gpx_route_uses_curve_zone() {
        let report = TaskPipeline::default().process(Some(GPX_ROUTE)).unwrap();
        assert_eq!(report.task.source(), TaskSource::GpxRoute);
        assert_eq!(report.zone_strategy, ZoneStrategy::CurveBased);
        assert_eq!(report.segments.len(), 1);
        assert!((report.total_distance - expected_km()).abs() < 1e-6);
        assert!(report.zone.start_km > 0.0);
        assert!(report.zone.end_km < report.total_distance);
    }

    #[test]
    fn task_json_uses_fixed_zone() {
        let report = TaskPipeline::default().process(Some(TASK_JSON)).unwrap();
        assert_eq!(report.zone_strategy, ZoneStrategy::FixedFraction);
        let d = report.total_distance;
        assert!((d - expected_km()).abs() < 1e-6);
        assert!((report.zone.start_km - 0.2 * d).abs() < 1e-9);
        assert!((report.zone.end_km - 0.6 * d).abs() < 1e-9);
        assert_eq!(report.task[0].name(), "A");
        assert_eq!(report.task[1].name(), "B");
    }

    #[test]
    fn missing_payload_is_no_qr() {
        let pipeline = TaskPipeline::default();
        assert!(matches!(pipeline.process(None), Err(Error::NoQrDetected)));
        assert!(matches!(pipeline.process(Some("")), Err(Error::NoQrDetected)));
        assert!(matches!(pipeline.process(Some(" \n")), Err(Error::NoQrDetected)));
        assert!(matches!(pipeline.process_bytes(b""), Err(Error::NoQrDetected)));
    }

    #[test]
    fn failures_are_typed() {
        let pipeline = TaskPipeline::default();
        assert!(matches!(
            pipeline.process(Some("https://example.com")),
            Err(Error::UnrecognizedFormat)
        ));
        assert!(matches!(
            pipeline.process(Some(r#"{"turnpoints":[{"radius":1}]}"#)),
            Err(Error::MalformedTask(_))
        ));
        assert!(matches!(
            pipeline.process(Some(r#"<gpx><wpt lat="46.0" lon="8.0"/></gpx>"#)),
            Err(Error::InsufficientPoints(1))
        ));
        assert!(matches!(
            pipeline.process(Some(r#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0}}]}"#)),
            Err(Error::InsufficientPoints(1))
        ));
        assert!(matches!(
            pipeline.process_bytes(&[0xff, 0xfe, 0x00]),
            Err(Error::UnrecognizedFormat)
        ));
    }

    #[test]
    fn coincident_task_is_insufficient() {
        let payload = r#"<gpx><rtept lat="46.0" lon="8.0"/><rtept lat="46.0" lon="8.0"/><rtept lat="46.0" lon="8.0"/></gpx>"#;
        assert!(matches!(
            TaskPipeline::default().process(Some(payload)),
            Err(Error::InsufficientPoints(1))
        ));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let pipeline = TaskPipeline::default();
        let json = format!("\u{feff}{}", TASK_JSON);
        let report = pipeline.process_bytes(json.as_bytes()).unwrap();
        assert_eq!(report.zone_strategy, ZoneStrategy::FixedFraction);
        assert!((report.total_distance - expected_km()).abs() < 1e-6);

        let gpx = format!("\u{feff}{}", GPX_ROUTE);
        let report = pipeline.process(Some(&gpx)).unwrap();
        assert_eq!(report.zone_strategy, ZoneStrategy::CurveBased);

        assert!(matches!(
            pipeline.process_bytes("\u{feff}\n".as_bytes()),
            Err(Error::NoQrDetected)
        ));
    }

    #[test]
    fn truncated_gpx_is_unrecognized() {
        let truncated = r#"<gpx><rte><rtept lat="46.0" lon="8.0"/><rtept lat="46.1" lon="8.1"/>"#;
        assert!(matches!(
            TaskPipeline::default().process(Some(truncated)),
            Err(Error::UnrecognizedFormat)
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let pipeline = TaskPipeline::default();
        let first = pipeline.process(Some(GPX_ROUTE)).unwrap();
        let second = pipeline.process(Some(GPX_ROUTE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cumulative_distances_end_at_total() {
        let report = TaskPipeline::default().process(Some(GPX_ROUTE)).unwrap();
        let cum = report.cumulative_distances();
        assert_eq!(cum.len(), report.task.len());
        assert_eq!(cum[0], 0.0);
        assert!((cum[1] - report.total_distance).abs() < 1e-9);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut params = ZoneParameters::default();
        params.samples = 0;
        assert!(matches!(
            TaskPipeline::new(params),
            Err(Error::InvalidParameter(_))
        ));
    }
}
