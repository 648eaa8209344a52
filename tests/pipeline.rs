use xc_lead_zone::distance::geodesic_km;
use xc_lead_zone::gps::Turnpoint;
use xc_lead_zone::{Error, TaskPipeline, TaskSource, ZoneParameters, ZoneStrategy};

static XCTRACK_QR_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="XCTrack" xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <rtept lat="46.1850" lon="8.7480"><name>CIMETTA</name></rtept>
    <rtept lat="46.2400" lon="8.8600"><name>B17</name></rtept>
    <rtept lat="46.1200" lon="8.9500"><name>B23</name></rtept>
    <rtept lat="46.1600" lon="8.8000"><name>GOAL</name></rtept>
  </rte>
</gpx>"#;

#[test]
fn qr_gpx_route_end_to_end() {
    let report = TaskPipeline::default()
        .process(Some(XCTRACK_QR_GPX))
        .unwrap();
    assert_eq!(report.task.source(), TaskSource::GpxRoute);
    assert_eq!(report.task.len(), 4);
    assert_eq!(report.segments.len(), 3);
    assert!(report.segments.iter().all(|d| *d > 0.0));

    let sum: f64 = report.segments.iter().sum();
    assert!((report.total_distance - sum).abs() < 1e-6);

    let names: Vec<&str> = report.task.iter().map(|tp| tp.name()).collect();
    assert_eq!(names, vec!["CIMETTA", "B17", "B23", "GOAL"]);

    assert_eq!(report.zone_strategy, ZoneStrategy::CurveBased);
    assert!(report.zone.start_km > 0.0);
    assert!(report.zone.start_km < report.zone.end_km);
    assert!(report.zone.end_km < report.total_distance);
}

#[test]
fn task_json_matches_geodesic_distance() {
    let payload = r#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0,"name":"A"}},{"waypoint":{"lat":46.1,"lon":8.1,"name":"B"}}]}"#;
    let report = TaskPipeline::default().process(Some(payload)).unwrap();
    let expected = geodesic_km(
        &Turnpoint::new("A", 46.0, 8.0).unwrap(),
        &Turnpoint::new("B", 46.1, 8.1).unwrap(),
    );
    assert!((report.total_distance - expected).abs() < 1e-6);
    assert_eq!(report.zone_strategy, ZoneStrategy::FixedFraction);
}

#[test]
fn gpx_and_json_encodings_agree_on_turnpoints() {
    let gpx = r#"<gpx><rtept lat="46.0" lon="8.0"><name>A</name></rtept><rtept lat="46.1" lon="8.1"><name>B</name></rtept></gpx>"#;
    let json = r#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0,"name":"A"}},{"waypoint":{"lat":46.1,"lon":8.1,"name":"B"}}]}"#;
    let pipeline = TaskPipeline::default();
    let from_gpx = pipeline.process(Some(gpx)).unwrap();
    let from_json = pipeline.process(Some(json)).unwrap();
    assert_eq!(from_gpx.task.turnpoints(), from_json.task.turnpoints());
    assert_eq!(from_gpx.segments, from_json.segments);
    // same route, different zone policies
    assert_ne!(from_gpx.zone, from_json.zone);
}

#[test]
fn every_failure_is_typed() {
    let pipeline = TaskPipeline::default();
    let fail = |payload: Option<&str>| {
        let err = pipeline.process(payload).unwrap_err();
        assert!(err.is_task_failure(), "{:?}", err);
        err
    };
    assert!(matches!(fail(None), Error::NoQrDetected));
    assert!(matches!(
        fail(Some("WIFI:S:club;T:WPA;P:secret;;")),
        Error::UnrecognizedFormat
    ));
    assert!(matches!(
        fail(Some(r#"{"turnpoints":[{"wp":{}}]}"#)),
        Error::MalformedTask(_)
    ));
    assert!(matches!(
        fail(Some(r#"<gpx><rtept lat="x" lon="8"/><rtept lat="1" lon="2"/></gpx>"#)),
        Error::MalformedTask(_)
    ));
    assert!(matches!(
        fail(Some(r#"<gpx><wpt lat="46.0" lon="8.0"/></gpx>"#)),
        Error::InsufficientPoints(1)
    ));
}

#[test]
fn configured_parameters_are_used() {
    let params = ZoneParameters {
        fixed_start_fraction: 0.1,
        fixed_end_fraction: 0.5,
        ..ZoneParameters::default()
    };
    let pipeline = TaskPipeline::new(params).unwrap();
    let payload = r#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0}},{"waypoint":{"lat":46.1,"lon":8.1}}]}"#;
    let report = pipeline.process(Some(payload)).unwrap();
    let d = report.total_distance;
    assert!((report.zone.start_km - 0.1 * d).abs() < 1e-9);
    assert!((report.zone.end_km - 0.5 * d).abs() < 1e-9);
}

#[test]
fn truncated_qr_payload_is_rejected() {
    let cut = XCTRACK_QR_GPX.find("<rtept lat=\"46.1200\"").unwrap();
    assert!(matches!(
        TaskPipeline::default().process(Some(&XCTRACK_QR_GPX[..cut])),
        Err(Error::UnrecognizedFormat)
    ));
}

#[test]
fn task_file_with_byte_order_mark() {
    let mut bytes = vec![0xef, 0xbb, 0xbf];
    bytes.extend_from_slice(
        br#"{"turnpoints":[{"waypoint":{"lat":46.0,"lon":8.0}},{"waypoint":{"lat":46.1,"lon":8.1}}]}"#,
    );
    let report = TaskPipeline::default().process_bytes(&bytes).unwrap();
    assert_eq!(report.task.source(), TaskSource::TaskJson);
    assert_eq!(report.task.len(), 2);
}
