//! Read route points and waypoints from GPX documents
//!
//! Elements are matched on their local name so documents using the
//! `http://www.topografix.com/GPX/1/1` namespace, a prefix, or no namespace at all are all accepted.
use super::{TaskExtractor, GPX_MARKER};
use crate::gps::Turnpoint;
use crate::task::TaskSource;
use crate::Error;
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Child elements of a point whose text we keep
#[derive(Clone, Copy, Debug, PartialEq)]
enum PointChild {
    Name,
    Elevation,
    Description,
}

impl PointChild {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"name" => Some(PointChild::Name),
            b"ele" => Some(PointChild::Elevation),
            b"desc" => Some(PointChild::Description),
            _ => None,
        }
    }
}

/// Unvalidated content of a single point element
#[derive(Debug, Default)]
struct RawPoint {
    lat: Option<String>,
    lon: Option<String>,
    name: Option<String>,
    ele: Option<String>,
    desc: Option<String>,
}

impl RawPoint {
    fn from_element(element: &BytesStart) -> Result<Self, quick_xml::Error> {
        let mut point = RawPoint::default();
        for attr in element.attributes() {
            let attr = attr?;
            match attr.key.local_name().as_ref() {
                b"lat" => point.lat = Some(attr.unescape_value()?.into_owned()),
                b"lon" => point.lon = Some(attr.unescape_value()?.into_owned()),
                _ => {}
            }
        }
        Ok(point)
    }

    fn push_text(&mut self, child: PointChild, text: &str) {
        let slot = match child {
            PointChild::Name => &mut self.name,
            PointChild::Elevation => &mut self.ele,
            PointChild::Description => &mut self.desc,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }

    /// Validate the raw strings, `tag` and `index` are only used for error messages
    fn into_turnpoint(self, tag: &str, index: usize) -> Result<Turnpoint, Error> {
        let latitude = parse_coordinate(self.lat.as_deref(), "lat", tag, index)?;
        let longitude = parse_coordinate(self.lon.as_deref(), "lon", tag, index)?;
        let mut turnpoint =
            Turnpoint::new(self.name.as_deref().unwrap_or(""), latitude, longitude)?;
        if let Some(ele) = self.ele {
            match ele.trim().parse::<f64>() {
                Ok(val) => turnpoint.set_altitude(Some(val)),
                Err(_) => warn!(
                    "Ignoring invalid elevation on {} {}: {:?}",
                    tag,
                    index + 1,
                    ele
                ),
            }
        }
        turnpoint.set_description(self.desc.filter(|d| !d.trim().is_empty()));
        Ok(turnpoint)
    }
}

fn parse_coordinate(
    value: Option<&str>,
    attr: &str,
    tag: &str,
    index: usize,
) -> Result<f64, Error> {
    let value = value.ok_or_else(|| {
        Error::MalformedTask(format!("{} {} is missing the {} attribute", tag, index + 1, attr))
    })?;
    value.trim().parse::<f64>().map_err(|_| {
        Error::MalformedTask(format!(
            "{} {} has a non-numeric {} attribute: {:?}",
            tag,
            index + 1,
            attr,
            value
        ))
    })
}

/// Collect every element with local name `tag` in document order, ignoring namespaces.
///
/// Only direct `name`, `ele` and `desc` children of a point are read.
fn find_by_local_name(payload: &str, tag: &str) -> Result<Vec<RawPoint>, Error> {
    let mut reader = Reader::from_str(payload);
    reader.trim_text(true);

    let mut points = Vec::new();
    let mut depth = 0usize;
    // open point and the depth its element was started at
    let mut current: Option<(RawPoint, usize)> = None;
    let mut child: Option<PointChild> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name();
                if local.as_ref() == tag.as_bytes() {
                    current = Some((RawPoint::from_element(&e)?, depth));
                } else if let Some((_, point_depth)) = &current {
                    if depth == *point_depth + 1 {
                        child = PointChild::from_local_name(local.as_ref());
                    }
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == tag.as_bytes() {
                    points.push(RawPoint::from_element(&e)?);
                }
            }
            Event::Text(e) => {
                if let (Some((point, _)), Some(kind)) = (current.as_mut(), child) {
                    point.push_text(kind, &e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let (Some((point, _)), Some(kind)) = (current.as_mut(), child) {
                    point.push_text(kind, &String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == tag.as_bytes() {
                    if let Some((point, _)) = current.take() {
                        points.push(point);
                    }
                }
                child = None;
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                // the reader does not report elements left open at the end of input
                if depth != 0 || current.is_some() {
                    return Err(Error::MalformedTask(format!(
                        "invalid GPX document: {} element(s) not closed",
                        depth
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(points)
}

/// True if the payload is a well formed GPX document with at least one `tag` element
fn contains_points(payload: &str, tag: &str) -> bool {
    if !payload.contains(GPX_MARKER) {
        return false;
    }
    match find_by_local_name(payload, tag) {
        Ok(points) => !points.is_empty(),
        Err(e) => {
            debug!("GPX payload could not be scanned for {}: {}", tag, e);
            false
        }
    }
}

fn read_points(payload: &str, tag: &str) -> Result<Vec<Turnpoint>, Error> {
    let raw = find_by_local_name(payload, tag)?;
    debug!("Parsed {} {} elements from GPX", raw.len(), tag);
    raw.into_iter()
        .enumerate()
        .map(|(i, point)| point.into_turnpoint(tag, i))
        .collect()
}

/// Race route given as `rtept` elements, as exported in XCTrack QR codes
#[derive(Clone, Copy, Debug, Default)]
pub struct GpxRouteExtractor;

impl TaskExtractor for GpxRouteExtractor {
    fn source(&self) -> TaskSource {
        TaskSource::GpxRoute
    }

    fn matches(&self, payload: &str) -> bool {
        contains_points(payload, "rtept")
    }

    fn extract(&self, payload: &str) -> Result<Vec<Turnpoint>, Error> {
        read_points(payload, "rtept")
    }
}

/// Generic `wpt` elements, used when a document has no route
#[derive(Clone, Copy, Debug, Default)]
pub struct GpxWaypointExtractor;

impl TaskExtractor for GpxWaypointExtractor {
    fn source(&self) -> TaskSource {
        TaskSource::GpxWaypoints
    }

    fn matches(&self, payload: &str) -> bool {
        contains_points(payload, "wpt")
    }

    fn extract(&self, payload: &str) -> Result<Vec<Turnpoint>, Error> {
        let points = read_points(payload, "wpt")?;
        if points.len() < 2 {
            return Err(Error::InsufficientPoints(points.len()));
        }
        Ok(points)
    }
}
