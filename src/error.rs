//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    /// The upstream QR decoder (or file reader) produced no payload
    NoQrDetected,
    /// Payload is neither GPX with route/waypoints nor a task JSON document
    UnrecognizedFormat,
    /// Format was recognized but a required field is missing or invalid
    MalformedTask(String),
    /// Fewer than two usable turnpoints, carries the number of distinct locations found
    InsufficientPoints(usize),
    InvalidParameter(String),
    InvalidConfigurationValue(String),
    UnknownServiceHandler(String),
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Other(String),
}

impl Error {
    /// True for the four outcomes a task upload can be rejected with
    pub fn is_task_failure(&self) -> bool {
        matches!(
            self,
            Error::NoQrDetected
                | Error::UnrecognizedFormat
                | Error::MalformedTask(_)
                | Error::InsufficientPoints(_)
        )
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl convert::From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Error {
        Error::MalformedTask(format!("invalid GPX document: {}", err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoQrDetected => write!(f, "No QR code detected"),
            Error::UnrecognizedFormat => write!(
                f,
                "Payload does not contain GPX route/waypoint data or a task definition"
            ),
            Error::MalformedTask(msg) => write!(f, "Failed to parse task: {}", msg),
            Error::InsufficientPoints(count) => write!(
                f,
                "Task needs at least 2 usable turnpoints, found {}",
                count
            ),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Yaml(e) => write!(f, "{}", e),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}
