//! Store application configuration that gets read from disk
use crate::services::{new_plotting_visualization_handler, DataPlottingService};
use crate::zone::ZoneParameters;
use crate::Error;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::iter::Iterator;
use std::path::Path;
use std::str::FromStr;

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    DataPlotting,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: &str) -> Self {
        ServiceConfig {
            handler: handler.to_string(),
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string());
            Some(value)
        } else {
            None
        }
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        if let Some(value) = self.configuration.get(key) {
            let value = value.as_i64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected an integer: {:?}",
                    &self.handler, key, value
                ))
            });
            Some(value)
        } else {
            None
        }
    }
}

/// Build a service instance from its configuration block
pub trait FromServiceConfig: Sized {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>;
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default)]
    lead_zone: ZoneParameters,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            lead_zone: ZoneParameters::default(),
            services: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, Error> {
        let config: Config = serde_yaml::from_reader(source)?;
        config.lead_zone.validate()?;
        Ok(config)
    }

    /// Read the config file at `path`, falling back to defaults if it doesn't exist and
    /// `required` is false
    pub fn load_path(path: &Path, required: bool) -> Result<Self, Error> {
        if !path.exists() && !required {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let mut fp = File::open(path)?;
        Self::load(&mut fp)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn lead_zone(&self) -> &ZoneParameters {
        &self.lead_zone
    }

    pub fn get_plotting_visualization_handler(
        &self,
    ) -> Result<Box<dyn DataPlottingService>, Error> {
        match self.services.get(&ServiceType::DataPlotting) {
            Some(cfg) => new_plotting_visualization_handler(cfg),
            None => {
                // use terminal as default plotter since we always have that
                new_plotting_visualization_handler(&ServiceConfig::new("tui"))
            }
        }
    }
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::load(&mut "{}".as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.lead_zone(), &ZoneParameters::default());
    }

    #[test]
    fn full_document() {
        let yaml = "
log_level: debug
lead_zone:
  samples: 5000
  threshold_ratio: 0.95
services:
  data_plotting:
    handler: tui
    configuration:
      x_ticks: 8
      line_color: yellow
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.lead_zone().samples, 5000);
        assert_eq!(config.lead_zone().threshold_ratio, 0.95);
        assert_eq!(config.lead_zone().fixed_start_fraction, 0.2);
        assert!(config.get_plotting_visualization_handler().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::load(&mut "log_level: loud".as_bytes()).is_err());
        assert!(matches!(
            Config::load(&mut "lead_zone:\n  samples: 1".as_bytes()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn unknown_plot_handler() {
        let yaml = "services:\n  data_plotting:\n    handler: gnuplot\n";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert!(matches!(
            config.get_plotting_visualization_handler(),
            Err(Error::UnknownServiceHandler(_))
        ));
    }

    #[test]
    fn parameter_type_mismatch() {
        let yaml = "handler: tui\nconfiguration:\n  x_ticks: many\n";
        let cfg: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.get_parameter_as_i64("x_ticks").unwrap().is_err());
        assert!(cfg.get_parameter_as_string("x_ticks").unwrap().is_ok());
        assert!(cfg.get_parameter_as_i64("missing").is_none());
    }

    #[test]
    fn missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(Config::load_path(&path, false).is_ok());
        assert!(matches!(Config::load_path(&path, true), Err(Error::Io(_))));
        std::fs::write(&path, "log_level: warn\n").unwrap();
        let config = Config::load_path(&path, true).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }
}
