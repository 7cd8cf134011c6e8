use crate::configuration::ConfigurationError;
use crate::configuration::GpsConfig;

use serde::Deserialize;

use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use tracing_subscriber::filter::EnvFilter;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Configuration {
    pub log_filter: Option<String>,
    pub gps: GpsConfig,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigurationError> {
        let source = fs::read_to_string(path)?;

        parse(&source)
    }
}

fn parse(source: &str) -> Result<Configuration, ConfigurationError> {
    let configuration: Configuration = toml::from_str(source)?;

    // reject a file naming zero or two transports before anything connects
    configuration.gps.transport()?;

    Ok(configuration)
}

impl TryFrom<&Configuration> for EnvFilter {
    type Error = ConfigurationError;

    fn try_from(configuration: &Configuration) -> Result<EnvFilter, ConfigurationError> {
        match &configuration.log_filter {
            Some(f) => match EnvFilter::try_new(f) {
                Ok(filter) => Ok(filter),
                Err(e) => Err(ConfigurationError::InvalidLogFilter(f.clone(), e)),
            },
            None => Ok(EnvFilter::new("info")),
        }
    }
}
