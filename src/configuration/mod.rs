mod configuration;
mod configuration_error;
mod gps_config;

pub use configuration::Configuration;
pub use configuration_error::ConfigurationError;
pub use gps_config::GpsConfig;
pub use gps_config::ReconnectConfig;
pub use gps_config::SerialConfig;
pub use gps_config::SerialSettings;
pub use gps_config::TcpConfig;
pub use gps_config::TransportConfig;
