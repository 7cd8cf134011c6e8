use crate::configuration::ConfigurationError;
use crate::nmea::Codec;
use crate::nmea::MAX_LINE_LENGTH;
use crate::transport::ReconnectPolicy;
use crate::transport::DEFAULT_HOST;
use crate::transport::DEFAULT_PORT;

use serde::Deserialize;

use std::convert::TryFrom;
use std::time::Duration;

use tokio_serial::DataBits;
use tokio_serial::FlowControl;
use tokio_serial::Parity;
use tokio_serial::SerialPortBuilder;
use tokio_serial::StopBits;

const DEFAULT_BAUD_RATE: u32 = 4800;
const DEFAULT_POLL_INTERVAL: u64 = 1000;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GpsConfig {
    pub name: Option<String>,
    /// Milliseconds between polls
    pub poll_interval: Option<u64>,
    pub max_line_length: Option<usize>,
    pub reconnect: Option<ReconnectConfig>,
    pub serial: Option<SerialConfig>,
    pub tcp: Option<TcpConfig>,
}

/// Overrides for [`ReconnectPolicy`], durations in milliseconds
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ReconnectConfig {
    pub read_timeout: Option<u64>,
    pub timeout_threshold: Option<u32>,
    pub timeout_cooldown: Option<u64>,
    pub refused_cooldown: Option<u64>,
    pub open_timeout: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SerialConfig {
    pub device: String,
    pub baud_rate: Option<u32>,
    pub framing: Option<String>,
    pub flow_control: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct TcpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportConfig {
    Serial(SerialConfig),
    Tcp(TcpConfig),
}

impl GpsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL))
    }

    pub fn codec(&self) -> Codec {
        Codec::new(self.max_line_length.unwrap_or(MAX_LINE_LENGTH))
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let mut policy = ReconnectPolicy::default();

        let reconnect = match &self.reconnect {
            Some(r) => r,
            None => return policy,
        };

        if let Some(t) = reconnect.read_timeout {
            policy.read_timeout = Duration::from_millis(t);
        }

        if let Some(t) = reconnect.timeout_threshold {
            policy.timeout_threshold = t;
        }

        if let Some(c) = reconnect.timeout_cooldown {
            policy.timeout_cooldown = Duration::from_millis(c);
        }

        if let Some(c) = reconnect.refused_cooldown {
            policy.refused_cooldown = Duration::from_millis(c);
        }

        policy.open_timeout = reconnect.open_timeout.map(Duration::from_millis);

        policy
    }

    pub fn transport(&self) -> Result<TransportConfig, ConfigurationError> {
        match (&self.serial, &self.tcp) {
            (Some(serial), None) => Ok(TransportConfig::Serial(serial.clone())),
            (None, Some(tcp)) => Ok(TransportConfig::Tcp(tcp.clone())),
            (None, None) => Err(ConfigurationError::MissingTransport),
            (Some(_), Some(_)) => Err(ConfigurationError::DuplicateTransport),
        }
    }
}

impl TcpConfig {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Line settings for a serial GPS
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub flow_control: FlowControl,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl SerialSettings {
    pub fn builder(&self, device: &str) -> SerialPortBuilder {
        tokio_serial::new(device, self.baud_rate)
            .data_bits(self.data_bits)
            .flow_control(self.flow_control)
            .parity(self.parity)
            .stop_bits(self.stop_bits)
    }
}

impl TryFrom<&SerialConfig> for SerialSettings {
    type Error = ConfigurationError;

    fn try_from(serial: &SerialConfig) -> Result<SerialSettings, ConfigurationError> {
        let mut data_bits = DataBits::Eight;
        let mut flow_control = FlowControl::None;
        let mut parity = Parity::None;
        let mut stop_bits = StopBits::One;

        if let Some(f) = &serial.framing {
            let (framing_data_bits, framing_parity, framing_stop_bits) =
                match f.chars().collect::<Vec<char>>()[..] {
                    [d, p, s] => (d, p, s),
                    _ => return Err(ConfigurationError::InvalidFraming(f.clone())),
                };

            data_bits = match framing_data_bits {
                '8' => DataBits::Eight,
                '7' => DataBits::Seven,
                '6' => DataBits::Six,
                '5' => DataBits::Five,
                _ => return Err(ConfigurationError::InvalidDataBits(framing_data_bits)),
            };

            parity = match framing_parity {
                'N' => Parity::None,
                'O' => Parity::Odd,
                'E' => Parity::Even,
                _ => return Err(ConfigurationError::InvalidParity(framing_parity)),
            };

            stop_bits = match framing_stop_bits {
                '1' => StopBits::One,
                '2' => StopBits::Two,
                _ => return Err(ConfigurationError::InvalidStopBits(framing_stop_bits)),
            };
        }

        if let Some(f) = &serial.flow_control {
            flow_control = match f.as_str() {
                "H" => FlowControl::Hardware,
                "S" => FlowControl::Software,
                "N" => FlowControl::None,
                _ => return Err(ConfigurationError::InvalidFlowControl(f.clone())),
            };
        }

        Ok(SerialSettings {
            baud_rate: serial.baud_rate.unwrap_or(DEFAULT_BAUD_RATE),
            data_bits,
            flow_control,
            parity,
            stop_bits,
        })
    }
}
