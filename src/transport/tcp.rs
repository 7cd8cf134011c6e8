use crate::nmea::Codec;
use crate::transport::transport::read_framed;
use crate::transport::ReadError;
use crate::transport::Transport;

use std::io;
use std::time::Duration;

use tokio::net::TcpStream;

use tokio_util::codec::FramedRead;

use tracing::debug;

pub const DEFAULT_HOST: &str = "192.168.1.1";
pub const DEFAULT_PORT: u16 = 50000;

/// NMEA over TCP, as served by receivers and serial-to-network bridges
pub struct TcpTransport {
    name: String,
    host: String,
    port: u16,
    codec: Codec,
    reader: Option<FramedRead<TcpStream, Codec>>,
}

impl TcpTransport {
    pub fn new(host: String, port: u16, codec: Codec) -> Self {
        let name = format!("{}:{}", host, port);

        TcpTransport {
            name,
            host,
            port,
            codec,
            reader: None,
        }
    }
}

impl Transport for TcpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&mut self) -> io::Result<()> {
        self.reader = None;

        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;

        debug!("Connected to NMEA server {}", self.name);

        self.reader = Some(FramedRead::new(stream, self.codec.clone()));

        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.reader.take().is_some() {
            debug!("Disconnected from NMEA server {}", self.name);
        }
    }

    async fn read_line(&mut self, timeout: Duration) -> Result<String, ReadError> {
        read_framed(&mut self.reader, timeout).await
    }
}
