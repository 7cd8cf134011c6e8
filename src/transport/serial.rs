use crate::nmea::Codec;
use crate::transport::transport::read_framed;
use crate::transport::ReadError;
use crate::transport::Transport;

use std::io;
use std::time::Duration;

use tokio_serial::SerialPortBuilder;
use tokio_serial::SerialPortBuilderExt;
use tokio_serial::SerialStream;

use tokio_util::codec::FramedRead;

use tracing::debug;

pub struct SerialTransport {
    device: String,
    builder: SerialPortBuilder,
    codec: Codec,
    reader: Option<FramedRead<SerialStream, Codec>>,
}

impl SerialTransport {
    pub fn new(device: String, builder: SerialPortBuilder, codec: Codec) -> Self {
        SerialTransport {
            device,
            builder,
            codec,
            reader: None,
        }
    }
}

impl Transport for SerialTransport {
    fn name(&self) -> &str {
        &self.device
    }

    async fn connect(&mut self) -> io::Result<()> {
        self.reader = None;

        let serial = self.builder.clone().open_native_async()?;

        debug!("Opened NMEA serial port {}", self.device);

        self.reader = Some(FramedRead::new(serial, self.codec.clone()));

        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.reader.take().is_some() {
            debug!("Closed NMEA serial port {}", self.device);
        }
    }

    async fn read_line(&mut self, timeout: Duration) -> Result<String, ReadError> {
        read_framed(&mut self.reader, timeout).await
    }
}
