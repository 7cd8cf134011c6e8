use anyhow::Context;
use anyhow::Result;

use clap::Parser;

use gps_nmea::configuration::Configuration;
use gps_nmea::configuration::GpsConfig;
use gps_nmea::configuration::SerialSettings;
use gps_nmea::configuration::TransportConfig;
use gps_nmea::gps::Event;
use gps_nmea::gps::PollResponse;
use gps_nmea::gps::SystemClock;
use gps_nmea::gps::GPS;
use gps_nmea::transport::SerialTransport;
use gps_nmea::transport::Supervisor;
use gps_nmea::transport::TcpTransport;
use gps_nmea::transport::Transport;

use std::convert::TryFrom;
use std::path::PathBuf;

use tokio::sync::broadcast::error::RecvError;

use tracing::debug;
use tracing::info;
use tracing::warn;

use tracing_subscriber::filter::EnvFilter;

/// Read fixes from an NMEA-0183 GPS
#[derive(Parser)]
#[clap(about)]
struct Args {
    /// Configuration file
    #[clap(default_value = "gps_nmea.toml")]
    pub config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Configuration::load(&args.config)
        .with_context(|| format!("failed to load configuration file {:?}", args.config))?;

    let filter = EnvFilter::try_from(&config)?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let gps_config = &config.gps;

    match gps_config.transport()? {
        TransportConfig::Serial(serial) => {
            let settings = SerialSettings::try_from(&serial)?;
            let builder = settings.builder(&serial.device);
            let transport = SerialTransport::new(serial.device, builder, gps_config.codec());

            run(gps_config, transport).await
        }
        TransportConfig::Tcp(tcp) => {
            let transport = TcpTransport::new(tcp.host().to_string(), tcp.port(), gps_config.codec());

            run(gps_config, transport).await
        }
    }
}

async fn run<T: Transport + 'static>(gps_config: &GpsConfig, transport: T) -> Result<()> {
    let mut supervisor = Supervisor::new(transport, gps_config.reconnect_policy());

    supervisor
        .open()
        .await
        .with_context(|| format!("failed to open GPS {}", supervisor.name()))?;

    let gps = GPS::start(supervisor, SystemClock);

    let name = gps_config.name.clone().unwrap_or_else(|| gps.name.clone());
    info!("registered GPS {}", name);

    let mut events = gps.subscribe();
    let mut interval = tokio::time::interval(gps_config.poll_interval());
    let mut polled = false;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let snapshot = gps.snapshot();

                if polled && !snapshot.location_pending && !snapshot.time_pending {
                    info!("{}", serde_json::to_string(&snapshot)?);
                }

                match gps.request_poll() {
                    PollResponse::Accepted => polled = true,
                    PollResponse::Busy => debug!("waiting for a fix from {}", name),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("unable to listen for Ctrl-C")?;
                info!("disconnecting from {}", name);
                gps.disconnect();
            }
            event = events.recv() => match event {
                Ok(Event::Disconnected(termination)) => {
                    warn!("GPS {} disconnected: {:?}", name, termination);
                    break;
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    gps.stopped().await?;

    Ok(())
}
