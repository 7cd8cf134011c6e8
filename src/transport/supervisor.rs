use crate::nmea::is_nmea;
use crate::transport::ReadError;
use crate::transport::Transport;

use backoff::ExponentialBackoff;
use backoff::SystemClock;

use serde::Serialize;

use std::io;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

use tokio::sync::watch;
use tokio::sync::Mutex;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Reconnecting,
}

/// Timing of reads and reconnects.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconnectPolicy {
    /// Longest wait for one line
    pub read_timeout: Duration,
    /// Consecutive timeouts tolerated before reconnecting
    pub timeout_threshold: u32,
    /// Pause between disconnect and connect after too many timeouts
    pub timeout_cooldown: Duration,
    /// Pause between disconnect and connect after a refused connection
    pub refused_cooldown: Duration,
    /// Give up opening the device after this long, retry forever if `None`
    pub open_timeout: Option<Duration>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            read_timeout: Duration::from_secs(3),
            timeout_threshold: 5,
            timeout_cooldown: Duration::from_secs(5),
            refused_cooldown: Duration::from_secs(10),
            open_timeout: None,
        }
    }
}

impl ReconnectPolicy {
    fn open_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: Duration::from_millis(50),
            initial_interval: Duration::from_millis(50),
            randomization_factor: 0.25,
            multiplier: 1.5,
            max_interval: Duration::from_millis(60_000),
            max_elapsed_time: self.open_timeout,
            clock: SystemClock::default(),
            start_time: Instant::now(),
        }
    }
}

// Lines read while deciding whether the device speaks NMEA
const HANDSHAKE_LINES: usize = 3;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("unable to connect to {0}: {1}")]
    Connect(String, io::Error),
    #[error("no NMEA sentence from {0}")]
    NotNMEA(String),
    #[error("unable to read from {0}: {1}")]
    Read(String, ReadError),
}

/// What the ingestion loop should do after one supervised read.
#[derive(Debug, Eq, PartialEq)]
pub enum Supervised {
    Line(String),
    /// The read failed and was dealt with, read again
    Retry,
    /// A line overran the buffer and the transport is now closed
    Overflow(usize),
}

/// Owns a [`Transport`] and keeps it connected.
pub struct Supervisor<T> {
    transport: T,
    policy: ReconnectPolicy,
    timeouts: u32,
    reconnects: u64,
    state: watch::Sender<ConnectionState>,
}

impl<T: Transport> Supervisor<T> {
    pub fn new(transport: T, policy: ReconnectPolicy) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        Supervisor {
            transport,
            policy,
            timeouts: 0,
            reconnects: 0,
            state,
        }
    }

    pub fn name(&self) -> &str {
        self.transport.name()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Consecutive timeouts since the last line or reconnect
    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }

    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    /// Connects and checks that the device speaks NMEA, backing off between
    /// failed attempts.
    pub async fn open(&mut self) -> Result<(), OpenError> {
        let backoff = self.policy.open_backoff();
        let supervisor = &Mutex::new(self);

        backoff::future::retry_notify(
            backoff,
            move || async move {
                let mut supervisor = supervisor.lock().await;

                supervisor
                    .try_open()
                    .await
                    .map_err(backoff::Error::transient)
            },
            |e: OpenError, wait: Duration| {
                error!("Opening failed: {}, retrying in {:?}", e, wait)
            },
        )
        .await
    }

    async fn try_open(&mut self) -> Result<(), OpenError> {
        let name = self.name().to_string();

        if let Err(e) = self.transport.connect().await {
            return Err(OpenError::Connect(name, e));
        }

        let mut result = Err(OpenError::NotNMEA(name.clone()));

        for _ in 0..HANDSHAKE_LINES {
            match self.transport.read_line(self.policy.read_timeout).await {
                Ok(line) if is_nmea(&line) => {
                    result = Ok(());
                    break;
                }
                Ok(line) => debug!("handshake skipped {:?}", line),
                Err(e) => {
                    result = Err(OpenError::Read(name.clone(), e));
                    break;
                }
            }
        }

        match result {
            Ok(()) => {
                info!("Opened NMEA device {}", name);
                self.timeouts = 0;
                self.set_state(ConnectionState::Connected);
            }
            Err(_) => self.transport.disconnect().await,
        }

        result
    }

    /// Reads one line, recovering from every failure but overflow.
    pub async fn read_line(&mut self) -> Supervised {
        match self.transport.read_line(self.policy.read_timeout).await {
            Ok(line) => {
                self.timeouts = 0;
                Supervised::Line(line)
            }
            Err(ReadError::Overflow(length)) => {
                warn!(
                    "Overflow detected after {} bytes from {}. Possible remote GPS disconnection",
                    length,
                    self.name()
                );
                self.disconnect().await;
                Supervised::Overflow(length)
            }
            Err(ReadError::Refused) => {
                warn!("Connection to {} refused, reconnecting", self.name());
                self.reconnect(self.policy.refused_cooldown).await;
                Supervised::Retry
            }
            Err(ReadError::Timeout) => {
                let timeouts = self.timeouts;
                self.timeouts += 1;

                if timeouts > self.policy.timeout_threshold {
                    warn!("Timeout limit reached on {}, reconnecting", self.name());
                    self.reconnect(self.policy.timeout_cooldown).await;
                } else {
                    debug!("timeout {} reading {}", self.timeouts, self.name());
                }

                Supervised::Retry
            }
            Err(ReadError::Io(e)) => {
                error!("Error reading from {}: {}", self.name(), e);
                Supervised::Retry
            }
        }
    }

    /// Drops the connection and reconnects after `cooldown`.
    pub async fn reconnect(&mut self, cooldown: Duration) {
        self.transport.disconnect().await;
        self.set_state(ConnectionState::Reconnecting);
        self.reconnects += 1;
        self.timeouts = 0;

        tokio::time::sleep(cooldown).await;

        match self.transport.connect().await {
            Ok(()) => {
                info!("Reconnected to {}", self.name());
                self.set_state(ConnectionState::Connected);
            }
            Err(e) => {
                // the next read reports the connection refused and retries
                error!("Reconnecting to {} failed: {}", self.name(), e);
                self.set_state(ConnectionState::Disconnected);
            }
        }
    }

    pub async fn disconnect(&mut self) {
        self.transport.disconnect().await;
        self.set_state(ConnectionState::Disconnected);
        info!("Disconnected from {}", self.name());
    }
}
