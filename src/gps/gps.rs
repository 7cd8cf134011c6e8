use crate::gps::Clock;
use crate::gps::Event;
use crate::gps::FixHandle;
use crate::gps::FixState;
use crate::gps::Ingest;
use crate::gps::PollResponse;
use crate::gps::Termination;
use crate::transport::ConnectionState;
use crate::transport::Supervisor;
use crate::transport::Transport;

use tokio::sync::broadcast;
use tokio::sync::watch;
use tokio::task::JoinError;
use tokio::task::JoinHandle;

use tokio_util::sync::CancellationToken;

/// A connected NMEA receiver with its ingestion task running.
#[derive(Debug)]
pub struct GPS {
    pub name: String,
    fix: FixHandle,
    events: broadcast::Sender<Event>,
    state: watch::Receiver<ConnectionState>,
    shutdown: CancellationToken,
    task: JoinHandle<Termination>,
}

impl GPS {
    /// Spawns ingestion from an opened `supervisor`.
    pub fn start<T, C>(supervisor: Supervisor<T>, clock: C) -> Self
    where
        T: Transport + 'static,
        C: Clock + 'static,
    {
        let name = supervisor.name().to_string();
        let fix = FixHandle::new();
        let (events, _) = broadcast::channel(5);
        let state = supervisor.subscribe_state();
        let shutdown = CancellationToken::new();

        let ingest = Ingest::new(
            supervisor,
            fix.clone(),
            clock,
            shutdown.clone(),
            events.clone(),
        );

        let task = tokio::spawn(ingest.run());

        GPS {
            name,
            fix,
            events,
            state,
            shutdown,
            task,
        }
    }

    pub fn request_poll(&self) -> PollResponse {
        self.fix.request_poll()
    }

    pub fn snapshot(&self) -> FixState {
        self.fix.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Asks the ingestion task to close the transport and exit.
    pub fn disconnect(&self) {
        self.shutdown.cancel();
    }

    /// Waits for the ingestion task to exit.
    pub async fn stopped(self) -> Result<Termination, JoinError> {
        self.task.await
    }
}
