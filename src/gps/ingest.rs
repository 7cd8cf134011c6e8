use crate::gps::extract;
use crate::gps::Clock;
use crate::gps::FixError;
use crate::gps::FixHandle;
use crate::nmea::parse_sentence;
use crate::transport::Supervised;
use crate::transport::Supervisor;
use crate::transport::Transport;

use tokio::sync::broadcast;

use tokio_util::sync::CancellationToken;

use tracing::debug;
use tracing::info;
use tracing::trace;

/// Why an ingestion loop stopped
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Termination {
    /// A line overran the read buffer, the remote end is likely gone
    Overflow,
    /// Disconnect was requested
    Requested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    /// Sent once when the loop exits
    Disconnected(Termination),
}

/// Reads lines from a supervised transport into a [`FixHandle`] until told
/// to stop or the line buffer overflows.
pub struct Ingest<T, C> {
    supervisor: Supervisor<T>,
    fix: FixHandle,
    clock: C,
    shutdown: CancellationToken,
    events: broadcast::Sender<Event>,
}

impl<T: Transport, C: Clock> Ingest<T, C> {
    pub fn new(
        supervisor: Supervisor<T>,
        fix: FixHandle,
        clock: C,
        shutdown: CancellationToken,
        events: broadcast::Sender<Event>,
    ) -> Self {
        Ingest {
            supervisor,
            fix,
            clock,
            shutdown,
            events,
        }
    }

    #[tracing::instrument(skip_all, fields(device = %self.supervisor.name()))]
    pub async fn run(mut self) -> Termination {
        let termination = self.read_lines().await;

        info!("stopped reading: {:?}", termination);

        // nobody listening is fine
        let _ = self.events.send(Event::Disconnected(termination));

        termination
    }

    async fn read_lines(&mut self) -> Termination {
        loop {
            if self.shutdown.is_cancelled() {
                self.supervisor.disconnect().await;
                return Termination::Requested;
            }

            // a read in flight runs to its timeout, cancellation waits for it
            match self.supervisor.read_line().await {
                Supervised::Line(line) => self.ingest(&line),
                Supervised::Retry => continue,
                Supervised::Overflow(_) => return Termination::Overflow,
            }
        }
    }

    fn ingest(&self, line: &str) {
        trace!("line {:?}", line);

        let sentence = parse_sentence(line);

        match extract(&sentence, &self.clock) {
            Ok(update) => self.fix.apply(update),
            Err(FixError::Unrecognized(body)) => trace!("ignored {}", body),
            Err(e) => debug!("no fix from {:?}: {}", line, e),
        }
    }
}
